//! Discussion participants and the synthetic personality roster

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Stable participant identifier (Value Object)
///
/// Synthetic participants use `agent_<personality>`; the human is `human`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub const HUMAN: &'static str = "human";

    pub fn human() -> Self {
        Self(Self::HUMAN.to_string())
    }

    pub fn for_personality(personality: Personality) -> Self {
        Self(format!("agent_{}", personality.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_human(&self) -> bool {
        self.0 == Self::HUMAN
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of synthetic discussion personalities (Value Object)
///
/// Adding a personality means adding a variant and its profile data here;
/// nothing else in the system branches on individual personalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Supportive,
    Assertive,
    FactFocused,
    Analytical,
    Creative,
}

/// Immutable profile data backing a personality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonalityProfile {
    /// First name the participant goes by in the discussion
    pub display_name: &'static str,
    /// One-line summary shown when listing participants
    pub description: &'static str,
    /// In-character instruction handed to the generation backend
    pub instruction: &'static str,
}

impl Personality {
    pub const ALL: [Personality; 5] = [
        Personality::Supportive,
        Personality::Assertive,
        Personality::FactFocused,
        Personality::Analytical,
        Personality::Creative,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Personality::Supportive => "supportive",
            Personality::Assertive => "assertive",
            Personality::FactFocused => "fact_focused",
            Personality::Analytical => "analytical",
            Personality::Creative => "creative",
        }
    }

    pub fn profile(&self) -> PersonalityProfile {
        match self {
            Personality::Supportive => PersonalityProfile {
                display_name: "Alex",
                description: "A supportive team player who encourages others and builds on their ideas",
                instruction: "You are Alex, a collaborative and encouraging participant. You tend to agree with good points, help quieter members contribute, and find common ground. You're positive but not overly agreeable.",
            },
            Personality::Assertive => PersonalityProfile {
                display_name: "Sam",
                description: "Confident and direct, presents strong opinions",
                instruction: "You are Sam, a confident and assertive participant. You present your views strongly, challenge weak arguments constructively, and aren't afraid to take leadership when needed. You're direct but respectful.",
            },
            Personality::FactFocused => PersonalityProfile {
                display_name: "Jordan",
                description: "Focuses on data, facts, and evidence-based arguments",
                instruction: "You are Jordan, a fact-focused and logical participant. You bring data and evidence to support arguments, question unsupported claims, and prefer concrete examples over abstract theories.",
            },
            Personality::Analytical => PersonalityProfile {
                display_name: "Casey",
                description: "Breaks down complex topics systematically",
                instruction: "You are Casey, an analytical thinker who breaks down complex issues into components. You look at different angles, consider pros and cons systematically, and help structure the discussion.",
            },
            Personality::Creative => PersonalityProfile {
                display_name: "Morgan",
                description: "Brings innovative ideas and creative solutions",
                instruction: "You are Morgan, a creative thinker who brings fresh perspectives and innovative solutions. You think outside the box, make unexpected connections, and challenge conventional wisdom constructively.",
            },
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.profile().display_name
    }

    /// Recover the personality from a synthetic participant id
    pub fn from_agent_id(id: &ParticipantId) -> Option<Personality> {
        let suffix = id.as_str().strip_prefix("agent_")?;
        Personality::ALL.iter().copied().find(|p| p.as_str() == suffix)
    }

    /// Sample `count` distinct personalities, at most one of each.
    ///
    /// Requests beyond the roster size are capped at the full roster.
    pub fn sample<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Personality> {
        let count = count.min(Self::ALL.len());
        Self::ALL.choose_multiple(rng, count).copied().collect()
    }
}

impl std::fmt::Display for Personality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A seated discussion participant (Entity)
///
/// Created once when the session is seated and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    pub personality: Option<Personality>,
    pub is_human: bool,
}

impl Participant {
    pub fn synthetic(personality: Personality) -> Self {
        Self {
            id: ParticipantId::for_personality(personality),
            display_name: personality.display_name().to_string(),
            personality: Some(personality),
            is_human: false,
        }
    }

    pub fn human() -> Self {
        Self {
            id: ParticipantId::human(),
            display_name: "You".to_string(),
            personality: None,
            is_human: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sample_returns_distinct_personalities() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let sampled = Personality::sample(4, &mut rng);
            assert_eq!(sampled.len(), 4);
            let mut seen = sampled.clone();
            seen.sort_by_key(|p| p.as_str().to_string());
            seen.dedup();
            assert_eq!(seen.len(), 4);
        }
    }

    #[test]
    fn test_sample_caps_at_roster_size() {
        let mut rng = StdRng::seed_from_u64(7);
        let sampled = Personality::sample(12, &mut rng);
        assert_eq!(sampled.len(), Personality::ALL.len());
    }

    #[test]
    fn test_agent_id_roundtrip() {
        for personality in Personality::ALL {
            let id = ParticipantId::for_personality(personality);
            assert_eq!(Personality::from_agent_id(&id), Some(personality));
        }
        assert_eq!(Personality::from_agent_id(&ParticipantId::human()), None);
        assert_eq!(
            Personality::from_agent_id(&ParticipantId::from("agent_unknown")),
            None
        );
    }

    #[test]
    fn test_participant_constructors() {
        let bot = Participant::synthetic(Personality::Assertive);
        assert_eq!(bot.id.as_str(), "agent_assertive");
        assert_eq!(bot.display_name, "Sam");
        assert!(!bot.is_human);

        let human = Participant::human();
        assert!(human.is_human);
        assert!(human.personality.is_none());
        assert_eq!(human.display_name, "You");
    }
}
