//! Feedback structures returned at session end.
//!
//! Score fields are integers in `[0, 100]`. The shapes here are the
//! contract every presentation layer consumes, so they must come out
//! well-formed even when generation fails; see
//! [`crate::feedback::parsing`] for the fallback path.

use crate::session::entities::InterviewKind;
use crate::session::transcript::Transcript;
use serde::{Deserialize, Serialize};

/// Scored evaluation of a one-on-one interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewFeedback {
    pub overall_score: u8,
    /// Only present for technical sessions
    pub technical_score: Option<u8>,
    pub communication_score: u8,
    pub confidence_score: u8,
    pub strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub detailed_feedback: String,
    pub recommendations: Vec<String>,
}

impl InterviewFeedback {
    /// Deterministic fallback used whenever generation or parsing fails
    pub fn default_for(kind: InterviewKind) -> Self {
        Self {
            overall_score: 70,
            technical_score: (kind == InterviewKind::Technical).then_some(65),
            communication_score: 75,
            confidence_score: 70,
            strengths: vec![
                "Engaged in conversation".to_string(),
                "Showed interest".to_string(),
            ],
            improvement_areas: vec![
                "Provide more specific examples".to_string(),
                "Technical depth".to_string(),
            ],
            detailed_feedback: "The candidate showed good engagement but could improve on \
                technical details and specific examples."
                .to_string(),
            recommendations: vec![
                "Practice technical concepts".to_string(),
                "Prepare STAR format stories".to_string(),
                "Research company background".to_string(),
            ],
        }
    }

    /// Check every score sits inside the contract range
    pub fn scores_in_range(&self) -> bool {
        let scores = [
            Some(self.overall_score),
            self.technical_score,
            Some(self.communication_score),
            Some(self.confidence_score),
        ];
        scores.into_iter().flatten().all(|s| s <= 100)
    }
}

impl Default for InterviewFeedback {
    fn default() -> Self {
        Self::default_for(InterviewKind::General)
    }
}

/// Scored evaluation of the human's group discussion performance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionFeedback {
    pub participation_score: u8,
    pub initiative_score: u8,
    pub clarity_score: u8,
    pub collaboration_score: u8,
    pub topic_understanding: u8,
    pub strengths: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub key_contributions: Vec<String>,
    pub overall_feedback: String,
}

impl DiscussionFeedback {
    /// Deterministic fallback derived from how much the human spoke.
    ///
    /// The base score scales with the participation ratio and is clamped
    /// to `[40, 85]`, so even a silent participant gets a usable report.
    pub fn default_for(stats: &ParticipationStats) -> Self {
        let base = (stats.participation_percent() * 1.5) as i64;
        let base = base.clamp(40, 85) as u8;

        Self {
            participation_score: base,
            initiative_score: base.saturating_sub(5),
            clarity_score: (base + 5).min(100),
            collaboration_score: base,
            topic_understanding: base,
            strengths: vec![
                "Engaged actively in the discussion".to_string(),
                "Shared relevant perspectives".to_string(),
                "Maintained respectful dialogue".to_string(),
            ],
            improvement_suggestions: vec![
                "Take more initiative in introducing new points".to_string(),
                "Provide more specific examples to support arguments".to_string(),
                "Build more explicitly on others' contributions".to_string(),
            ],
            key_contributions: vec![
                "Participated in the discussion flow".to_string(),
                "Added valuable perspectives to the topic".to_string(),
                "Maintained professional communication".to_string(),
            ],
            overall_feedback: format!(
                "You participated well in the group discussion with {} contributions. \
                 Your engagement level was good, and you demonstrated understanding of \
                 the topic. Focus on taking more initiative and providing concrete \
                 examples to strengthen your future group discussion performance.",
                stats.human_messages
            ),
        }
    }

    pub fn scores_in_range(&self) -> bool {
        [
            self.participation_score,
            self.initiative_score,
            self.clarity_score,
            self.collaboration_score,
            self.topic_understanding,
        ]
        .iter()
        .all(|s| *s <= 100)
    }
}

/// How much the human spoke relative to the whole discussion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParticipationStats {
    pub human_messages: usize,
    pub total_messages: usize,
}

impl ParticipationStats {
    pub fn from_transcript(transcript: &Transcript) -> Self {
        Self {
            human_messages: transcript.human_turn_count(),
            total_messages: transcript.len(),
        }
    }

    /// Human share of all messages, as a percentage
    pub fn participation_percent(&self) -> f64 {
        if self.total_messages == 0 {
            return 0.0;
        }
        self.human_messages as f64 / self.total_messages as f64 * 100.0
    }
}

/// Feedback attached to a completed session, either flavor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionFeedback {
    Interview(InterviewFeedback),
    Discussion(DiscussionFeedback),
}

impl From<InterviewFeedback> for SessionFeedback {
    fn from(feedback: InterviewFeedback) -> Self {
        SessionFeedback::Interview(feedback)
    }
}

impl From<DiscussionFeedback> for SessionFeedback {
    fn from(feedback: DiscussionFeedback) -> Self {
        SessionFeedback::Discussion(feedback)
    }
}
