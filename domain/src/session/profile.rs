//! Session profile: the caller-supplied context a session is created with

use serde::{Deserialize, Serialize};

/// Caller-supplied setup for a session (Value Object)
///
/// Everything here is optional. Prompt builders interpolate whichever
/// fields are present and skip the rest. Keys that greenroom does not
/// recognize are preserved in `extra` so round-tripping a stored session
/// never drops caller data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionProfile {
    /// Company the candidate is practicing for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Target job role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_role: Option<String>,

    /// Candidate experience level ("junior", "mid", "senior")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,

    /// Question difficulty hint ("Easy", "Medium", "Hard")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,

    /// Focus topics for interview questions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,

    /// Interview length before the closing kicks in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_questions: Option<usize>,

    /// Corpus holding the candidate's resume material
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_corpus: Option<String>,

    /// Corpus holding company background material
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_corpus: Option<String>,

    /// Discussion topic (group discussions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// How many synthetic participants to seat (group discussions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_count: Option<usize>,

    /// Unrecognized caller-supplied keys, preserved verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SessionProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company_name = Some(company.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.job_role = Some(role.into());
        self
    }

    pub fn with_experience(mut self, level: impl Into<String>) -> Self {
        self.experience_level = Some(level.into());
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_participant_count(mut self, count: usize) -> Self {
        self.participant_count = Some(count);
        self
    }

    pub fn with_max_questions(mut self, max: usize) -> Self {
        self.max_questions = Some(max);
        self
    }

    /// Company name, or a neutral placeholder for prompt text
    pub fn company_or_default(&self) -> &str {
        self.company_name.as_deref().unwrap_or("the company")
    }

    /// Job role, or a neutral placeholder for prompt text
    pub fn role_or_default(&self) -> &str {
        self.job_role.as_deref().unwrap_or("the position")
    }

    pub fn experience_or_default(&self) -> &str {
        self.experience_level.as_deref().unwrap_or("mid")
    }

    /// Discussion topic, or a neutral placeholder
    pub fn topic_or_default(&self) -> &str {
        self.topic.as_deref().unwrap_or("General Discussion")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_survive_roundtrip() {
        let json = r#"{
            "company_name": "Acme",
            "interview_style": "panel",
            "recruiter_id": 42
        }"#;
        let profile: SessionProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.company_name.as_deref(), Some("Acme"));
        assert_eq!(
            profile.extra.get("interview_style").and_then(|v| v.as_str()),
            Some("panel")
        );

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["recruiter_id"], 42);
    }

    #[test]
    fn test_placeholders_when_unset() {
        let profile = SessionProfile::default();
        assert_eq!(profile.company_or_default(), "the company");
        assert_eq!(profile.role_or_default(), "the position");
        assert_eq!(profile.topic_or_default(), "General Discussion");
    }

    #[test]
    fn test_builder_chain() {
        let profile = SessionProfile::new()
            .with_company("Acme")
            .with_role("Backend Engineer")
            .with_max_questions(5);
        assert_eq!(profile.company_or_default(), "Acme");
        assert_eq!(profile.role_or_default(), "Backend Engineer");
        assert_eq!(profile.max_questions, Some(5));
    }
}
