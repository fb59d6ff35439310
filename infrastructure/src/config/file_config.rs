//! Raw TOML configuration data types
//!
//! These structs mirror the structure of the config file exactly. Every
//! section and field is optional in the file; defaults fill the gaps, so
//! a missing config file behaves the same as an empty one.

use greenroom_application::params::{DiscussionParams, InterviewParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A config value that passed deserialization but cannot be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("generation.model must not be empty")]
    EmptyModel,

    #[error("generation.api_key_env must not be empty")]
    EmptyApiKeyEnv,

    #[error("{field} must be between 0.0 and 2.0, got {value}")]
    TemperatureOutOfRange { field: &'static str, value: f32 },

    #[error("discussion.participant_count must be between 1 and 5, got {0}")]
    ParticipantCountOutOfRange(usize),

    #[error("interview.max_questions must be at least 1")]
    ZeroMaxQuestions,

    #[error("retrieval.top_k must be at least 1")]
    ZeroTopK,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Generation backend settings
    pub generation: FileGenerationConfig,
    /// One-on-one interview tuning
    pub interview: FileInterviewConfig,
    /// Group discussion tuning
    pub discussion: FileDiscussionConfig,
    /// Context retrieval settings
    pub retrieval: FileRetrievalConfig,
    /// Session persistence settings
    pub storage: FileStorageConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate every section, reporting the first unusable value.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.generation.validate()?;
        self.interview.validate()?;
        self.discussion.validate()?;
        self.retrieval.validate()?;
        Ok(())
    }
}

/// Raw `[generation]` section
///
/// # Example
///
/// ```toml
/// [generation]
/// base_url = "http://localhost:11434/v1"   # any chat-completions endpoint
/// model = "llama3.1"
/// api_key_env = "OPENAI_API_KEY"
/// timeout_secs = 60
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    /// Chat-completions endpoint base URL
    pub base_url: String,
    /// Model name sent with every request
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl FileGenerationConfig {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModel);
        }
        if self.api_key_env.trim().is_empty() {
            return Err(ConfigValidationError::EmptyApiKeyEnv);
        }
        Ok(())
    }
}

/// Raw `[interview]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInterviewConfig {
    /// Question budget before the interview wraps up
    pub max_questions: usize,
    /// Exchanges of history fed to question generation
    pub history_window: usize,
    pub question_temperature: f32,
    pub feedback_temperature: f32,
    pub max_tokens: u32,
}

impl Default for FileInterviewConfig {
    fn default() -> Self {
        let params = InterviewParams::default();
        Self {
            max_questions: params.max_questions,
            history_window: params.history_window,
            question_temperature: params.question_temperature,
            feedback_temperature: params.feedback_temperature,
            max_tokens: params.max_tokens,
        }
    }
}

impl FileInterviewConfig {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_questions == 0 {
            return Err(ConfigValidationError::ZeroMaxQuestions);
        }
        check_temperature("interview.question_temperature", self.question_temperature)?;
        check_temperature("interview.feedback_temperature", self.feedback_temperature)?;
        Ok(())
    }

    pub fn to_params(&self) -> InterviewParams {
        InterviewParams {
            max_questions: self.max_questions,
            history_window: self.history_window,
            question_temperature: self.question_temperature,
            feedback_temperature: self.feedback_temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Raw `[discussion]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    /// Synthetic participants seated per session
    pub participant_count: usize,
    /// Transcript lines fed to contribution generation
    pub context_window: usize,
    pub bot_temperature: f32,
    pub feedback_temperature: f32,
    pub max_tokens: u32,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        let params = DiscussionParams::default();
        Self {
            participant_count: params.participant_count,
            context_window: params.context_window,
            bot_temperature: params.bot_temperature,
            feedback_temperature: params.feedback_temperature,
            max_tokens: params.max_tokens,
        }
    }
}

impl FileDiscussionConfig {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(1..=5).contains(&self.participant_count) {
            return Err(ConfigValidationError::ParticipantCountOutOfRange(
                self.participant_count,
            ));
        }
        check_temperature("discussion.bot_temperature", self.bot_temperature)?;
        check_temperature("discussion.feedback_temperature", self.feedback_temperature)?;
        Ok(())
    }

    pub fn to_params(&self) -> DiscussionParams {
        DiscussionParams {
            participant_count: self.participant_count,
            context_window: self.context_window,
            bot_temperature: self.bot_temperature,
            feedback_temperature: self.feedback_temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Raw `[retrieval]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    /// Root directory holding one subdirectory per corpus.
    /// Unset means no directory retriever; sessions run without context.
    pub root: Option<String>,
    /// Snippets fetched per corpus query
    pub top_k: usize,
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        Self { root: None, top_k: 5 }
    }
}

impl FileRetrievalConfig {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.top_k == 0 {
            return Err(ConfigValidationError::ZeroTopK);
        }
        Ok(())
    }
}

/// Raw `[storage]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory for session JSON files.
    /// Unset means the platform data directory.
    pub sessions_dir: Option<String>,
}

/// Raw `[repl]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Path to the line-editor history file
    pub history_file: Option<String>,
    /// Colored output
    pub color: bool,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            color: true,
        }
    }
}

fn check_temperature(field: &'static str, value: f32) -> Result<(), ConfigValidationError> {
    if (0.0..=2.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigValidationError::TemperatureOutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[generation]
base_url = "http://localhost:11434/v1"
model = "llama3.1"
timeout_secs = 120

[interview]
max_questions = 5
question_temperature = 0.9

[discussion]
participant_count = 3

[retrieval]
root = "~/corpora"
top_k = 3

[repl]
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.generation.base_url, "http://localhost:11434/v1");
        assert_eq!(config.generation.model, "llama3.1");
        assert_eq!(config.generation.timeout_secs, 120);
        assert_eq!(config.interview.max_questions, 5);
        assert_eq!(config.interview.question_temperature, 0.9);
        assert_eq!(config.discussion.participant_count, 3);
        assert_eq!(config.retrieval.root.as_deref(), Some("~/corpora"));
        assert_eq!(config.retrieval.top_k, 3);
        assert!(!config.repl.color);
    }

    #[test]
    fn test_deserialize_partial_config_keeps_defaults() {
        let toml_str = r#"
[interview]
max_questions = 12
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.interview.max_questions, 12);
        // Untouched fields keep defaults
        assert_eq!(config.interview.history_window, 3);
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.discussion.participant_count, 4);
        assert!(config.repl.color);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(FileConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = FileConfig::default();
        config.generation.model = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyModel));

        let mut config = FileConfig::default();
        config.discussion.participant_count = 9;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ParticipantCountOutOfRange(9))
        );

        let mut config = FileConfig::default();
        config.interview.question_temperature = 3.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::TemperatureOutOfRange { .. })
        ));

        let mut config = FileConfig::default();
        config.interview.max_questions = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::ZeroMaxQuestions));
    }

    #[test]
    fn test_params_conversion() {
        let toml_str = r#"
[interview]
max_questions = 6
history_window = 4

[discussion]
participant_count = 2
bot_temperature = 1.1
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();

        let interview = config.interview.to_params();
        assert_eq!(interview.max_questions, 6);
        assert_eq!(interview.history_window, 4);
        assert_eq!(interview.question_temperature, 0.7);

        let discussion = config.discussion.to_params();
        assert_eq!(discussion.participant_count, 2);
        assert_eq!(discussion.bot_temperature, 1.1);
        assert_eq!(discussion.max_tokens, 2048);
    }
}
