//! Generation backend port (interface for text-generation adapters)
//!
//! The use cases never talk to a model API directly. They build a
//! [`GenerationRequest`] from domain prompt templates and hand it to whatever
//! [`GenerationBackend`] was injected (HTTP adapter in production, scripted
//! mock in tests).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of a single chat message sent to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message in a chat-shaped generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A complete generation request: optional system instruction, chat history,
/// and sampling knobs. Backends map this onto their own wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Build a single-turn request from one user prompt
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            messages: vec![ChatMessage::user(prompt)],
            temperature: None,
            max_tokens: None,
        }
    }

    /// Build a request from a prepared message history
    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        Self {
            system: None,
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Errors that can occur while talking to a generation backend
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Backend request failed: {0}")]
    RequestFailed(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Backend returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("Backend request timed out")]
    Timeout,

    #[error("Generation error: {0}")]
    Other(String),
}

/// Port for text generation
///
/// Implementations must be Send + Sync to support sharing across async tasks.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Run one generation and return the raw response text
    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError>;

    /// Human-readable backend name (model or provider) for logging
    fn name(&self) -> &str {
        "generation-backend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_chain() {
        let request = GenerationRequest::from_prompt("Tell me about yourself.")
            .with_system("You are an interviewer.")
            .with_temperature(0.7)
            .with_max_tokens(2048);

        assert_eq!(request.system.as_deref(), Some("You are an interviewer."));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, ChatRole::User);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(2048));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("hi")).unwrap();
        assert!(json.contains("\"assistant\""));
    }
}
