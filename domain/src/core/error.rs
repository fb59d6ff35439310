//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Session is closed and can no longer change")]
    SessionClosed,

    #[error("Session is not an interview session")]
    NotAnInterview,

    #[error("Session is not a group discussion session")]
    NotADiscussion,

    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),
}

impl DomainError {
    /// Check if this error means the session already reached a terminal status
    pub fn is_closed(&self) -> bool {
        matches!(self, DomainError::SessionClosed)
    }
}
