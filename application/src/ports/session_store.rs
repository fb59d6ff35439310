//! Session store port (interface for persistence adapters)
//!
//! Stores hold serialized session snapshots keyed by session id. Unlike
//! retrieval, store failures matter: save/load errors propagate to the caller
//! so lost transcripts never fail silently.

use async_trait::async_trait;
use greenroom_domain::{Session, SessionId};
use thiserror::Error;

/// Errors that can occur while persisting or loading sessions
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Port for session persistence
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a full session snapshot, replacing any previous one
    async fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Load a session snapshot by id
    async fn load(&self, id: &SessionId) -> Result<Session, StoreError>;

    /// List ids of every stored session
    async fn list(&self) -> Result<Vec<SessionId>, StoreError>;

    /// Delete a stored session (no-op if absent)
    async fn delete(&self, id: &SessionId) -> Result<(), StoreError>;
}
