//! In-memory table of live group discussions.
//!
//! Discussions are multi-party and mutate on every turn, so live state stays
//! here behind an async lock while the store only sees snapshots. Closures
//! passed to [`DiscussionTable::with_state`] / [`with_state_mut`] run under
//! the lock and must not await.
//!
//! [`with_state_mut`]: DiscussionTable::with_state_mut

use greenroom_domain::{Participant, Session, SessionId, TurnState};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Everything a live discussion needs between turns
#[derive(Debug, Clone)]
pub struct DiscussionState {
    pub session: Session,
    pub topic: String,
    pub participants: Vec<Participant>,
    pub turn: TurnState,
}

/// Shared handle to the live-discussion map
#[derive(Clone, Default)]
pub struct DiscussionTable {
    inner: Arc<RwLock<HashMap<SessionId, DiscussionState>>>,
}

impl DiscussionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat a new discussion, keyed by its session id
    pub async fn insert(&self, state: DiscussionState) {
        let id = state.session.id().clone();
        self.inner.write().await.insert(id, state);
    }

    /// Remove a discussion, returning its final state if it was live
    pub async fn remove(&self, id: &SessionId) -> Option<DiscussionState> {
        self.inner.write().await.remove(id)
    }

    pub async fn contains(&self, id: &SessionId) -> bool {
        self.inner.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Run a read-only closure against a live discussion.
    ///
    /// Returns `None` if the session is not in the table.
    pub async fn with_state<F, T>(&self, id: &SessionId, f: F) -> Option<T>
    where
        F: FnOnce(&DiscussionState) -> T,
    {
        let guard = self.inner.read().await;
        guard.get(id).map(f)
    }

    /// Run a mutating closure against a live discussion.
    ///
    /// Returns `None` if the session is not in the table.
    pub async fn with_state_mut<F, T>(&self, id: &SessionId, f: F) -> Option<T>
    where
        F: FnOnce(&mut DiscussionState) -> T,
    {
        let mut guard = self.inner.write().await;
        guard.get_mut(id).map(f)
    }
}
