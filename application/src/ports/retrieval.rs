//! Context retrieval port (interface for snippet-search adapters)
//!
//! Sessions can reference corpora (a resume, company material) by id. The
//! retriever looks up the most relevant snippets for a query so prompts can
//! quote real material instead of generic filler. Retrieval is strictly
//! best-effort: callers degrade to empty context when it fails.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier for a snippet corpus (opaque to the application layer)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorpusId(String);

impl CorpusId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorpusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CorpusId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CorpusId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Errors that can occur during retrieval
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Corpus not found: {0}")]
    CorpusNotFound(CorpusId),

    #[error("Retrieval backend error: {0}")]
    Backend(String),
}

/// Port for snippet retrieval
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    /// Return up to `top_k` snippets from `corpus` relevant to `query`,
    /// most relevant first
    async fn retrieve(
        &self,
        corpus: &CorpusId,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<String>, RetrievalError>;
}
