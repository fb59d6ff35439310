//! Directory-backed context retrieval
//!
//! A corpus is a subdirectory of the configured root; every readable file
//! in it is split into paragraph chunks. Queries are answered by lexical
//! term overlap, a deliberate stand-in for embedding search: the port
//! contract (ranked snippets for a query string) stays the same if a
//! vector index grows behind it later.

use async_trait::async_trait;
use greenroom_application::ports::retrieval::{ContextRetriever, CorpusId, RetrievalError};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Retriever that serves corpora from `{root}/{corpus}/` directories.
pub struct DirCorpusRetriever {
    root: PathBuf,
}

impl DirCorpusRetriever {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn load_chunks(&self, corpus: &CorpusId) -> Result<Vec<String>, RetrievalError> {
        let dir = self.root.join(corpus.as_str());
        if !dir.is_dir() {
            return Err(RetrievalError::CorpusNotFound(corpus.clone()));
        }

        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| RetrievalError::Backend(format!("{}: {}", dir.display(), e)))?;

        // Collect file paths first so chunk order is stable across platforms
        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RetrievalError::Backend(e.to_string()))?
        {
            let path = entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut chunks = Vec::new();
        for path in paths {
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => chunks.extend(split_paragraphs(&text)),
                Err(e) => {
                    warn!("Skipping unreadable corpus file {}: {}", path.display(), e);
                }
            }
        }
        Ok(chunks)
    }
}

#[async_trait]
impl ContextRetriever for DirCorpusRetriever {
    async fn retrieve(
        &self,
        corpus: &CorpusId,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<String>, RetrievalError> {
        let chunks = self.load_chunks(corpus).await?;
        let ranked = rank_chunks(chunks, query, top_k);
        debug!(
            "Retrieved {} chunk(s) from corpus '{}' for query '{}'",
            ranked.len(),
            corpus,
            query
        );
        Ok(ranked)
    }
}

fn split_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rank chunks by how many distinct query terms they contain.
///
/// Ties keep document order. When no chunk matches at all, the leading
/// chunks are returned instead: an off-vocabulary query should still
/// surface the corpus rather than nothing.
fn rank_chunks(chunks: Vec<String>, query: &str, top_k: usize) -> Vec<String> {
    let mut terms: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    terms.sort();
    terms.dedup();

    let mut scored: Vec<(usize, usize, String)> = chunks
        .into_iter()
        .enumerate()
        .map(|(position, chunk)| {
            let lowered = chunk.to_lowercase();
            let score = terms.iter().filter(|t| lowered.contains(t.as_str())).count();
            (score, position, chunk)
        })
        .collect();

    if scored.iter().all(|(score, _, _)| *score == 0) {
        return scored
            .into_iter()
            .take(top_k)
            .map(|(_, _, chunk)| chunk)
            .collect();
    }

    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    scored
        .into_iter()
        .filter(|(score, _, _)| *score > 0)
        .take(top_k)
        .map(|(_, _, chunk)| chunk)
        .collect()
}

/// In-memory retriever with preloaded corpora.
///
/// Used for wiring sessions without a corpus directory and in tests.
/// Unknown corpora report [`RetrievalError::CorpusNotFound`] like the
/// directory retriever does.
#[derive(Default)]
pub struct StaticRetriever {
    corpora: HashMap<String, Vec<String>>,
}

impl StaticRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_corpus(
        mut self,
        name: impl Into<String>,
        snippets: Vec<String>,
    ) -> Self {
        self.corpora.insert(name.into(), snippets);
        self
    }
}

#[async_trait]
impl ContextRetriever for StaticRetriever {
    async fn retrieve(
        &self,
        corpus: &CorpusId,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<String>, RetrievalError> {
        let chunks = self
            .corpora
            .get(corpus.as_str())
            .cloned()
            .ok_or_else(|| RetrievalError::CorpusNotFound(corpus.clone()))?;
        Ok(rank_chunks(chunks, query, top_k))
    }
}
