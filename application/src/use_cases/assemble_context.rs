//! Context assembly shared by both orchestrators.
//!
//! Sessions may reference a resume corpus and a company corpus. Before a
//! generation, the assembler queries each configured corpus and folds the
//! snippets into labelled context sections. Retrieval is strictly
//! best-effort: a missing corpus or a failing retriever degrades to an
//! empty section and the session keeps going without it.

use crate::ports::retrieval::{ContextRetriever, CorpusId};
use greenroom_domain::SessionProfile;
use std::sync::Arc;
use tracing::{debug, warn};

/// Snippets retrieved per configured corpus before prompt assembly
pub const DEFAULT_TOP_K: usize = 5;

/// Retrieved context sections ready for prompt interpolation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextBundle {
    pub resume_context: String,
    pub company_context: String,
}

impl ContextBundle {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.resume_context.is_empty() && self.company_context.is_empty()
    }
}

/// Assembles retrieved context for prompt building
pub struct ContextAssembler<R: ContextRetriever> {
    retriever: Arc<R>,
    top_k: usize,
}

impl<R: ContextRetriever + 'static> ContextAssembler<R> {
    pub fn new(retriever: Arc<R>) -> Self {
        Self {
            retriever,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Assemble context sections for the corpora configured on `profile`.
    ///
    /// Unconfigured corpora yield empty sections without touching the
    /// retriever. Retrieval failures are logged and also yield empty
    /// sections; this method never fails.
    pub async fn assemble(&self, profile: &SessionProfile, query: &str) -> ContextBundle {
        let resume_context = self
            .fetch_section(profile.resume_corpus.as_deref(), query)
            .await;
        let company_context = self
            .fetch_section(profile.company_corpus.as_deref(), query)
            .await;

        if !resume_context.is_empty() || !company_context.is_empty() {
            debug!(
                "Assembled context: resume {} chars, company {} chars",
                resume_context.len(),
                company_context.len()
            );
        }

        ContextBundle {
            resume_context,
            company_context,
        }
    }

    async fn fetch_section(&self, corpus: Option<&str>, query: &str) -> String {
        let Some(corpus) = corpus else {
            return String::new();
        };
        let corpus = CorpusId::from(corpus);
        match self.retriever.retrieve(&corpus, query, self.top_k).await {
            Ok(snippets) => snippets.join("\n\n"),
            Err(e) => {
                warn!("Context retrieval failed for corpus '{}': {}", corpus, e);
                String::new()
            }
        }
    }
}
