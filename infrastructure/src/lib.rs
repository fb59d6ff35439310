//! Infrastructure layer for greenroom
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod providers;
pub mod retrieval;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use providers::ChatCompletionsBackend;
pub use retrieval::{DirCorpusRetriever, StaticRetriever};
pub use store::{FileSessionStore, MemorySessionStore};
