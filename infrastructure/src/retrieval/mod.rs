//! Context retrieval adapters

pub mod dir_retriever;

pub use dir_retriever::{DirCorpusRetriever, StaticRetriever};
