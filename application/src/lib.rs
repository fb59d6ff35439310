//! Application layer for greenroom
//!
//! This crate contains use cases, port definitions, and session tuning
//! parameters. It depends only on the domain layer; adapters for the ports
//! live in the infrastructure layer.

pub mod discussion_table;
pub mod params;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use discussion_table::{DiscussionState, DiscussionTable};
pub use params::{DiscussionParams, InterviewParams};
pub use ports::{
    events::{DiscussionEvent, DiscussionEventSink, InterviewEvent, InterviewEventSink, NoEvents},
    generation::{ChatMessage, ChatRole, GenerationBackend, GenerationError, GenerationRequest},
    retrieval::{ContextRetriever, CorpusId, RetrievalError},
    session_store::{SessionStore, StoreError},
};
pub use use_cases::assemble_context::{ContextAssembler, ContextBundle};
pub use use_cases::discussion::{DiscussionError, DiscussionUseCase, TurnOutcome};
pub use use_cases::interview::{InterviewError, InterviewReply, InterviewUseCase};
