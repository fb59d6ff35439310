//! Console rendering module
//!
//! Colored terminal output for session events and feedback reports.

pub mod events;
pub mod feedback;

pub use events::ConsoleEventSink;
pub use feedback::FeedbackFormatter;
