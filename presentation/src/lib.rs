//! Presentation layer for greenroom
//!
//! This crate contains CLI definitions, the console renderer for
//! session events and feedback reports, and the interactive REPLs.
//! The application layer below never prints; everything the user
//! sees on a terminal is decided here.

pub mod cli;
pub mod console;
pub mod repl;

// Re-export commonly used types
pub use cli::commands::{Cli, Command};
pub use console::events::ConsoleEventSink;
pub use console::feedback::FeedbackFormatter;
pub use repl::{DiscussionRepl, InterviewRepl};
