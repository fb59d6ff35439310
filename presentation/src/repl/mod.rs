//! Interactive REPL module
//!
//! Readline-based session loops: one for interviews, one for group
//! discussions. Both follow the same shape as any long-lived prompt:
//! load history, print a welcome box, read lines, dispatch slash
//! commands, save history on the way out.

mod discussion;
mod interview;

pub use discussion::DiscussionRepl;
pub use interview::InterviewRepl;

use std::path::PathBuf;

/// Default readline history location, shared by both REPLs
pub(crate) fn default_history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("greenroom").join("history.txt"))
}
