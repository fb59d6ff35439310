//! Practice session domain.
//!
//! - [`entities::Session`]: a practice session and its lifecycle
//! - [`entities::Message`]: a single transcript message
//! - [`profile::SessionProfile`]: caller-supplied session setup
//! - [`transcript::Transcript`]: append-only message record
//! - [`termination`]: end-of-session text heuristics

pub mod entities;
pub mod profile;
pub mod termination;
pub mod transcript;
