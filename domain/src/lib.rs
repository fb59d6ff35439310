//! Domain layer for greenroom
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Sessions
//!
//! A [`session::entities::Session`] is one practice conversation (either a
//! one-on-one interview or a multi-party group discussion) with a strict
//! lifecycle (`created -> active -> completed | failed`) and an append-only
//! transcript whose turn numbers are gapless from 1.
//!
//! ## Group Discussions
//!
//! Group discussions seat one human alongside synthetic participants drawn
//! from a closed personality roster. [`discussion::turn::TurnState`] holds
//! the scheduling rhythm: every human utterance reshuffles the synthetic
//! speaking order, each bot speaks once, then control wraps back to the
//! human.
//!
//! ## Feedback
//!
//! Sessions end with a scored feedback structure. Free-form model output is
//! turned into that structure through a single parse-with-fallback seam in
//! [`feedback::parsing`], so a misbehaving backend can never produce a
//! malformed report.

pub mod core;
pub mod discussion;
pub mod feedback;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use crate::core::error::DomainError;
pub use discussion::{Participant, ParticipantId, Personality, PersonalityProfile, TurnState};
pub use feedback::{
    DiscussionFeedback, InterviewFeedback, ParticipationStats, SessionFeedback,
    extract_json_object, parse_discussion_feedback, parse_interview_feedback,
};
pub use prompt::{DiscussionPromptTemplate, InterviewPromptTemplate, format_transcript_lines};
pub use session::entities::{
    InterviewKind, Message, MessageKind, Session, SessionId, SessionKind, SessionStatus, Speaker,
};
pub use session::profile::SessionProfile;
pub use session::termination::{discussion_winding_down, is_end_signal, should_end_interview};
pub use session::transcript::Transcript;
