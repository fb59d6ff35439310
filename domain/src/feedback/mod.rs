//! Session feedback domain.
//!
//! - [`entities::InterviewFeedback`] / [`entities::DiscussionFeedback`]: the scored contracts
//! - [`parsing`]: parse-with-fallback over raw generation output

pub mod entities;
pub mod parsing;

pub use entities::{DiscussionFeedback, InterviewFeedback, ParticipationStats, SessionFeedback};
pub use parsing::{extract_json_object, parse_discussion_feedback, parse_interview_feedback};
