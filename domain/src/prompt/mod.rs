//! Prompt domain
//!
//! Templates for every generation call the orchestrators make: interviewer
//! greetings and questions, synthetic participant contributions, and the
//! feedback JSON requests.

mod discussion;
mod interview;

pub use discussion::{DiscussionPromptTemplate, format_transcript_lines};
pub use interview::InterviewPromptTemplate;
