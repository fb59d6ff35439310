//! Tunable parameters for the orchestrators.
//!
//! Defaults match the shipped console experience; the configuration layer can
//! override any of them before the use cases are constructed.

use greenroom_domain::Personality;

/// Knobs for the one-on-one interview flow
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewParams {
    /// Questions asked before the interviewer closes on its own
    pub max_questions: usize,
    /// Question/answer pairs of visible history replayed to the backend
    pub history_window: usize,
    /// Sampling temperature for greetings and questions
    pub question_temperature: f32,
    /// Sampling temperature for feedback evaluation
    pub feedback_temperature: f32,
    /// Token cap for every generation
    pub max_tokens: u32,
}

impl Default for InterviewParams {
    fn default() -> Self {
        Self {
            max_questions: 8,
            history_window: 3,
            question_temperature: 0.7,
            feedback_temperature: 0.3,
            max_tokens: 2048,
        }
    }
}

impl InterviewParams {
    pub fn with_max_questions(mut self, max_questions: usize) -> Self {
        self.max_questions = max_questions;
        self
    }
}

/// Knobs for the group discussion flow
#[derive(Debug, Clone, PartialEq)]
pub struct DiscussionParams {
    /// Synthetic participants seated at session start
    pub participant_count: usize,
    /// Transcript lines replayed to the backend per contribution
    pub context_window: usize,
    /// Sampling temperature for participant contributions
    pub bot_temperature: f32,
    /// Sampling temperature for feedback evaluation
    pub feedback_temperature: f32,
    /// Token cap for every generation
    pub max_tokens: u32,
}

impl Default for DiscussionParams {
    fn default() -> Self {
        Self {
            participant_count: 4,
            context_window: 6,
            bot_temperature: 0.8,
            feedback_temperature: 0.3,
            max_tokens: 2048,
        }
    }
}

impl DiscussionParams {
    pub fn with_participant_count(mut self, participant_count: usize) -> Self {
        self.participant_count = participant_count;
        self
    }

    /// Requested roster size, clamped to what the personality pool can seat
    pub fn seat_count(&self) -> usize {
        self.participant_count.clamp(1, Personality::ALL.len())
    }
}
