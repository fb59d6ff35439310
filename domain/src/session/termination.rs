//! End-of-session heuristics.
//!
//! These functions decide when a session should wrap up based on plain
//! text signals. They are pure domain logic: no I/O, no session
//! management, just counting and substring matching.
//!
//! # Functions
//!
//! | Function | Use Case | Signal |
//! |----------|----------|--------|
//! | [`is_end_signal`] | Interview answers | Short utterance containing an end phrase |
//! | [`should_end_interview`] | Interview flow | Question budget reached, or end signal |
//! | [`discussion_winding_down`] | Group discussions | Concluding phrases late in the discussion |

use crate::session::transcript::Transcript;

/// Phrases that signal the candidate wants to stop
const END_SIGNAL_PHRASES: [&str; 4] =
    ["thank you", "that's all", "no more questions", "i'm done"];

/// Phrases that suggest a discussion is naturally concluding
const CONCLUSION_PHRASES: [&str; 7] = [
    "in conclusion",
    "to summarize",
    "overall",
    "in summary",
    "final thoughts",
    "to wrap up",
    "all things considered",
];

/// An utterance only counts as an end signal when it is short.
const END_SIGNAL_MAX_WORDS: usize = 6;

/// A discussion is too young to be winding down before this many messages.
const CONCLUSION_MIN_MESSAGES: usize = 10;

/// How many trailing messages to scan for concluding phrases.
const CONCLUSION_SCAN_WINDOW: usize = 3;

/// Check whether a candidate utterance signals they are done.
///
/// Only short utterances qualify: "thank you, that's all from me" is a
/// goodbye, while a seven-word answer that happens to contain
/// "thank you" is still an answer.
pub fn is_end_signal(utterance: &str) -> bool {
    let word_count = utterance.split_whitespace().count();
    if word_count >= END_SIGNAL_MAX_WORDS {
        return false;
    }
    let lowered = utterance.to_lowercase();
    END_SIGNAL_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

/// Decide whether the interview should move to its closing.
///
/// Ends when the question budget is spent, or when the candidate's
/// latest answer is an end signal. The two conditions are checked
/// together, so the caller takes exactly one branch: closing or next
/// question, never both.
pub fn should_end_interview(
    question_count: usize,
    max_questions: usize,
    latest_answer: &str,
) -> bool {
    question_count >= max_questions || is_end_signal(latest_answer)
}

/// Check whether a discussion sounds like it is naturally concluding.
///
/// Advisory only: callers may surface a hint, but the discussion keeps
/// going until someone explicitly ends it. Young discussions (fewer
/// than ten messages) never qualify.
pub fn discussion_winding_down(transcript: &Transcript) -> bool {
    if transcript.len() < CONCLUSION_MIN_MESSAGES {
        return false;
    }
    transcript.tail(CONCLUSION_SCAN_WINDOW).iter().any(|message| {
        let lowered = message.content.to_lowercase();
        CONCLUSION_PHRASES.iter().any(|phrase| lowered.contains(phrase))
    })
}
