//! Append-only session transcript.
//!
//! Turn numbers are assigned here, not by callers: the n-th appended
//! message always carries `turn_number == n` (1-based). That makes the
//! strictly-increasing, gapless numbering a structural property instead
//! of a convention every orchestrator has to remember.

use crate::session::entities::{Message, MessageKind, Speaker};
use serde::{Deserialize, Serialize};

/// Ordered, append-only record of everything said in a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, assigning the next turn number
    pub fn push(
        &mut self,
        speaker: Speaker,
        kind: MessageKind,
        content: impl Into<String>,
    ) -> &Message {
        let turn_number = self.messages.len() as u32 + 1;
        self.messages.push(Message::new(speaker, kind, content, turn_number));
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The last `n` messages, oldest first
    pub fn tail(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// How many questions the interviewer has asked so far
    pub fn question_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.speaker == Speaker::Interviewer && m.kind == MessageKind::Question)
            .count()
    }

    /// How many times the human has spoken
    pub fn human_turn_count(&self) -> usize {
        self.messages.iter().filter(|m| m.speaker.is_human()).count()
    }

    /// How many messages a specific speaker has produced
    pub fn count_by_speaker(&self, speaker: &Speaker) -> usize {
        self.messages.iter().filter(|m| &m.speaker == speaker).count()
    }

    /// Interviewer question / human answer pairs, oldest first.
    ///
    /// Pairs up each question with the human response that followed it;
    /// a question still awaiting its answer is skipped.
    pub fn question_answer_pairs(&self) -> Vec<(&Message, &Message)> {
        let mut pairs = Vec::new();
        let mut pending_question: Option<&Message> = None;
        for message in &self.messages {
            match (&message.speaker, message.kind) {
                (Speaker::Interviewer, MessageKind::Question) => {
                    pending_question = Some(message);
                }
                (Speaker::Human, _) => {
                    if let Some(question) = pending_question.take() {
                        pairs.push((question, message));
                    }
                }
                _ => {}
            }
        }
        pairs
    }
}
