//! Turn scheduling for group discussions.
//!
//! The human always anchors the rhythm: every human utterance reshuffles
//! the synthetic speaking order for the upcoming round, so the bots never
//! settle into a predictable sequence. Each synthetic turn advances the
//! index by one; once every bot has spoken, control wraps back to the
//! human without further bot speech.

use crate::discussion::participant::{Participant, ParticipantId};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Scheduling state for one live discussion
///
/// Invariants: `turn_order` always holds each synthetic participant id
/// exactly once, and `current_turn_index` stays within `[0, len]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnState {
    turn_order: Vec<ParticipantId>,
    current_turn_index: usize,
    /// Set while a synthetic contribution is being generated
    bot_turn_active: bool,
    /// Bumped on every reshuffle; lets an in-flight generation detect
    /// that the human preempted it before its result was applied
    round: u64,
}

impl TurnState {
    /// Build the initial randomized order from the seated participants
    pub fn new<R: Rng + ?Sized>(participants: &[Participant], rng: &mut R) -> Self {
        let mut turn_order: Vec<ParticipantId> = participants
            .iter()
            .filter(|p| !p.is_human)
            .map(|p| p.id.clone())
            .collect();
        turn_order.shuffle(rng);
        Self {
            turn_order,
            current_turn_index: 0,
            bot_turn_active: false,
            round: 0,
        }
    }

    pub fn turn_order(&self) -> &[ParticipantId] {
        &self.turn_order
    }

    pub fn current_turn_index(&self) -> usize {
        self.current_turn_index
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn bot_turn_active(&self) -> bool {
        self.bot_turn_active
    }

    /// Randomize the order for a fresh round. Runs on every human turn.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.turn_order.shuffle(rng);
        self.current_turn_index = 0;
        self.round = self.round.wrapping_add(1);
    }

    /// The participant due to speak, or `None` when the round is spent
    pub fn next_speaker(&self) -> Option<&ParticipantId> {
        self.turn_order.get(self.current_turn_index)
    }

    /// Whether every synthetic participant has spoken this round
    pub fn round_complete(&self) -> bool {
        self.current_turn_index >= self.turn_order.len()
    }

    /// Move past the current speaker. Also used when a failed generation
    /// is skipped, so one bad turn never stalls the round.
    pub fn advance(&mut self) {
        if self.current_turn_index < self.turn_order.len() {
            self.current_turn_index += 1;
        }
    }

    /// Start a new round at the top of the current order, without
    /// reshuffling. Control returns to the human at this point.
    pub fn reset_round(&mut self) {
        self.current_turn_index = 0;
    }

    pub fn begin_bot_turn(&mut self) {
        self.bot_turn_active = true;
    }

    pub fn finish_bot_turn(&mut self) {
        self.bot_turn_active = false;
    }
}
