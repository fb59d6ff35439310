//! Group discussion domain.
//!
//! - [`participant::Participant`]: a seated human or synthetic participant
//! - [`participant::Personality`]: the closed synthetic personality roster
//! - [`turn::TurnState`]: who speaks next, and the reshuffle-per-human-turn rhythm

pub mod participant;
pub mod turn;

pub use participant::{Participant, ParticipantId, Personality, PersonalityProfile};
pub use turn::TurnState;
