//! Session event types emitted by the orchestrators for transport layers
//!
//! These events form the output port from the application layer to whatever
//! surface is driving the session (console REPL today, a socket gateway
//! tomorrow). Transports subscribe through [`InterviewEventSink`] /
//! [`DiscussionEventSink`] and render events however they like; the
//! orchestrators never print.

use chrono::{DateTime, Utc};
use greenroom_domain::{
    DiscussionFeedback, InterviewFeedback, MessageKind, Participant, ParticipantId, SessionId,
    Speaker,
};
use serde::Serialize;

/// Events emitted while an interview session runs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InterviewEvent {
    /// Session activated; carries the opening greeting
    SessionStarted { session_id: SessionId, text: String },
    /// Interviewer produced a new message (question, closing, ...)
    NewMessage {
        session_id: SessionId,
        kind: MessageKind,
        text: String,
        turn_number: u32,
    },
    /// Session completed with evaluated feedback
    SessionEnded {
        session_id: SessionId,
        feedback: InterviewFeedback,
    },
}

/// Events emitted while a group discussion runs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiscussionEvent {
    /// Session activated; carries the topic and the seated roster
    SessionStarted {
        session_id: SessionId,
        topic: String,
        participants: Vec<Participant>,
    },
    /// Someone (moderator, participant, or the human) said something
    NewMessage {
        session_id: SessionId,
        speaker: Speaker,
        speaker_name: String,
        text: String,
        timestamp: DateTime<Utc>,
        turn_number: u32,
    },
    /// The named participant is about to speak
    SpeakerChange {
        session_id: SessionId,
        speaker_id: ParticipantId,
        speaker_name: String,
    },
    /// A participant just finished; the human may interject before the
    /// next scheduled speaker
    InterruptionWindowOpened { session_id: SessionId },
    /// The round wrapped; control is back with the human
    TurnWindowOpened { session_id: SessionId },
    /// The conversation looks ready to conclude (advisory only)
    WindingDown { session_id: SessionId },
    /// Session completed with evaluated feedback
    SessionEnded {
        session_id: SessionId,
        feedback: DiscussionFeedback,
    },
}

/// Output port for interview events
pub trait InterviewEventSink: Send + Sync {
    fn emit(&self, event: InterviewEvent);
}

/// Output port for discussion events
pub trait DiscussionEventSink: Send + Sync {
    fn emit(&self, event: DiscussionEvent);
}

/// No-op sink for headless runs and tests
pub struct NoEvents;

impl InterviewEventSink for NoEvents {
    fn emit(&self, _event: InterviewEvent) {}
}

impl DiscussionEventSink for NoEvents {
    fn emit(&self, _event: DiscussionEvent) {}
}
