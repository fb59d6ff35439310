//! Session domain entities

use crate::core::error::DomainError;
use crate::discussion::participant::ParticipantId;
use crate::feedback::entities::SessionFeedback;
use crate::session::profile::SessionProfile;
use crate::session::transcript::Transcript;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Unique session identifier (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flavor of a one-on-one interview session (Value Object)
///
/// Each flavor carries its own greeting, closing, and interviewer
/// instruction. Unrecognized flavors fall back to [`InterviewKind::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterviewKind {
    Technical,
    Hr,
    Salary,
    General,
}

impl InterviewKind {
    /// Get the string identifier for this interview flavor
    pub fn as_str(&self) -> &str {
        match self {
            InterviewKind::Technical => "technical",
            InterviewKind::Hr => "hr",
            InterviewKind::Salary => "salary",
            InterviewKind::General => "general",
        }
    }

    /// Human-readable label for console output
    pub fn label(&self) -> &str {
        match self {
            InterviewKind::Technical => "Technical Interview",
            InterviewKind::Hr => "HR Interview",
            InterviewKind::Salary => "Salary Negotiation",
            InterviewKind::General => "Interview",
        }
    }
}

impl Default for InterviewKind {
    fn default() -> Self {
        InterviewKind::General
    }
}

impl std::fmt::Display for InterviewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for InterviewKind {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "technical" | "tech" => InterviewKind::Technical,
            "hr" => InterviewKind::Hr,
            "salary" => InterviewKind::Salary,
            _ => InterviewKind::General,
        }
    }
}

impl std::str::FromStr for InterviewKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl Serialize for InterviewKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InterviewKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// What kind of practice session this is (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// One-on-one interview with an AI interviewer
    Interview(InterviewKind),
    /// Multi-party group discussion with synthetic participants
    GroupDiscussion,
}

impl SessionKind {
    pub fn as_str(&self) -> &str {
        match self {
            SessionKind::Interview(kind) => kind.as_str(),
            SessionKind::GroupDiscussion => "gd",
        }
    }

    pub fn is_interview(&self) -> bool {
        matches!(self, SessionKind::Interview(_))
    }

    pub fn is_discussion(&self) -> bool {
        matches!(self, SessionKind::GroupDiscussion)
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for SessionKind {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "gd" | "discussion" | "group_discussion" => SessionKind::GroupDiscussion,
            other => SessionKind::Interview(InterviewKind::from(other)),
        }
    }
}

impl std::str::FromStr for SessionKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl Serialize for SessionKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SessionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// Lifecycle status of a session (Value Object)
///
/// Legal transitions: `created -> active -> completed | failed`.
/// A session may also complete or fail straight from `created`.
/// Terminal statuses never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Created,
    Active,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Created => "created",
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }

    /// Completed and failed sessions never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }

    /// Check whether moving to `next` is a legal lifecycle transition
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        match (self, next) {
            (SessionStatus::Created, SessionStatus::Active) => true,
            (SessionStatus::Created, SessionStatus::Completed) => true,
            (SessionStatus::Created, SessionStatus::Failed) => true,
            (SessionStatus::Active, SessionStatus::Completed) => true,
            (SessionStatus::Active, SessionStatus::Failed) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who produced a message (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Speaker {
    /// The practicing human
    Human,
    /// The interviewer persona in one-on-one sessions
    Interviewer,
    /// The moderator persona in group discussions
    Moderator,
    /// A synthetic discussion participant
    Agent(ParticipantId),
}

impl Speaker {
    /// Stable string identifier, used in events and persisted transcripts
    pub fn id(&self) -> &str {
        match self {
            Speaker::Human => "human",
            Speaker::Interviewer => "interviewer",
            Speaker::Moderator => "moderator",
            Speaker::Agent(id) => id.as_str(),
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Speaker::Human)
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Speaker::Agent(_))
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl From<&str> for Speaker {
    fn from(s: &str) -> Self {
        match s {
            "human" => Speaker::Human,
            "interviewer" => Speaker::Interviewer,
            "moderator" => Speaker::Moderator,
            other => Speaker::Agent(ParticipantId::from(other)),
        }
    }
}

impl std::str::FromStr for Speaker {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl Serialize for Speaker {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Speaker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// Conversational role of a message within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Interviewer's opening message
    Greeting,
    /// An interviewer question
    Question,
    /// Interviewer's wrap-up message
    Closing,
    /// A human answer, or a generic acknowledgment
    Response,
    /// Moderator's discussion opener
    Opening,
    /// A discussion utterance from any participant
    Contribution,
}

/// A single transcript message (Entity)
///
/// Messages are immutable once appended. `turn_number` is assigned by the
/// transcript and is strictly increasing, gapless, starting at 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub speaker: Speaker,
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub turn_number: u32,
}

impl Message {
    pub fn new(
        speaker: Speaker,
        kind: MessageKind,
        content: impl Into<String>,
        turn_number: u32,
    ) -> Self {
        Self {
            speaker,
            kind,
            content: content.into(),
            timestamp: Utc::now(),
            turn_number,
        }
    }
}

/// A practice session (Entity, aggregate root)
///
/// Owns the transcript and the lifecycle status. All mutation goes through
/// methods that enforce the lifecycle rules, so a terminal session can
/// never gain messages or change status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    kind: SessionKind,
    status: SessionStatus,
    profile: SessionProfile,
    transcript: Transcript,
    feedback: Option<SessionFeedback>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(kind: SessionKind, profile: SessionProfile) -> Self {
        Self {
            id: SessionId::generate(),
            kind,
            status: SessionStatus::Created,
            profile,
            transcript: Transcript::new(),
            feedback: None,
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
        }
    }

    pub fn interview(kind: InterviewKind, profile: SessionProfile) -> Self {
        Self::new(SessionKind::Interview(kind), profile)
    }

    pub fn discussion(profile: SessionProfile) -> Self {
        Self::new(SessionKind::GroupDiscussion, profile)
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn feedback(&self) -> Option<&SessionFeedback> {
        self.feedback.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// The interview flavor, or an error for discussion sessions
    pub fn interview_kind(&self) -> Result<InterviewKind, DomainError> {
        match self.kind {
            SessionKind::Interview(kind) => Ok(kind),
            SessionKind::GroupDiscussion => Err(DomainError::NotAnInterview),
        }
    }

    /// Append a message to the transcript.
    ///
    /// Fails with [`DomainError::SessionClosed`] once the session is terminal.
    pub fn record(
        &mut self,
        speaker: Speaker,
        kind: MessageKind,
        content: impl Into<String>,
    ) -> Result<&Message, DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::SessionClosed);
        }
        Ok(self.transcript.push(speaker, kind, content))
    }

    /// Transition `created -> active`
    pub fn activate(&mut self) -> Result<(), DomainError> {
        self.transition(SessionStatus::Active)?;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Transition to `completed`, attaching the final feedback
    pub fn complete(&mut self, feedback: SessionFeedback) -> Result<(), DomainError> {
        self.transition(SessionStatus::Completed)?;
        self.feedback = Some(feedback);
        self.ended_at = Some(Utc::now());
        Ok(())
    }

    /// Transition to `failed`
    pub fn fail(&mut self) -> Result<(), DomainError> {
        self.transition(SessionStatus::Failed)?;
        self.ended_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, next: SessionStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn technical_session() -> Session {
        Session::interview(InterviewKind::Technical, SessionProfile::default())
    }

    #[test]
    fn test_session_kind_roundtrip() {
        for s in ["technical", "hr", "salary", "general", "gd"] {
            let kind: SessionKind = s.parse().unwrap();
            assert_eq!(kind.to_string(), s);
        }
    }

    #[test]
    fn test_unknown_interview_kind_falls_back_to_general() {
        let kind: InterviewKind = "case-study".parse().unwrap();
        assert_eq!(kind, InterviewKind::General);
    }

    #[test]
    fn test_lifecycle_happy_path() {
        let mut session = technical_session();
        assert_eq!(session.status(), SessionStatus::Created);

        session.activate().unwrap();
        assert_eq!(session.status(), SessionStatus::Active);
        assert!(session.started_at().is_some());

        session
            .complete(SessionFeedback::Interview(Default::default()))
            .unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert!(session.ended_at().is_some());
    }

    #[test]
    fn test_complete_from_created_is_legal() {
        // Ending a session nobody started is allowed
        let mut session = technical_session();
        session
            .complete(SessionFeedback::Interview(Default::default()))
            .unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
    }

    #[test]
    fn test_terminal_session_rejects_reactivation() {
        let mut session = technical_session();
        session.activate().unwrap();
        session
            .complete(SessionFeedback::Interview(Default::default()))
            .unwrap();

        let err = session.activate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[test]
    fn test_terminal_session_rejects_new_messages() {
        let mut session = technical_session();
        session.activate().unwrap();
        session
            .record(Speaker::Interviewer, MessageKind::Greeting, "Welcome")
            .unwrap();
        session
            .complete(SessionFeedback::Interview(Default::default()))
            .unwrap();

        let err = session
            .record(Speaker::Human, MessageKind::Response, "One more thing")
            .unwrap_err();
        assert_eq!(err, DomainError::SessionClosed);
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn test_interview_kind_guard() {
        let session = Session::discussion(SessionProfile::default());
        assert_eq!(
            session.interview_kind().unwrap_err(),
            DomainError::NotAnInterview
        );
    }

    #[test]
    fn test_speaker_serde_forms() {
        let human = serde_json::to_string(&Speaker::Human).unwrap();
        assert_eq!(human, "\"human\"");

        let agent: Speaker = serde_json::from_str("\"agent_supportive\"").unwrap();
        assert!(agent.is_synthetic());
        assert_eq!(agent.id(), "agent_supportive");
    }
}
