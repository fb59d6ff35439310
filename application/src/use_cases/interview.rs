//! One-on-one interview orchestration.
//!
//! Drives the greeting -> question loop -> closing flow against the
//! generation backend. Generation failures never end a session: every
//! backend call has a deterministic fallback (static greeting,
//! acknowledgment text, default feedback), so the candidate always gets a
//! well-formed reply. Store failures do propagate; a transcript that
//! cannot be persisted is a real error.

use crate::params::InterviewParams;
use crate::ports::events::{InterviewEvent, InterviewEventSink};
use crate::ports::generation::{ChatMessage, GenerationBackend, GenerationRequest};
use crate::ports::retrieval::ContextRetriever;
use crate::ports::session_store::{SessionStore, StoreError};
use crate::use_cases::assemble_context::ContextAssembler;
use greenroom_domain::{
    DomainError, InterviewFeedback, InterviewKind, InterviewPromptTemplate, MessageKind, Session,
    SessionFeedback, SessionStatus, Speaker, Transcript, parse_interview_feedback,
    should_end_interview,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while orchestrating an interview.
///
/// There is no generation variant: backend failures are absorbed by
/// fallback replies and never surface here.
#[derive(Error, Debug)]
pub enum InterviewError {
    #[error("Interview already started")]
    AlreadyStarted,

    #[error("Interview is not active")]
    NotActive,

    #[error("Interview already completed")]
    AlreadyCompleted,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// The interviewer's side of one exchange
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewReply {
    pub text: String,
    pub kind: MessageKind,
    /// Set when the reply is the closing line; the caller should stop
    /// collecting answers and call [`InterviewUseCase::end`]
    pub should_end: bool,
}

/// Use case for running a one-on-one interview session.
///
/// The caller owns the [`Session`] and drives the flow:
/// 1. [`start`](Self::start): greet the candidate, activate the session
/// 2. [`process_user_message`](Self::process_user_message) per answer,
///    until the reply carries `should_end`
/// 3. [`end`](Self::end): evaluate the transcript into feedback
pub struct InterviewUseCase<G, R, S>
where
    G: GenerationBackend + 'static,
    R: ContextRetriever + 'static,
    S: SessionStore + 'static,
{
    backend: Arc<G>,
    assembler: ContextAssembler<R>,
    store: Arc<S>,
    params: InterviewParams,
}

impl<G, R, S> InterviewUseCase<G, R, S>
where
    G: GenerationBackend + 'static,
    R: ContextRetriever + 'static,
    S: SessionStore + 'static,
{
    pub fn new(backend: Arc<G>, retriever: Arc<R>, store: Arc<S>) -> Self {
        Self {
            backend,
            assembler: ContextAssembler::new(retriever),
            store,
            params: InterviewParams::default(),
        }
    }

    pub fn with_params(mut self, params: InterviewParams) -> Self {
        self.params = params;
        self
    }

    /// Cap retrieved chunks per corpus
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.assembler = self.assembler.with_top_k(top_k);
        self
    }

    /// Open the interview: greet the candidate and activate the session.
    ///
    /// The greeting is personalized through the backend when possible and
    /// falls back to the static per-flavor greeting on any failure, so
    /// starting a session cannot fail on generation.
    pub async fn start(
        &self,
        session: &mut Session,
        events: &dyn InterviewEventSink,
    ) -> Result<String, InterviewError> {
        if session.status() != SessionStatus::Created {
            return Err(InterviewError::AlreadyStarted);
        }
        let kind = session.interview_kind()?;

        let greeting = self.generate_greeting(session, kind).await;

        session.activate()?;
        session.record(Speaker::Interviewer, MessageKind::Greeting, &greeting)?;
        self.store.save(session).await?;

        info!("Interview session {} started ({})", session.id(), kind);
        events.emit(InterviewEvent::SessionStarted {
            session_id: session.id().clone(),
            text: greeting.clone(),
        });
        Ok(greeting)
    }

    /// Handle one candidate utterance and produce the interviewer's reply.
    ///
    /// Exactly one branch is taken:
    /// - ready-check: first reply to the greeting confirms readiness ->
    ///   fixed "tell me about yourself" opener, no backend call
    /// - closing: question budget spent or the utterance is an end
    ///   signal -> fixed per-flavor closing, `should_end` set
    /// - otherwise -> generated next question (acknowledgment text when
    ///   generation fails)
    pub async fn process_user_message(
        &self,
        session: &mut Session,
        text: &str,
        events: &dyn InterviewEventSink,
    ) -> Result<InterviewReply, InterviewError> {
        if session.status() != SessionStatus::Active {
            return Err(InterviewError::NotActive);
        }
        let kind = session.interview_kind()?;
        let max_questions = session
            .profile()
            .max_questions
            .unwrap_or(self.params.max_questions);

        session.record(Speaker::Human, MessageKind::Response, text)?;

        let questions_asked = session.transcript().question_count();
        let replies_to_greeting =
            session.transcript().count_by_speaker(&Speaker::Interviewer) == 1;

        let reply = if replies_to_greeting && is_ready_signal(text) {
            InterviewReply {
                text: InterviewPromptTemplate::ready_check_question().to_string(),
                kind: MessageKind::Question,
                should_end: false,
            }
        } else if should_end_interview(questions_asked, max_questions, text) {
            info!(
                "Interview session {} closing after {} questions",
                session.id(),
                questions_asked
            );
            InterviewReply {
                text: InterviewPromptTemplate::closing(kind).to_string(),
                kind: MessageKind::Closing,
                should_end: true,
            }
        } else {
            let text = match self.generate_question(session, kind, text).await {
                Some(question) => question,
                None => InterviewPromptTemplate::acknowledgment().to_string(),
            };
            InterviewReply {
                text,
                kind: MessageKind::Question,
                should_end: false,
            }
        };

        let turn_number = session
            .record(Speaker::Interviewer, reply.kind, &reply.text)?
            .turn_number;
        self.store.save(session).await?;

        events.emit(InterviewEvent::NewMessage {
            session_id: session.id().clone(),
            kind: reply.kind,
            text: reply.text.clone(),
            turn_number,
        });
        Ok(reply)
    }

    /// Close the interview: evaluate the transcript and complete the session.
    ///
    /// A second `end` on the same session fails with
    /// [`InterviewError::AlreadyCompleted`]; feedback is never appended or
    /// regenerated twice. Ending a session with zero candidate answers is
    /// legal and yields the default feedback structure.
    pub async fn end(
        &self,
        session: &mut Session,
        events: &dyn InterviewEventSink,
    ) -> Result<InterviewFeedback, InterviewError> {
        match session.status() {
            SessionStatus::Completed => return Err(InterviewError::AlreadyCompleted),
            SessionStatus::Failed => return Err(InterviewError::NotActive),
            SessionStatus::Created | SessionStatus::Active => {}
        }
        let kind = session.interview_kind()?;

        let request = GenerationRequest::from_prompt(InterviewPromptTemplate::feedback_prompt(
            kind,
            session.profile(),
            session.transcript(),
        ))
        .with_system(InterviewPromptTemplate::feedback_system(kind))
        .with_temperature(self.params.feedback_temperature)
        .with_max_tokens(self.params.max_tokens);

        let feedback = match self.backend.complete(request).await {
            Ok(response) => parse_interview_feedback(&response, kind),
            Err(e) => {
                warn!("Feedback generation failed, using defaults: {}", e);
                InterviewFeedback::default_for(kind)
            }
        };

        session.complete(SessionFeedback::Interview(feedback.clone()))?;
        self.store.save(session).await?;

        info!("Interview session {} completed", session.id());
        events.emit(InterviewEvent::SessionEnded {
            session_id: session.id().clone(),
            feedback: feedback.clone(),
        });
        Ok(feedback)
    }

    /// Greeting via the backend, or the static per-flavor greeting on
    /// any failure or empty output
    async fn generate_greeting(&self, session: &Session, kind: InterviewKind) -> String {
        let profile = session.profile();
        let query = format!(
            "{} at {}",
            profile.role_or_default(),
            profile.company_or_default()
        );
        let context = self.assembler.assemble(profile, &query).await;
        let fallback = InterviewPromptTemplate::static_greeting(kind, profile);

        let request = GenerationRequest::from_prompt(InterviewPromptTemplate::greeting_prompt(
            kind,
            profile,
            &context.resume_context,
            &context.company_context,
        ))
        .with_system(InterviewPromptTemplate::system_instruction(kind))
        .with_temperature(self.params.question_temperature)
        .with_max_tokens(self.params.max_tokens);

        match self.backend.complete(request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("Greeting generation returned empty output, using static greeting");
                fallback
            }
            Err(e) => {
                warn!("Greeting generation failed, using static greeting: {}", e);
                fallback
            }
        }
    }

    /// Next question via the backend, or `None` when generation fails
    async fn generate_question(
        &self,
        session: &Session,
        kind: InterviewKind,
        latest_answer: &str,
    ) -> Option<String> {
        let profile = session.profile();
        let context = self.assembler.assemble(profile, latest_answer).await;
        let system = InterviewPromptTemplate::question_system(
            kind,
            profile,
            &context.resume_context,
            &context.company_context,
        );

        let request = GenerationRequest::from_messages(self.history_window(session.transcript()))
            .with_system(system)
            .with_temperature(self.params.question_temperature)
            .with_max_tokens(self.params.max_tokens);

        match self.backend.complete(request).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                warn!("Question generation returned empty output");
                None
            }
            Err(e) => {
                warn!("Question generation failed: {}", e);
                None
            }
        }
    }

    /// The visible chat history replayed to the backend: everything except
    /// the greeting, windowed to the last `history_window` exchanges plus
    /// the latest answer
    fn history_window(&self, transcript: &Transcript) -> Vec<ChatMessage> {
        let visible: Vec<ChatMessage> = transcript
            .messages()
            .iter()
            .filter(|m| m.kind != MessageKind::Greeting)
            .map(|m| match m.speaker {
                Speaker::Human => ChatMessage::user(&m.content),
                _ => ChatMessage::assistant(&m.content),
            })
            .collect();
        let window = self.params.history_window * 2 + 1;
        let skip = visible.len().saturating_sub(window);
        visible.into_iter().skip(skip).collect()
    }
}

/// Whether the candidate's first reply confirms they are ready to begin
fn is_ready_signal(text: &str) -> bool {
    let lowered = text.to_lowercase();
    ["yes", "ready", "start"]
        .iter()
        .any(|word| lowered.contains(word))
}
