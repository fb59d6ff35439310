//! Group discussion orchestration.
//!
//! Seats a randomized panel of synthetic personalities around one human and
//! schedules their turns. The human anchors the rhythm: every human message
//! reshuffles the speaking order, then [`progress_turn`] walks the bots
//! through the round one at a time until control wraps back to the human.
//!
//! Generation runs without holding the table lock. An end or a human
//! interjection may land while a contribution is in flight; the result is
//! only applied after re-verifying that the session is still live and the
//! round has not moved on.
//!
//! [`progress_turn`]: DiscussionUseCase::progress_turn

use crate::discussion_table::{DiscussionState, DiscussionTable};
use crate::params::DiscussionParams;
use crate::ports::events::{DiscussionEvent, DiscussionEventSink};
use crate::ports::generation::{GenerationBackend, GenerationRequest};
use crate::ports::retrieval::ContextRetriever;
use crate::ports::session_store::{SessionStore, StoreError};
use crate::use_cases::assemble_context::ContextAssembler;
use chrono::{DateTime, Utc};
use greenroom_domain::{
    DiscussionFeedback, DiscussionPromptTemplate, DomainError, MessageKind, Participant,
    ParticipantId, ParticipationStats, Personality, Session, SessionFeedback, SessionId,
    SessionProfile, SessionStatus, Speaker, TurnState, discussion_winding_down,
    format_transcript_lines, parse_discussion_feedback,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while orchestrating a group discussion.
///
/// As with interviews, there is no generation variant: a failed
/// contribution is skipped and a failed evaluation falls back to default
/// feedback.
#[derive(Error, Debug)]
pub enum DiscussionError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Discussion is not active")]
    NotActive,

    #[error("Session is not a group discussion")]
    WrongSessionKind,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// What one [`DiscussionUseCase::progress_turn`] call did
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The scheduled participant spoke. `window_open` is set while
    /// turns remain in the round, marking the brief gap where the
    /// human may interject before the next speaker
    Spoke {
        speaker: ParticipantId,
        window_open: bool,
    },
    /// The scheduled participant's generation failed; their turn was
    /// skipped and the round moved on
    Skipped {
        speaker: ParticipantId,
        window_open: bool,
    },
    /// Every participant has spoken; control is back with the human
    RoundComplete,
    /// The session ended or the human interjected while a contribution
    /// was in flight; nothing was applied
    Preempted,
    /// A contribution is already being generated for this session
    Busy,
}

/// Prompt inputs snapshotted under the lock before generation
enum Step {
    Busy,
    Wrap,
    Speak {
        participant: Participant,
        personality: Personality,
        topic: String,
        profile: SessionProfile,
        recent: String,
        round: u64,
    },
}

/// What the post-generation re-check applied
struct Applied {
    appended: Option<(DateTime<Utc>, u32, String)>,
    round_complete: bool,
    winding_down: bool,
    snapshot: Session,
}

/// Use case for running a multi-party group discussion.
///
/// Sessions are looked up by id in the shared [`DiscussionTable`]; a
/// missing entry is always a handled [`DiscussionError::SessionNotFound`],
/// never a crash. The caller drives the flow:
/// 1. [`start`](Self::start): seat the panel, open with the moderator
/// 2. [`handle_user_message`](Self::handle_user_message) per human
///    message, then [`progress_turn`](Self::progress_turn) until
///    [`TurnOutcome::RoundComplete`]
/// 3. [`end`](Self::end): evaluate participation into feedback
pub struct DiscussionUseCase<G, R, S>
where
    G: GenerationBackend + 'static,
    R: ContextRetriever + 'static,
    S: SessionStore + 'static,
{
    backend: Arc<G>,
    assembler: ContextAssembler<R>,
    store: Arc<S>,
    table: DiscussionTable,
    params: DiscussionParams,
}

impl<G, R, S> DiscussionUseCase<G, R, S>
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
            table: DiscussionTable::new(),
            params: DiscussionParams::default(),
        }
    }

    pub fn with_params(mut self, params: DiscussionParams) -> Self {
        self.params = params;
        self
    }

    /// Cap retrieved chunks per corpus
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.assembler = self.assembler.with_top_k(top_k);
        self
    }

    /// The live-discussion table, shared with anything else that needs
    /// to inspect running sessions
    pub fn table(&self) -> &DiscussionTable {
        &self.table
    }

    /// Seat the panel and open the discussion.
    ///
    /// Samples personalities without replacement, shuffles the initial
    /// speaking order, appends the moderator's opening, and hands the
    /// floor to the human. The moderator opening is templated, so starting
    /// never depends on the backend.
    pub async fn start(
        &self,
        session: Session,
        events: &dyn DiscussionEventSink,
    ) -> Result<(), DiscussionError> {
        if !session.kind().is_discussion() {
            return Err(DiscussionError::WrongSessionKind);
        }
        let mut session = session;
        let topic = session.profile().topic_or_default().to_string();
        let seat_count = session
            .profile()
            .participant_count
            .unwrap_or(self.params.participant_count)
            .clamp(1, Personality::ALL.len());

        // thread_rng is not Send; keep it out of await scope
        let (participants, turn) = {
            let mut rng = rand::thread_rng();
            let mut participants: Vec<Participant> = Personality::sample(seat_count, &mut rng)
                .into_iter()
                .map(Participant::synthetic)
                .collect();
            participants.push(Participant::human());
            let turn = TurnState::new(&participants, &mut rng);
            (participants, turn)
        };

        session.activate()?;
        let opening = DiscussionPromptTemplate::moderator_opening(&topic, &participants);
        let (timestamp, turn_number) = {
            let message = session.record(Speaker::Moderator, MessageKind::Opening, &opening)?;
            (message.timestamp, message.turn_number)
        };
        let session_id = session.id().clone();

        if let Err(e) = self.store.save(&session).await {
            warn!("Failed to persist discussion session {}: {}", session_id, e);
        }

        self.table
            .insert(DiscussionState {
                session,
                topic: topic.clone(),
                participants: participants.clone(),
                turn,
            })
            .await;

        info!(
            "Discussion session {} started: topic '{}', {} synthetic participants",
            session_id,
            topic,
            seat_count
        );
        events.emit(DiscussionEvent::SessionStarted {
            session_id: session_id.clone(),
            topic,
            participants,
        });
        events.emit(DiscussionEvent::NewMessage {
            session_id: session_id.clone(),
            speaker: Speaker::Moderator,
            speaker_name: "Moderator".to_string(),
            text: opening,
            timestamp,
            turn_number,
        });
        events.emit(DiscussionEvent::TurnWindowOpened {
            session_id,
        });
        Ok(())
    }

    /// Record a human contribution and reshuffle the upcoming round.
    ///
    /// Emits nothing; the caller decides when to drive the bots through
    /// [`progress_turn`](Self::progress_turn). Reshuffling bumps the round
    /// counter, so any contribution still in flight for the old round is
    /// dropped when it lands.
    pub async fn handle_user_message(
        &self,
        id: &SessionId,
        text: &str,
    ) -> Result<(), DiscussionError> {
        let snapshot = self
            .table
            .with_state_mut(id, |state| -> Result<Session, DiscussionError> {
                if state.session.status() != SessionStatus::Active {
                    return Err(DiscussionError::NotActive);
                }
                state
                    .session
                    .record(Speaker::Human, MessageKind::Contribution, text)?;
                let mut rng = rand::thread_rng();
                state.turn.reshuffle(&mut rng);
                Ok(state.session.clone())
            })
            .await
            .ok_or_else(|| DiscussionError::SessionNotFound(id.clone()))??;

        debug!("Discussion {}: human message appended, order reshuffled", id);
        if let Err(e) = self.store.save(&snapshot).await {
            warn!("Failed to persist discussion session {}: {}", id, e);
        }
        Ok(())
    }

    /// Drive the next scheduled synthetic turn.
    ///
    /// One call does one step: either a participant speaks (or is skipped
    /// on generation failure) and an interruption window opens, or the
    /// spent round wraps and the turn window returns to the human.
    pub async fn progress_turn(
        &self,
        id: &SessionId,
        events: &dyn DiscussionEventSink,
    ) -> Result<TurnOutcome, DiscussionError> {
        // Phase 1: snapshot the scheduled speaker and prompt inputs
        let step = self
            .table
            .with_state_mut(id, |state| -> Result<Step, DiscussionError> {
                if state.session.status() != SessionStatus::Active {
                    return Err(DiscussionError::NotActive);
                }
                if state.turn.bot_turn_active() {
                    return Ok(Step::Busy);
                }
                let Some(speaker_id) = state.turn.next_speaker().cloned() else {
                    state.turn.reset_round();
                    return Ok(Step::Wrap);
                };
                let participant = state
                    .participants
                    .iter()
                    .find(|p| p.id == speaker_id)
                    .cloned()
                    .ok_or_else(|| DomainError::UnknownParticipant(speaker_id.to_string()))?;
                let personality = participant
                    .personality
                    .ok_or_else(|| DomainError::UnknownParticipant(speaker_id.to_string()))?;
                let recent = format_transcript_lines(
                    state.session.transcript(),
                    &state.participants,
                    self.params.context_window,
                );
                state.turn.begin_bot_turn();
                Ok(Step::Speak {
                    participant,
                    personality,
                    topic: state.topic.clone(),
                    profile: state.session.profile().clone(),
                    recent,
                    round: state.turn.round(),
                })
            })
            .await
            .ok_or_else(|| DiscussionError::SessionNotFound(id.clone()))??;

        let (participant, personality, topic, profile, recent, round) = match step {
            Step::Busy => return Ok(TurnOutcome::Busy),
            Step::Wrap => {
                events.emit(DiscussionEvent::TurnWindowOpened {
                    session_id: id.clone(),
                });
                return Ok(TurnOutcome::RoundComplete);
            }
            Step::Speak {
                participant,
                personality,
                topic,
                profile,
                recent,
                round,
            } => (participant, personality, topic, profile, recent, round),
        };

        // Phase 2: generate without holding the lock
        events.emit(DiscussionEvent::SpeakerChange {
            session_id: id.clone(),
            speaker_id: participant.id.clone(),
            speaker_name: participant.display_name.clone(),
        });

        let context = self.assembler.assemble(&profile, &topic).await;
        let mut system = DiscussionPromptTemplate::participant_system(personality, &topic);
        if !context.company_context.is_empty() {
            system.push_str("\n\nBackground material:\n");
            system.push_str(&context.company_context);
        }
        let request = GenerationRequest::from_prompt(
            DiscussionPromptTemplate::contribution_prompt(&participant, &recent),
        )
        .with_system(system)
        .with_temperature(self.params.bot_temperature)
        .with_max_tokens(self.params.max_tokens);

        let generated = match self.backend.complete(request).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                warn!(
                    "Contribution generation returned empty output for {}, skipping turn",
                    participant.id
                );
                None
            }
            Err(e) => {
                warn!(
                    "Contribution generation failed for {}, skipping turn: {}",
                    participant.id, e
                );
                None
            }
        };

        // Phase 3: re-verify liveness before applying anything
        let applied = self
            .table
            .with_state_mut(id, |state| -> Result<Option<Applied>, DiscussionError> {
                state.turn.finish_bot_turn();
                if state.session.status() != SessionStatus::Active {
                    return Ok(None);
                }
                if state.turn.round() != round {
                    return Ok(None);
                }
                let appended = match &generated {
                    Some(text) => {
                        let message = state.session.record(
                            Speaker::Agent(participant.id.clone()),
                            MessageKind::Contribution,
                            text,
                        )?;
                        Some((message.timestamp, message.turn_number, text.clone()))
                    }
                    None => None,
                };
                state.turn.advance();
                Ok(Some(Applied {
                    appended,
                    round_complete: state.turn.round_complete(),
                    winding_down: discussion_winding_down(state.session.transcript()),
                    snapshot: state.session.clone(),
                }))
            })
            .await;

        let applied = match applied {
            None => {
                debug!("Discussion {} ended while a contribution was in flight", id);
                return Ok(TurnOutcome::Preempted);
            }
            Some(result) => result?,
        };
        let Some(applied) = applied else {
            debug!(
                "Discussion {}: round moved on mid-generation, dropping contribution",
                id
            );
            return Ok(TurnOutcome::Preempted);
        };

        if let Err(e) = self.store.save(&applied.snapshot).await {
            warn!("Failed to persist discussion session {}: {}", id, e);
        }

        let window_open = !applied.round_complete;
        let outcome = match applied.appended {
            Some((timestamp, turn_number, text)) => {
                events.emit(DiscussionEvent::NewMessage {
                    session_id: id.clone(),
                    speaker: Speaker::Agent(participant.id.clone()),
                    speaker_name: participant.display_name.clone(),
                    text,
                    timestamp,
                    turn_number,
                });
                TurnOutcome::Spoke {
                    speaker: participant.id.clone(),
                    window_open,
                }
            }
            None => TurnOutcome::Skipped {
                speaker: participant.id.clone(),
                window_open,
            },
        };

        if applied.winding_down {
            events.emit(DiscussionEvent::WindingDown {
                session_id: id.clone(),
            });
        }
        if window_open {
            events.emit(DiscussionEvent::InterruptionWindowOpened {
                session_id: id.clone(),
            });
        }
        Ok(outcome)
    }

    /// Skip the human's turn and let the next scheduled speaker talk.
    ///
    /// Passing is just driving the schedule without saying anything.
    pub async fn pass_turn(
        &self,
        id: &SessionId,
        events: &dyn DiscussionEventSink,
    ) -> Result<TurnOutcome, DiscussionError> {
        debug!("Discussion {}: human passed the turn", id);
        self.progress_turn(id, events).await
    }

    /// Close the discussion: evict it from the table, evaluate
    /// participation, and complete the session.
    ///
    /// Eviction doubles as the idempotence guard: a second `end` finds no
    /// entry and fails with [`DiscussionError::SessionNotFound`]. Any
    /// contribution still in flight lands on the evicted id and is
    /// dropped.
    pub async fn end(
        &self,
        id: &SessionId,
        events: &dyn DiscussionEventSink,
    ) -> Result<DiscussionFeedback, DiscussionError> {
        let Some(state) = self.table.remove(id).await else {
            return Err(DiscussionError::SessionNotFound(id.clone()));
        };
        let mut session = state.session;
        let stats = ParticipationStats::from_transcript(session.transcript());

        let request = GenerationRequest::from_prompt(DiscussionPromptTemplate::feedback_prompt(
            &state.topic,
            &stats,
            session.transcript(),
            &state.participants,
        ))
        .with_system(DiscussionPromptTemplate::feedback_system())
        .with_temperature(self.params.feedback_temperature)
        .with_max_tokens(self.params.max_tokens);

        let feedback = match self.backend.complete(request).await {
            Ok(response) => parse_discussion_feedback(&response, &stats),
            Err(e) => {
                warn!("Feedback generation failed, using defaults: {}", e);
                DiscussionFeedback::default_for(&stats)
            }
        };

        session.complete(SessionFeedback::Discussion(feedback.clone()))?;
        self.store.save(&session).await?;

        info!("Discussion session {} completed", id);
        events.emit(DiscussionEvent::SessionEnded {
            session_id: id.clone(),
            feedback: feedback.clone(),
        });
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::events::NoEvents;
    use crate::ports::generation::GenerationError;
    use crate::ports::retrieval::{CorpusId, RetrievalError};
    use async_trait::async_trait;
    use std::collections::{BTreeSet, VecDeque};
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockBackend {
        responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    }

    impl MockBackend {
        fn scripted(responses: Vec<Result<String, GenerationError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(VecDeque::from(responses)),
            })
        }
    }

    #[async_trait]
    impl GenerationBackend for MockBackend {
        async fn complete(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::Other("No more responses".to_string())))
        }
    }

    /// Backend that evicts the target session mid-generation, as a
    /// concurrent `end` would
    struct EvictingBackend {
        table: DiscussionTable,
        target: Mutex<Option<SessionId>>,
    }

    #[async_trait]
    impl GenerationBackend for EvictingBackend {
        async fn complete(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
            let target = self.target.lock().unwrap().take();
            if let Some(id) = target {
                self.table.remove(&id).await;
            }
            Ok("Contribution after the end".to_string())
        }
    }

    /// Backend that injects a human message mid-generation, as a
    /// concurrent interjection would
    struct InterjectingBackend {
        table: DiscussionTable,
        target: Mutex<Option<SessionId>>,
    }

    #[async_trait]
    impl GenerationBackend for InterjectingBackend {
        async fn complete(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
            let target = self.target.lock().unwrap().take();
            if let Some(id) = target {
                self.table
                    .with_state_mut(&id, |state| {
                        state
                            .session
                            .record(Speaker::Human, MessageKind::Contribution, "Wait, one thought!")
                            .unwrap();
                        let mut rng = rand::thread_rng();
                        state.turn.reshuffle(&mut rng);
                    })
                    .await
                    .unwrap();
            }
            Ok("Contribution from the old round".to_string())
        }
    }

    struct NullRetriever;

    #[async_trait]
    impl ContextRetriever for NullRetriever {
        async fn retrieve(
            &self,
            _corpus: &CorpusId,
            _query: &str,
            _top_k: usize,
        ) -> Result<Vec<String>, RetrievalError> {
            Ok(Vec::new())
        }
    }

    struct MockStore {
        saves: Mutex<Vec<Session>>,
        fail_saves: bool,
    }

    impl MockStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                saves: Mutex::new(Vec::new()),
                fail_saves: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                saves: Mutex::new(Vec::new()),
                fail_saves: true,
            })
        }
    }

    #[async_trait]
    impl SessionStore for MockStore {
        async fn save(&self, session: &Session) -> Result<(), StoreError> {
            if self.fail_saves {
                return Err(StoreError::Io("disk full".to_string()));
            }
            self.saves.lock().unwrap().push(session.clone());
            Ok(())
        }

        async fn load(&self, id: &SessionId) -> Result<Session, StoreError> {
            self.saves
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|s| s.id() == id)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(id.clone()))
        }

        async fn list(&self) -> Result<Vec<SessionId>, StoreError> {
            Ok(self
                .saves
                .lock()
                .unwrap()
                .iter()
                .map(|s| s.id().clone())
                .collect())
        }

        async fn delete(&self, _id: &SessionId) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<DiscussionEvent>>,
    }

    impl DiscussionEventSink for RecordingSink {
        fn emit(&self, event: DiscussionEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn use_case<G: GenerationBackend + 'static>(
        backend: Arc<G>,
        store: Arc<MockStore>,
    ) -> DiscussionUseCase<G, NullRetriever, MockStore> {
        DiscussionUseCase::new(backend, Arc::new(NullRetriever), store)
    }

    fn discussion_session(topic: &str, participants: usize) -> Session {
        Session::discussion(
            SessionProfile::new()
                .with_topic(topic)
                .with_participant_count(participants),
        )
    }

    /// Drive bots until the round wraps, collecting outcomes
    async fn drive_round<G: GenerationBackend + 'static>(
        use_case: &DiscussionUseCase<G, NullRetriever, MockStore>,
        id: &SessionId,
        events: &dyn DiscussionEventSink,
    ) -> Vec<TurnOutcome> {
        let mut outcomes = Vec::new();
        loop {
            let outcome = use_case.progress_turn(id, events).await.unwrap();
            let done = outcome == TurnOutcome::RoundComplete;
            outcomes.push(outcome);
            if done {
                break;
            }
        }
        outcomes
    }

    fn spoken_ids(outcomes: &[TurnOutcome]) -> BTreeSet<String> {
        outcomes
            .iter()
            .filter_map(|o| match o {
                TurnOutcome::Spoke { speaker, .. } | TurnOutcome::Skipped { speaker, .. } => {
                    Some(speaker.as_str().to_string())
                }
                _ => None,
            })
            .collect()
    }

    // ==================== start Tests ====================

    #[tokio::test]
    async fn test_start_seats_panel_and_opens() {
        let backend = MockBackend::scripted(vec![]);
        let use_case = use_case(backend, MockStore::new());
        let sink = RecordingSink::default();

        let session = discussion_session("Impact of AI on Job Market", 5);
        let id = session.id().clone();
        use_case.start(session, &sink).await.unwrap();

        let events = sink.events.lock().unwrap();
        match &events[0] {
            DiscussionEvent::SessionStarted {
                topic,
                participants,
                ..
            } => {
                assert_eq!(topic, "Impact of AI on Job Market");
                assert_eq!(participants.iter().filter(|p| !p.is_human).count(), 5);
                assert_eq!(participants.iter().filter(|p| p.is_human).count(), 1);
            }
            other => panic!("Expected SessionStarted, got {:?}", other),
        }
        match &events[1] {
            DiscussionEvent::NewMessage { speaker, text, .. } => {
                assert_eq!(*speaker, Speaker::Moderator);
                assert!(text.contains("Impact of AI on Job Market"));
            }
            other => panic!("Expected moderator NewMessage, got {:?}", other),
        }
        assert!(matches!(events[2], DiscussionEvent::TurnWindowOpened { .. }));

        // Turn order holds exactly the synthetic participants
        let order_len = use_case
            .table()
            .with_state(&id, |s| s.turn.turn_order().len())
            .await
            .unwrap();
        assert_eq!(order_len, 5);
    }

    #[tokio::test]
    async fn test_start_rejects_interview_sessions() {
        let backend = MockBackend::scripted(vec![]);
        let use_case = use_case(backend, MockStore::new());

        let session = Session::interview(
            greenroom_domain::InterviewKind::General,
            SessionProfile::default(),
        );
        let err = use_case.start(session, &NoEvents).await.unwrap_err();
        assert!(matches!(err, DiscussionError::WrongSessionKind));
    }

    #[tokio::test]
    async fn test_start_survives_store_outage() {
        let backend = MockBackend::scripted(vec![]);
        let use_case = use_case(backend, MockStore::failing());

        let session = discussion_session("Remote work", 3);
        let id = session.id().clone();
        use_case.start(session, &NoEvents).await.unwrap();
        assert!(use_case.table().contains(&id).await);
    }

    // ==================== Turn scheduling Tests ====================

    #[tokio::test]
    async fn test_round_covers_every_participant_once() {
        let backend = MockBackend::scripted(vec![
            Ok("First take.".to_string()),
            Ok("Second take.".to_string()),
            Ok("Third take.".to_string()),
        ]);
        let use_case = use_case(backend, MockStore::new());
        let sink = RecordingSink::default();

        let session = discussion_session("Remote work", 3);
        let id = session.id().clone();
        use_case.start(session, &sink).await.unwrap();

        use_case
            .handle_user_message(&id, "I think remote work increases focus.")
            .await
            .unwrap();
        let outcomes = drive_round(&use_case, &id, &sink).await;

        // Three speakers, each exactly once, then the wrap
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[3], TurnOutcome::RoundComplete);
        assert!(outcomes[..3]
            .iter()
            .all(|o| matches!(o, TurnOutcome::Spoke { .. })));
        // The window closes with the last speaker of the round
        assert!(matches!(
            outcomes[0],
            TurnOutcome::Spoke {
                window_open: true,
                ..
            }
        ));
        assert!(matches!(
            outcomes[2],
            TurnOutcome::Spoke {
                window_open: false,
                ..
            }
        ));

        let synthetic: BTreeSet<String> = use_case
            .table()
            .with_state(&id, |s| {
                s.turn
                    .turn_order()
                    .iter()
                    .map(|p| p.as_str().to_string())
                    .collect()
            })
            .await
            .unwrap();
        assert_eq!(spoken_ids(&outcomes), synthetic);

        // Interruption windows between turns, turn window at the wrap
        let events = sink.events.lock().unwrap();
        let interruptions = events
            .iter()
            .filter(|e| matches!(e, DiscussionEvent::InterruptionWindowOpened { .. }))
            .count();
        assert_eq!(interruptions, 2);
        assert!(matches!(
            events.last(),
            Some(DiscussionEvent::TurnWindowOpened { .. })
        ));
    }

    #[tokio::test]
    async fn test_human_message_reshuffles_and_restarts_round() {
        let backend = MockBackend::scripted(vec![
            Ok("Round one, speaker one.".to_string()),
            Ok("Round one, speaker two.".to_string()),
            Ok("Round two, speaker one.".to_string()),
            Ok("Round two, speaker two.".to_string()),
        ]);
        let use_case = use_case(backend, MockStore::new());

        let session = discussion_session("Remote work", 2);
        let id = session.id().clone();
        use_case.start(session, &NoEvents).await.unwrap();

        use_case.handle_user_message(&id, "Opening thought.").await.unwrap();
        let first = drive_round(&use_case, &id, &NoEvents).await;
        assert_eq!(first.len(), 3);

        use_case.handle_user_message(&id, "Follow-up thought.").await.unwrap();
        let (index, round) = use_case
            .table()
            .with_state(&id, |s| (s.turn.current_turn_index(), s.turn.round()))
            .await
            .unwrap();
        assert_eq!(index, 0);
        assert_eq!(round, 2);

        let second = drive_round(&use_case, &id, &NoEvents).await;
        assert_eq!(spoken_ids(&second).len(), 2);

        // Two human messages and four contributions on the record
        let (humans, bots) = use_case
            .table()
            .with_state(&id, |s| {
                let t = s.session.transcript();
                (
                    t.human_turn_count(),
                    t.messages()
                        .iter()
                        .filter(|m| m.speaker.is_synthetic())
                        .count(),
                )
            })
            .await
            .unwrap();
        assert_eq!(humans, 2);
        assert_eq!(bots, 4);
    }

    #[tokio::test]
    async fn test_failed_generation_is_skipped_but_round_continues() {
        let backend = MockBackend::scripted(vec![
            Ok("Fine point.".to_string()),
            Err(GenerationError::Timeout),
            Ok("Closing point.".to_string()),
        ]);
        let use_case = use_case(backend, MockStore::new());

        let session = discussion_session("Remote work", 3);
        let id = session.id().clone();
        use_case.start(session, &NoEvents).await.unwrap();
        use_case.handle_user_message(&id, "Kick us off.").await.unwrap();

        let outcomes = drive_round(&use_case, &id, &NoEvents).await;

        assert_eq!(outcomes.len(), 4);
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, TurnOutcome::Skipped { .. }))
                .count(),
            1
        );
        // All three scheduled speakers got their turn, skipped or not
        assert_eq!(spoken_ids(&outcomes).len(), 3);

        let bots = use_case
            .table()
            .with_state(&id, |s| {
                s.session
                    .transcript()
                    .messages()
                    .iter()
                    .filter(|m| m.speaker.is_synthetic())
                    .count()
            })
            .await
            .unwrap();
        assert_eq!(bots, 2);
    }

    #[tokio::test]
    async fn test_busy_guard_blocks_reentrant_turns() {
        let backend = MockBackend::scripted(vec![]);
        let use_case = use_case(backend, MockStore::new());

        let session = discussion_session("Remote work", 2);
        let id = session.id().clone();
        use_case.start(session, &NoEvents).await.unwrap();

        use_case
            .table()
            .with_state_mut(&id, |s| s.turn.begin_bot_turn())
            .await
            .unwrap();
        let outcome = use_case.progress_turn(&id, &NoEvents).await.unwrap();
        assert_eq!(outcome, TurnOutcome::Busy);
    }

    #[tokio::test]
    async fn test_pass_turn_drives_the_panel_without_a_message() {
        let backend = MockBackend::scripted(vec![Ok("Starting us off.".to_string())]);
        let use_case = use_case(backend, MockStore::new());

        let session = discussion_session("Remote work", 1);
        let id = session.id().clone();
        use_case.start(session, &NoEvents).await.unwrap();

        let outcome = use_case.pass_turn(&id, &NoEvents).await.unwrap();
        assert!(matches!(
            outcome,
            TurnOutcome::Spoke {
                window_open: false,
                ..
            }
        ));

        let humans = use_case
            .table()
            .with_state(&id, |s| s.session.transcript().human_turn_count())
            .await
            .unwrap();
        assert_eq!(humans, 0);
    }

    #[tokio::test]
    async fn test_unknown_session_is_handled() {
        let backend = MockBackend::scripted(vec![]);
        let use_case = use_case(backend, MockStore::new());
        let absent = SessionId::generate();

        let err = use_case
            .handle_user_message(&absent, "anyone there?")
            .await
            .unwrap_err();
        assert!(matches!(err, DiscussionError::SessionNotFound(_)));

        let err = use_case.progress_turn(&absent, &NoEvents).await.unwrap_err();
        assert!(matches!(err, DiscussionError::SessionNotFound(_)));

        let err = use_case.end(&absent, &NoEvents).await.unwrap_err();
        assert!(matches!(err, DiscussionError::SessionNotFound(_)));
    }

    // ==================== Concurrency Tests ====================

    #[tokio::test]
    async fn test_end_during_generation_drops_contribution() {
        let store = MockStore::new();
        let shared_backend = Arc::new(EvictingBackend {
            table: DiscussionTable::new(),
            target: Mutex::new(None),
        });
        // The use case must share the backend's table handle
        let mut use_case = use_case(Arc::clone(&shared_backend), store);
        use_case.table = shared_backend.table.clone();

        let session = discussion_session("Remote work", 2);
        let id = session.id().clone();
        use_case.start(session, &NoEvents).await.unwrap();
        use_case.handle_user_message(&id, "Let's begin.").await.unwrap();
        *shared_backend.target.lock().unwrap() = Some(id.clone());

        let outcome = use_case.progress_turn(&id, &NoEvents).await.unwrap();
        assert_eq!(outcome, TurnOutcome::Preempted);
        assert!(!use_case.table().contains(&id).await);
    }

    #[tokio::test]
    async fn test_interjection_during_generation_drops_stale_contribution() {
        let store = MockStore::new();
        let shared_backend = Arc::new(InterjectingBackend {
            table: DiscussionTable::new(),
            target: Mutex::new(None),
        });
        let mut use_case = use_case(Arc::clone(&shared_backend), store);
        use_case.table = shared_backend.table.clone();

        let session = discussion_session("Remote work", 2);
        let id = session.id().clone();
        use_case.start(session, &NoEvents).await.unwrap();
        use_case.handle_user_message(&id, "Let's begin.").await.unwrap();
        *shared_backend.target.lock().unwrap() = Some(id.clone());

        let outcome = use_case.progress_turn(&id, &NoEvents).await.unwrap();
        assert_eq!(outcome, TurnOutcome::Preempted);

        // The stale contribution never landed; the fresh round is intact
        let (bots, index, busy) = use_case
            .table()
            .with_state(&id, |s| {
                (
                    s.session
                        .transcript()
                        .messages()
                        .iter()
                        .filter(|m| m.speaker.is_synthetic())
                        .count(),
                    s.turn.current_turn_index(),
                    s.turn.bot_turn_active(),
                )
            })
            .await
            .unwrap();
        assert_eq!(bots, 0);
        assert_eq!(index, 0);
        assert!(!busy);
    }

    // ==================== end Tests ====================

    #[tokio::test]
    async fn test_end_evaluates_and_evicts() {
        let backend = MockBackend::scripted(vec![
            Ok("One contribution.".to_string()),
            Ok("no json here".to_string()),
        ]);
        let store = MockStore::new();
        let use_case = use_case(backend, Arc::clone(&store));
        let sink = RecordingSink::default();

        let session = discussion_session("Remote work", 1);
        let id = session.id().clone();
        use_case.start(session, &sink).await.unwrap();
        use_case.handle_user_message(&id, "My main point.").await.unwrap();
        drive_round(&use_case, &id, &sink).await;

        let feedback = use_case.end(&id, &sink).await.unwrap();

        assert!(feedback.scores_in_range());
        assert!(!use_case.table().contains(&id).await);
        assert!(matches!(
            sink.events.lock().unwrap().last(),
            Some(DiscussionEvent::SessionEnded { .. })
        ));

        // The persisted snapshot is terminal and carries the feedback
        let stored = store.load(&id).await.unwrap();
        assert_eq!(stored.status(), SessionStatus::Completed);
        assert!(stored.feedback().is_some());

        let err = use_case.end(&id, &sink).await.unwrap_err();
        assert!(matches!(err, DiscussionError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_end_propagates_store_failure() {
        let backend = MockBackend::scripted(vec![Ok("whatever".to_string())]);
        let use_case = use_case(backend, MockStore::failing());

        let session = discussion_session("Remote work", 1);
        let id = session.id().clone();
        use_case.start(session, &NoEvents).await.unwrap();

        let err = use_case.end(&id, &NoEvents).await.unwrap_err();
        assert!(matches!(err, DiscussionError::Store(_)));
    }
}
