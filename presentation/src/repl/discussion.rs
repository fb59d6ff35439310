//! REPL for group discussion sessions
//!
//! The rhythm here mirrors the discussion orchestrator's schedule: the
//! human speaks at the main prompt, the synthetic panel runs a round,
//! and between synthetic turns a short secondary prompt opens where
//! pressing Enter stays quiet and typing interjects. An interjection
//! reshuffles the schedule, so the round restarts around whatever the
//! human just said.

use crate::console::events::ConsoleEventSink;
use crate::repl::default_history_path;
use greenroom_application::{
    ContextRetriever, DiscussionError, DiscussionParams, DiscussionUseCase, GenerationBackend,
    SessionStore, TurnOutcome,
};
use greenroom_domain::{Session, SessionId};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;

/// What the drive loop decided the outer loop should do next
enum RoundExit {
    /// Round over (or parked); prompt the human again
    Prompt,
    /// Session is gone; leave the REPL
    Quit,
}

/// Interactive group discussion REPL
pub struct DiscussionRepl<G, R, S>
where
    G: GenerationBackend + 'static,
    R: ContextRetriever + 'static,
    S: SessionStore + 'static,
{
    use_case: DiscussionUseCase<G, R, S>,
    sink: ConsoleEventSink,
    history_file: Option<PathBuf>,
    quiet: bool,
}

impl<G, R, S> DiscussionRepl<G, R, S>
where
    G: GenerationBackend + 'static,
    R: ContextRetriever + 'static,
    S: SessionStore + 'static,
{
    /// Create a new DiscussionRepl
    pub fn new(backend: Arc<G>, retriever: Arc<R>, store: Arc<S>) -> Self {
        Self {
            use_case: DiscussionUseCase::new(backend, retriever, store),
            sink: ConsoleEventSink::new(),
            history_file: None,
            quiet: false,
        }
    }

    /// Set orchestration parameters
    pub fn with_params(mut self, params: DiscussionParams) -> Self {
        self.use_case = self.use_case.with_params(params);
        self
    }

    /// Cap retrieved context chunks per corpus
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.use_case = self.use_case.with_top_k(top_k);
        self
    }

    /// Set the event renderer
    pub fn with_sink(mut self, sink: ConsoleEventSink) -> Self {
        self.sink = sink;
        self
    }

    /// Override the readline history location
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    /// Suppress the welcome banner
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Run the session to completion
    pub async fn run(&self, session: Session) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path = self.history_file.clone().or_else(default_history_path);

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        if !self.quiet {
            self.print_welcome();
        }

        let id = session.id().clone();
        if let Err(e) = self.use_case.start(session, &self.sink).await {
            eprintln!("Error: {}", e);
            return Ok(());
        }

        loop {
            println!();
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    // Handle commands
                    if line.starts_with('/') {
                        match line {
                            "/end" | "/e" => {
                                self.finish(&id).await;
                                break;
                            }
                            "/quit" | "/exit" | "/q" => {
                                println!("Bye!");
                                break;
                            }
                            "/pass" | "/p" => {
                                if let RoundExit::Quit = self.drive_round(&id, &mut rl, true).await
                                {
                                    break;
                                }
                            }
                            "/help" | "/h" | "/?" => self.print_help(),
                            _ => {
                                println!("Unknown command: {}", line);
                                println!("Type /help for available commands");
                            }
                        }
                        continue;
                    }

                    // Add to history
                    let _ = rl.add_history_entry(line);

                    match self.use_case.handle_user_message(&id, line).await {
                        Ok(()) => {
                            if let RoundExit::Quit = self.drive_round(&id, &mut rl, false).await {
                                break;
                            }
                        }
                        Err(DiscussionError::SessionNotFound(_)) => break,
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Let the synthetic panel speak until the round wraps, opening an
    /// interjection prompt in each window between turns. `via_pass` marks
    /// rounds the human kicked off with an explicit pass.
    async fn drive_round(&self, id: &SessionId, rl: &mut DefaultEditor, via_pass: bool) -> RoundExit {
        let mut passed = via_pass;
        loop {
            let step = if passed {
                passed = false;
                self.use_case.pass_turn(id, &self.sink).await
            } else {
                self.use_case.progress_turn(id, &self.sink).await
            };
            let window_open = match step {
                Ok(TurnOutcome::Spoke { window_open, .. })
                | Ok(TurnOutcome::Skipped { window_open, .. }) => window_open,
                Ok(TurnOutcome::RoundComplete)
                | Ok(TurnOutcome::Busy)
                | Ok(TurnOutcome::Preempted) => return RoundExit::Prompt,
                Err(DiscussionError::SessionNotFound(_)) => return RoundExit::Quit,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return RoundExit::Prompt;
                }
            };

            if !window_open {
                continue;
            }

            // Interjection window before the next scheduled speaker
            match rl.readline("  ⋯ ") {
                Ok(line) => {
                    let line = line.trim();
                    match line {
                        "" => continue,
                        "/end" | "/e" => {
                            self.finish(id).await;
                            return RoundExit::Quit;
                        }
                        "/quit" | "/exit" | "/q" => {
                            println!("Bye!");
                            return RoundExit::Quit;
                        }
                        "/pass" | "/p" => {
                            passed = true;
                            continue;
                        }
                        _ if line.starts_with('/') => {
                            println!("Unknown command: {}", line);
                            continue;
                        }
                        _ => {
                            let _ = rl.add_history_entry(line);
                            match self.use_case.handle_user_message(id, line).await {
                                // Reshuffled; keep driving the fresh round
                                Ok(()) => continue,
                                Err(DiscussionError::SessionNotFound(_)) => return RoundExit::Quit,
                                Err(e) => {
                                    eprintln!("Error: {}", e);
                                    continue;
                                }
                            }
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Abandon the rest of the round, back to the main prompt
                    println!("^C");
                    return RoundExit::Prompt;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    return RoundExit::Quit;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    return RoundExit::Quit;
                }
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│        Greenroom - Group Discussion         │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Speak at the >>> prompt; the panel responds in rounds.");
        println!("Between speakers a ⋯ prompt opens briefly: press Enter");
        println!("to stay quiet, or type to interject.");
        println!();
        println!("Commands:");
        println!("  /help     - Show this help");
        println!("  /pass     - Say nothing and let the panel continue");
        println!("  /end      - Finish now and get feedback");
        println!("  /quit     - Leave without feedback");
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("Commands:");
        println!("  /help, /h, /?    - Show this help");
        println!("  /pass, /p        - Say nothing and let the panel continue");
        println!("  /end, /e         - Finish now and get feedback");
        println!("  /quit, /exit, /q - Leave without feedback");
        println!();
    }

    async fn finish(&self, id: &SessionId) {
        // The feedback report is rendered by the sink on SessionEnded
        if let Err(e) = self.use_case.end(id, &self.sink).await {
            eprintln!("Error: {}", e);
        }
    }
}
