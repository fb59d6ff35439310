//! REPL for one-on-one interview sessions

use crate::console::events::ConsoleEventSink;
use crate::repl::default_history_path;
use greenroom_application::{
    ContextRetriever, GenerationBackend, InterviewError, InterviewParams, InterviewUseCase,
    SessionStore,
};
use greenroom_domain::Session;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;

/// Interactive interview REPL
pub struct InterviewRepl<G, R, S>
where
    G: GenerationBackend + 'static,
    R: ContextRetriever + 'static,
    S: SessionStore + 'static,
{
    use_case: InterviewUseCase<G, R, S>,
    sink: ConsoleEventSink,
    history_file: Option<PathBuf>,
    quiet: bool,
}

impl<G, R, S> InterviewRepl<G, R, S>
where
    G: GenerationBackend + 'static,
    R: ContextRetriever + 'static,
    S: SessionStore + 'static,
{
    /// Create a new InterviewRepl
    pub fn new(backend: Arc<G>, retriever: Arc<R>, store: Arc<S>) -> Self {
        Self {
            use_case: InterviewUseCase::new(backend, retriever, store),
            sink: ConsoleEventSink::new(),
            history_file: None,
            quiet: false,
        }
    }

    /// Set orchestration parameters
    pub fn with_params(mut self, params: InterviewParams) -> Self {
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
    pub async fn run(&self, mut session: Session) -> RlResult<()> {
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
            self.print_welcome(&session);
        }

        if let Err(e) = self.use_case.start(&mut session, &self.sink).await {
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
                                self.finish(&mut session).await;
                                break;
                            }
                            "/quit" | "/exit" | "/q" => {
                                println!("Bye!");
                                break;
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

                    match self.use_case.process_user_message(&mut session, line, &self.sink).await
                    {
                        Ok(reply) if reply.should_end => {
                            self.finish(&mut session).await;
                            break;
                        }
                        Ok(_) => {}
                        Err(e @ (InterviewError::NotActive | InterviewError::AlreadyCompleted)) => {
                            eprintln!("Error: {}", e);
                            break;
                        }
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

    fn print_welcome(&self, session: &Session) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│        Greenroom - Interview Practice       │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Format:  {}", session.kind());
        let profile = session.profile();
        if let Some(ref company) = profile.company_name {
            println!("Company: {}", company);
        }
        if let Some(ref role) = profile.job_role {
            println!("Role:    {}", role);
        }
        println!();
        println!("Answer in your own words; the interviewer adapts to you.");
        println!();
        println!("Commands:");
        println!("  /help     - Show this help");
        println!("  /end      - Finish now and get feedback");
        println!("  /quit     - Leave without feedback");
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("Commands:");
        println!("  /help, /h, /?    - Show this help");
        println!("  /end, /e         - Finish now and get feedback");
        println!("  /quit, /exit, /q - Leave without feedback");
        println!();
    }

    async fn finish(&self, session: &mut Session) {
        // The feedback report is rendered by the sink on SessionEnded
        if let Err(e) = self.use_case.end(session, &self.sink).await {
            eprintln!("Error: {}", e);
        }
    }
}
