//! CLI entrypoint for greenroom
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use greenroom_application::SessionStore;
use greenroom_domain::{InterviewKind, Session, SessionProfile};
use greenroom_infrastructure::{
    ChatCompletionsBackend, ConfigLoader, DirCorpusRetriever, FileConfig, FileSessionStore,
    MemorySessionStore,
};
use greenroom_presentation::{Cli, Command, ConsoleEventSink, DiscussionRepl, InterviewRepl};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    config.validate().context("Invalid configuration")?;

    if !config.repl.color || cli.json {
        colored::control::set_override(false);
    }

    let Some(command) = cli.command.take() else {
        bail!("No command given. Try `greenroom interview` or `greenroom discussion`.");
    };

    info!("Starting greenroom");

    // === Dependency Injection ===
    let backend = Arc::new(build_backend(&config)?);
    let retriever = Arc::new(DirCorpusRetriever::new(corpus_root(&config)));

    // The store choice is the one runtime-selected adapter, so the
    // command runner is generic over it and monomorphized twice.
    if cli.ephemeral {
        let store = Arc::new(MemorySessionStore::new());
        run_command(command, &cli, &config, backend, retriever, store).await
    } else {
        let store = Arc::new(FileSessionStore::new(sessions_dir(&config)?));
        run_command(command, &cli, &config, backend, retriever, store).await
    }
}

async fn run_command<S: SessionStore + 'static>(
    command: Command,
    cli: &Cli,
    config: &FileConfig,
    backend: Arc<ChatCompletionsBackend>,
    retriever: Arc<DirCorpusRetriever>,
    store: Arc<S>,
) -> Result<()> {
    let sink = ConsoleEventSink::new().quiet(cli.quiet).json(cli.json);
    let history_file = config.repl.history_file.as_deref().map(PathBuf::from);

    match command {
        Command::Interview {
            kind,
            company,
            role,
            experience,
            max_questions,
            resume,
            company_corpus,
        } => {
            let kind = InterviewKind::from(kind.as_str());

            let mut profile = SessionProfile::new();
            if let Some(company) = company {
                profile = profile.with_company(company);
            }
            if let Some(role) = role {
                profile = profile.with_role(role);
            }
            if let Some(level) = experience {
                profile = profile.with_experience(level);
            }
            if let Some(max) = max_questions {
                profile = profile.with_max_questions(max);
            }
            profile.resume_corpus = resume;
            profile.company_corpus = company_corpus;

            let session = Session::interview(kind, profile);
            info!("Interview session {} created", session.id());

            let repl = InterviewRepl::new(backend, retriever, store)
                .with_params(config.interview.to_params())
                .with_top_k(config.retrieval.top_k)
                .with_sink(sink)
                .with_history_file(history_file)
                .with_quiet(cli.quiet || cli.json);
            repl.run(session).await?;
        }

        Command::Discussion {
            topic,
            participants,
            company_corpus,
        } => {
            let mut profile = SessionProfile::new();
            if let Some(topic) = topic {
                profile = profile.with_topic(topic);
            }
            if let Some(count) = participants {
                profile = profile.with_participant_count(count);
            }
            profile.company_corpus = company_corpus;

            let session = Session::discussion(profile);
            info!("Discussion session {} created", session.id());

            let repl = DiscussionRepl::new(backend, retriever, store)
                .with_params(config.discussion.to_params())
                .with_top_k(config.retrieval.top_k)
                .with_sink(sink)
                .with_history_file(history_file)
                .with_quiet(cli.quiet || cli.json);
            repl.run(session).await?;
        }

        Command::Sessions => {
            let ids = store.list().await.context("Failed to list sessions")?;
            if ids.is_empty() {
                println!("No stored sessions.");
                return Ok(());
            }
            for id in ids {
                match store.load(&id).await {
                    Ok(session) => println!(
                        "{}  {}  {:<9}  {}",
                        session.created_at().format("%Y-%m-%d %H:%M"),
                        id,
                        session.status(),
                        session.kind(),
                    ),
                    Err(e) => println!("{}  (unreadable: {})", id, e),
                }
            }
        }
    }

    Ok(())
}

fn build_backend(config: &FileConfig) -> Result<ChatCompletionsBackend> {
    let generation = &config.generation;
    let backend = ChatCompletionsBackend::from_env(&generation.api_key_env)
        .context("Generation backend unavailable")?
        .with_model(generation.model.clone())
        .with_base_url(generation.base_url.clone())
        .with_timeout(Duration::from_secs(generation.timeout_secs));
    Ok(backend)
}

fn corpus_root(config: &FileConfig) -> PathBuf {
    match config.retrieval.root.as_deref() {
        Some(root) => PathBuf::from(root),
        None => dirs::data_dir()
            .map(|p| p.join("greenroom").join("corpora"))
            .unwrap_or_else(|| PathBuf::from("corpora")),
    }
}

fn sessions_dir(config: &FileConfig) -> Result<PathBuf> {
    match config.storage.sessions_dir.as_deref() {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => FileSessionStore::default_dir()
            .context("No data directory available; set storage.sessions_dir in the config"),
    }
}
