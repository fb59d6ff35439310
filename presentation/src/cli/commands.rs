//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for greenroom
#[derive(Parser, Debug)]
#[command(name = "greenroom")]
#[command(author, version, about = "Interview practice - mock interviews and group discussions")]
#[command(long_about = r#"
Greenroom runs AI-driven practice sessions for job interviews.

Two session styles are available:
1. Interview:  a one-on-one mock interview with an adaptive interviewer
2. Discussion: a group debate against five synthetic participants

Both end with a scored feedback report.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./greenroom.toml    Project-level config
3. ~/.config/greenroom/config.toml   Global config

Example:
  greenroom interview --kind technical --company Acme --role "Backend Engineer"
  greenroom discussion "Should code review be mandatory?"
  greenroom sessions
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress decorative output (banners, thinking indicators)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit events and feedback as JSON lines instead of styled text
    #[arg(long, global = true)]
    pub json: bool,

    /// Keep the session in memory only, never written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

/// Session styles and utilities
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a one-on-one mock interview
    Interview {
        /// Interview flavor: technical, hr, salary, or general
        #[arg(short, long, default_value = "general", value_name = "KIND")]
        kind: String,

        /// Company to tailor questions toward
        #[arg(long, value_name = "NAME")]
        company: Option<String>,

        /// Target role or job title
        #[arg(long, value_name = "TITLE")]
        role: Option<String>,

        /// Experience level (junior, mid, senior, ...)
        #[arg(long, value_name = "LEVEL")]
        experience: Option<String>,

        /// Wrap up after this many interviewer questions
        #[arg(long, value_name = "N")]
        max_questions: Option<usize>,

        /// Corpus name holding the candidate's resume material
        #[arg(long, value_name = "CORPUS")]
        resume: Option<String>,

        /// Corpus name holding company background material
        #[arg(long, value_name = "CORPUS")]
        company_corpus: Option<String>,
    },

    /// Run a group discussion against synthetic participants
    Discussion {
        /// Topic to debate (a default is picked when omitted)
        topic: Option<String>,

        /// Number of synthetic participants to seat
        #[arg(short, long, value_name = "N")]
        participants: Option<usize>,

        /// Corpus name holding background material on the topic
        #[arg(long, value_name = "CORPUS")]
        company_corpus: Option<String>,
    },

    /// List sessions stored on disk
    Sessions,
}
