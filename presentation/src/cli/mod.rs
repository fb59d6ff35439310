//! CLI module
//!
//! Clap definitions for the greenroom binary.

pub mod commands;

pub use commands::{Cli, Command};
