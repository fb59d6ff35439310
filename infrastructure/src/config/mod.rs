//! Configuration file loading for greenroom
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./greenroom.toml` or `./.greenroom.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/greenroom/config.toml`
//! 4. Fallback: `~/.config/greenroom/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDiscussionConfig, FileGenerationConfig,
    FileInterviewConfig, FileReplConfig, FileRetrievalConfig, FileStorageConfig,
};
pub use loader::ConfigLoader;
