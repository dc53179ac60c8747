//! CLI Adapter
//!
//! Command-line interface for the meme-inference binary.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CheckConfigCmd, CliApp, Command, QuoteCmd, ServeCmd};

use std::path::{Path, PathBuf};

/// Expand `~` in a user-supplied config path
pub fn expand_config_path(path: Option<&Path>) -> Option<PathBuf> {
    path.map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).to_string()))
}
