//! # Obtext CLI
//!
//! Library half of the `ob` binary: argument definitions, layered
//! configuration and command execution.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Command, GlobalArgs, Shell};
pub use commands::{apply_flags, completion_script, execute, formats_table};
pub use config::{parse_key, CliConfig};
