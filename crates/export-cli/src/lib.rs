//! Command-line front end for the scene exporter.

pub mod args;
pub mod config;
pub mod prompt;

pub use args::Cli;
pub use config::{load_document, resolve_config, CliConfig};
pub use prompt::{CliConfirm, Prompt};
