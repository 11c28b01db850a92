//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{CheckCommand, CompletionsCommand, TemplateCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Validate YAML configuration files against a schema.
#[derive(Parser)]
#[command(name = "confschema")]
#[command(version, about = "Validate YAML configuration files against a schema", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Schema specification file
    #[arg(long, value_name = "PATH", global = true, env = "CONFSCHEMA_SCHEMA")]
    pub schema: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Print a sample configuration for the schema
    Template(TemplateCommand),

    /// Validate a configuration file and print the converted settings
    Check(CheckCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
