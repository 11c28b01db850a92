//! Library exports for confschema-cli.
//!
//! The binary is a thin wrapper over these modules; exposing them lets the
//! unit tests and the man page build share the CLI definition.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
