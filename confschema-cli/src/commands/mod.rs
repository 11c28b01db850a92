//! CLI command implementations.
//!
//! - `template`: Print a sample configuration for the schema
//! - `check`: Validate a configuration file against the schema
//! - `completions`: Generate shell completion scripts

pub mod check;
pub mod completions;
pub mod template;

pub use check::{CheckCommand, OutputFormat};
pub use completions::CompletionsCommand;
pub use template::TemplateCommand;
