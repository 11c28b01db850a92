//! Utility functions for CLI operations.
//!
//! Schema loading shared by the commands, and the banner and error frames
//! printed around command output.

use crate::error::CliError;
use confschema::{read_schema, LogLevel, Schema};
use std::path::PathBuf;

/// Width of banners and error frames.
pub const WIDTH: usize = confschema::sample::WIDTH;

/// Indentation of error message lines inside the frame.
pub const PAD: usize = 4;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Schema file to validate against.
    pub schema: Option<PathBuf>,

    /// Effective log level after flags and environment.
    pub log_level: LogLevel,
}

/// Loads the schema named by `--schema` or `CONFSCHEMA_SCHEMA`.
pub fn load_schema(global: &GlobalOptions) -> Result<Schema, CliError> {
    let path = global.schema.as_ref().ok_or_else(|| {
        CliError::InvalidArguments(
            "no schema given (use --schema or set CONFSCHEMA_SCHEMA)".to_string(),
        )
    })?;
    Ok(read_schema(path, None)?)
}

/// Centers `text` in a field of `width` characters, padding with `fill`.
fn center(text: &str, width: usize, fill: char) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let margin = width - len;
    let left = margin / 2;
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat(fill).take(left));
    out.push_str(text);
    out.extend(std::iter::repeat(fill).take(margin - left));
    out
}

/// The program banner: the name and version between two rules.
pub fn banner(program: &str, version: &str, width: usize) -> String {
    let rule = "=".repeat(width);
    let title = center(&format!("{program} v.{version} "), width, ' ');
    format!("{rule}\n{}\n{rule}", title.trim_end())
}

/// Frames `message` between `#` bars under an `ERROR` heading.
///
/// Message lines are indented by `pad` spaces.
pub fn format_error_message(message: &str, width: usize, pad: usize) -> String {
    let inner = width.saturating_sub(pad);
    let heading = center(&center(" ERROR ", inner, '#'), width, ' ');
    let bar = center(&"#".repeat(inner), width, ' ');
    let indent = " ".repeat(pad);
    let body: Vec<String> = message
        .lines()
        .map(|line| format!("{indent}{}", line.trim_end()))
        .collect();

    [
        String::new(),
        heading.trim_end().to_string(),
        String::new(),
        body.join("\n"),
        String::new(),
        bar.trim_end().to_string(),
        String::new(),
    ]
    .join("\n")
}
