//! Command-line overrides of configuration settings.
//!
//! An override is a YAML mapping given as one argument, for example
//! `-o 'threads : 4, mode : fast'`. The outer braces of the flow mapping are
//! optional, and backslash escapes let block style through a single shell
//! word: `-o 'threads : 4\nmode : fast'`.

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::validator::{into_settings, Settings};
use crate::value::Value;

const NOT_A_MAPPING: &str = "value for --override option is not a mapping object";

/// Parses an override argument into raw settings.
///
/// # Errors
///
/// Returns [`Error::Option`] unless the text, with or without surrounding
/// braces, is a YAML mapping, and [`Error::Config`] when two of its keys
/// name the same setting.
///
/// # Examples
///
/// ```
/// use confschema::{parse_override, Value};
///
/// let overrides = parse_override("opt1 : foo, opt2 : bar").unwrap();
/// assert_eq!(overrides.get("opt2"), Some(&Value::from("bar")));
///
/// let overrides = parse_override(r#"sep : "\t""#).unwrap();
/// assert_eq!(overrides.get("sep"), Some(&Value::from("\t")));
/// ```
pub fn parse_override(text: &str) -> Result<Settings> {
    let decoded = decode_escapes(text);
    if let Some(settings) = parse_mapping(&decoded) {
        return settings;
    }
    log::debug!("override is not a mapping as given, retrying as a flow mapping");
    parse_mapping(&format!("{{{decoded}}}")).unwrap_or_else(|| Err(Error::option(NOT_A_MAPPING)))
}

/// Merges `overrides` into `config`.
///
/// Overridden settings keep their position; new ones are appended. Nothing
/// is merged unless every key is a setting of `schema`.
///
/// # Errors
///
/// Returns [`Error::Config`] naming the first override that is not a
/// setting of `schema`.
pub fn apply_overrides(schema: &Schema, config: &mut Settings, overrides: Settings) -> Result<()> {
    if let Some(unknown) = overrides.keys().find(|key| !schema.contains_key(key)) {
        return Err(Error::config(format!(
            "Command line option '{unknown}' is not valid."
        )));
    }
    for (key, value) in overrides {
        log::debug!("overriding '{key}' with {value}");
        config.insert(key, value);
    }
    Ok(())
}

fn parse_mapping(text: &str) -> Option<Result<Settings>> {
    let parsed = serde_yaml::from_str::<serde_yaml::Value>(text).ok()?;
    into_settings(Value::from(parsed))
}

/// Decodes `\n`, `\r`, `\t`, `\\`, `\'` and `\"`; other backslashes are
/// kept as written.
fn decode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.peek() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('\\') => '\\',
            Some('\'') => '\'',
            Some('"') => '"',
            _ => {
                out.push(c);
                continue;
            }
        };
        chars.next();
        out.push(decoded);
    }
    out
}
