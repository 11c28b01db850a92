//! Schema specifications and their resolution.
//!
//! A schema maps each setting name to a converter, an example value, optional
//! help text and an optional default. Specifications are written either as
//! YAML text:
//!
//! ```yaml
//! %YAML 1.2
//! ---
//! !!omap
//! - pdb model : [str, my_model.pdb, null]
//! - reset b-facs : [float, -1, "New B factor (-1 for no reset)", -1]
//! ```
//!
//! or directly in Rust as [`SpecEntry`] values. Either way they are resolved
//! once by [`load_schema`] into an immutable [`Schema`].

use std::fs;
use std::path::Path;

use crate::converter::{Converter, ConverterSource, Registry};
use crate::error::{Error, Result};
use crate::ordered::OrderedMap;
use crate::validator::{self, Configuration, Settings};
use crate::value::Value;

/// One unresolved schema entry.
///
/// # Examples
///
/// ```
/// use confschema::SpecEntry;
///
/// let count = SpecEntry::new("int", 1)
///     .with_help("how many")
///     .with_default(1);
/// assert_eq!(count.help(), Some("how many"));
/// ```
#[derive(Clone, Debug)]
pub struct SpecEntry {
    converter: ConverterSource,
    example: Value,
    help: Option<String>,
    default: Option<Value>,
}

impl SpecEntry {
    /// Creates an entry without help text or default.
    pub fn new(converter: impl Into<ConverterSource>, example: impl Into<Value>) -> Self {
        Self {
            converter: converter.into(),
            example: example.into(),
            help: None,
            default: None,
        }
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the value used when a configuration omits this setting.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// The help text, if any.
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Reads the `[converter, example, help]` or
    /// `[converter, example, help, default]` form used in YAML schemas.
    ///
    /// A fourth element is always a default, even when it is null.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] for a wrong arity, a help field that is not
    /// text or null, or an unusable converter field.
    pub fn from_value(key: &str, value: Value) -> Result<Self> {
        let mut fields = match value {
            Value::List(fields) | Value::Tuple(fields) if (3..=4).contains(&fields.len()) => {
                fields
            }
            _ => return Err(invalid_item(key)),
        };
        let default = if fields.len() == 4 { fields.pop() } else { None };
        let [converter, example, help]: [Value; 3] =
            fields.try_into().map_err(|_| invalid_item(key))?;

        let help = match help {
            Value::Null => None,
            Value::Str(text) => Some(text),
            other => {
                return Err(Error::schema(format!(
                    "Help for '{key}' must be text or null, not '{other}'."
                )))
            }
        };

        Ok(Self {
            converter: ConverterSource::from_value(key, converter)?,
            example,
            help,
            default,
        })
    }
}

/// The forms a schema specification can take.
#[derive(Clone, Debug)]
pub enum SchemaSpec {
    /// YAML text; blank text is an empty schema.
    Text(String),
    /// A parsed value: a mapping, a sequence of single-key mappings, or a
    /// sequence of `[key, entry]` pairs.
    Value(Value),
    /// Entries built in Rust, in order.
    Entries(Vec<(String, SpecEntry)>),
}

impl From<&str> for SchemaSpec {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for SchemaSpec {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for SchemaSpec {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl<K: Into<String>> From<Vec<(K, SpecEntry)>> for SchemaSpec {
    fn from(entries: Vec<(K, SpecEntry)>) -> Self {
        Self::Entries(entries.into_iter().map(|(k, e)| (k.into(), e)).collect())
    }
}

/// A resolved schema entry.
#[derive(Clone, Debug)]
pub struct SchemaEntry {
    converter: Converter,
    example: Value,
    help: Option<String>,
    default: Option<Value>,
}

impl SchemaEntry {
    /// The resolved converter.
    #[must_use]
    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// The example value shown in templates.
    #[must_use]
    pub fn example(&self) -> &Value {
        &self.example
    }

    /// Help text, if any.
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Raw value used when the setting is absent, if any.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// A resolved, immutable schema.
///
/// Entries keep the order of the specification.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    entries: OrderedMap<String, SchemaEntry>,
}

impl Schema {
    /// Looks up an entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SchemaEntry> {
        self.entries.get(key)
    }

    /// Whether `key` is a known setting.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schema has no settings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in specification order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&String, &SchemaEntry)> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Setting names in specification order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &String> + ExactSizeIterator {
        self.entries.keys()
    }

    /// See [`validate_config`](crate::validate_config).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `config` does not satisfy the schema.
    pub fn validate_config(&self, config: &Settings) -> Result<Configuration> {
        validator::validate_config(self, config)
    }

    /// See [`read_config`](crate::read_config).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the file is missing, unreadable or
    /// invalid.
    pub fn read_config(&self, path: impl AsRef<Path>) -> Result<Configuration> {
        validator::read_config(self, path)
    }

    /// See [`sample_config`](crate::sample_config).
    #[must_use]
    pub fn sample_config(&self) -> String {
        crate::sample::sample_config(self)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = (&'a String, &'a SchemaEntry);
    type IntoIter = <&'a OrderedMap<String, SchemaEntry> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        (&self.entries).into_iter()
    }
}

/// Builds a [`Schema`] from a specification.
///
/// Converter names are looked up in the built-in registry with `converters`
/// layered on top, so a caller converter may shadow a built-in one.
///
/// # Errors
///
/// Returns [`Error::Schema`] when the specification cannot be parsed, an
/// entry is malformed, a key repeats or a converter name is unknown.
///
/// # Examples
///
/// ```
/// use confschema::{load_schema, Value};
///
/// let schema = load_schema("count : [int, 1, how many, 1]\n", None).unwrap();
/// let entry = schema.get("count").unwrap();
/// assert_eq!(entry.help(), Some("how many"));
/// assert_eq!(entry.default(), Some(&Value::Int(1)));
/// ```
pub fn load_schema(spec: impl Into<SchemaSpec>, converters: Option<&Registry>) -> Result<Schema> {
    let entries = match spec.into() {
        SchemaSpec::Entries(entries) => entries,
        SchemaSpec::Value(value) => entries_from_value(value)?,
        SchemaSpec::Text(text) => entries_from_value(parse_text(&text)?)?,
    };

    let registry = Registry::builtin().merged(converters);
    let mut resolved = OrderedMap::new();
    for (key, entry) in entries {
        if resolved.contains_key(key.as_str()) {
            return Err(Error::schema(format!(
                "Setting '{key}' is specified more than once."
            )));
        }
        let converter = registry.resolve(&key, entry.converter)?;
        resolved.insert(
            key,
            SchemaEntry {
                converter,
                example: entry.example,
                help: entry.help,
                default: entry.default,
            },
        );
    }

    log::debug!("loaded schema with {} settings", resolved.len());
    Ok(Schema { entries: resolved })
}

/// Reads a YAML schema file and builds a [`Schema`] from it.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read, otherwise the errors
/// of [`load_schema`].
pub fn read_schema(path: impl AsRef<Path>, converters: Option<&Registry>) -> Result<Schema> {
    let path = path.as_ref();
    log::debug!("reading schema from {}", path.display());
    let text = fs::read_to_string(path)?;
    load_schema(text, converters)
}

fn invalid_item(key: &str) -> Error {
    Error::schema(format!("Item '{key}' of specification is not valid."))
}

fn parse_text(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str::<serde_yaml::Value>(text)
        .map(Value::from)
        .map_err(|e| Error::schema(format!("Could not parse specification: {e}")))
}

fn entries_from_value(value: Value) -> Result<Vec<(String, SpecEntry)>> {
    let pairs: Vec<(Value, Value)> = match value {
        Value::Null => Vec::new(),
        Value::Map(map) => map.into_iter().collect(),
        Value::List(items) | Value::Tuple(items) => items
            .into_iter()
            .map(split_item)
            .collect::<Result<_>>()?,
        other => {
            return Err(Error::schema(format!(
                "Specification must be a mapping or a sequence of pairs, not '{other}'."
            )))
        }
    };

    pairs
        .into_iter()
        .map(|(key, entry)| {
            let key = key.key_string();
            let entry = SpecEntry::from_value(&key, entry)?;
            Ok((key, entry))
        })
        .collect()
}

/// One item of an ordered specification: `{key: entry}` or `[key, entry]`.
fn split_item(item: Value) -> Result<(Value, Value)> {
    match item {
        Value::Map(map) if map.len() == 1 => Ok(map
            .into_iter()
            .next()
            .unwrap_or((Value::Null, Value::Null))),
        Value::List(kv) | Value::Tuple(kv) if kv.len() == 2 => {
            let mut kv = kv.into_iter();
            Ok((
                kv.next().unwrap_or(Value::Null),
                kv.next().unwrap_or(Value::Null),
            ))
        }
        other => Err(Error::schema(format!(
            "Item '{other}' of specification is not a key-entry pair."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::ConvertError;

    const OMAP: &str = "\
%YAML 1.2
---
!!omap
- 'pdb model' : [str, my_model.pdb, null]
- 'reset b-facs' :
      - float
      - -1
      - \"New B factor (-1 for no reset)\"
      - -1
- 'cell dimensions' : [get_cell, [200, 200, 200], null]
";

    fn cell_converters() -> Registry {
        let mut converters = Registry::new();
        converters.register("get_cell", |v: &Value| {
            v.as_seq()
                .ok_or_else(|| ConvertError::type_error("cell must be a list"))?
                .iter()
                .map(|c| {
                    c.as_f64()
                        .map(Value::Float)
                        .ok_or_else(|| ConvertError::value(format!("bad cell '{c}'")))
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Value::List)
        });
        converters
    }

    #[test]
    fn test_omap_text_keeps_order() {
        let schema = load_schema(OMAP, Some(&cell_converters())).unwrap();
        let keys: Vec<_> = schema.keys().map(String::as_str).collect();
        assert_eq!(keys, ["pdb model", "reset b-facs", "cell dimensions"]);

        let reset = schema.get("reset b-facs").unwrap();
        assert_eq!(reset.help(), Some("New B factor (-1 for no reset)"));
        assert_eq!(reset.default(), Some(&Value::Int(-1)));
        assert_eq!(reset.converter().name(), "float");

        let pdb = schema.get("pdb model").unwrap();
        assert_eq!(pdb.help(), None);
        assert_eq!(pdb.default(), None);
        assert_eq!(pdb.example(), &Value::from("my_model.pdb"));
    }

    #[test]
    fn test_unknown_custom_converter() {
        let err = load_schema(OMAP, None).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("No such converter: 'get_cell'"));
    }

    #[test]
    fn test_plain_mapping_text() {
        let schema = load_schema("a : [int, 1, null]\nb : [str, x, null]\n", None).unwrap();
        let keys: Vec<_> = schema.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn test_pair_sequence_value() {
        let spec = Value::List(vec![Value::List(vec![
            "n".into(),
            Value::List(vec!["int".into(), 3.into(), Value::Null]),
        ])]);
        let schema = load_schema(spec, None).unwrap();
        assert!(schema.contains_key("n"));
    }

    #[test]
    fn test_entries_in_rust() {
        let schema = load_schema(
            vec![
                ("count", SpecEntry::new("int", 1).with_help("how many").with_default(1)),
                ("color", SpecEntry::new(vec![Value::from("red"), Value::from("green")], "red")),
            ],
            None,
        )
        .unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(
            schema.get("color").unwrap().converter().choices().map(<[Value]>::len),
            Some(2)
        );
    }

    #[test]
    fn test_bad_arity() {
        for text in ["n : [int, 1]\n", "n : [int, 1, null, 2, 3]\n", "n : int\n"] {
            let err = load_schema(text, None).unwrap_err();
            assert!(err.is_schema(), "{text}");
            assert!(err
                .to_string()
                .contains("Item 'n' of specification is not valid."));
        }
    }

    #[test]
    fn test_help_must_be_text() {
        let err = load_schema("n : [int, 1, [a, b]]\n", None).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("'n'"));
    }

    #[test]
    fn test_null_default_is_a_default() {
        let schema = load_schema("n : [str, x, null, null]\n", None).unwrap();
        assert_eq!(schema.get("n").unwrap().default(), Some(&Value::Null));
    }

    #[test]
    fn test_duplicate_key() {
        let err = load_schema(
            vec![
                ("n", SpecEntry::new("int", 1)),
                ("n", SpecEntry::new("str", "x")),
            ],
            None,
        )
        .unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("'n'"));

        let err = load_schema("- n : [int, 1, null]\n- n : [int, 2, null]\n", None).unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn test_blank_text_is_empty_schema() {
        assert!(load_schema("", None).unwrap().is_empty());
        assert!(load_schema("  \n", None).unwrap().is_empty());
    }

    #[test]
    fn test_unparsable_text() {
        let err = load_schema("a : [int, 1\n", None).unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn test_scalar_spec_rejected() {
        let err = load_schema("just text", None).unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn test_enum_by_key_text() {
        let schema = load_schema(
            "color : [{red: ff0000, blue: 0000ff}, red, null]\n",
            None,
        )
        .unwrap();
        let converter = schema.get("color").unwrap().converter();
        assert_eq!(
            converter.choices().unwrap(),
            &[Value::from("red"), Value::from("blue")]
        );
        assert_eq!(
            converter.apply(&"blue".into()).unwrap(),
            Value::from("0000ff")
        );
    }

    #[test]
    fn test_read_schema_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_schema(dir.path().join("absent.yml"), None).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_read_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.yml");
        fs::write(&path, "n : [int, 1, null]\n").unwrap();
        let schema = read_schema(&path, None).unwrap();
        assert!(schema.contains_key("n"));
    }
}
