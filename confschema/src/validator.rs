//! Validation and conversion of raw configurations.

use std::fs;
use std::path::Path;

use serde::ser::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::ordered::OrderedMap;
use crate::schema::Schema;
use crate::value::Value;

/// A raw configuration: setting names to unconverted values, in input order.
pub type Settings = OrderedMap<String, Value>;

/// A validated configuration.
///
/// Holds the converted values in schema order, plus the raw input exactly as
/// it was supplied. Serializing a `Configuration` writes the converted
/// values only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Configuration {
    values: Settings,
    original: Settings,
}

impl Configuration {
    /// Converted value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether `key` has a value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no settings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over converted settings in schema order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&String, &Value)> + ExactSizeIterator {
        self.values.iter()
    }

    /// Setting names in schema order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &String> + ExactSizeIterator {
        self.values.keys()
    }

    /// The converted settings.
    #[must_use]
    pub fn values(&self) -> &Settings {
        &self.values
    }

    /// The raw settings the configuration was validated from.
    #[must_use]
    pub fn original(&self) -> &Settings {
        &self.original
    }

    /// Consumes the configuration, returning the converted settings.
    #[must_use]
    pub fn into_values(self) -> Settings {
        self.values
    }

    /// Renders the converted settings as a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl<'a> IntoIterator for &'a Configuration {
    type Item = (&'a String, &'a Value);
    type IntoIter = <&'a Settings as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        (&self.values).into_iter()
    }
}

impl Serialize for Configuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

/// Validates `config` against `schema` and converts its values.
///
/// Only the first problem is reported: an unknown setting (first in input
/// order), then a missing setting or a failed conversion (first in schema
/// order). Absent settings take the entry's default, which is converted like
/// any supplied value.
///
/// # Errors
///
/// Returns [`Error::Config`] describing the first problem found.
///
/// # Examples
///
/// ```
/// use confschema::{load_config, load_schema, validate_config, Value};
///
/// let schema = load_schema("count : [int, 1, how many, 1]", None).unwrap();
///
/// let config = validate_config(&schema, &load_config("count : '5'").unwrap()).unwrap();
/// assert_eq!(config.get("count"), Some(&Value::Int(5)));
///
/// let config = validate_config(&schema, &load_config("").unwrap()).unwrap();
/// assert_eq!(config.get("count"), Some(&Value::Int(1)));
///
/// let err = validate_config(&schema, &load_config("count : 1\nbogus : 2").unwrap()).unwrap_err();
/// assert!(err.to_string().contains("Unknown setting: 'bogus'"));
/// ```
pub fn validate_config(schema: &Schema, config: &Settings) -> Result<Configuration> {
    log::debug!(
        "validating {} settings against {} schema entries",
        config.len(),
        schema.len()
    );

    if let Some(unknown) = config.keys().find(|key| !schema.contains_key(key)) {
        return Err(Error::config(format!("Unknown setting: '{unknown}'")));
    }

    let mut values = Settings::new();
    for (key, entry) in schema {
        let raw = config
            .get(key.as_str())
            .or_else(|| entry.default())
            .ok_or_else(|| {
                Error::config(format!("Settings file must specify a value for '{key}'."))
            })?;
        let converted = entry
            .converter()
            .apply(raw)
            .map_err(|e| Error::config(e.message()))?;
        log::debug!("converted '{key}' with {}: {raw} -> {converted}", entry.converter().name());
        values.insert(key.clone(), converted);
    }

    Ok(Configuration {
        values,
        original: config.clone(),
    })
}

/// Parses YAML text into raw settings.
///
/// An empty document yields no settings. Keys that are not text are replaced
/// by their rendered form, so `1: x` becomes the setting `"1"`.
///
/// # Errors
///
/// Returns [`Error::Config`] when the text is not YAML, its document is not
/// a mapping, or two of its keys render to the same name.
pub fn load_config(text: &str) -> Result<Settings> {
    if text.trim().is_empty() {
        return Ok(Settings::new());
    }
    let parsed = serde_yaml::from_str::<serde_yaml::Value>(text)
        .map_err(|e| Error::config(format!("Could not parse settings: {e}")))?;
    into_settings(Value::from(parsed))
        .unwrap_or_else(|| Err(Error::config("Settings must be a mapping of names to values.")))
}

/// Reads raw settings from a YAML file.
///
/// # Errors
///
/// Returns [`Error::Config`] when the file is missing, unreadable or not a
/// YAML mapping.
pub fn read_settings(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::config(format!(
            "Settings file \"{}\" does not exist.",
            path.display()
        )));
    }
    let text = fs::read_to_string(path).map_err(|e| {
        log::debug!("reading {} failed: {e}", path.display());
        Error::config(format!("Problem reading settings file \"{}\".", path.display()))
    })?;
    load_config(&text)
}

/// Reads a YAML configuration file and validates it against `schema`.
///
/// # Errors
///
/// Returns [`Error::Config`] when the file cannot be read or parsed, or its
/// contents fail [`validate_config`].
pub fn read_config(schema: &Schema, path: impl AsRef<Path>) -> Result<Configuration> {
    validate_config(schema, &read_settings(path)?)
}

/// Converts a parsed document into settings; `None` unless it is a mapping
/// (or empty).
pub(crate) fn into_settings(value: Value) -> Option<Result<Settings>> {
    match value {
        Value::Null => Some(Ok(Settings::new())),
        Value::Map(map) => Some(settings_from_map(map)),
        _ => None,
    }
}

/// Two keys that render to the same name (`1` and `'1'`) are an error.
fn settings_from_map(map: OrderedMap<Value, Value>) -> Result<Settings> {
    let mut settings = Settings::new();
    for (key, value) in map {
        let key = key.key_string();
        if settings.contains_key(key.as_str()) {
            return Err(Error::config(format!(
                "Setting '{key}' is specified more than once."
            )));
        }
        settings.insert(key, value);
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{load_schema, SpecEntry};

    fn count_schema() -> Schema {
        load_schema(
            vec![("count", SpecEntry::new("int", 1).with_help("how many").with_default(1))],
            None,
        )
        .unwrap()
    }

    fn settings(pairs: &[(&str, Value)]) -> Settings {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_default_is_used() {
        let config = validate_config(&count_schema(), &Settings::new()).unwrap();
        assert_eq!(config.get("count"), Some(&Value::Int(1)));
        assert!(config.original().is_empty());
    }

    #[test]
    fn test_text_is_converted() {
        let config =
            validate_config(&count_schema(), &settings(&[("count", "5".into())])).unwrap();
        assert_eq!(config.get("count"), Some(&Value::Int(5)));
        assert_eq!(config.original().get("count"), Some(&Value::from("5")));
    }

    #[test]
    fn test_conversion_failure() {
        let err =
            validate_config(&count_schema(), &settings(&[("count", "x".into())])).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_unknown_setting() {
        let err = validate_config(
            &count_schema(),
            &settings(&[("count", 1.into()), ("bogus", 2.into())]),
        )
        .unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("Unknown setting: 'bogus'"));
    }

    #[test]
    fn test_first_unknown_in_input_order() {
        let err = validate_config(
            &count_schema(),
            &settings(&[("zzz", 1.into()), ("aaa", 2.into())]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("'zzz'"));
    }

    #[test]
    fn test_missing_setting() {
        let schema = load_schema("name : [str, x, null]\n", None).unwrap();
        let err = validate_config(&schema, &Settings::new()).unwrap_err();
        assert!(err.is_config());
        assert!(err
            .to_string()
            .contains("Settings file must specify a value for 'name'."));
    }

    #[test]
    fn test_values_follow_schema_order() {
        let schema = load_schema("a : [int, 1, null]\nb : [int, 2, null]\nc : [int, 3, null]\n", None)
            .unwrap();
        let raw = settings(&[("c", 3.into()), ("a", 1.into()), ("b", 2.into())]);
        let config = validate_config(&schema, &raw).unwrap();

        let keys: Vec<_> = config.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        let original: Vec<_> = config.original().keys().map(String::as_str).collect();
        assert_eq!(original, ["c", "a", "b"]);
    }

    #[test]
    fn test_load_config_shapes() {
        assert!(load_config("").unwrap().is_empty());
        assert!(load_config("---\n").unwrap().is_empty());

        let err = load_config("- a\n- b\n").unwrap_err();
        assert!(err.is_config());

        let err = load_config("a : [1\n").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_load_config_non_text_keys() {
        let raw = load_config("1 : one\ntrue : yes\n").unwrap();
        let keys: Vec<_> = raw.keys().map(String::as_str).collect();
        assert_eq!(keys, ["1", "true"]);
    }

    #[test]
    fn test_load_config_rejects_colliding_keys() {
        let err = load_config("1 : a\n'1' : b\n").unwrap_err();
        assert!(err.is_config());
        assert!(err
            .to_string()
            .contains("Setting '1' is specified more than once."));

        let err = load_config("true : a\n'true' : b\n").unwrap_err();
        assert!(err.to_string().contains("'true'"));
    }

    #[test]
    fn test_read_settings_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yml");
        let err = read_settings(&path).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("does not exist"));
        assert!(err.to_string().contains("absent.yml"));
    }

    #[test]
    fn test_read_settings_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_settings(dir.path()).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("Problem reading settings file"));
    }

    #[test]
    fn test_read_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yml");
        fs::write(&path, "count : 7\n").unwrap();
        let config = read_config(&count_schema(), &path).unwrap();
        assert_eq!(config.get("count"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_serialize_values_only() {
        let config =
            validate_config(&count_schema(), &settings(&[("count", "5".into())])).unwrap();
        assert_eq!(serde_json::to_string(&config).unwrap(), r#"{"count":5}"#);
        assert_eq!(config.to_yaml().unwrap(), "count: 5\n");
    }
}
