//! Converter lookup by name.

use std::collections::HashMap;

use super::builtin::BUILTINS;
use super::{ConvertError, Converter, ConverterSource};
use crate::error::{Error, Result};
use crate::value::Value;

/// Lookup table from converter name to [`Converter`].
///
/// A registry is an ordinary value: build one from [`Registry::builtin`],
/// layer caller converters over it with [`Registry::merged`], and hand it to
/// schema loading. Nothing is shared between registries.
///
/// # Examples
///
/// ```
/// use confschema::converter::Registry;
/// use confschema::Value;
///
/// let mut custom = Registry::new();
/// custom.register("get_cell", |v: &Value| {
///     Ok(Value::List(
///         v.as_seq().unwrap_or_default().iter().map(|c| Value::Float(c.as_f64().unwrap_or(0.0))).collect(),
///     ))
/// });
///
/// let registry = Registry::builtin().merged(Some(&custom));
/// assert!(registry.contains("get_cell"));
/// assert!(registry.contains("float"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Registry {
    converters: HashMap<String, Converter>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in converter.
    #[must_use]
    pub fn builtin() -> Self {
        let converters = BUILTINS
            .iter()
            .map(|&(name, builtin)| (name.to_string(), Converter::builtin(name, builtin)))
            .collect();
        Self { converters }
    }

    /// Adds `converter` under `name`, builder style.
    #[must_use]
    pub fn with_converter(mut self, name: impl Into<String>, converter: Converter) -> Self {
        self.insert(name, converter);
        self
    }

    /// Adds `converter` under `name`, returning any converter it replaced.
    pub fn insert(&mut self, name: impl Into<String>, converter: Converter) -> Option<Converter> {
        self.converters.insert(name.into(), converter)
    }

    /// Registers a closure under `name`.
    pub fn register<F>(&mut self, name: &str, f: F) -> Option<Converter>
    where
        F: Fn(&Value) -> std::result::Result<Value, ConvertError> + Send + Sync + 'static,
    {
        self.insert(name, Converter::custom(name, f))
    }

    /// Looks up a converter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Converter> {
        self.converters.get(name)
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.converters.contains_key(name)
    }

    /// Number of registered converters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns a copy of this registry with `overrides` layered on top.
    ///
    /// On a name conflict the override wins.
    #[must_use]
    pub fn merged(&self, overrides: Option<&Registry>) -> Registry {
        let mut merged = self.clone();
        if let Some(overrides) = overrides {
            merged.converters.extend(
                overrides
                    .converters
                    .iter()
                    .map(|(name, converter)| (name.clone(), converter.clone())),
            );
        }
        merged
    }

    /// Resolves the converter written for setting `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] when a name (bare or inside `<...>`) is not
    /// registered.
    pub fn resolve(&self, key: &str, source: ConverterSource) -> Result<Converter> {
        log::debug!("resolving converter for '{key}': {source:?}");
        match source {
            ConverterSource::Named(name) => self.lookup(&name),
            ConverterSource::BracketedType(name) => self.lookup(&name).map(Converter::one_or_many),
            ConverterSource::EnumByKey(table) => Ok(Converter::by_key(key, table)),
            ConverterSource::LiteralChoice(allowed) => Ok(Converter::choice(key, allowed)),
            ConverterSource::Custom(converter) => Ok(converter),
        }
    }

    fn lookup(&self, name: &str) -> Result<Converter> {
        self.get(name)
            .cloned()
            .ok_or_else(|| Error::schema(format!("No such converter: '{name}'")))
    }
}
