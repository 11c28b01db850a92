//! Converters and their resolution.
//!
//! A schema names its converters in one of several forms (a registry name, a
//! `<name>` one-or-many form, an enumeration, a lookup table or a Rust
//! closure). Each form is captured by [`ConverterSource`] and resolved once,
//! at schema-build time, into a [`Converter`] through a [`Registry`].
//!
//! # Examples
//!
//! ```
//! use confschema::converter::{ConverterSource, Registry};
//! use confschema::Value;
//!
//! let registry = Registry::builtin();
//! let floats = registry
//!     .resolve("cell", ConverterSource::from("<float>"))
//!     .unwrap();
//!
//! assert_eq!(
//!     floats.apply(&Value::Int(3)).unwrap(),
//!     Value::List(vec![Value::Float(3.0)])
//! );
//! ```

mod builtin;
mod registry;

#[cfg(test)]
mod proptests;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::error::{Error, Result};
use crate::ordered::OrderedMap;
use crate::value::Value;

pub use builtin::Builtin;
pub use registry::Registry;

/// Signature of a caller-supplied conversion function.
pub type ConvertFn = dyn Fn(&Value) -> std::result::Result<Value, ConvertError> + Send + Sync;

/// A failure raised by a single converter.
///
/// The three kinds separate a value that is the right type but unacceptable,
/// a value of the wrong type, and a lookup that found nothing. The validator
/// reports all of them as [`Error::Config`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The value has an acceptable type but an unacceptable content.
    #[error("{0}")]
    Value(String),
    /// The value has the wrong type.
    #[error("{0}")]
    Type(String),
    /// The value is not a known key.
    #[error("{0}")]
    Key(String),
}

impl ConvertError {
    /// Builds a [`ConvertError::Value`].
    pub fn value(message: impl Into<String>) -> Self {
        Self::Value(message.into())
    }

    /// Builds a [`ConvertError::Type`].
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    /// Builds a [`ConvertError::Key`].
    pub fn key(message: impl Into<String>) -> Self {
        Self::Key(message.into())
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Value(m) | Self::Type(m) | Self::Key(m) => m,
        }
    }
}

/// An unresolved converter, as written in a schema specification.
#[derive(Clone, Debug)]
pub enum ConverterSource {
    /// A registry name such as `"int"`.
    Named(String),
    /// A lookup table; input keys are replaced by their values.
    EnumByKey(OrderedMap<Value, Value>),
    /// A closed set of allowed values, passed through unchanged.
    LiteralChoice(Vec<Value>),
    /// The `<name>` form: one `name`, or a list of them, always as a list.
    BracketedType(String),
    /// An already resolved converter.
    Custom(Converter),
}

impl ConverterSource {
    /// Reads the converter field of a structured schema entry.
    ///
    /// Strings become [`Named`](Self::Named) or
    /// [`BracketedType`](Self::BracketedType), mappings become
    /// [`EnumByKey`](Self::EnumByKey) and sequences become
    /// [`LiteralChoice`](Self::LiteralChoice).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] for any other kind of value.
    pub fn from_value(key: &str, value: Value) -> Result<Self> {
        match value {
            Value::Str(name) => Ok(Self::from(name)),
            Value::Map(table) => Ok(Self::EnumByKey(table)),
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
                Ok(Self::LiteralChoice(items))
            }
            other => Err(Error::schema(format!(
                "Converter '{other}' for '{key}' is not a mapping, sequence or converter name."
            ))),
        }
    }
}

impl From<String> for ConverterSource {
    fn from(name: String) -> Self {
        match name
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
        {
            Some(inner) => Self::BracketedType(inner.to_string()),
            None => Self::Named(name),
        }
    }
}

impl From<&str> for ConverterSource {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<OrderedMap<Value, Value>> for ConverterSource {
    fn from(table: OrderedMap<Value, Value>) -> Self {
        Self::EnumByKey(table)
    }
}

impl From<Vec<Value>> for ConverterSource {
    fn from(allowed: Vec<Value>) -> Self {
        Self::LiteralChoice(allowed)
    }
}

impl From<Converter> for ConverterSource {
    fn from(converter: Converter) -> Self {
        Self::Custom(converter)
    }
}

/// A resolved converter: a unary function from a raw to a converted value.
///
/// Converters are cheap to clone and safe to share between threads.
#[derive(Clone)]
pub struct Converter {
    name: String,
    kind: Kind,
}

#[derive(Clone)]
enum Kind {
    Builtin(Builtin),
    Custom(Arc<ConvertFn>),
    ByKey {
        setting: String,
        table: OrderedMap<Value, Value>,
        keys: Vec<Value>,
    },
    Choice {
        setting: String,
        allowed: Vec<Value>,
    },
    OneOrMany(Box<Converter>),
}

impl Converter {
    /// Wraps a closure as a named converter.
    ///
    /// # Examples
    ///
    /// ```
    /// use confschema::converter::{ConvertError, Converter};
    /// use confschema::Value;
    ///
    /// let upper = Converter::custom("upper", |v: &Value| match v {
    ///     Value::Str(s) => Ok(Value::Str(s.to_uppercase())),
    ///     other => Err(ConvertError::type_error(format!("'{other}' is not text"))),
    /// });
    /// assert_eq!(upper.apply(&"abc".into()).unwrap(), Value::from("ABC"));
    /// ```
    pub fn custom<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<Value, ConvertError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: Kind::Custom(Arc::new(f)),
        }
    }

    pub(crate) fn builtin(name: &str, builtin: Builtin) -> Self {
        Self {
            name: name.to_string(),
            kind: Kind::Builtin(builtin),
        }
    }

    /// Lookup-table converter for setting `setting`.
    #[must_use]
    pub fn by_key(setting: &str, table: OrderedMap<Value, Value>) -> Self {
        let keys = table.keys().cloned().collect();
        Self {
            name: "choice".to_string(),
            kind: Kind::ByKey {
                setting: setting.to_string(),
                table,
                keys,
            },
        }
    }

    /// Closed-set converter for setting `setting`.
    #[must_use]
    pub fn choice(setting: &str, allowed: Vec<Value>) -> Self {
        Self {
            name: "choice".to_string(),
            kind: Kind::Choice {
                setting: setting.to_string(),
                allowed,
            },
        }
    }

    /// The `<name>` form over `base`.
    #[must_use]
    pub fn one_or_many(base: Converter) -> Self {
        Self {
            name: format!("<{}>", base.name),
            kind: Kind::OneOrMany(Box::new(base)),
        }
    }

    /// Name used in messages and debugging output.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Allowed values, when this converter is an enumeration.
    #[must_use]
    pub fn choices(&self) -> Option<&[Value]> {
        match &self.kind {
            Kind::ByKey { keys, .. } => Some(keys),
            Kind::Choice { allowed, .. } => Some(allowed),
            _ => None,
        }
    }

    /// Converts `raw`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConvertError`] raised by the underlying conversion.
    pub fn apply(&self, raw: &Value) -> std::result::Result<Value, ConvertError> {
        match &self.kind {
            Kind::Builtin(builtin) => builtin.convert(raw),
            Kind::Custom(f) => f(raw),
            Kind::ByKey { setting, table, .. } => table
                .get(raw)
                .cloned()
                .ok_or_else(|| ConvertError::key(bad_value(raw, setting))),
            Kind::Choice { setting, allowed } => {
                if allowed.contains(raw) {
                    Ok(raw.clone())
                } else {
                    Err(ConvertError::value(bad_value(raw, setting)))
                }
            }
            Kind::OneOrMany(base) => base.apply_one_or_many(raw),
        }
    }

    fn is_list(&self) -> bool {
        matches!(self.kind, Kind::Builtin(Builtin::List))
    }

    fn apply_one_or_many(&self, raw: &Value) -> std::result::Result<Value, ConvertError> {
        if self.is_list() {
            // A list of lists is already "many"; any other list is "one".
            return Ok(match raw {
                Value::List(items) if !items.is_empty() && items.iter().all(Value::is_list) => {
                    raw.clone()
                }
                _ => Value::List(vec![raw.clone()]),
            });
        }

        let convert = |item: &Value| {
            self.apply(item).map_err(|_| {
                ConvertError::type_error(format!(
                    "Value '{item}' can not be converted with '{}'.",
                    self.name
                ))
            })
        };
        match raw {
            Value::List(items) => items
                .iter()
                .map(convert)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Value::List),
            scalar => convert(scalar).map(|v| Value::List(vec![v])),
        }
    }
}

fn bad_value(raw: &Value, setting: &str) -> String {
    format!("Bad value ('{raw}') for option '{setting}'.")
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Converter");
        out.field("name", &self.name);
        if let Some(choices) = self.choices() {
            out.field("choices", &choices);
        }
        out.finish()
    }
}
