//! The dynamically typed value tree.
//!
//! Raw YAML is lifted into [`Value`] before validation, and converters map one
//! `Value` to another. The variants past the YAML core types (big integers,
//! complex numbers, timestamps, slices, tuples and sets) only ever come out of
//! converters.

use std::fmt::{self, Write as _};

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::ordered::OrderedMap;

/// Format used when displaying timestamps; also accepted by the `timestamp`
/// converter so templates read back cleanly.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// YAML `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A 64-bit integer.
    Int(i64),
    /// A 128-bit integer, produced by the `long` converter.
    BigInt(i128),
    /// A floating point number.
    Float(f64),
    /// A complex number.
    Complex(Complex),
    /// A string.
    Str(String),
    /// A date and time without zone.
    Timestamp(NaiveDateTime),
    /// A slice description.
    Slice(Slice),
    /// A sequence.
    List(Vec<Value>),
    /// A fixed sequence, produced by the `tuple` converter.
    Tuple(Vec<Value>),
    /// Unique members in first-seen order, produced by the `set` converter.
    Set(Vec<Value>),
    /// An ordered mapping.
    Map(OrderedMap<Value, Value>),
}

/// A complex number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

/// Bounds of a slice; each part may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    /// First index.
    pub start: Option<i64>,
    /// One past the last index.
    pub stop: Option<i64>,
    /// Stride.
    pub step: Option<i64>,
}

impl Value {
    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::BigInt(_) => "long",
            Self::Float(_) => "float",
            Self::Complex(_) => "complex",
            Self::Str(_) => "str",
            Self::Timestamp(_) => "timestamp",
            Self::Slice(_) => "slice",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
        }
    }

    /// Whether this is a [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this is a [`Value::List`] (tuples and sets are not lists).
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Borrows the string, if this is a [`Value::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean, if this is a [`Value::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is an integer that fits in `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::BigInt(i) => i64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// The number as `f64`, if this is an integer or float.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::BigInt(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Borrows the items of a list, tuple or set.
    #[must_use]
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Tuple(items) | Self::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the mapping, if this is a [`Value::Map`].
    #[must_use]
    pub fn as_map(&self) -> Option<&OrderedMap<Value, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Text used when this value is a mapping key.
    ///
    /// Strings are used verbatim; anything else uses its display form, so the
    /// YAML key `1` becomes the setting name `"1"`.
    #[must_use]
    pub fn key_string(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Renders the value as a single-line YAML flow literal.
    ///
    /// Strings are quoted when YAML would otherwise read them back as
    /// something else, so `literal()` output parses to an equal value for the
    /// core YAML types.
    ///
    /// # Examples
    ///
    /// ```
    /// use confschema::Value;
    ///
    /// let v = Value::List(vec![Value::Int(200), Value::Str("yes".into())]);
    /// assert_eq!(v.literal(), "[200, yes]");
    /// assert_eq!(Value::Str("1.5".into()).literal(), "\"1.5\"");
    /// ```
    #[must_use]
    pub fn literal(&self) -> String {
        let mut out = String::new();
        self.write_literal(&mut out);
        out
    }

    fn write_literal(&self, out: &mut String) {
        match self {
            Self::Str(s) => write_str_literal(s, out),
            Self::List(items) | Self::Tuple(items) | Self::Set(items) => {
                write_seq_literal(items, out);
            }
            Self::Slice(slice) => {
                let parts = [slice.start, slice.stop, slice.step]
                    .map(|part| part.map_or(Self::Null, Self::Int));
                write_seq_literal(&parts, out);
            }
            Self::Map(map) => {
                out.push('{');
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    k.write_literal(out);
                    out.push_str(": ");
                    v.write_literal(out);
                }
                out.push('}');
            }
            Self::Complex(_) | Self::Timestamp(_) => write_str_literal(&self.to_string(), out),
            // YAML integers stop at the 64-bit range; `long` reads the text back.
            Self::BigInt(i) if i64::try_from(*i).is_err() && u64::try_from(*i).is_err() => {
                write_str_literal(&i.to_string(), out);
            }
            scalar => {
                let _ = write!(out, "{scalar}");
            }
        }
    }
}

fn write_seq_literal(items: &[Value], out: &mut String) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        item.write_literal(out);
    }
    out.push(']');
}

/// Quotes `s` unless YAML reads it back, plain, as the same string.
fn write_str_literal(s: &str, out: &mut String) {
    if is_plain_safe(s) {
        out.push_str(s);
        return;
    }
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if c.is_control() || c == '\u{feff}' => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn is_plain_safe(s: &str) -> bool {
    if s.is_empty() || s.trim() != s {
        return false;
    }
    // Flow collections end at these, and line breaks end the `key : value`
    // line, so they can never appear unquoted.
    if s.chars().any(|c| {
        matches!(c, ',' | '[' | ']' | '{' | '}' | '\u{2028}' | '\u{2029}' | '\u{feff}')
            || c.is_control()
    }) {
        return false;
    }
    matches!(
        serde_yaml::from_str::<serde_yaml::Value>(s),
        Ok(serde_yaml::Value::String(parsed)) if parsed == s
    )
}

fn write_float(f: f64, out: &mut fmt::Formatter<'_>) -> fmt::Result {
    if f.is_nan() {
        out.write_str(".nan")
    } else if f.is_infinite() {
        out.write_str(if f > 0.0 { ".inf" } else { "-.inf" })
    } else if f != 0.0 && !(1e-4..1e16).contains(&f.abs()) {
        // Exponent form, so YAML cannot mistake a large whole number for an
        // out-of-range integer.
        write!(out, "{f:e}")
    } else if f.fract() == 0.0 {
        write!(out, "{f:.1}")
    } else {
        write!(out, "{f}")
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.re == 0.0 && !self.re.is_sign_negative() {
            write!(f, "{}j", self.im)
        } else {
            write!(f, "{}{:+}j", self.re, self.im)
        }
    }
}

impl fmt::Display for Value {
    /// Plain rendering: top-level strings are shown unquoted, everything else
    /// as its [`literal`](Value::literal).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::BigInt(i) => write!(f, "{i}"),
            Self::Float(x) => write_float(*x, f),
            Self::Complex(c) => write!(f, "{c}"),
            Self::Str(s) => f.write_str(s),
            Self::Timestamp(t) => write!(f, "{}", t.format(TIMESTAMP_FORMAT)),
            other => f.write_str(&other.literal()),
        }
    }
}

impl From<serde_yaml::Value> for Value {
    /// Lifts parsed YAML; tags such as `!!omap` are dropped in favour of the
    /// tagged content.
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Null => Self::Null,
            Yaml::Bool(b) => Self::Bool(b),
            Yaml::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::BigInt(i128::from(u))
                } else {
                    n.as_f64().map_or(Self::Null, Self::Float)
                }
            }
            Yaml::String(s) => Self::Str(s),
            Yaml::Sequence(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Yaml::Mapping(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (Self::from(k), Self::from(v)))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::BigInt(i) => serializer.serialize_i128(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Str(s) => serializer.serialize_str(s),
            Self::Complex(_) | Self::Timestamp(_) => serializer.collect_str(self),
            Self::Slice(slice) => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element(&slice.start)?;
                seq.serialize_element(&slice.stop)?;
                seq.serialize_element(&slice.step)?;
                seq.end()
            }
            Self::List(items) | Self::Tuple(items) | Self::Set(items) => {
                serializer.collect_seq(items)
            }
            Self::Map(map) => {
                // String keys keep the output valid JSON as well as YAML.
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(&k.key_string(), v)?;
                }
                out.end()
            }
        }
    }
}
