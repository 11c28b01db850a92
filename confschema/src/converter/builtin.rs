//! Built-in converters.
//!
//! Names follow the YAML type repository (`map`, `omap`, `pairs`, `set`,
//! `seq`, `bool`, `int`, `float`, `str`, `timestamp`) plus the aliases schema
//! authors tend to reach for (`dict`, `list`, `tuple`, `long`, `complex`,
//! `slice`, `text`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

use super::ConvertError;
use crate::ordered::OrderedMap;
use crate::value::{Complex, Slice, Value};

type Converted = Result<Value, ConvertError>;

/// The conversion performed by a built-in converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Mapping, from a mapping or a sequence of pairs.
    Map,
    /// Mapping, additionally from a sequence of single-key mappings.
    OrderedMap,
    /// List of 2-tuples.
    Pairs,
    /// Unique members in first-seen order.
    Set,
    /// List.
    List,
    /// Tuple.
    Tuple,
    /// Boolean.
    ///
    /// Text is read as a YAML-style flag (`yes`/`no`, `on`/`off`,
    /// `true`/`false`, `1`/`0`, empty is false) and any other text is
    /// rejected, so `"no"` converts to `false`. This is not truthiness of
    /// the text. Numbers are true when non-zero and null is false.
    Bool,
    /// 64-bit integer.
    Int,
    /// 128-bit integer.
    Long,
    /// Floating point number.
    Float,
    /// Complex number.
    Complex,
    /// String.
    Str,
    /// Date and time.
    Timestamp,
    /// Slice bounds.
    Slice,
}

/// Every built-in, keyed by the names it is registered under.
pub(crate) const BUILTINS: &[(&str, Builtin)] = &[
    ("map", Builtin::Map),
    ("dict", Builtin::Map),
    ("omap", Builtin::OrderedMap),
    ("odict", Builtin::OrderedMap),
    ("pairs", Builtin::Pairs),
    ("set", Builtin::Set),
    ("seq", Builtin::List),
    ("list", Builtin::List),
    ("tuple", Builtin::Tuple),
    ("bool", Builtin::Bool),
    ("int", Builtin::Int),
    ("long", Builtin::Long),
    ("float", Builtin::Float),
    ("complex", Builtin::Complex),
    ("str", Builtin::Str),
    ("unicode", Builtin::Str),
    ("text", Builtin::Str),
    ("timestamp", Builtin::Timestamp),
    ("slice", Builtin::Slice),
];

impl Builtin {
    pub(crate) fn convert(self, raw: &Value) -> Converted {
        match self {
            Self::Map => to_map(raw, false),
            Self::OrderedMap => to_map(raw, true),
            Self::Pairs => to_pairs(raw),
            Self::Set => to_set(raw),
            Self::List => members(raw).map(Value::List),
            Self::Tuple => members(raw).map(Value::Tuple),
            Self::Bool => to_bool(raw),
            Self::Int => to_int(raw),
            Self::Long => to_long(raw),
            Self::Float => to_float(raw),
            Self::Complex => to_complex(raw),
            Self::Str => Ok(match raw {
                Value::Str(_) => raw.clone(),
                other => Value::Str(other.to_string()),
            }),
            Self::Timestamp => to_timestamp(raw),
            Self::Slice => to_slice(raw),
        }
    }
}

fn not_convertible(raw: &Value, target: &str) -> ConvertError {
    ConvertError::type_error(format!(
        "Value '{raw}' of type '{}' can not be converted to {target}.",
        raw.type_name()
    ))
}

fn invalid_literal(raw: &str, target: &str) -> ConvertError {
    ConvertError::value(format!("Invalid literal for {target}: '{raw}'."))
}

/// Items of anything iterable: sequences, mapping keys, string characters.
fn members(raw: &Value) -> Result<Vec<Value>, ConvertError> {
    match raw {
        Value::List(items) | Value::Tuple(items) | Value::Set(items) => Ok(items.clone()),
        Value::Map(map) => Ok(map.keys().cloned().collect()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        other => Err(ConvertError::type_error(format!(
            "Value '{other}' of type '{}' is not iterable.",
            other.type_name()
        ))),
    }
}

fn to_set(raw: &Value) -> Converted {
    let mut unique: Vec<Value> = Vec::new();
    for item in members(raw)? {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    Ok(Value::Set(unique))
}

/// Splits one item of a pair sequence into key and value.
///
/// Accepts two-element sequences and, when `single_key_maps` is set, the
/// single-entry mappings YAML uses for `!!omap` and `!!pairs`.
fn pair_of(item: &Value, single_key_maps: bool) -> Option<(Value, Value)> {
    match item {
        Value::List(kv) | Value::Tuple(kv) if kv.len() == 2 => Some((kv[0].clone(), kv[1].clone())),
        Value::Map(map) if single_key_maps && map.len() == 1 => {
            map.get_index(0).map(|(k, v)| (k.clone(), v.clone()))
        }
        _ => None,
    }
}

fn to_map(raw: &Value, single_key_maps: bool) -> Converted {
    match raw {
        Value::Map(_) => Ok(raw.clone()),
        Value::List(items) | Value::Tuple(items) => {
            let mut map = OrderedMap::new();
            for (i, item) in items.iter().enumerate() {
                let (k, v) = pair_of(item, single_key_maps).ok_or_else(|| {
                    ConvertError::value(format!(
                        "Element #{i} ('{item}') of '{raw}' is not a key-value pair."
                    ))
                })?;
                map.insert(k, v);
            }
            Ok(Value::Map(map))
        }
        other => Err(not_convertible(other, "a mapping")),
    }
}

fn to_pairs(raw: &Value) -> Converted {
    let pairs = match raw {
        Value::Map(map) => map
            .iter()
            .map(|(k, v)| Value::Tuple(vec![k.clone(), v.clone()]))
            .collect(),
        Value::List(items) | Value::Tuple(items) => items
            .iter()
            .map(|item| {
                pair_of(item, true)
                    .map(|(k, v)| Value::Tuple(vec![k, v]))
                    .ok_or_else(|| ConvertError::value(format!("Item '{item}' is not a pair.")))
            })
            .collect::<Result<Vec<_>, _>>()?,
        other => return Err(not_convertible(other, "pairs")),
    };
    Ok(Value::List(pairs))
}

fn to_bool(raw: &Value) -> Converted {
    let b = match raw {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::BigInt(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "on" | "1" => true,
            "false" | "no" | "n" | "off" | "0" | "" => false,
            _ => return Err(invalid_literal(s, "bool")),
        },
        other => return Err(not_convertible(other, "bool")),
    };
    Ok(Value::Bool(b))
}

/// Integer part of a finite float, if it fits in `i128`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn truncate(f: f64) -> Option<i128> {
    let t = f.trunc();
    (t.is_finite() && t >= i128::MIN as f64 && t < i128::MAX as f64).then_some(t as i128)
}

fn parse_integer(s: &str) -> Option<i128> {
    let cleaned: String = s.trim().chars().filter(|c| *c != '_').collect();
    cleaned.parse().ok()
}

fn integer(raw: &Value, target: &str) -> Result<i128, ConvertError> {
    match raw {
        Value::Bool(b) => Ok(i128::from(*b)),
        Value::Int(i) => Ok(i128::from(*i)),
        Value::BigInt(i) => Ok(*i),
        Value::Float(f) => truncate(*f).ok_or_else(|| {
            ConvertError::value(format!("Cannot convert float '{raw}' to {target}."))
        }),
        Value::Str(s) => parse_integer(s).ok_or_else(|| invalid_literal(s, target)),
        other => Err(not_convertible(other, target)),
    }
}

fn to_int(raw: &Value) -> Converted {
    let i = integer(raw, "int")?;
    i64::try_from(i)
        .map(Value::Int)
        .map_err(|_| ConvertError::value(format!("Value '{raw}' is out of range for int.")))
}

fn to_long(raw: &Value) -> Converted {
    integer(raw, "long").map(Value::BigInt)
}

fn to_float(raw: &Value) -> Converted {
    match raw {
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::Str(s) => parse_float(s)
            .map(Value::Float)
            .ok_or_else(|| invalid_literal(s, "float")),
        other => other
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| not_convertible(other, "float")),
    }
}

/// Parses decimal text plus the YAML spellings of infinity and NaN.
fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        ".inf" | "+.inf" => Some(f64::INFINITY),
        "-.inf" => Some(f64::NEG_INFINITY),
        ".nan" => Some(f64::NAN),
        _ => s.replace('_', "").parse().ok(),
    }
}

/// Parses `"3"`, `"2j"`, `"3+2j"`, `"3-2.5e1j"` and parenthesised forms.
fn parse_complex(s: &str) -> Option<Complex> {
    let s = s.trim();
    let s = s
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(s)
        .trim();

    let Some(body) = s.strip_suffix('j').or_else(|| s.strip_suffix('J')) else {
        return parse_float(s).map(|re| Complex { re, im: 0.0 });
    };

    // The imaginary part starts at the last sign that is not an exponent sign.
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'));
    let (re, im) = match split {
        Some(i) => (parse_float(&body[..i])?, &body[i..]),
        None => (0.0, body),
    };
    let im = match im {
        "" | "+" => 1.0,
        "-" => -1.0,
        text => parse_float(text)?,
    };
    Some(Complex { re, im })
}

fn to_complex(raw: &Value) -> Converted {
    let fail = || {
        ConvertError::value(format!(
            "The value '{raw}' can't convert to a complex number."
        ))
    };
    let c = match raw {
        Value::Complex(c) => *c,
        Value::Str(s) => parse_complex(s).ok_or_else(fail)?,
        Value::List(parts) | Value::Tuple(parts) => {
            let nums = parts
                .iter()
                .map(Value::as_f64)
                .collect::<Option<Vec<_>>>()
                .ok_or_else(fail)?;
            match nums[..] {
                [] => Complex { re: 0.0, im: 0.0 },
                [re] => Complex { re, im: 0.0 },
                [re, im] => Complex { re, im },
                _ => return Err(fail()),
            }
        }
        Value::Bool(b) => Complex {
            re: if *b { 1.0 } else { 0.0 },
            im: 0.0,
        },
        other => Complex {
            re: other.as_f64().ok_or_else(fail)?,
            im: 0.0,
        },
    };
    Ok(Value::Complex(c))
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&s.replacen(' ', "T", 1)) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f %:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.naive_utc());
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dt%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Builds a timestamp from `[year, month, day, hour?, minute?, second?]`.
///
/// Extra trailing fields are ignored.
fn timestamp_from_fields(fields: &[Value]) -> Option<NaiveDateTime> {
    let mut parts = [0i64; 6];
    if fields.len() < 3 {
        return None;
    }
    for (slot, field) in parts.iter_mut().zip(fields) {
        *slot = field.as_i64()?;
    }
    let [year, month, day, hour, minute, second] = parts;
    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )?
    .and_hms_opt(
        u32::try_from(hour).ok()?,
        u32::try_from(minute).ok()?,
        u32::try_from(second).ok()?,
    )
}

fn to_timestamp(raw: &Value) -> Converted {
    let parsed = match raw {
        Value::Timestamp(t) => Some(*t),
        Value::Str(s) => parse_timestamp(s),
        Value::List(fields) | Value::Tuple(fields) => timestamp_from_fields(fields),
        other => return Err(not_convertible(other, "a timestamp")),
    };
    parsed
        .and_then(|t| t.with_nanosecond(0))
        .map(Value::Timestamp)
        .ok_or_else(|| ConvertError::value(format!("Value '{raw}' is not a valid timestamp.")))
}

fn to_slice(raw: &Value) -> Converted {
    let parts = match raw {
        Value::Slice(_) => return Ok(raw.clone()),
        Value::List(parts) | Value::Tuple(parts) => parts,
        other => return Err(not_convertible(other, "a slice")),
    };
    let bounds = parts
        .iter()
        .map(|p| match p {
            Value::Null => Ok(None),
            other => other.as_i64().map(Some).ok_or_else(|| {
                ConvertError::type_error(format!("Slice bound '{other}' is not an integer."))
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    let slice = match bounds[..] {
        [stop] => Slice {
            start: None,
            stop,
            step: None,
        },
        [start, stop] => Slice {
            start,
            stop,
            step: None,
        },
        [start, stop, step] => Slice { start, stop, step },
        _ => {
            return Err(ConvertError::value(format!(
                "Slice '{raw}' must have 1 to 3 bounds."
            )))
        }
    };
    Ok(Value::Slice(slice))
}
