//! Shared helpers for the confschema integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use confschema::{ConvertError, Registry, Value};

/// Path of a file under `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Writes `content` to `dir/filename` and returns the path.
#[allow(dead_code)]
pub fn write_file(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).unwrap();
    path
}

/// Converters used by the refinement fixtures.
///
/// `get_cell` turns a sequence of numbers into floats.
#[allow(dead_code)]
pub fn cell_converters() -> Registry {
    let mut converters = Registry::new();
    converters.register("get_cell", |v: &Value| {
        let cells = v
            .as_seq()
            .ok_or_else(|| ConvertError::type_error(format!("Cell '{v}' is not a sequence.")))?;
        cells
            .iter()
            .map(|c| {
                c.as_f64()
                    .map(Value::Float)
                    .ok_or_else(|| ConvertError::value(format!("Bad cell dimension '{c}'.")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    });
    converters
}

/// Builds a list of floats.
#[allow(dead_code)]
pub fn floats(values: &[f64]) -> Value {
    Value::List(values.iter().copied().map(Value::Float).collect())
}
