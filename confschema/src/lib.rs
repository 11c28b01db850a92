#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # confschema
//!
//! Schema-driven validation and conversion of YAML configuration files.
//!
//! A schema names every setting a program accepts, together with a converter
//! that turns the raw YAML value into a typed one, an example value, help
//! text and an optional default. From a schema this library validates and
//! converts configurations, and renders commented sample configurations.
//!
//! ## Core Types
//!
//! - [`Schema`], [`SchemaSpec`] and [`SpecEntry`]: schema specifications
//! - [`Configuration`] and [`Settings`]: validated and raw configurations
//! - [`Value`] and [`OrderedMap`]: the value tree and its ordered mappings
//! - [`Registry`] and [`Converter`]: converter lookup and conversion
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use confschema::{load_config, load_schema, Value};
//!
//! let schema = load_schema(
//!     "!!omap\n\
//!      - pdb model : [str, my_model.pdb, null]\n\
//!      - reset b-facs : [float, -1, New B factor (-1 for no reset), -1]\n\
//!      - cell dimensions : [<float>, [200, 200, 200], null]\n",
//!     None,
//! )
//! .unwrap();
//!
//! let raw = load_config("pdb model : model.pdb\ncell dimensions : [59, 95, 159]\n").unwrap();
//! let config = schema.validate_config(&raw).unwrap();
//!
//! assert_eq!(config.get("reset b-facs"), Some(&Value::Float(-1.0)));
//! assert_eq!(
//!     config.get("cell dimensions"),
//!     Some(&Value::List(vec![59.0.into(), 95.0.into(), 159.0.into()]))
//! );
//! ```

pub mod converter;
pub mod error;
pub mod logging;
pub mod ordered;
pub mod overrides;
pub mod sample;
pub mod schema;
pub mod validator;
pub mod value;

// Re-export key types at crate root for convenience
pub use converter::{ConvertError, Converter, ConverterSource, Registry};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use ordered::OrderedMap;
pub use overrides::{apply_overrides, parse_override};
pub use sample::sample_config;
pub use schema::{load_schema, read_schema, Schema, SchemaEntry, SchemaSpec, SpecEntry};
pub use validator::{
    load_config, read_config, read_settings, validate_config, Configuration, Settings,
};
pub use value::{Complex, Slice, Value};
