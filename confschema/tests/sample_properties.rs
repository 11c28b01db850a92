//! Property-based tests for sample templates.
//!
//! Run with `cargo test --features property-tests`.

#![cfg(feature = "property-tests")]

use confschema::sample::fill;
use confschema::{load_config, load_schema, SpecEntry, Value};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Example {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Example {
    fn entry(&self) -> SpecEntry {
        match self {
            Self::Int(i) => SpecEntry::new("int", *i),
            Self::Float(f) => SpecEntry::new("float", *f),
            Self::Text(s) => SpecEntry::new("str", s.as_str()),
        }
    }

    fn converted(&self) -> Value {
        match self {
            Self::Int(i) => Value::Int(*i),
            Self::Float(f) => Value::Float(*f),
            Self::Text(s) => Value::Str(s.clone()),
        }
    }
}

fn example_strategy() -> impl Strategy<Value = Example> {
    prop_oneof![
        any::<i64>().prop_map(Example::Int),
        (-1_000_000i64..1_000_000, 1u8..=8)
            .prop_map(|(n, d)| Example::Float(n as f64 / f64::from(d))),
        "[a-zA-Z][a-zA-Z0-9 ._-]{0,15}[a-zA-Z0-9]".prop_map(Example::Text),
    ]
}

fn schema_strategy() -> impl Strategy<Value = Vec<(String, Example, Option<String>)>> {
    prop::collection::btree_map(
        "[a-z][a-z_ -]{0,10}[a-z]",
        (example_strategy(), prop::option::of("[a-z]{1,12}( [a-z]{1,12}){0,20}")),
        0..8,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(key, (example, help))| (key, example, help))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    // A sample configuration validates against its own schema and yields
    // the converted examples.
    #[test]
    fn sample_validates_against_its_schema(entries in schema_strategy()) {
        let spec: Vec<(String, SpecEntry)> = entries
            .iter()
            .map(|(key, example, help)| {
                let entry = example.entry();
                let entry = match help {
                    Some(help) => entry.with_help(help.as_str()),
                    None => entry,
                };
                (key.clone(), entry)
            })
            .collect();
        let schema = load_schema(spec, None).unwrap();

        let sample = schema.sample_config();
        let config = schema.validate_config(&load_config(&sample).unwrap()).unwrap();

        prop_assert_eq!(config.len(), entries.len());
        for (key, example, _) in &entries {
            prop_assert_eq!(config.get(key), Some(&example.converted()));
        }
    }

    // Filled help never exceeds the width and keeps every word in order.
    #[test]
    fn fill_respects_width(
        words in prop::collection::vec("[a-z]{1,12}", 0..40),
        width in 16usize..100,
    ) {
        let text = words.join(" ");
        let filled = fill(&text, width, "# ");

        for line in filled.lines() {
            prop_assert!(line.starts_with("# "));
            prop_assert!(line.chars().count() <= width);
        }
        let rejoined: Vec<&str> = filled
            .lines()
            .flat_map(|line| line.trim_start_matches("# ").split(' '))
            .collect();
        prop_assert_eq!(rejoined, words.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
