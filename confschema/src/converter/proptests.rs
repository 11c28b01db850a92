//! Property-based tests for converter resolution.

use super::{ConvertError, ConverterSource, Registry};
use crate::value::Value;
use proptest::prelude::*;

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        (-1.0e9f64..1.0e9).prop_map(Value::Float),
        any::<bool>().prop_map(Value::Bool),
        "[a-z]{1,8}".prop_map(Value::Str),
    ]
}

fn int_list_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1_000_000i64..1_000_000, 0..10)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // <float> keeps the length of a list and converts every element
    #[test]
    fn float_list_preserves_length(values in int_list_strategy()) {
        let floats = Registry::builtin().resolve("k", "<float>".into()).unwrap();
        let raw = Value::List(values.iter().copied().map(Value::Int).collect());
        let converted = floats.apply(&raw).unwrap();

        let items = converted.as_seq().unwrap();
        prop_assert_eq!(items.len(), values.len());
        for (item, original) in items.iter().zip(&values) {
            #[allow(clippy::cast_precision_loss)]
            let expected = *original as f64;
            prop_assert_eq!(item, &Value::Float(expected));
        }
    }

    // <float> of a single number is a one-element list
    #[test]
    fn float_scalar_is_wrapped(n in any::<i32>()) {
        let floats = Registry::builtin().resolve("k", "<float>".into()).unwrap();
        let converted = floats.apply(&Value::from(n)).unwrap();
        prop_assert_eq!(converted, Value::List(vec![Value::Float(f64::from(n))]));
    }

    // <list> is idempotent once its output is a list of lists
    #[test]
    fn list_of_lists_is_stable(
        rows in prop::collection::vec(int_list_strategy(), 1..5)
    ) {
        let lists = Registry::builtin().resolve("k", "<list>".into()).unwrap();
        let raw = Value::List(
            rows.iter()
                .map(|row| Value::List(row.iter().copied().map(Value::Int).collect()))
                .collect(),
        );
        let once = lists.apply(&raw).unwrap();
        prop_assert_eq!(&once, &raw);
        prop_assert_eq!(lists.apply(&once).unwrap(), once);
    }

    // A literal choice accepts exactly its members
    #[test]
    fn choice_accepts_only_members(
        allowed in prop::collection::vec(scalar_strategy(), 1..6),
        candidate in scalar_strategy()
    ) {
        let choice = Registry::builtin()
            .resolve("pick", ConverterSource::LiteralChoice(allowed.clone()))
            .unwrap();

        for member in &allowed {
            prop_assert_eq!(&choice.apply(member).unwrap(), member);
        }
        match choice.apply(&candidate) {
            Ok(v) => prop_assert!(allowed.contains(&v)),
            Err(err) => {
                prop_assert!(!allowed.contains(&candidate));
                prop_assert!(matches!(err, ConvertError::Value(_)), "unexpected error kind");
            }
        }
    }

    // int accepts the text form of any integer
    #[test]
    fn int_reads_its_own_display(n in any::<i64>()) {
        let int = Registry::builtin().resolve("k", "int".into()).unwrap();
        prop_assert_eq!(int.apply(&Value::Str(n.to_string())).unwrap(), Value::Int(n));
    }
}
