//! Field coercion behaviour as seen from ingestion and editing

use cleaner_lib::{
    FieldShape, MixedItem, coerce, coerce_json_object, coerce_number, coerce_number_array,
    coerce_phase_list, coerce_string_array,
};
use proptest::prelude::*;
use serde_json::{Value, json};

#[test]
fn test_numeric_array_from_json_text() {
    assert_eq!(
        coerce(&json!("[1,2,3]"), FieldShape::NumberArray),
        json!([1.0, 2.0, 3.0])
    );
}

#[test]
fn test_numeric_array_from_comma_text() {
    assert_eq!(
        coerce(&json!("1, 2, 3"), FieldShape::NumberArray),
        coerce(&json!("[1,2,3]"), FieldShape::NumberArray)
    );
}

#[test]
fn test_unparseable_json_is_wrapped() {
    assert_eq!(
        coerce(&json!("not json"), FieldShape::JsonObject),
        json!({"originalValue": "not json"})
    );
}

#[test]
fn test_json_object_variants() {
    assert_eq!(
        Value::Object(coerce_json_object(&json!("{\"tier\": \"gold\"}"))),
        json!({"tier": "gold"})
    );
    assert_eq!(Value::Object(coerce_json_object(&json!("  "))), json!({}));
    assert_eq!(Value::Object(coerce_json_object(&json!("[1]"))), json!({"value": [1]}));
    assert_eq!(Value::Object(coerce_json_object(&json!(5))), json!({"value": 5}));
}

#[test]
fn test_broken_bracket_list_falls_back_to_split() {
    assert_eq!(coerce_string_array(&json!("[ML, Data]")), vec!["ML", "Data"]);
    assert_eq!(coerce_number_array(&json!("[1, x, 3]")), vec![1.0, 3.0]);
}

#[test]
fn test_number_prefix_and_defaults() {
    assert_eq!(coerce_number(&json!("3 days"), 1.0), 3.0);
    assert_eq!(coerce_number(&json!("-2"), 1.0), -2.0);
    assert_eq!(coerce_number(&json!("n/a"), 1.0), 1.0);
    assert_eq!(coerce_number(&json!(0), 1.0), 0.0);
}

#[test]
fn test_phase_ranges_expand() {
    assert_eq!(
        coerce_phase_list(&json!("1-3, 5")),
        vec![
            MixedItem::Number(1.0),
            MixedItem::Number(2.0),
            MixedItem::Number(3.0),
            MixedItem::Number(5.0),
        ]
    );
    assert_eq!(
        coerce_phase_list(&json!("[2, \"late\"]")),
        vec![MixedItem::Number(2.0), MixedItem::Text("late".to_string())]
    );
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500, ..ProptestConfig::default()
    })]

    #[test]
    fn test_comma_and_bracket_lists_agree(values in prop::collection::vec(0u32..1000, 1..8)) {
        let comma = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
        let bracket = format!("[{}]", values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(","));
        let expected: Vec<f64> = values.iter().map(|v| *v as f64).collect();

        prop_assert_eq!(coerce_number_array(&json!(comma)), expected.clone());
        prop_assert_eq!(coerce_number_array(&json!(bracket)), expected);
    }

    #[test]
    fn test_string_list_items_are_trimmed_and_non_empty(
        items in prop::collection::vec("[a-zA-Z]{1,6}", 0..6),
        padding in " {0,3}"
    ) {
        let text = items
            .iter()
            .map(|item| format!("{}{}{}", padding, item, padding))
            .collect::<Vec<_>>()
            .join(",");
        let result = coerce_string_array(&json!(text));
        prop_assert_eq!(result, items);
    }

    #[test]
    fn test_json_coercion_always_yields_an_object(text in ".{0,20}") {
        let value = coerce(&json!(text), FieldShape::JsonObject);
        prop_assert!(value.is_object());
    }
}
