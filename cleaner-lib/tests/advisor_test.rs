//! Fix suggestions derived from validation findings

use cleaner_lib::{
    Attributes, FixImpact, ValidationErrorType, suggest_fix, suggest_fixes, validate,
};
use serde_json::json;

mod common;
use common::{create_client, create_task, create_worker};

#[test]
fn test_priority_fix_proposes_medium_priority() {
    let errors = validate(&[create_client("C1", 8.0, &[])], &[], &[]);
    let suggestion = suggest_fix(&errors[0]);

    assert_eq!(suggestion.id, "ai-fix-client-priority-C1");
    assert_eq!(suggestion.error_id, "client-priority-C1");
    assert_eq!(suggestion.suggested_fix, "Set priority level to 3 (medium priority)");
    assert_eq!(suggestion.confidence, 0.95);
    assert_eq!(suggestion.impact, FixImpact::Medium);
    assert_eq!(suggestion.proposed_value, Some(json!(3)));
}

#[test]
fn test_broken_json_fix_resets_to_empty_object() {
    let mut client = create_client("C1", 2.0, &[]);
    client.attributes_json = Attributes::from_cell(&json!("{oops"));
    let errors = validate(&[client], &[], &[]);
    let suggestion = suggest_fix(&errors[0]);

    assert_eq!(suggestion.suggested_fix, "Convert to valid JSON format: {}");
    assert_eq!(suggestion.confidence, 0.85);
    assert_eq!(suggestion.proposed_value, Some(json!({})));
}

#[test]
fn test_malformed_slots_have_no_literal_value() {
    let errors = validate(&[], &[create_worker("W1", &[], &[0.0, 3.0], 1.0)], &[]);
    assert_eq!(errors[0].error_type, ValidationErrorType::MalformedList);
    let suggestion = suggest_fix(&errors[0]);

    assert_eq!(suggestion.suggested_fix, "Convert to properly formatted array");
    assert_eq!(suggestion.confidence, 0.9);
    assert_eq!(suggestion.impact, FixImpact::Low);
    assert_eq!(suggestion.proposed_value, None);
}

#[test]
fn test_duplicate_falls_back_to_generic_text() {
    let errors = validate(
        &[],
        &[],
        &[create_task("T1", &[]), create_task("T1", &[])],
    );
    let suggestion = suggest_fix(&errors[0]);

    assert_eq!(suggestion.suggested_fix, "Apply recommended correction");
    assert_eq!(suggestion.reasoning, "Standard validation rule violation detected");
    assert_eq!(suggestion.confidence, 0.7);
    assert_eq!(suggestion.impact, FixImpact::High);
}

#[test]
fn test_only_fixable_errors_get_suggestions() {
    let clients = vec![create_client("C1", 9.0, &["T404"])];
    let errors = validate(&clients, &[], &[]);
    assert_eq!(errors.len(), 2);

    let suggestions = suggest_fixes(&errors);
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].error_id, "client-priority-C1");
}

#[test]
fn test_suggestion_serialization() {
    let errors = validate(&[create_client("C1", 0.0, &[])], &[], &[]);
    let value = serde_json::to_value(suggest_fix(&errors[0])).unwrap();
    assert_eq!(value["errorId"], json!("client-priority-C1"));
    assert_eq!(value["impact"], json!("medium"));
    assert_eq!(value["proposedValue"], json!(3));
}
