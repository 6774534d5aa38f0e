use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::validation::{ValidationError, ValidationErrorType};

const DEFAULT_CONFIDENCE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixImpact {
    Low,
    Medium,
    High,
}

/// A proposed correction for one validation error. Nothing is applied here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixSuggestion {
    pub id: String,
    pub error_id: String,
    pub suggested_fix: String,
    pub reasoning: String,
    pub confidence: f64,
    pub impact: FixImpact,
    /// Literal replacement value, when the error alone is enough to derive one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_value: Option<Value>,
}

/// Suggestions for every auto-fixable error, in input order
pub fn suggest_fixes(errors: &[ValidationError]) -> Vec<FixSuggestion> {
    errors
        .iter()
        .filter(|error| error.auto_fixable)
        .map(suggest_fix)
        .collect()
}

/// Describe a fix for one error
///
/// Error types without a dedicated strategy get a generic suggestion rather than a failure.
pub fn suggest_fix(error: &ValidationError) -> FixSuggestion {
    FixSuggestion {
        id: format!("ai-fix-{}", error.id),
        error_id: error.id.clone(),
        suggested_fix: suggested_fix(error).to_string(),
        reasoning: reasoning(error.error_type).to_string(),
        confidence: confidence(error.error_type),
        impact: impact(error.error_type),
        proposed_value: proposed_value(error),
    }
}

fn confidence(error_type: ValidationErrorType) -> f64 {
    match error_type {
        ValidationErrorType::OutOfRange => 0.95,
        ValidationErrorType::MalformedList => 0.9,
        ValidationErrorType::BrokenJson => 0.85,
        ValidationErrorType::DuplicateId => 0.7,
        ValidationErrorType::UnknownReference => 0.6,
        _ => DEFAULT_CONFIDENCE,
    }
}

fn impact(error_type: ValidationErrorType) -> FixImpact {
    match error_type {
        ValidationErrorType::DuplicateId | ValidationErrorType::UnknownReference => {
            FixImpact::High
        }
        ValidationErrorType::OutOfRange | ValidationErrorType::BrokenJson => FixImpact::Medium,
        _ => FixImpact::Low,
    }
}

fn suggested_fix(error: &ValidationError) -> &'static str {
    match error.error_type {
        ValidationErrorType::OutOfRange if error.field.as_deref() == Some("PriorityLevel") => {
            "Set priority level to 3 (medium priority)"
        }
        ValidationErrorType::OutOfRange => "Adjust value to valid range",
        ValidationErrorType::BrokenJson => "Convert to valid JSON format: {}",
        ValidationErrorType::MalformedList => "Convert to properly formatted array",
        _ => "Apply recommended correction",
    }
}

fn reasoning(error_type: ValidationErrorType) -> &'static str {
    match error_type {
        ValidationErrorType::OutOfRange => {
            "Value falls outside acceptable range based on business rules"
        }
        ValidationErrorType::BrokenJson => "JSON parsing failed, suggesting structural issues",
        ValidationErrorType::MalformedList => "List format doesn't match expected structure",
        _ => "Standard validation rule violation detected",
    }
}

fn proposed_value(error: &ValidationError) -> Option<Value> {
    match (error.error_type, error.field.as_deref()) {
        (ValidationErrorType::OutOfRange, Some("PriorityLevel")) => Some(json!(3)),
        (ValidationErrorType::OutOfRange, Some("Duration" | "MaxConcurrent")) => Some(json!(1)),
        (ValidationErrorType::OutOfRange, Some("MaxLoadPerPhase")) => Some(json!(0)),
        (ValidationErrorType::BrokenJson, Some("AttributesJSON")) => {
            Some(Value::Object(Map::new()))
        }
        _ => None,
    }
}
