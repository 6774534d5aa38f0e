use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::utils::format_number;
use crate::validation::SLOT_RANGE;

/// Target shape for a raw spreadsheet cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldShape {
    String,
    Number { default: f64 },
    StringArray,
    NumberArray,
    MixedArray,
    JsonObject,
}

/// An element of a mixed list: a number when the token parses, the trimmed text otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MixedItem {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for MixedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MixedItem::Number(n) => write!(f, "{}", format_number(*n)),
            MixedItem::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Coerce a raw cell into the requested shape. Never fails.
pub fn coerce(raw: &Value, shape: FieldShape) -> Value {
    match shape {
        FieldShape::String => Value::String(coerce_string(raw)),
        FieldShape::Number { default } => json!(coerce_number(raw, default)),
        FieldShape::StringArray => json!(coerce_string_array(raw)),
        FieldShape::NumberArray => json!(coerce_number_array(raw)),
        FieldShape::MixedArray => json!(coerce_mixed_array(raw)),
        FieldShape::JsonObject => Value::Object(coerce_json_object(raw)),
    }
}

/// True for null cells and cells holding only whitespace
pub(crate) fn is_blank(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Trimmed text rendering of a cell
pub fn coerce_string(raw: &Value) -> String {
    match raw {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(coerce_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => raw.to_string(),
    }
}

/// Parse a number the way a lenient spreadsheet parser does
///
/// The whole trimmed text is tried first; otherwise the longest leading numeric
/// prefix is used ("3 days" -> 3). Non-finite results are rejected.
pub(crate) fn parse_number_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = trimmed.parse::<f64>() {
        return value.is_finite().then_some(value);
    }

    let prefix = numeric_prefix(trimmed);
    if prefix.is_empty() {
        return None;
    }
    prefix.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut end = 0;
    let mut digits = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut fraction_end = end + 1;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
            digits += 1;
        }
        if digits > 0 {
            end = fraction_end;
        }
    }
    if digits == 0 {
        return "";
    }

    // Exponent only counts when followed by digits ("2e" stays "2")
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &text[..end]
}

fn number_from_cell(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number_text(s),
        _ => None,
    }
}

/// Coerce a cell into a number, falling back to `default` when it is blank or unparseable
pub fn coerce_number(raw: &Value, default: f64) -> f64 {
    number_from_cell(raw).unwrap_or(default)
}

/// Optional numeric field: `None` when the cell is blank or does not parse
pub(crate) fn coerce_optional_number(raw: &Value) -> Option<f64> {
    number_from_cell(raw)
}

/// Split a cell into list items
///
/// Bracketed text is parsed as a JSON array first; when that fails the brackets are
/// stripped and the content is comma-split like any other text.
fn array_items(raw: &Value) -> Vec<Value> {
    match raw {
        Value::Null | Value::Bool(false) => Vec::new(),
        Value::Array(items) => items.clone(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Vec::new();
            }

            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
                    return items;
                }
                return split_tokens(&trimmed[1..trimmed.len() - 1]);
            }

            split_tokens(trimmed)
        }
        other => vec![other.clone()],
    }
}

fn split_tokens(text: &str) -> Vec<Value> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Value::String(token.to_string()))
        .collect()
}

pub fn coerce_string_array(raw: &Value) -> Vec<String> {
    array_items(raw)
        .iter()
        .map(coerce_string)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Numeric list; items that do not parse are dropped silently
pub fn coerce_number_array(raw: &Value) -> Vec<f64> {
    array_items(raw).iter().filter_map(number_from_cell).collect()
}

pub fn coerce_mixed_array(raw: &Value) -> Vec<MixedItem> {
    array_items(raw)
        .iter()
        .filter_map(|item| match number_from_cell(item) {
            Some(n) => Some(MixedItem::Number(n)),
            None => {
                let text = coerce_string(item);
                (!text.is_empty()).then_some(MixedItem::Text(text))
            }
        })
        .collect()
}

/// Highest phase a range token may reach; phases share the slot numbering
const MAX_PHASE: u32 = SLOT_RANGE.1 as u32;

/// Phase list for tasks: like a mixed list, with "a-b" tokens expanded to every phase in the range
///
/// Only ascending ranges ending at or below `MAX_PHASE` are expanded. Any other range
/// token is kept as text.
pub fn coerce_phase_list(raw: &Value) -> Vec<MixedItem> {
    let mut phases = Vec::new();
    for item in array_items(raw) {
        if let Value::String(token) = &item {
            if let Some((start, end)) = parse_phase_range(token) {
                if start <= end && end <= MAX_PHASE {
                    phases.extend((start..=end).map(|p| MixedItem::Number(p as f64)));
                } else {
                    phases.push(MixedItem::Text(token.trim().to_string()));
                }
                continue;
            }
        }
        match number_from_cell(&item) {
            Some(n) => phases.push(MixedItem::Number(n)),
            None => {
                let text = coerce_string(&item);
                if !text.is_empty() {
                    phases.push(MixedItem::Text(text));
                }
            }
        }
    }
    phases
}

fn parse_phase_range(token: &str) -> Option<(u32, u32)> {
    let (start, end) = token.trim().split_once('-')?;
    let start = start.trim().parse::<u32>().ok()?;
    let end = end.trim().parse::<u32>().ok()?;
    Some((start, end))
}

/// Coerce a cell into a key/value map
///
/// Maps pass through and blank cells give an empty map. Text that fails to parse is kept
/// as `{"originalValue": <text>}`; parsed non-object JSON and other scalars become `{"value": ...}`.
pub fn coerce_json_object(raw: &Value) -> Map<String, Value> {
    if is_blank(raw) {
        return Map::new();
    }

    let mut wrapped = Map::new();
    match raw {
        Value::Object(map) => return map.clone(),
        Value::String(s) => match serde_json::from_str::<Value>(s.trim()) {
            Ok(Value::Object(map)) => return map,
            Ok(other) => {
                wrapped.insert("value".to_string(), other);
            }
            Err(_) => {
                wrapped.insert("originalValue".to_string(), Value::String(s.clone()));
            }
        },
        other => {
            wrapped.insert("value".to_string(), other.clone());
        }
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_fallback_to_default() {
        assert_eq!(coerce_number(&json!(""), 1.0), 1.0);
        assert_eq!(coerce_number(&Value::Null, 0.0), 0.0);
        assert_eq!(coerce_number(&json!("abc"), 1.0), 1.0);
        assert_eq!(coerce_number(&json!(true), 1.0), 1.0);
        assert_eq!(coerce_number(&json!("Infinity"), 1.0), 1.0);
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(coerce_number(&json!(" 4 "), 1.0), 4.0);
        assert_eq!(coerce_number(&json!("2.5"), 1.0), 2.5);
        assert_eq!(coerce_number(&json!(7), 1.0), 7.0);
        assert_eq!(coerce_number(&json!("0"), 1.0), 0.0);
        assert_eq!(coerce_number(&json!("-3"), 1.0), -3.0);
    }

    #[test]
    fn test_number_leading_prefix() {
        assert_eq!(coerce_number(&json!("3 days"), 1.0), 3.0);
        assert_eq!(coerce_number(&json!("2e"), 1.0), 2.0);
        assert_eq!(coerce_number(&json!("1.5e2x"), 1.0), 150.0);
        assert_eq!(coerce_number(&json!("-.5kg"), 1.0), -0.5);
        assert_eq!(coerce_number(&json!("."), 1.0), 1.0);
    }

    #[test]
    fn test_string_rendering() {
        assert_eq!(coerce_string(&json!("  Acme ")), "Acme");
        assert_eq!(coerce_string(&json!(12.0)), "12");
        assert_eq!(coerce_string(&Value::Null), "");
        assert_eq!(coerce_string(&json!(["a", 1])), "a,1");
    }

    #[test]
    fn test_bracketed_array_falls_back_to_split() {
        assert_eq!(
            coerce_string_array(&json!("[T1, T2]")),
            vec!["T1".to_string(), "T2".to_string()]
        );
        assert_eq!(
            coerce_string_array(&json!("[\"T1\",\"T2\"]")),
            vec!["T1".to_string(), "T2".to_string()]
        );
    }

    #[test]
    fn test_array_drops_empty_tokens() {
        assert_eq!(
            coerce_string_array(&json!("a,, b ,")),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(coerce_string_array(&json!("   ")).is_empty());
    }

    #[test]
    fn test_scalar_becomes_single_item_list() {
        assert_eq!(coerce_number_array(&json!(3)), vec![3.0]);
        assert_eq!(coerce_string_array(&json!(true)), vec!["true".to_string()]);
        assert!(coerce_string_array(&json!(false)).is_empty());
    }

    #[test]
    fn test_number_array_filters_unparseable() {
        assert_eq!(coerce_number_array(&json!("1, x, 3")), vec![1.0, 3.0]);
        assert_eq!(coerce_number_array(&json!("[1,\"2\",null]")), vec![1.0, 2.0]);
    }

    #[test]
    fn test_mixed_array() {
        assert_eq!(
            coerce_mixed_array(&json!("1, two, 3")),
            vec![
                MixedItem::Number(1.0),
                MixedItem::Text("two".to_string()),
                MixedItem::Number(3.0)
            ]
        );
    }

    #[test]
    fn test_phase_list_expands_ranges() {
        assert_eq!(
            coerce_phase_list(&json!("1-3, 5")),
            vec![
                MixedItem::Number(1.0),
                MixedItem::Number(2.0),
                MixedItem::Number(3.0),
                MixedItem::Number(5.0)
            ]
        );
        assert_eq!(
            coerce_phase_list(&json!("[2,4]")),
            vec![MixedItem::Number(2.0), MixedItem::Number(4.0)]
        );
        assert_eq!(
            coerce_phase_list(&json!("9-10")),
            vec![MixedItem::Number(9.0), MixedItem::Number(10.0)]
        );
    }

    #[test]
    fn test_phase_ranges_outside_domain_stay_text() {
        assert_eq!(
            coerce_phase_list(&json!("3-1")),
            vec![MixedItem::Text("3-1".to_string())]
        );
        assert_eq!(
            coerce_phase_list(&json!("1-100000000")),
            vec![MixedItem::Text("1-100000000".to_string())]
        );
        assert_eq!(
            coerce_phase_list(&json!("2, 1-4294967295")),
            vec![
                MixedItem::Number(2.0),
                MixedItem::Text("1-4294967295".to_string())
            ]
        );
    }

    #[test]
    fn test_json_object_wrapping() {
        assert_eq!(coerce_json_object(&json!("")), Map::new());
        assert_eq!(
            Value::Object(coerce_json_object(&json!("{\"vip\": true}"))),
            json!({"vip": true})
        );
        assert_eq!(
            Value::Object(coerce_json_object(&json!("not json"))),
            json!({"originalValue": "not json"})
        );
        assert_eq!(
            Value::Object(coerce_json_object(&json!("5"))),
            json!({"value": 5})
        );
        assert_eq!(
            Value::Object(coerce_json_object(&json!({"a": 1}))),
            json!({"a": 1})
        );
    }

    #[test]
    fn test_generic_coerce() {
        assert_eq!(coerce(&json!(""), FieldShape::Number { default: 1.0 }), json!(1.0));
        assert_eq!(coerce(&json!("1,2"), FieldShape::NumberArray), json!([1.0, 2.0]));
        assert_eq!(coerce(&json!(""), FieldShape::JsonObject), json!({}));
        assert_eq!(coerce(&json!(" x "), FieldShape::String), json!("x"));
    }
}
