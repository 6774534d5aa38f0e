use crate::coercion::coerce_string;
use crate::model::EntityKind;
use crate::reader::RawRow;

/// Columns counted by the completeness score
pub fn required_fields(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Clients => &["ClientID", "ClientName", "PriorityLevel"],
        EntityKind::Workers => &["WorkerID", "WorkerName", "Skills", "AvailableSlots"],
        EntityKind::Tasks => &["TaskID", "TaskName", "Duration", "RequiredSkills"],
    }
}

/// Share of required cells that are present and non-blank, in `[0, 1]`
///
/// This is a completeness heuristic only; it does not apply any validation rule.
pub fn data_quality_score(rows: &[RawRow], required: &[&str]) -> f64 {
    let total_fields = rows.len() * required.len();
    if total_fields == 0 {
        return 0.0;
    }

    let valid_fields = rows
        .iter()
        .flat_map(|row| required.iter().map(move |field| row.get(*field)))
        .filter(|cell| cell.is_some_and(|value| !coerce_string(value).is_empty()))
        .count();

    valid_fields as f64 / total_fields as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn rows(values: Vec<Value>) -> Vec<RawRow> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_empty_row_set_scores_zero() {
        assert_eq!(data_quality_score(&[], required_fields(EntityKind::Clients)), 0.0);
    }

    #[test]
    fn test_complete_rows_score_one() {
        let data = rows(vec![
            json!({"ClientID": "C1", "ClientName": "Acme", "PriorityLevel": 3}),
            json!({"ClientID": "C2", "ClientName": "Globex", "PriorityLevel": "5"}),
        ]);
        assert_eq!(data_quality_score(&data, required_fields(EntityKind::Clients)), 1.0);
    }

    #[test]
    fn test_partial_rows() {
        let data = rows(vec![
            json!({"ClientID": "C1", "ClientName": "  ", "PriorityLevel": 0}),
            json!({"ClientID": "C2"}),
        ]);
        // C1: id + priority ("0" is non-blank), C2: id only
        let score = data_quality_score(&data, required_fields(EntityKind::Clients));
        assert!((score - 3.0 / 6.0).abs() < f64::EPSILON);
    }
}
