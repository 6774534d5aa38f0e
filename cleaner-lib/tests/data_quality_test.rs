//! Completeness score of raw rows

use cleaner_lib::{EntityKind, data_quality_score, required_fields};
use serde_json::json;

mod common;
use common::create_raw_row;

#[test]
fn test_empty_rows_score_zero() {
    assert_eq!(data_quality_score(&[], required_fields(EntityKind::Clients)), 0.0);
}

#[test]
fn test_complete_rows_score_one() {
    let rows = vec![
        create_raw_row(&[
            ("WorkerID", json!("W1")),
            ("WorkerName", json!("Ann")),
            ("Skills", json!("ML")),
            ("AvailableSlots", json!("1,2")),
        ]),
        create_raw_row(&[
            ("WorkerID", json!("W2")),
            ("WorkerName", json!("Bob")),
            ("Skills", json!("SQL")),
            ("AvailableSlots", json!(3)),
        ]),
    ];
    assert_eq!(data_quality_score(&rows, required_fields(EntityKind::Workers)), 1.0);
}

#[test]
fn test_blank_and_missing_cells_lower_the_score() {
    let rows = vec![
        create_raw_row(&[
            ("TaskID", json!("T1")),
            ("TaskName", json!("   ")),
            ("Duration", json!(2)),
        ]),
        create_raw_row(&[
            ("TaskID", json!("T2")),
            ("TaskName", json!("Deploy")),
            ("Duration", json!(null)),
            ("RequiredSkills", json!("Ops")),
        ]),
    ];
    // 5 of 8 required cells are filled
    assert_eq!(data_quality_score(&rows, required_fields(EntityKind::Tasks)), 5.0 / 8.0);
}

#[test]
fn test_no_required_fields_scores_zero() {
    let rows = vec![create_raw_row(&[("TaskID", json!("T1"))])];
    assert_eq!(data_quality_score(&rows, &[]), 0.0);
}
