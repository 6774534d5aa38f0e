//! Reading uploaded files and aligning their headers

use cleaner_lib::{CleanerError, EntityKind, Record, parse_file, read_csv, read_spreadsheet};
use serde_json::json;

mod common;
use common::write_fixture;

#[test]
fn test_read_csv_rows_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "workers.csv",
        "WorkerID,Skills,AvailableSlots\nW1,\"ML, SQL\",\"[1,2]\"\n,,\nW2,Go,3\n",
    );

    let sheet = read_csv(&path).unwrap();
    assert_eq!(sheet.headers, vec!["WorkerID", "Skills", "AvailableSlots"]);
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(sheet.rows[0]["Skills"], json!("ML, SQL"));
    assert_eq!(sheet.rows[1]["AvailableSlots"], json!("3"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");
    assert!(read_spreadsheet(&path.to_string_lossy(), None).is_err());
}

#[test]
fn test_parse_file_maps_aliases_to_canonical_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "clients.csv",
        "client_id,name,priority,tasks,notes\nC1,Acme,4,\"T1,T2\",vip\n",
    );

    let result = parse_file(&path, EntityKind::Clients, None);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.records.len(), 1);

    let Record::Client(client) = &result.records[0] else {
        panic!("expected a client record");
    };
    assert_eq!(client.client_id, "C1");
    assert_eq!(client.client_name, "Acme");
    assert_eq!(client.priority_level, 4.0);
    assert_eq!(client.requested_task_ids, vec!["T1", "T2"]);
    assert_eq!(result.warnings, vec!["Column 'notes' could not be mapped"]);
    assert_eq!(result.parsing_metadata.data_quality_score, 1.0);
}

#[test]
fn test_parse_file_reports_missing_required_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "tasks.csv", "TaskID,Duration\nT1,2\n");

    let result = parse_file(&path, EntityKind::Tasks, None);
    assert_eq!(result.records.len(), 1);
    assert!(result.warnings.contains(&"Missing required field: TaskName".to_string()));
    assert!(result.warnings.contains(&"Missing required field: Category".to_string()));
}

#[test]
fn test_parse_file_failure_is_reported_in_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "clients.txt", "ClientID\nC1\n");

    let result = parse_file(&path, EntityKind::Clients, None);
    assert!(result.records.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("Unsupported file type"));
    assert_eq!(result.parsing_metadata.rows_processed, 0);
}

#[test]
fn test_duplicate_headers_fail_the_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "tasks.csv", "TaskID,TaskID\nT1,T2\n");

    let error = read_csv(&path).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<CleanerError>(),
        Some(CleanerError::DuplicateHeaders { .. })
    ));
}
