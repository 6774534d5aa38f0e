use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

use crate::advisor::suggest_fixes;
use crate::model::Entity;
use crate::store::DataStore;
use crate::utils::{format_number, get_utc_iso_datetime};
use crate::validation::{ValidationError, ValidationSummary};

pub const CLIENTS_CSV: &str = "clients.csv";
pub const WORKERS_CSV: &str = "workers.csv";
pub const TASKS_CSV: &str = "tasks.csv";
pub const VALIDATION_REPORT_JSON: &str = "validation_report.json";

/// Render one cell of a typed record as CSV text
fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::Bool(b) => b.to_string(),
        // Semicolons keep list cells distinct from the column separator
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Array(_) | Value::Object(_) => item.to_string(),
                other => csv_cell(other),
            })
            .collect::<Vec<_>>()
            .join(";"),
        Value::Object(_) => value.to_string(),
    }
}

/// Write records to CSV with the canonical column order; the header row is always written
pub fn write_entities_csv<T: Entity>(path: &Path, records: &[T]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;

    wtr.write_record(T::FIELDS)?;

    for record in records {
        let row = serde_json::to_value(record)?;
        let csv_record: Vec<String> = T::FIELDS
            .iter()
            .map(|field| row.get(*field).map(csv_cell).unwrap_or_default())
            .collect();
        wtr.write_record(&csv_record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// JSON validation report with the findings and the fixes proposed for them
pub fn validation_report(errors: &[ValidationError], summary: &ValidationSummary) -> Value {
    json!({
        "generatedAt": get_utc_iso_datetime(),
        "summary": summary,
        "errors": errors,
        "suggestions": suggest_fixes(errors),
    })
}

/// Write the cleaned collections and the validation report into `dir`
///
/// The directory is created if needed. Returns the written paths.
pub fn write_bundle(dir: &Path, store: &DataStore, summary: &ValidationSummary) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory '{}'", dir.display()))?;

    let clients_path = dir.join(CLIENTS_CSV);
    write_entities_csv(&clients_path, &store.clients)?;
    let workers_path = dir.join(WORKERS_CSV);
    write_entities_csv(&workers_path, &store.workers)?;
    let tasks_path = dir.join(TASKS_CSV);
    write_entities_csv(&tasks_path, &store.tasks)?;

    let report_path = dir.join(VALIDATION_REPORT_JSON);
    let report = validation_report(store.validation_errors(), summary);
    let content = serde_json::to_string_pretty(&report)?;
    std::fs::write(&report_path, content)
        .with_context(|| format!("Failed to write '{}'", report_path.display()))?;

    Ok(vec![clients_path, workers_path, tasks_path, report_path])
}
