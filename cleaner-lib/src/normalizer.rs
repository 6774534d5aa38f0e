use serde::{Deserialize, Serialize};

use crate::error::CleanerError;
use crate::model::{Client, Entity, EntityKind, Record, Task, Worker};
use crate::quality::{data_quality_score, required_fields};
use crate::reader::RawRow;
use crate::utils::write_error_to_log;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsingMetadata {
    pub rows_processed: usize,
    pub columns_detected: Vec<String>,
    pub data_quality_score: f64,
}

/// Typed output of one uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProcessingResult {
    pub entity: EntityKind,
    pub records: Vec<Record>,
    /// Row-level ingestion errors, formatted as "Row <n>: <message>"
    pub errors: Vec<String>,
    /// Skipped rows and header mapping notes
    pub warnings: Vec<String>,
    pub parsing_metadata: ParsingMetadata,
}

impl FileProcessingResult {
    /// Result for a file that could not be read at all
    pub fn failed(entity: EntityKind, message: String) -> Self {
        FileProcessingResult {
            entity,
            records: Vec::new(),
            errors: vec![message],
            warnings: Vec::new(),
            parsing_metadata: ParsingMetadata {
                rows_processed: 0,
                columns_detected: Vec::new(),
                data_quality_score: 0.0,
            },
        }
    }
}

/// Normalize one raw row into a typed record
///
/// Returns `Ok(None)` when the row's key cell is missing or blank.
pub fn normalize_row(row: &RawRow, kind: EntityKind) -> Result<Option<Record>, CleanerError> {
    let record = match kind {
        EntityKind::Clients => Client::from_row(row)?.map(Entity::into_record),
        EntityKind::Workers => Worker::from_row(row)?.map(Entity::into_record),
        EntityKind::Tasks => Task::from_row(row)?.map(Entity::into_record),
    };
    Ok(record)
}

/// Normalize every row of a file, collecting row errors instead of aborting
pub fn process_rows(kind: EntityKind, headers: &[String], rows: &[RawRow]) -> FileProcessingResult {
    let mut records = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        match normalize_row(row, kind) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => warnings.push(format!(
                "Row {}: missing {}, row skipped",
                index + 1,
                kind.key_field()
            )),
            Err(e) => errors.push(format!("Row {}: {}", index + 1, e)),
        }
    }

    if !errors.is_empty() {
        write_error_to_log(
            &format!("Row Ingestion Error ({})", kind),
            &errors.join("\n"),
        );
    }

    FileProcessingResult {
        entity: kind,
        records,
        errors,
        warnings,
        parsing_metadata: ParsingMetadata {
            rows_processed: rows.len(),
            columns_detected: headers.to_vec(),
            data_quality_score: data_quality_score(rows, required_fields(kind)),
        },
    }
}
