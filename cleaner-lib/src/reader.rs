use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::io;
use std::path::Path;

use crate::column_mapper::map_columns;
use crate::error::CleanerError;
use crate::model::EntityKind;
use crate::normalizer::{FileProcessingResult, process_rows};
use crate::utils::{normalize_header, write_error_to_log};

/// One spreadsheet row keyed by header
pub type RawRow = Map<String, Value>;

/// Headers and data rows of one sheet, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl SheetData {
    /// Rename columns; rows keep their order and untouched columns stay as they are
    fn rename_columns(&mut self, renames: &HashMap<String, String>) {
        for header in &mut self.headers {
            if let Some(target) = renames.get(header) {
                *header = target.clone();
            }
        }
        for row in &mut self.rows {
            *row = std::mem::take(row)
                .into_iter()
                .map(|(key, value)| match renames.get(&key) {
                    Some(target) => (target.clone(), value),
                    None => (key, value),
                })
                .collect();
        }
    }
}

/// Read a CSV or Excel file, chosen by extension
pub fn read_spreadsheet(path: &str, sheet_name: Option<&str>) -> Result<SheetData> {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => read_csv(path),
        Some("xlsx") | Some("xls") | Some("xlsm") => read_xlsx(path, sheet_name),
        _ => Err(CleanerError::UnsupportedFile {
            path: path.to_string(),
        }
        .into()),
    }
}

pub fn read_csv(path: &str) -> Result<SheetData> {
    let file = std::fs::File::open(path).with_context(|| format!("Failed to open '{}'", path))?;
    read_csv_from_reader(file, path)
}

/// Read CSV content from any reader; `source` names the input in error messages
pub fn read_csv_from_reader<R: io::Read>(reader: R, source: &str) -> Result<SheetData> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .with_context(|| format!("Failed to read the header row of '{}'", source))?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CleanerError::EmptySheet {
            path: source.to_string(),
        }
        .into());
    }
    check_header_duplicates(&headers)?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.with_context(|| format!("Failed to read a record of '{}'", source))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let row = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !header.is_empty())
            .map(|(index, header)| {
                let cell = record.get(index).unwrap_or_default();
                (header.clone(), Value::String(cell.to_string()))
            })
            .collect();
        rows.push(row);
    }

    Ok(SheetData { headers, rows })
}

/// Read one worksheet of an Excel workbook; the first sheet when no name is given
pub fn read_xlsx(path: &str, sheet_name: Option<&str>) -> Result<SheetData> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("Failed to open workbook '{}'", path))?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| CleanerError::EmptySheet {
                path: path.to_string(),
            })?,
    };

    let range = match workbook.worksheet_range(&sheet) {
        Ok(range) => range,
        Err(e) => {
            return Err(anyhow::anyhow!("Error reading sheet '{}': {}", sheet, e));
        }
    };

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<RawRow> = Vec::new();

    for (row_index, row) in range.rows().enumerate() {
        if row_index == 0 {
            headers = row
                .iter()
                .map(|cell| normalize_header(&cell.to_string()))
                .collect();
            check_header_duplicates(&headers)?;
            continue;
        }

        let is_empty_row = row.iter().all(|cell| match cell {
            Data::Empty => true,
            Data::String(s) => s.trim().is_empty(),
            Data::Error(_) => true,
            _ => false,
        });
        if is_empty_row {
            continue;
        }

        let mut json_obj = Map::new();
        for (col_idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = row.get(col_idx).map(cell_to_json).unwrap_or_default();
            json_obj.insert(header.clone(), value);
        }
        rows.push(json_obj);
    }

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CleanerError::EmptySheet {
            path: path.to_string(),
        }
        .into());
    }

    Ok(SheetData { headers, rows })
}

/// Convert a workbook cell into a raw JSON cell
fn cell_to_json(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::String(String::new()),
        Data::String(s) => Value::String(s.clone()),
        Data::Float(f) if f.is_finite() => json!(*f),
        Data::Float(_) => Value::String(String::new()),
        Data::Int(i) => json!(*i),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => excel_serial_to_iso(dt.as_f64())
            .map(Value::String)
            .unwrap_or_else(|| json!(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
    }
}

/// Serial day number to an ISO timestamp; `None` when the date falls outside chrono's range
fn excel_serial_to_iso(value: f64) -> Option<String> {
    use chrono::{NaiveDate, TimeDelta};
    if !value.is_finite() {
        return None;
    }
    let excel_base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = value.trunc();
    let seconds = ((value - days) * 86400.0).round() as i64;
    let datetime = excel_base
        .checked_add_signed(TimeDelta::try_days(days as i64)?)?
        .checked_add_signed(TimeDelta::try_seconds(seconds)?)?;
    Some(datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Check for duplicate column headers, ignoring blank ones
fn check_header_duplicates(headers: &[String]) -> Result<(), CleanerError> {
    let mut header_positions: Vec<(&str, Vec<usize>)> = Vec::new();

    for (index, header) in headers.iter().enumerate() {
        if header.is_empty() {
            continue;
        }
        match header_positions.iter_mut().find(|(h, _)| *h == header) {
            Some((_, positions)) => positions.push(index),
            None => header_positions.push((header.as_str(), vec![index])),
        }
    }

    let duplicate_headers: Vec<String> = header_positions
        .iter()
        .filter(|(_, positions)| positions.len() > 1)
        .map(|(header, positions)| {
            let columns_str = positions
                .iter()
                .map(|p| format!("column {}", p + 1))
                .collect::<Vec<_>>()
                .join(", ");
            format!("  • Header '{}' appears in: {}", header, columns_str)
        })
        .collect();

    if duplicate_headers.is_empty() {
        return Ok(());
    }

    let error = CleanerError::DuplicateHeaders {
        details: duplicate_headers.join("\n"),
    };
    write_error_to_log("Spreadsheet Header Duplicate Check Error", &error.to_string());
    Err(error)
}

/// Read, align headers, and normalize one uploaded file
///
/// A file that cannot be read yields a result carrying the error message and no records.
pub fn parse_file(path: &str, kind: EntityKind, sheet_name: Option<&str>) -> FileProcessingResult {
    let mut sheet = match read_spreadsheet(path, sheet_name) {
        Ok(sheet) => sheet,
        Err(e) => {
            let message = format!("{:#}", e);
            write_error_to_log("Spreadsheet Read Error", &message);
            return FileProcessingResult::failed(kind, message);
        }
    };

    let mapping = map_columns(&sheet.headers, kind);
    let renames: HashMap<String, String> = mapping
        .mappings
        .iter()
        .filter(|m| m.original_column != m.suggested_field)
        .filter(|m| !sheet.headers.contains(&m.suggested_field))
        .map(|m| (m.original_column.clone(), m.suggested_field.clone()))
        .collect();
    sheet.rename_columns(&renames);

    let mut result = process_rows(kind, &sheet.headers, &sheet.rows);
    result.warnings.extend(mapping.warnings());
    result
}
