#![allow(clippy::needless_return)]

mod advisor;
mod coercion;
mod column_mapper;
mod error;
mod export;
mod model;
mod normalizer;
mod quality;
mod reader;
mod settings;
mod store;
mod validation;
pub mod utils;

// Integration tests are external crates, so they reach test_utils through the `test` feature
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use advisor::{FixImpact, FixSuggestion, suggest_fix, suggest_fixes};
pub use coercion::{
    FieldShape, MixedItem, coerce, coerce_json_object, coerce_mixed_array, coerce_number,
    coerce_number_array, coerce_phase_list, coerce_string, coerce_string_array,
};
pub use column_mapper::{ColumnMapping, ColumnMappingReport, map_columns};
pub use error::CleanerError;
pub use export::{
    CLIENTS_CSV, TASKS_CSV, VALIDATION_REPORT_JSON, WORKERS_CSV, validation_report, write_bundle,
    write_entities_csv,
};
pub use model::{Attributes, Client, Entity, EntityKind, Record, Task, Worker};
pub use normalizer::{FileProcessingResult, ParsingMetadata, normalize_row, process_rows};
pub use quality::{data_quality_score, required_fields};
pub use reader::{
    RawRow, SheetData, parse_file, read_csv, read_csv_from_reader, read_spreadsheet, read_xlsx,
};
pub use settings::ValidationSettings;
pub use store::DataStore;
pub use validation::{
    GLOBAL_ENTITY_ID, Severity, ValidationError, ValidationErrorType, ValidationSummary,
    format_validation_report, summarize, validate, validate_with,
};

pub const ERRORS_LOG_FILE: &str = "errors.log";
