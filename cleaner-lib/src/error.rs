use thiserror::Error;

use crate::model::EntityKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CleanerError {
    #[error("{field} must be a single value, got {actual}")]
    InvalidKey { field: String, actual: String },

    #[error("Unknown field '{field}' for {entity}")]
    UnknownField { entity: EntityKind, field: String },

    #[error("The key column '{field}' of {entity} cannot be deleted")]
    KeyColumn { entity: EntityKind, field: String },

    #[error("No {entity} record with id '{id}'")]
    RecordNotFound { entity: EntityKind, id: String },

    #[error("Spreadsheet contains duplicate column headers:\n{details}")]
    DuplicateHeaders { details: String },

    #[error("Unsupported file type '{path}': expected .csv, .xlsx or .xls")]
    UnsupportedFile { path: String },

    #[error("The spreadsheet '{path}' has no header row")]
    EmptySheet { path: String },

    #[error("No automatic fix is available for error '{error_id}'")]
    NoFixAvailable { error_id: String },
}
