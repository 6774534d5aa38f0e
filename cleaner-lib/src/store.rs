use serde_json::Value;

use crate::advisor::FixSuggestion;
use crate::error::CleanerError;
use crate::model::{Client, Entity, EntityKind, Record, Task, Worker};
use crate::normalizer::FileProcessingResult;
use crate::settings::ValidationSettings;
use crate::validation::{
    SLOT_RANGE, ValidationError, ValidationErrorType, ValidationSummary, summarize, validate_with,
};

/// In-memory working set of the three collections plus the latest findings
///
/// Edits never trigger validation; call `run_validation` to refresh the findings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataStore {
    pub clients: Vec<Client>,
    pub workers: Vec<Worker>,
    pub tasks: Vec<Task>,
    validation_errors: Vec<ValidationError>,
}

fn update_matching<T: Entity>(
    records: &mut [T],
    id: &str,
    field: &str,
    raw: &Value,
) -> Result<usize, CleanerError> {
    if !T::FIELDS.contains(&field) {
        return Err(CleanerError::UnknownField {
            entity: T::KIND,
            field: field.to_string(),
        });
    }

    let mut updated = 0;
    for record in records.iter_mut().filter(|r| r.key() == id) {
        record.set_field(field, raw)?;
        updated += 1;
    }
    if updated == 0 {
        return Err(CleanerError::RecordNotFound {
            entity: T::KIND,
            id: id.to_string(),
        });
    }
    Ok(updated)
}

fn remove_matching<T: Entity>(records: &mut Vec<T>, id: &str) -> usize {
    let before = records.len();
    records.retain(|r| r.key() != id);
    before - records.len()
}

fn clear_column<T: Entity>(records: &mut [T], field: &str) -> Result<(), CleanerError> {
    if field == T::KEY_FIELD {
        return Err(CleanerError::KeyColumn {
            entity: T::KIND,
            field: field.to_string(),
        });
    }
    if !T::FIELDS.contains(&field) {
        return Err(CleanerError::UnknownField {
            entity: T::KIND,
            field: field.to_string(),
        });
    }
    for record in records.iter_mut() {
        record.clear_field(field)?;
    }
    Ok(())
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every record of a processed file
    pub fn load(&mut self, result: FileProcessingResult) {
        for record in result.records {
            self.create(record);
        }
    }

    pub fn create(&mut self, record: Record) {
        match record {
            Record::Client(client) => self.clients.push(client),
            Record::Worker(worker) => self.workers.push(worker),
            Record::Task(task) => self.tasks.push(task),
        }
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Clients => self.clients.len(),
            EntityKind::Workers => self.workers.len(),
            EntityKind::Tasks => self.tasks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.workers.is_empty() && self.tasks.is_empty()
    }

    /// Set one cell on every record with the given id, using the ingestion coercion rules
    ///
    /// Returns the number of records updated.
    pub fn update_field(
        &mut self,
        kind: EntityKind,
        id: &str,
        field: &str,
        raw: &Value,
    ) -> Result<usize, CleanerError> {
        match kind {
            EntityKind::Clients => update_matching(&mut self.clients, id, field, raw),
            EntityKind::Workers => update_matching(&mut self.workers, id, field, raw),
            EntityKind::Tasks => update_matching(&mut self.tasks, id, field, raw),
        }
    }

    /// Delete every record with the given id; returns how many were removed
    pub fn delete_row(&mut self, kind: EntityKind, id: &str) -> usize {
        match kind {
            EntityKind::Clients => remove_matching(&mut self.clients, id),
            EntityKind::Workers => remove_matching(&mut self.workers, id),
            EntityKind::Tasks => remove_matching(&mut self.tasks, id),
        }
    }

    /// Reset a column to its default on every record of `kind`
    pub fn delete_column(&mut self, kind: EntityKind, field: &str) -> Result<(), CleanerError> {
        match kind {
            EntityKind::Clients => clear_column(&mut self.clients, field),
            EntityKind::Workers => clear_column(&mut self.workers, field),
            EntityKind::Tasks => clear_column(&mut self.tasks, field),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Validate the current collections, replacing the stored findings
    pub fn run_validation(&mut self, settings: &ValidationSettings) -> ValidationSummary {
        self.validation_errors = validate_with(settings, &self.clients, &self.workers, &self.tasks);
        summarize(&self.validation_errors)
    }

    /// Findings of the last `run_validation`
    pub fn validation_errors(&self) -> &[ValidationError] {
        &self.validation_errors
    }

    /// Apply a suggested fix to the record the error points at
    ///
    /// The stored findings are left untouched until the next `run_validation`.
    pub fn apply_fix(
        &mut self,
        error: &ValidationError,
        suggestion: &FixSuggestion,
    ) -> Result<(), CleanerError> {
        let no_fix = || CleanerError::NoFixAvailable {
            error_id: error.id.clone(),
        };
        if !error.auto_fixable || suggestion.error_id != error.id {
            return Err(no_fix());
        }
        let Some(field) = error.field.as_deref() else {
            return Err(no_fix());
        };

        if let Some(value) = &suggestion.proposed_value {
            self.update_field(error.entity, &error.entity_id, field, value)?;
            return Ok(());
        }

        if error.error_type == ValidationErrorType::MalformedList && field == "AvailableSlots" {
            let (min, max) = SLOT_RANGE;
            let mut found = false;
            for worker in self
                .workers
                .iter_mut()
                .filter(|w| w.worker_id == error.entity_id)
            {
                worker.available_slots.retain(|slot| *slot >= min && *slot <= max);
                found = true;
            }
            if !found {
                return Err(CleanerError::RecordNotFound {
                    entity: EntityKind::Workers,
                    id: error.entity_id.clone(),
                });
            }
            return Ok(());
        }

        Err(no_fix())
    }
}
