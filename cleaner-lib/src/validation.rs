use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::model::{Client, Entity, EntityKind, Task, Worker};
use crate::settings::ValidationSettings;
use crate::utils::{format_number, get_utc_iso_datetime};

/// Entity id used by findings that are not tied to a single record
pub const GLOBAL_ENTITY_ID: &str = "global";

const PRIORITY_RANGE: (f64, f64) = (1.0, 5.0);
pub(crate) const SLOT_RANGE: (f64, f64) = (1.0, 10.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorType {
    MissingRequiredColumn,
    DuplicateId,
    MalformedList,
    OutOfRange,
    BrokenJson,
    UnknownReference,
    CircularCorun,
    ConflictingRules,
    OverloadedWorker,
    PhaseSlotSaturation,
    SkillCoverage,
    MaxConcurrencyFeasibility,
    InconsistentData,
}

impl ValidationErrorType {
    pub const ALL: [ValidationErrorType; 13] = [
        ValidationErrorType::MissingRequiredColumn,
        ValidationErrorType::DuplicateId,
        ValidationErrorType::MalformedList,
        ValidationErrorType::OutOfRange,
        ValidationErrorType::BrokenJson,
        ValidationErrorType::UnknownReference,
        ValidationErrorType::CircularCorun,
        ValidationErrorType::ConflictingRules,
        ValidationErrorType::OverloadedWorker,
        ValidationErrorType::PhaseSlotSaturation,
        ValidationErrorType::SkillCoverage,
        ValidationErrorType::MaxConcurrencyFeasibility,
        ValidationErrorType::InconsistentData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorType::MissingRequiredColumn => "missing_required_column",
            ValidationErrorType::DuplicateId => "duplicate_id",
            ValidationErrorType::MalformedList => "malformed_list",
            ValidationErrorType::OutOfRange => "out_of_range",
            ValidationErrorType::BrokenJson => "broken_json",
            ValidationErrorType::UnknownReference => "unknown_reference",
            ValidationErrorType::CircularCorun => "circular_corun",
            ValidationErrorType::ConflictingRules => "conflicting_rules",
            ValidationErrorType::OverloadedWorker => "overloaded_worker",
            ValidationErrorType::PhaseSlotSaturation => "phase_slot_saturation",
            ValidationErrorType::SkillCoverage => "skill_coverage",
            ValidationErrorType::MaxConcurrencyFeasibility => "max_concurrency_feasibility",
            ValidationErrorType::InconsistentData => "inconsistent_data",
        }
    }
}

impl fmt::Display for ValidationErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One data-quality finding
///
/// `id` is derived from the entity kind, the check and the entity id, so the same
/// finding keeps the same id across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub id: String,
    #[serde(rename = "type")]
    pub error_type: ValidationErrorType,
    pub entity: EntityKind,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub auto_fixable: bool,
}

impl ValidationError {
    fn new(
        entity: EntityKind,
        check: &str,
        entity_id: &str,
        error_type: ValidationErrorType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("{}-{}-{}", entity.singular(), check, entity_id),
            error_type,
            entity,
            entity_id: entity_id.to_string(),
            field: None,
            message: message.into(),
            severity: Severity::Error,
            suggestion: None,
            auto_fixable: false,
        }
    }

    fn on_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    fn fixable(mut self) -> Self {
        self.auto_fixable = true;
        self
    }

    fn as_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.severity, self.entity, self.entity_id)?;
        if let Some(field) = &self.field {
            write!(f, ".{}", field)?;
        }
        write!(f, " ({}): {}", self.error_type, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total_errors: usize,
    pub critical_errors: usize,
    pub warnings: usize,
    pub errors_by_type: BTreeMap<ValidationErrorType, usize>,
}

/// Run every check with the default settings
pub fn validate(clients: &[Client], workers: &[Worker], tasks: &[Task]) -> Vec<ValidationError> {
    validate_with(&ValidationSettings::default(), clients, workers, tasks)
}

/// Run every enabled check over the three collections
///
/// Errors are grouped by check (clients, workers, tasks, cross-reference, then the
/// optional anomaly pass) and follow input order within each check. The result
/// depends only on the arguments.
pub fn validate_with(
    settings: &ValidationSettings,
    clients: &[Client],
    workers: &[Worker],
    tasks: &[Task],
) -> Vec<ValidationError> {
    let mut errors = check_clients(clients, tasks);
    errors.extend(check_workers(workers));
    errors.extend(check_tasks(tasks));
    errors.extend(check_skill_coverage(workers, tasks));
    if settings.anomaly_detection {
        errors.extend(check_anomalies(clients, workers));
    }

    errors.retain(|error| settings.is_enabled(error.error_type));
    if settings.strict_mode {
        for error in &mut errors {
            error.severity = Severity::Error;
        }
    }
    errors
}

pub fn summarize(errors: &[ValidationError]) -> ValidationSummary {
    let mut summary = ValidationSummary {
        total_errors: errors.len(),
        ..ValidationSummary::default()
    };
    for error in errors {
        match error.severity {
            Severity::Error => summary.critical_errors += 1,
            Severity::Warning => summary.warnings += 1,
        }
        *summary.errors_by_type.entry(error.error_type).or_default() += 1;
    }
    summary
}

/// Ids seen more than once; every occurrence after the first is reported
fn duplicate_errors<T: Entity>(records: &[T]) -> impl Iterator<Item = (usize, ValidationError)> + '_ {
    let mut seen = HashSet::new();
    records.iter().enumerate().filter_map(move |(index, record)| {
        if seen.insert(record.key()) {
            return None;
        }
        let error = ValidationError::new(
            T::KIND,
            "duplicate",
            record.key(),
            ValidationErrorType::DuplicateId,
            format!("Duplicate {} ID: {}", T::KIND.singular(), record.key()),
        )
        .on_field(T::KEY_FIELD);
        Some((index, error))
    })
}

/// Per-record findings in input order, with the duplicate finding first for each record
fn per_record<T: Entity>(
    records: &[T],
    mut rules: impl FnMut(&T, &mut Vec<ValidationError>),
) -> Vec<ValidationError> {
    let mut duplicates = duplicate_errors(records).peekable();
    let mut errors = Vec::new();
    for (index, record) in records.iter().enumerate() {
        if let Some((_, duplicate)) = duplicates.next_if(|(i, _)| *i == index) {
            errors.push(duplicate);
        }
        rules(record, &mut errors);
    }
    errors
}

fn check_clients(clients: &[Client], tasks: &[Task]) -> Vec<ValidationError> {
    let task_ids: HashSet<&str> = tasks.iter().map(|t| t.key()).collect();

    per_record(clients, |client, errors| {
        let id = client.key();

        let (min, max) = PRIORITY_RANGE;
        if client.priority_level < min || client.priority_level > max {
            errors.push(
                ValidationError::new(
                    EntityKind::Clients,
                    "priority",
                    id,
                    ValidationErrorType::OutOfRange,
                    format!(
                        "Priority level must be between 1-5, got {}",
                        format_number(client.priority_level)
                    ),
                )
                .on_field("PriorityLevel")
                .with_suggestion("Set priority level to a value between 1 and 5")
                .fixable(),
            );
        }

        let unknown: Vec<&str> = client
            .requested_task_ids
            .iter()
            .map(String::as_str)
            .filter(|task_id| !task_ids.contains(task_id))
            .collect();
        if !unknown.is_empty() {
            errors.push(
                ValidationError::new(
                    EntityKind::Clients,
                    "invalid-tasks",
                    id,
                    ValidationErrorType::UnknownReference,
                    format!("References non-existent tasks: {}", unknown.join(", ")),
                )
                .on_field("RequestedTaskIDs"),
            );
        }

        if client.attributes_json.is_broken() {
            errors.push(
                ValidationError::new(
                    EntityKind::Clients,
                    "json",
                    id,
                    ValidationErrorType::BrokenJson,
                    "Invalid JSON in AttributesJSON field",
                )
                .on_field("AttributesJSON")
                .with_suggestion("Reset AttributesJSON to an empty object {}")
                .fixable(),
            );
        }
    })
}

fn check_workers(workers: &[Worker]) -> Vec<ValidationError> {
    per_record(workers, |worker, errors| {
        let id = worker.key();

        let (min, max) = SLOT_RANGE;
        let invalid_slots: Vec<String> = worker
            .available_slots
            .iter()
            .filter(|slot| **slot < min || **slot > max)
            .map(|slot| format_number(*slot))
            .collect();
        if !invalid_slots.is_empty() {
            errors.push(
                ValidationError::new(
                    EntityKind::Workers,
                    "slots",
                    id,
                    ValidationErrorType::MalformedList,
                    format!(
                        "Invalid slots: {}. Slots must be numbers 1-10",
                        invalid_slots.join(", ")
                    ),
                )
                .on_field("AvailableSlots")
                .fixable(),
            );
        }

        if worker.max_load_per_phase < 0.0 {
            errors.push(
                ValidationError::new(
                    EntityKind::Workers,
                    "load",
                    id,
                    ValidationErrorType::OutOfRange,
                    "MaxLoadPerPhase cannot be negative",
                )
                .on_field("MaxLoadPerPhase")
                .fixable(),
            );
        }

        // Literal rule: fewer available slots than the per-phase load
        let slot_count = worker.available_slots.len() as f64;
        if worker.max_load_per_phase != 0.0 && slot_count < worker.max_load_per_phase {
            errors.push(
                ValidationError::new(
                    EntityKind::Workers,
                    "overload",
                    id,
                    ValidationErrorType::OverloadedWorker,
                    format!(
                        "Worker has {} available slots but max load is {}",
                        worker.available_slots.len(),
                        format_number(worker.max_load_per_phase)
                    ),
                )
                .as_warning()
                .fixable(),
            );
        }
    })
}

fn check_tasks(tasks: &[Task]) -> Vec<ValidationError> {
    per_record(tasks, |task, errors| {
        let id = task.key();

        if task.duration < 1.0 {
            errors.push(
                ValidationError::new(
                    EntityKind::Tasks,
                    "duration",
                    id,
                    ValidationErrorType::OutOfRange,
                    "Duration must be at least 1",
                )
                .on_field("Duration")
                .fixable(),
            );
        }

        if task.max_concurrent < 1.0 {
            errors.push(
                ValidationError::new(
                    EntityKind::Tasks,
                    "concurrent",
                    id,
                    ValidationErrorType::OutOfRange,
                    "MaxConcurrent must be at least 1",
                )
                .on_field("MaxConcurrent")
                .fixable(),
            );
        }
    })
}

/// Required skills that no worker lists, in first-seen order
fn uncovered_skills<'a>(workers: &[Worker], tasks: &'a [Task]) -> Vec<&'a str> {
    let worker_skills: HashSet<&str> = workers
        .iter()
        .flat_map(|w| w.skills.iter().map(String::as_str))
        .collect();

    let mut seen = HashSet::new();
    tasks
        .iter()
        .flat_map(|t| t.required_skills.iter().map(String::as_str))
        .filter(|skill| seen.insert(*skill))
        .filter(|skill| !worker_skills.contains(skill))
        .collect()
}

fn check_skill_coverage(workers: &[Worker], tasks: &[Task]) -> Vec<ValidationError> {
    let uncovered = uncovered_skills(workers, tasks);
    if uncovered.is_empty() {
        return Vec::new();
    }

    let mut error = ValidationError::new(
        EntityKind::Tasks,
        "coverage",
        GLOBAL_ENTITY_ID,
        ValidationErrorType::SkillCoverage,
        format!(
            "No workers have these required skills: {}",
            uncovered.join(", ")
        ),
    );
    error.id = "skill-coverage-global".to_string();
    vec![error]
}

/// Heuristic consistency warnings; only run when anomaly detection is enabled
fn check_anomalies(clients: &[Client], workers: &[Worker]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !workers.is_empty() {
        let total_skills: usize = workers.iter().map(|w| w.skills.len()).sum();
        let average = total_skills as f64 / workers.len() as f64;
        for worker in workers {
            let skill_count = worker.skills.len();
            if skill_count as f64 > average * 2.5 {
                errors.push(
                    ValidationError::new(
                        EntityKind::Workers,
                        "anomaly",
                        worker.key(),
                        ValidationErrorType::InconsistentData,
                        format!(
                            "Worker has unusually high number of skills ({} vs avg {})",
                            skill_count,
                            average.round()
                        ),
                    )
                    .on_field("Skills")
                    .with_suggestion("Verify skill list accuracy")
                    .as_warning(),
                );
            }
        }
    }

    for client in clients {
        if client.priority_level == PRIORITY_RANGE.1 && client.requested_task_ids.is_empty() {
            errors.push(
                ValidationError::new(
                    EntityKind::Clients,
                    "context-priority",
                    client.key(),
                    ValidationErrorType::InconsistentData,
                    "High-priority client has no requested tasks",
                )
                .on_field("RequestedTaskIDs")
                .with_suggestion("Add tasks for high-priority client")
                .as_warning(),
            );
        }
    }

    errors
}

/// Format validation errors into a structured string for logging
pub fn format_validation_report(errors: &[ValidationError]) -> String {
    let summary = summarize(errors);
    let mut report = String::new();

    report.push_str("=============================\n");
    report.push_str(&format!("Generated at: {}\n\n", get_utc_iso_datetime()));
    report.push_str(&format!(
        "Total findings: {} ({} errors, {} warnings)\n\n",
        summary.total_errors, summary.critical_errors, summary.warnings
    ));

    for (error_type, count) in &summary.errors_by_type {
        report.push_str(&format!("  {}: {}\n", error_type, count));
    }
    report.push('\n');

    for error in errors {
        report.push_str(&format!("  - {}\n", error));
        if let Some(suggestion) = &error.suggestion {
            report.push_str(&format!("    suggestion: {}\n", suggestion));
        }
    }

    report
}
