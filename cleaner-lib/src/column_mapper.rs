use serde::{Deserialize, Serialize};

use crate::model::EntityKind;
use crate::utils::normalize_key;

const SIMILARITY_THRESHOLD: f64 = 0.6;
const ALIAS_CONFIDENCE: f64 = 0.95;
const SUBSTRING_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub original_column: String,
    pub suggested_field: String,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMappingReport {
    pub mappings: Vec<ColumnMapping>,
    /// Headers that match no known field, or lost their field to a better match
    pub unmapped: Vec<String>,
    /// Required fields that no header maps to
    pub missing_required: Vec<String>,
}

impl ColumnMappingReport {
    /// Canonical field for a detected header, if it was mapped
    pub fn field_for(&self, header: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| m.original_column == header)
            .map(|m| m.suggested_field.as_str())
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .unmapped
            .iter()
            .map(|column| format!("Column '{}' could not be mapped", column))
            .collect();
        warnings.extend(
            self.missing_required
                .iter()
                .map(|field| format!("Missing required field: {}", field)),
        );
        warnings
    }
}

/// Columns a file must provide for each kind
fn required_columns(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Clients => &["ClientID", "ClientName", "PriorityLevel"],
        EntityKind::Workers => &["WorkerID", "WorkerName", "Skills"],
        EntityKind::Tasks => &["TaskID", "TaskName", "Category"],
    }
}

fn aliases(field: &str) -> &'static [&'static str] {
    match field {
        "ClientID" => &["client_id", "id", "customer_id", "cid"],
        "ClientName" => &["client_name", "name", "customer_name", "company"],
        "PriorityLevel" => &["priority", "prio", "importance", "urgency"],
        "RequestedTaskIDs" => &["tasks", "task_ids", "requested_tasks", "task_list"],
        "GroupTag" => &["group", "tag", "client_group"],
        "AttributesJSON" => &["attributes", "metadata", "attrs"],
        "WorkerID" => &["worker_id", "id", "employee_id", "wid"],
        "WorkerName" => &["worker_name", "name", "employee_name", "full_name"],
        "Skills" => &["skill_set", "abilities", "expertise", "technologies"],
        "AvailableSlots" => &["availability", "schedule", "time_slots", "slots"],
        "MaxLoadPerPhase" => &["max_load", "load", "capacity"],
        "WorkerGroup" => &["group", "team"],
        "QualificationLevel" => &["qualification", "seniority"],
        "HourlyRate" => &["rate", "cost", "price", "wage"],
        "TaskID" => &["task_id", "id", "tid"],
        "TaskName" => &["task_name", "name", "title", "description"],
        "Category" => &["type", "kind", "classification"],
        "Duration" => &["time", "hours", "estimate", "length"],
        "RequiredSkills" => &["skills", "requirements", "needed_skills"],
        "PreferredPhases" => &["phases", "phase", "preferred_phase"],
        "MaxConcurrent" => &["concurrency", "max_parallel", "parallel"],
        _ => &[],
    }
}

fn best_match(header: &str, kind: EntityKind) -> Option<ColumnMapping> {
    let detected = normalize_key(header);
    if detected.is_empty() {
        return None;
    }
    let fields = kind.fields();
    let mapping = |field: &str, confidence: f64, reasoning: String| ColumnMapping {
        original_column: header.to_string(),
        suggested_field: field.to_string(),
        confidence,
        reasoning,
    };

    if let Some(field) = fields.iter().find(|f| normalize_key(f) == detected) {
        return Some(mapping(field, 1.0, "Exact match".to_string()));
    }

    for field in fields {
        if let Some(alias) = aliases(field).iter().find(|a| normalize_key(a) == detected) {
            return Some(mapping(
                field,
                ALIAS_CONFIDENCE,
                format!("Matches known alias: {}", alias),
            ));
        }
    }

    let mut best: Option<ColumnMapping> = None;
    for field in fields {
        let expected = normalize_key(field);
        let similarity = strsim::normalized_levenshtein(&detected, &expected);
        let best_score = best.as_ref().map_or(0.0, |m| m.confidence);

        if similarity > SIMILARITY_THRESHOLD && similarity > best_score {
            best = Some(mapping(
                field,
                similarity,
                format!("Similar to {} ({}% match)", field, (similarity * 100.0).round()),
            ));
        }

        let best_score = best.as_ref().map_or(0.0, |m| m.confidence);
        if (detected.contains(&expected) || expected.contains(&detected))
            && SUBSTRING_CONFIDENCE > best_score
        {
            best = Some(mapping(
                field,
                SUBSTRING_CONFIDENCE,
                format!("Partial match with {}", field),
            ));
        }
    }
    best
}

/// Map detected headers onto the canonical fields of `kind`
///
/// When several headers land on the same field, the most confident one keeps it
/// (the earlier header on ties) and the others are reported as unmapped.
pub fn map_columns(detected: &[String], kind: EntityKind) -> ColumnMappingReport {
    let mut report = ColumnMappingReport::default();

    for header in detected {
        let Some(candidate) = best_match(header, kind) else {
            report.unmapped.push(header.clone());
            continue;
        };

        match report
            .mappings
            .iter()
            .position(|m| m.suggested_field == candidate.suggested_field)
        {
            Some(index) if report.mappings[index].confidence >= candidate.confidence => {
                report.unmapped.push(header.clone());
            }
            Some(index) => {
                let displaced = std::mem::replace(&mut report.mappings[index], candidate);
                report.unmapped.push(displaced.original_column);
            }
            None => report.mappings.push(candidate),
        }
    }

    report.missing_required = required_columns(kind)
        .iter()
        .filter(|field| !report.mappings.iter().any(|m| m.suggested_field == **field))
        .map(|field| field.to_string())
        .collect();

    report
}
