use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::coercion::{
    MixedItem, coerce_json_object, coerce_number, coerce_number_array, coerce_optional_number,
    coerce_phase_list, coerce_string, coerce_string_array, is_blank,
};
use crate::error::CleanerError;

/// The three record collections handled by the cleaner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Clients,
    Workers,
    Tasks,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Clients, EntityKind::Workers, EntityKind::Tasks];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Clients => "clients",
            EntityKind::Workers => "workers",
            EntityKind::Tasks => "tasks",
        }
    }

    /// Prefix used in validation error ids
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Clients => "client",
            EntityKind::Workers => "worker",
            EntityKind::Tasks => "task",
        }
    }

    pub fn key_field(&self) -> &'static str {
        match self {
            EntityKind::Clients => Client::KEY_FIELD,
            EntityKind::Workers => Worker::KEY_FIELD,
            EntityKind::Tasks => Task::KEY_FIELD,
        }
    }

    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Clients => Client::FIELDS,
            EntityKind::Workers => Worker::FIELDS,
            EntityKind::Tasks => Task::FIELDS,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behaviour shared by the typed record kinds
///
/// Every field is written through `set_field`, so rows read from a file and later
/// hand edits go through exactly the same coercion rules.
pub trait Entity: Sized + Clone + Serialize {
    const KIND: EntityKind;
    const KEY_FIELD: &'static str;
    /// Canonical column order, key first
    const FIELDS: &'static [&'static str];

    /// A record holding only its key, every other field at its default
    fn blank(key: String) -> Self;

    fn key(&self) -> &str;

    fn set_field(&mut self, field: &str, raw: &Value) -> Result<(), CleanerError>;

    fn into_record(self) -> Record;

    /// Build a record from a raw row; `Ok(None)` when the key cell is missing or blank
    fn from_row(row: &Map<String, Value>) -> Result<Option<Self>, CleanerError> {
        let Some(key) = key_from_cell(Self::KEY_FIELD, row.get(Self::KEY_FIELD))? else {
            return Ok(None);
        };

        let mut record = Self::blank(key);
        for field in Self::FIELDS.iter().filter(|f| **f != Self::KEY_FIELD) {
            record.set_field(field, row.get(*field).unwrap_or(&Value::Null))?;
        }
        Ok(Some(record))
    }

    /// Reset a column to its default value
    fn clear_field(&mut self, field: &str) -> Result<(), CleanerError> {
        if field == Self::KEY_FIELD {
            return Err(CleanerError::KeyColumn {
                entity: Self::KIND,
                field: field.to_string(),
            });
        }
        self.set_field(field, &Value::Null)
    }
}

fn key_from_cell(field: &str, cell: Option<&Value>) -> Result<Option<String>, CleanerError> {
    match cell {
        None => Ok(None),
        Some(raw) if is_blank(raw) => Ok(None),
        Some(raw @ (Value::Array(_) | Value::Object(_))) => Err(CleanerError::InvalidKey {
            field: field.to_string(),
            actual: raw.to_string(),
        }),
        Some(raw) => Ok(Some(coerce_string(raw))),
    }
}

fn set_key(target: &mut String, field: &str, raw: &Value) -> Result<(), CleanerError> {
    match key_from_cell(field, Some(raw))? {
        Some(key) => {
            *target = key;
            Ok(())
        }
        None => Err(CleanerError::InvalidKey {
            field: field.to_string(),
            actual: "an empty value".to_string(),
        }),
    }
}

/// Free-form attribute bag of a client
///
/// Serializes as the plain map. When the cell was text, the text is kept so the
/// validator can tell a wrapped parse failure from a genuine object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    pub values: Map<String, Value>,
    #[serde(skip)]
    source: Option<String>,
}

impl Attributes {
    pub fn from_cell(raw: &Value) -> Self {
        let source = match raw {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        };
        Attributes {
            values: coerce_json_object(raw),
            source,
        }
    }

    /// Original cell text, if the attributes came from text
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// True when the original text does not parse as JSON
    pub fn is_broken(&self) -> bool {
        self.source
            .as_deref()
            .is_some_and(|text| serde_json::from_str::<Value>(text.trim()).is_err())
    }
}

impl From<Map<String, Value>> for Attributes {
    fn from(values: Map<String, Value>) -> Self {
        Attributes {
            values,
            source: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Client {
    #[serde(rename = "ClientID")]
    pub client_id: String,
    pub client_name: String,
    pub priority_level: f64,
    #[serde(rename = "RequestedTaskIDs")]
    pub requested_task_ids: Vec<String>,
    pub group_tag: String,
    #[serde(rename = "AttributesJSON")]
    pub attributes_json: Attributes,
}

impl Entity for Client {
    const KIND: EntityKind = EntityKind::Clients;
    const KEY_FIELD: &'static str = "ClientID";
    const FIELDS: &'static [&'static str] = &[
        "ClientID",
        "ClientName",
        "PriorityLevel",
        "RequestedTaskIDs",
        "GroupTag",
        "AttributesJSON",
    ];

    fn blank(key: String) -> Self {
        Client {
            client_id: key,
            client_name: String::new(),
            priority_level: 1.0,
            requested_task_ids: Vec::new(),
            group_tag: String::new(),
            attributes_json: Attributes::default(),
        }
    }

    fn key(&self) -> &str {
        &self.client_id
    }

    fn set_field(&mut self, field: &str, raw: &Value) -> Result<(), CleanerError> {
        match field {
            "ClientID" => set_key(&mut self.client_id, field, raw)?,
            "ClientName" => self.client_name = coerce_string(raw),
            "PriorityLevel" => self.priority_level = coerce_number(raw, 1.0),
            "RequestedTaskIDs" => self.requested_task_ids = coerce_string_array(raw),
            "GroupTag" => self.group_tag = coerce_string(raw),
            "AttributesJSON" => self.attributes_json = Attributes::from_cell(raw),
            _ => {
                return Err(CleanerError::UnknownField {
                    entity: Self::KIND,
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    fn into_record(self) -> Record {
        Record::Client(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Worker {
    #[serde(rename = "WorkerID")]
    pub worker_id: String,
    pub worker_name: String,
    pub skills: Vec<String>,
    pub available_slots: Vec<f64>,
    pub max_load_per_phase: f64,
    pub worker_group: String,
    pub qualification_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
}

impl Entity for Worker {
    const KIND: EntityKind = EntityKind::Workers;
    const KEY_FIELD: &'static str = "WorkerID";
    const FIELDS: &'static [&'static str] = &[
        "WorkerID",
        "WorkerName",
        "Skills",
        "AvailableSlots",
        "MaxLoadPerPhase",
        "WorkerGroup",
        "QualificationLevel",
        "HourlyRate",
    ];

    fn blank(key: String) -> Self {
        Worker {
            worker_id: key,
            worker_name: String::new(),
            skills: Vec::new(),
            available_slots: Vec::new(),
            max_load_per_phase: 0.0,
            worker_group: String::new(),
            qualification_level: 1.0,
            hourly_rate: None,
        }
    }

    fn key(&self) -> &str {
        &self.worker_id
    }

    fn set_field(&mut self, field: &str, raw: &Value) -> Result<(), CleanerError> {
        match field {
            "WorkerID" => set_key(&mut self.worker_id, field, raw)?,
            "WorkerName" => self.worker_name = coerce_string(raw),
            "Skills" => self.skills = coerce_string_array(raw),
            "AvailableSlots" => self.available_slots = coerce_number_array(raw),
            "MaxLoadPerPhase" => self.max_load_per_phase = coerce_number(raw, 0.0),
            "WorkerGroup" => self.worker_group = coerce_string(raw),
            "QualificationLevel" => self.qualification_level = coerce_number(raw, 1.0),
            "HourlyRate" => self.hourly_rate = coerce_optional_number(raw),
            _ => {
                return Err(CleanerError::UnknownField {
                    entity: Self::KIND,
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    fn into_record(self) -> Record {
        Record::Worker(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    #[serde(rename = "TaskID")]
    pub task_id: String,
    pub task_name: String,
    pub category: String,
    pub duration: f64,
    pub required_skills: Vec<String>,
    pub preferred_phases: Vec<MixedItem>,
    pub max_concurrent: f64,
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Tasks;
    const KEY_FIELD: &'static str = "TaskID";
    const FIELDS: &'static [&'static str] = &[
        "TaskID",
        "TaskName",
        "Category",
        "Duration",
        "RequiredSkills",
        "PreferredPhases",
        "MaxConcurrent",
    ];

    fn blank(key: String) -> Self {
        Task {
            task_id: key,
            task_name: String::new(),
            category: String::new(),
            duration: 1.0,
            required_skills: Vec::new(),
            preferred_phases: Vec::new(),
            max_concurrent: 1.0,
        }
    }

    fn key(&self) -> &str {
        &self.task_id
    }

    fn set_field(&mut self, field: &str, raw: &Value) -> Result<(), CleanerError> {
        match field {
            "TaskID" => set_key(&mut self.task_id, field, raw)?,
            "TaskName" => self.task_name = coerce_string(raw),
            "Category" => self.category = coerce_string(raw),
            "Duration" => self.duration = coerce_number(raw, 1.0),
            "RequiredSkills" => self.required_skills = coerce_string_array(raw),
            "PreferredPhases" => self.preferred_phases = coerce_phase_list(raw),
            "MaxConcurrent" => self.max_concurrent = coerce_number(raw, 1.0),
            _ => {
                return Err(CleanerError::UnknownField {
                    entity: Self::KIND,
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    fn into_record(self) -> Record {
        Record::Task(self)
    }
}

/// One normalized row of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Client(Client),
    Worker(Worker),
    Task(Task),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Client(_) => EntityKind::Clients,
            Record::Worker(_) => EntityKind::Workers,
            Record::Task(_) => EntityKind::Tasks,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Record::Client(c) => c.key(),
            Record::Worker(w) => w.key(),
            Record::Task(t) => t.key(),
        }
    }
}
