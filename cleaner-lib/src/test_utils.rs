// Test utilities available to both unit and integration tests
// Only compiled when testing or with the `test` feature

use crate::model::{Client, Entity, Task, Worker};
use crate::reader::RawRow;
use crate::store::DataStore;
use serde_json::Value;

/// Client with the given priority and requested tasks, other fields at their defaults
#[allow(dead_code)]
pub fn create_client(id: &str, priority: f64, requested_tasks: &[&str]) -> Client {
    let mut client = Client::blank(id.to_string());
    client.client_name = format!("Client {}", id);
    client.priority_level = priority;
    client.requested_task_ids = requested_tasks.iter().map(|t| t.to_string()).collect();
    client
}

/// Worker with skills, slots and per-phase load
#[allow(dead_code)]
pub fn create_worker(id: &str, skills: &[&str], slots: &[f64], max_load: f64) -> Worker {
    let mut worker = Worker::blank(id.to_string());
    worker.worker_name = format!("Worker {}", id);
    worker.skills = skills.iter().map(|s| s.to_string()).collect();
    worker.available_slots = slots.to_vec();
    worker.max_load_per_phase = max_load;
    worker
}

/// Task requiring the given skills, duration and concurrency at 1
#[allow(dead_code)]
pub fn create_task(id: &str, required_skills: &[&str]) -> Task {
    let mut task = Task::blank(id.to_string());
    task.task_name = format!("Task {}", id);
    task.category = "General".to_string();
    task.required_skills = required_skills.iter().map(|s| s.to_string()).collect();
    task
}

/// Raw row from `(header, cell)` pairs
#[allow(dead_code)]
pub fn create_raw_row(cells: &[(&str, Value)]) -> RawRow {
    cells
        .iter()
        .map(|(header, value)| (header.to_string(), value.clone()))
        .collect()
}

/// Store with one consistent client, worker and task
#[allow(dead_code)]
pub fn create_sample_store() -> DataStore {
    let mut store = DataStore::new();
    store.create(create_client("C1", 3.0, &["T1"]).into_record());
    store.create(create_worker("W1", &["ML"], &[1.0, 2.0], 2.0).into_record());
    store.create(create_task("T1", &["ML"]).into_record());
    store
}
