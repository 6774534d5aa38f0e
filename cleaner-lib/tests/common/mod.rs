use std::io::Write;
use std::path::PathBuf;

// Re-export shared test utilities from src/test_utils.rs
pub use cleaner_lib::test_utils::{
    create_client, create_raw_row, create_sample_store, create_task, create_worker,
};

/// Write `content` to a file called `name` inside `dir` and return its path as a string
#[allow(dead_code)]
pub fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
    let path: PathBuf = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path.to_string_lossy().into_owned()
}
