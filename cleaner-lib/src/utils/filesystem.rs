use std::fs::OpenOptions;
use std::io::Write;

use crate::ERRORS_LOG_FILE;
use crate::utils::get_utc_iso_datetime;

/// Append a diagnostic entry to the errors log file
///
/// # Arguments
/// * `error_type` - The category of the entry (e.g., "Row Ingestion Error")
/// * `error_message` - The message body
///
/// Failures to open or write the log are ignored.
pub fn write_error_to_log(error_type: &str, error_message: &str) {
    let timestamp = get_utc_iso_datetime();
    let log_entry = format!("\n[{}] {}:\n{}\n", timestamp, error_type, error_message);

    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(ERRORS_LOG_FILE)
    {
        let _ = writeln!(file, "{}", log_entry);
    }
}
