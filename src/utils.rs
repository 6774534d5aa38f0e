use cleaner_lib::utils::{get_local_datetime_with_format, normalize_key};
use cleaner_lib::{ValidationSettings, ValidationSummary};

/// Output directory name for one run, e.g. `cleaned_2025-03-01_14-05-09`
pub fn generate_bundle_dirname(label: &str) -> String {
    let timestamp = get_local_datetime_with_format("%Y-%m-%d_%H-%M-%S");
    let label = normalize_key(label);
    let label = if label.is_empty() { "cleaned".to_string() } else { label };
    return format!("{label}_{timestamp}");
}

/// Settings from an optional JSON file, with the command-line switches applied on top
///
/// A switch only ever turns its option on; an unset switch keeps the file's value.
pub fn resolve_settings(
    settings_file: Option<&str>,
    strict: bool,
    anomalies: bool,
) -> anyhow::Result<ValidationSettings> {
    let mut settings = match settings_file {
        Some(path) => ValidationSettings::from_json_file(path)?,
        None => ValidationSettings::default(),
    };
    if strict {
        settings.strict_mode = true;
    }
    if anomalies {
        settings.anomaly_detection = true;
    }
    Ok(settings)
}

/// Process exit status for a finished run: 1 while critical errors remain
pub fn exit_status(summary: &ValidationSummary) -> i32 {
    if summary.critical_errors > 0 { 1 } else { 0 }
}
