use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::validation::ValidationErrorType;

/// Knobs for a validation run
///
/// Every field has a default, so a settings file only needs the keys it changes:
///
/// ```json
/// { "strictMode": true, "enabledValidators": ["duplicate_id", "out_of_range"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationSettings {
    /// Error types that are reported; findings of other types are dropped
    pub enabled_validators: BTreeSet<ValidationErrorType>,
    /// Report warnings with error severity
    pub strict_mode: bool,
    /// Run the heuristic consistency pass after the regular checks
    pub anomaly_detection: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        ValidationSettings {
            enabled_validators: ValidationErrorType::ALL.into_iter().collect(),
            strict_mode: false,
            anomaly_detection: false,
        }
    }
}

impl ValidationSettings {
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file '{}'", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings file '{}'", path.display()))?;
        Ok(settings)
    }

    pub fn is_enabled(&self, error_type: ValidationErrorType) -> bool {
        self.enabled_validators.contains(&error_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_everything() {
        let settings = ValidationSettings::default();
        assert!(ValidationErrorType::ALL.iter().all(|t| settings.is_enabled(*t)));
        assert!(!settings.strict_mode);
        assert!(!settings.anomaly_detection);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: ValidationSettings = serde_json::from_str(r#"{"strictMode": true}"#).unwrap();
        assert!(settings.strict_mode);
        assert_eq!(settings.enabled_validators.len(), ValidationErrorType::ALL.len());
    }

    #[test]
    fn test_enabled_validators_from_json() {
        let settings: ValidationSettings =
            serde_json::from_str(r#"{"enabledValidators": ["duplicate_id"]}"#).unwrap();
        assert!(settings.is_enabled(ValidationErrorType::DuplicateId));
        assert!(!settings.is_enabled(ValidationErrorType::SkillCoverage));
    }
}
