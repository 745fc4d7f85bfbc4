//! Configuration loading from disk and from workflow inputs.

use std::path::Path;
use std::fs;

use crate::config::schema::AuditConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid input {name}: {message}")]
    Input { name: String, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, then apply `INPUT_*` workflow inputs.
///
/// The result is not validated yet; callers apply their own overrides and
/// finish with [`validated`].
pub fn load_config(path: Option<&Path>) -> Result<AuditConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => AuditConfig::default(),
    };
    apply_action_inputs(&mut config, |name| std::env::var(name).ok())?;
    Ok(config)
}

/// Parse a TOML configuration file.
pub fn read_config_file(path: &Path) -> Result<AuditConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AuditConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Run semantic validation and hand the config back if it passes.
pub fn validated(config: AuditConfig) -> Result<AuditConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply workflow inputs (`INPUT_CHECKER`, `INPUT_RETRY_TIMES`, ...).
///
/// Empty inputs are treated as unset, the same way the Actions runner reports
/// an input that was declared but not given.
pub fn apply_action_inputs<F>(config: &mut AuditConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let input = |name: &str| {
        lookup(&format!("INPUT_{}", name.to_ascii_uppercase()))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(value) = input("checker") {
        config.checker.mode = value.parse().map_err(|message| ConfigError::Input {
            name: "checker".to_string(),
            message,
        })?;
    }
    if let Some(value) = input("retry_times") {
        config.retry.max_attempts = value.parse().map_err(|e| ConfigError::Input {
            name: "retry_times".to_string(),
            message: format!("'{}' is not a positive integer: {}", value, e),
        })?;
    }
    if let Some(value) = input("exclude_issue_with_labels") {
        config.tracker.exclude_labels = split_list(&value);
    }
    if let Some(value) = input("accepted_codes") {
        config.request.accepted_codes = value;
    }
    if let Some(value) = input("unreachable_label") {
        config.labels.unreachable = value;
    }
    if let Some(value) = input("theme_checker_invalid_label") {
        config.labels.theme_invalid = value;
    }
    if let Some(value) = input("friend_checker_invalid_label") {
        config.labels.friend_invalid = value;
    }
    if let Some(value) = input("theme_checker_meta_tag") {
        config.theme.meta_selector = value;
    }
    if let Some(value) = input("theme_checker_content_attr") {
        config.theme.content_attr = value;
    }
    if let Some(value) = input("theme_checker_version_attr") {
        config.theme.version_attr = value;
    }

    Ok(())
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
