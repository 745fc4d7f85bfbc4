//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts >= 1, capacity >= 1, delay window ordered)
//! - Reject selectors and status lists that would only fail once the run started
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AuditConfig → Result<(), Vec<ValidationError>>
//! - Runs before any site is checked

use scraper::Selector;

use crate::checker::types::AcceptedCodes;
use crate::checker::theme::LEGACY_VOLANTIS_SELECTOR;
use crate::config::schema::{AuditConfig, BackoffKind, CheckerMode};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &AuditConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.retry.max_attempts == 0 {
        errors.push(ValidationError::new("retry.max_attempts", "must be at least 1"));
    }
    if config.retry.backoff == BackoffKind::Exponential
        && config.retry.max_delay_ms < config.retry.delay_ms
    {
        errors.push(ValidationError::new(
            "retry.max_delay_ms",
            "must not be smaller than retry.delay_ms",
        ));
    }

    if config.pool.capacity == 0 {
        errors.push(ValidationError::new("pool.capacity", "must be at least 1"));
    }

    let request = &config.request;
    if request.delay_min_ms > request.delay_max_ms {
        errors.push(ValidationError::new(
            "request.delay_min_ms",
            format!(
                "window is inverted ({} > {})",
                request.delay_min_ms, request.delay_max_ms
            ),
        ));
    }
    if request.timeout_ms == 0 {
        errors.push(ValidationError::new("request.timeout_ms", "must be greater than 0"));
    }
    if request.user_agents.iter().all(|ua| ua.trim().is_empty()) {
        errors.push(ValidationError::new(
            "request.user_agents",
            "at least one non-empty User-Agent is required",
        ));
    }
    if let Err(e) = AcceptedCodes::parse(&request.accepted_codes) {
        errors.push(ValidationError::new("request.accepted_codes", e));
    }

    let labels = &config.labels;
    for (field, value) in [
        ("labels.unreachable", &labels.unreachable),
        ("labels.theme_invalid", &labels.theme_invalid),
        ("labels.friend_invalid", &labels.friend_invalid),
        ("labels.status_prefix", &labels.status_prefix),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }

    if config.checker.mode == CheckerMode::Theme {
        let theme = &config.theme;
        if theme.meta_selector != LEGACY_VOLANTIS_SELECTOR {
            if let Err(e) = Selector::parse(&theme.meta_selector) {
                errors.push(ValidationError::new(
                    "theme.meta_selector",
                    format!("invalid selector '{}': {:?}", theme.meta_selector, e),
                ));
            }
        }
        if theme.content_attr.trim().is_empty() {
            errors.push(ValidationError::new("theme.content_attr", "must not be empty"));
        }
        if theme.version_attr.trim().is_empty() {
            errors.push(ValidationError::new("theme.version_attr", "must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&AuditConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = AuditConfig::default();
        config.retry.max_attempts = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "retry.max_attempts");
    }

    #[test]
    fn test_delay_cap_only_checked_for_exponential_backoff() {
        let mut config = AuditConfig::default();
        config.retry.delay_ms = 15_000;
        assert!(validate_config(&config).is_ok());

        config.retry.backoff = BackoffKind::Exponential;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "retry.max_delay_ms");
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = AuditConfig::default();
        config.pool.capacity = 0;
        config.request.delay_min_ms = 5000;
        config.request.accepted_codes = "200,abc".to_string();
        config.labels.unreachable = " ".to_string();

        let fields: Vec<_> = validate_config(&config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(
            fields,
            vec![
                "pool.capacity",
                "request.delay_min_ms",
                "request.accepted_codes",
                "labels.unreachable"
            ]
        );
    }

    #[test]
    fn test_theme_selector_checked_only_in_theme_mode() {
        let mut config = AuditConfig::default();
        config.theme.meta_selector = "meta[[".to_string();
        assert!(validate_config(&config).is_ok());

        config.checker.mode = CheckerMode::Theme;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "theme.meta_selector");

        config.theme.meta_selector = LEGACY_VOLANTIS_SELECTOR.to_string();
        assert!(validate_config(&config).is_ok());
    }
}
