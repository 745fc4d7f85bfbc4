//! Label reconciliation.
//!
//! Turns a check result and a record's current labels into its next label set.
//! Pure and total: no I/O, every `CheckResult` shape yields a label list.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::checker::CheckResult;
use crate::config::{CheckerMode, LabelConfig};

static VERSION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?[\d.]+(?:-[\w.]+)?$").expect("valid regex"));

/// True for labels that look like a semantic version, with or without a `v`.
pub fn is_version_label(label: &str) -> bool {
    VERSION_LABEL.is_match(label)
}

/// Computes the next label set for a record.
#[derive(Debug, Clone)]
pub struct LabelReconciler {
    labels: LabelConfig,
    mode: CheckerMode,
}

impl LabelReconciler {
    pub fn new(labels: LabelConfig, mode: CheckerMode) -> Self {
        Self { labels, mode }
    }

    /// Label added when a reachable site fails the mode's validity check.
    pub fn invalid_label(&self) -> &str {
        match self.mode {
            CheckerMode::Friend => &self.labels.friend_invalid,
            CheckerMode::Theme => &self.labels.theme_invalid,
        }
    }

    /// Next labels for a record, in first-seen order without duplicates.
    ///
    /// Steps run in order:
    /// 1. status labels: cleared on 200, replaced by `status:<code>` otherwise
    /// 2. version labels: replaced by `v<version>` when a version was resolved
    /// 3. reachability: clear or add the unreachable label; for reachable
    ///    sites clear or add the mode's invalid label
    /// 4. de-duplicate
    pub fn reconcile(&self, result: &CheckResult, current: &[String]) -> Vec<String> {
        let mut labels: Vec<String> = current.to_vec();
        let status_prefix = self.labels.status_prefix.as_str();

        match result.status_code {
            Some(200) => labels.retain(|l| !l.starts_with(status_prefix)),
            Some(code) => {
                labels.retain(|l| !l.starts_with(status_prefix));
                labels.push(format!("{}{}", status_prefix, code));
            }
            None => {}
        }

        if let Some(version) = &result.theme_version {
            labels.retain(|l| !is_version_label(l));
            labels.push(format!("{}{}", self.labels.version_prefix, version));
        }

        let unreachable = self.labels.unreachable.as_str();
        if result.reachable {
            labels.retain(|l| l != unreachable);
            let invalid = self.invalid_label();
            if result.valid {
                labels.retain(|l| l != invalid);
            } else {
                labels.push(invalid.to_string());
            }
        } else {
            // The mode's invalid label is left as is for unreachable sites.
            labels.push(unreachable.to_string());
        }

        let mut seen = HashSet::new();
        labels.retain(|l| seen.insert(l.clone()));
        labels
    }
}
