//! Tracker records and the collaborator traits the audit depends on.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::checker::CheckTarget;

static URL_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""url":\s*"([^"]+)""#).expect("valid regex"));

/// Extract the `"url": "<value>"` token from a free-text record body.
pub fn extract_url(body: &str) -> Option<String> {
    URL_FIELD
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// One open record as delivered by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerRecord {
    pub number: u64,
    pub body: Option<String>,
    pub labels: Vec<String>,
}

impl TrackerRecord {
    pub fn has_any_label(&self, names: &[String]) -> bool {
        names.iter().any(|name| self.labels.contains(name))
    }

    pub fn url(&self) -> Option<String> {
        self.body.as_deref().and_then(extract_url)
    }

    /// Build the check target, or `None` when the body carries no URL.
    pub fn to_target(&self) -> Option<CheckTarget> {
        self.url().map(|url| CheckTarget {
            id: self.number,
            url,
            current_labels: self.labels.clone(),
        })
    }
}

/// Errors talking to the tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("tracker request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("tracker returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid repository '{0}' (expected owner/name)")]
    Repository(String),

    #[error("token contains characters not allowed in a header")]
    Token,

    #[error("invalid tracker URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Supplies the records to audit.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Open records that carry none of the `exclude` labels.
    async fn fetch_open_records(
        &self,
        exclude: &[String],
    ) -> Result<Vec<TrackerRecord>, TrackerError>;
}

/// Receives the reconciled label sets.
///
/// `set_labels` replaces the record's labels. Implementations log their own
/// failures and never return them, so one record cannot abort the run.
#[async_trait]
pub trait LabelSink: Send + Sync {
    async fn set_labels(&self, id: u64, labels: &[String]);
}
