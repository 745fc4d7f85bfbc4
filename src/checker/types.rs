//! Check targets, results and probe failures.

use serde::{Deserialize, Serialize};

/// One site to audit, built from a tracker record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckTarget {
    /// Tracker record identifier (issue number).
    pub id: u64,
    pub url: String,
    /// Labels on the record when the run started.
    pub current_labels: Vec<String>,
}

/// Outcome of checking one site, after retries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// HTTP status, absent when no response was received.
    pub status_code: Option<u16>,
    pub reachable: bool,
    pub valid: bool,
    pub theme_name: Option<String>,
    pub theme_version: Option<String>,
}

impl CheckResult {
    /// Result for a site that could not be checked.
    pub fn unreachable(status_code: Option<u16>) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }
}

/// Failure of a single probe attempt. All variants are retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("server error (HTTP {0})")]
    ServerError(u16),

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl ProbeError {
    /// Status code carried by the failure, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProbeError::ServerError(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProbeError::Timeout
        } else if e.is_connect() {
            ProbeError::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            ProbeError::Body(e.to_string())
        } else {
            ProbeError::Request(e.to_string())
        }
    }
}

/// Status codes counted as reachable, compared as strings against the
/// comma-separated allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedCodes(Vec<String>);

impl AcceptedCodes {
    pub fn parse(list: &str) -> Result<Self, String> {
        let mut codes = Vec::new();
        for entry in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match entry.parse::<u16>() {
                Ok(code) if (100..=599).contains(&code) => codes.push(entry.to_string()),
                _ => return Err(format!("'{}' is not an HTTP status code", entry)),
            }
        }
        if codes.is_empty() {
            return Err("at least one status code is required".to_string());
        }
        Ok(Self(codes))
    }

    pub fn contains(&self, status: u16) -> bool {
        let status = status.to_string();
        self.0.iter().any(|code| *code == status)
    }
}
