//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for an audit run.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the site auditor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    /// Which checker variant to run.
    pub checker: CheckerConfig,

    /// Retry policy around each site check.
    pub retry: RetryConfig,

    /// Concurrency pool settings.
    pub pool: PoolConfig,

    /// Outbound request shaping.
    pub request: RequestConfig,

    /// Label names managed by the reconciler.
    pub labels: LabelConfig,

    /// Theme metadata extraction settings.
    pub theme: ThemeConfig,

    /// Issue tracker connection settings.
    pub tracker: TrackerConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Checker variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckerMode {
    /// Reachability only: a site is valid when it answers with an accepted code.
    #[default]
    Friend,
    /// Reachability plus theme metadata extracted from the HTML.
    Theme,
}

impl CheckerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckerMode::Friend => "friend",
            CheckerMode::Theme => "theme",
        }
    }
}

impl std::str::FromStr for CheckerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "friend" => Ok(CheckerMode::Friend),
            "theme" => Ok(CheckerMode::Theme),
            other => Err(format!("unknown checker '{}' (expected 'friend' or 'theme')", other)),
        }
    }
}

impl std::fmt::Display for CheckerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checker selection.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CheckerConfig {
    pub mode: CheckerMode,
}

/// Delay strategy between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// Same delay before every retry.
    #[default]
    Fixed,
    /// Doubling delay with jitter, capped at `max_delay_ms`.
    Exponential,
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per site (including the first one).
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds.
    pub delay_ms: u64,

    /// Delay strategy.
    pub backoff: BackoffKind,

    /// Upper bound for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
            backoff: BackoffKind::Fixed,
            max_delay_ms: 10_000,
        }
    }
}

/// Concurrency pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of sites checked at the same time.
    pub capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { capacity: 5 }
    }
}

/// Outbound request configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Lower bound (inclusive) of the randomized pre-request delay.
    pub delay_min_ms: u64,

    /// Upper bound (exclusive) of the randomized pre-request delay.
    pub delay_max_ms: u64,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,

    /// User-Agent pool; one is picked at random per request.
    pub user_agents: Vec<String>,

    /// Extra headers sent with every request.
    pub headers: BTreeMap<String, String>,

    /// Comma-separated list of status codes that count as reachable.
    pub accepted_codes: String,

    /// Follow HTTP redirects.
    pub follow_redirects: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            delay_min_ms: 1000,
            delay_max_ms: 3000,
            timeout_ms: 10_000,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            ],
            headers: BTreeMap::new(),
            accepted_codes: "200,301".to_string(),
            follow_redirects: true,
        }
    }
}

/// Label names written back to the tracker.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Added when a site cannot be reached.
    pub unreachable: String,

    /// Added when the theme checker finds no usable metadata.
    pub theme_invalid: String,

    /// Added when the friend checker rejects a reachable site.
    pub friend_invalid: String,

    /// Prefix of status-code labels (`status:404`).
    pub status_prefix: String,

    /// Prefix of theme-version labels (`v1.2.0`).
    pub version_prefix: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            unreachable: "无法访问".to_string(),
            theme_invalid: "无效主题".to_string(),
            friend_invalid: "未添加友链".to_string(),
            status_prefix: "status:".to_string(),
            version_prefix: "v".to_string(),
        }
    }
}

/// Theme metadata extraction configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// CSS selector of the metadata element, or `volantis` for the legacy head attribute.
    pub meta_selector: String,

    /// Attribute holding the theme URL.
    pub content_attr: String,

    /// Attribute holding the theme version.
    pub version_attr: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            meta_selector: r#"meta[theme-name="Stellar"]"#.to_string(),
            content_attr: "content".to_string(),
            version_attr: "theme-version".to_string(),
        }
    }
}

/// Issue tracker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// GitHub REST API base URL.
    pub api_url: String,

    /// Repository in `owner/name` form.
    pub repository: Option<String>,

    /// Issues carrying any of these labels are not checked.
    pub exclude_labels: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            repository: None,
            exclude_labels: vec!["审核中".to_string(), "白名单".to_string()],
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,

    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "site_auditor=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
