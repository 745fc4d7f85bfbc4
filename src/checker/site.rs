//! Site checking over HTTP.
//!
//! # Responsibilities
//! - Probe a site once: delay, GET with a rotated User-Agent, classify the status
//! - Inspect the body according to the checker mode
//! - Retry failed probes and collapse the final failure into an unreachable result
//!
//! # Design Decisions
//! - Statuses below 500 are responses; 403/429 are logged distinctly but
//!   classified like any other response
//! - `check_site` never fails; network trouble becomes `reachable = false`
//! - Construction errors (bad headers, selectors, status lists) are fatal

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::redirect::Policy;

use crate::checker::jitter::{Jitter, RequestShaper};
use crate::checker::theme::ThemeInspector;
use crate::checker::types::{AcceptedCodes, CheckResult, CheckTarget, ProbeError};
use crate::config::{CheckerMode, RequestConfig, ThemeConfig};
use crate::resilience::RetryPolicy;

/// Errors building a checker. These are configuration mistakes, not site failures.
#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid request header '{0}'")]
    Header(String),

    #[error("invalid accepted codes: {0}")]
    AcceptedCodes(String),

    #[error("{0}")]
    Theme(String),
}

/// Checks one site with a single attempt.
#[async_trait]
pub trait SiteChecker: Send + Sync {
    async fn probe(&self, target: &CheckTarget) -> Result<CheckResult, ProbeError>;
}

/// Run `probe` under `retry`. Exhausted retries become an unreachable result
/// carrying the last known status code.
pub async fn check_site(
    checker: &dyn SiteChecker,
    target: &CheckTarget,
    retry: &RetryPolicy,
) -> CheckResult {
    let outcome = retry
        .run(|attempt| {
            tracing::debug!(issue = target.id, url = %target.url, attempt, "Probing site");
            checker.probe(target)
        })
        .await;

    match outcome {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(
                issue = target.id,
                url = %target.url,
                attempts = retry.max_attempts(),
                error = %e,
                "Error checking site"
            );
            CheckResult::unreachable(e.status_code())
        }
    }
}

/// What to do with a response body once the status is known.
#[derive(Debug)]
pub enum ContentCheck {
    /// Friend mode: valid when reachable. Back-link verification is not implemented.
    Reachability,
    /// Theme mode: valid when theme metadata is found.
    Theme(ThemeInspector),
}

impl ContentCheck {
    pub fn for_mode(mode: CheckerMode, theme: &ThemeConfig) -> Result<Self, CheckerError> {
        match mode {
            CheckerMode::Friend => Ok(ContentCheck::Reachability),
            CheckerMode::Theme => ThemeInspector::new(theme)
                .map(ContentCheck::Theme)
                .map_err(CheckerError::Theme),
        }
    }
}

/// reqwest-backed [`SiteChecker`].
#[derive(Debug)]
pub struct HttpSiteChecker {
    client: reqwest::Client,
    shaper: RequestShaper,
    accepted: AcceptedCodes,
    content: ContentCheck,
}

impl HttpSiteChecker {
    pub fn new(
        mode: CheckerMode,
        request: &RequestConfig,
        theme: &ThemeConfig,
        jitter: Box<dyn Jitter>,
    ) -> Result<Self, CheckerError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| CheckerError::Header(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| CheckerError::Header(name.as_str().to_string()))?;
            headers.insert(name, value);
        }

        let redirect = if request.follow_redirects {
            Policy::limited(10)
        } else {
            Policy::none()
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(request.timeout_ms))
            .default_headers(headers)
            .redirect(redirect)
            .build()?;

        Ok(Self {
            client,
            shaper: RequestShaper::new(
                request.delay_min_ms,
                request.delay_max_ms,
                request.user_agents.clone(),
                jitter,
            ),
            accepted: AcceptedCodes::parse(&request.accepted_codes)
                .map_err(CheckerError::AcceptedCodes)?,
            content: ContentCheck::for_mode(mode, theme)?,
        })
    }
}

#[async_trait]
impl SiteChecker for HttpSiteChecker {
    async fn probe(&self, target: &CheckTarget) -> Result<CheckResult, ProbeError> {
        let delay = self.shaper.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut request = self.client.get(&target.url);
        if let Some(agent) = self.shaper.next_user_agent() {
            request = request.header(USER_AGENT, agent);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();

        match status {
            403 => {
                tracing::warn!(
                    issue = target.id,
                    url = %target.url,
                    "Access forbidden, possibly due to anti-crawling measures"
                );
            }
            429 => {
                tracing::warn!(issue = target.id, url = %target.url, "Rate limited by site");
            }
            s if s >= 500 => return Err(ProbeError::ServerError(s)),
            _ => {}
        }

        let reachable = self.accepted.contains(status);
        let mut result = CheckResult {
            status_code: Some(status),
            reachable,
            ..CheckResult::default()
        };

        match &self.content {
            ContentCheck::Reachability => {
                result.valid = reachable;
            }
            ContentCheck::Theme(inspector) => {
                let body = response.text().await?;
                match inspector.inspect(&body) {
                    Some(theme) => {
                        result.valid = true;
                        result.theme_name = theme.name;
                        result.theme_version = Some(theme.version);
                    }
                    None => {
                        tracing::info!(
                            issue = target.id,
                            url = %target.url,
                            "No theme metadata found"
                        );
                    }
                }
            }
        }

        Ok(result)
    }
}
