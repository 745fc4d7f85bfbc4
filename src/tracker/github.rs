//! GitHub issues as the record source and label sink.
//!
//! # Responsibilities
//! - List open issues page by page, newest first
//! - Drop pull requests and issues carrying an excluded label
//! - Replace an issue's labels
//!
//! # Design Decisions
//! - Label updates log failures instead of returning them
//! - The API base URL is configurable (GitHub Enterprise, tests)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::tracker::types::{LabelSink, RecordSource, TrackerError, TrackerRecord};

const PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct Issue {
    number: u64,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<IssueLabel>,
    pull_request: Option<serde::de::IgnoredAny>,
}

#[derive(Debug, Deserialize)]
struct IssueLabel {
    name: String,
}

#[derive(Debug, Serialize)]
struct SetLabels<'a> {
    labels: &'a [String],
}

/// GitHub REST client scoped to one repository.
#[derive(Debug, Clone)]
pub struct GithubTracker {
    client: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
}

impl GithubTracker {
    /// `repository` is `owner/name`. The token is optional for public repositories.
    pub fn new(api_url: &str, repository: &str, token: Option<&str>) -> Result<Self, TrackerError> {
        Url::parse(api_url)?;

        let (owner, repo) = repository
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty() && !r.contains('/'))
            .ok_or_else(|| TrackerError::Repository(repository.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| TrackerError::Token)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("site-auditor/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    fn issues_url(&self) -> String {
        format!("{}/repos/{}/{}/issues", self.api_url, self.owner, self.repo)
    }

    async fn fetch_page(&self, page: usize) -> Result<Vec<Issue>, TrackerError> {
        let response = self
            .client
            .get(self.issues_url())
            .query(&[
                ("state", "open"),
                ("sort", "created"),
                ("direction", "desc"),
            ])
            .query(&[("per_page", PER_PAGE), ("page", page)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl RecordSource for GithubTracker {
    async fn fetch_open_records(
        &self,
        exclude: &[String],
    ) -> Result<Vec<TrackerRecord>, TrackerError> {
        let mut issues = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.fetch_page(page).await?;
            let done = batch.len() < PER_PAGE;
            issues.extend(batch);
            if done {
                break;
            }
            page += 1;
        }

        let fetched = issues.len();
        let records: Vec<TrackerRecord> = issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_none())
            .map(|issue| TrackerRecord {
                number: issue.number,
                body: issue.body,
                labels: issue.labels.into_iter().map(|l| l.name).collect(),
            })
            .filter(|record| !record.has_any_label(exclude))
            .collect();

        tracing::info!(
            repository = %format!("{}/{}", self.owner, self.repo),
            fetched,
            kept = records.len(),
            excluded = ?exclude,
            "Fetched open issues"
        );
        Ok(records)
    }
}

#[async_trait]
impl LabelSink for GithubTracker {
    async fn set_labels(&self, id: u64, labels: &[String]) {
        let url = format!("{}/{}/labels", self.issues_url(), id);
        let result = self
            .client
            .put(url)
            .json(&SetLabels { labels })
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!(issue = id, labels = ?labels, "Updated labels");
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::error!(
                    issue = id,
                    status = %status,
                    body = %body,
                    "Error updating labels"
                );
            }
            Err(e) => {
                tracing::error!(
                    issue = id,
                    error = %e,
                    "Error updating labels: no response received"
                );
            }
        }
    }
}
