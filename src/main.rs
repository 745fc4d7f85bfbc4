//! site-auditor binary.
//!
//! Loads configuration (defaults → TOML file → `INPUT_*` variables → flags),
//! fetches the open records, audits them and exits non-zero on any failure.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use site_auditor::checker::ThreadJitter;
use site_auditor::config::{load_config, AuditConfig, CheckerMode, ConfigError};
use site_auditor::lifecycle::{build_auditor, close_pool_on_ctrl_c, StartupError};
use site_auditor::observability::init_logging;
use site_auditor::tracker::{DryRunSink, GithubTracker, LabelSink, RecordSource};

#[derive(Parser, Debug)]
#[command(name = "site-auditor")]
#[command(about = "Check listed sites and reconcile their issue labels", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Checker mode: friend or theme
    #[arg(long)]
    checker: Option<CheckerMode>,

    /// Attempts per site, including the first
    #[arg(long)]
    retry_times: Option<u32>,

    /// Sites checked at the same time
    #[arg(long)]
    concurrency: Option<usize>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repo: Option<String>,

    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log label changes without writing them
    #[arg(long)]
    dry_run: bool,

    /// Write a JSON report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut AuditConfig) {
        if let Some(mode) = self.checker {
            config.checker.mode = mode;
        }
        if let Some(attempts) = self.retry_times {
            config.retry.max_attempts = attempts;
        }
        if let Some(capacity) = self.concurrency {
            config.pool.capacity = capacity;
        }
        if let Some(repo) = &self.repo {
            config.tracker.repository = Some(repo.clone());
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(mut config) => {
            cli.apply(&mut config);
            config
        }
        Err(e) => {
            eprintln!("site-auditor: {}", e);
            return ExitCode::from(2);
        }
    };

    init_logging(&config.logging);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "site-auditor starting");

    let Some(repository) = config.tracker.repository.clone() else {
        tracing::error!("No repository configured (set --repo or GITHUB_REPOSITORY)");
        return ExitCode::from(2);
    };
    let tracker = match GithubTracker::new(
        &config.tracker.api_url,
        &repository,
        cli.token.as_deref(),
    ) {
        Ok(tracker) => Arc::new(tracker),
        Err(e) => {
            tracing::error!(error = %e, "Invalid tracker settings");
            return ExitCode::from(2);
        }
    };

    let sink: Arc<dyn LabelSink> = if cli.dry_run {
        Arc::new(DryRunSink)
    } else {
        tracker.clone()
    };
    let exclude = config.tracker.exclude_labels.clone();

    let auditor = match build_auditor(config, Box::new(ThreadJitter), sink) {
        Ok(auditor) => auditor,
        Err(StartupError::Config(ConfigError::Validation(errors))) => {
            for e in &errors {
                tracing::error!(field = e.field, "{}", e.message);
            }
            return ExitCode::from(2);
        }
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::from(2);
        }
    };

    let records = match tracker.fetch_open_records(&exclude).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(error = %e, "Error fetching issues");
            return ExitCode::FAILURE;
        }
    };

    let signals = close_pool_on_ctrl_c(auditor.pool().clone());
    let report = auditor.run(records).await;
    signals.abort();

    if let Some(path) = &cli.report {
        match report.write_json(path) {
            Ok(()) => tracing::info!(path = %path.display(), "Report written"),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to write report");
                return ExitCode::FAILURE;
            }
        }
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
