//! Audit orchestration.
//!
//! # Responsibilities
//! - Submit one unit per record to the concurrency pool
//! - Per unit: resolve URL → check site under retry → reconcile labels → write labels
//! - Capture per-record failures without stopping sibling units
//!
//! # Design Decisions
//! - Units are driven from one task with `join_all`, so pool admission order
//!   follows record order
//! - A panicking unit is caught and reported as that record's failure
//! - Records without a URL are skipped with a warning and do not fail the run

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::future::join_all;
use futures_util::FutureExt;

use crate::audit::report::{AuditReport, TargetOutcome};
use crate::checker::{check_site, SiteChecker};
use crate::labels::LabelReconciler;
use crate::pool::ConcurrencyPool;
use crate::resilience::RetryPolicy;
use crate::tracker::{LabelSink, TrackerRecord};

/// Drives a full audit run over a list of records.
pub struct Auditor {
    pool: Arc<ConcurrencyPool>,
    checker: Arc<dyn SiteChecker>,
    retry: RetryPolicy,
    reconciler: LabelReconciler,
    sink: Arc<dyn LabelSink>,
}

impl Auditor {
    pub fn new(
        pool: Arc<ConcurrencyPool>,
        checker: Arc<dyn SiteChecker>,
        retry: RetryPolicy,
        reconciler: LabelReconciler,
        sink: Arc<dyn LabelSink>,
    ) -> Self {
        Self {
            pool,
            checker,
            retry,
            reconciler,
            sink,
        }
    }

    pub fn pool(&self) -> &Arc<ConcurrencyPool> {
        &self.pool
    }

    /// Check every record and return once all units have finished.
    pub async fn run(&self, records: Vec<TrackerRecord>) -> AuditReport {
        tracing::info!(
            total = records.len(),
            capacity = self.pool.capacity(),
            attempts = self.retry.max_attempts(),
            "Total sites to check: {}",
            records.len()
        );

        let units = records.iter().map(|record| async move {
            let unit = AssertUnwindSafe(self.process(record)).catch_unwind();
            match self.pool.submit(unit).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(panic)) => failed(record, panic_message(panic.as_ref())),
                Err(e) => failed(record, e.to_string()),
            }
        });
        let outcomes = join_all(units).await;

        let report = AuditReport::from_outcomes(outcomes);
        report.log_summary();
        report
    }

    /// One unit of work for one record.
    async fn process(&self, record: &TrackerRecord) -> TargetOutcome {
        let Some(target) = record.to_target() else {
            tracing::warn!(issue = record.number, "No url found in issue body");
            return TargetOutcome::Skipped { id: record.number };
        };

        tracing::info!(issue = target.id, url = %target.url, "Checking site");
        let result = check_site(self.checker.as_ref(), &target, &self.retry).await;
        tracing::info!(
            issue = target.id,
            url = %target.url,
            status = ?result.status_code,
            reachable = result.reachable,
            valid = result.valid,
            theme = ?result.theme_name,
            version = ?result.theme_version,
            "Checked site"
        );

        let labels = self.reconciler.reconcile(&result, &target.current_labels);
        tracing::info!(issue = target.id, labels = ?labels, "Updating labels");
        self.sink.set_labels(target.id, &labels).await;

        TargetOutcome::Updated {
            id: target.id,
            url: target.url,
            result,
            labels,
        }
    }
}

fn failed(record: &TrackerRecord, error: String) -> TargetOutcome {
    tracing::error!(issue = record.number, error = %error, "Error processing site");
    TargetOutcome::Failed {
        id: record.number,
        url: record.url(),
        error,
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("unit panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("unit panicked: {}", s)
    } else {
        "unit panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{CheckResult, CheckTarget, ProbeError};
    use crate::config::{CheckerMode, LabelConfig};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    struct Fixed(CheckResult);

    #[async_trait]
    impl SiteChecker for Fixed {
        async fn probe(&self, target: &CheckTarget) -> Result<CheckResult, ProbeError> {
            if target.url.contains("panic") {
                panic!("checker exploded");
            }
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct Recording(Mutex<Vec<(u64, Vec<String>)>>);

    #[async_trait]
    impl LabelSink for Recording {
        async fn set_labels(&self, id: u64, labels: &[String]) {
            self.0.lock().unwrap().push((id, labels.to_vec()));
        }
    }

    fn record(number: u64, url: Option<&str>) -> TrackerRecord {
        TrackerRecord {
            number,
            body: url.map(|u| format!(r#"{{"url": "{}"}}"#, u)),
            labels: vec!["status:500".to_string()],
        }
    }

    fn auditor(result: CheckResult, sink: Arc<Recording>) -> Auditor {
        Auditor::new(
            Arc::new(ConcurrencyPool::new(2).unwrap()),
            Arc::new(Fixed(result)),
            RetryPolicy::new(1, Duration::from_millis(1)).unwrap(),
            LabelReconciler::new(LabelConfig::default(), CheckerMode::Friend),
            sink,
        )
    }

    fn ok() -> CheckResult {
        CheckResult {
            status_code: Some(200),
            reachable: true,
            valid: true,
            ..CheckResult::default()
        }
    }

    #[tokio::test]
    async fn test_run_updates_and_skips() {
        let sink = Arc::new(Recording::default());
        let report = auditor(ok(), sink.clone())
            .run(vec![record(1, Some("https://a.example")), record(2, None)])
            .await;

        assert!(report.is_success());
        assert_eq!((report.checked, report.skipped), (1, 1));
        assert_eq!(*sink.0.lock().unwrap(), vec![(1, Vec::<String>::new())]);
    }

    #[tokio::test]
    async fn test_panicking_unit_is_isolated() {
        let sink = Arc::new(Recording::default());
        let report = auditor(ok(), sink.clone())
            .run(vec![
                record(1, Some("https://panic.example")),
                record(2, Some("https://b.example")),
            ])
            .await;

        assert!(!report.is_success());
        assert_eq!(report.failed, 1);
        match &report.outcomes[0] {
            TargetOutcome::Failed { id, url, error } => {
                assert_eq!(*id, 1);
                assert_eq!(url.as_deref(), Some("https://panic.example"));
                assert!(error.contains("checker exploded"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_pool_fails_every_unit() {
        let sink = Arc::new(Recording::default());
        let auditor = auditor(ok(), sink.clone());
        auditor.pool().close();

        let report = auditor.run(vec![record(1, Some("https://a.example"))]).await;
        assert_eq!(report.failed, 1);
        assert!(sink.0.lock().unwrap().is_empty());
    }
}
