//! Label sink that only logs what would be written.

use async_trait::async_trait;

use crate::tracker::types::LabelSink;

#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunSink;

#[async_trait]
impl LabelSink for DryRunSink {
    async fn set_labels(&self, id: u64, labels: &[String]) {
        tracing::info!(issue = id, labels = ?labels, "Dry run: labels not written");
    }
}
