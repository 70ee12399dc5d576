//! Best-effort completion notifications.
//!
//! Dispatched once per finished job. A failed notification is logged and
//! otherwise ignored; it never changes job state or blocks the runner.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::warn;

use crate::bulk::models::BulkImportJob;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn job_finished(&self, job: &BulkImportJob) -> anyhow::Result<()>;
}

/// POSTs a small JSON summary to a configured webhook.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    // Mail-like side call: keep the timeout short.
    const TIMEOUT_SECS: u64 = 5;

    pub fn new(url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(Self::TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            url,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn job_finished(&self, job: &BulkImportJob) -> anyhow::Result<()> {
        let body = json!({
            "jobId": job.id,
            "status": job.status,
            "totalPosts": job.total_posts,
            "successfulPosts": job.successful_posts,
            "failedPosts": job.failed_posts,
        });
        let response = self.client.post(&self.url).json(&body).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("Webhook returned {}", response.status());
        }
        Ok(())
    }
}

/// Used when no webhook is configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn job_finished(&self, _job: &BulkImportJob) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Fires the notifier and logs any failure. The caller may always ignore the
/// outcome.
pub async fn notify_best_effort(notifier: &dyn Notifier, job: &BulkImportJob) {
    if let Err(e) = notifier.job_finished(job).await {
        warn!("Completion notification for job {} failed: {e}", job.id);
    }
}
