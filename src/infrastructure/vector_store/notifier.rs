//! Admin notifier implementations

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, warn};

use crate::domain::vector_store::{AdminAlert, AdminNotifier};
use crate::infrastructure::http_client::HttpClientTrait;

/// Writes alerts to the log at error level
#[derive(Debug, Clone, Default)]
pub struct LogAdminNotifier;

impl LogAdminNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AdminNotifier for LogAdminNotifier {
    async fn notify(&self, alert: &AdminAlert) {
        error!(
            operation = %alert.operation,
            backend = %alert.backend,
            attempts = alert.attempts,
            "[ALERT] {}",
            alert.summary()
        );
    }
}

/// Posts alerts as JSON to a chat or incident webhook
///
/// The payload carries a `text` summary, which Slack-style incoming webhooks
/// render directly, plus the structured alert.
#[derive(Debug)]
pub struct WebhookAdminNotifier<C: HttpClientTrait> {
    client: C,
    url: String,
    timeout: Duration,
}

impl<C: HttpClientTrait> WebhookAdminNotifier<C> {
    pub fn new(client: C, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl<C: HttpClientTrait> AdminNotifier for WebhookAdminNotifier<C> {
    async fn notify(&self, alert: &AdminAlert) {
        // The log line is kept even when the webhook succeeds
        LogAdminNotifier.notify(alert).await;

        let body = json!({ "text": alert.summary(), "alert": alert });
        let headers = vec![("Content-Type", "application/json")];

        match tokio::time::timeout(self.timeout, self.client.post_json(&self.url, headers, &body)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(error = %e, "Failed to deliver admin alert"),
            Err(_) => warn!(timeout = ?self.timeout, "Admin alert webhook timed out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoreOperation;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const HOOK: &str = "https://hooks.example.com/alerts";

    #[tokio::test]
    async fn test_webhook_payload() {
        let client = MockHttpClient::new().with_response(HOOK, json!({ "ok": true }));
        let notifier = WebhookAdminNotifier::new(client, HOOK);
        let alert = AdminAlert::new(StoreOperation::Search, "milvus", 3, "timeout");

        notifier.notify(&alert).await;

        let bodies = notifier.client.requests_to(HOOK);
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["alert"]["operation"], "search");
        assert_eq!(bodies[0]["alert"]["attempts"], 3);
        assert!(bodies[0]["text"].as_str().unwrap().contains("timeout"));
    }

    #[tokio::test]
    async fn test_webhook_failure_is_swallowed() {
        let client = MockHttpClient::new().with_error(HOOK, "connection refused");
        let notifier = WebhookAdminNotifier::new(client, HOOK);
        let alert = AdminAlert::new(StoreOperation::Insert, "milvus", 3, "down");

        notifier.notify(&alert).await;

        assert_eq!(notifier.client.requests_to(HOOK).len(), 1);
    }
}
