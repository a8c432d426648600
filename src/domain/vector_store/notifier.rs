//! Administrator alerting

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Debug;

use crate::domain::error::StoreOperation;

/// Alert raised when a vector store operation exhausts its retries
#[derive(Debug, Clone, Serialize)]
pub struct AdminAlert {
    pub operation: String,
    pub backend: String,
    pub attempts: u32,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl AdminAlert {
    pub fn new(
        operation: StoreOperation,
        backend: impl Into<String>,
        attempts: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.to_string(),
            backend: backend.into(),
            attempts,
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }

    /// One-line summary for log sinks and chat webhooks
    pub fn summary(&self) -> String {
        format!(
            "Vector store {} on {} failed after {} attempt(s): {}",
            self.operation, self.backend, self.attempts, self.message
        )
    }
}

/// Delivers alerts to an administrator
///
/// Delivery is best effort: failures are logged by the implementation and
/// never surface to the caller.
#[async_trait]
pub trait AdminNotifier: Send + Sync + Debug {
    async fn notify(&self, alert: &AdminAlert);
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        alerts: Mutex<Vec<AdminAlert>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn alerts(&self) -> Vec<AdminAlert> {
            self.alerts.lock().unwrap().clone()
        }

        pub fn count(&self) -> usize {
            self.alerts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AdminNotifier for RecordingNotifier {
        async fn notify(&self, alert: &AdminAlert) {
            self.alerts.lock().unwrap().push(alert.clone());
        }
    }
}
