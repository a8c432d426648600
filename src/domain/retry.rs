//! Retry policy shared by the embedding generator and the vector store gateway

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Linear backoff retry policy
///
/// The delay before attempt `n + 1` is `backoff_ms * n`, so with the defaults
/// the waits are 0.5s and then 1.0s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total number of attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay multiplied by the number of the attempt that just failed
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    500
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn with_backoff_ms(mut self, ms: u64) -> Self {
        self.backoff_ms = ms;
        self
    }

    /// Number of attempts, never less than one
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after the given failed attempt (1-indexed)
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_ms.saturating_mul(u64::from(attempt)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let config = RetryConfig::default();
        assert_eq!(config.attempts(), 3);
        assert_eq!(config.delay_after_attempt(1), Duration::from_millis(500));
        assert_eq!(config.delay_after_attempt(2), Duration::from_millis(1000));
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let config = RetryConfig::new(0);
        assert_eq!(config.attempts(), 1);
    }

    #[test]
    fn test_custom_backoff() {
        let config = RetryConfig::new(5).with_backoff_ms(10);
        assert_eq!(config.delay_after_attempt(4), Duration::from_millis(40));
    }
}
