//! Re-running failed oracle calls.
//!
//! # Design Decisions
//! - Disabled unless `executor.retries > 0`; a flaky element then gets another chance
//!   before being judged
//! - Delay doubles per attempt and is capped

use std::time::Duration;

use async_trait::async_trait;

use crate::config::ExecutorConfig;
use crate::oracle::types::{ExecutionError, Response};
use crate::oracle::Oracle;

/// How many extra attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ExecutorConfig) -> Self {
        Self {
            retries: config.retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
        }
    }

    /// Wait before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(retry - 1).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Wraps an oracle and retries failed executions.
#[derive(Debug, Clone)]
pub struct Retrying<O> {
    inner: O,
    policy: RetryPolicy,
}

impl<O> Retrying<O> {
    pub fn new(inner: O, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<O: Oracle> Oracle for Retrying<O> {
    async fn execute(&self, command: &str) -> Result<Response, ExecutionError> {
        let mut retry = 0;
        loop {
            match self.inner.execute(command).await {
                Ok(response) => return Ok(response),
                Err(e) if retry < self.policy.retries => {
                    retry += 1;
                    let delay = self.policy.delay_for(retry);
                    tracing::debug!(error = %e, retry, delay_ms = delay.as_millis() as u64, "Retrying curl");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
