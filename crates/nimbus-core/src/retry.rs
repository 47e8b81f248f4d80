//! Bounded retry with exponential backoff for provider calls.
//!
//! Only [`Error::is_retryable`] failures are retried. Validation failures
//! and storage errors are returned immediately.

use std::{future::Future, time::Duration};

use crate::{Error, Result};

pub const DEFAULT_MAX_RETRIES: u32 = 1;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Additional attempts after the first.
  pub max_retries:   u32,
  /// Delay before the first retry; doubles on each subsequent one.
  pub initial_delay: Duration,
  pub max_delay:     Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_retries:   DEFAULT_MAX_RETRIES,
      initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
      max_delay:     Duration::from_millis(DEFAULT_MAX_DELAY_MS),
    }
  }
}

impl RetryPolicy {
  /// A single attempt, no retries.
  pub const fn none() -> Self {
    Self {
      max_retries:   0,
      initial_delay: Duration::ZERO,
      max_delay:     Duration::ZERO,
    }
  }

  pub fn with_max_retries(mut self, max_retries: u32) -> Self {
    self.max_retries = max_retries;
    self
  }

  /// Backoff before retry number `attempt` (zero-based).
  pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    self.initial_delay.saturating_mul(factor).min(self.max_delay)
  }

  /// Run `op` until it succeeds, fails permanently, or retries run out.
  pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
  {
    let mut attempt = 0;
    loop {
      match op().await {
        Ok(value) => return Ok(value),
        Err(e) if e.is_retryable() && attempt < self.max_retries => {
          let delay = self.delay_for_attempt(attempt);
          tracing::warn!(what, attempt, ?delay, error = %e, "provider call failed; retrying");
          tokio::time::sleep(delay).await;
          attempt += 1;
        }
        Err(e) => return Err(log_permanent(what, e)),
      }
    }
  }
}

fn log_permanent(what: &str, e: Error) -> Error {
  tracing::debug!(what, error = %e, "provider call failed");
  e
}
