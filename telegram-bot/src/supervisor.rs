//! Restarts the polling loop after errors and panics, with bounded exponential backoff.

use anyhow::{bail, Result};
use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// How the supervisor reacts to failures of the supervised task.
#[derive(Debug, Clone, PartialEq)]
pub struct RestartPolicy {
    /// Delay before the first restart.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Factor applied per consecutive failure inside `window`.
    pub multiplier: u32,
    /// More failures than this inside `window` stop the supervisor.
    pub max_restarts: usize,
    pub window: Duration,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(5 * 60),
            multiplier: 2,
            max_restarts: 10,
            window: Duration::from_secs(10 * 60),
        }
    }
}

impl RestartPolicy {
    /// Delay before restart number `attempt` (1-based): `initial * multiplier^(attempt-1)`, capped.
    pub fn next_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = self.multiplier.max(1).checked_pow(exponent).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Runs `make_task()` in its own tokio task until it returns `Ok`.
///
/// Errors and panics are logged and the task is rebuilt after [`RestartPolicy::next_delay`].
/// Returns `Err` once more than `max_restarts` failures fall inside `window`.
///
/// Only failures of the task itself count. For [`crate::run_repl`] that means a panic in the REPL
/// task: teloxide retries polling errors internally, handler errors are logged per message by
/// [`crate::process_message`], and Ctrl-C is a clean `Ok(())` that ends supervision.
pub async fn supervise<F, Fut>(policy: &RestartPolicy, mut make_task: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let mut failures: VecDeque<Instant> = VecDeque::new();

    loop {
        let outcome = tokio::spawn(make_task()).await;
        let reason = match outcome {
            Ok(Ok(())) => {
                info!("Supervised task finished");
                return Ok(());
            }
            Ok(Err(e)) => format!("{:#}", e),
            Err(join_err) if join_err.is_panic() => format!("panic: {}", join_err),
            Err(join_err) => format!("task aborted: {}", join_err),
        };

        let now = Instant::now();
        failures.push_back(now);
        while failures
            .front()
            .is_some_and(|t| now.duration_since(*t) > policy.window)
        {
            failures.pop_front();
        }

        if failures.len() > policy.max_restarts {
            error!(
                reason = %reason,
                failures = failures.len(),
                window_secs = policy.window.as_secs(),
                "Too many failures, giving up"
            );
            bail!(
                "supervised task failed {} times within {:?}; last error: {}",
                failures.len(),
                policy.window,
                reason
            );
        }

        let delay = policy.next_delay(failures.len() as u32);
        warn!(
            reason = %reason,
            attempt = failures.len(),
            delay_ms = delay.as_millis() as u64,
            "Supervised task failed, restarting"
        );
        tokio::time::sleep(delay).await;
    }
}
