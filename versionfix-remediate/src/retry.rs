use crate::error::RepoError;
use std::cell::RefCell;
use std::time::Duration;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

pub trait BackoffPolicy {
    /// Delay before retry number `retry` (1-based).
    fn delay_for_retry(&self, retry: u32) -> Duration;
}

impl BackoffPolicy for RetryPolicy {
    fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 1u32
            .checked_shl(retry.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor)
    }
}

/// Blocking wait between attempts.
pub trait Sleeper {
    fn sleep(&self, delay: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Records delays instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, delay: Duration) {
        self.delays.borrow_mut().push(delay);
    }
}

/// Result of a retried operation and how many times it was invoked.
#[derive(Debug)]
pub struct Attempted<T> {
    pub result: Result<T, RepoError>,
    pub attempts: u32,
}

/// Run `op`, retrying retryable failures with doubling delays.
///
/// Non-retryable failures return immediately. When the budget is spent the last error is
/// returned.
pub fn with_retry<T>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut op: impl FnMut() -> Result<T, RepoError>,
) -> Attempted<T> {
    let mut attempts = 0u32;
    let mut retries = 0u32;
    loop {
        attempts += 1;
        match op() {
            Ok(value) => {
                return Attempted {
                    result: Ok(value),
                    attempts,
                };
            }
            Err(err) if err.is_retryable() && retries < policy.max_retries => {
                retries += 1;
                let delay = policy.delay_for_retry(retries);
                warn!(
                    error = %err,
                    attempt = attempts,
                    delay_ms = delay.as_millis() as u64,
                    "retryable failure; backing off"
                );
                sleeper.sleep(delay);
            }
            Err(err) => {
                return Attempted {
                    result: Err(err),
                    attempts,
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn unavailable() -> RepoError {
        RepoError::Http {
            status: 503,
            message: "unavailable".into(),
        }
    }

    #[test]
    fn two_503s_then_success() {
        let d = Duration::from_millis(250);
        let policy = RetryPolicy {
            max_retries: 3,
            initial_delay: d,
        };
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0);

        let out = with_retry(&policy, &sleeper, || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(unavailable())
            } else {
                Ok("done")
            }
        });

        assert_eq!(out.result, Ok("done"));
        assert_eq!(out.attempts, 3);
        assert_eq!(calls.get(), 3);
        assert_eq!(sleeper.delays(), vec![d, d * 2]);
    }

    #[test]
    fn exhausted_budget_returns_last_error() {
        let policy = RetryPolicy {
            max_retries: 2,
            initial_delay: Duration::from_millis(10),
        };
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0);

        let out: Attempted<()> = with_retry(&policy, &sleeper, || {
            calls.set(calls.get() + 1);
            Err(RepoError::Http {
                status: 500,
                message: format!("attempt {}", calls.get()),
            })
        });

        assert_eq!(out.attempts, 3);
        assert_eq!(
            out.result,
            Err(RepoError::Http {
                status: 500,
                message: "attempt 3".into()
            })
        );
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
    }

    #[test]
    fn non_retryable_fails_immediately() {
        let sleeper = RecordingSleeper::default();
        let out: Attempted<()> = with_retry(&RetryPolicy::default(), &sleeper, || {
            Err(RepoError::Http {
                status: 404,
                message: "not found".into(),
            })
        });
        assert_eq!(out.attempts, 1);
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn no_retry_policy_runs_once() {
        let sleeper = RecordingSleeper::default();
        let out: Attempted<()> = with_retry(&RetryPolicy::no_retry(), &sleeper, || {
            Err(RepoError::Timeout)
        });
        assert_eq!(out.attempts, 1);
        assert_eq!(out.result, Err(RepoError::Timeout));
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_retry(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_retry(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for_retry(3), Duration::from_secs(4));
    }
}
