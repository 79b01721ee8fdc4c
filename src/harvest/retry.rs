use crate::api::error::{ApiError, ErrorClass};
use log::debug;
use std::thread;
use std::time::Duration;

const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(30);

/// How often a transiently failing request is attempted.
///
/// Only [`ErrorClass::Transient`] failures are retried. The default makes a
/// single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first. `0` behaves like `1`.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

pub(crate) fn backoff(current: Duration, max: Duration) -> Duration {
    let next = Duration::from_secs_f64((current.as_secs_f64() * 1.5).max(1.0));
    if next > max {
        max
    } else {
        next
    }
}

impl RetryPolicy {
    pub fn attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Calls `request` until it succeeds, fails permanently, or the attempts run out.
    /// `request` receives the 1-based attempt number.
    pub fn run<T>(
        &self,
        mut request: impl FnMut(u32) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let max_attempts = self.max_attempts.max(1);
        let mut delay = self.initial_backoff.min(self.max_backoff);
        let mut attempt = 1;
        loop {
            match request(attempt) {
                Err(e) if e.class() == ErrorClass::Transient && attempt < max_attempts => {
                    debug!(
                        "Attempt {}/{} failed ({}), retrying in {:?}",
                        attempt, max_attempts, e, delay
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    delay = backoff(delay, self.max_backoff);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoint::Endpoint;
    use crate::api::mock::status;

    fn instant(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::attempts(max_attempts).with_backoff(Duration::ZERO, Duration::ZERO)
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let max = Duration::from_secs(5);
        assert_eq!(backoff(Duration::ZERO, max), Duration::from_secs(1));
        assert_eq!(backoff(Duration::from_secs(2), max), Duration::from_secs(3));
        assert_eq!(backoff(Duration::from_secs(4), max), max);
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let mut calls = 0;
        let result = instant(3).run(|attempt| {
            calls += 1;
            if attempt < 3 {
                Err(status(&Endpoint::Stations, 503))
            } else {
                Ok(attempt)
            }
        });
        assert_eq!(result.ok(), Some(3));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_attempts_are_bounded() {
        let mut calls = 0;
        let result: Result<(), _> = instant(2).run(|_| {
            calls += 1;
            Err(status(&Endpoint::Stations, 500))
        });
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_permanent_failures_are_not_retried() {
        for code in [404, 401, 400] {
            let mut calls = 0;
            let result: Result<(), _> = instant(5).run(|_| {
                calls += 1;
                Err(status(&Endpoint::Stations, code))
            });
            assert!(result.is_err());
            assert_eq!(calls, 1, "status {code} must not be retried");
        }
    }

    #[test]
    fn test_default_policy_makes_one_attempt() {
        let mut calls = 0;
        let _: Result<(), _> = RetryPolicy::default().run(|_| {
            calls += 1;
            Err(status(&Endpoint::Stations, 503))
        });
        assert_eq!(calls, 1);
    }
}
