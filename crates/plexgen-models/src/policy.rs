use std::fmt;
use std::time::{Duration, Instant};

use plexgen_core::errors::{ErrorInfo, PlexError};
use serde::{Deserialize, Serialize};

/// Termination policy for the rejection-sampling rewires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewirePolicy {
    /// Maximum number of sampled candidates for one rewire before the generation restarts.
    /// `None` retries forever.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: Option<u64>,
    /// Wall-clock limit for one single-layer generation, restarts included.
    #[serde(default)]
    pub deadline_ms: Option<u64>,
    /// Number of fresh reshuffles allowed after a rewire stalls.
    #[serde(default = "default_max_restarts")]
    pub max_restarts: u32,
}

fn default_max_attempts() -> Option<u64> {
    Some(100_000)
}

fn default_max_restarts() -> u32 {
    1_000
}

impl Default for RewirePolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            deadline_ms: None,
            max_restarts: default_max_restarts(),
        }
    }
}

impl RewirePolicy {
    /// Policy that never gives up on a rewire and has no deadline.
    ///
    /// Restarts still happen when a rewire cannot succeed at all because too few nodes
    /// carry stubs.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            deadline_ms: None,
            max_restarts: default_max_restarts(),
        }
    }

    /// Sets the per-rewire attempt limit.
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Sets the wall-clock limit.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(deadline.as_millis().min(u64::MAX as u128) as u64);
        self
    }

    /// Sets the restart limit.
    pub fn with_max_restarts(mut self, max_restarts: u32) -> Self {
        self.max_restarts = max_restarts;
        self
    }
}

/// Which elimination phase a rewire belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    SelfLoop,
    MultiEdge,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::SelfLoop => write!(f, "self-loop"),
            Phase::MultiEdge => write!(f, "multi-edge"),
        }
    }
}

/// Why a rewire gave up without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StallReason {
    /// The attempt limit was reached.
    AttemptBudget,
    /// Fewer distinct nodes or slots exist than the rewire touches.
    Infeasible,
}

impl StallReason {
    pub(crate) fn code(&self) -> &'static str {
        match self {
            StallReason::AttemptBudget => "attempt-budget",
            StallReason::Infeasible => "infeasible-rewire",
        }
    }
}

/// Failure of one generation attempt.
#[derive(Debug)]
pub(crate) enum RewireFailure {
    /// The attempt cannot finish but a fresh reshuffle may.
    Stalled {
        phase: Phase,
        reason: StallReason,
        attempts: u64,
    },
    /// The generation must stop.
    Fatal(PlexError),
}

impl From<PlexError> for RewireFailure {
    fn from(err: PlexError) -> Self {
        RewireFailure::Fatal(err)
    }
}

const DEADLINE_CHECK_INTERVAL: u64 = 256;

/// Attempt accounting shared by every rewire of one generation call.
#[derive(Debug)]
pub(crate) struct AttemptBudget {
    max_attempts: Option<u64>,
    deadline: Option<Instant>,
    total_attempts: u64,
}

impl AttemptBudget {
    pub(crate) fn start(policy: &RewirePolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            deadline: policy
                .deadline_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
            total_attempts: 0,
        }
    }

    pub(crate) fn total_attempts(&self) -> u64 {
        self.total_attempts
    }

    /// Runs `attempt` until it reports success, returning the number of attempts used.
    pub(crate) fn retry<F>(&mut self, phase: Phase, mut attempt: F) -> Result<u64, RewireFailure>
    where
        F: FnMut() -> Result<bool, PlexError>,
    {
        let mut attempts = 0u64;
        loop {
            if self.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(RewireFailure::Stalled {
                    phase,
                    reason: StallReason::AttemptBudget,
                    attempts,
                });
            }
            if attempts % DEADLINE_CHECK_INTERVAL == 0 {
                self.check_deadline(phase)?;
            }
            attempts += 1;
            self.total_attempts += 1;
            if attempt()? {
                return Ok(attempts);
            }
        }
    }

    pub(crate) fn check_deadline(&self, phase: Phase) -> Result<(), PlexError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(PlexError::RewireExhaustion(
                ErrorInfo::new("deadline", "generation deadline elapsed")
                    .with_context("phase", phase)
                    .with_context("attempts", self.total_attempts),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_counts_attempts_until_success() {
        let mut budget = AttemptBudget::start(&RewirePolicy::default());
        let mut calls = 0;
        let used = budget
            .retry(Phase::SelfLoop, || {
                calls += 1;
                Ok(calls == 5)
            })
            .unwrap();
        assert_eq!(used, 5);
        assert_eq!(budget.total_attempts(), 5);
    }

    #[test]
    fn retry_stalls_at_attempt_limit() {
        let policy = RewirePolicy::default().with_max_attempts(3);
        let mut budget = AttemptBudget::start(&policy);
        match budget.retry(Phase::MultiEdge, || Ok(false)) {
            Err(RewireFailure::Stalled {
                phase,
                reason,
                attempts,
            }) => {
                assert_eq!(phase, Phase::MultiEdge);
                assert_eq!(reason, StallReason::AttemptBudget);
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected retry result: {other:?}"),
        }
    }

    #[test]
    fn elapsed_deadline_is_fatal() {
        let policy = RewirePolicy::default().with_deadline(Duration::ZERO);
        let mut budget = AttemptBudget::start(&policy);
        match budget.retry(Phase::SelfLoop, || Ok(false)) {
            Err(RewireFailure::Fatal(err)) => assert_eq!(err.code(), "deadline"),
            other => panic!("unexpected retry result: {other:?}"),
        }
    }

    #[test]
    fn policy_defaults_apply_to_missing_fields() {
        let policy: RewirePolicy = serde_json::from_str(r#"{"deadline_ms": 50}"#).unwrap();
        assert_eq!(policy.max_attempts, Some(100_000));
        assert_eq!(policy.max_restarts, 1_000);
        assert_eq!(policy.deadline_ms, Some(50));
        let unbounded: RewirePolicy =
            serde_json::from_str(r#"{"max_attempts": null, "max_restarts": 0}"#).unwrap();
        assert_eq!(unbounded.max_attempts, None);
    }
}
