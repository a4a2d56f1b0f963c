//! Backoff and identity reset decisions
//!
//! The target blocks scrapers intermittently. Being blocked always calls for a
//! fresh network identity; ordinary network flakiness only does once it has
//! repeated more than `escalation-threshold` times in a row.

use crate::config::RecoveryConfig;
use std::time::Duration;

/// Category of a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The target refused service
    Blocked,
    /// Timeout, connection failure, or unexpected status
    Network,
    /// The page arrived but lacked the expected content
    Incomplete,
}

/// What to do before the next attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryAction {
    pub wait: Duration,
    pub reset_circuit: bool,
}

/// Wait durations and escalation threshold
#[derive(Debug, Clone)]
pub struct RecoveryPolicy {
    pub block_wait: Duration,
    pub network_wait: Duration,
    pub network_max_wait: Duration,
    pub escalation_threshold: u32,
    pub escalated_wait: Duration,
}

impl RecoveryPolicy {
    pub fn from_config(config: &RecoveryConfig) -> Self {
        Self {
            block_wait: Duration::from_secs(config.block_wait_secs),
            network_wait: Duration::from_secs(config.network_wait_secs),
            network_max_wait: Duration::from_secs(config.network_max_wait_secs),
            escalation_threshold: config.escalation_threshold,
            escalated_wait: Duration::from_secs(config.escalated_wait_secs),
        }
    }

    /// Decides the action for the `consecutive`-th failure in a row (1-based)
    ///
    /// Non-blocked failures back off exponentially from `network_wait`, capped
    /// at `network_max_wait`, until the threshold is exceeded.
    pub fn action_for(&self, kind: FailureKind, consecutive: u32) -> RecoveryAction {
        match kind {
            FailureKind::Blocked => RecoveryAction {
                wait: self.block_wait,
                reset_circuit: true,
            },
            FailureKind::Network | FailureKind::Incomplete => {
                if consecutive > self.escalation_threshold {
                    RecoveryAction {
                        wait: self.escalated_wait,
                        reset_circuit: true,
                    }
                } else {
                    let exponent = consecutive.saturating_sub(1).min(16);
                    let wait = self
                        .network_wait
                        .saturating_mul(1 << exponent)
                        .min(self.network_max_wait);
                    RecoveryAction {
                        wait,
                        reset_circuit: false,
                    }
                }
            }
        }
    }
}

/// Tracks consecutive failures and turns them into recovery actions
#[derive(Debug, Clone)]
pub struct RecoveryController {
    policy: RecoveryPolicy,
    consecutive_failures: u32,
}

impl RecoveryController {
    pub fn new(policy: RecoveryPolicy) -> Self {
        Self {
            policy,
            consecutive_failures: 0,
        }
    }

    /// Records a failed attempt and returns what to do about it
    ///
    /// Any identity reset clears the failure streak, since the next attempt
    /// goes out under a new identity.
    pub fn on_failure(&mut self, kind: FailureKind) -> RecoveryAction {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        let action = self.policy.action_for(kind, self.consecutive_failures);
        if action.reset_circuit {
            self.consecutive_failures = 0;
        }
        action
    }

    /// Records a successful fetch
    pub fn on_success(&mut self) {
        self.consecutive_failures = 0;
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RecoveryPolicy {
        RecoveryPolicy {
            block_wait: Duration::from_secs(30),
            network_wait: Duration::from_secs(5),
            network_max_wait: Duration::from_secs(15),
            escalation_threshold: 3,
            escalated_wait: Duration::from_secs(45),
        }
    }

    #[test]
    fn test_blocked_always_resets() {
        let mut controller = RecoveryController::new(policy());
        for _ in 0..5 {
            let action = controller.on_failure(FailureKind::Blocked);
            assert!(action.reset_circuit);
            assert_eq!(action.wait, Duration::from_secs(30));
        }
    }

    #[test]
    fn test_network_errors_back_off_then_escalate() {
        let mut controller = RecoveryController::new(policy());

        let waits: Vec<_> = (0..3)
            .map(|_| controller.on_failure(FailureKind::Network))
            .collect();
        assert!(waits.iter().all(|a| !a.reset_circuit));
        assert_eq!(waits[0].wait, Duration::from_secs(5));
        assert_eq!(waits[1].wait, Duration::from_secs(10));
        assert_eq!(waits[2].wait, Duration::from_secs(15));

        let escalated = controller.on_failure(FailureKind::Network);
        assert!(escalated.reset_circuit);
        assert_eq!(escalated.wait, Duration::from_secs(45));
        assert_eq!(controller.consecutive_failures(), 0);

        // Fresh identity starts a fresh streak
        let next = controller.on_failure(FailureKind::Network);
        assert!(!next.reset_circuit);
        assert_eq!(next.wait, Duration::from_secs(5));
    }

    #[test]
    fn test_success_clears_streak() {
        let mut controller = RecoveryController::new(policy());
        controller.on_failure(FailureKind::Network);
        controller.on_failure(FailureKind::Incomplete);
        assert_eq!(controller.consecutive_failures(), 2);

        controller.on_success();
        assert_eq!(controller.consecutive_failures(), 0);
        assert_eq!(
            controller.on_failure(FailureKind::Network).wait,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_zero_threshold_escalates_immediately() {
        let mut policy = policy();
        policy.escalation_threshold = 0;
        let action = policy.action_for(FailureKind::Network, 1);
        assert!(action.reset_circuit);
    }

    #[test]
    fn test_large_streak_does_not_overflow() {
        let mut policy = policy();
        policy.escalation_threshold = u32::MAX;
        let action = policy.action_for(FailureKind::Network, 1_000);
        assert_eq!(action.wait, Duration::from_secs(15));
    }
}
