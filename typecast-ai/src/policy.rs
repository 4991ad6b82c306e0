//! Retry policy for coercion failures.
//!
//! The coercer never retries; whether a malformed or contract-violating
//! reply is retried by re-issuing the same rendered request is decided
//! here, at the facade level. Transport errors are never retried by the
//! facade at all.

use typecast_ai_output::error::CoerceError;

/// Policy for deciding whether a coercion failure should be retried.
pub trait RetryPolicy: Send + Sync {
    /// Whether to re-issue the request after `error` on attempt `attempt`
    /// (zero-based).
    fn should_retry(&self, error: &CoerceError, attempt: u32) -> bool;
}

/// Retries every coercion failure while the budget allows.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetPolicy {
    /// Maximum number of retries after the first attempt.
    pub budget: u32,
}

impl BudgetPolicy {
    /// Create a policy with the given retry budget.
    #[must_use]
    pub fn new(budget: u32) -> Self {
        Self { budget }
    }
}

impl RetryPolicy for BudgetPolicy {
    fn should_retry(&self, _error: &CoerceError, attempt: u32) -> bool {
        attempt < self.budget
    }
}

/// Never retries. Useful for hermetic tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverRetry;

impl RetryPolicy for NeverRetry {
    fn should_retry(&self, _error: &CoerceError, _attempt: u32) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typecast_ai_output::error::MalformedResponseError;

    fn malformed() -> CoerceError {
        CoerceError::Malformed(MalformedResponseError::NoJsonFound)
    }

    #[test]
    fn test_budget_policy() {
        let policy = BudgetPolicy::new(2);
        assert!(policy.should_retry(&malformed(), 0));
        assert!(policy.should_retry(&malformed(), 1));
        assert!(!policy.should_retry(&malformed(), 2));
    }

    #[test]
    fn test_zero_budget_never_retries() {
        let policy = BudgetPolicy::new(0);
        assert!(!policy.should_retry(&malformed(), 0));
    }

    #[test]
    fn test_never_retry() {
        assert!(!NeverRetry.should_retry(&malformed(), 0));
    }
}
