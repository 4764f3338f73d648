//! Parity predicate and the policy governing negative inputs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// How the evaluator treats numbers below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NegativePolicy {
    /// Fail with [`Error::InvalidArgument`] for any `number < 0` (default).
    #[default]
    Reject,
    /// Evaluate every integer, negative ones included.
    Accept,
}

impl NegativePolicy {
    /// Parse a policy name, case-insensitively.
    ///
    /// Accepts "reject" or "accept". Returns `None` for anything else so the
    /// caller can decide how loudly to fall back.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Some(NegativePolicy::Reject),
            "accept" => Some(NegativePolicy::Accept),
            _ => None,
        }
    }

    /// Lowercase name used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            NegativePolicy::Reject => "reject",
            NegativePolicy::Accept => "accept",
        }
    }
}

impl std::fmt::Display for NegativePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parity evaluator configured with a [`NegativePolicy`].
///
/// The evaluator holds no mutable state; it is `Copy` and can be shared
/// freely between concurrent requests.
///
/// # Example
///
/// ```
/// use iseven_lib::{Evaluator, NegativePolicy};
///
/// let evaluator = Evaluator::new(NegativePolicy::Accept);
/// assert_eq!(evaluator.evaluate(Some("req-1"), -4), Ok(true));
/// assert_eq!(evaluator.evaluate(None, 7), Ok(false));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluator {
    policy: NegativePolicy,
}

impl Evaluator {
    pub fn new(policy: NegativePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> NegativePolicy {
        self.policy
    }

    /// Determine whether `number` is divisible by two.
    ///
    /// `request_id` is the correlation identifier of the calling request and
    /// is attached to every event emitted here. A missing id is logged as the
    /// empty string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for negative input when the policy
    /// is [`NegativePolicy::Reject`].
    pub fn evaluate(&self, request_id: Option<&str>, number: i64) -> Result<bool> {
        let request_id = request_id.unwrap_or_default();

        debug!(request_id = %request_id, number, "is_even called");

        if number < 0 && self.policy == NegativePolicy::Reject {
            debug!(
                request_id = %request_id,
                number,
                policy = %self.policy,
                "is_even rejected"
            );
            return Err(Error::InvalidArgument { number });
        }

        let is_even = number % 2 == 0;
        debug!(request_id = %request_id, number, is_even, "is_even result");

        Ok(is_even)
    }
}

/// Evaluate `number` with the default policy (negative input is rejected).
pub fn is_even(request_id: Option<&str>, number: i64) -> Result<bool> {
    Evaluator::default().evaluate(request_id, number)
}
