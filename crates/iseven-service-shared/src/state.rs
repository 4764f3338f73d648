//! Application state for the HTTP service.
//!
//! This module provides the shared state structure that axum handlers use to
//! reach the configured evaluator.

use std::sync::Arc;

use iseven_lib::{Evaluator, NegativePolicy};

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally), read-only after
/// construction, and should be shared via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::any, extract::State};
/// use iseven_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let evaluator = state.evaluator();
///     // ... use evaluator
/// }
///
/// let app = Router::new()
///     .route("/", any(handler))
///     .with_state(AppState::default());
/// ```
#[derive(Clone, Default)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Default)]
struct AppStateInner {
    evaluator: Evaluator,
}

impl AppState {
    /// Create application state around a configured evaluator.
    pub fn new(evaluator: Evaluator) -> Self {
        Self {
            inner: Arc::new(AppStateInner { evaluator }),
        }
    }

    /// Create application state for the given negative-number policy.
    pub fn with_policy(policy: NegativePolicy) -> Self {
        Self::new(Evaluator::new(policy))
    }

    /// Access the evaluator.
    pub fn evaluator(&self) -> &Evaluator {
        &self.inner.evaluator
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("negative_policy", &self.inner.evaluator.policy())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_default_rejects_negatives() {
        let state = AppState::default();
        assert_eq!(state.evaluator().policy(), NegativePolicy::Reject);
    }

    #[test]
    fn test_app_state_clone_shares_inner() {
        let state1 = AppState::with_policy(NegativePolicy::Accept);
        let state2 = state1.clone();

        assert!(Arc::ptr_eq(&state1.inner, &state2.inner));
        assert_eq!(state2.evaluator().policy(), NegativePolicy::Accept);
    }

    #[test]
    fn test_app_state_debug() {
        let state = AppState::with_policy(NegativePolicy::Accept);
        let debug = format!("{:?}", state);

        assert!(debug.contains("AppState"));
        assert!(debug.contains("Accept"));
    }
}
