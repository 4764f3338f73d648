//! Response bodies for successful HTTP responses.

use serde::{Deserialize, Serialize};

/// Body of a successful `POST /`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvenResponse {
    pub is_even: bool,
}

/// Body of a successful `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status indicator, always "ok".
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
