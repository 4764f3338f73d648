//! Service configuration read from the environment.
//!
//! - `PORT`: TCP port to bind on all interfaces (default: 8080, also when empty)
//! - `NEGATIVE_NUMBERS`: `reject` (default) or `accept`

use iseven_lib::NegativePolicy;
use tracing::warn;

/// Port used when `PORT` is unset or empty.
pub const DEFAULT_PORT: &str = "8080";

/// Runtime configuration for the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Port to listen on. Kept as text; an unusable value surfaces as a bind error.
    pub port: String,
    /// How the evaluator treats negative numbers.
    pub negative_policy: NegativePolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            negative_policy: NegativePolicy::default(),
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    ///
    /// Unknown `NEGATIVE_NUMBERS` values fall back to `reject` with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PORT.to_string());

        let negative_policy = match lookup("NEGATIVE_NUMBERS").filter(|v| !v.trim().is_empty()) {
            None => NegativePolicy::default(),
            Some(raw) => NegativePolicy::parse(&raw).unwrap_or_else(|| {
                warn!(
                    value = %raw,
                    fallback = %NegativePolicy::default(),
                    "unknown NEGATIVE_NUMBERS value"
                );
                NegativePolicy::default()
            }),
        };

        Self {
            port,
            negative_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vars: &'static [(&'static str, &'static str)]) -> ServiceConfig {
        ServiceConfig::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(config(&[]), ServiceConfig::default());
        assert_eq!(config(&[]).port, "8080");
    }

    #[test]
    fn test_empty_port_uses_default() {
        assert_eq!(config(&[("PORT", "")]).port, "8080");
        assert_eq!(config(&[("PORT", "  ")]).port, "8080");
    }

    #[test]
    fn test_port_override() {
        assert_eq!(config(&[("PORT", "9090")]).port, "9090");
    }

    #[test]
    fn test_negative_policy() {
        assert_eq!(
            config(&[("NEGATIVE_NUMBERS", "accept")]).negative_policy,
            NegativePolicy::Accept
        );
        assert_eq!(
            config(&[("NEGATIVE_NUMBERS", "Reject")]).negative_policy,
            NegativePolicy::Reject
        );
    }

    #[test]
    fn test_unknown_negative_policy_falls_back() {
        assert_eq!(
            config(&[("NEGATIVE_NUMBERS", "maybe")]).negative_policy,
            NegativePolicy::Reject
        );
    }
}
