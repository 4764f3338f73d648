//! Test utilities for handler testing.
//!
//! This module provides state fixtures and an in-memory log sink so tests can
//! assert on the structured events a request produces.

use std::io;
use std::sync::{Arc, Mutex};

use iseven_lib::NegativePolicy;
use serde_json::Value;
use tracing_subscriber::fmt::MakeWriter;

use crate::middleware::{RequestContext, RequestId};
use crate::state::AppState;

/// State using the default policy (negative numbers rejected).
pub fn test_state() -> AppState {
    AppState::default()
}

/// State that evaluates negative numbers instead of rejecting them.
pub fn accepting_state() -> AppState {
    AppState::with_policy(NegativePolicy::Accept)
}

/// A request context with a recognizable, unique ID.
pub fn test_request_context() -> RequestContext {
    RequestContext::new(RequestId::new(test_request_id()), None)
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", RequestId::generate())
}

/// In-memory JSON log sink.
///
/// Clones share the same buffer, so the value handed to the subscriber and the
/// one kept by the test observe the same events.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a JSON subscriber at TRACE level writing into this sink.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::TRACE)
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(self.clone())
            .finish()
    }

    /// All captured events, one JSON object per line.
    pub fn events(&self) -> Vec<Value> {
        let buffer = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buffer)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    /// Events whose `request_id` field equals `request_id`.
    pub fn events_for(&self, request_id: &str) -> Vec<Value> {
        self.events()
            .into_iter()
            .filter(|event| event_request_id(event) == Some(request_id))
            .collect()
    }

    /// Messages of events matching `request_id`, in emission order.
    pub fn messages_for(&self, request_id: &str) -> Vec<String> {
        self.events_for(request_id)
            .iter()
            .filter_map(event_message)
            .map(str::to_string)
            .collect()
    }
}

/// The `request_id` field of a captured event, if any.
pub fn event_request_id(event: &Value) -> Option<&str> {
    event["fields"]["request_id"].as_str()
}

/// The message of a captured event.
pub fn event_message(event: &Value) -> Option<&str> {
    event["fields"]["message"].as_str()
}

/// Writer handed out by [`CapturedLogs`].
pub struct CapturedWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_unique() {
        let id1 = test_request_id();
        let id2 = test_request_id();
        assert_ne!(id1, id2);
        assert!(id1.starts_with("test-"));
    }

    #[test]
    fn test_captured_logs_records_fields() {
        let logs = CapturedLogs::new();

        tracing::subscriber::with_default(logs.subscriber(), || {
            tracing::info!(request_id = "req-a", "first");
            tracing::debug!(request_id = "req-b", "second");
            tracing::warn!("no id");
        });

        assert_eq!(logs.events().len(), 3);
        assert_eq!(logs.messages_for("req-a"), vec!["first".to_string()]);
        assert_eq!(logs.messages_for("req-b"), vec!["second".to_string()]);
    }

    #[test]
    fn test_states() {
        assert_eq!(test_state().evaluator().policy(), NegativePolicy::Reject);
        assert_eq!(accepting_state().evaluator().policy(), NegativePolicy::Accept);
    }
}
