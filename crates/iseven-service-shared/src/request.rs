//! Request types and decoding for HTTP endpoints.

use serde::{de::Error as _, Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /`.
///
/// `number` is required. Extra fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberRequest {
    /// Integer to test for evenness.
    pub number: i64,
}

impl NumberRequest {
    /// Decode a request body.
    ///
    /// The `Content-Type` header is not consulted. The body must be a JSON
    /// object; the derived deserializer would also take the array form `[4]`.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice(body)? {
            value @ Value::Object(_) => serde_json::from_value(value),
            _ => Err(serde_json::Error::custom("request body must be a JSON object")),
        }
    }
}
