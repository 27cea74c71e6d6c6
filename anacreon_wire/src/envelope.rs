//! The server's error envelope.
//!
//! A rejected request does not come back as an HTTP error. The body is a JSON
//! array of exactly four strings instead of the usual array of update objects,
//! e.g. `["AEON2011:hexeError:v1", "Error", "Not enough resources.", ""]`.

use serde_json::Value;
use thiserror::Error;

/// An action rejected by the server, carrying its raw message tuple.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("server rejected the request: {}", .parts.join(" | "))]
pub struct ApiError {
    pub parts: [String; 4],
}

impl ApiError {
    /// The human readable part of the tuple, the third string by convention.
    pub fn message(&self) -> &str {
        &self.parts[2]
    }
}

/// Fails with [`ApiError`] when `payload` is the 4-string error envelope.
pub fn check_error_envelope(payload: &Value) -> Result<(), ApiError> {
    let Value::Array(items) = payload else {
        return Ok(());
    };
    if items.len() != 4 {
        return Ok(());
    }
    let mut parts: [String; 4] = Default::default();
    for (slot, item) in parts.iter_mut().zip(items) {
        match item.as_str() {
            Some(text) => *slot = text.to_string(),
            None => return Ok(()),
        }
    }
    tracing::debug!(
        target: "anacreon::wire",
        detail = %parts[2],
        "envelope.error"
    );
    Err(ApiError { parts })
}
