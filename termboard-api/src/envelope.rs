//! Success/failure envelope bodies.
//!
//! Mutations return the created or updated object directly on success.
//! Failures carry `{"success": false}` with an optional human-readable
//! message; deletes acknowledge with `{"success": true}`.

use serde::{Deserialize, Serialize};

/// Acknowledgment body for operations with no meaningful return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Always `true` on the success path.
    pub success: bool,
}

impl Ack {
    /// The canonical success acknowledgment.
    pub const OK: Self = Self { success: true };
}

/// Failure body attached to non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Always `false`.
    pub success: bool,
    /// Optional human-readable reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Failure {
    /// Creates a failure body with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
