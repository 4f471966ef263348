// Error types for the state runtime

use serde_json::Value;
use thiserror::Error;

/// Result type alias for state runtime operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur while reducing events into state
#[derive(Debug, Error)]
pub enum StateError {
    /// A STATE_DELTA op is structurally malformed for its kind
    #[error("Invalid patch op: {0}")]
    InvalidPatchOp(String),

    /// A `test` op precondition did not hold against the current state
    #[error("Patch test failed at {path}: expected {expected}, found {actual}")]
    PatchTestFailed {
        path: String,
        expected: Value,
        actual: Value,
    },

    /// Event input was not parseable JSON
    #[error("Invalid event JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Internal error, used by custom sink implementations
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StateError {
    /// Create an invalid patch op error
    pub fn invalid_op(msg: impl Into<String>) -> Self {
        StateError::InvalidPatchOp(msg.into())
    }

    /// Create a patch test failure, recording both sides of the comparison
    pub fn test_failed(path: impl Into<String>, expected: Value, actual: Value) -> Self {
        StateError::PatchTestFailed {
            path: path.into(),
            expected,
            actual,
        }
    }
}
