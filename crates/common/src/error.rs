//! Error types shared across Camwright crates.

/// Top-level error type for Camwright operations.
///
/// Per the compositor's error-handling design, most failure modes (missing
/// mouse data, degenerate geometry, seeks) are soft defaults handled inline
/// and never reach this type. `CompositorError` exists for the one class of
/// genuine programmer error the spec calls out: invariant violations
/// detected while building the frame layout (negative durations, overlapping
/// clips, `sourceIn > sourceOut`).
#[derive(Debug, thiserror::Error)]
pub enum CompositorError {
    #[error("invariant violation: {message}")]
    InvariantViolation { message: String },

    #[error("processing error: {message}")]
    Processing { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using `CompositorError`.
pub type CompositorResult<T> = Result<T, CompositorError>;

impl CompositorError {
    pub fn invariant_violation(msg: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: msg.into(),
        }
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing {
            message: msg.into(),
        }
    }
}
