//! Logging configuration.
//!
//! The compositor is a library with no owned configuration surface of its
//! own (no CLI, no persisted state — see spec.md §6). What remains is the
//! logging knobs a host binary wires up before calling into
//! `camwright-processing-core`.

use serde::{Deserialize, Serialize};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "camwright=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
