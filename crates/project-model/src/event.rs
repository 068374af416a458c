//! Input event types for recording metadata.
//!
//! Unlike a capture-time event stream (append-only, monotonic nanoseconds),
//! events here are already anchored to **source ms** — the recording's own
//! timeline — and pointer coordinates are **source pixels**, not
//! normalized, per spec.md §3: "Mouse events carry `(x, y)` in source
//! pixels and optional `captureWidth/captureHeight` for dimension
//! recovery."

use serde::{Deserialize, Serialize};

/// A timestamp in source milliseconds since the start of a recording.
pub type TimestampMs = f64;

/// A single recorded pointer-movement sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouseEvent {
    /// Source ms since recording start.
    pub t: TimestampMs,
    /// X position in source pixels.
    pub x: f64,
    /// Y position in source pixels.
    pub y: f64,
    /// Capture width in effect at the time of this sample, if known.
    /// Used for physical/logical dimension recovery (spec.md §4.F step 3).
    #[serde(default)]
    pub capture_width: Option<f64>,
    /// Capture height in effect at the time of this sample, if known.
    #[serde(default)]
    pub capture_height: Option<f64>,
}

impl MouseEvent {
    pub fn new(t: TimestampMs, x: f64, y: f64) -> Self {
        Self {
            t,
            x,
            y,
            capture_width: None,
            capture_height: None,
        }
    }

    pub fn with_capture_dims(mut self, width: f64, height: f64) -> Self {
        self.capture_width = Some(width);
        self.capture_height = Some(height);
        self
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A single recorded click (press) event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    /// Source ms since recording start.
    pub t: TimestampMs,
    /// X position in source pixels at click time.
    pub x: f64,
    /// Y position in source pixels at click time.
    pub y: f64,
    /// Which button was pressed.
    pub button: MouseButton,
}

/// Keyboard modifier keys held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Modifiers {
    #[serde(default)]
    pub command: bool,
    #[serde(default)]
    pub control: bool,
    #[serde(default)]
    pub option: bool,
    #[serde(default)]
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        command: false,
        control: false,
        option: false,
        shift: false,
    };

    /// Whether any modifier is held — the hallmark of a shortcut combo
    /// (spec.md §4.H: "any modifier set" triggers an instantaneous block).
    pub fn any(&self) -> bool {
        self.command || self.control || self.option || self.shift
    }
}

/// A single recorded keyboard event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardEvent {
    /// Source ms since recording start.
    pub t: TimestampMs,
    /// Key code, e.g. "KeyA", "Enter", "Backspace", "F5", "NumpadAdd".
    pub key: String,
    /// Modifiers held at the time of the key press.
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyboardEvent {
    pub fn new(t: TimestampMs, key: impl Into<String>) -> Self {
        Self {
            t,
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
