//! Recordings: immutable-after-ingest captures with their input-event
//! metadata.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use camwright_platform_core::CaptureArea;

use crate::{ClickEvent, Effect, KeyboardEvent, MouseEvent};

pub type RecordingId = String;

/// An ingested capture, immutable once created. Events are ordered,
/// read-only snapshots; nothing in the compositor mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub id: RecordingId,

    /// Source dimensions in pixels.
    pub width: u32,
    pub height: u32,

    /// Total duration in source ms.
    pub duration_ms: f64,

    /// Capture area declared at recording time, used for source-dimension
    /// resolution when individual mouse samples omit capture dims.
    #[serde(default)]
    pub capture_area: Option<CaptureArea>,

    /// Ordered by timestamp.
    #[serde(default)]
    pub mouse_events: Vec<MouseEvent>,
    #[serde(default)]
    pub click_events: Vec<ClickEvent>,
    #[serde(default)]
    pub keyboard_events: Vec<KeyboardEvent>,

    /// Recording-scoped effects, expressed in source ms.
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl Recording {
    pub fn new(id: impl Into<RecordingId>, width: u32, height: u32, duration_ms: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            duration_ms,
            capture_area: None,
            mouse_events: Vec::new(),
            click_events: Vec::new(),
            keyboard_events: Vec::new(),
            effects: Vec::new(),
        }
    }
}

/// A mapping `RecordingId -> Recording` with unique ids.
pub type RecordingSet = HashMap<RecordingId, Recording>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_recording_has_empty_event_streams() {
        let recording = Recording::new("r1", 1920, 1080, 60_000.0);
        assert!(recording.mouse_events.is_empty());
        assert!(recording.effects.is_empty());
        assert_eq!(recording.width, 1920);
    }
}
