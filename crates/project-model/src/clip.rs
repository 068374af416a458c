//! Clip placements: a reference into a [`Recording`](crate::Recording)
//! positioned on the timeline.

use serde::{Deserialize, Serialize};

use crate::RecordingId;

pub type ClipId = String;

/// A clip places a window of a recording's source time onto the timeline.
///
/// Clips do not overlap on the timeline and are totally ordered by
/// `start_time`; removal from the EDL happens one layer up, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,
    pub recording_id: RecordingId,

    /// Placement on the timeline, in timeline ms.
    pub start_time: f64,
    /// Duration on the timeline, in timeline ms.
    pub duration: f64,

    /// Start of the referenced window in source ms.
    pub source_in: f64,
    /// End of the referenced window in source ms. When omitted, derived as
    /// `source_in + duration * playback_rate`.
    #[serde(default)]
    pub source_out: Option<f64>,

    /// Playback speed multiplier, must be `> 0`.
    #[serde(default = "default_playback_rate")]
    pub playback_rate: f64,
}

fn default_playback_rate() -> f64 {
    1.0
}

impl Clip {
    pub fn new(
        id: impl Into<ClipId>,
        recording_id: impl Into<RecordingId>,
        start_time: f64,
        duration: f64,
        source_in: f64,
    ) -> Self {
        Self {
            id: id.into(),
            recording_id: recording_id.into(),
            start_time,
            duration,
            source_in,
            source_out: None,
            playback_rate: 1.0,
        }
    }

    /// Resolved end of the clip on the timeline, in timeline ms.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Resolved `source_out`, defaulting to `source_in + duration * playback_rate`.
    pub fn resolved_source_out(&self) -> f64 {
        self.source_out
            .unwrap_or(self.source_in + self.duration * self.playback_rate)
    }
}
