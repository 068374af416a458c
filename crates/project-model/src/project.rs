//! The value-typed project snapshot the compositor consumes.
//!
//! Loading, saving, and validating project files against a filesystem is a
//! project-store collaborator's job (spec.md §6), not this crate's — a
//! `ProjectSnapshot` is handed to the compositor fully formed and contains
//! no paths, no timestamps, and touches no I/O.

use serde::{Deserialize, Serialize};

use crate::{Clip, Effect, Recording, RecordingId, RecordingSet};

/// The `{recordings, clips, effects}` snapshot a project-store collaborator
/// supplies to the compositor for one run (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub recordings: RecordingSet,

    /// The EDL: clips placed on the timeline, totally ordered by `start_time`.
    pub clips: Vec<Clip>,

    /// Timeline-scoped effects, expressed in timeline ms.
    pub timeline_effects: Vec<Effect>,

    /// Output frame rate.
    pub fps: u32,
}

impl ProjectSnapshot {
    pub fn new(fps: u32) -> Self {
        Self {
            recordings: RecordingSet::new(),
            clips: Vec::new(),
            timeline_effects: Vec::new(),
            fps,
        }
    }

    pub fn recording(&self, id: &str) -> Option<&Recording> {
        self.recordings.get(id)
    }

    pub fn with_recording(mut self, recording: Recording) -> Self {
        self.recordings.insert(recording.id.clone(), recording);
        self
    }

    pub fn with_clip(mut self, clip: Clip) -> Self {
        self.clips.push(clip);
        self
    }

    pub fn with_timeline_effect(mut self, effect: Effect) -> Self {
        self.timeline_effects.push(effect);
        self
    }

    /// Recording referenced by a clip, if present in this snapshot.
    pub fn recording_for_clip(&self, clip: &Clip) -> Option<&Recording> {
        self.recordings.get(&clip.recording_id as &RecordingId)
    }
}
