//! Camera precomputer: runs the Camera Engine in physics mode sequentially
//! from frame 0, building an immutable per-frame table that random-access
//! and frame-parallel callers can then index without re-simulating
//! (spec.md §4.G).

use std::collections::HashMap;

use camwright_platform_core::CaptureArea;
use camwright_project_model::{Clip, Effect, EffectId, EffectPayload, MouseEvent, Point2D, RecordingSet};

use crate::camera::{
    compute_camera_state, ActiveZoom, CameraInput, CameraMode, CameraOutput, CameraPhysicsState, Overscan,
};
use crate::frame_layout::{resolve_active_clip, FrameLayoutItem};
use crate::motion_cluster::{detect_clusters, MotionCluster};
use crate::time_space::{source_to_timeline, timeline_for_frame, timeline_to_source};

/// Everything needed to precompute a camera table for one timeline.
pub struct PrecomputeInput<'a> {
    pub total_frames: i64,
    pub fps: u32,
    pub layout: &'a [FrameLayoutItem],
    pub recordings: &'a RecordingSet,
    pub timeline_effects: &'a [Effect],
    pub output_aspect: f64,
    pub overscan: Overscan,
}

/// Build `table[0..total_frames)`. Frames falling in a layout gap (no
/// active clip at all) degrade to a centered, unzoomed camera rather than
/// failing — the frame layout's own nearest-neighbor fallback already
/// covers ordinary gaps between clips, so this only triggers for an empty
/// layout.
pub fn precompute_camera_path(input: PrecomputeInput) -> Vec<CameraOutput> {
    let mut table = Vec::with_capacity(input.total_frames.max(0) as usize);
    let mut physics: Option<CameraPhysicsState> = None;
    let mut cluster_cache: HashMap<&str, Vec<MotionCluster>> = HashMap::new();

    for frame in 0..input.total_frames {
        let timeline_ms = timeline_for_frame(frame, input.fps);

        let clip = match resolve_active_clip(input.layout, frame) {
            Some(clip) => clip,
            None => {
                let state = physics.unwrap_or_else(|| CameraPhysicsState::initial(timeline_ms, timeline_ms));
                let output = CameraOutput {
                    scale: 1.0,
                    center: Point2D::new(0.5, 0.5),
                    physics: state,
                };
                physics = Some(output.physics);
                table.push(output);
                continue;
            }
        };

        let source_ms = timeline_to_source(timeline_ms, clip);
        let recording = input.recordings.get(&clip.recording_id);

        let empty_events: &[MouseEvent] = &[];
        let empty_effects: &[Effect] = &[];
        let (mouse_events, recording_dims, capture_area, recording_effects) = match recording {
            Some(r) => (
                r.mouse_events.as_slice(),
                (r.width, r.height),
                r.capture_area,
                r.effects.as_slice(),
            ),
            None => (empty_events, (0u32, 0u32), None, empty_effects),
        };

        let clusters = cluster_cache
            .entry(clip.recording_id.as_str())
            .or_insert_with(|| detect_clusters(mouse_events, recording_dims.0 as f64, recording_dims.1 as f64));

        let zoom = active_zoom(
            input.timeline_effects,
            recording_effects,
            clip,
            timeline_ms,
            source_ms,
        );

        let output = compute_camera_state(CameraInput {
            timeline_ms,
            source_ms,
            zoom,
            mouse_events,
            clusters: clusters.as_slice(),
            recording_dims,
            capture_area,
            overscan: input.overscan,
            output_aspect: input.output_aspect,
            playback_rate: clip.playback_rate,
            mode: CameraMode::Physics,
            previous: physics,
        });

        physics = Some(output.physics);
        table.push(output);
    }

    table
}

/// Merge timeline-scoped and recording-scoped effects by id (timeline wins,
/// same rule as [`crate::effects::resolve_effects`]) and find the Zoom
/// effect active at the current frame, if any. Recording-scoped windows are
/// expressed in source ms and are converted to timeline ms via the clip so
/// the camera engine's ramp math always works in one time space.
fn active_zoom(
    timeline_effects: &[Effect],
    recording_effects: &[Effect],
    clip: &Clip,
    timeline_ms: f64,
    source_ms: f64,
) -> Option<ActiveZoom> {
    let mut merged: HashMap<&EffectId, (&Effect, bool)> = HashMap::new();
    for effect in recording_effects {
        if effect.enabled {
            merged.insert(&effect.id, (effect, false));
        }
    }
    for effect in timeline_effects {
        if effect.enabled {
            merged.insert(&effect.id, (effect, true));
        }
    }

    merged.into_values().find_map(|(effect, is_timeline_scoped)| {
        let block = match &effect.payload {
            EffectPayload::Zoom(block) => *block,
            _ => return None,
        };

        let (start_time, end_time) = if is_timeline_scoped {
            (effect.start_time, effect.end_time)
        } else {
            (
                source_to_timeline(effect.start_time, clip),
                source_to_timeline(effect.end_time, clip),
            )
        };

        let active_now = if is_timeline_scoped {
            timeline_ms >= start_time && timeline_ms <= end_time
        } else {
            source_ms >= effect.start_time && source_ms <= effect.end_time
        };
        if !active_now {
            return None;
        }

        Some(ActiveZoom {
            block,
            start_time,
            end_time,
        })
    })
}
