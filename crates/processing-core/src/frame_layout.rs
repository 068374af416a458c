//! Frame layout: the precomputed `(start_frame, end_frame)` table for every
//! clip, and active-clip resolution for arbitrary frame indices.

use camwright_common::{CompositorError, CompositorResult};
use camwright_project_model::Clip;

/// One clip's placement in frame-index space.
#[derive(Debug, Clone)]
pub struct FrameLayoutItem {
    pub clip: Clip,
    pub start_frame: i64,
    /// Exclusive.
    pub end_frame: i64,
    pub duration_frames: i64,
}

/// Build the frame layout table for an EDL.
///
/// Frame boundaries use round-half-to-even, the only place in the
/// compositor that rounds timeline math — everything else works in exact
/// ms to avoid drift. Fails loudly (this is the one function in the public
/// API that returns a structured error) when clips violate layout
/// invariants: non-positive duration, non-positive playback rate,
/// `source_in > source_out`, or timeline overlap.
pub fn build_frame_layout(clips: &[Clip], fps: u32) -> CompositorResult<Vec<FrameLayoutItem>> {
    let mut sorted: Vec<&Clip> = clips.iter().collect();
    sorted.sort_by(|a, b| {
        a.start_time
            .partial_cmp(&b.start_time)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut layout = Vec::with_capacity(sorted.len());
    let mut prev_end_frame: Option<i64> = None;

    for clip in sorted {
        if clip.duration <= 0.0 {
            return Err(CompositorError::invariant_violation(format!(
                "clip {} has non-positive duration {}",
                clip.id, clip.duration
            )));
        }
        if clip.playback_rate <= 0.0 {
            return Err(CompositorError::invariant_violation(format!(
                "clip {} has non-positive playback_rate {}",
                clip.id, clip.playback_rate
            )));
        }
        let source_out = clip.resolved_source_out();
        if clip.source_in > source_out {
            return Err(CompositorError::invariant_violation(format!(
                "clip {} has source_in {} > source_out {}",
                clip.id, clip.source_in, source_out
            )));
        }

        let start_frame = round_half_even(clip.start_time * fps as f64 / 1000.0);
        let duration_frames = round_half_even(clip.duration * fps as f64 / 1000.0).max(1);
        let end_frame = start_frame + duration_frames;

        if let Some(prev_end) = prev_end_frame {
            if start_frame < prev_end {
                return Err(CompositorError::invariant_violation(format!(
                    "clip {} (start_frame {}) overlaps the previous clip (end_frame {})",
                    clip.id, start_frame, prev_end
                )));
            }
        }
        prev_end_frame = Some(end_frame);

        layout.push(FrameLayoutItem {
            clip: clip.clone(),
            start_frame,
            end_frame,
            duration_frames,
        });
    }

    Ok(layout)
}

/// Resolve the clip active at `frame`, with nearest-neighbor fallback into
/// gaps (spec.md §4.B) so scrubbing into a hole never shows black.
pub fn resolve_active_clip(layout: &[FrameLayoutItem], frame: i64) -> Option<&Clip> {
    if layout.is_empty() {
        return None;
    }

    // Number of items whose start_frame <= frame; candidate clip (if any) is
    // at idx - 1, since layout is sorted ascending by start_frame.
    let idx = layout.partition_point(|item| item.start_frame <= frame);

    if idx > 0 {
        // candidate is simultaneously the containing clip (frame <
        // end_frame) and the gap fallback (greatest end_frame <= frame) —
        // the half-open range already encodes the boundary tie-break
        // toward the clip that is starting, since a contiguous successor
        // claims the shared frame via its own start_frame <= frame check.
        return Some(&layout[idx - 1].clip);
    }

    layout.first().map(|item| &item.clip)
}

fn round_half_even(x: f64) -> i64 {
    let floor = x.floor();
    let diff = x - floor;
    let floor_i = floor as i64;
    if diff < 0.5 {
        floor_i
    } else if diff > 0.5 {
        floor_i + 1
    } else if floor_i % 2 == 0 {
        floor_i
    } else {
        floor_i + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camwright_project_model::Clip;

    fn clip(id: &str, start: f64, duration: f64) -> Clip {
        Clip::new(id, "r1", start, duration, 0.0)
    }

    #[test]
    fn boundary_tie_break_prefers_starting_clip() {
        let clips = vec![clip("a", 0.0, 1000.0), clip("b", 1000.0, 1000.0)];
        let layout = build_frame_layout(&clips, 30).unwrap();
        let active = resolve_active_clip(&layout, 30).unwrap();
        assert_eq!(active.id, "b");
    }

    #[test]
    fn mid_clip_frame_resolves_to_containing_clip() {
        let clips = vec![clip("a", 0.0, 1000.0), clip("b", 1000.0, 1000.0)];
        let layout = build_frame_layout(&clips, 30).unwrap();
        let active = resolve_active_clip(&layout, 15).unwrap();
        assert_eq!(active.id, "a");
    }

    #[test]
    fn gap_falls_back_to_nearest_neighbor() {
        let clips = vec![clip("a", 0.0, 1000.0), clip("b", 2000.0, 1000.0)];
        let layout = build_frame_layout(&clips, 30).unwrap();

        // frame 45 (1500ms) sits in the gap between a's end and b's start
        let active = resolve_active_clip(&layout, 45).unwrap();
        assert_eq!(active.id, "a", "nearest clip with greatest end_frame <= frame");

        let active_before_start = resolve_active_clip(&layout, -5).unwrap();
        assert_eq!(
            active_before_start.id, "a",
            "before any clip, fall back to smallest start_frame > frame"
        );
    }

    #[test]
    fn overlapping_clips_fail_loudly() {
        let clips = vec![clip("a", 0.0, 1000.0), clip("b", 500.0, 1000.0)];
        let result = build_frame_layout(&clips, 30);
        assert!(matches!(
            result,
            Err(CompositorError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn non_positive_duration_fails_loudly() {
        let clips = vec![clip("a", 0.0, 0.0)];
        let result = build_frame_layout(&clips, 30);
        assert!(result.is_err());
    }

    #[test]
    fn empty_layout_resolves_to_none() {
        assert!(resolve_active_clip(&[], 0).is_none());
    }
}
