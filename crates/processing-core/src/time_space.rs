//! Time-space conversion between timeline ms, clip-relative ms, source ms,
//! and frame indices.
//!
//! Three coordinate spaces exist: **timeline ms** (the edited output),
//! **clip-relative ms** (zero at a clip's `start_time`), and **source ms**
//! (the original recording). Per-frame math here uses exact division, never
//! rounding — rounding only happens once, when the frame layout table is
//! built (see [`crate::frame_layout`]).

use camwright_project_model::Clip;

/// Timeline time since a clip's start, clamped to `[0, clip.duration]`.
pub fn clip_relative_ms(timeline_ms: f64, clip: &Clip) -> f64 {
    (timeline_ms - clip.start_time).clamp(0.0, clip.duration)
}

/// Convert timeline ms to source ms within a clip's window.
pub fn timeline_to_source(timeline_ms: f64, clip: &Clip) -> f64 {
    let relative = clip_relative_ms(timeline_ms, clip);
    let source = clip.source_in + relative * clip.playback_rate;
    source.clamp(clip.source_in, clip.resolved_source_out())
}

/// Convert source ms back to timeline ms within a clip's window. Inverts
/// [`timeline_to_source`] exactly for `s` within `[source_in, source_out]`.
pub fn source_to_timeline(source_ms: f64, clip: &Clip) -> f64 {
    let relative = (source_ms - clip.source_in) / clip.playback_rate;
    clip.start_time + relative
}

/// Nearest frame index for a timeline ms value, using ordinary rounding.
/// Frame-layout construction uses a stricter round-half-to-even rule; see
/// [`crate::frame_layout`].
pub fn frame_for_timeline(timeline_ms: f64, fps: u32) -> i64 {
    (timeline_ms / 1000.0 * fps as f64).round() as i64
}

/// Timeline ms at the start of a given frame index.
pub fn timeline_for_frame(frame: i64, fps: u32) -> f64 {
    frame as f64 / fps as f64 * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use camwright_project_model::Clip;
    use proptest::prelude::*;

    fn make_clip() -> Clip {
        let mut clip = Clip::new("c1", "r1", 1000.0, 4000.0, 500.0);
        clip.playback_rate = 1.0;
        clip
    }

    #[test]
    fn clip_relative_clamps_to_duration() {
        let clip = make_clip();
        assert_eq!(clip_relative_ms(0.0, &clip), 0.0);
        assert_eq!(clip_relative_ms(1000.0, &clip), 0.0);
        assert_eq!(clip_relative_ms(10_000.0, &clip), clip.duration);
    }

    #[test]
    fn timeline_to_source_applies_playback_rate() {
        let mut clip = make_clip();
        clip.playback_rate = 2.0;
        // 500ms into the clip at 2x -> 1000ms of source elapsed
        let source = timeline_to_source(1500.0, &clip);
        assert!((source - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn frame_and_timeline_round_trip_at_exact_frame_boundaries() {
        let fps = 30;
        for frame in [0i64, 1, 29, 30, 900] {
            let ms = timeline_for_frame(frame, fps);
            assert_eq!(frame_for_timeline(ms, fps), frame);
        }
    }

    proptest! {
        #[test]
        fn source_round_trips_through_timeline(
            start_time in 0.0f64..100_000.0,
            duration in 1.0f64..60_000.0,
            source_in in 0.0f64..10_000.0,
            rate in 0.25f64..4.0,
            frac in 0.0f64..1.0,
        ) {
            let mut clip = Clip::new("c", "r", start_time, duration, source_in);
            clip.playback_rate = rate;
            let source_out = clip.resolved_source_out();
            let s = source_in + frac * (source_out - source_in);

            let timeline = source_to_timeline(s, &clip);
            let back = timeline_to_source(timeline, &clip);
            prop_assert!((back - s).abs() < 1e-6);
        }
    }
}
