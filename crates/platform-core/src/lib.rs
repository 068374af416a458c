//! Camwright platform-core contracts.
//!
//! Cross-platform capture/display geometry used by the camera engine's
//! source-dimension resolution step (spec.md §4.F step 3): given a mouse
//! event, a recording's declared capture area, and its bare `width`/`height`,
//! figure out which source dimensions the cursor's normalized position
//! should be measured against, and detect when recorded pointer pixels
//! exceed the reported screen size (a physical-vs-logical DPI mismatch).

use serde::{Deserialize, Serialize};

/// Declared capture area for a recording: the full bounds it was captured
/// from, before any per-event override.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CaptureArea {
    pub full_bounds_width: u32,
    pub full_bounds_height: u32,
    pub scale_factor: f64,
}

/// Resolved source dimensions the camera engine should normalize cursor
/// coordinates against, following spec.md §4.F step 3's fallback chain:
/// 1. the current mouse event's own `captureWidth`/`captureHeight`,
/// 2. the recording's `captureArea.fullBounds · scaleFactor`,
/// 3. the recording's bare `width`/`height`,
/// 4. a hard-coded 1920×1080 fallback.
pub fn resolve_source_dimensions(
    event_capture: Option<(f64, f64)>,
    capture_area: Option<CaptureArea>,
    recording_dims: (u32, u32),
) -> (f64, f64) {
    if let Some((w, h)) = event_capture {
        if w > 0.0 && h > 0.0 {
            return (w, h);
        }
    }

    if let Some(area) = capture_area {
        let w = area.full_bounds_width as f64 * area.scale_factor;
        let h = area.full_bounds_height as f64 * area.scale_factor;
        if w > 0.0 && h > 0.0 {
            return (w, h);
        }
    }

    let (rw, rh) = recording_dims;
    if rw > 0 && rh > 0 {
        return (rw as f64, rh as f64);
    }

    (1920.0, 1080.0)
}

/// Detect a physical-vs-logical coordinate mismatch: pointer coordinates
/// that exceed the reported screen dimensions by more than 10% imply the
/// event stream is in a different pixel density than `reported`. Returns
/// the implied scale factor to apply, or `None` when within tolerance.
pub fn detect_coordinate_mismatch(
    pointer: (f64, f64),
    reported: (f64, f64),
) -> Option<f64> {
    let (px, py) = pointer;
    let (rw, rh) = reported;
    if rw <= 0.0 || rh <= 0.0 {
        return None;
    }

    let over_x = px > rw * 1.10;
    let over_y = py > rh * 1.10;
    if !over_x && !over_y {
        return None;
    }

    let ratio_x = if rw > 0.0 { px / rw } else { 1.0 };
    let ratio_y = if rh > 0.0 { py / rh } else { 1.0 };
    Some(ratio_x.max(ratio_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_event_capture_dims() {
        let dims = resolve_source_dimensions(
            Some((2560.0, 1440.0)),
            Some(CaptureArea {
                full_bounds_width: 1920,
                full_bounds_height: 1080,
                scale_factor: 1.0,
            }),
            (1920, 1080),
        );
        assert_eq!(dims, (2560.0, 1440.0));
    }

    #[test]
    fn resolve_falls_back_to_capture_area_then_recording_dims_then_default() {
        let dims = resolve_source_dimensions(
            None,
            Some(CaptureArea {
                full_bounds_width: 1920,
                full_bounds_height: 1080,
                scale_factor: 2.0,
            }),
            (1280, 720),
        );
        assert_eq!(dims, (3840.0, 2160.0));

        let dims = resolve_source_dimensions(None, None, (1280, 720));
        assert_eq!(dims, (1280.0, 720.0));

        let dims = resolve_source_dimensions(None, None, (0, 0));
        assert_eq!(dims, (1920.0, 1080.0));
    }

    #[test]
    fn mismatch_detected_when_pointer_exceeds_reported_by_over_10_percent() {
        let implied = detect_coordinate_mismatch((3000.0, 1000.0), (1920.0, 1080.0));
        assert!(implied.is_some());
        assert!((implied.unwrap() - 3000.0 / 1920.0).abs() < 1e-9);

        assert!(detect_coordinate_mismatch((1900.0, 1000.0), (1920.0, 1080.0)).is_none());
    }
}
