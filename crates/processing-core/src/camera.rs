//! The camera engine: dead-zone follow with directional bias, motion-cluster
//! attractors, cursor-stop freezing, spring-damper physics, and
//! letterbox-aware overscan clamping (spec.md §4.F).
//!
//! `compute_camera_state` is the single entry point; everything else here
//! is a private step in its pipeline, mirroring the render compositor's
//! one-entry-point-many-private-helpers shape.

use camwright_platform_core::{detect_coordinate_mismatch, resolve_source_dimensions, CaptureArea};
use camwright_project_model::{FollowStrategy, MouseEvent, Point2D, ZoomBlock};
use tracing::debug;

use crate::motion_cluster::{calculate_attractor, MotionCluster};
use crate::mouse_interp::interpolate_mouse;

const CURSOR_STOP_SPEED_THRESHOLD: f64 = 0.02;
const CURSOR_STOP_UNFREEZE_MULT: f64 = 1.5;
const CURSOR_STOP_DWELL_MS: f64 = 300.0;
const CURSOR_STOP_DAMPING: f64 = 3.0;
const FREEZE_SNAP_EPSILON: f64 = 0.003;
const VELOCITY_LOOKAHEAD_SEC: f64 = 0.1;

/// A zoom block currently active at `timeline_ms`, with its resolved
/// timeline window so the engine can compute intro/outro ramps.
#[derive(Debug, Clone, Copy)]
pub struct ActiveZoom {
    pub block: ZoomBlock,
    pub start_time: f64,
    pub end_time: f64,
}

/// Letterbox padding the camera is allowed to pan into, as non-negative
/// fractions of the output frame on each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overscan {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Overscan {
    pub const NONE: Overscan = Overscan {
        left: 0.0,
        right: 0.0,
        top: 0.0,
        bottom: 0.0,
    };
}

impl Default for Overscan {
    fn default() -> Self {
        Self::NONE
    }
}

/// Whether the camera is being asked for a value-typed snapshot
/// (deterministic — export, random-access preview) or is advancing a live
/// simulation frame-by-frame (physics — sequential playback).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Deterministic,
    Physics,
}

/// Anti-shake dwell/freeze bookkeeping. `frozen_target` is `None` while
/// merely dwelling (within the speed threshold but not yet past the
/// 300ms hold) and `Some` once the target is actually pinned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreezeState {
    pub stopped_at_ms: f64,
    pub frozen_target: Option<Point2D>,
}

/// Camera physics state, owned by exactly one simulator instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPhysicsState {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub last_timeline_ms: f64,
    pub last_source_ms: f64,
    pub freeze: Option<FreezeState>,
}

impl CameraPhysicsState {
    /// A fresh simulator state anchored at frame 0, centered.
    pub fn initial(timeline_ms: f64, source_ms: f64) -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            vx: 0.0,
            vy: 0.0,
            last_timeline_ms: timeline_ms,
            last_source_ms: source_ms,
            freeze: None,
        }
    }
}

/// Everything the camera engine needs to produce one `{scale, center}` for
/// `(timeline_ms, source_ms)`.
pub struct CameraInput<'a> {
    pub timeline_ms: f64,
    pub source_ms: f64,
    pub zoom: Option<ActiveZoom>,
    pub mouse_events: &'a [MouseEvent],
    pub clusters: &'a [MotionCluster],
    pub recording_dims: (u32, u32),
    pub capture_area: Option<CaptureArea>,
    pub overscan: Overscan,
    /// Output frame aspect ratio (`width / height`).
    pub output_aspect: f64,
    /// The active clip's playback rate, used as a physics-integration rate
    /// fallback when the source/timeline delta can't be measured directly.
    pub playback_rate: f64,
    pub mode: CameraMode,
    pub previous: Option<CameraPhysicsState>,
}

/// The camera's output for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOutput {
    pub scale: f64,
    pub center: Point2D,
    pub physics: CameraPhysicsState,
}

/// Combine the active zoom block, motion-cluster attractor, spring-damper
/// physics, and edge clamping into one camera frame. Never fails: missing
/// mouse data degrades to a centered, unzoomed camera.
pub fn compute_camera_state(input: CameraInput) -> CameraOutput {
    let previous = input
        .previous
        .unwrap_or_else(|| CameraPhysicsState::initial(input.timeline_ms, input.source_ms));

    let scale = match &input.zoom {
        Some(zoom) => ramped_scale(
            input.timeline_ms - zoom.start_time,
            zoom.end_time - zoom.start_time,
            zoom.block.scale.max(1.0),
            zoom.block.intro_ms,
            zoom.block.outro_ms,
        ),
        None => 1.0,
    };

    let source_aspect = {
        let (w, h) = input.recording_dims;
        if h == 0 {
            debug!(recording_dims = ?input.recording_dims, "degenerate recording dimensions, defaulting source aspect to 16:9");
            16.0 / 9.0
        } else {
            w as f64 / h as f64
        }
    };
    if input.output_aspect <= 0.0 {
        debug!(output_aspect = input.output_aspect, "degenerate output aspect, clamping");
    }
    let half = half_window(scale, input.output_aspect.max(0.0001), source_aspect.max(0.0001));

    let cursor_px = interpolate_mouse(input.mouse_events, input.source_ms).ok();
    let (source_w, source_h) = resolve_source_dims(
        input.mouse_events,
        input.source_ms,
        input.capture_area,
        input.recording_dims,
        cursor_px.unwrap_or(Point2D::new(0.0, 0.0)),
    );

    let cursor_n = match cursor_px {
        Some(p) => Point2D::new(
            (p.x / source_w.max(1.0)).clamp(0.0, 1.0),
            (p.y / source_h.max(1.0)).clamp(0.0, 1.0),
        ),
        None => Point2D::new(0.5, 0.5),
    };

    let velocity = if cursor_px.is_some() {
        cursor_velocity_per_sec(input.mouse_events, input.source_ms, source_w.max(1.0), source_h.max(1.0))
    } else {
        (0.0, 0.0)
    };

    let mut target = if input.mouse_events.is_empty() {
        Point2D::new(0.5, 0.5)
    } else {
        match &input.zoom {
            Some(zoom) if zoom.block.follow_strategy == FollowStrategy::Target => {
                let tx = zoom
                    .block
                    .target_x
                    .map(|x| (x / source_w.max(1.0)).clamp(0.0, 1.0))
                    .unwrap_or(cursor_n.x);
                let ty = zoom
                    .block
                    .target_y
                    .map(|y| (y / source_h.max(1.0)).clamp(0.0, 1.0))
                    .unwrap_or(cursor_n.y);
                Point2D::new(tx, ty)
            }
            _ => {
                let attractor_px = calculate_attractor(input.clusters, input.mouse_events, input.source_ms);
                let attractor_n = Point2D::new(
                    (attractor_px.x / source_w.max(1.0)).clamp(0.0, 1.0),
                    (attractor_px.y / source_h.max(1.0)).clamp(0.0, 1.0),
                );
                let ratio = dead_zone_ratio_for_scale(scale);
                dead_zone_target(attractor_n, Point2D::new(previous.x, previous.y), half, ratio, velocity)
            }
        }
    };

    let speed = (velocity.0.powi(2) + velocity.1.powi(2)).sqrt();
    let freeze = update_freeze(previous.freeze, scale, speed, target, input.timeline_ms);
    let frozen_target = freeze.as_ref().and_then(|f| f.frozen_target);
    if let Some(frozen) = frozen_target {
        target = frozen;
    }

    let delta_timeline = input.timeline_ms - previous.last_timeline_ms;
    let delta_source = input.source_ms - previous.last_source_ms;

    let (x, y, vx, vy) = match input.mode {
        CameraMode::Deterministic => (target.x, target.y, 0.0, 0.0),
        CameraMode::Physics => {
            if seek_detected(delta_timeline) {
                (target.x, target.y, 0.0, 0.0)
            } else {
                let rate = if delta_timeline > 0.0 {
                    (delta_source / delta_timeline).clamp(0.5, 3.0)
                } else {
                    input.playback_rate.clamp(0.5, 3.0)
                };
                integrate_physics(&previous, target, delta_timeline, rate, frozen_target.is_some())
            }
        }
    };

    let mut center = clamp_center(Point2D::new(x, y), half, input.overscan);
    if frozen_target.is_none() {
        center = keep_cursor_visible(center, cursor_n, half);
    }

    let physics = CameraPhysicsState {
        x: center.x,
        y: center.y,
        vx,
        vy,
        last_timeline_ms: input.timeline_ms,
        last_source_ms: input.source_ms,
        freeze,
    };

    CameraOutput { scale, center, physics }
}

fn smoothstep(u: f64) -> f64 {
    let u = u.clamp(0.0, 1.0);
    u * u * (3.0 - 2.0 * u)
}

fn ramped_scale(elapsed: f64, duration: f64, scale: f64, intro_ms: f64, outro_ms: f64) -> f64 {
    if duration <= 0.0 {
        debug!(duration, "degenerate zoom block duration, skipping ramp");
        return scale;
    }
    let outro_start = (duration - outro_ms).max(0.0);
    if elapsed < intro_ms && intro_ms > 0.0 {
        1.0 + (scale - 1.0) * smoothstep(elapsed / intro_ms)
    } else if elapsed > outro_start && outro_ms > 0.0 {
        scale + (1.0 - scale) * smoothstep((elapsed - outro_start) / outro_ms)
    } else {
        scale
    }
}

fn half_window(scale: f64, output_aspect: f64, source_aspect: f64) -> (f64, f64) {
    let base = 0.5 / scale.max(0.0001);
    let mut hx = base;
    let mut hy = base;
    if output_aspect > source_aspect {
        hy *= output_aspect / source_aspect;
    } else if output_aspect < source_aspect {
        hx *= source_aspect / output_aspect;
    }
    (hx, hy)
}

fn nearest_event(events: &[MouseEvent], t: f64) -> Option<&MouseEvent> {
    if events.is_empty() {
        return None;
    }
    let idx = events.partition_point(|e| e.t <= t);
    if idx == 0 {
        return events.first();
    }
    if idx >= events.len() {
        return events.last();
    }
    let before = &events[idx - 1];
    let after = &events[idx];
    if (t - before.t).abs() <= (after.t - t).abs() {
        Some(before)
    } else {
        Some(after)
    }
}

fn resolve_source_dims(
    mouse_events: &[MouseEvent],
    source_ms: f64,
    capture_area: Option<CaptureArea>,
    recording_dims: (u32, u32),
    cursor_px: Point2D,
) -> (f64, f64) {
    let event_capture = nearest_event(mouse_events, source_ms).and_then(|e| {
        match (e.capture_width, e.capture_height) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some((w, h)),
            _ => None,
        }
    });
    let (base_w, base_h) = resolve_source_dimensions(event_capture, capture_area, recording_dims);
    match detect_coordinate_mismatch((cursor_px.x, cursor_px.y), (base_w, base_h)) {
        Some(scale) => (base_w * scale, base_h * scale),
        None => (base_w, base_h),
    }
}

fn cursor_velocity_per_sec(mouse_events: &[MouseEvent], t: f64, source_w: f64, source_h: f64) -> (f64, f64) {
    const DT: f64 = 50.0;
    let p0 = interpolate_mouse(mouse_events, (t - DT).max(0.0)).unwrap_or(Point2D::new(0.0, 0.0));
    let p1 = interpolate_mouse(mouse_events, t).unwrap_or(Point2D::new(0.0, 0.0));
    let nx0 = (p0.x / source_w).clamp(0.0, 1.0);
    let ny0 = (p0.y / source_h).clamp(0.0, 1.0);
    let nx1 = (p1.x / source_w).clamp(0.0, 1.0);
    let ny1 = (p1.y / source_h).clamp(0.0, 1.0);
    ((nx1 - nx0) / DT * 1000.0, (ny1 - ny0) / DT * 1000.0)
}

fn dead_zone_ratio_for_scale(scale: f64) -> f64 {
    let t = ((scale - 1.1) / (2.5 - 1.1)).clamp(0.0, 1.0);
    lerp(0.30, 0.18, t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn apply_directional_bias(dx: f64, dy: f64) -> (f64, f64) {
    const BIAS: f64 = 0.7;
    if dx.abs() > BIAS * dy.abs() {
        (dx, dy * (1.0 - BIAS))
    } else if dy.abs() > BIAS * dx.abs() {
        (dx * (1.0 - BIAS), dy)
    } else {
        (dx, dy)
    }
}

/// Dead-zone follow target, step 5 of the camera engine: soft-follow inside
/// the dead zone, snap to its boundary outside it, with directional bias
/// and a small velocity-predictive lookahead.
fn dead_zone_target(
    attractor_n: Point2D,
    prev_center: Point2D,
    half_window: (f64, f64),
    dead_zone_ratio: f64,
    velocity: (f64, f64),
) -> Point2D {
    let dz_half_x = half_window.0 * dead_zone_ratio;
    let dz_half_y = half_window.1 * dead_zone_ratio;

    let raw_dx = attractor_n.x - prev_center.x;
    let raw_dy = attractor_n.y - prev_center.y;
    let (dx, dy) = apply_directional_bias(raw_dx, raw_dy);

    let x = if dx.abs() > dz_half_x {
        attractor_n.x - dz_half_x * dx.signum()
    } else {
        prev_center.x + dx * 0.25
    };
    let y = if dy.abs() > dz_half_y {
        attractor_n.y - dz_half_y * dy.signum()
    } else {
        prev_center.y + dy * 0.25
    };

    Point2D::new(
        x + velocity.0 * VELOCITY_LOOKAHEAD_SEC,
        y + velocity.1 * VELOCITY_LOOKAHEAD_SEC,
    )
}

fn update_freeze(
    prev: Option<FreezeState>,
    scale: f64,
    speed: f64,
    target: Point2D,
    timeline_ms: f64,
) -> Option<FreezeState> {
    let is_slow = scale >= 1.25 && speed < CURSOR_STOP_SPEED_THRESHOLD;
    let is_fast = speed > CURSOR_STOP_SPEED_THRESHOLD * CURSOR_STOP_UNFREEZE_MULT;

    match prev {
        Some(state) if state.frozen_target.is_some() => {
            if is_fast {
                None
            } else {
                Some(state)
            }
        }
        Some(state) => {
            if is_fast || !is_slow {
                None
            } else if timeline_ms - state.stopped_at_ms >= CURSOR_STOP_DWELL_MS {
                Some(FreezeState {
                    stopped_at_ms: state.stopped_at_ms,
                    frozen_target: Some(target),
                })
            } else {
                Some(state)
            }
        }
        None => {
            if is_slow {
                Some(FreezeState {
                    stopped_at_ms: timeline_ms,
                    frozen_target: None,
                })
            } else {
                None
            }
        }
    }
}

fn seek_detected(delta_timeline_ms: f64) -> bool {
    delta_timeline_ms > 100.0 || delta_timeline_ms < 0.0
}

fn integrate_physics(
    previous: &CameraPhysicsState,
    target: Point2D,
    delta_timeline_ms: f64,
    rate: f64,
    frozen: bool,
) -> (f64, f64, f64, f64) {
    let dt = delta_timeline_ms / 1000.0;
    let tension = 120.0 * rate;
    let mut friction = 25.0 * rate.sqrt();
    let mut vx = previous.vx;
    let mut vy = previous.vy;

    if frozen {
        friction /= CURSOR_STOP_DAMPING;
        vx *= CURSOR_STOP_DAMPING;
        vy *= CURSOR_STOP_DAMPING;
    }

    let ax = tension * (target.x - previous.x) - friction * vx;
    let ay = tension * (target.y - previous.y) - friction * vy;
    vx += ax * dt;
    vy += ay * dt;
    let mut x = previous.x + vx * dt;
    let mut y = previous.y + vy * dt;

    if frozen {
        let dist = ((target.x - x).powi(2) + (target.y - y).powi(2)).sqrt();
        if dist < FREEZE_SNAP_EPSILON {
            x = target.x;
            y = target.y;
            vx = 0.0;
            vy = 0.0;
        }
    }

    (x, y, vx, vy)
}

fn safe_clamp(value: f64, min: f64, max: f64) -> f64 {
    if min <= max {
        value.clamp(min, max)
    } else {
        debug!(min, max, "degenerate clamp bounds, falling back to midpoint");
        (min + max) / 2.0
    }
}

/// Step 6 of the camera engine: remap `center`/`half_window` out of
/// content-normalized `[0,1]` space into output-normalized space (which
/// includes the overscan margins), clamp there against the output frame's
/// own `[0,1]` bounds, then map the clamped result back.
fn project_overscan(center: Point2D, half_window: (f64, f64), overscan: Overscan) -> Point2D {
    let total_x = 1.0 + overscan.left + overscan.right;
    let total_y = 1.0 + overscan.top + overscan.bottom;

    let output_x = (center.x + overscan.left) / total_x;
    let output_y = (center.y + overscan.top) / total_y;
    let output_half_x = half_window.0 / total_x;
    let output_half_y = half_window.1 / total_y;

    let clamped_x = safe_clamp(output_x, output_half_x, 1.0 - output_half_x);
    let clamped_y = safe_clamp(output_y, output_half_y, 1.0 - output_half_y);

    Point2D::new(
        clamped_x * total_x - overscan.left,
        clamped_y * total_y - overscan.top,
    )
}

fn clamp_center(center: Point2D, half_window: (f64, f64), overscan: Overscan) -> Point2D {
    project_overscan(center, half_window, overscan)
}

fn keep_cursor_visible(center: Point2D, cursor_n: Point2D, half_window: (f64, f64)) -> Point2D {
    let mut x = center.x;
    if cursor_n.x < x - half_window.0 {
        x = cursor_n.x + half_window.0;
    } else if cursor_n.x > x + half_window.0 {
        x = cursor_n.x - half_window.0;
    }
    let mut y = center.y;
    if cursor_n.y < y - half_window.1 {
        y = cursor_n.y + half_window.1;
    } else if cursor_n.y > y + half_window.1 {
        y = cursor_n.y - half_window.1;
    }
    Point2D::new(x, y)
}
