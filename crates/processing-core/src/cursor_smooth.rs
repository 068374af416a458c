//! Cursor smoothing: a time-constant exponential filter over the
//! interpolated raw mouse position, plus the cursor's idle-fade and
//! click-ripple state machine (spec.md §4.D).
//!
//! The smoother keeps no internal state of its own — callers in sequential
//! mode thread a [`CursorSmootherState`] through successive calls, while
//! random-access callers (scrubbing preview, parallel export) pass `None`
//! and get a lookback reconstruction that converges to the same value
//! regardless of call order.

use camwright_project_model::{ClickEvent, CursorConfig, MouseEvent, Point2D};

use crate::mouse_interp::interpolate_mouse;

/// Smoother state a sequential caller threads between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorSmootherState {
    pub x: f64,
    pub y: f64,
    /// The `now` at which this state was produced, in source ms.
    pub t: f64,
    pub visible: bool,
}

/// An active click-ripple overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickRipple {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub opacity: f64,
}

/// Resolved cursor overlay for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorState {
    pub position: Point2D,
    pub opacity: f64,
    pub ripples: Vec<ClickRipple>,
    /// Feed this back as `previous` on the next sequential call.
    pub physics: CursorSmootherState,
}

/// Compute the cursor overlay at `now` (source ms).
pub fn calculate_cursor_state(
    config: &CursorConfig,
    mouse_events: &[MouseEvent],
    click_events: &[ClickEvent],
    now: f64,
    previous: Option<&CursorSmootherState>,
    fps: u32,
) -> CursorState {
    let raw = interpolate_mouse(mouse_events, now).unwrap_or(Point2D::new(0.0, 0.0));

    let position = if !config.gliding {
        raw
    } else {
        smoothed_position(config, mouse_events, now, previous, fps, raw)
    };

    let opacity = idle_opacity(config, mouse_events, now);
    let ripples = click_ripples(config, click_events, now);

    CursorState {
        position,
        opacity,
        ripples,
        physics: CursorSmootherState {
            x: position.x,
            y: position.y,
            t: now,
            visible: opacity > 0.0,
        },
    }
}

fn smoothed_position(
    config: &CursorConfig,
    mouse_events: &[MouseEvent],
    now: f64,
    previous: Option<&CursorSmootherState>,
    fps: u32,
    raw_now: Point2D,
) -> Point2D {
    if let Some(prev) = previous {
        let dt = now - prev.t;
        if dt >= 0.0 && dt <= 120.0 && prev.visible {
            return smoothing_step(Point2D::new(prev.x, prev.y), raw_now, dt, config);
        }
    }
    reconstruct(config, mouse_events, now, fps, raw_now)
}

/// Reconstruct a smoothed position from scratch by simulating forward over
/// a lookback window — the stateless fallback random-access callers need.
fn reconstruct(
    config: &CursorConfig,
    mouse_events: &[MouseEvent],
    now: f64,
    fps: u32,
    raw_now: Point2D,
) -> Point2D {
    let fps = fps.max(1);
    let window = lookback_window_ms(config);
    let step_ms = 1000.0 / fps as f64;
    let first_t = mouse_events.first().map(|e| e.t).unwrap_or(now);
    let start = first_t.max(now - window);

    let mut pos = interpolate_mouse(mouse_events, start).unwrap_or(raw_now);
    if start >= now {
        return pos;
    }

    let mut t = start;
    while t < now {
        let next_t = (t + step_ms).min(now);
        let dt = next_t - t;
        let target = interpolate_mouse(mouse_events, next_t).unwrap_or(raw_now);
        pos = smoothing_step(pos, target, dt, config);
        t = next_t;
    }
    pos
}

fn lookback_window_ms(config: &CursorConfig) -> f64 {
    let w = (120.0 + 300.0 * config.smoothness) * (0.55 + 0.4 * (1.0 - config.speed));
    w.max(90.0)
}

/// One smoothing step of `dt` ms toward `target`, with the deadband and
/// far-target boost described in spec.md §4.D step 4.
fn smoothing_step(prev: Point2D, target: Point2D, dt_ms: f64, config: &CursorConfig) -> Point2D {
    let d = prev.distance_to(&target);

    let jitter_radius = 0.9 + 1.6 * (1.0 - config.speed.clamp(0.0, 1.0));
    if d < jitter_radius {
        return prev;
    }

    let base_tau = 14.0 + (160.0 - 14.0) * config.smoothness.clamp(0.0, 1.0);
    let tau = (base_tau * (1.35 - config.speed.clamp(0.0, 1.0))).max(6.0);
    let alpha = 1.0 - (-dt_ms.max(0.0) / tau).exp();
    let boost = 1.0 + (d / 80.0).min(3.0);
    let boosted_alpha = 1.0 - (1.0 - alpha).powf(boost);

    Point2D::new(
        prev.x + (target.x - prev.x) * boosted_alpha,
        prev.y + (target.y - prev.y) * boosted_alpha,
    )
}

/// Timestamp of the last sample whose position differs from its
/// predecessor, i.e. the last true movement at or before `now`.
fn last_movement_time(mouse_events: &[MouseEvent], now: f64) -> Option<f64> {
    let mut last_move = None;
    for pair in mouse_events.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if b.t > now {
            break;
        }
        if (b.x - a.x).abs() > f64::EPSILON || (b.y - a.y).abs() > f64::EPSILON {
            last_move = Some(b.t);
        }
    }
    last_move.or_else(|| mouse_events.first().map(|e| e.t))
}

/// Gap, in ms, between `t` and the previous sample before it.
fn gap_before(mouse_events: &[MouseEvent], t: f64) -> f64 {
    let mut prev_t = mouse_events.first().map(|e| e.t).unwrap_or(t);
    for e in mouse_events {
        if e.t >= t {
            break;
        }
        prev_t = e.t;
    }
    t - prev_t
}

fn idle_opacity(config: &CursorConfig, mouse_events: &[MouseEvent], now: f64) -> f64 {
    if !config.hide_on_idle {
        return 1.0;
    }
    let Some(last_move) = last_movement_time(mouse_events, now) else {
        return 1.0;
    };

    // A move that woke the cursor from a hidden state fades in over 180ms.
    let gap_before_wake = gap_before(mouse_events, last_move);
    let since_wake = now - last_move;
    if gap_before_wake > config.idle_timeout && since_wake < 180.0 {
        return (since_wake / 180.0).clamp(0.0, 1.0);
    }

    let idle = now - last_move;
    let fade_out_start = (config.idle_timeout - 300.0).max(0.0);
    if idle <= fade_out_start {
        1.0
    } else if idle >= config.idle_timeout {
        0.0
    } else {
        1.0 - (idle - fade_out_start) / 300.0
    }
}

fn click_ripples(config: &CursorConfig, click_events: &[ClickEvent], now: f64) -> Vec<ClickRipple> {
    if !config.click_effects {
        return Vec::new();
    }
    click_events
        .iter()
        .filter_map(|c| {
            let age = now - c.t;
            if !(0.0..300.0).contains(&age) {
                return None;
            }
            let p = (age / 200.0).min(1.0);
            Some(ClickRipple {
                x: c.x,
                y: c.y,
                radius: 10.0 + 50.0 * (1.0 - (1.0 - p).powi(3)),
                opacity: 0.5 * (1.0 - p),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camwright_project_model::MouseButton;

    fn config() -> CursorConfig {
        CursorConfig {
            speed: 0.5,
            smoothness: 0.5,
            gliding: true,
            hide_on_idle: false,
            idle_timeout: 3000.0,
            motion_blur: false,
            click_effects: true,
        }
    }

    #[test]
    fn click_ripple_matches_150ms_age_scenario() {
        let clicks = vec![ClickEvent {
            t: 0.0,
            x: 10.0,
            y: 20.0,
            button: MouseButton::Left,
        }];
        let ripples = click_ripples(&config(), &clicks, 150.0);
        assert_eq!(ripples.len(), 1);
        let r = ripples[0];
        assert!((r.radius - 59.21875).abs() < 1e-6);
        assert!((r.opacity - 0.125).abs() < 1e-9);
    }

    #[test]
    fn ripple_expires_after_300ms() {
        let clicks = vec![ClickEvent {
            t: 0.0,
            x: 0.0,
            y: 0.0,
            button: MouseButton::Left,
        }];
        assert!(click_ripples(&config(), &clicks, 301.0).is_empty());
    }

    #[test]
    fn non_gliding_config_passes_through_raw_position() {
        let mut cfg = config();
        cfg.gliding = false;
        let events = vec![MouseEvent::new(0.0, 100.0, 200.0)];
        let state = calculate_cursor_state(&cfg, &events, &[], 0.0, None, 30);
        assert!((state.position.x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn sequential_step_lags_behind_a_jump() {
        let cfg = config();
        let events = vec![
            MouseEvent::new(0.0, 0.0, 0.0),
            MouseEvent::new(1000.0, 500.0, 0.0),
        ];
        let first = calculate_cursor_state(&cfg, &events, &[], 0.0, None, 60);
        let second = calculate_cursor_state(&cfg, &events, &[], 16.0, Some(&first.physics), 60);
        assert!(second.position.x > 0.0 && second.position.x < 500.0);
    }

    #[test]
    fn idle_fade_reaches_zero_after_timeout() {
        let mut cfg = config();
        cfg.hide_on_idle = true;
        cfg.idle_timeout = 1000.0;
        let events = vec![MouseEvent::new(0.0, 0.0, 0.0), MouseEvent::new(10.0, 5.0, 0.0)];
        let state = calculate_cursor_state(&cfg, &events, &[], 1000.0, None, 30);
        assert_eq!(state.opacity, 0.0);
    }

    #[test]
    fn deadband_suppresses_sub_pixel_jitter() {
        let cfg = config();
        let prev = Point2D::new(100.0, 100.0);
        let target = Point2D::new(100.3, 100.0);
        let next = smoothing_step(prev, target, 16.0, &cfg);
        assert_eq!(next.x, prev.x);
    }
}
