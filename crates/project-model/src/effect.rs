//! Time-scoped effect directives: zoom blocks, cursor/keystroke
//! configuration, background fills, and annotations.

use serde::{Deserialize, Serialize};

pub type EffectId = String;

/// The effect kind, duplicated as a plain enum (in addition to the tagged
/// payload) so callers can group/filter without destructuring the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    Background,
    Cursor,
    Keystroke,
    Zoom,
    Annotation,
}

/// A time-scoped directive. Timeline-scoped effects are expressed in
/// timeline ms; effects attached to a [`Recording`](crate::Recording) are
/// expressed in source ms — the Effect Resolver is responsible for knowing
/// which space it is working in for a given effect set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: EffectId,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub payload: EffectPayload,
}

fn default_enabled() -> bool {
    true
}

impl Effect {
    pub fn effect_type(&self) -> EffectType {
        self.payload.effect_type()
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Type-specific effect payload, serialized with an adjacently-tagged
/// `type` discriminant matching [`EffectType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectPayload {
    Background(BackgroundPayload),
    Cursor(CursorConfig),
    Keystroke(KeystrokeConfig),
    Zoom(ZoomBlock),
    Annotation(AnnotationPayload),
}

impl EffectPayload {
    pub fn effect_type(&self) -> EffectType {
        match self {
            EffectPayload::Background(_) => EffectType::Background,
            EffectPayload::Cursor(_) => EffectType::Cursor,
            EffectPayload::Keystroke(_) => EffectType::Keystroke,
            EffectPayload::Zoom(_) => EffectType::Zoom,
            EffectPayload::Annotation(_) => EffectType::Annotation,
        }
    }
}

/// Solid background fill shown behind letterboxed/overscanned regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundPayload {
    /// Hex color, e.g. `#1a1a1a`.
    pub color: String,
}

/// How the camera's target center tracks motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FollowStrategy {
    #[default]
    Mouse,
    Target,
}

/// Zoom block payload driving the camera engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomBlock {
    /// Target zoom level, `>= 1.0`.
    pub scale: f64,
    /// Fixed target in source pixels, used when `follow_strategy == Target`.
    #[serde(default)]
    pub target_x: Option<f64>,
    #[serde(default)]
    pub target_y: Option<f64>,
    #[serde(default = "default_ramp_ms")]
    pub intro_ms: f64,
    #[serde(default = "default_ramp_ms")]
    pub outro_ms: f64,
    #[serde(default)]
    pub follow_strategy: FollowStrategy,
}

fn default_ramp_ms() -> f64 {
    300.0
}

impl ZoomBlock {
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            target_x: None,
            target_y: None,
            intro_ms: default_ramp_ms(),
            outro_ms: default_ramp_ms(),
            follow_strategy: FollowStrategy::Mouse,
        }
    }
}

/// Cursor smoothing/visibility configuration consumed by the cursor
/// smoother (spec.md §4.D).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorConfig {
    /// Smoothing speed, `[0, 1]`; higher tracks the raw cursor more tightly.
    pub speed: f64,
    /// Smoothing amount, `[0, 1]`; higher lags further behind the cursor.
    pub smoothness: f64,
    /// Whether to apply gliding interpolation at all.
    pub gliding: bool,
    pub hide_on_idle: bool,
    /// Idle duration (ms) before the cursor starts fading out.
    pub idle_timeout: f64,
    pub motion_blur: bool,
    pub click_effects: bool,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            speed: 0.5,
            smoothness: 0.5,
            gliding: true,
            hide_on_idle: false,
            idle_timeout: 3000.0,
            motion_blur: false,
            click_effects: true,
        }
    }
}

/// Corner/position preset for the keystroke overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeystrokePosition {
    TopLeft,
    TopRight,
    #[default]
    BottomLeft,
    BottomRight,
    Center,
}

/// Keystroke overlay configuration (spec.md §4.H).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeystrokeConfig {
    #[serde(default)]
    pub position: KeystrokePosition,
}

impl Default for KeystrokeConfig {
    fn default() -> Self {
        Self {
            position: KeystrokePosition::default(),
        }
    }
}

/// Opaque annotation payload. Annotation rendering is owned by the pixel
/// surface collaborator; the compositor only tracks its time window and
/// fade envelope, forwarding `data` verbatim in the resolved draw command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPayload {
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_block_defaults_ramp_and_follow_strategy() {
        let zoom = ZoomBlock::new(2.0);
        assert_eq!(zoom.intro_ms, 300.0);
        assert_eq!(zoom.outro_ms, 300.0);
        assert_eq!(zoom.follow_strategy, FollowStrategy::Mouse);
    }

    #[test]
    fn effect_type_matches_payload_variant() {
        let effect = Effect {
            id: "e1".to_string(),
            start_time: 0.0,
            end_time: 1000.0,
            enabled: true,
            payload: EffectPayload::Zoom(ZoomBlock::new(1.5)),
        };
        assert_eq!(effect.effect_type(), EffectType::Zoom);
    }

    #[test]
    fn effect_roundtrips_through_json() {
        let effect = Effect {
            id: "e1".to_string(),
            start_time: 0.0,
            end_time: 2000.0,
            enabled: true,
            payload: EffectPayload::Cursor(CursorConfig::default()),
        };
        let json = serde_json::to_string(&effect).unwrap();
        let parsed: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(effect, parsed);
    }
}
