//! Effect resolver: merges timeline-scoped and recording-scoped effects for
//! one `(frame, clip)` pair into an ordered, opacity-enveloped draw list
//! (spec.md §4.I).

use std::collections::HashMap;

use camwright_project_model::{Clip, Effect, EffectId, EffectPayload, EffectType};

use crate::time_space::{timeline_for_frame, timeline_to_source};

const FADE_MS: f64 = 200.0;

/// One resolved, layer-ordered effect ready for the pixel surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub effect_id: EffectId,
    pub effect_type: EffectType,
    pub opacity: f64,
    pub payload: EffectPayload,
}

/// Resolve the effects active for `clip` at `frame`, merged by id (timeline
/// effects win over recording effects) and ordered Background, Zoom,
/// Cursor, Keystroke, Annotation.
pub fn resolve_effects(
    frame: i64,
    clip: &Clip,
    fps: u32,
    timeline_effects: &[Effect],
    recording_effects: &[Effect],
) -> Vec<DrawCommand> {
    let window_start = clip.start_time;
    let window_end = clip.start_time + clip.duration;
    let timeline_ms = timeline_for_frame(frame, fps);
    let source_ms = timeline_to_source(timeline_ms, clip);

    let mut merged: HashMap<&EffectId, (&Effect, f64)> = HashMap::new();

    for effect in recording_effects {
        if effect.enabled && effect.start_time <= source_ms && effect.end_time >= source_ms {
            merged.insert(&effect.id, (effect, source_ms));
        }
    }
    for effect in timeline_effects {
        if effect.enabled && effect.start_time <= window_end && effect.end_time >= window_start {
            merged.insert(&effect.id, (effect, timeline_ms));
        }
    }

    let mut commands: Vec<DrawCommand> = merged
        .into_values()
        .map(|(effect, now)| DrawCommand {
            effect_id: effect.id.clone(),
            effect_type: effect.effect_type(),
            opacity: opacity_envelope(now, effect.start_time, effect.end_time),
            payload: effect.payload.clone(),
        })
        .collect();

    commands.sort_by(|a, b| {
        layer_rank(a.effect_type)
            .cmp(&layer_rank(b.effect_type))
            .then_with(|| a.effect_id.cmp(&b.effect_id))
    });
    commands
}

fn opacity_envelope(now: f64, start: f64, end: f64) -> f64 {
    if now < start || now > end {
        return 0.0;
    }
    if end <= start {
        return 1.0;
    }
    let fade_in = ((now - start) / FADE_MS).clamp(0.0, 1.0);
    let fade_out = ((end - now) / FADE_MS).clamp(0.0, 1.0);
    fade_in.min(fade_out)
}

fn layer_rank(effect_type: EffectType) -> u8 {
    match effect_type {
        EffectType::Background => 0,
        EffectType::Zoom => 1,
        EffectType::Cursor => 2,
        EffectType::Keystroke => 3,
        EffectType::Annotation => 4,
    }
}
