//! Keystroke aggregator: buffers typed characters into display blocks with
//! flush/fade timing, and renders an instantaneous glyph for modifier
//! shortcut combos (spec.md §4.H).

use camwright_project_model::{KeyboardEvent, KeystrokePosition, Modifiers, Point2D};

const FLUSH_GAP_MS: f64 = 800.0;
const FADE_IN_MS: f64 = 200.0;
const HOLD_MS: f64 = 2500.0;
const FADE_OUT_MS: f64 = 300.0;
const DISPLAY_TOTAL_MS: f64 = FADE_IN_MS + HOLD_MS + FADE_OUT_MS;
const ANCHOR_MARGIN_PX: f64 = 40.0;

/// A rendered keystroke overlay for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct KeystrokeBlock {
    pub text: String,
    pub position: Point2D,
    pub opacity: f64,
}

struct CompletedBlock {
    text: String,
    flush_time: f64,
}

struct LiveBuffer {
    text: String,
    last_key_time: f64,
}

/// Render the keystroke overlay(s) active at `now`: the most recent
/// completed display block still in its fade window, and/or the live
/// buffer preview of text still being typed. At most one of each.
pub fn render_keystrokes(
    events: &[KeyboardEvent],
    now: f64,
    width: f64,
    height: f64,
    position: KeystrokePosition,
) -> Vec<KeystrokeBlock> {
    let (completed, live) = replay(events, now);
    let anchor = anchor_point(position, width, height);
    let mut blocks = Vec::new();

    if let Some(block) = completed
        .iter()
        .rev()
        .find(|b| now >= b.flush_time && now < b.flush_time + DISPLAY_TOTAL_MS)
    {
        let opacity = display_opacity(now - block.flush_time);
        if opacity > 0.0 {
            blocks.push(KeystrokeBlock {
                text: block.text.clone(),
                position: anchor,
                opacity,
            });
        }
    }

    if let Some(buf) = live {
        if !buf.text.is_empty() {
            blocks.push(KeystrokeBlock {
                text: buf.text,
                position: anchor,
                opacity: 1.0,
            });
        }
    }

    blocks
}

/// Replay `events` up to `now`, running the buffering state machine, and
/// return the completed blocks plus whatever buffer is still live (not yet
/// flushed as of `now`).
fn replay(events: &[KeyboardEvent], now: f64) -> (Vec<CompletedBlock>, Option<LiveBuffer>) {
    let mut completed = Vec::new();
    let mut buffer: Option<LiveBuffer> = None;

    for event in events {
        if event.t > now {
            break;
        }

        if let Some(buf) = &buffer {
            if event.t - buf.last_key_time > FLUSH_GAP_MS {
                completed.push(CompletedBlock {
                    text: buffer.take().unwrap().text,
                    flush_time: buf.last_key_time,
                });
            }
        }

        if event.modifiers.any() {
            if let Some(buf) = buffer.take() {
                completed.push(CompletedBlock {
                    text: buf.text,
                    flush_time: event.t,
                });
            }
            completed.push(CompletedBlock {
                text: format_combo(&event.key, &event.modifiers),
                flush_time: event.t,
            });
            continue;
        }

        match event.key.as_str() {
            "Enter" | "Tab" | "Escape" => {
                if let Some(buf) = buffer.take() {
                    completed.push(CompletedBlock {
                        text: buf.text,
                        flush_time: event.t,
                    });
                }
            }
            "Backspace" | "Delete" => {
                if let Some(buf) = &mut buffer {
                    buf.text.pop();
                    buf.last_key_time = event.t;
                }
            }
            "Space" => {
                let buf = buffer.get_or_insert_with(|| LiveBuffer {
                    text: String::new(),
                    last_key_time: event.t,
                });
                buf.text.push(' ');
                buf.last_key_time = event.t;
            }
            key => {
                let glyph = glyph_for_key(key);
                let buf = buffer.get_or_insert_with(|| LiveBuffer {
                    text: String::new(),
                    last_key_time: event.t,
                });
                buf.text.push_str(&glyph);
                buf.last_key_time = event.t;
            }
        }
    }

    if let Some(buf) = &buffer {
        if now - buf.last_key_time > FLUSH_GAP_MS {
            let flush_time = buf.last_key_time;
            let text = buffer.take().unwrap().text;
            completed.push(CompletedBlock { text, flush_time });
        }
    }

    (completed, buffer)
}

fn display_opacity(age: f64) -> f64 {
    if age < 0.0 {
        0.0
    } else if age < FADE_IN_MS {
        age / FADE_IN_MS
    } else if age < FADE_IN_MS + HOLD_MS {
        1.0
    } else if age < DISPLAY_TOTAL_MS {
        1.0 - (age - FADE_IN_MS - HOLD_MS) / FADE_OUT_MS
    } else {
        0.0
    }
}

fn anchor_point(position: KeystrokePosition, width: f64, height: f64) -> Point2D {
    match position {
        KeystrokePosition::TopLeft => Point2D::new(ANCHOR_MARGIN_PX, ANCHOR_MARGIN_PX),
        KeystrokePosition::TopRight => Point2D::new(width - ANCHOR_MARGIN_PX, ANCHOR_MARGIN_PX),
        KeystrokePosition::BottomLeft => Point2D::new(ANCHOR_MARGIN_PX, height - ANCHOR_MARGIN_PX),
        KeystrokePosition::BottomRight => {
            Point2D::new(width - ANCHOR_MARGIN_PX, height - ANCHOR_MARGIN_PX)
        }
        KeystrokePosition::Center => Point2D::new(width / 2.0, height / 2.0),
    }
}

fn glyph_for_key(key: &str) -> String {
    if let Some(glyph) = named_key_glyph(key) {
        return glyph.to_string();
    }
    if let Some(rest) = key.strip_prefix("Key") {
        if rest.len() == 1 {
            return rest.to_string();
        }
    }
    if let Some(rest) = key.strip_prefix("Digit") {
        if rest.len() == 1 {
            return rest.to_string();
        }
    }
    if key == "NumpadAdd" {
        return "+".to_string();
    }
    if key.len() == 1 {
        return key.to_string();
    }
    if key.starts_with('F') && key[1..].parse::<u32>().is_ok() {
        return key.to_string();
    }
    strip_modifier_suffix(key)
}

/// Fixed glyph table for non-printable keys (spec.md §4.H), consulted
/// before the `Key*`/`Digit*`/single-char fallbacks — needed so a modifier
/// combo like `Ctrl+Enter` renders as `"⌃↵"` rather than `"⌃Enter"`.
fn named_key_glyph(key: &str) -> Option<&'static str> {
    Some(match key {
        "Enter" => "↵",
        "Tab" => "⇥",
        "Escape" => "⎋",
        "Backspace" => "⌫",
        "Delete" => "⌦",
        "Space" => "␣",
        "ArrowUp" => "↑",
        "ArrowDown" => "↓",
        "ArrowLeft" => "←",
        "ArrowRight" => "→",
        _ => return None,
    })
}

fn strip_modifier_suffix(key: &str) -> String {
    for suffix in ["Left", "Right"] {
        if let Some(stem) = key.strip_suffix(suffix) {
            if matches!(stem, "Shift" | "Control" | "Alt" | "Meta" | "Command" | "Option") {
                return stem.to_string();
            }
        }
    }
    key.to_string()
}

fn format_combo(key: &str, modifiers: &Modifiers) -> String {
    let mut combo = String::new();
    if modifiers.command {
        combo.push('⌘');
    }
    if modifiers.control {
        combo.push('⌃');
    }
    if modifiers.option {
        combo.push('⌥');
    }
    if modifiers.shift {
        combo.push('⇧');
    }
    combo.push_str(&glyph_for_key(key));
    combo
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(t: f64, k: &str) -> KeyboardEvent {
        KeyboardEvent {
            t,
            key: k.to_string(),
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn flush_on_800ms_gap_matches_scenario() {
        let events = vec![key(0.0, "K"), key(200.0, "e"), key(1100.0, "y")];

        let mid_typing = render_keystrokes(&events, 500.0, 1920.0, 1080.0, KeystrokePosition::BottomLeft);
        assert_eq!(mid_typing.len(), 1);
        assert_eq!(mid_typing[0].text, "Ke");

        let after_flush = render_keystrokes(&events, 1150.0, 1920.0, 1080.0, KeystrokePosition::BottomLeft);
        assert!(after_flush.iter().any(|b| b.text == "Ke"));
        assert!(after_flush.iter().any(|b| b.text == "y"));
    }

    #[test]
    fn backspace_pops_the_buffer() {
        let events = vec![key(0.0, "K"), key(50.0, "e"), key(100.0, "Backspace")];
        let blocks = render_keystrokes(&events, 100.0, 1920.0, 1080.0, KeystrokePosition::BottomLeft);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "K");
    }

    #[test]
    fn shortcut_combo_flushes_and_emits_its_own_block() {
        let mut combo = key(500.0, "C");
        combo.modifiers = Modifiers {
            command: true,
            control: false,
            option: false,
            shift: false,
        };
        let events = vec![key(0.0, "h"), key(100.0, "i"), combo];
        let blocks = render_keystrokes(&events, 500.0, 1920.0, 1080.0, KeystrokePosition::BottomLeft);
        assert!(blocks.iter().any(|b| b.text == "hi"));
        assert!(blocks.iter().any(|b| b.text == "⌘C"));
    }

    #[test]
    fn named_key_combo_uses_its_glyph_not_the_literal_key_name() {
        let mut combo = key(0.0, "Enter");
        combo.modifiers = Modifiers {
            control: true,
            ..Modifiers::NONE
        };
        let events = vec![combo];
        let blocks = render_keystrokes(&events, 0.0, 1920.0, 1080.0, KeystrokePosition::BottomLeft);
        assert!(blocks.iter().any(|b| b.text == "⌃↵"));
    }

    #[test]
    fn display_block_fades_out_after_hold() {
        let events = vec![key(0.0, "K"), key(1000.0, "Enter")];
        let blocks = render_keystrokes(&events, 1000.0 + DISPLAY_TOTAL_MS - 1.0, 1920.0, 1080.0, KeystrokePosition::BottomLeft);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].opacity < 1.0);

        let gone = render_keystrokes(&events, 1000.0 + DISPLAY_TOTAL_MS + 1.0, 1920.0, 1080.0, KeystrokePosition::BottomLeft);
        assert!(gone.is_empty());
    }

    #[test]
    fn progressive_reveal_only_shows_typed_prefix() {
        let events = vec![key(0.0, "K"), key(500.0, "e"), key(1000.0, "y")];
        let blocks = render_keystrokes(&events, 600.0, 1920.0, 1080.0, KeystrokePosition::BottomLeft);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Ke");
    }
}
