//! Camwright Processing Core — the deterministic effects compositor.
//!
//! Pure computation over value-typed snapshots: time-space conversion,
//! frame layout, mouse interpolation, cursor smoothing, motion-cluster
//! analysis, the camera engine and its precomputer, keystroke aggregation,
//! and effect resolution. No I/O, no platform dependencies; every public
//! entry point is a pure function of its arguments.

pub mod camera;
pub mod camera_precompute;
pub mod cursor_smooth;
pub mod effects;
pub mod frame_layout;
pub mod keystroke;
pub mod motion_cluster;
pub mod mouse_interp;
pub mod time_space;

pub use camera::{compute_camera_state, CameraInput, CameraMode, CameraOutput, CameraPhysicsState, Overscan};
pub use camera_precompute::{precompute_camera_path, PrecomputeInput};
pub use cursor_smooth::{calculate_cursor_state, CursorSmootherState, CursorState};
pub use effects::{resolve_effects, DrawCommand};
pub use frame_layout::{build_frame_layout, resolve_active_clip, FrameLayoutItem};
pub use keystroke::{render_keystrokes, KeystrokeBlock};
pub use motion_cluster::{calculate_attractor, detect_clusters, MotionCluster};
pub use mouse_interp::{interpolate_mouse, InterpolationError};
pub use time_space::{clip_relative_ms, frame_for_timeline, timeline_for_frame, timeline_to_source, source_to_timeline};
