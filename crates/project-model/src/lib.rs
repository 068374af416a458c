//! Camwright Project Model
//!
//! Defines the core data contracts the deterministic effects compositor
//! consumes:
//! - **Events:** source-timestamped input events (pointer, click, key)
//! - **Recording:** an ingested capture with its event metadata
//! - **Clip / EDL:** placements of recordings on the timeline
//! - **Effect:** time-scoped directives (zoom, cursor, keystroke,
//!   background, annotation)
//! - **Point2D:** normalized point geometry shared by the camera engine and
//!   the effect resolver
//! - **Project:** the value-typed snapshot a "project store" collaborator
//!   hands the compositor each run (no file I/O lives here — see spec.md §1)

pub mod clip;
pub mod effect;
pub mod event;
pub mod project;
pub mod recording;
pub mod viewport;

pub use clip::*;
pub use effect::*;
pub use event::*;
pub use project::*;
pub use recording::*;
pub use viewport::*;
