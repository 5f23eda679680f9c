//! # RepTrack-Engine
//!
//! Push-up repetition counting and variant classification from
//! per-frame body landmarks.
//!
//! ## Pipeline
//!
//! For every frame the host feeds in the pose model's landmark
//! snapshot (or `None` when no person was detected):
//!
//! 1. **Geometry** — average the left/right elbow flexion angles into
//!    one primary angle.
//! 2. **Classification** — near full flexion, re-derive the push-up
//!    variant (diamond, regular, wide arm, very wide arm, pike) from
//!    wrist/shoulder spacing and the hip angle.
//! 3. **State machine** — debounce the angle stream into up/down stage
//!    transitions; a rep counts only for a full down->up cycle whose
//!    bottom dropped below the down threshold.
//!
//! The transition itself is a bounded synchronous computation; the
//! `SessionManager` layers per-stream isolation on top for hosts
//! serving multiple concurrent sessions.

pub mod classify;
pub mod config;
pub mod counter;
pub mod session;

pub use classify::*;
pub use config::*;
pub use counter::*;
pub use session::*;
