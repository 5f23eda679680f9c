//! # RepTrack-Core
//!
//! Core types and geometry utilities for the RepTrack exercise
//! repetition tracking system: body landmark snapshots produced by an
//! external pose-estimation model and the pure joint-angle/distance
//! computations derived from them.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use types::*;
