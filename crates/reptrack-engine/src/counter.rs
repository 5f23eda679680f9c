//! Repetition counting state machine.
//!
//! Consumes one averaged elbow-flexion angle per frame and debounces it
//! into discrete rep counts: a rep is awarded only for a full down->up
//! cycle whose bottom genuinely dropped below the down threshold, so
//! jitter around the up threshold never inflates the count.

use serde::{Deserialize, Serialize};

use reptrack_core::{joint_angle, LandmarkSnapshot, PoseLandmark, Position2D, Result};

use crate::classify::{classify, PushupType};

/// Sentinel for "no bottom observed yet this cycle"
pub const MIN_ANGLE_SENTINEL: f64 = 180.0;

/// Binary phase of a repetition cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Unset,
    Up,
    Down,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Unset => "unset",
            Stage::Up => "up",
            Stage::Down => "down",
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::Unset
    }
}

/// Angle thresholds driving stage transitions and classification gating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Angle at or below which the arms count as flexed ("down")
    pub down: f64,
    /// Angle at or above which the arms count as extended ("up")
    pub up: f64,
    /// Angle at or below which the variant is (re)classified
    pub classify: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            down: 110.0,
            up: 150.0,
            classify: 110.0,
        }
    }
}

impl Thresholds {
    /// Validate ordering: the dead zone between `down` and `up` must be
    /// non-empty and classification must only fire at the bottom of the
    /// motion.
    pub fn validate(&self) -> Result<()> {
        if !(self.down.is_finite() && self.up.is_finite() && self.classify.is_finite()) {
            return Err(reptrack_core::Error::Config(
                "thresholds must be finite".to_string(),
            ));
        }
        if self.down >= self.up {
            return Err(reptrack_core::Error::Config(format!(
                "down threshold {} must be below up threshold {}",
                self.down, self.up
            )));
        }
        if self.classify >= self.up {
            return Err(reptrack_core::Error::Config(format!(
                "classify threshold {} must be below up threshold {}",
                self.classify, self.up
            )));
        }
        Ok(())
    }
}

/// Mutable per-session counter state, owned exclusively by one session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Completed repetitions; monotonically non-decreasing until reset
    pub rep_count: u32,
    pub stage: Stage,
    /// Last stable classification; persists across frames above the
    /// classify threshold and frames with no detection
    pub pushup_type: PushupType,
    /// Lowest primary angle observed since the stage last headed down
    pub min_angle: f64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            rep_count: 0,
            stage: Stage::Unset,
            pushup_type: PushupType::None,
            min_angle: MIN_ANGLE_SENTINEL,
        }
    }

    /// Restore all fields to their initial values. Idempotent.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-frame output of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub rep_count: u32,
    pub pushup_type: PushupType,
    pub stage: Stage,
    /// Averaged elbow angle for this frame, absent when no primary
    /// angle could be derived (no detection or missing arm landmarks)
    pub avg_angle: Option<f64>,
    /// True on exactly the frame that completed a repetition
    pub rep_completed: bool,
}

impl FrameResult {
    fn passthrough(state: &SessionState) -> Self {
        Self {
            rep_count: state.rep_count,
            pushup_type: state.pushup_type,
            stage: state.stage,
            avg_angle: None,
            rep_completed: false,
        }
    }
}

fn elbow_angle(
    snapshot: &LandmarkSnapshot,
    shoulder: PoseLandmark,
    elbow: PoseLandmark,
    wrist: PoseLandmark,
) -> Option<f64> {
    let shoulder: Position2D = snapshot.get(shoulder)?.position;
    let elbow_pos: Position2D = snapshot.get(elbow)?.position;
    let wrist: Position2D = snapshot.get(wrist)?.position;
    Some(joint_angle(shoulder, elbow_pos, wrist))
}

/// Averaged left/right elbow flexion angle, the primary angle driving
/// counting and classification gating. `None` when either arm chain is
/// incomplete.
pub fn primary_angle(snapshot: &LandmarkSnapshot) -> Option<f64> {
    let left = elbow_angle(
        snapshot,
        PoseLandmark::LeftShoulder,
        PoseLandmark::LeftElbow,
        PoseLandmark::LeftWrist,
    )?;
    let right = elbow_angle(
        snapshot,
        PoseLandmark::RightShoulder,
        PoseLandmark::RightElbow,
        PoseLandmark::RightWrist,
    )?;
    Some((left + right) / 2.0)
}

/// Advance the state machine by one frame.
///
/// A `None` snapshot (no person detected) performs no transition and
/// echoes the current state. Malformed coordinates fail fast with
/// `InvalidLandmarkData` before any state is touched.
pub fn process_frame(
    state: &mut SessionState,
    snapshot: Option<&LandmarkSnapshot>,
    thresholds: &Thresholds,
) -> Result<FrameResult> {
    let Some(snapshot) = snapshot else {
        return Ok(FrameResult::passthrough(state));
    };

    snapshot.validate()?;

    let Some(avg_angle) = primary_angle(snapshot) else {
        // Arm chain incomplete: no primary angle, so no transition.
        return Ok(FrameResult::passthrough(state));
    };

    // Near full flexion: reclassify the variant and track the bottom of
    // the motion. A failed classification keeps the previous label.
    if avg_angle <= thresholds.classify {
        match classify(snapshot) {
            Ok(pushup_type) => state.pushup_type = pushup_type,
            Err(e) => tracing::warn!("classification skipped this frame: {}", e),
        }

        if avg_angle < state.min_angle {
            state.min_angle = avg_angle;
        }
    }

    let mut rep_completed = false;

    if avg_angle >= thresholds.up {
        if state.stage == Stage::Down && state.min_angle < thresholds.down {
            state.rep_count += 1;
            state.stage = Stage::Up;
            state.min_angle = MIN_ANGLE_SENTINEL;
            rep_completed = true;
            tracing::debug!(
                rep_count = state.rep_count,
                pushup_type = state.pushup_type.label(),
                "repetition completed"
            );
        } else if state.stage != Stage::Up {
            // Initial extension, or an up without a valid bottom: enter
            // the up stage without awarding a count. The min-angle
            // tracker restarts so a pre-baseline dip cannot validate a
            // later cycle.
            state.stage = Stage::Up;
            state.min_angle = MIN_ANGLE_SENTINEL;
            tracing::debug!(avg_angle, "entered up stage");
        }
    } else if avg_angle <= thresholds.down {
        if state.stage == Stage::Up {
            state.stage = Stage::Down;
            tracing::debug!(avg_angle, "entered down stage");
        }
    }
    // Strictly between the thresholds: dead zone, no transition.

    Ok(FrameResult {
        rep_count: state.rep_count,
        pushup_type: state.pushup_type,
        stage: state.stage,
        avg_angle: Some(avg_angle),
        rep_completed,
    })
}
