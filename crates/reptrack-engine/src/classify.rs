//! Push-up variant classification from landmark geometry.
//!
//! The variant is derived from how far apart the hands are planted
//! relative to shoulder width, with a hip-angle check separating pike
//! push-ups from very wide arm placement. The classifier is stateless:
//! the same snapshot always yields the same label.

use serde::{Deserialize, Serialize};

use reptrack_core::{distance, joint_angle, LandmarkSnapshot, PoseLandmark, Result};

/// Push-up variant label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PushupType {
    None,
    Diamond,
    Regular,
    WideArm,
    VeryWideArm,
    Pike,
}

impl PushupType {
    /// Display label matching the wire format consumed by clients
    pub fn label(&self) -> &'static str {
        match self {
            PushupType::None => "none",
            PushupType::Diamond => "diamond",
            PushupType::Regular => "regular",
            PushupType::WideArm => "wide arm",
            PushupType::VeryWideArm => "very wide arm",
            PushupType::Pike => "pike",
        }
    }
}

impl Default for PushupType {
    fn default() -> Self {
        PushupType::None
    }
}

/// Wrist spacing below this fraction of shoulder width is a diamond push-up
const DIAMOND_RATIO: f64 = 0.5;
/// Below this, hands are roughly shoulder width apart
const REGULAR_RATIO: f64 = 0.8;
/// Below this, wide arm; beyond it the hip angle decides pike vs very wide
const WIDE_ARM_RATIO: f64 = 1.5;
/// Hip angle below this indicates the piked (inverted-V) body position
const PIKE_HIP_ANGLE: f64 = 100.0;

/// Classify the push-up variant from a full landmark snapshot.
///
/// Requires both shoulders and wrists, plus the left hip and knee for
/// the pike check. A missing landmark yields
/// `Error::ClassificationUnavailable`; callers treat that as "keep the
/// previous label for this frame".
///
/// When the shoulders coincide the spacing ratio defaults to 0 and the
/// frame classifies as diamond. Inherited behavior, kept for parity
/// with the reference detector.
pub fn classify(snapshot: &LandmarkSnapshot) -> Result<PushupType> {
    let left_shoulder = snapshot.position_of(PoseLandmark::LeftShoulder)?;
    let right_shoulder = snapshot.position_of(PoseLandmark::RightShoulder)?;
    let left_wrist = snapshot.position_of(PoseLandmark::LeftWrist)?;
    let right_wrist = snapshot.position_of(PoseLandmark::RightWrist)?;

    let shoulder_distance = distance(left_shoulder, right_shoulder);
    let wrist_distance = distance(left_wrist, right_wrist);

    // Normalizing by shoulder width keeps the thresholds independent of
    // camera distance and body size.
    let ratio = if shoulder_distance > 0.0 {
        wrist_distance / shoulder_distance
    } else {
        0.0
    };

    if ratio < DIAMOND_RATIO {
        Ok(PushupType::Diamond)
    } else if ratio < REGULAR_RATIO {
        Ok(PushupType::Regular)
    } else if ratio < WIDE_ARM_RATIO {
        Ok(PushupType::WideArm)
    } else {
        let left_hip = snapshot.position_of(PoseLandmark::LeftHip)?;
        let left_knee = snapshot.position_of(PoseLandmark::LeftKnee)?;
        let hip_angle = joint_angle(left_shoulder, left_hip, left_knee);

        if hip_angle < PIKE_HIP_ANGLE {
            Ok(PushupType::Pike)
        } else {
            Ok(PushupType::VeryWideArm)
        }
    }
}
