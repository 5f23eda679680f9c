//! Fundamental types for the RepTrack system.

use chrono::{DateTime, Utc};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Unique identifier for an exercise-tracking session (one per active stream)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Timestamp wrapper with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_nanos_opt().unwrap_or(0))
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.0)
    }
}

/// 33-point body landmark definition (MediaPipe BlazePose topology)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    pub const COUNT: usize = 33;

    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEyeInner),
            2 => Some(Self::LeftEye),
            3 => Some(Self::LeftEyeOuter),
            4 => Some(Self::RightEyeInner),
            5 => Some(Self::RightEye),
            6 => Some(Self::RightEyeOuter),
            7 => Some(Self::LeftEar),
            8 => Some(Self::RightEar),
            9 => Some(Self::MouthLeft),
            10 => Some(Self::MouthRight),
            11 => Some(Self::LeftShoulder),
            12 => Some(Self::RightShoulder),
            13 => Some(Self::LeftElbow),
            14 => Some(Self::RightElbow),
            15 => Some(Self::LeftWrist),
            16 => Some(Self::RightWrist),
            17 => Some(Self::LeftPinky),
            18 => Some(Self::RightPinky),
            19 => Some(Self::LeftIndex),
            20 => Some(Self::RightIndex),
            21 => Some(Self::LeftThumb),
            22 => Some(Self::RightThumb),
            23 => Some(Self::LeftHip),
            24 => Some(Self::RightHip),
            25 => Some(Self::LeftKnee),
            26 => Some(Self::RightKnee),
            27 => Some(Self::LeftAnkle),
            28 => Some(Self::RightAnkle),
            29 => Some(Self::LeftHeel),
            30 => Some(Self::RightHeel),
            31 => Some(Self::LeftFootIndex),
            32 => Some(Self::RightFootIndex),
            _ => None,
        }
    }

    /// Returns skeleton connectivity pairs for visualization
    pub fn skeleton_pairs() -> &'static [(PoseLandmark, PoseLandmark)] {
        &[
            (PoseLandmark::LeftShoulder, PoseLandmark::RightShoulder),
            (PoseLandmark::LeftShoulder, PoseLandmark::LeftElbow),
            (PoseLandmark::LeftElbow, PoseLandmark::LeftWrist),
            (PoseLandmark::RightShoulder, PoseLandmark::RightElbow),
            (PoseLandmark::RightElbow, PoseLandmark::RightWrist),
            (PoseLandmark::LeftShoulder, PoseLandmark::LeftHip),
            (PoseLandmark::RightShoulder, PoseLandmark::RightHip),
            (PoseLandmark::LeftHip, PoseLandmark::RightHip),
            (PoseLandmark::LeftHip, PoseLandmark::LeftKnee),
            (PoseLandmark::LeftKnee, PoseLandmark::LeftAnkle),
            (PoseLandmark::RightHip, PoseLandmark::RightKnee),
            (PoseLandmark::RightKnee, PoseLandmark::RightAnkle),
        ]
    }
}

/// 2D position in normalized image coordinates ([0,1] x [0,1])
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn from_nalgebra(p: Point2<f64>) -> Self {
        Self::new(p.x, p.y)
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.to_nalgebra() - other.to_nalgebra()).norm()
    }
}

/// Landmark detection with visibility score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkDetection {
    pub landmark: PoseLandmark,
    pub position: Position2D,
    pub visibility: f32,
}

impl LandmarkDetection {
    pub fn new(landmark: PoseLandmark, position: Position2D, visibility: f32) -> Self {
        Self {
            landmark,
            position,
            visibility,
        }
    }
}

/// Immutable per-frame snapshot of detected body landmarks.
///
/// Produced once per frame by the external pose model. Absent detections
/// are represented as `None` slots; a frame with no person at all is
/// represented by the absence of a snapshot, not an empty one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkSnapshot {
    pub timestamp: Timestamp,
    #[serde(with = "landmark_array")]
    pub landmarks: [Option<LandmarkDetection>; PoseLandmark::COUNT],
}

/// Serde helpers for the fixed landmark array. Serde only provides
/// array impls up to length 32, so the 33 slots go through a length-
/// checked `Vec` on the wire.
mod landmark_array {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{LandmarkDetection, PoseLandmark};

    pub fn serialize<S>(
        landmarks: &[Option<LandmarkDetection>; PoseLandmark::COUNT],
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        landmarks.as_slice().serialize(serializer)
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<[Option<LandmarkDetection>; PoseLandmark::COUNT], D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<Option<LandmarkDetection>>::deserialize(deserializer)?;
        if entries.len() != PoseLandmark::COUNT {
            return Err(D::Error::invalid_length(
                entries.len(),
                &"a landmark array of length 33",
            ));
        }

        let mut landmarks = [None; PoseLandmark::COUNT];
        landmarks.copy_from_slice(&entries);
        Ok(landmarks)
    }
}

impl LandmarkSnapshot {
    pub fn empty(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            landmarks: [None; PoseLandmark::COUNT],
        }
    }

    pub fn set(&mut self, detection: LandmarkDetection) {
        self.landmarks[detection.landmark as usize] = Some(detection);
    }

    pub fn get(&self, landmark: PoseLandmark) -> Option<&LandmarkDetection> {
        self.landmarks[landmark as usize].as_ref()
    }

    /// Position of a landmark, or a `ClassificationUnavailable` error when
    /// the pose model did not detect it this frame.
    pub fn position_of(&self, landmark: PoseLandmark) -> Result<Position2D> {
        self.get(landmark)
            .map(|d| d.position)
            .ok_or(Error::ClassificationUnavailable { landmark })
    }

    pub fn detection_count(&self) -> usize {
        self.landmarks.iter().filter(|d| d.is_some()).count()
    }

    /// Fail fast on malformed coordinates rather than letting NaN
    /// propagate into angle computations and counter state.
    pub fn validate(&self) -> Result<()> {
        for detection in self.landmarks.iter().flatten() {
            if !detection.position.is_finite() {
                return Err(Error::InvalidLandmarkData(format!(
                    "non-finite coordinates for {:?}: ({}, {})",
                    detection.landmark, detection.position.x, detection.position.y
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let p1 = Position2D::new(0.0, 0.0);
        let p2 = Position2D::new(0.3, 0.4);
        assert!((p1.distance_to(&p2) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_landmark_roundtrip() {
        for i in 0..PoseLandmark::COUNT as u8 {
            let landmark = PoseLandmark::from_index(i).unwrap();
            assert_eq!(landmark as u8, i);
        }
        assert!(PoseLandmark::from_index(33).is_none());
    }

    #[test]
    fn test_snapshot_set_get() {
        let mut snapshot = LandmarkSnapshot::empty(Timestamp::from_nanos(0));
        assert_eq!(snapshot.detection_count(), 0);

        snapshot.set(LandmarkDetection::new(
            PoseLandmark::LeftElbow,
            Position2D::new(0.4, 0.5),
            0.95,
        ));

        assert_eq!(snapshot.detection_count(), 1);
        assert!(snapshot.get(PoseLandmark::LeftElbow).is_some());
        assert!(snapshot.get(PoseLandmark::RightElbow).is_none());
    }

    #[test]
    fn test_position_of_missing_landmark() {
        let snapshot = LandmarkSnapshot::empty(Timestamp::from_nanos(0));
        let err = snapshot.position_of(PoseLandmark::LeftWrist).unwrap_err();
        assert!(matches!(
            err,
            Error::ClassificationUnavailable {
                landmark: PoseLandmark::LeftWrist
            }
        ));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut snapshot = LandmarkSnapshot::empty(Timestamp::from_nanos(0));
        snapshot.set(LandmarkDetection::new(
            PoseLandmark::Nose,
            Position2D::new(f64::NAN, 0.5),
            0.9,
        ));
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let mut snapshot = LandmarkSnapshot::empty(Timestamp::from_nanos(42));
        snapshot.set(LandmarkDetection::new(
            PoseLandmark::LeftElbow,
            Position2D::new(0.4, 0.5),
            0.95,
        ));

        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: LandmarkSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.timestamp, snapshot.timestamp);
        assert_eq!(decoded.detection_count(), 1);
        assert_eq!(
            decoded.get(PoseLandmark::LeftElbow),
            snapshot.get(PoseLandmark::LeftElbow)
        );
    }

    #[test]
    fn test_snapshot_rejects_wrong_landmark_count() {
        let json = r#"{"timestamp":0,"landmarks":[null,null,null]}"#;
        assert!(serde_json::from_str::<LandmarkSnapshot>(json).is_err());
    }
}
