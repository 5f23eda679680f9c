//! Geometric utilities for landmark computations.

use crate::types::Position2D;

/// Interior angle at vertex `b` formed by rays `b -> a` and `b -> c`,
/// in degrees within [0, 180].
///
/// Computed from the difference of `atan2` bearings and folded so that
/// reflex angles map back into range (angle > 180 becomes 360 - angle).
/// The same routine is used for every three-point angle in the system
/// (elbow flexion, hip angle) so that any bias is consistent across
/// features. Zero-length rays are not guarded; the fold still keeps the
/// result within [0, 180].
pub fn joint_angle(a: Position2D, b: Position2D, c: Position2D) -> f64 {
    let bearing_ac = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut angle = bearing_ac.to_degrees().abs();

    if angle > 180.0 {
        angle = 360.0 - angle;
    }

    angle
}

/// Euclidean distance between two points in normalized coordinate space
pub fn distance(a: Position2D, b: Position2D) -> f64 {
    a.distance_to(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_line_is_180() {
        let a = Position2D::new(0.0, 0.5);
        let b = Position2D::new(0.5, 0.5);
        let c = Position2D::new(1.0, 0.5);
        assert!((joint_angle(a, b, c) - 180.0).abs() < 1e-10);
    }

    #[test]
    fn test_right_angle() {
        let a = Position2D::new(0.0, 0.0);
        let b = Position2D::new(0.5, 0.0);
        let c = Position2D::new(0.5, 0.5);
        assert!((joint_angle(a, b, c) - 90.0).abs() < 1e-10);
    }

    #[test]
    fn test_reflex_angle_folds_into_range() {
        // Rays at bearings 170 and -170 degrees: raw difference is 340,
        // which must fold to 20.
        let b = Position2D::new(0.5, 0.5);
        let a = Position2D::new(
            0.5 + (170f64).to_radians().cos(),
            0.5 + (170f64).to_radians().sin(),
        );
        let c = Position2D::new(
            0.5 + (-170f64).to_radians().cos(),
            0.5 + (-170f64).to_radians().sin(),
        );
        assert!((joint_angle(a, b, c) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_symmetric_in_endpoints() {
        let a = Position2D::new(0.1, 0.8);
        let b = Position2D::new(0.4, 0.3);
        let c = Position2D::new(0.9, 0.6);
        assert!((joint_angle(a, b, c) - joint_angle(c, b, a)).abs() < 1e-12);
    }

    #[test]
    fn test_distance_identical_points() {
        let p = Position2D::new(0.3, 0.7);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn test_distance_345() {
        let a = Position2D::new(0.0, 0.0);
        let b = Position2D::new(0.06, 0.08);
        assert!((distance(a, b) - 0.1).abs() < 1e-12);
    }
}
