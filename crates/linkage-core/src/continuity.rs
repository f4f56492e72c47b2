//! Joint-space continuity between emitted segments.

use crate::pose::{JointPose, KINEMATIC_AXES};

/// Last joint pose handed to the motion queue.
///
/// Owned by the caller and threaded through every move by `&mut`. Only the
/// segmenter advances it, and only after the queue accepted a segment.
/// [`ContinuityState::reset`] is for start-up and homing completion, which
/// redefine the reference the next move is measured from.
///
/// A host that lets an interrupt path read this while a move is being
/// segmented has to serialise access itself, e.g. behind a mutex.
#[derive(Clone, Debug, PartialEq)]
pub struct ContinuityState {
    last: JointPose,
}

impl ContinuityState {
    pub fn new(initial: JointPose) -> Self {
        Self { last: initial }
    }

    pub fn last(&self) -> &JointPose {
        &self.last
    }

    pub fn reset(&mut self, joints: JointPose) {
        self.last = joints;
    }

    pub(crate) fn record(&mut self, joints: JointPose) {
        self.last = joints;
    }

    /// Distance in joint space from the last emitted pose to `next`.
    pub fn distance_to(&self, next: &JointPose) -> f64 {
        joint_distance(&self.last, next)
    }
}

/// Euclidean distance over the kinematic joints of two poses.
pub fn joint_distance(a: &JointPose, b: &JointPose) -> f64 {
    a.distance_over(b, KINEMATIC_AXES)
}

/// Folds an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let folded = angle.rem_euclid(360.0);
    // rem_euclid can round a tiny negative input up to exactly 360
    if folded >= 360.0 { 0.0 } else { folded }
}

/// Places a normalised angle next to `previous` without a full turn.
///
/// `previous` may have accumulated any number of revolutions over a job.
/// The result differs from it by at most 180°, continuing past the 0/360
/// boundary instead of sweeping back the long way.
pub fn unwrap_degrees(normalized: f64, previous: f64) -> f64 {
    let delta = normalized - normalize_degrees(previous);
    if delta.abs() <= 180.0 {
        previous + delta
    } else if delta > 0.0 {
        previous + delta - 360.0
    } else {
        previous + delta + 360.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_negative_and_large_angles() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-1e-20), 0.0);
    }

    #[test]
    fn unwrap_crosses_zero_forwards() {
        assert_eq!(unwrap_degrees(10.0, 350.0), 370.0);
        assert_eq!(unwrap_degrees(20.0, 370.0), 380.0);
    }

    #[test]
    fn unwrap_crosses_zero_backwards() {
        assert_eq!(unwrap_degrees(350.0, 10.0), -10.0);
        assert_eq!(unwrap_degrees(350.0, 370.0), 350.0);
        assert_eq!(unwrap_degrees(340.0, -10.0), -20.0);
    }

    #[test]
    fn unwrap_keeps_small_moves() {
        assert_eq!(unwrap_degrees(100.0, 90.0), 100.0);
        assert_eq!(unwrap_degrees(100.0, 810.0), 820.0);
    }

    #[test]
    fn distance_uses_kinematic_joints_only() {
        let a = JointPose::from([0.0, 0.0, 0.0, 50.0]);
        let b = JointPose::from([1.0, 2.0, 2.0, -50.0]);
        assert_eq!(joint_distance(&a, &b), 3.0);
        assert_eq!(ContinuityState::new(a).distance_to(&b), 3.0);
    }
}
