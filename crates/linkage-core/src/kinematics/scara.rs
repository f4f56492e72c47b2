// SCARA kinematics
//
// Two revolute links in the XY plane with a linear Z. Joint coordinates are
// [shoulder, elbow] in degrees followed by Z and any extra axes unchanged.
// The elbow is measured relative to the upper link.

use crate::{
    continuity::{normalize_degrees, unwrap_degrees},
    error::{KinematicError, Result},
    geometry::ScaraGeometry,
    kinematics::{ForwardKinematics, InverseKinematics, require_axes, with_passthrough},
    pose::{CartesianPose, JointPose},
};

const PLANAR_AXES: usize = 2;

/// SCARA - shoulder and elbow joints with a pass-through Z axis
#[derive(Debug, Clone)]
pub struct ScaraKin {
    geometry: ScaraGeometry,
}

impl ScaraKin {
    pub fn new(geometry: ScaraGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &ScaraGeometry {
        &self.geometry
    }

    /// Shoulder and elbow angles reaching `(x, y)`.
    ///
    /// `last_shoulder` is the previously emitted shoulder angle. The returned
    /// shoulder continues from it across the 0/360 line, so over a long job
    /// it may accumulate well outside one revolution.
    pub fn solve(&self, x: f64, y: f64, last_shoulder: f64) -> Result<(f64, f64)> {
        let ScaraGeometry {
            length_r1: l1,
            length_r2: l2,
        } = self.geometry;

        let r2 = x * x + y * y;
        let cos = (r2 - l1 * l1 - l2 * l2) / (2.0 * l1 * l2);
        // Beyond l1 + l2 or inside |l1 - l2|; also catches non-finite input
        if !(cos.abs() <= 1.0) {
            return Err(KinematicError::OutOfRange {
                discriminant: 1.0 - cos * cos,
            });
        }

        if r2 == 0.0 {
            // No heading at the shoulder axis: hold the shoulder, fold the elbow
            return Ok((last_shoulder, -last_shoulder));
        }

        let sin = (1.0 - cos * cos).sqrt();
        let shoulder = y.atan2(x) - (l2 * sin).atan2(l1 + l2 * cos);
        let elbow = sin.atan2(cos);

        let shoulder = unwrap_degrees(normalize_degrees(shoulder.to_degrees()), last_shoulder);
        Ok((shoulder, elbow.to_degrees()))
    }

    /// Tool position in the XY plane for joint angles in degrees.
    pub fn planar_position(&self, shoulder: f64, elbow: f64) -> (f64, f64) {
        let ScaraGeometry {
            length_r1: l1,
            length_r2: l2,
        } = self.geometry;
        let t1 = shoulder.to_radians();
        let t12 = t1 + elbow.to_radians();
        (l1 * t1.cos() + l2 * t12.cos(), l1 * t1.sin() + l2 * t12.sin())
    }
}

impl InverseKinematics for ScaraKin {
    fn inverse(&self, target: &CartesianPose, last: &JointPose) -> Result<JointPose> {
        require_axes(target.axis_count(), PLANAR_AXES)?;
        let (shoulder, elbow) = self.solve(target[0], target[1], last.get_or_zero(0))?;
        Ok(with_passthrough(&[shoulder, elbow], target, PLANAR_AXES).into())
    }
}

impl ForwardKinematics for ScaraKin {
    fn forward(&self, joints: &JointPose) -> Result<CartesianPose> {
        require_axes(joints.axis_count(), PLANAR_AXES)?;
        let (x, y) = self.planar_position(joints[0], joints[1]);
        if !(x.is_finite() && y.is_finite()) {
            return Err(KinematicError::GeometryInconsistent);
        }
        Ok(with_passthrough(&[x, y], joints, PLANAR_AXES).into())
    }
}
