// Rotary parallel delta kinematics
//
// Three motor cranks sit on a fixed triangle at 0, 120 and 240 degrees
// around the tower axis. Each crank drives a parallelogram linkage down to
// the effector triangle. Joint coordinates are crank angles in radians.

use crate::{
    error::{KinematicError, Result},
    geometry::DeltaGeometry,
    kinematics::{ForwardKinematics, InverseKinematics, require_axes, with_passthrough},
    pose::{CartesianPose, JointPose, KINEMATIC_AXES},
};
use std::f64::consts::PI;

const SQRT3: f64 = 1.732_050_807_568_877_2;
const SIN120: f64 = SQRT3 / 2.0;
const COS120: f64 = -0.5;
const TAN60: f64 = SQRT3;
const SIN30: f64 = 0.5;
const TAN30: f64 = 1.0 / SQRT3;

/// Rotary delta - three cranks with parallelogram arms to the effector
#[derive(Debug, Clone)]
pub struct DeltaKin {
    geometry: DeltaGeometry,
}

impl DeltaKin {
    pub fn new(geometry: DeltaGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &DeltaGeometry {
        &self.geometry
    }

    /// Crank angles for an effector position.
    ///
    /// All three arms must solve; the first failing arm aborts the solve.
    pub fn solve(&self, x: f64, y: f64, z: f64) -> Result<[f64; 3]> {
        Ok([
            self.arm_angle(0, x, y, z)?,
            // rotate coords to +120 deg
            self.arm_angle(1, x * COS120 + y * SIN120, y * COS120 - x * SIN120, z)?,
            // rotate coords to -120 deg
            self.arm_angle(2, x * COS120 - y * SIN120, y * COS120 + x * SIN120, z)?,
        ])
    }

    // Solve one arm in its own YZ plane
    fn arm_angle(&self, arm: usize, x0: f64, y0: f64, z0: f64) -> Result<f64> {
        let DeltaGeometry {
            crank_length: rf,
            link_length: re,
            crank_side_length: f,
            effector_side_length: e,
            ..
        } = self.geometry;

        let y1 = -0.5 * TAN30 * f;
        // shift center to edge
        let y0 = y0 - 0.5 * TAN30 * e;
        // z = a + b*y
        let a = (x0 * x0 + y0 * y0 + z0 * z0 + rf * rf - re * re - y1 * y1) / (2.0 * z0);
        let b = (y1 - y0) / z0;

        // A target in the crank plane (z0 == 0) leaves d as NaN, which
        // fails this comparison too.
        let d = -(a + b * y1) * (a + b * y1) + rf * (b * b * rf + rf);
        if !(d >= 0.0) {
            return Err(KinematicError::OutOfRange { discriminant: d });
        }

        // Outer intersection; the inner one is mechanically impossible
        let yj = (y1 - a * b - d.sqrt()) / (b * b + 1.0);
        let zj = a + b * yj;
        let theta = (-zj / (y1 - yj)).atan() + if yj > y1 { PI } else { 0.0 };

        if theta < self.geometry.max_negative_angle {
            return Err(KinematicError::AngleTooNegative {
                arm,
                angle: theta,
                limit: self.geometry.max_negative_angle,
            });
        }
        if theta > self.geometry.max_positive_angle {
            return Err(KinematicError::AngleTooPositive {
                arm,
                angle: theta,
                limit: self.geometry.max_positive_angle,
            });
        }
        Ok(theta)
    }

    /// Effector position for three crank angles.
    ///
    /// Intersects the three spheres centred on the crank tips. A negative
    /// discriminant means the angles cannot coexist on this machine.
    pub fn effector_position(&self, angles: [f64; 3]) -> Result<[f64; 3]> {
        let DeltaGeometry {
            crank_length: rf,
            link_length: re,
            crank_side_length: f,
            effector_side_length: e,
            ..
        } = self.geometry;

        let t = (f - e) * TAN30 / 2.0;

        let y1 = -(t + rf * angles[0].cos());
        let z1 = -rf * angles[0].sin();

        let y2 = (t + rf * angles[1].cos()) * SIN30;
        let x2 = y2 * TAN60;
        let z2 = -rf * angles[1].sin();

        let y3 = (t + rf * angles[2].cos()) * SIN30;
        let x3 = -y3 * TAN60;
        let z3 = -rf * angles[2].sin();

        let dnm = (y2 - y1) * x3 - (y3 - y1) * x2;

        let w1 = y1 * y1 + z1 * z1;
        let w2 = x2 * x2 + y2 * y2 + z2 * z2;
        let w3 = x3 * x3 + y3 * y3 + z3 * z3;

        // x = (a1*z + b1)/dnm
        let a1 = (z2 - z1) * (y3 - y1) - (z3 - z1) * (y2 - y1);
        let b1 = -((w2 - w1) * (y3 - y1) - (w3 - w1) * (y2 - y1)) / 2.0;

        // y = (a2*z + b2)/dnm
        let a2 = -(z2 - z1) * x3 + (z3 - z1) * x2;
        let b2 = ((w2 - w1) * x3 - (w3 - w1) * x2) / 2.0;

        // a*z^2 + b*z + c = 0
        let a = a1 * a1 + a2 * a2 + dnm * dnm;
        let b = 2.0 * (a1 * b1 + a2 * (b2 - y1 * dnm) - z1 * dnm * dnm);
        let c = (b2 - y1 * dnm) * (b2 - y1 * dnm) + b1 * b1 + dnm * dnm * (z1 * z1 - re * re);

        let d = b * b - 4.0 * a * c;
        if !(d >= 0.0) || dnm == 0.0 {
            return Err(KinematicError::GeometryInconsistent);
        }

        let z = -0.5 * (b + d.sqrt()) / a;
        Ok([(a1 * z + b1) / dnm, (a2 * z + b2) / dnm, z])
    }

    /// Effector height below the crank axes with every arm horizontal.
    pub fn z_offset(&self) -> Result<f64> {
        Ok(self.effector_position([0.0; 3])?[2])
    }
}

impl InverseKinematics for DeltaKin {
    fn inverse(&self, target: &CartesianPose, _last: &JointPose) -> Result<JointPose> {
        require_axes(target.axis_count(), KINEMATIC_AXES)?;
        let angles = self.solve(target[0], target[1], target[2])?;
        Ok(with_passthrough(&angles, target, KINEMATIC_AXES).into())
    }
}

impl ForwardKinematics for DeltaKin {
    fn forward(&self, joints: &JointPose) -> Result<CartesianPose> {
        require_axes(joints.axis_count(), KINEMATIC_AXES)?;
        let position = self.effector_position([joints[0], joints[1], joints[2]])?;
        Ok(with_passthrough(&position, joints, KINEMATIC_AXES).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn tapster() -> DeltaKin {
        DeltaKin::new(DeltaGeometry::tapster_3())
    }

    fn assert_close(actual: &[f64], expected: &[f64], eps: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < eps, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn symmetric_point_gives_equal_angles() {
        let angles = tapster().solve(0.0, 0.0, -150.0).unwrap();
        assert_close(&angles, &[0.680_461_8; 3], 1e-6);
    }

    #[test]
    fn forward_inverts_inverse() {
        let kin = tapster();
        for point in [
            [0.0, 0.0, -150.0],
            [20.0, -10.0, -140.0],
            [30.0, 30.0, -170.0],
            [-40.0, 15.0, -120.0],
            [10.0, 5.0, -180.0],
        ] {
            let angles = kin.solve(point[0], point[1], point[2]).unwrap();
            let back = kin.effector_position(angles).unwrap();
            assert_close(&back, &point, 1e-3);
        }
    }

    #[test]
    fn rejects_points_outside_the_volume() {
        let kin = tapster();
        for point in [[0.0, 0.0, -220.0], [300.0, 0.0, -150.0], [0.0, 0.0, -50.0]] {
            let err = kin.solve(point[0], point[1], point[2]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OutOfRange, "{point:?}");
        }
    }

    #[test]
    fn crank_plane_is_out_of_range() {
        let err = tapster().solve(0.0, 0.0, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn reports_arm_above_negative_limit() {
        // arm 0 would have to swing up ~62.6 degrees, past the 60 degree stop
        let err = tapster().solve(0.0, -40.0, -70.0).unwrap_err();
        match err {
            KinematicError::AngleTooNegative { arm, angle, limit } => {
                assert_eq!(arm, 0);
                assert!(angle < limit);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn reports_arm_below_positive_limit() {
        let kin = DeltaKin::new(DeltaGeometry {
            max_positive_angle: 1.0,
            ..DeltaGeometry::tapster_3()
        });
        let err = kin.solve(0.0, 0.0, -200.0).unwrap_err();
        assert!(matches!(err, KinematicError::AngleTooPositive { .. }));
    }

    #[test]
    fn zero_angle_offset_is_below_the_cranks() {
        let offset = tapster().z_offset().unwrap();
        assert!((offset + 91.935_854).abs() < 1e-4, "{offset}");
    }

    #[test]
    fn inconsistent_angles_fail_forward() {
        // links far too short to bridge the gap between horizontal cranks
        let kin = DeltaKin::new(DeltaGeometry {
            link_length: 50.0,
            ..DeltaGeometry::tapster_pro()
        });
        let err = kin.effector_position([0.0; 3]).unwrap_err();
        assert_eq!(err, KinematicError::GeometryInconsistent);
    }

    #[test]
    fn trailing_axes_pass_through() {
        let kin = tapster();
        let target = CartesianPose::from([0.0, 0.0, -150.0, 42.0]);
        let joints = kin.inverse(&target, &JointPose::zeros(4)).unwrap();
        assert_eq!(joints.axis_count(), 4);
        assert_eq!(joints[3], 42.0);
        let back = kin.forward(&joints).unwrap();
        assert_close(&back, &target, 1e-6);
    }

    #[test]
    fn short_pose_is_rejected() {
        let err = tapster()
            .inverse(&CartesianPose::from([0.0, 0.0]), &JointPose::default())
            .unwrap_err();
        assert_eq!(err, KinematicError::AxisCount {
            expected: 3,
            actual: 2
        });
    }
}
