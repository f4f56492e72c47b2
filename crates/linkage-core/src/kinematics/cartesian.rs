// Cartesian kinematics - joints are the machine axes

use crate::{
    error::Result,
    kinematics::{ForwardKinematics, InverseKinematics},
    pose::{CartesianPose, JointPose},
};

/// Identity mapping for machines whose actuators drive X/Y/Z directly
#[derive(Debug, Clone, Copy, Default)]
pub struct CartesianKin;

impl InverseKinematics for CartesianKin {
    fn inverse(&self, target: &CartesianPose, _last: &JointPose) -> Result<JointPose> {
        Ok(JointPose::new(target.to_vec()))
    }
}

impl ForwardKinematics for CartesianKin {
    fn forward(&self, joints: &JointPose) -> Result<CartesianPose> {
        Ok(CartesianPose::new(joints.to_vec()))
    }
}
