// Kinematics systems for the supported machine topologies

use crate::{
    error::{KinematicError, Result},
    geometry::MachineGeometry,
    pose::{CartesianPose, JointPose},
};

// Submodules for each kinematics system
pub mod cartesian;
pub mod delta;
pub mod scara;

pub use cartesian::CartesianKin;
pub use delta::DeltaKin;
pub use scara::ScaraKin;

/// Cartesian target to joint pose.
///
/// `last` is the previously emitted joint pose. Solvers for revolute joints
/// use it to keep angles continuous; the others ignore it.
pub trait InverseKinematics {
    fn inverse(&self, target: &CartesianPose, last: &JointPose) -> Result<JointPose>;
}

/// Joint pose back to Cartesian, for position reporting.
pub trait ForwardKinematics {
    fn forward(&self, joints: &JointPose) -> Result<CartesianPose>;
}

/// The machine's kinematics, selected once from its geometry.
#[derive(Debug, Clone)]
pub enum Kinematics {
    Delta(DeltaKin),
    Scara(ScaraKin),
    Cartesian(CartesianKin),
}

impl Kinematics {
    pub fn from_geometry(geometry: &MachineGeometry) -> Result<Self> {
        geometry.validate()?;
        Ok(match *geometry {
            MachineGeometry::Delta(g) => Self::Delta(DeltaKin::new(g)),
            MachineGeometry::Scara(g) => Self::Scara(ScaraKin::new(g)),
            MachineGeometry::Cartesian => Self::Cartesian(CartesianKin),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Delta(_) => "delta",
            Self::Scara(_) => "scara",
            Self::Cartesian(_) => "cartesian",
        }
    }

    /// Whether both endpoints of a move are solved before segmenting.
    pub fn requires_prevalidation(&self) -> bool {
        !matches!(self, Self::Cartesian(_))
    }

    /// Linear mappings need no interpolation between endpoints.
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Cartesian(_))
    }
}

impl InverseKinematics for Kinematics {
    fn inverse(&self, target: &CartesianPose, last: &JointPose) -> Result<JointPose> {
        match self {
            Self::Delta(k) => k.inverse(target, last),
            Self::Scara(k) => k.inverse(target, last),
            Self::Cartesian(k) => k.inverse(target, last),
        }
    }
}

impl ForwardKinematics for Kinematics {
    fn forward(&self, joints: &JointPose) -> Result<CartesianPose> {
        match self {
            Self::Delta(k) => k.forward(joints),
            Self::Scara(k) => k.forward(joints),
            Self::Cartesian(k) => k.forward(joints),
        }
    }
}

fn require_axes(actual: usize, expected: usize) -> Result<()> {
    if actual < expected {
        return Err(KinematicError::AxisCount { expected, actual });
    }
    Ok(())
}

/// Solved leading coordinates followed by `source[skip..]` unchanged.
fn with_passthrough(solved: &[f64], source: &[f64], skip: usize) -> Vec<f64> {
    let mut coords = Vec::with_capacity(solved.len() + source.len().saturating_sub(skip));
    coords.extend_from_slice(solved);
    coords.extend(source.iter().skip(skip));
    coords
}
