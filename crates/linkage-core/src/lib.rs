//! Kinematics core for non-Cartesian motion controllers.
//!
//! Converts straight Cartesian moves into joint-space segments for
//! parallel-delta and SCARA arms. Transport, planning and step generation
//! live elsewhere; this crate only solves, segments and reports.

pub mod continuity;
pub mod error;
pub mod geometry;
pub mod kinematics;
pub mod machine;
pub mod pose;
pub mod segmenter;
pub mod sink;

pub use continuity::ContinuityState;
pub use error::{ErrorKind, KinematicError};
pub use geometry::{DeltaGeometry, MachineGeometry, ScaraGeometry, SegmenterConfig};
pub use kinematics::{ForwardKinematics, InverseKinematics, Kinematics};
pub use machine::Machine;
pub use pose::{CartesianPose, JointPose};
pub use segmenter::{MotionRequest, PathSegmenter, SegmentOutcome};
pub use sink::{MessageSink, MsgLevel, RecordingSink, TracingSink};
