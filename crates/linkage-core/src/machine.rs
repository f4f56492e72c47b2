//! A configured machine: kinematics, segmentation settings and a message sink.

use crate::{
    continuity::ContinuityState,
    error::{KinematicError, Result},
    geometry::{MachineGeometry, SegmenterConfig},
    kinematics::{ForwardKinematics, InverseKinematics, Kinematics},
    pose::{CartesianPose, JointPose},
    segmenter::{MotionRequest, PathSegmenter, SegmentOutcome},
    sink::{MessageSink, MsgLevel, TracingSink},
};

pub struct Machine<S = TracingSink> {
    segmenter: PathSegmenter,
    sink: S,
}

impl Machine<TracingSink> {
    pub fn new(geometry: &MachineGeometry, config: SegmenterConfig) -> Result<Self> {
        Self::with_sink(geometry, config, TracingSink)
    }
}

impl<S: MessageSink> Machine<S> {
    pub fn with_sink(geometry: &MachineGeometry, config: SegmenterConfig, sink: S) -> Result<Self> {
        let kinematics = Kinematics::from_geometry(geometry)?;
        Ok(Self {
            segmenter: PathSegmenter::new(kinematics, config)?,
            sink,
        })
    }

    pub fn kinematics(&self) -> &Kinematics {
        self.segmenter.kinematics()
    }

    pub fn segmenter(&self) -> &PathSegmenter {
        &self.segmenter
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// See [`PathSegmenter::segment`].
    pub fn segment<E>(
        &mut self,
        req: &MotionRequest,
        continuity: &mut ContinuityState,
        emit: E,
    ) -> Result<SegmentOutcome>
    where
        E: FnMut(&JointPose, f64) -> bool,
    {
        self.segmenter.segment(req, continuity, &mut self.sink, emit)
    }

    /// Cartesian position for status reports.
    ///
    /// `None` when the joints do not describe a real pose; the caller keeps
    /// showing the previous position.
    pub fn forward_kinematics(&mut self, joints: &JointPose) -> Option<CartesianPose> {
        match self.kinematics().forward(joints) {
            Ok(position) => Some(position),
            Err(err) => {
                self.sink
                    .message(MsgLevel::Info, &format!("forward kinematics error: {err}"));
                None
            }
        }
    }

    /// Soft-limit check for a single target.
    ///
    /// Unlike a move, this has no previous pose to keep angles continuous
    /// against, so it only answers whether the point can be reached.
    pub fn check_travel(&mut self, target: &CartesianPose) -> Result<()> {
        let last = JointPose::zeros(target.axis_count());
        match self.kinematics().inverse(target, &last) {
            Ok(_) => Ok(()),
            Err(err) => {
                let reason = match &err {
                    KinematicError::OutOfRange { .. } => "out of range",
                    KinematicError::AngleTooNegative { .. } => "max negative",
                    KinematicError::AngleTooPositive { .. } => "max positive",
                    _ => "invalid",
                };
                self.sink
                    .message(MsgLevel::Info, &format!("kinematics target {reason}: {target}"));
                Err(err)
            }
        }
    }

    /// Re-anchors continuity once homing has established the joint pose.
    ///
    /// Returns the matching Cartesian position so the caller can
    /// resynchronise its own idea of where the tool is.
    pub fn post_homing(
        &mut self,
        continuity: &mut ContinuityState,
        homed: JointPose,
    ) -> Option<CartesianPose> {
        let position = self.forward_kinematics(&homed);
        continuity.reset(homed);
        position
    }

    /// Start-up banner describing the configured geometry.
    pub fn report_startup(&mut self) {
        let line = match self.kinematics() {
            Kinematics::Delta(kin) => {
                let g = kin.geometry();
                let offset = match kin.z_offset() {
                    Ok(z) => format!("{z:.3}"),
                    Err(_) => "unknown".to_owned(),
                };
                format!(
                    "delta kinematics: z offset {offset}, angle range {:.3}..{:.3}",
                    g.max_negative_angle, g.max_positive_angle
                )
            }
            Kinematics::Scara(kin) => {
                let g = kin.geometry();
                format!(
                    "scara kinematics: links {:.3} + {:.3}, reach {:.3}",
                    g.length_r1,
                    g.length_r2,
                    g.reach()
                )
            }
            Kinematics::Cartesian(_) => "cartesian kinematics".to_owned(),
        };
        self.sink.message(MsgLevel::Info, &line);
    }
}
