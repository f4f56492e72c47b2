//! Splitting straight Cartesian moves into short joint-space segments.
//!
//! A straight line in machine space is a curve in joint space. Each move is
//! cut into pieces short enough that the curvature inside one piece does
//! not show, every piece is solved on its own, and the feed rate of each is
//! scaled by how far the joints travel relative to the Cartesian length.

use crate::{
    continuity::ContinuityState,
    error::{ErrorKind, KinematicError, Result},
    geometry::SegmenterConfig,
    kinematics::{InverseKinematics, Kinematics},
    pose::{CartesianPose, JointPose, KINEMATIC_AXES},
    sink::{MessageSink, MsgLevel},
};
use serde::{Deserialize, Serialize};

/// One commanded linear move in machine coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionRequest {
    pub target: CartesianPose,
    pub from: CartesianPose,
    pub feed_rate: f64,
    #[serde(default)]
    pub is_rapid: bool,
    /// Work-coordinate offset added to `from` before interpolating.
    #[serde(default)]
    pub coord_offset: CartesianPose,
}

/// What happened to a move that was not rejected outright.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SegmentOutcome {
    /// Segments the move was cut into.
    pub segments: u32,
    /// Segments the motion queue accepted.
    pub emitted: u32,
    /// Interior segments dropped because they could not be solved.
    pub skipped: u32,
    /// The queue refused a segment and the rest of the move was abandoned.
    pub cancelled: bool,
}

/// Number of segments for a move of `distance` mm; never zero.
pub fn segment_count(distance: f64, segment_length: f64) -> u32 {
    let count = (distance / segment_length).ceil();
    if count >= 1.0 {
        count.min(u32::MAX as f64) as u32
    } else {
        1
    }
}

/// Feed rate for one segment.
///
/// Rapids keep the requested rate. Otherwise the rate is scaled by joint
/// distance over Cartesian distance and never drops below `floor` times the
/// request. A zero-length segment or zero joint travel keeps the request.
pub fn rescale_feed(
    requested: f64,
    joint_distance: f64,
    segment_length: f64,
    is_rapid: bool,
    floor: f64,
) -> f64 {
    if is_rapid || joint_distance == 0.0 || segment_length == 0.0 {
        return requested;
    }
    requested * (joint_distance / segment_length).max(floor)
}

#[derive(Debug, Clone)]
pub struct PathSegmenter {
    kinematics: Kinematics,
    config: SegmenterConfig,
}

impl PathSegmenter {
    pub fn new(kinematics: Kinematics, config: SegmenterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { kinematics, config })
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segments `req` and hands each solved segment to `emit`.
    ///
    /// `emit` returns `false` when the motion queue will not take the
    /// segment (for example a cancelled jog); segmentation stops there and
    /// `continuity` keeps the last accepted pose.
    ///
    /// An unreachable target rejects the whole move before anything is
    /// emitted. Interior points that cannot be solved are skipped and
    /// reported to `sink` once per error kind per move.
    pub fn segment<S, E>(
        &self,
        req: &MotionRequest,
        continuity: &mut ContinuityState,
        sink: &mut S,
        mut emit: E,
    ) -> Result<SegmentOutcome>
    where
        S: MessageSink + ?Sized,
        E: FnMut(&JointPose, f64) -> bool,
    {
        if req.from.axis_count() != req.target.axis_count() {
            return Err(KinematicError::AxisCount {
                expected: req.target.axis_count(),
                actual: req.from.axis_count(),
            });
        }

        let from = req.from.offset_by(&req.coord_offset);
        let target = &req.target;

        if self.kinematics.requires_prevalidation() {
            // The machine may be leaving an edge-of-workspace position, so a
            // bad start point is only reported.
            if let Err(err) = self.kinematics.inverse(&from, continuity.last()) {
                sink.message(
                    MsgLevel::Info,
                    &format!("start position unreachable {from}: {err}"),
                );
            }
            if let Err(err) = self.kinematics.inverse(target, continuity.last()) {
                let err = KinematicError::unreachable(target, err);
                sink.message(MsgLevel::Error, &err.to_string());
                return Err(err);
            }
        }

        let distance = from.distance_over(target, KINEMATIC_AXES);
        let count = if self.kinematics.is_linear() {
            1
        } else {
            segment_count(distance, self.config.segment_length)
        };
        let segment_length = distance / f64::from(count);

        tracing::debug!(
            kinematics = self.kinematics.name(),
            distance,
            segments = count,
            rapid = req.is_rapid,
            "segmenting move"
        );

        let mut outcome = SegmentOutcome {
            segments: count,
            ..SegmentOutcome::default()
        };
        let mut reported: Vec<ErrorKind> = Vec::new();
        let mut last_emitted = 0;

        for index in 1..=count {
            let point = from.lerp(target, f64::from(index) / f64::from(count));
            let joints = match self.kinematics.inverse(&point, continuity.last()) {
                Ok(joints) => joints,
                Err(err) => {
                    outcome.skipped += 1;
                    let kind = err.kind();
                    if !reported.contains(&kind) {
                        reported.push(kind);
                        let err = KinematicError::SegmentUnreachable {
                            index,
                            count,
                            point,
                            source: Box::new(err),
                        };
                        sink.message(MsgLevel::Warning, &err.to_string());
                    }
                    continue;
                }
            };

            // Joint travel since the last emitted pose covers every skipped segment too
            let covered = segment_length * f64::from(index - last_emitted);
            let feed_rate = rescale_feed(
                req.feed_rate,
                continuity.distance_to(&joints),
                covered,
                req.is_rapid,
                self.config.feed_floor,
            );

            if !emit(&joints, feed_rate) {
                tracing::debug!(index, count, "motion queue refused segment");
                outcome.cancelled = true;
                return Ok(outcome);
            }
            continuity.record(joints);
            outcome.emitted += 1;
            last_emitted = index;
        }

        Ok(outcome)
    }
}
