//! Running a list of moves through a machine.
//!
//! Stands in for the G-code layer: each move starts where the previous
//! accepted one ended, and every accepted segment is collected in the order
//! the motion queue would receive it.

use anyhow::{Context, Result};
use linkage_core::{
    CartesianPose, ContinuityState, JointPose, Machine, MessageSink, MotionRequest,
    SegmentOutcome,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// A job file: an optional start position and the moves that follow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveFile {
    /// Cartesian position the first move starts from; the homed position
    /// when absent
    #[serde(default)]
    pub start: Option<CartesianPose>,
    pub moves: Vec<JobMove>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMove {
    pub target: CartesianPose,
    pub feed_rate: f64,
    #[serde(default)]
    pub rapid: bool,
    #[serde(default)]
    pub coord_offset: CartesianPose,
}

impl MoveFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read move file {}", path.display()))?;
        crate::config::parse_by_extension("move file", path, &content)
    }

    /// Every pose in the file must carry one coordinate per machine axis.
    pub fn validate(&self, axes: usize) -> Result<()> {
        if let Some(start) = &self.start {
            if start.axis_count() != axes {
                anyhow::bail!(
                    "start has {} coordinates but the machine has {axes} axes",
                    start.axis_count()
                );
            }
        }
        for (index, job_move) in self.moves.iter().enumerate() {
            if job_move.target.axis_count() != axes {
                anyhow::bail!(
                    "move {index} has {} coordinates but the machine has {axes} axes",
                    job_move.target.axis_count()
                );
            }
            if !job_move.coord_offset.is_empty() && job_move.coord_offset.axis_count() != axes {
                anyhow::bail!(
                    "move {index} offset has {} coordinates but the machine has {axes} axes",
                    job_move.coord_offset.axis_count()
                );
            }
            if !(job_move.feed_rate > 0.0) {
                anyhow::bail!("move {index} feed rate must be positive, got {}", job_move.feed_rate);
            }
        }
        Ok(())
    }
}

/// One segment as handed to the motion queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmittedSegment {
    #[serde(rename = "move")]
    pub move_index: usize,
    pub joints: JointPose,
    pub feed_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MoveStatus {
    Completed {
        emitted: u32,
        skipped: u32,
    },
    Rejected {
        reason: String,
    },
    Cancelled {
        emitted: u32,
    },
}

#[derive(Debug, Default)]
pub struct JobReport {
    pub segments: Vec<EmittedSegment>,
    pub moves: Vec<MoveStatus>,
}

/// Runs every move in order.
///
/// A rejected move leaves the position where it was and the job goes on.
/// `limit` caps how many segments the queue accepts in total; once it is
/// reached the current move is cancelled and the job stops.
pub fn run<S: MessageSink>(
    machine: &mut Machine<S>,
    continuity: &mut ContinuityState,
    start: CartesianPose,
    moves: &[JobMove],
    limit: Option<usize>,
) -> JobReport {
    let mut report = JobReport::default();
    let mut position = start;

    for (move_index, job_move) in moves.iter().enumerate() {
        let req = MotionRequest {
            target: job_move.target.clone(),
            from: position.clone(),
            feed_rate: job_move.feed_rate,
            is_rapid: job_move.rapid,
            coord_offset: job_move.coord_offset.clone(),
        };

        let segments = &mut report.segments;
        let result = machine.segment(&req, continuity, |joints, feed_rate| {
            if limit.is_some_and(|limit| segments.len() >= limit) {
                return false;
            }
            segments.push(EmittedSegment {
                move_index,
                joints: joints.clone(),
                feed_rate,
            });
            true
        });

        match result {
            Ok(SegmentOutcome {
                cancelled: true,
                emitted,
                ..
            }) => {
                tracing::info!(move_index, emitted, "move cancelled by queue limit");
                report.moves.push(MoveStatus::Cancelled { emitted });
                break;
            }
            Ok(outcome) => {
                tracing::debug!(
                    move_index,
                    emitted = outcome.emitted,
                    skipped = outcome.skipped,
                    "move completed"
                );
                report.moves.push(MoveStatus::Completed {
                    emitted: outcome.emitted,
                    skipped: outcome.skipped,
                });
                position = job_move.target.clone();
            }
            Err(err) => {
                report.moves.push(MoveStatus::Rejected {
                    reason: err.to_string(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkage_core::{DeltaGeometry, MachineGeometry, RecordingSink, SegmenterConfig};

    fn tapster() -> Machine<RecordingSink> {
        Machine::with_sink(
            &MachineGeometry::Delta(DeltaGeometry::tapster_3()),
            SegmenterConfig::default(),
            RecordingSink::default(),
        )
        .unwrap()
    }

    fn to(target: [f64; 3]) -> JobMove {
        JobMove {
            target: target.into(),
            feed_rate: 1000.0,
            rapid: false,
            coord_offset: CartesianPose::default(),
        }
    }

    #[test]
    fn rejected_move_keeps_position() {
        let mut machine = tapster();
        let mut continuity = ContinuityState::new(JointPose::zeros(3));
        let moves = [
            to([0.0, 0.0, -151.0]),
            to([0.0, 0.0, -230.0]),
            to([0.0, 0.0, -152.0]),
        ];
        let start = CartesianPose::from([0.0, 0.0, -150.0]);
        let report = run(&mut machine, &mut continuity, start, &moves, None);
        assert_eq!(report.moves.len(), 3);
        assert!(matches!(report.moves[1], MoveStatus::Rejected { .. }));
        // -151 to -152 is two segments, not a trip back from -230
        assert_eq!(report.moves[2], MoveStatus::Completed {
            emitted: 2,
            skipped: 0
        });
        assert_eq!(report.segments.len(), 4);
        assert!(report.segments.iter().all(|s| s.move_index != 1));
    }

    #[test]
    fn limit_cancels_and_stops() {
        let mut machine = tapster();
        let mut continuity = ContinuityState::new(JointPose::zeros(3));
        let moves = [to([0.0, 0.0, -160.0]), to([0.0, 0.0, -170.0])];
        let start = CartesianPose::from([0.0, 0.0, -150.0]);
        let report = run(&mut machine, &mut continuity, start, &moves, Some(5));
        assert_eq!(report.segments.len(), 5);
        assert_eq!(report.moves, vec![MoveStatus::Cancelled { emitted: 5 }]);
    }

    #[test]
    fn validate_checks_axis_counts() {
        let job = MoveFile {
            start: None,
            moves: vec![to([0.0, 0.0, -150.0])],
        };
        job.validate(3).unwrap();
        let err = job.validate(4).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"move 0 has 3 coordinates but the machine has 4 axes");
    }

    #[test]
    fn parse_error_names_the_move_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moves.toml");
        fs::write(&path, "moves = 3\n").unwrap();
        let err = MoveFile::from_file(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("failed to parse move file {} as TOML", path.display())
        );
    }

    #[test]
    fn segment_serializes_as_json_line() {
        let segment = EmittedSegment {
            move_index: 2,
            joints: JointPose::from([0.5, 0.25, 1.0]),
            feed_rate: 750.0,
        };
        insta::assert_snapshot!(
            serde_json::to_string(&segment).unwrap(),
            @r#"{"move":2,"joints":[0.5,0.25,1.0],"feed_rate":750.0}"#
        );
    }
}
