use crate::pose::CartesianPose;
use thiserror::Error;

/// Failure of a kinematic solve or of a whole move.
///
/// Every solver variant reports through this one type; [`KinematicError::kind`]
/// collapses it into the coarse categories the motion layer acts on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KinematicError {
    #[error("point outside reachable volume (discriminant {discriminant:.4})")]
    OutOfRange { discriminant: f64 },
    #[error("arm {arm} angle {angle:.4} below limit {limit:.4}")]
    AngleTooNegative { arm: usize, angle: f64, limit: f64 },
    #[error("arm {arm} angle {angle:.4} above limit {limit:.4}")]
    AngleTooPositive { arm: usize, angle: f64, limit: f64 },
    #[error("target unreachable {target}: {source}")]
    Unreachable {
        target: CartesianPose,
        #[source]
        source: Box<KinematicError>,
    },
    #[error("segment {index}/{count} unreachable {point}: {source}")]
    SegmentUnreachable {
        index: u32,
        count: u32,
        point: CartesianPose,
        #[source]
        source: Box<KinematicError>,
    },
    #[error("joint pose is geometrically inconsistent")]
    GeometryInconsistent,
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("pose has {actual} axes, expected at least {expected}")]
    AxisCount { expected: usize, actual: usize },
}

/// Coarse classification of a [`KinematicError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    OutOfRange,
    MechanicalLimit,
    Unreachable,
    SegmentUnreachable,
    GeometryInconsistent,
    InvalidConfig,
}

impl KinematicError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::AngleTooNegative { .. } | Self::AngleTooPositive { .. } => {
                ErrorKind::MechanicalLimit
            }
            Self::Unreachable { .. } => ErrorKind::Unreachable,
            Self::SegmentUnreachable { .. } => ErrorKind::SegmentUnreachable,
            Self::GeometryInconsistent => ErrorKind::GeometryInconsistent,
            Self::InvalidGeometry(_) | Self::AxisCount { .. } => ErrorKind::InvalidConfig,
        }
    }

    /// The solver-level failure underneath a move-level wrapper.
    pub fn root_cause(&self) -> &KinematicError {
        match self {
            Self::Unreachable { source, .. } | Self::SegmentUnreachable { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }

    pub(crate) fn unreachable(target: &CartesianPose, source: KinematicError) -> Self {
        Self::Unreachable {
            target: target.clone(),
            source: Box::new(source),
        }
    }
}

pub type Result<T, E = KinematicError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_classify_as_mechanical() {
        let err = KinematicError::AngleTooNegative {
            arm: 0,
            angle: -1.1,
            limit: -1.0,
        };
        assert_eq!(err.kind(), ErrorKind::MechanicalLimit);
    }

    #[test]
    fn wrapped_errors_keep_their_cause() {
        let target = CartesianPose::from([0.0, 0.0, -220.0]);
        let err = KinematicError::unreachable(&target, KinematicError::OutOfRange {
            discriminant: -1794.5,
        });
        assert_eq!(err.kind(), ErrorKind::Unreachable);
        assert_eq!(err.root_cause().kind(), ErrorKind::OutOfRange);
        insta::assert_snapshot!(
            err.to_string(),
            @"target unreachable 0.000 0.000 -220.000: point outside reachable volume (discriminant -1794.5000)"
        );
    }
}
