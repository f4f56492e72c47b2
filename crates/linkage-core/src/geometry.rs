//! Per-machine geometric constants.
//!
//! Geometry is loaded once when the machine is defined and never changes
//! afterwards; solvers borrow it by value at construction time.

use crate::error::{KinematicError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const CRANK_LENGTH_RANGE: (f64, f64) = (50.0, 500.0);
const LINK_LENGTH_RANGE: (f64, f64) = (50.0, 500.0);
const SIDE_LENGTH_RANGE: (f64, f64) = (20.0, 500.0);
const SEGMENT_LENGTH_RANGE: (f64, f64) = (0.2, 1000.0);

/// Geometry of a rotary parallel delta.
///
/// Arm angles are in radians. Zero is a horizontal crank; positive angles
/// point below horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaGeometry {
    /// Motor crank length (`rf`).
    pub crank_length: f64,
    /// Linkage length from crank tip to effector (`re`).
    pub link_length: f64,
    /// Side of the fixed (motor) triangle (`f`).
    pub crank_side_length: f64,
    /// Side of the effector triangle (`e`).
    pub effector_side_length: f64,
    /// How far the arms may swing up.
    pub max_negative_angle: f64,
    /// How far the arms may swing down.
    pub max_positive_angle: f64,
}

impl DeltaGeometry {
    /// Tapster 3 (Dynamixel servos).
    pub fn tapster_3() -> Self {
        Self {
            crank_length: 70.0,
            link_length: 133.5,
            crank_side_length: 179.437,
            effector_side_length: 86.6025,
            max_negative_angle: -PI / 3.0,
            max_positive_angle: PI / 2.0,
        }
    }

    /// Tapster Pro (Trinamic steppers).
    pub fn tapster_pro() -> Self {
        Self {
            crank_length: 100.0,
            link_length: 220.0,
            crank_side_length: 294.449,
            effector_side_length: 86.6025,
            max_negative_angle: -0.75,
            max_positive_angle: PI / 2.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_range("crank_length", self.crank_length, CRANK_LENGTH_RANGE)?;
        check_range("link_length", self.link_length, LINK_LENGTH_RANGE)?;
        check_range("crank_side_length", self.crank_side_length, SIDE_LENGTH_RANGE)?;
        check_range(
            "effector_side_length",
            self.effector_side_length,
            SIDE_LENGTH_RANGE,
        )?;
        if !(self.max_negative_angle < self.max_positive_angle) {
            return Err(KinematicError::InvalidGeometry(format!(
                "max_negative_angle {} must be below max_positive_angle {}",
                self.max_negative_angle, self.max_positive_angle
            )));
        }
        Ok(())
    }
}

/// Geometry of a two-link planar SCARA arm. Joint angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaraGeometry {
    /// Shoulder-to-elbow link length.
    pub length_r1: f64,
    /// Elbow-to-tool link length.
    pub length_r2: f64,
}

impl ScaraGeometry {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("length_r1", self.length_r1), ("length_r2", self.length_r2)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(KinematicError::InvalidGeometry(format!(
                    "{name} must be a positive length, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Farthest reachable radius from the shoulder.
    pub fn reach(&self) -> f64 {
        self.length_r1 + self.length_r2
    }
}

/// Machine topology together with its constants.
///
/// Chosen once when the machine is configured; the segmenter dispatches
/// on it for every move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kinematics", rename_all = "snake_case")]
pub enum MachineGeometry {
    Delta(DeltaGeometry),
    Scara(ScaraGeometry),
    Cartesian,
}

impl MachineGeometry {
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Delta(g) => g.validate(),
            Self::Scara(g) => g.validate(),
            Self::Cartesian => Ok(()),
        }
    }
}

/// Path segmentation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Length of one interpolated segment in mm.
    #[serde(default = "default_segment_length")]
    pub segment_length: f64,
    /// Lowest fraction of the requested feed a rescaled segment may use.
    #[serde(default = "default_feed_floor")]
    pub feed_floor: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            segment_length: default_segment_length(),
            feed_floor: default_feed_floor(),
        }
    }
}

fn default_segment_length() -> f64 {
    0.5
}

fn default_feed_floor() -> f64 {
    0.5
}

impl SegmenterConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("segment_length", self.segment_length, SEGMENT_LENGTH_RANGE)?;
        if !(self.feed_floor > 0.0 && self.feed_floor <= 1.0) {
            return Err(KinematicError::InvalidGeometry(format!(
                "feed_floor {} must be in (0, 1]",
                self.feed_floor
            )));
        }
        Ok(())
    }
}

fn check_range(name: &str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(KinematicError::InvalidGeometry(format!(
            "{name} {value} outside {min}..={max}"
        )))
    }
}
