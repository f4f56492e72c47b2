//! Cartesian and joint-space poses.
//!
//! Both are ordered coordinate vectors. The first [`KINEMATIC_AXES`]
//! entries take part in the nonlinear mapping; anything after that
//! (A/B/C rotary or auxiliary axes) is carried through unchanged.

use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Number of leading axes that participate in the kinematic transform.
pub const KINEMATIC_AXES: usize = 3;

macro_rules! pose {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Vec<f64>);

        impl $name {
            pub fn new(coords: impl Into<Vec<f64>>) -> Self {
                Self(coords.into())
            }

            /// A pose with `axes` coordinates, all zero.
            pub fn zeros(axes: usize) -> Self {
                Self(vec![0.0; axes])
            }

            pub fn axis_count(&self) -> usize {
                self.0.len()
            }

            /// Coordinate at `axis`, or zero when the pose is shorter.
            pub fn get_or_zero(&self, axis: usize) -> f64 {
                self.0.get(axis).copied().unwrap_or(0.0)
            }

            /// Euclidean distance over the first `axes` coordinates.
            pub fn distance_over(&self, other: &Self, axes: usize) -> f64 {
                (0..axes)
                    .map(|i| {
                        let d = self.get_or_zero(i) - other.get_or_zero(i);
                        d * d
                    })
                    .sum::<f64>()
                    .sqrt()
            }

            pub fn into_inner(self) -> Vec<f64> {
                self.0
            }
        }

        impl Deref for $name {
            type Target = [f64];

            fn deref(&self) -> &[f64] {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut [f64] {
                &mut self.0
            }
        }

        impl From<Vec<f64>> for $name {
            fn from(coords: Vec<f64>) -> Self {
                Self(coords)
            }
        }

        impl<const N: usize> From<[f64; N]> for $name {
            fn from(coords: [f64; N]) -> Self {
                Self(coords.to_vec())
            }
        }
    };
}

pose!(
    /// Machine-space coordinates in millimetres.
    CartesianPose
);

pose!(
    /// Actuator coordinates: arm angles (radians for delta, degrees for
    /// SCARA) followed by any pass-through axes.
    JointPose
);

impl CartesianPose {
    /// Linear interpolation towards `target` at fraction `t`.
    ///
    /// `t == 1.0` yields `target` exactly so the final segment of a move
    /// lands on the commanded point without rounding drift.
    pub fn lerp(&self, target: &Self, t: f64) -> Self {
        if t >= 1.0 {
            return target.clone();
        }
        let axes = self.axis_count().max(target.axis_count());
        Self(
            (0..axes)
                .map(|i| {
                    let start = self.get_or_zero(i);
                    start + (target.get_or_zero(i) - start) * t
                })
                .collect(),
        )
    }

    /// Adds `offset` axis by axis; missing offset entries count as zero.
    pub fn offset_by(&self, offset: &Self) -> Self {
        Self(
            self.0
                .iter()
                .enumerate()
                .map(|(i, v)| v + offset.get_or_zero(i))
                .collect(),
        )
    }
}

impl std::fmt::Display for CartesianPose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{v:.3}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_target_exactly_at_one() {
        let from = CartesianPose::from([0.1, 0.2, -150.3]);
        let to = CartesianPose::from([20.7, -10.9, -140.1]);
        assert_eq!(from.lerp(&to, 1.0), to);
        let mid = from.lerp(&to, 0.5);
        assert!((mid[0] - 10.4).abs() < 1e-12);
    }

    #[test]
    fn distance_ignores_trailing_axes() {
        let a = CartesianPose::from([0.0, 0.0, 0.0, 100.0]);
        let b = CartesianPose::from([3.0, 4.0, 0.0, -100.0]);
        assert_eq!(a.distance_over(&b, KINEMATIC_AXES), 5.0);
    }

    #[test]
    fn offset_treats_missing_entries_as_zero() {
        let p = CartesianPose::from([1.0, 2.0, 3.0, 4.0]);
        let shifted = p.offset_by(&CartesianPose::from([10.0]));
        assert_eq!(&*shifted, &[11.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn display_uses_three_decimals() {
        let p = CartesianPose::from([1.0, -2.5, 0.12345]);
        insta::assert_snapshot!(p.to_string(), @"1.000 -2.500 0.123");
    }
}
