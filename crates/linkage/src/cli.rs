use crate::config::Config;
use anyhow::{Context, Result};
use linkage_core::{CartesianPose, Machine};
use std::path::Path;

pub mod check;
pub mod forward;
pub mod info;
pub mod segment;

/// Loads and validates a config, then builds the machine it describes.
pub fn load_machine(path: &Path) -> Result<(Config, Machine)> {
    let config = Config::from_file(path)?;
    config.validate()?;
    tracing::debug!("loaded config from {}", path.display());
    let machine = Machine::new(&config.machine, config.segmenter)
        .context("failed to build machine")?;
    Ok((config, machine))
}

/// Pads or rejects command-line coordinates against the machine's axis count.
fn pose_for(config: &Config, coords: &[f64]) -> Result<CartesianPose> {
    if coords.len() > config.axes {
        anyhow::bail!(
            "got {} coordinates but the machine has {} axes",
            coords.len(),
            config.axes
        );
    }
    let mut pose = CartesianPose::zeros(config.axes);
    pose[..coords.len()].copy_from_slice(coords);
    Ok(pose)
}
