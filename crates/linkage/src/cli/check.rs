use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Path to the machine configuration file (TOML or JSON).
    pub config: PathBuf,

    /// Cartesian target. Missing trailing axes are zero.
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub target: Vec<f64>,
}

impl CheckArgs {
    pub fn run(&self) -> Result<()> {
        let (config, mut machine) = super::load_machine(&self.config)?;
        let target = super::pose_for(&config, &self.target)?;
        machine
            .check_travel(&target)
            .with_context(|| format!("target {target} is outside the travel limits"))?;
        println!("ok {target}");
        Ok(())
    }
}
