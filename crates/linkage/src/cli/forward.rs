use anyhow::Result;
use clap::Args;
use linkage_core::JointPose;
use std::path::PathBuf;

#[derive(Args)]
pub struct ForwardArgs {
    /// Path to the machine configuration file (TOML or JSON).
    pub config: PathBuf,

    /// Joint values: radians for delta arms, degrees for SCARA links.
    ///
    /// Missing trailing axes are zero.
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub joints: Vec<f64>,
}

impl ForwardArgs {
    pub fn run(&self) -> Result<()> {
        let (config, mut machine) = super::load_machine(&self.config)?;
        let joints = JointPose::new(super::pose_for(&config, &self.joints)?.into_inner());
        match machine.forward_kinematics(&joints) {
            Some(position) => {
                println!("{position}");
                Ok(())
            }
            None => anyhow::bail!("joints {:?} do not describe a machine pose", self.joints),
        }
    }
}
