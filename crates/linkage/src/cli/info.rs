use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoArgs {
    /// Path to the machine configuration file (TOML or JSON).
    pub config: PathBuf,
}

impl InfoArgs {
    pub fn run(&self) -> Result<()> {
        let (config, mut machine) = super::load_machine(&self.config)?;
        machine.report_startup();
        println!("{}", serde_json::to_string_pretty(&config)?);
        Ok(())
    }
}
