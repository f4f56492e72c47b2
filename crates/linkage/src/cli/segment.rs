use crate::job::{self, MoveFile, MoveStatus};
use anyhow::{Context, Result};
use clap::Args;
use linkage_core::ContinuityState;
use std::{
    fs,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

#[derive(Args)]
pub struct SegmentArgs {
    /// Path to the machine configuration file (TOML or JSON).
    pub config: PathBuf,

    /// Path to the move file (TOML or JSON).
    pub moves: PathBuf,

    /// Path where segments are written, one JSON object per line.
    ///
    /// Defaults to stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Stop after the motion queue has taken this many segments.
    #[arg(long)]
    pub limit: Option<usize>,
}

impl SegmentArgs {
    pub fn run(&self) -> Result<()> {
        let (config, mut machine) = super::load_machine(&self.config)?;
        let job = MoveFile::from_file(&self.moves)?;
        job.validate(config.axes)
            .with_context(|| format!("invalid move file {}", self.moves.display()))?;

        machine.report_startup();

        let mut continuity = ContinuityState::new(config.initial_joints());
        let homed = machine.post_homing(&mut continuity, config.initial_joints());
        let start = match job.start.clone() {
            Some(start) => start,
            None => homed.context("home pose has no Cartesian position; set `start`")?,
        };

        let report = job::run(&mut machine, &mut continuity, start, &job.moves, self.limit);

        for (index, status) in report.moves.iter().enumerate() {
            match status {
                MoveStatus::Completed { skipped, .. } if *skipped > 0 => {
                    tracing::warn!("move {index}: {skipped} segments skipped");
                }
                MoveStatus::Rejected { reason } => {
                    tracing::warn!("move {index} rejected: {reason}");
                }
                _ => {}
            }
        }

        let writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(
                fs::File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            ),
            None => Box::new(io::stdout().lock()),
        };
        let mut writer = BufWriter::new(writer);
        for segment in &report.segments {
            serde_json::to_writer(&mut writer, segment)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        tracing::info!(
            "{} moves, {} segments, final joints {:?}",
            report.moves.len(),
            report.segments.len(),
            &**continuity.last()
        );

        Ok(())
    }
}
