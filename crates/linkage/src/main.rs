use anyhow::Result;
use clap::{Parser, Subcommand};
use linkage::cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // stdout carries segment output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Segment(args) => args.run(),
        Command::Forward(args) => args.run(),
        Command::Check(args) => args.run(),
        Command::Info(args) => args.run(),
    }
}

#[derive(Parser)]
#[command(name = "linkage", about = "Kinematics and path segmentation for linkage machines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Segment a move file into joint-space segments, one JSON line each.
    Segment(cli::segment::SegmentArgs),
    /// Print the Cartesian position for a set of joint values.
    Forward(cli::forward::ForwardArgs),
    /// Check whether a Cartesian target is inside the travel limits.
    Check(cli::check::CheckArgs),
    /// Describe the configured machine.
    Info(cli::info::InfoArgs),
}
