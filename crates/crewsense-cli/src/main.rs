use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod offsets;
mod sink;

use commands::track::TrackArgs;
use offsets::OffsetArgs;

#[derive(Parser)]
#[command(name = "crewsense")]
#[command(version, about = "Among Us game state reader")]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    track: TrackArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Track the game and print state changes (default)
    Track(TrackArgs),
    /// Validate an offset table and print a summary
    CheckOffsets {
        /// Offset table JSON file
        path: PathBuf,
    },
    /// Decode a packed lobby code (decimal or 0x-prefixed hex)
    GameCode {
        value: String,
    },
    /// Attach once, run the signature scans and print resolved offsets
    Scan(OffsetArgs),
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries events only
    let default_directive = if args.verbose {
        "crewsense=debug"
    } else {
        "crewsense=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Some(Command::Track(track)) => commands::track::run(&track),
        Some(Command::CheckOffsets { path }) => commands::check_offsets::run(&path),
        Some(Command::GameCode { value }) => commands::game_code::run(&value),
        Some(Command::Scan(offsets)) => commands::scan::run(&offsets),
        None => commands::track::run(&args.track),
    }
}
