//! Main tracking mode command.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crewsense::config::{DEFAULT_PROCESS_NAME, timing::POLL_INTERVAL};
use crewsense::{EngineConfig, OffsetTable, ShutdownSignal};
use tracing::info;

use crate::input;
use crate::offsets::{self, OffsetArgs};
use crate::sink::{Format, StdoutSink};

#[derive(clap::Args, Debug, Clone)]
pub struct TrackArgs {
    #[command(flatten)]
    pub offsets: OffsetArgs,

    /// Output format for events on stdout
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Executable name of the game
    #[arg(long, default_value = DEFAULT_PROCESS_NAME)]
    pub process_name: String,

    /// Delay between polls in milliseconds
    #[arg(long, default_value_t = POLL_INTERVAL.as_millis() as u64)]
    pub poll_interval_ms: u64,
}

/// Run the main tracking mode
pub fn run(args: &TrackArgs) -> Result<()> {
    let table = offsets::acquire(&args.offsets)?;

    // Setup graceful shutdown handler
    let shutdown = Arc::new(ShutdownSignal::new());
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, stopping...");
        shutdown_ctrlc.trigger();
    })?;

    // Spawn keyboard input monitor (Esc, q, Q to quit)
    let _keyboard_handle = input::spawn_keyboard_monitor(Arc::clone(&shutdown));

    let config = EngineConfig::builder()
        .process_name(args.process_name.as_str())
        .poll_interval(Duration::from_millis(args.poll_interval_ms))
        .build();
    let sink = StdoutSink::new(io::stdout(), args.format);

    info!("crewsense {}", env!("CARGO_PKG_VERSION"));
    eprintln!("Waiting for {}... (Press Esc or q to quit)", config.process_name);
    track(table, config, sink, &shutdown)?;

    info!("Shutdown complete");
    Ok(())
}

#[cfg(target_os = "windows")]
fn track(
    table: OffsetTable,
    config: EngineConfig,
    sink: StdoutSink<io::Stdout>,
    shutdown: &ShutdownSignal,
) -> Result<()> {
    use crewsense::{Engine, WindowsProcessProvider};

    let mut engine = Engine::new(WindowsProcessProvider, table, config, sink)?;
    engine.run(shutdown)?;
    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn track(
    _table: OffsetTable,
    _config: EngineConfig,
    _sink: StdoutSink<io::Stdout>,
    _shutdown: &ShutdownSignal,
) -> Result<()> {
    anyhow::bail!("Live tracking is only supported on Windows")
}
