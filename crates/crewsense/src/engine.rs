//! The poll loop.
//!
//! Each tick the engine polls the process locator, resolves signatures on a
//! fresh attach, synthesizes a snapshot, publishes it and hands an event to
//! the sink when something changed.
//!
//! ```ignore
//! use crewsense::prelude::*;
//! use crewsense::WindowsProcessProvider;
//!
//! let table = load_offset_table("offsets.json")?;
//! let mut engine = Engine::new(WindowsProcessProvider, table, EngineConfig::default(), sink)?;
//! let snapshots = engine.snapshot_handle();
//! engine.run(&shutdown)?;
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::game::{GameReader, GameStateSynthesizer, Snapshot};
use crate::offset::{OffsetTable, SignatureScanner};
use crate::process::{AttachEvent, ProcessInfo, ProcessLocator, ProcessProvider};
use crate::shutdown::ShutdownSignal;

/// Something the engine reports to its sink
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    Attached(ProcessInfo),
    Detached,
    StateChanged(Arc<Snapshot>),
}

/// Consumer of engine events.
///
/// An error from `emit` is fatal: the engine stops and returns it.
pub trait EventSink {
    fn emit(&mut self, event: &EngineEvent) -> Result<()>;
}

impl EventSink for Vec<EngineEvent> {
    fn emit(&mut self, event: &EngineEvent) -> Result<()> {
        self.push(event.clone());
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: &EngineEvent) -> Result<()> {
        (**self).emit(event)
    }
}

/// Shared, always-complete view of the latest snapshot
#[derive(Debug, Clone, Default)]
pub struct SnapshotHandle {
    inner: Arc<RwLock<Arc<Snapshot>>>,
}

impl SnapshotHandle {
    /// The most recently published snapshot
    pub fn current(&self) -> Arc<Snapshot> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn publish(&self, snapshot: Arc<Snapshot>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }
}

pub struct Engine<P: ProcessProvider, S: EventSink> {
    config: EngineConfig,
    table: OffsetTable,
    locator: ProcessLocator<P>,
    /// Table with signature-resolved heads, present while attached
    resolved: Option<OffsetTable>,
    synthesizer: GameStateSynthesizer,
    sink: S,
    snapshot: SnapshotHandle,
}

impl<P: ProcessProvider, S: EventSink> Engine<P, S> {
    /// Create an engine; fails if the offset table is invalid
    pub fn new(provider: P, table: OffsetTable, config: EngineConfig, sink: S) -> Result<Self> {
        table.validate()?;
        info!(
            "Offsets {} loaded ({} signatures, {}-byte player records)",
            table.version,
            table.signatures.len(),
            table.player.schema.width()
        );

        Ok(Self {
            locator: ProcessLocator::new(provider, &config.process_name, &config.module_name),
            config,
            table,
            resolved: None,
            synthesizer: GameStateSynthesizer::new(),
            sink,
            snapshot: SnapshotHandle::default(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot_handle(&self) -> SnapshotHandle {
        self.snapshot.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.locator.is_attached()
    }

    /// Offsets in use for the current attachment
    pub fn resolved_offsets(&self) -> Option<&OffsetTable> {
        self.resolved.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run one poll cycle
    pub fn tick(&mut self) -> Result<()> {
        match self.locator.poll() {
            AttachEvent::Attached => self.on_attach()?,
            AttachEvent::Detached => {
                self.on_detach()?;
                return Ok(());
            }
            AttachEvent::Unchanged => {}
        }

        let (Some(attachment), Some(offsets)) = (self.locator.attachment(), &self.resolved) else {
            return Ok(());
        };

        let reader = GameReader::new(&attachment.handle, offsets, attachment.module.base);
        let (snapshot, diff) = self.synthesizer.tick(&reader);
        let snapshot = Arc::new(snapshot);
        self.snapshot.publish(Arc::clone(&snapshot));

        if let Some(diff) = diff {
            debug!(
                "State changed: phase={} lobby={} players={} (+{} -{} ~{})",
                snapshot.phase,
                snapshot.lobby_code,
                snapshot.players.len(),
                diff.added.len(),
                diff.removed.len(),
                diff.changed.len()
            );
            emit(&mut self.sink, EngineEvent::StateChanged(snapshot))?;
        }
        Ok(())
    }

    /// Tick until `shutdown` is triggered.
    ///
    /// Only a failing sink ends the loop early; its error is returned.
    pub fn run(&mut self, shutdown: &ShutdownSignal) -> Result<()> {
        info!("Waiting for {}...", self.config.process_name);

        while !shutdown.is_shutdown() {
            if let Err(e) = self.tick() {
                error!("Stopping: {}", e);
                self.locator.detach();
                return Err(e);
            }
            if shutdown.wait(self.config.poll_interval) {
                break;
            }
        }

        self.locator.detach();
        self.resolved = None;
        info!("Engine stopped");
        Ok(())
    }

    fn on_attach(&mut self) -> Result<()> {
        let Some(attachment) = self.locator.attachment() else {
            return Ok(());
        };

        let scanner = SignatureScanner::new(&attachment.handle, attachment.module);
        self.resolved = Some(scanner.resolve(&self.table));
        self.synthesizer.reset();

        emit(&mut self.sink, EngineEvent::Attached(attachment.process.clone()))
    }

    fn on_detach(&mut self) -> Result<()> {
        self.resolved = None;
        self.synthesizer.reset();
        self.snapshot.publish(Arc::new(Snapshot::default()));
        emit(&mut self.sink, EngineEvent::Detached)
    }
}

fn emit<S: EventSink>(sink: &mut S, event: EngineEvent) -> Result<()> {
    sink.emit(&event).map_err(|e| match e {
        Error::EmitFailed(_) => e,
        other => Error::EmitFailed(other.to_string()),
    })
}
