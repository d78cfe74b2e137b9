//! Prelude module for convenient imports
//!
//! ```ignore
//! use crewsense::prelude::*;
//! ```
//!
//! This brings the engine, its configuration, the event types and the
//! error types into scope.

// Engine
pub use crate::config::{EngineConfig, EngineConfigBuilder};
pub use crate::engine::{Engine, EngineEvent, EventSink, SnapshotHandle};
pub use crate::shutdown::ShutdownSignal;

// Error handling
pub use crate::error::{Error, Result};

// Game state
pub use crate::game::{GamePhase, Player, Snapshot, SnapshotDiff};

// Offsets
pub use crate::offset::{OffsetTable, load_offset_table};

// Process access
pub use crate::memory::ReadMemory;
pub use crate::process::{ProcessInfo, ProcessProvider};
