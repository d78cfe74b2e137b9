//! # crewsense
//!
//! Core library for reading live Among Us game state from process memory.
//!
//! This crate provides:
//! - Process discovery and read-only attachment
//! - Offset tables with signature-based head resolution
//! - Pointer chain walking with field-level defaulting
//! - Declarative binary record decoding
//! - Game phase synthesis, roster building and change notification
//!
//! ## Feature Flags
//!
//! - `api`: Enables fetching offset tables over HTTP.

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod memory;
pub mod offset;
pub mod prelude;
pub mod process;
pub mod record;
pub mod shutdown;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::{Engine, EngineEvent, EventSink, SnapshotHandle};
pub use error::{Error, Result};
pub use game::{
    GamePhase, GameReader, GameStateSynthesizer, PhaseDetector, PhaseInputs, Player,
    PlayerRecord, Roster, Snapshot, SnapshotDiff, decode_game_code, lobby_code,
};
pub use memory::{
    ChainTarget, MockMemoryBuilder, MockMemoryReader, PointerChainWalker, PointerWidth,
    ReadMemory,
};
pub use offset::{
    AddressMode, OffsetCache, OffsetTable, PlayerOffsets, Signature, SignatureScanner,
    load_offset_table, save_offset_table,
};
#[cfg(feature = "api")]
pub use offset::{fetch_offset_table, fetch_offset_table_with_cache};
pub use process::{
    AttachEvent, Attachment, MockProcessProvider, ModuleInfo, ProcessInfo, ProcessLocator,
    ProcessProvider,
};
#[cfg(target_os = "windows")]
pub use process::{ProcessHandle, WindowsProcessProvider};
pub use record::{Endian, FieldKind, FieldSpec, FieldValue, Record, RecordSchema};
pub use shutdown::ShutdownSignal;
