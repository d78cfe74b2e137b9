//! Game state synthesis: phase detection, roster building and diffing.

mod code;
mod phase;
mod player;
mod reader;
mod snapshot;
mod synthesizer;

pub use code::{decode_game_code, lobby_code};
pub use phase::{GamePhase, PhaseDetector, PhaseInputs};
pub use player::{Player, PlayerRecord, Tally};
pub use reader::{GameReader, Roster};
pub use snapshot::{Snapshot, SnapshotDiff};
pub use synthesizer::GameStateSynthesizer;
