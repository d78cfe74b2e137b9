use chrono::Utc;
use tracing::debug;

use crate::game::code::NO_LOBBY;
use crate::game::{GameReader, PhaseDetector, PhaseInputs, Snapshot, SnapshotDiff, lobby_code};
use crate::memory::ReadMemory;

/// Builds a snapshot per tick and decides whether it is worth emitting
#[derive(Debug, Default)]
pub struct GameStateSynthesizer {
    detector: PhaseDetector,
    last_emitted: Option<Snapshot>,
}

impl GameStateSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detector(&self) -> &PhaseDetector {
        &self.detector
    }

    /// Read one tick of game state.
    ///
    /// Returns the snapshot and, when it differs from the last emitted one
    /// (or nothing has been emitted yet), the diff to emit.
    pub fn tick<R: ReadMemory>(
        &mut self,
        reader: &GameReader<'_, R>,
    ) -> (Snapshot, Option<SnapshotDiff>) {
        let snapshot = self.synthesize(reader);

        let diff = match &self.last_emitted {
            None => Some(SnapshotDiff::initial(&snapshot)),
            Some(previous) => Some(snapshot.diff(previous)).filter(|d| !d.is_empty()),
        };
        if diff.is_some() {
            self.last_emitted = Some(snapshot.clone());
        }

        (snapshot, diff)
    }

    /// Forget all state, as on a fresh attach
    pub fn reset(&mut self) {
        self.detector.reset();
        self.last_emitted = None;
    }

    fn synthesize<R: ReadMemory>(&mut self, reader: &GameReader<'_, R>) -> Snapshot {
        let roster = reader.roster();
        let inputs = PhaseInputs {
            raw_phase: reader.raw_phase(),
            meeting_hud_state: reader.meeting_hud_state(),
            player_array: roster.items_ptr,
        };

        let previous_phase = self.detector.phase();
        let phase = self
            .detector
            .update(&inputs, &roster.players, reader.exiled_player_id());
        if phase != previous_phase {
            debug!(
                "Phase {} -> {} (raw {}, meeting HUD {})",
                previous_phase, phase, inputs.raw_phase, inputs.meeting_hud_state
            );
        }

        let lobby_code = if phase.in_lobby() {
            lobby_code(reader.game_code())
        } else {
            NO_LOBBY.to_string()
        };
        let host_id = reader.host_id();
        let client_id = reader.client_id();

        Snapshot {
            phase,
            previous_phase,
            lobby_code,
            players: roster.players,
            is_host: client_id != 0 && host_id == client_id,
            host_id,
            client_id,
            captured_at: Utc::now(),
        }
    }
}
