use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game::code::NO_LOBBY;
use crate::game::{GamePhase, Player};

/// One synthesized view of the game at one tick
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: GamePhase,
    pub previous_phase: GamePhase,
    pub lobby_code: String,
    pub players: Vec<Player>,
    pub is_host: bool,
    pub host_id: u32,
    pub client_id: u32,
    /// Capture time; not compared when diffing
    pub captured_at: DateTime<Utc>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            phase: GamePhase::Unknown,
            previous_phase: GamePhase::Unknown,
            lobby_code: NO_LOBBY.to_string(),
            players: Vec::new(),
            is_host: false,
            host_id: 0,
            client_id: 0,
            captured_at: DateTime::<Utc>::default(),
        }
    }
}

impl Snapshot {
    pub fn player(&self, ptr: u64) -> Option<&Player> {
        self.players.iter().find(|p| p.ptr == ptr)
    }

    pub fn local_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_local)
    }

    /// What changed relative to `previous`.
    ///
    /// Players are matched by record pointer.
    pub fn diff(&self, previous: &Snapshot) -> SnapshotDiff {
        let old: HashMap<u64, &Player> = previous.players.iter().map(|p| (p.ptr, p)).collect();
        let new: HashMap<u64, &Player> = self.players.iter().map(|p| (p.ptr, p)).collect();

        let mut diff = SnapshotDiff {
            phase_changed: self.phase != previous.phase,
            lobby_code_changed: self.lobby_code != previous.lobby_code,
            host_changed: self.is_host != previous.is_host
                || self.host_id != previous.host_id
                || self.client_id != previous.client_id,
            roster_resized: self.players.len() != previous.players.len(),
            ..SnapshotDiff::default()
        };

        for player in &self.players {
            match old.get(&player.ptr) {
                None => push_unique(&mut diff.added, player.ptr),
                Some(before) if *before != player => push_unique(&mut diff.changed, player.ptr),
                Some(_) => {}
            }
        }
        for player in &previous.players {
            if !new.contains_key(&player.ptr) {
                push_unique(&mut diff.removed, player.ptr);
            }
        }

        diff
    }
}

fn push_unique(list: &mut Vec<u64>, ptr: u64) {
    if !list.contains(&ptr) {
        list.push(ptr);
    }
}

/// Changes between two consecutive snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDiff {
    pub phase_changed: bool,
    pub lobby_code_changed: bool,
    pub host_changed: bool,
    pub roster_resized: bool,
    pub added: Vec<u64>,
    pub removed: Vec<u64>,
    pub changed: Vec<u64>,
}

impl SnapshotDiff {
    /// Diff of a first snapshot against nothing
    pub fn initial(snapshot: &Snapshot) -> Self {
        Self {
            phase_changed: true,
            lobby_code_changed: true,
            host_changed: true,
            roster_resized: !snapshot.players.is_empty(),
            added: snapshot.players.iter().map(|p| p.ptr).collect(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.phase_changed
            && !self.lobby_code_changed
            && !self.host_changed
            && !self.roster_resized
            && self.added.is_empty()
            && self.removed.is_empty()
            && self.changed.is_empty()
    }
}
