use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::memory::PointerWidth;
use crate::offset::parse_pattern;
use crate::offset::Signature;
use crate::record::RecordSchema;

/// Fields every player schema must define
pub const REQUIRED_PLAYER_FIELDS: &[&str] = &["id", "name", "object_ptr"];

/// Chains whose head is a module-relative static field and may be replaced
/// by a signature scan
pub const RESOLVABLE_CHAINS: &[&str] = &[
    "meeting_hud",
    "game_state",
    "all_players_ptr",
    "exiled_player_id",
    "game_code",
    "host_id",
    "client_id",
];

fn default_name_length_offset() -> u64 {
    0x8
}

/// Offsets relative to a player record or its in-game object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerOffsets {
    /// Layout of the fixed player record
    pub schema: RecordSchema,
    /// Chain from a roster slot to the record
    #[serde(deserialize_with = "super::hex::chain")]
    pub offsets: Vec<u64>,
    /// Chains below the decoded `object_ptr`
    #[serde(deserialize_with = "super::hex::chain")]
    pub is_local: Vec<u64>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub local_x: Vec<u64>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub local_y: Vec<u64>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub remote_x: Vec<u64>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub remote_y: Vec<u64>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub in_vent: Vec<u64>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub client_id: Vec<u64>,
    /// Position of the i32 length inside a managed string object
    #[serde(
        default = "default_name_length_offset",
        deserialize_with = "super::hex::value"
    )]
    pub name_length_offset: u64,
}

/// Versioned map from semantic game fields to pointer chains.
///
/// Chains starting at the module base have a module-relative head; all
/// others are relative to an object pointer read by another chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetTable {
    pub version: String,
    #[serde(default)]
    pub pointer_width: PointerWidth,
    #[serde(deserialize_with = "super::hex::chain")]
    pub meeting_hud: Vec<u64>,
    /// Object cache pointer of the meeting HUD; null means no live meeting
    #[serde(default, deserialize_with = "super::hex::opt_chain")]
    pub meeting_hud_cache_ptr: Option<Vec<u64>>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub meeting_hud_state: Vec<u64>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub game_state: Vec<u64>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub all_players_ptr: Vec<u64>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub all_players: Vec<u64>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub player_count: Vec<u64>,
    /// Offset of the first slot inside the player array
    #[serde(deserialize_with = "super::hex::value")]
    pub player_addr_ptr: u64,
    #[serde(deserialize_with = "super::hex::chain")]
    pub exiled_player_id: Vec<u64>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub game_code: Vec<u64>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub host_id: Vec<u64>,
    #[serde(deserialize_with = "super::hex::chain")]
    pub client_id: Vec<u64>,
    pub player: PlayerOffsets,
    #[serde(default)]
    pub signatures: Vec<Signature>,
}

impl OffsetTable {
    /// Check the table is complete and internally consistent
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(Error::InvalidOffset("version is empty".to_string()));
        }

        let chains: [(&str, &[u64]); 17] = [
            ("meeting_hud", self.meeting_hud.as_slice()),
            ("meeting_hud_state", self.meeting_hud_state.as_slice()),
            ("game_state", self.game_state.as_slice()),
            ("all_players_ptr", self.all_players_ptr.as_slice()),
            ("all_players", self.all_players.as_slice()),
            ("player_count", self.player_count.as_slice()),
            ("exiled_player_id", self.exiled_player_id.as_slice()),
            ("game_code", self.game_code.as_slice()),
            ("host_id", self.host_id.as_slice()),
            ("client_id", self.client_id.as_slice()),
            ("player.is_local", self.player.is_local.as_slice()),
            ("player.local_x", self.player.local_x.as_slice()),
            ("player.local_y", self.player.local_y.as_slice()),
            ("player.remote_x", self.player.remote_x.as_slice()),
            ("player.remote_y", self.player.remote_y.as_slice()),
            ("player.in_vent", self.player.in_vent.as_slice()),
            ("player.client_id", self.player.client_id.as_slice()),
        ];
        if let Some((name, _)) = chains.iter().find(|(_, chain)| chain.is_empty()) {
            return Err(Error::InvalidOffset(format!("chain '{}' is empty", name)));
        }
        if matches!(&self.meeting_hud_cache_ptr, Some(chain) if chain.is_empty()) {
            return Err(Error::InvalidOffset(
                "chain 'meeting_hud_cache_ptr' is empty".to_string(),
            ));
        }

        self.player.schema.validate(REQUIRED_PLAYER_FIELDS)?;

        for signature in &self.signatures {
            parse_pattern(&signature.pattern)?;
            if signature.targets.is_empty() {
                return Err(Error::InvalidSignature(format!(
                    "signature '{}' has no targets",
                    signature.pattern
                )));
            }
            if let Some(unknown) = signature
                .targets
                .iter()
                .find(|t| !RESOLVABLE_CHAINS.contains(&t.as_str()))
            {
                return Err(Error::InvalidSignature(format!(
                    "signature '{}' targets unknown chain '{}'",
                    signature.pattern, unknown
                )));
            }
        }

        Ok(())
    }

    /// Module-relative head of a resolvable chain
    pub fn chain_head(&self, name: &str) -> Option<u64> {
        self.resolvable_chain(name)?.first().copied()
    }

    /// Replace the module-relative head of a resolvable chain
    pub fn set_chain_head(&mut self, name: &str, head: u64) -> bool {
        match self.resolvable_chain_mut(name).and_then(|c| c.first_mut()) {
            Some(slot) => {
                *slot = head;
                true
            }
            None => false,
        }
    }

    fn resolvable_chain(&self, name: &str) -> Option<&Vec<u64>> {
        match name {
            "meeting_hud" => Some(&self.meeting_hud),
            "game_state" => Some(&self.game_state),
            "all_players_ptr" => Some(&self.all_players_ptr),
            "exiled_player_id" => Some(&self.exiled_player_id),
            "game_code" => Some(&self.game_code),
            "host_id" => Some(&self.host_id),
            "client_id" => Some(&self.client_id),
            _ => None,
        }
    }

    fn resolvable_chain_mut(&mut self, name: &str) -> Option<&mut Vec<u64>> {
        match name {
            "meeting_hud" => Some(&mut self.meeting_hud),
            "game_state" => Some(&mut self.game_state),
            "all_players_ptr" => Some(&mut self.all_players_ptr),
            "exiled_player_id" => Some(&mut self.exiled_player_id),
            "game_code" => Some(&mut self.game_code),
            "host_id" => Some(&mut self.host_id),
            "client_id" => Some(&mut self.client_id),
            _ => None,
        }
    }
}

/// Parse and validate an offset table from JSON text
pub fn parse_offset_table(content: &str) -> Result<OffsetTable> {
    let table: OffsetTable = serde_json::from_str(content)?;
    table.validate()?;
    Ok(table)
}

pub fn load_offset_table<P: AsRef<Path>>(path: P) -> Result<OffsetTable> {
    let content = fs::read_to_string(&path)?;
    parse_offset_table(&content)
}

pub fn save_offset_table<P: AsRef<Path>>(path: P, table: &OffsetTable) -> Result<()> {
    let content = serde_json::to_string_pretty(table)?;
    fs::write(path, content)?;
    Ok(())
}
