use serde::Serialize;

use crate::record::Record;

/// Fixed fields of one decoded player record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: u32,
    pub name_ptr: u64,
    pub color_id: u32,
    pub hat_id: u32,
    pub pet_id: u32,
    pub skin_id: u32,
    pub disconnected: bool,
    pub impostor: bool,
    pub dead: bool,
    pub task_ptr: u64,
    pub object_ptr: u64,
}

impl From<&Record> for PlayerRecord {
    fn from(record: &Record) -> Self {
        Self {
            id: record.u32("id"),
            name_ptr: record.address("name"),
            color_id: record.u32("color"),
            hat_id: record.u32("hat"),
            pet_id: record.u32("pet"),
            skin_id: record.u32("skin"),
            disconnected: record.flag("disconnected"),
            impostor: record.flag("impostor"),
            dead: record.flag("dead"),
            task_ptr: record.address("task_ptr"),
            object_ptr: record.address("object_ptr"),
        }
    }
}

/// A roster entry.
///
/// `ptr` is the address of the player record and identifies the player
/// across ticks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub ptr: u64,
    pub id: u32,
    pub client_id: u32,
    pub name: String,
    pub color_id: u32,
    pub hat_id: u32,
    pub pet_id: u32,
    pub skin_id: u32,
    pub disconnected: bool,
    pub is_impostor: bool,
    pub is_dead: bool,
    pub task_ptr: u64,
    pub object_ptr: u64,
    pub in_vent: bool,
    pub is_local: bool,
    pub x: f32,
    pub y: f32,
}

impl Player {
    pub fn from_record(ptr: u64, record: PlayerRecord) -> Self {
        Self {
            ptr,
            id: record.id,
            color_id: record.color_id,
            hat_id: record.hat_id,
            pet_id: record.pet_id,
            skin_id: record.skin_id,
            disconnected: record.disconnected,
            is_impostor: record.impostor,
            is_dead: record.dead,
            task_ptr: record.task_ptr,
            object_ptr: record.object_ptr,
            ..Self::default()
        }
    }

    /// Alive, connected and named
    pub fn is_active(&self) -> bool {
        !self.name.is_empty() && !self.is_dead && !self.disconnected
    }
}

/// Living crewmates and impostors after an exile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub crewmates: usize,
    pub impostors: usize,
}

impl Tally {
    /// Count active players, leaving out the exiled one
    pub fn count(players: &[Player], exiled_id: Option<u32>) -> Self {
        let mut tally = Self::default();
        for player in players {
            if !player.is_active() || exiled_id == Some(player.id) {
                continue;
            }
            if player.is_impostor {
                tally.impostors += 1;
            } else {
                tally.crewmates += 1;
            }
        }
        tally
    }

    /// Impostors are gone or have reached parity
    pub fn ends_game(&self) -> bool {
        self.impostors == 0 || self.impostors >= self.crewmates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldKind, FieldSpec, RecordSchema};

    fn player(id: u32, name: &str, impostor: bool) -> Player {
        Player {
            id,
            name: name.to_string(),
            is_impostor: impostor,
            ..Player::default()
        }
    }

    #[test]
    fn test_record_conversion() {
        let schema = RecordSchema::new(vec![
            FieldSpec::field(FieldKind::U32, "id"),
            FieldSpec::field(FieldKind::U32, "name"),
            FieldSpec::field(FieldKind::U8, "dead"),
            FieldSpec::skip(3),
            FieldSpec::field(FieldKind::U32, "object_ptr"),
        ]);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&0x5000u32.to_le_bytes());
        bytes.extend_from_slice(&[1, 0, 0, 0]);
        bytes.extend_from_slice(&0x6000u32.to_le_bytes());

        let record = PlayerRecord::from(&schema.decode(&bytes).unwrap());
        assert_eq!(record.id, 3);
        assert_eq!(record.name_ptr, 0x5000);
        assert!(record.dead);
        assert!(!record.impostor);
        assert_eq!(record.object_ptr, 0x6000);
        assert_eq!(record.color_id, 0);
    }

    #[test]
    fn test_tally_skips_exiled_dead_disconnected_and_unnamed() {
        let mut dead = player(2, "dead", false);
        dead.is_dead = true;
        let mut gone = player(3, "gone", true);
        gone.disconnected = true;
        let players = vec![
            player(0, "red", false),
            player(1, "blue", true),
            dead,
            gone,
            player(4, "", false),
            player(5, "exiled", false),
        ];

        let tally = Tally::count(&players, Some(5));
        assert_eq!(
            tally,
            Tally {
                crewmates: 1,
                impostors: 1
            }
        );
        assert!(tally.ends_game());
    }

    #[test]
    fn test_game_continues_with_crew_majority() {
        let players = vec![
            player(0, "a", false),
            player(1, "b", false),
            player(2, "c", true),
        ];
        assert!(!Tally::count(&players, None).ends_game());
        assert!(Tally::count(&players, Some(2)).ends_game());
    }
}
