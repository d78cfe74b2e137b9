//! Per-tick reads of game fields through the resolved offset table.
//!
//! Every read degrades to a default instead of failing: the game mutates
//! these structures concurrently, so torn or null reads are routine.

use crate::config::phase::MEETING_HUD_RESOLVED;
use crate::config::roster::MAX_PLAYERS;
use crate::game::{Player, PlayerRecord};
use crate::memory::{PointerChainWalker, ReadMemory};
use crate::offset::OffsetTable;

/// Players read in one tick together with the array they came from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    /// Player list object pointer, 0 when unavailable
    pub array_ptr: u64,
    /// Backing items array the slots are read from; the game reallocates
    /// it as players join
    pub items_ptr: u64,
    pub players: Vec<Player>,
}

pub struct GameReader<'a, R: ReadMemory> {
    walker: PointerChainWalker<'a, R>,
    table: &'a OffsetTable,
    module_base: u64,
}

impl<'a, R: ReadMemory> GameReader<'a, R> {
    pub fn new(reader: &'a R, table: &'a OffsetTable, module_base: u64) -> Self {
        Self {
            walker: PointerChainWalker::new(reader, table.pointer_width),
            table,
            module_base,
        }
    }

    pub fn walker(&self) -> &PointerChainWalker<'a, R> {
        &self.walker
    }

    /// Game state discriminant (0 when unreadable)
    pub fn raw_phase(&self) -> i32 {
        self.walker.read(self.module_base, &self.table.game_state, 0)
    }

    /// Meeting HUD state; a missing HUD or HUD cache reads as resolved
    pub fn meeting_hud_state(&self) -> i32 {
        let hud = self.walker.read_ptr(self.module_base, &self.table.meeting_hud);
        if hud == 0 {
            return MEETING_HUD_RESOLVED;
        }
        if let Some(cache_chain) = &self.table.meeting_hud_cache_ptr {
            if self.walker.read_ptr(hud, cache_chain) == 0 {
                return MEETING_HUD_RESOLVED;
            }
        }
        self.walker
            .read(hud, &self.table.meeting_hud_state, MEETING_HUD_RESOLVED)
    }

    pub fn exiled_player_id(&self) -> Option<u32> {
        self.walker
            .try_read::<u8>(self.module_base, &self.table.exiled_player_id)
            .map(u32::from)
    }

    /// Packed lobby code (0 when unreadable)
    pub fn game_code(&self) -> u32 {
        self.walker.read(self.module_base, &self.table.game_code, 0)
    }

    pub fn host_id(&self) -> u32 {
        self.walker.read(self.module_base, &self.table.host_id, 0)
    }

    pub fn client_id(&self) -> u32 {
        self.walker.read(self.module_base, &self.table.client_id, 0)
    }

    /// Read every occupied player slot, at most [`MAX_PLAYERS`]
    pub fn roster(&self) -> Roster {
        let array_ptr = self
            .walker
            .read_ptr(self.module_base, &self.table.all_players_ptr);
        if array_ptr == 0 {
            return Roster::default();
        }

        let items = self.walker.read_ptr(array_ptr, &self.table.all_players);
        let count = self
            .walker
            .read(array_ptr, &self.table.player_count, 0i32)
            .clamp(0, MAX_PLAYERS as i32) as usize;

        let width = self.table.pointer_width.size();
        let first_slot = items.wrapping_add(self.table.player_addr_ptr);
        let players = (0..count as u64)
            .map(|i| self.player_at(first_slot.wrapping_add(i * width)))
            .collect();

        Roster {
            array_ptr,
            items_ptr: items,
            players,
        }
    }

    /// Decode the player whose record pointer lives at `slot`.
    ///
    /// An unreadable record still yields an entry, decoded as all zeroes.
    pub fn player_at(&self, slot: u64) -> Player {
        let offsets = &self.table.player;
        let ptr = self.walker.resolve(slot, &offsets.offsets).unwrap_or(0);

        let record = (ptr != 0)
            .then(|| self.walker.reader().read_bytes(ptr, offsets.schema.width()).ok())
            .flatten()
            .and_then(|bytes| offsets.schema.decode(&bytes).ok())
            .map(|record| PlayerRecord::from(&record))
            .unwrap_or_default();

        let object = record.object_ptr;
        let name_ptr = record.name_ptr;
        let mut player = Player::from_record(ptr, record);

        player.name = self
            .walker
            .read_utf16_string(name_ptr, offsets.name_length_offset);
        player.is_local = self.walker.read(object, &offsets.is_local, 0i32) != 0;
        player.in_vent = self.walker.read(object, &offsets.in_vent, 0u8) > 0;
        player.client_id = self.walker.read(object, &offsets.client_id, 0u32);

        let (x_chain, y_chain) = if player.is_local {
            (&offsets.local_x, &offsets.local_y)
        } else {
            (&offsets.remote_x, &offsets.remote_y)
        };
        player.x = finite(self.walker.read(object, x_chain, 0.0f32));
        player.y = finite(self.walker.read(object, y_chain, 0.0f32));

        player
    }
}

/// Torn float reads can produce NaN or infinities
fn finite(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}
