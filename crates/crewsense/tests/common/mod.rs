//! Synthetic game memory laid out per `fixtures/offsets.json`.
#![allow(dead_code)]

use crewsense::{
    Engine, EngineConfig, EngineEvent, MockMemoryReader, MockProcessProvider, ModuleInfo,
    OffsetTable, Snapshot, load_offset_table,
};
use std::path::Path;
use std::sync::Arc;

pub const BASE: u64 = 0x1000_0000;
pub const MODULE_SIZE: u64 = 0x100;
pub const PID: u32 = 4242;
pub const PROCESS_NAME: &str = "Among Us.exe";

// Objects behind the static chains
const STATE_OBJECT: u64 = 0x10_2000;
const MEETING_STATICS: u64 = 0x11_1000;
const HUD: u64 = 0x12_0000;
const EXILED: u64 = 0x12_1000;
const PLAYERS_STATICS: u64 = 0x13_2000;
const CLIENT: u64 = 0x15_3000;
const PLAYER_ARRAY: u64 = 0x14_0000;
const PLAYER_ITEMS: u64 = 0x14_1000;
const RECORDS: u64 = 0x20_0000;
const RECORD_STRIDE: u64 = 0x1000;

pub type TestEngine = Engine<MockProcessProvider, Vec<EngineEvent>>;

pub fn fixture_table() -> OffsetTable {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/offsets.json");
    load_offset_table(path).expect("fixture table")
}

#[derive(Debug, Clone, Default)]
pub struct TestPlayer {
    pub id: u32,
    pub name: String,
    pub color: u32,
    pub impostor: bool,
    pub dead: bool,
    pub disconnected: bool,
    pub local: bool,
    pub in_vent: bool,
    pub x: f32,
    pub y: f32,
}

impl TestPlayer {
    pub fn crew(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            color: id,
            ..Self::default()
        }
    }

    pub fn impostor(mut self) -> Self {
        self.impostor = true;
        self
    }

    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }

    pub fn dead(mut self) -> Self {
        self.dead = true;
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

/// A process image whose pointer chains match the fixture table
pub struct GameImage {
    pub memory: MockMemoryReader,
    pub table: OffsetTable,
    array_ptr: u64,
    items_ptr: u64,
}

impl GameImage {
    pub fn new() -> Self {
        let table = fixture_table();
        let memory = MockMemoryReader::new();

        // game_state: [0x1C57F54, 0x5C, 0x0, 0x64]
        memory.write_u32(BASE + table.game_state[0], 0x10_0000);
        memory.write_u32(0x10_005C, 0x10_1000);
        memory.write_u32(0x10_1000, STATE_OBJECT as u32);

        // meeting_hud: [0x1C573A4, 0x5C, 0x0]; static slot starts empty
        memory.write_u32(BASE + table.meeting_hud[0], 0x11_0000);
        memory.write_u32(0x11_005C, MEETING_STATICS as u32);
        memory.write_u32(MEETING_STATICS, 0);

        // all_players_ptr: [0x1C57BE8, 0x5C, 0x0, 0x24]
        memory.write_u32(BASE + table.all_players_ptr[0], 0x13_0000);
        memory.write_u32(0x13_005C, 0x13_1000);
        memory.write_u32(0x13_1000, PLAYERS_STATICS as u32);

        // game_code / host_id / client_id: [0x1B5AC2C, 0x5C, 0x0, 0x20, ..]
        memory.write_u32(BASE + table.game_code[0], 0x15_0000);
        memory.write_u32(0x15_005C, 0x15_1000);
        memory.write_u32(0x15_1000, 0x15_2000);
        memory.write_u32(0x15_2020, CLIENT as u32);

        let image = Self {
            memory,
            table,
            array_ptr: PLAYER_ARRAY,
            items_ptr: PLAYER_ITEMS,
        };
        image.set_raw_phase(0);
        image.set_game_code(0);
        image.set_host(0, 0);
        image.set_players(&[]);
        image
    }

    pub fn provider(&self) -> MockProcessProvider {
        MockProcessProvider::new(
            self.memory.clone(),
            ModuleInfo {
                base: BASE,
                size: MODULE_SIZE,
            },
        )
    }

    /// Engine attached to a running process backed by this image
    pub fn engine(&self) -> (MockProcessProvider, TestEngine) {
        let provider = self.provider();
        provider.launch(PID, PROCESS_NAME);
        let engine = Engine::new(
            provider.clone(),
            self.table.clone(),
            EngineConfig::default(),
            Vec::new(),
        )
        .expect("valid table");
        (provider, engine)
    }

    pub fn set_raw_phase(&self, raw: i32) {
        self.memory.write_i32(STATE_OBJECT + 0x64, raw);
    }

    pub fn set_game_code(&self, code: u32) {
        self.memory.write_u32(CLIENT + 0x28, code);
    }

    pub fn set_host(&self, host_id: u32, client_id: u32) {
        self.memory.write_u32(CLIENT + 0x3C, host_id);
        self.memory.write_u32(CLIENT + 0x40, client_id);
    }

    /// Open a meeting HUD in discussion state
    pub fn start_meeting(&self) {
        self.memory.write_u32(MEETING_STATICS, HUD as u32);
        self.memory.write_u32(HUD + 0x8, 0xCAC4E);
        self.memory.write_i32(HUD + 0x84, 1);
        self.memory.write_u32(HUD + 0x94, EXILED as u32);
    }

    /// Resolve the meeting, exiling `id` (0xFF for nobody)
    pub fn end_meeting(&self, exiled_id: u8) {
        self.memory.write_u8(EXILED + 0x8, exiled_id);
        self.memory.write_i32(HUD + 0x84, 4);
    }

    /// Tear the HUD down entirely
    pub fn close_meeting_hud(&self) {
        self.memory.write_u32(MEETING_STATICS, 0);
    }

    /// Move the list object, keeping its items array
    pub fn move_player_list(&mut self) {
        let count = self.player_count();
        self.array_ptr += 0x100;
        self.memory.write_u32(self.array_ptr + 0x8, self.items_ptr as u32);
        self.memory.write_i32(self.array_ptr + 0xC, count);
        self.memory
            .write_u32(PLAYERS_STATICS + 0x24, self.array_ptr as u32);
    }

    /// Copy the slots into a new items array, as the game does when the
    /// list grows
    pub fn reallocate_items(&mut self) {
        use crewsense::ReadMemory;
        let slots = self.player_count().clamp(0, 10) as usize * 4;
        let bytes = self
            .memory
            .read_bytes(self.items_ptr + 0x10, slots)
            .unwrap_or_default();
        self.items_ptr += 0x100;
        self.memory.write_bytes(self.items_ptr + 0x10, &bytes);
        self.memory
            .write_u32(self.array_ptr + 0x8, self.items_ptr as u32);
    }

    pub fn set_player_count(&self, count: i32) {
        self.memory.write_i32(self.array_ptr + 0xC, count);
    }

    pub fn player_count(&self) -> i32 {
        use crewsense::ReadMemory;
        self.memory.read_i32(self.array_ptr + 0xC).unwrap_or(0)
    }

    pub fn record_ptr(index: usize) -> u64 {
        RECORDS + index as u64 * RECORD_STRIDE
    }

    pub fn set_players(&self, players: &[TestPlayer]) {
        let items = self.items_ptr;
        self.memory.write_u32(PLAYERS_STATICS + 0x24, self.array_ptr as u32);
        self.memory.write_u32(self.array_ptr + 0x8, items as u32);
        self.set_player_count(players.len() as i32);

        for (i, player) in players.iter().enumerate() {
            let record = Self::record_ptr(i);
            self.memory
                .write_u32(items + 0x10 + i as u64 * 4, record as u32);
            self.write_player(record, player);
        }
    }

    fn write_player(&self, record: u64, player: &TestPlayer) {
        let name = record + 0x800;
        let object = record + 0x400;
        let transform = record + 0x600;
        let m = &self.memory;

        m.write_bytes(record, &[0; 48]);
        m.write_u32(record + 0x08, player.id);
        m.write_u32(record + 0x0C, name as u32);
        m.write_u32(record + 0x10, player.color);
        m.write_u32(record + 0x20, player.disconnected as u32);
        m.write_u8(record + 0x28, player.impostor as u8);
        m.write_u8(record + 0x29, player.dead as u8);
        m.write_u32(record + 0x2C, object as u32);

        m.write_utf16_string(name, 0x8, &player.name);

        m.write_i32(object + 0x54, player.local as i32);
        m.write_u8(object + 0x31, player.in_vent as u8);
        m.write_u32(object + 0x1C, 1000 + player.id);
        m.write_u32(object + 0x60, transform as u32);
        let (x, y) = if player.local { (0x50, 0x54) } else { (0x3C, 0x40) };
        m.write_f32(transform + x, player.x);
        m.write_f32(transform + y, player.y);
    }
}

/// Snapshots carried by `StateChanged` events, in order
pub fn state_changes(events: &[EngineEvent]) -> Vec<Arc<Snapshot>> {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::StateChanged(snapshot) => Some(Arc::clone(snapshot)),
            _ => None,
        })
        .collect()
}

/// A lobby with a connected local player and three others
pub fn full_lobby() -> Vec<TestPlayer> {
    vec![
        TestPlayer::crew(0, "Red").local().at(1.0, 2.0),
        TestPlayer::crew(1, "Blue").at(-3.5, 0.25),
        TestPlayer::crew(2, "Green"),
        TestPlayer::crew(3, "Pink").impostor(),
    ]
}
