use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use tracing::debug;

use crate::config::phase::{MEETING_HUD_RESOLVED, MENU_DEBOUNCE_TICKS};
use crate::game::{Player, Tally};

/// High-level game phase
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum GamePhase {
    Menu,
    Lobby,
    Discussion,
    Tasks,
    #[default]
    Unknown,
}

impl GamePhase {
    /// Phases in which a lobby code is meaningful
    pub fn in_lobby(self) -> bool {
        matches!(self, Self::Lobby | Self::Discussion | Self::Tasks)
    }
}

/// Raw per-tick values the phase is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseInputs {
    /// Game state discriminant
    pub raw_phase: i32,
    /// Meeting HUD state, [`MEETING_HUD_RESOLVED`] when no meeting exists
    pub meeting_hud_state: i32,
    /// Items array backing the player list
    pub player_array: u64,
}

/// Turns raw discriminants into a stable phase.
///
/// Two corrections are layered on the raw mapping:
///
/// - A meeting whose exile ends the game would otherwise show up as Tasks
///   until the game returns to the lobby. The exile is tallied on the
///   Discussion to Tasks edge and the phase is latched to Lobby.
/// - Joining a lobby briefly reports Lobby while the player list is still
///   being populated. Menu is held for up to [`MENU_DEBOUNCE_TICKS`] ticks
///   until the roster settles.
#[derive(Debug, Clone)]
pub struct PhaseDetector {
    phase: GamePhase,
    exile_causes_end: bool,
    menu_countdown: u32,
    last_player_array: u64,
}

impl PhaseDetector {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Unknown,
            exile_causes_end: false,
            menu_countdown: MENU_DEBOUNCE_TICKS,
            last_player_array: 0,
        }
    }

    /// Phase reported by the last update
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn exile_causes_end(&self) -> bool {
        self.exile_causes_end
    }

    pub fn menu_countdown(&self) -> u32 {
        self.menu_countdown
    }

    pub fn update(
        &mut self,
        inputs: &PhaseInputs,
        players: &[Player],
        exiled_id: Option<u32>,
    ) -> GamePhase {
        let previous = self.phase;

        let mut phase = match inputs.raw_phase {
            0 => {
                self.exile_causes_end = false;
                GamePhase::Menu
            }
            1 | 3 => {
                self.exile_causes_end = false;
                GamePhase::Lobby
            }
            _ if self.exile_causes_end => GamePhase::Lobby,
            _ if inputs.meeting_hud_state < MEETING_HUD_RESOLVED => GamePhase::Discussion,
            _ => GamePhase::Tasks,
        };

        if previous == GamePhase::Discussion && phase == GamePhase::Tasks {
            let tally = Tally::count(players, exiled_id);
            if tally.ends_game() {
                debug!(
                    "Exile ends the game ({} crew, {} impostors left)",
                    tally.crewmates, tally.impostors
                );
                phase = GamePhase::Lobby;
                self.exile_causes_end = true;
            }
        }

        if previous == GamePhase::Menu
            && phase == GamePhase::Lobby
            && self.menu_countdown > 0
            && self.roster_unsettled(inputs.player_array, players)
        {
            phase = GamePhase::Menu;
            self.menu_countdown -= 1;
        } else {
            self.menu_countdown = MENU_DEBOUNCE_TICKS;
        }

        self.last_player_array = inputs.player_array;
        self.phase = phase;
        phase
    }

    /// Reset to the initial state (e.g. after reattaching)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn roster_unsettled(&self, player_array: u64, players: &[Player]) -> bool {
        player_array == self.last_player_array
            || players.len() == 1
            || !players.iter().any(|p| p.is_local && !p.disconnected)
    }
}

impl Default for PhaseDetector {
    fn default() -> Self {
        Self::new()
    }
}
