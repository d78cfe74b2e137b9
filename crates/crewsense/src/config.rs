//! Engine configuration and tuning constants.

use std::time::Duration;

/// Executable name of the game process
pub const DEFAULT_PROCESS_NAME: &str = "Among Us.exe";

/// Module holding the IL2CPP game code and static fields
pub const DEFAULT_MODULE_NAME: &str = "GameAssembly.dll";

/// Roster limits
pub mod roster {
    /// Maximum number of player slots read per tick
    pub const MAX_PLAYERS: usize = 10;

    /// Player names longer than this are treated as garbage reads
    pub const MAX_NAME_LEN: usize = 64;

    /// Upper bound on a decoded player record, read once per slot per tick
    pub const MAX_RECORD_SIZE: usize = 0x1000;
}

/// Phase detection constants
pub mod phase {
    /// Ticks to keep reporting Menu while the lobby roster settles
    pub const MENU_DEBOUNCE_TICKS: u32 = 20;

    /// Meeting HUD state meaning "no meeting in progress"
    pub const MEETING_HUD_RESOLVED: i32 = 4;
}

/// Timing constants for the poll loop
pub mod timing {
    use std::time::Duration;

    /// Interval between ticks (20 Hz)
    pub const POLL_INTERVAL: Duration = Duration::from_millis(50);
}

/// Signature scan constants
pub mod scan {
    /// Bytes read from the module per scan step (1MB)
    pub const CHUNK_SIZE: usize = 0x10_0000;
}

/// Configuration for the polling engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Executable name to look for
    pub process_name: String,
    /// Module whose base anchors every pointer chain
    pub module_name: String,
    /// Delay between ticks
    pub poll_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            module_name: DEFAULT_MODULE_NAME.to_string(),
            poll_interval: timing::POLL_INTERVAL,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for EngineConfig
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    process_name: Option<String>,
    module_name: Option<String>,
    poll_interval: Option<Duration>,
}

impl EngineConfigBuilder {
    /// Set the executable name of the target process
    pub fn process_name<S: Into<String>>(mut self, name: S) -> Self {
        self.process_name = Some(name.into());
        self
    }

    /// Set the module that pointer chains are anchored to
    pub fn module_name<S: Into<String>>(mut self, name: S) -> Self {
        self.module_name = Some(name.into());
        self
    }

    /// Set the delay between ticks
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Build the configuration
    pub fn build(self) -> EngineConfig {
        let default = EngineConfig::default();
        EngineConfig {
            process_name: self.process_name.unwrap_or(default.process_name),
            module_name: self.module_name.unwrap_or(default.module_name),
            poll_interval: self.poll_interval.unwrap_or(default.poll_interval),
        }
    }
}
