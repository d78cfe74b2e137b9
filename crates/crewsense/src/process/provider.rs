use serde::Serialize;

use crate::error::Result;
use crate::memory::ReadMemory;

/// A running process matched by executable name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
}

/// Load address and image size of a module inside the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ModuleInfo {
    pub base: u64,
    pub size: u64,
}

impl ModuleInfo {
    pub fn end(&self) -> u64 {
        self.base + self.size
    }

    pub fn contains(&self, address: u64) -> bool {
        address >= self.base && address < self.end()
    }
}

/// OS seam for finding and opening the target process
pub trait ProcessProvider {
    /// Read-only handle; closing happens on drop
    type Handle: ReadMemory;

    /// Look up a process by executable name (ASCII case-insensitive).
    ///
    /// `Ok(None)` means the process is not running; an error means the
    /// process list could not be read at all.
    fn find_process(&self, name: &str) -> Result<Option<ProcessInfo>>;

    /// Open `process` for reading and locate `module_name` inside it
    fn open(&self, process: &ProcessInfo, module_name: &str) -> Result<(Self::Handle, ModuleInfo)>;
}
