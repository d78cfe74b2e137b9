//! In-memory process provider for tests.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{Error, Result};
use crate::memory::MockMemoryReader;
use crate::process::{ModuleInfo, ProcessInfo, ProcessProvider};

#[derive(Debug, Default)]
struct MockProcessState {
    running: Option<ProcessInfo>,
    fail_open: bool,
    fail_enumeration: bool,
    opens: usize,
}

/// Simulates one target process whose memory is a [`MockMemoryReader`].
///
/// Clones share state, so a test can keep one copy to launch and kill the
/// process while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MockProcessProvider {
    state: Arc<Mutex<MockProcessState>>,
    memory: MockMemoryReader,
    module: ModuleInfo,
}

impl MockProcessProvider {
    pub fn new(memory: MockMemoryReader, module: ModuleInfo) -> Self {
        Self {
            state: Arc::default(),
            memory,
            module,
        }
    }

    pub fn memory(&self) -> &MockMemoryReader {
        &self.memory
    }

    pub fn module(&self) -> ModuleInfo {
        self.module
    }

    /// Start (or restart) the process under a new pid
    pub fn launch(&self, pid: u32, name: &str) {
        self.state().running = Some(ProcessInfo {
            pid,
            name: name.to_string(),
        });
    }

    pub fn exit(&self) {
        self.state().running = None;
    }

    /// Make every open attempt fail, as a permission error would
    pub fn set_fail_open(&self, fail: bool) {
        self.state().fail_open = fail;
    }

    /// Make process enumeration itself fail
    pub fn set_fail_enumeration(&self, fail: bool) {
        self.state().fail_enumeration = fail;
    }

    /// Number of open attempts so far
    pub fn open_count(&self) -> usize {
        self.state().opens
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockProcessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProcessProvider for MockProcessProvider {
    type Handle = MockMemoryReader;

    fn find_process(&self, name: &str) -> Result<Option<ProcessInfo>> {
        let state = self.state();
        if state.fail_enumeration {
            return Err(Error::ProcessEnumerationFailed(
                "snapshot unavailable".to_string(),
            ));
        }
        Ok(state
            .running
            .clone()
            .filter(|process| process.name.eq_ignore_ascii_case(name)))
    }

    fn open(&self, process: &ProcessInfo, _module_name: &str) -> Result<(Self::Handle, ModuleInfo)> {
        let mut state = self.state();
        state.opens += 1;
        if state.fail_open {
            return Err(Error::ProcessOpenFailed(format!(
                "access denied (pid {})",
                process.pid
            )));
        }
        Ok((self.memory.clone(), self.module))
    }
}
