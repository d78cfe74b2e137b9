//! ToolHelp-based process lookup and `ReadProcessMemory` reads.

use std::ffi::c_void;
use std::mem;

use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, Module32NextW, PROCESSENTRY32W,
    Process32FirstW, Process32NextW, TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32, TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ};

use crate::error::{Error, Result};
use crate::memory::ReadMemory;
use crate::process::{ModuleInfo, ProcessInfo, ProcessProvider};

/// Read-only handle to the target process, closed on drop
#[derive(Debug)]
pub struct ProcessHandle {
    handle: HANDLE,
    pid: u32,
}

impl ProcessHandle {
    pub fn open(pid: u32) -> Result<Self> {
        // SAFETY: OpenProcess has no preconditions; the handle is owned by
        // the returned value and closed in Drop.
        let handle = unsafe { OpenProcess(PROCESS_VM_READ | PROCESS_QUERY_INFORMATION, false, pid) }
            .map_err(|e| Error::ProcessOpenFailed(format!("pid {}: {}", pid, e)))?;
        Ok(Self { handle, pid })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // SAFETY: the handle came from OpenProcess and is closed exactly once.
        let _ = unsafe { CloseHandle(self.handle) };
    }
}

impl ReadMemory for ProcessHandle {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; size];
        let mut bytes_read = 0usize;

        // SAFETY: the buffer is valid for `size` bytes; the remote range is
        // validated by the OS and failures come back as errors.
        unsafe {
            ReadProcessMemory(
                self.handle,
                address as *const c_void,
                buffer.as_mut_ptr() as *mut c_void,
                size,
                Some(&mut bytes_read),
            )
        }
        .map_err(|e| Error::read_failed(address, e.to_string()))?;

        if bytes_read != size {
            return Err(Error::read_failed(
                address,
                format!("partial read: {} of {} bytes", bytes_read, size),
            ));
        }
        Ok(buffer)
    }
}

/// ToolHelp snapshot handle, closed on drop
struct Snapshot(HANDLE);

impl Snapshot {
    fn processes() -> Result<Self> {
        // SAFETY: no preconditions; ownership moves into Snapshot.
        let handle = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
            .map_err(|e| Error::ProcessEnumerationFailed(e.to_string()))?;
        Ok(Self(handle))
    }

    fn modules(pid: u32) -> Result<Self> {
        // SAFETY: as above.
        let handle =
            unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid) }
                .map_err(|e| Error::ModuleNotFound(format!("module snapshot failed: {}", e)))?;
        Ok(Self(handle))
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        // SAFETY: the snapshot handle is closed exactly once.
        let _ = unsafe { CloseHandle(self.0) };
    }
}

fn wide_to_string(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

fn find_process(name: &str) -> Result<Option<ProcessInfo>> {
    let snapshot = Snapshot::processes()?;
    let mut entry = PROCESSENTRY32W {
        dwSize: mem::size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };

    // SAFETY: entry.dwSize is initialized as the API requires.
    if unsafe { Process32FirstW(snapshot.0, &mut entry) }.is_err() {
        return Ok(None);
    }

    loop {
        let exe = wide_to_string(&entry.szExeFile);
        if exe.eq_ignore_ascii_case(name) {
            return Ok(Some(ProcessInfo {
                pid: entry.th32ProcessID,
                name: exe,
            }));
        }

        // SAFETY: same entry, same snapshot.
        if unsafe { Process32NextW(snapshot.0, &mut entry) }.is_err() {
            return Ok(None);
        }
    }
}

fn find_module(pid: u32, name: &str) -> Result<ModuleInfo> {
    let snapshot = Snapshot::modules(pid)?;
    let mut entry = MODULEENTRY32W {
        dwSize: mem::size_of::<MODULEENTRY32W>() as u32,
        ..Default::default()
    };

    // SAFETY: entry.dwSize is initialized as the API requires.
    if unsafe { Module32FirstW(snapshot.0, &mut entry) }.is_err() {
        return Err(Error::ModuleNotFound(name.to_string()));
    }

    loop {
        if wide_to_string(&entry.szModule).eq_ignore_ascii_case(name) {
            return Ok(ModuleInfo {
                base: entry.modBaseAddr as u64,
                size: u64::from(entry.modBaseSize),
            });
        }

        // SAFETY: same entry, same snapshot.
        if unsafe { Module32NextW(snapshot.0, &mut entry) }.is_err() {
            return Err(Error::ModuleNotFound(name.to_string()));
        }
    }
}

/// Live Windows processes
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsProcessProvider;

impl ProcessProvider for WindowsProcessProvider {
    type Handle = ProcessHandle;

    fn find_process(&self, name: &str) -> Result<Option<ProcessInfo>> {
        find_process(name)
    }

    fn open(&self, process: &ProcessInfo, module_name: &str) -> Result<(Self::Handle, ModuleInfo)> {
        let handle = ProcessHandle::open(process.pid)?;
        let module = find_module(process.pid, module_name)?;
        Ok((handle, module))
    }
}
