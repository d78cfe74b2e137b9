//! Target process discovery and read-only attachment.

mod locator;
#[doc(hidden)]
pub mod mock;
mod provider;
#[cfg(target_os = "windows")]
mod win32;

pub use locator::{AttachEvent, Attachment, ProcessLocator};
pub use mock::MockProcessProvider;
pub use provider::{ModuleInfo, ProcessInfo, ProcessProvider};
#[cfg(target_os = "windows")]
pub use win32::{ProcessHandle, WindowsProcessProvider};
