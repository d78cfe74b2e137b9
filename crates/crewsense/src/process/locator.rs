use tracing::{debug, info};

use crate::process::{ModuleInfo, ProcessInfo, ProcessProvider};

/// Outcome of one locator poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachEvent {
    Unchanged,
    Attached,
    Detached,
}

/// An open target: process identity, module location and the read handle
#[derive(Debug)]
pub struct Attachment<H> {
    pub process: ProcessInfo,
    pub module: ModuleInfo,
    pub handle: H,
}

/// Tracks whether the target process is running and holds its handle while
/// it is.
///
/// Open failures (access denied, the process exiting mid-open, the module
/// not loaded yet) leave the locator detached; the next poll retries.
pub struct ProcessLocator<P: ProcessProvider> {
    provider: P,
    process_name: String,
    module_name: String,
    attachment: Option<Attachment<P::Handle>>,
}

impl<P: ProcessProvider> ProcessLocator<P> {
    pub fn new(provider: P, process_name: &str, module_name: &str) -> Self {
        Self {
            provider,
            process_name: process_name.to_string(),
            module_name: module_name.to_string(),
            attachment: None,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn attachment(&self) -> Option<&Attachment<P::Handle>> {
        self.attachment.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// Check the process list once and update the attachment.
    ///
    /// A changed pid counts as the old process exiting: this poll reports
    /// `Detached` and the next one attaches to the new instance. A failed
    /// enumeration changes nothing.
    pub fn poll(&mut self) -> AttachEvent {
        let found = match self.provider.find_process(&self.process_name) {
            Ok(found) => found,
            Err(e) => {
                debug!("Skipping poll: {}", e);
                return AttachEvent::Unchanged;
            }
        };
        let attached_pid = self.attachment.as_ref().map(|a| a.process.pid);

        match (attached_pid, found) {
            (Some(pid), Some(process)) if pid == process.pid => AttachEvent::Unchanged,
            (Some(_), _) => {
                self.detach();
                AttachEvent::Detached
            }
            (None, Some(process)) => self.attach(process),
            (None, None) => AttachEvent::Unchanged,
        }
    }

    /// Drop the handle, if any. Returns whether something was attached.
    pub fn detach(&mut self) -> bool {
        match self.attachment.take() {
            Some(attachment) => {
                info!(
                    "Detached from {} (pid {})",
                    attachment.process.name, attachment.process.pid
                );
                true
            }
            None => false,
        }
    }

    fn attach(&mut self, process: ProcessInfo) -> AttachEvent {
        match self.provider.open(&process, &self.module_name) {
            Ok((handle, module)) => {
                info!(
                    "Attached to {} (pid {}), {} at 0x{:X} (0x{:X} bytes)",
                    process.name, process.pid, self.module_name, module.base, module.size
                );
                self.attachment = Some(Attachment {
                    process,
                    module,
                    handle,
                });
                AttachEvent::Attached
            }
            Err(e) => {
                debug!("Found {} (pid {}) but could not open it: {}", process.name, process.pid, e);
                AttachEvent::Unchanged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryReader;
    use crate::process::MockProcessProvider;

    fn locator() -> (MockProcessProvider, ProcessLocator<MockProcessProvider>) {
        let provider = MockProcessProvider::new(
            MockMemoryReader::new(),
            ModuleInfo {
                base: 0x1000_0000,
                size: 0x1000,
            },
        );
        let locator = ProcessLocator::new(provider.clone(), "Among Us.exe", "GameAssembly.dll");
        (provider, locator)
    }

    #[test]
    fn test_attach_and_detach() {
        let (provider, mut locator) = locator();
        assert_eq!(locator.poll(), AttachEvent::Unchanged);
        assert!(!locator.is_attached());

        provider.launch(42, "Among Us.exe");
        assert_eq!(locator.poll(), AttachEvent::Attached);
        assert_eq!(locator.attachment().unwrap().process.pid, 42);
        assert_eq!(locator.attachment().unwrap().module.base, 0x1000_0000);
        assert_eq!(locator.poll(), AttachEvent::Unchanged);

        provider.exit();
        assert_eq!(locator.poll(), AttachEvent::Detached);
        assert!(locator.attachment().is_none());
        assert_eq!(locator.poll(), AttachEvent::Unchanged);
    }

    #[test]
    fn test_name_match_ignores_ascii_case() {
        let (provider, mut locator) = locator();
        provider.launch(7, "among us.EXE");
        assert_eq!(locator.poll(), AttachEvent::Attached);
    }

    #[test]
    fn test_open_failure_is_retried() {
        let (provider, mut locator) = locator();
        provider.launch(42, "Among Us.exe");
        provider.set_fail_open(true);

        assert_eq!(locator.poll(), AttachEvent::Unchanged);
        assert_eq!(locator.poll(), AttachEvent::Unchanged);
        assert!(!locator.is_attached());

        provider.set_fail_open(false);
        assert_eq!(locator.poll(), AttachEvent::Attached);
        assert_eq!(provider.open_count(), 3);
    }

    #[test]
    fn test_enumeration_failure_keeps_attachment() {
        let (provider, mut locator) = locator();
        provider.launch(42, "Among Us.exe");
        assert_eq!(locator.poll(), AttachEvent::Attached);

        provider.set_fail_enumeration(true);
        assert_eq!(locator.poll(), AttachEvent::Unchanged);
        assert_eq!(locator.poll(), AttachEvent::Unchanged);
        assert_eq!(locator.attachment().unwrap().process.pid, 42);

        provider.set_fail_enumeration(false);
        assert_eq!(locator.poll(), AttachEvent::Unchanged);
        provider.exit();
        assert_eq!(locator.poll(), AttachEvent::Detached);
        assert_eq!(provider.open_count(), 1);
    }

    #[test]
    fn test_restarted_process_is_reattached() {
        let (provider, mut locator) = locator();
        provider.launch(42, "Among Us.exe");
        assert_eq!(locator.poll(), AttachEvent::Attached);

        provider.launch(43, "Among Us.exe");
        assert_eq!(locator.poll(), AttachEvent::Detached);
        assert_eq!(locator.poll(), AttachEvent::Attached);
        assert_eq!(locator.attachment().unwrap().process.pid, 43);
    }

    #[test]
    fn test_detach_without_attachment() {
        let (_, mut locator) = locator();
        assert!(!locator.detach());
    }
}
