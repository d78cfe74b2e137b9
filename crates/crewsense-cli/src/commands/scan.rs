//! Signature scan command.

use anyhow::Result;
use crewsense::OffsetTable;

use crate::offsets::{self, OffsetArgs};

/// Attach to the running game once and print what the signatures resolve to
pub fn run(args: &OffsetArgs) -> Result<()> {
    let table = offsets::acquire(args)?;
    scan(&table)
}

#[cfg(target_os = "windows")]
fn scan(table: &OffsetTable) -> Result<()> {
    use anyhow::{Context, bail};
    use crewsense::config::{DEFAULT_MODULE_NAME, DEFAULT_PROCESS_NAME};
    use crewsense::{AttachEvent, ProcessLocator, SignatureScanner, WindowsProcessProvider};

    let mut locator =
        ProcessLocator::new(WindowsProcessProvider, DEFAULT_PROCESS_NAME, DEFAULT_MODULE_NAME);
    if locator.poll() != AttachEvent::Attached {
        bail!("{} is not running (or could not be opened)", DEFAULT_PROCESS_NAME);
    }
    let attachment = locator.attachment().context("Attachment lost")?;

    println!(
        "{} (pid {}), {} at 0x{:X} (0x{:X} bytes)",
        attachment.process.name,
        attachment.process.pid,
        DEFAULT_MODULE_NAME,
        attachment.module.base,
        attachment.module.size
    );
    println!();

    let scanner = SignatureScanner::new(&attachment.handle, attachment.module);
    let mut found = 0;
    for signature in &table.signatures {
        match scanner.find(signature) {
            Ok(offset) => {
                found += 1;
                println!("{}", signature.pattern);
                for target in &signature.targets {
                    let table_head = table.chain_head(target).unwrap_or(0);
                    let marker = if table_head == offset { "" } else { "  (table differs)" };
                    println!(
                        "  {:<18} 0x{:08X}  table 0x{:08X}{}",
                        target, offset, table_head, marker
                    );
                }
            }
            Err(e) => println!("{}\n  not found: {}", signature.pattern, e),
        }
    }

    println!();
    println!("Resolved {}/{} signatures", found, table.signatures.len());
    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn scan(_table: &OffsetTable) -> Result<()> {
    anyhow::bail!("Signature scanning is only supported on Windows")
}
