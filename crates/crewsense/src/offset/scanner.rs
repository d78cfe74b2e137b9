//! Signature scanning over a module image.
//!
//! Scanning runs once per attach: the resolved offsets are relative to the
//! module base and stay valid until the process exits.

use tracing::{debug, warn};

use crate::config::scan::CHUNK_SIZE;
use crate::error::{Error, Result};
use crate::memory::ReadMemory;
use crate::offset::{AddressMode, OffsetTable, Signature, format_pattern};
use crate::process::ModuleInfo;

pub struct SignatureScanner<'a, R: ReadMemory> {
    reader: &'a R,
    module: ModuleInfo,
    chunk_size: usize,
}

impl<'a, R: ReadMemory> SignatureScanner<'a, R> {
    pub fn new(reader: &'a R, module: ModuleInfo) -> Self {
        Self {
            reader,
            module,
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Override the number of bytes read per scan step
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Copy `table` with the head of every signature target replaced by its
    /// scanned offset.
    ///
    /// Signatures that fail to resolve are logged and leave their targets at
    /// the table's pre-baked values.
    pub fn resolve(&self, table: &OffsetTable) -> OffsetTable {
        let mut resolved = table.clone();

        for signature in &table.signatures {
            match self.find(signature) {
                Ok(offset) => {
                    for target in &signature.targets {
                        if resolved.set_chain_head(target, offset) {
                            debug!("  {}: 0x{:X} (signature: {})", target, offset, signature.pattern);
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        "Signature {} unresolved ({}); keeping table offsets for {}",
                        signature.pattern,
                        e,
                        signature.targets.join(", ")
                    );
                }
            }
        }

        resolved
    }

    /// Resolve a signature to a module-relative offset
    pub fn find(&self, signature: &Signature) -> Result<u64> {
        let pattern = signature.pattern_bytes()?;
        let hit = self
            .find_first(&pattern)?
            .ok_or_else(|| Error::SignatureNotFound(format_pattern(&pattern)))?;

        let operand_address = hit + signature.pattern_offset;
        let operand = self.reader.read_u32(operand_address)?;
        let target = match signature.mode {
            AddressMode::Absolute => u64::from(operand),
            AddressMode::Relative => (operand_address + 4).wrapping_add_signed(operand as i32 as i64),
        };

        if !self.module.contains(target) {
            return Err(Error::SignatureNotFound(format!(
                "{} resolves to 0x{:X}, outside the module",
                signature.pattern, target
            )));
        }

        Ok((target - self.module.base).wrapping_add_signed(signature.result_offset))
    }

    /// Absolute address of the first match of `pattern` in the module
    pub fn find_first(&self, pattern: &[Option<u8>]) -> Result<Option<u64>> {
        let end = self.module.base + self.module.size;
        let mut address = self.module.base;
        let mut tail: Vec<u8> = Vec::new();

        while address < end {
            let read_size = ((end - address) as usize).min(self.chunk_size);
            let chunk = match self.reader.read_bytes(address, read_size) {
                Ok(bytes) => bytes,
                Err(e) if address == self.module.base => return Err(e),
                Err(e) => {
                    debug!(
                        "Code scan stopped at 0x{:X} (scanned 0x{:X} bytes): {}",
                        address,
                        address - self.module.base,
                        e
                    );
                    break;
                }
            };

            let data_base = address - tail.len() as u64;
            let mut data = tail;
            data.extend_from_slice(&chunk);

            if let Some(pos) = find_in_buffer(&data, pattern) {
                return Ok(Some(data_base + pos as u64));
            }

            let keep = pattern.len().saturating_sub(1).min(data.len());
            tail = data[data.len() - keep..].to_vec();
            address += read_size as u64;
        }

        Ok(None)
    }
}

/// First offset in `buffer` where `pattern` matches.
///
/// Candidates are found with memchr on the first concrete byte.
fn find_in_buffer(buffer: &[u8], pattern: &[Option<u8>]) -> Option<usize> {
    if pattern.is_empty() || buffer.len() < pattern.len() {
        return None;
    }
    let (anchor, anchor_byte) = pattern
        .iter()
        .enumerate()
        .find_map(|(i, byte)| byte.map(|value| (i, value)))?;
    let last_start = buffer.len() - pattern.len();

    memchr::memchr_iter(anchor_byte, &buffer[anchor..=anchor + last_start]).find(|&start| {
        pattern
            .iter()
            .zip(&buffer[start..start + pattern.len()])
            .all(|(expected, actual)| expected.is_none_or(|value| value == *actual))
    })
}
