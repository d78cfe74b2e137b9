//! Pointer chain walking with field-level defaulting.
//!
//! A chain is an ordered offset list applied to a base address. Every offset
//! except the last is added and dereferenced; the last one is only added to
//! the final address. A zero pointer anywhere along the way stops the walk,
//! and typed reads then hand back the caller's default instead of an error.
//!
//! ```text
//! base ─+o0─► [ptr] ─+o1─► [ptr] ─+o2─► value
//! ```

use bytemuck::Pod;
use encoding_rs::UTF_16LE;
use serde::{Deserialize, Serialize};

use crate::config::roster::MAX_NAME_LEN;
use crate::memory::ReadMemory;

/// Pointer size of the target process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerWidth {
    #[default]
    Bit32,
    Bit64,
}

impl PointerWidth {
    /// Size of one pointer in bytes
    pub fn size(self) -> u64 {
        match self {
            Self::Bit32 => 4,
            Self::Bit64 => 8,
        }
    }

    /// Drop sign-extension garbage from a 32-bit address promoted to u64
    pub fn truncate(self, address: u64) -> u64 {
        match self {
            Self::Bit32 => address & 0xFFFF_FFFF,
            Self::Bit64 => address,
        }
    }
}

/// Result of walking a chain: the last dereferenced address and the
/// terminal offset still to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainTarget {
    pub address: u64,
    pub last: u64,
}

impl ChainTarget {
    /// True when the walk hit a null pointer
    pub fn is_null(&self) -> bool {
        self.address == 0
    }

    /// Address of the terminal field, unless the walk was truncated
    pub fn field_address(&self) -> Option<u64> {
        (!self.is_null()).then(|| self.address.wrapping_add(self.last))
    }
}

pub struct PointerChainWalker<'a, R: ReadMemory> {
    reader: &'a R,
    width: PointerWidth,
}

impl<'a, R: ReadMemory> PointerChainWalker<'a, R> {
    pub fn new(reader: &'a R, width: PointerWidth) -> Self {
        Self { reader, width }
    }

    pub fn reader(&self) -> &'a R {
        self.reader
    }

    pub fn width(&self) -> PointerWidth {
        self.width
    }

    /// Dereference a single pointer; unreadable memory reads as null
    pub fn read_pointer(&self, address: u64) -> u64 {
        let value = match self.width {
            PointerWidth::Bit32 => self.reader.read_u32(address).map(u64::from),
            PointerWidth::Bit64 => self.reader.read_u64(address),
        };
        value.unwrap_or(0)
    }

    /// Walk every offset but the last.
    ///
    /// An empty chain addresses `base` itself.
    pub fn walk(&self, base: u64, offsets: &[u64]) -> ChainTarget {
        let mut address = self.width.truncate(base);
        let Some((&last, path)) = offsets.split_last() else {
            return ChainTarget { address, last: 0 };
        };

        for &offset in path {
            address = self.read_pointer(address.wrapping_add(offset));
            if address == 0 {
                break;
            }
        }

        ChainTarget { address, last }
    }

    /// Resolve the terminal field address, or `None` for a null base or a
    /// truncated walk
    pub fn resolve(&self, base: u64, offsets: &[u64]) -> Option<u64> {
        if self.width.truncate(base) == 0 {
            return None;
        }
        self.walk(base, offsets).field_address()
    }

    /// Read a typed value at the end of the chain
    pub fn try_read<T: Pod>(&self, base: u64, offsets: &[u64]) -> Option<T> {
        let address = self.resolve(base, offsets)?;
        self.reader.read_value(address).ok()
    }

    /// Read a typed value at the end of the chain, falling back to `default`
    pub fn read<T: Pod>(&self, base: u64, offsets: &[u64], default: T) -> T {
        self.try_read(base, offsets).unwrap_or(default)
    }

    /// Read a pointer-sized value at the end of the chain (0 when missing)
    pub fn read_ptr(&self, base: u64, offsets: &[u64]) -> u64 {
        self.resolve(base, offsets)
            .map(|address| self.read_pointer(address))
            .unwrap_or(0)
    }

    /// Read a raw span at the end of the chain
    pub fn read_bytes(&self, base: u64, offsets: &[u64], size: usize) -> Option<Vec<u8>> {
        let address = self.resolve(base, offsets)?;
        self.reader.read_bytes(address, size).ok()
    }

    /// Read a length-prefixed UTF-16LE string object.
    ///
    /// The i32 element count lives at `string + length_offset`, the code
    /// units follow immediately. NUL padding is stripped; null pointers,
    /// unreadable memory and implausible lengths all give an empty string.
    pub fn read_utf16_string(&self, string: u64, length_offset: u64) -> String {
        let string = self.width.truncate(string);
        if string == 0 {
            return String::new();
        }

        let length_address = string.wrapping_add(length_offset);
        let length = match self.reader.read_i32(length_address) {
            Ok(n) if (0..=MAX_NAME_LEN as i32).contains(&n) => n as usize,
            _ => return String::new(),
        };
        if length == 0 {
            return String::new();
        }

        match self.reader.read_bytes(length_address + 4, length * 2) {
            Ok(bytes) => {
                let (decoded, _) = UTF_16LE.decode_without_bom_handling(&bytes);
                decoded.replace('\0', "")
            }
            Err(_) => String::new(),
        }
    }
}
