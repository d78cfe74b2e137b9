//! In-memory stand-in for a foreign process image.
//!
//! Bytes are stored sparsely; any read touching an unwritten byte fails the
//! same way a read of unmapped memory does. Clones share the same image, so
//! tests can mutate memory between engine ticks.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::memory::ReadMemory;

#[derive(Debug, Clone, Default)]
pub struct MockMemoryReader {
    bytes: Arc<RwLock<BTreeMap<u64, u8>>>,
    /// Read calls by start address
    reads: Arc<Mutex<BTreeMap<u64, usize>>>,
}

impl MockMemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bytes(&self, address: u64, data: &[u8]) {
        let mut bytes = self.bytes.write().unwrap_or_else(PoisonError::into_inner);
        for (i, byte) in data.iter().enumerate() {
            bytes.insert(address + i as u64, *byte);
        }
    }

    pub fn write_u8(&self, address: u64, value: u8) {
        self.write_bytes(address, &[value]);
    }

    pub fn write_i32(&self, address: u64, value: i32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_u32(&self, address: u64, value: u32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_u64(&self, address: u64, value: u64) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_f32(&self, address: u64, value: f32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    /// Write a string object: i32 length at `address + length_offset`,
    /// UTF-16LE code units right after it
    pub fn write_utf16_string(&self, address: u64, length_offset: u64, value: &str) {
        let units: Vec<u16> = value.encode_utf16().collect();
        let length_address = address + length_offset;
        self.write_i32(length_address, units.len() as i32);
        let data: Vec<u8> = units.iter().flat_map(|u| u.to_le_bytes()).collect();
        self.write_bytes(length_address + 4, &data);
    }

    /// Number of reads that started at `address`
    pub fn reads_at(&self, address: u64) -> usize {
        let reads = self.reads.lock().unwrap_or_else(PoisonError::into_inner);
        reads.get(&address).copied().unwrap_or(0)
    }

    /// Forget everything in `[address, address + size)`
    pub fn clear(&self, address: u64, size: usize) {
        let mut bytes = self.bytes.write().unwrap_or_else(PoisonError::into_inner);
        for i in 0..size as u64 {
            bytes.remove(&(address + i));
        }
    }
}

impl ReadMemory for MockMemoryReader {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        *self
            .reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(address)
            .or_default() += 1;

        let bytes = self.bytes.read().unwrap_or_else(PoisonError::into_inner);
        (0..size as u64)
            .map(|i| {
                bytes
                    .get(&(address + i))
                    .copied()
                    .ok_or_else(|| Error::read_failed(address + i, "address not mapped"))
            })
            .collect()
    }
}

/// Builder for MockMemoryReader
#[derive(Debug, Default)]
pub struct MockMemoryBuilder {
    reader: MockMemoryReader,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bytes(self, address: u64, data: &[u8]) -> Self {
        self.reader.write_bytes(address, data);
        self
    }

    pub fn write_u8(self, address: u64, value: u8) -> Self {
        self.reader.write_u8(address, value);
        self
    }

    pub fn write_i32(self, address: u64, value: i32) -> Self {
        self.reader.write_i32(address, value);
        self
    }

    pub fn write_u32(self, address: u64, value: u32) -> Self {
        self.reader.write_u32(address, value);
        self
    }

    pub fn write_u64(self, address: u64, value: u64) -> Self {
        self.reader.write_u64(address, value);
        self
    }

    pub fn write_f32(self, address: u64, value: f32) -> Self {
        self.reader.write_f32(address, value);
        self
    }

    pub fn write_utf16_string(self, address: u64, length_offset: u64, value: &str) -> Self {
        self.reader.write_utf16_string(address, length_offset, value);
        self
    }

    pub fn build(self) -> MockMemoryReader {
        self.reader
    }
}
