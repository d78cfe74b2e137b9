use bytemuck::Pod;

use crate::error::{Error, Result};

/// Read-only access to another process's address space.
///
/// Implementors only provide [`read_bytes`](ReadMemory::read_bytes); typed
/// reads are decoded little-endian from the returned span.
pub trait ReadMemory {
    /// Read exactly `size` bytes starting at `address`
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    /// Read a plain-old-data value at `address` (unaligned)
    fn read_value<T: Pod>(&self, address: u64) -> Result<T>
    where
        Self: Sized,
    {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(address, size)?;
        if bytes.len() != size {
            return Err(Error::read_failed(
                address,
                format!("short read: expected {} bytes, got {}", size, bytes.len()),
            ));
        }
        Ok(bytemuck::pod_read_unaligned(&bytes))
    }

    fn read_u8(&self, address: u64) -> Result<u8>
    where
        Self: Sized,
    {
        self.read_value(address)
    }

    fn read_i32(&self, address: u64) -> Result<i32>
    where
        Self: Sized,
    {
        self.read_value(address)
    }

    fn read_u32(&self, address: u64) -> Result<u32>
    where
        Self: Sized,
    {
        self.read_value(address)
    }

    fn read_u64(&self, address: u64) -> Result<u64>
    where
        Self: Sized,
    {
        self.read_value(address)
    }

    fn read_f32(&self, address: u64) -> Result<f32>
    where
        Self: Sized,
    {
        self.read_value(address)
    }
}

impl<R: ReadMemory> ReadMemory for &R {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        (**self).read_bytes(address, size)
    }
}
