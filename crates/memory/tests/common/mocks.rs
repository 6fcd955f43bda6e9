use pspmem_core::common::error::{MemoryError, Result};
use pspmem_core::MemoryBase;
use std::cell::RefCell;

/// A single access observed by `MockMemory`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    ReadU8(u32),
    ReadU16(u32),
    ReadU32(u32),
    ReadWord(u32),
    Write(u32, usize),
}

/// Flat little-endian memory at `base` that records every typed access.
///
/// Addresses are used as given (no masking) so tests can see exactly what the code
/// under test asked for. Accesses outside `[base, base + len)` fail as unmapped.
pub struct MockMemory {
    data: Vec<u8>,
    base: u32,
    log: RefCell<Vec<Access>>,
}

impl MockMemory {
    pub fn new(size: usize, base: u32) -> Self {
        Self {
            data: vec![0; size],
            base,
            log: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bytes(mut self, address: u32, bytes: &[u8]) -> Self {
        let start = (address - self.base) as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.log.borrow().clone()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    fn record(&self, access: Access) {
        self.log.borrow_mut().push(access);
    }

    fn offset(&self, address: u32, width: usize) -> Result<usize> {
        let offset = address.wrapping_sub(self.base) as usize;
        if address < self.base || offset + width > self.data.len() {
            return Err(MemoryError::Unmapped { address });
        }
        Ok(offset)
    }
}

impl MemoryBase for MockMemory {
    fn read_u8(&self, address: u32) -> Result<u8> {
        self.record(Access::ReadU8(address));
        Ok(self.data[self.offset(address, 1)?])
    }

    fn read_u16(&self, address: u32) -> Result<u16> {
        self.record(Access::ReadU16(address));
        let o = self.offset(address, 2)?;
        Ok(u16::from_le_bytes([self.data[o], self.data[o + 1]]))
    }

    fn read_u32(&self, address: u32) -> Result<u32> {
        self.record(Access::ReadU32(address));
        let o = self.offset(address, 4)?;
        Ok(u32::from_le_bytes(self.data[o..o + 4].try_into().unwrap()))
    }

    fn read_u32_word(&self, word_index: u32) -> Result<u32> {
        self.record(Access::ReadWord(word_index));
        let o = self.offset(word_index << 2, 4)?;
        Ok(u32::from_le_bytes(self.data[o..o + 4].try_into().unwrap()))
    }

    fn write_u8(&mut self, address: u32, value: u8) -> Result<()> {
        self.record(Access::Write(address, 1));
        let o = self.offset(address, 1)?;
        self.data[o] = value;
        Ok(())
    }

    fn write_u16(&mut self, address: u32, value: u16) -> Result<()> {
        self.record(Access::Write(address, 2));
        let o = self.offset(address, 2)?;
        self.data[o..o + 2].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn write_u32(&mut self, address: u32, value: u32) -> Result<()> {
        self.record(Access::Write(address, 4));
        let o = self.offset(address, 4)?;
        self.data[o..o + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn slice(&self, low: u32, high: u32) -> Result<&[u8]> {
        let o = self.offset(low, (high - low) as usize)?;
        Ok(&self.data[o..o + (high - low) as usize])
    }

    fn slice_mut(&mut self, low: u32, high: u32) -> Result<&mut [u8]> {
        let o = self.offset(low, (high - low) as usize)?;
        Ok(&mut self.data[o..o + (high - low) as usize])
    }

    fn available_after_address(&self, address: u32) -> Result<usize> {
        let o = self.offset(address, 0)?;
        Ok(self.data.len() - o)
    }
}
