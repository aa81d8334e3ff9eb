//! Byte-addressable program memory.
//!
//! A flat buffer of at most 64 KiB. Words are 16 bits, stored big-endian
//! (most-significant byte at the lower address). Every access is bounds
//! checked and reports a [`MemoryError`] instead of wrapping.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Size of the full 16-bit address space.
pub const MAX_MEMORY_SIZE: usize = 0x1_0000;

/// Smallest usable memory: one 16-bit stack slot.
pub const MIN_MEMORY_SIZE: usize = 2;

/// Fixed-size, byte-addressable memory.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    bytes: Vec<u8>,
}

impl Memory {
    /// Create a zeroed memory of `size` bytes.
    pub fn new(size: usize) -> Result<Self, MemoryError> {
        if !(MIN_MEMORY_SIZE..=MAX_MEMORY_SIZE).contains(&size) {
            return Err(MemoryError::InvalidSize(size));
        }
        Ok(Self {
            bytes: vec![0; size],
        })
    }

    /// Number of bytes in this memory.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: a memory holds at least [`MIN_MEMORY_SIZE`] bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read one byte.
    #[inline]
    pub fn read8(&self, addr: u16) -> Result<u8, MemoryError> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or_else(|| self.fault(addr, 1))
    }

    /// Write one byte.
    #[inline]
    pub fn write8(&mut self, addr: u16, value: u8) -> Result<(), MemoryError> {
        let fault = self.fault(addr, 1);
        let slot = self.bytes.get_mut(addr as usize).ok_or(fault)?;
        *slot = value;
        Ok(())
    }

    /// Read a big-endian word from `addr` and `addr + 1`.
    pub fn read16(&self, addr: u16) -> Result<u16, MemoryError> {
        let start = addr as usize;
        match self.bytes.get(start..start + 2) {
            Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
            _ => Err(self.fault(addr, 2)),
        }
    }

    /// Write a big-endian word to `addr` and `addr + 1`.
    pub fn write16(&mut self, addr: u16, value: u16) -> Result<(), MemoryError> {
        let start = addr as usize;
        let fault = self.fault(addr, 2);
        let slot = self.bytes.get_mut(start..start + 2).ok_or(fault)?;
        slot.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Borrow `len` bytes starting at `addr`, for display.
    pub fn window(&self, addr: u16, len: usize) -> Result<&[u8], MemoryError> {
        let start = addr as usize;
        self.bytes
            .get(start..start.saturating_add(len))
            .ok_or_else(|| self.fault(addr, len))
    }

    /// Address just past a `width`-byte access at `addr`.
    ///
    /// Fails when that address is beyond 0xFFFF; sequential reads never
    /// wrap back to 0x0000.
    pub fn next_addr(&self, addr: u16, width: usize) -> Result<u16, MemoryError> {
        u16::try_from(addr as usize + width)
            .map_err(|_| MemoryError::AddressOverflow { addr, width })
    }

    /// Copy a program image into memory starting at `start`.
    pub fn load(&mut self, start: u16, program: &[u8]) -> Result<(), MemoryError> {
        let start = start as usize;
        let available = self.bytes.len().saturating_sub(start);
        if program.len() > available {
            return Err(MemoryError::ProgramTooLarge {
                size: program.len(),
                available,
            });
        }
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Zero every byte.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// The whole buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn fault(&self, addr: u16, width: usize) -> MemoryError {
        MemoryError::OutOfBounds {
            addr,
            width,
            size: self.bytes.len(),
        }
    }
}

impl Default for Memory {
    /// The full 64 KiB address space.
    fn default() -> Self {
        Self {
            bytes: vec![0; MAX_MEMORY_SIZE],
        }
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only count non-zero bytes
        let non_zero = self.bytes.iter().filter(|b| **b != 0).count();

        f.debug_struct("Memory")
            .field("non_zero_bytes", &non_zero)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// An access touched a byte outside `[0, size)`.
    #[error("memory fault: {width}-byte access at 0x{addr:04X} outside 0..0x{size:04X}")]
    OutOfBounds { addr: u16, width: usize, size: usize },

    /// A sequential access would carry its address past 0xFFFF.
    #[error("{width}-byte access at 0x{addr:04X} runs past the end of the address space")]
    AddressOverflow { addr: u16, width: usize },

    /// Requested size is not addressable with 16-bit addresses.
    #[error("invalid memory size {0} (expected 2..=65536 bytes)")]
    InvalidSize(usize),

    /// Program image does not fit at the requested address.
    #[error("program size {size} exceeds available space {available}")]
    ProgramTooLarge { size: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_read_write_byte() {
        let mut mem = Memory::new(256).unwrap();
        mem.write8(10, 0xAB).unwrap();
        assert_eq!(mem.read8(10).unwrap(), 0xAB);
        assert_eq!(mem.read8(11).unwrap(), 0x00);
    }

    #[test]
    fn test_memory_word_is_big_endian() {
        let mut mem = Memory::new(256).unwrap();
        mem.write16(0x10, 0x1234).unwrap();

        assert_eq!(mem.read8(0x10).unwrap(), 0x12);
        assert_eq!(mem.read8(0x11).unwrap(), 0x34);
        assert_eq!(mem.read16(0x10).unwrap(), 0x1234);
    }

    #[test]
    fn test_memory_bounds() {
        let mut mem = Memory::new(256).unwrap();

        assert!(mem.read8(255).is_ok());
        assert!(mem.read8(256).is_err());

        // A word needs addr + 1 < size
        assert!(mem.read16(254).is_ok());
        assert_eq!(
            mem.read16(255),
            Err(MemoryError::OutOfBounds { addr: 255, width: 2, size: 256 })
        );
        assert!(mem.write16(255, 0xFFFF).is_err());
        // Failed write leaves memory untouched
        assert_eq!(mem.read8(255).unwrap(), 0);
    }

    #[test]
    fn test_full_address_space_top_word() {
        let mut mem = Memory::default();
        assert_eq!(mem.len(), MAX_MEMORY_SIZE);

        mem.write16(0xFFFE, 0xBEEF).unwrap();
        assert_eq!(mem.read16(0xFFFE).unwrap(), 0xBEEF);
        assert!(mem.read16(0xFFFF).is_err());
    }

    #[test]
    fn test_invalid_sizes() {
        assert_eq!(Memory::new(0), Err(MemoryError::InvalidSize(0)));
        assert_eq!(Memory::new(1), Err(MemoryError::InvalidSize(1)));
        assert!(Memory::new(MAX_MEMORY_SIZE + 1).is_err());
        assert!(Memory::new(MIN_MEMORY_SIZE).is_ok());
    }

    #[test]
    fn test_load_program() {
        let mut mem = Memory::new(16).unwrap();
        mem.load(4, &[1, 2, 3]).unwrap();

        assert_eq!(mem.window(4, 3).unwrap(), &[1, 2, 3]);
        assert_eq!(
            mem.load(14, &[1, 2, 3]),
            Err(MemoryError::ProgramTooLarge { size: 3, available: 2 })
        );
    }

    #[test]
    fn test_window_bounds() {
        let mem = Memory::new(16).unwrap();
        assert_eq!(mem.window(8, 8).unwrap().len(), 8);
        assert!(mem.window(9, 8).is_err());
    }

    #[test]
    fn test_next_addr_stops_at_address_space() {
        let mem = Memory::default();
        assert_eq!(mem.next_addr(0xFFFD, 2), Ok(0xFFFF));
        assert_eq!(
            mem.next_addr(0xFFFE, 2),
            Err(MemoryError::AddressOverflow { addr: 0xFFFE, width: 2 })
        );
    }

    #[test]
    fn test_clear() {
        let mut mem = Memory::new(8).unwrap();
        mem.write16(0, 0xFFFF).unwrap();
        mem.clear();
        assert!(mem.as_bytes().iter().all(|b| *b == 0));
    }
}
