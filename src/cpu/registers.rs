//! The VM register file.
//!
//! Twelve 16-bit registers, in this fixed order:
//! - IP: instruction pointer
//! - ACC: accumulator (destination of arithmetic)
//! - R1..R8: general purpose
//! - SP / FP: stack pointer and frame pointer
//!
//! Registers live in their own 24-byte backing store, two big-endian bytes
//! per slot, so register index `k` and byte offset `k * 2` are
//! interchangeable. This store never aliases program memory.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Number of registers in the file.
pub const REGISTER_COUNT: usize = 12;

/// Size of the register backing store in bytes.
pub const REGISTER_BYTES: usize = REGISTER_COUNT * 2;

/// A register name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Register {
    Ip,
    Acc,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    Sp,
    Fp,
}

impl Register {
    /// Every register, in index order.
    pub const ALL: [Register; REGISTER_COUNT] = [
        Register::Ip,
        Register::Acc,
        Register::R1,
        Register::R2,
        Register::R3,
        Register::R4,
        Register::R5,
        Register::R6,
        Register::R7,
        Register::R8,
        Register::Sp,
        Register::Fp,
    ];

    /// Position in the enumeration; also the operand byte that selects it.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Byte offset of this register's slot in the backing store.
    #[inline]
    pub const fn offset(self) -> usize {
        self as usize * 2
    }

    /// Upper-case display name.
    pub const fn name(self) -> &'static str {
        match self {
            Register::Ip => "IP",
            Register::Acc => "ACC",
            Register::R1 => "R1",
            Register::R2 => "R2",
            Register::R3 => "R3",
            Register::R4 => "R4",
            Register::R5 => "R5",
            Register::R6 => "R6",
            Register::R7 => "R7",
            Register::R8 => "R8",
            Register::Sp => "SP",
            Register::Fp => "FP",
        }
    }

    /// Select a register by operand byte.
    ///
    /// Out-of-range indices are rejected, never wrapped onto the file.
    pub fn from_index(index: u8) -> Result<Self, RegisterError> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(RegisterError::IndexOutOfRange {
                index,
                count: REGISTER_COUNT,
            })
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Register {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|reg| reg.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RegisterError::UnknownName(s.to_string()))
    }
}

impl TryFrom<u8> for Register {
    type Error = RegisterError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

/// The register file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    slots: [u8; REGISTER_BYTES],
}

impl Registers {
    /// Create a register file with every register zeroed.
    pub fn new() -> Self {
        Self {
            slots: [0; REGISTER_BYTES],
        }
    }

    /// Zero every register.
    pub fn reset(&mut self) {
        self.slots = [0; REGISTER_BYTES];
    }

    /// Read a register.
    #[inline]
    pub fn get(&self, reg: Register) -> u16 {
        let at = reg.offset();
        u16::from_be_bytes([self.slots[at], self.slots[at + 1]])
    }

    /// Write a register.
    #[inline]
    pub fn set(&mut self, reg: Register, value: u16) {
        let at = reg.offset();
        self.slots[at..at + 2].copy_from_slice(&value.to_be_bytes());
    }

    /// Read a register by name (case-insensitive).
    pub fn get_by_name(&self, name: &str) -> Result<u16, RegisterError> {
        Ok(self.get(name.parse()?))
    }

    /// Write a register by name (case-insensitive).
    pub fn set_by_name(&mut self, name: &str, value: u16) -> Result<(), RegisterError> {
        self.set(name.parse()?, value);
        Ok(())
    }

    /// Read a register by numeric index.
    pub fn get_by_index(&self, index: u8) -> Result<u16, RegisterError> {
        Ok(self.get(Register::from_index(index)?))
    }

    /// Write a register by numeric index.
    pub fn set_by_index(&mut self, index: u8, value: u16) -> Result<(), RegisterError> {
        self.set(Register::from_index(index)?, value);
        Ok(())
    }

    /// All registers with their values, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Register, u16)> + '_ {
        Register::ALL.iter().map(move |reg| (*reg, self.get(*reg)))
    }

    /// Raw backing store.
    pub fn as_bytes(&self) -> &[u8] {
        &self.slots
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (reg, value) in self.iter() {
            map.entry(&reg.name(), &format_args!("0x{:04X}", value));
        }
        map.finish()
    }
}

/// Errors from register lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("invalid register: {0:?}")]
    UnknownName(String),

    #[error("invalid register index {index} (register file has {count})")]
    IndexOutOfRange { index: u8, count: usize },
}
