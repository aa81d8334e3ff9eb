//! Instruction decoder and encoder.
//!
//! An instruction is one opcode byte followed by its operands:
//! register operands take one byte, literals and addresses take two
//! bytes (big-endian). Instructions exist only as bytes in memory; the
//! decoder turns them into a closed [`Instruction`] enum once, and the
//! executor matches on it exhaustively.

use crate::cpu::memory::{Memory, MemoryError};
use crate::cpu::registers::{Register, RegisterError};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Opcode byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    MovLitReg = 0x10,
    MovRegReg = 0x11,
    MovRegMem = 0x12,
    MovMemReg = 0x13,
    AddRegReg = 0x14,
    JmpNotEq = 0x15,
    PshLit = 0x17,
    PshReg = 0x18,
    Pop = 0x1A,
}

impl Opcode {
    /// Every opcode, in byte order.
    pub const ALL: [Opcode; 9] = [
        Opcode::MovLitReg,
        Opcode::MovRegReg,
        Opcode::MovRegMem,
        Opcode::MovMemReg,
        Opcode::AddRegReg,
        Opcode::JmpNotEq,
        Opcode::PshLit,
        Opcode::PshReg,
        Opcode::Pop,
    ];

    /// The raw opcode byte.
    #[inline]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Table mnemonic, e.g. `MOV_LIT_REG`.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::MovLitReg => "MOV_LIT_REG",
            Opcode::MovRegReg => "MOV_REG_REG",
            Opcode::MovRegMem => "MOV_REG_MEM",
            Opcode::MovMemReg => "MOV_MEM_REG",
            Opcode::AddRegReg => "ADD_REG_REG",
            Opcode::JmpNotEq => "JMP_NOT_EQ",
            Opcode::PshLit => "PSH_LIT",
            Opcode::PshReg => "PSH_REG",
            Opcode::Pop => "POP",
        }
    }

    /// Encoded size in bytes, opcode included.
    pub const fn size(self) -> usize {
        match self {
            Opcode::MovLitReg | Opcode::MovRegMem | Opcode::MovMemReg => 4,
            Opcode::MovRegReg | Opcode::AddRegReg | Opcode::PshLit => 3,
            Opcode::JmpNotEq => 5,
            Opcode::PshReg | Opcode::Pop => 2,
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.byte() == byte)
            .ok_or(DecodeError::InvalidOpcode(byte))
    }
}

/// A decoded instruction with its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// reg := literal
    MovLitReg { value: u16, reg: Register },

    /// to := from
    MovRegReg { from: Register, to: Register },

    /// mem[addr] := reg (word store)
    MovRegMem { reg: Register, addr: u16 },

    /// reg := mem[addr] (word load)
    MovMemReg { addr: u16, reg: Register },

    /// ACC := a + b, wrapping at 16 bits
    AddRegReg { a: Register, b: Register },

    /// if value != ACC then IP := addr
    JmpNotEq { value: u16, addr: u16 },

    /// push literal
    PshLit { value: u16 },

    /// push register
    PshReg { reg: Register },

    /// reg := pop
    Pop { reg: Register },
}

impl Instruction {
    /// The opcode this instruction encodes with.
    pub const fn opcode(&self) -> Opcode {
        match self {
            Instruction::MovLitReg { .. } => Opcode::MovLitReg,
            Instruction::MovRegReg { .. } => Opcode::MovRegReg,
            Instruction::MovRegMem { .. } => Opcode::MovRegMem,
            Instruction::MovMemReg { .. } => Opcode::MovMemReg,
            Instruction::AddRegReg { .. } => Opcode::AddRegReg,
            Instruction::JmpNotEq { .. } => Opcode::JmpNotEq,
            Instruction::PshLit { .. } => Opcode::PshLit,
            Instruction::PshReg { .. } => Opcode::PshReg,
            Instruction::Pop { .. } => Opcode::Pop,
        }
    }

    /// Encoded size in bytes.
    #[inline]
    pub const fn size(&self) -> usize {
        self.opcode().size()
    }

    /// Append the byte encoding to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.opcode().byte());
        match *self {
            Instruction::MovLitReg { value, reg } => {
                out.extend_from_slice(&value.to_be_bytes());
                out.push(reg.index());
            }
            Instruction::MovRegReg { from, to } => {
                out.push(from.index());
                out.push(to.index());
            }
            Instruction::MovRegMem { reg, addr } => {
                out.push(reg.index());
                out.extend_from_slice(&addr.to_be_bytes());
            }
            Instruction::MovMemReg { addr, reg } => {
                out.extend_from_slice(&addr.to_be_bytes());
                out.push(reg.index());
            }
            Instruction::AddRegReg { a, b } => {
                out.push(a.index());
                out.push(b.index());
            }
            Instruction::JmpNotEq { value, addr } => {
                out.extend_from_slice(&value.to_be_bytes());
                out.extend_from_slice(&addr.to_be_bytes());
            }
            Instruction::PshLit { value } => {
                out.extend_from_slice(&value.to_be_bytes());
            }
            Instruction::PshReg { reg } | Instruction::Pop { reg } => {
                out.push(reg.index());
            }
        }
    }

    /// The byte encoding.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.encode_into(&mut out);
        out
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::MovLitReg { value, reg } => write!(f, "MOV ${:04X}, {}", value, reg),
            Instruction::MovRegReg { from, to } => write!(f, "MOV {}, {}", from, to),
            Instruction::MovRegMem { reg, addr } => write!(f, "MOV {}, &{:04X}", reg, addr),
            Instruction::MovMemReg { addr, reg } => write!(f, "MOV &{:04X}, {}", addr, reg),
            Instruction::AddRegReg { a, b } => write!(f, "ADD {}, {}", a, b),
            Instruction::JmpNotEq { value, addr } => write!(f, "JNE ${:04X}, &{:04X}", value, addr),
            Instruction::PshLit { value } => write!(f, "PSH ${:04X}", value),
            Instruction::PshReg { reg } => write!(f, "PSH {}", reg),
            Instruction::Pop { reg } => write!(f, "POP {}", reg),
        }
    }
}

/// A stream of instruction bytes.
///
/// The CPU implements this by fetching at IP; [`Cursor`] implements it
/// over a memory without side effects.
pub trait OperandSource {
    type Error: From<DecodeError>;

    /// Next byte.
    fn next_u8(&mut self) -> Result<u8, Self::Error>;

    /// Next big-endian word.
    fn next_u16(&mut self) -> Result<u16, Self::Error>;

    /// Next byte, interpreted as a register index.
    fn next_register(&mut self) -> Result<Register, Self::Error> {
        let index = self.next_u8()?;
        Register::from_index(index).map_err(|e| DecodeError::InvalidRegister(e).into())
    }
}

/// Decode the operands that follow `opcode`.
pub fn decode<S: OperandSource>(opcode: Opcode, src: &mut S) -> Result<Instruction, S::Error> {
    let instruction = match opcode {
        Opcode::MovLitReg => {
            let value = src.next_u16()?;
            let reg = src.next_register()?;
            Instruction::MovLitReg { value, reg }
        }
        Opcode::MovRegReg => {
            let from = src.next_register()?;
            let to = src.next_register()?;
            Instruction::MovRegReg { from, to }
        }
        Opcode::MovRegMem => {
            let reg = src.next_register()?;
            let addr = src.next_u16()?;
            Instruction::MovRegMem { reg, addr }
        }
        Opcode::MovMemReg => {
            let addr = src.next_u16()?;
            let reg = src.next_register()?;
            Instruction::MovMemReg { addr, reg }
        }
        Opcode::AddRegReg => {
            let a = src.next_register()?;
            let b = src.next_register()?;
            Instruction::AddRegReg { a, b }
        }
        Opcode::JmpNotEq => {
            let value = src.next_u16()?;
            let addr = src.next_u16()?;
            Instruction::JmpNotEq { value, addr }
        }
        Opcode::PshLit => Instruction::PshLit { value: src.next_u16()? },
        Opcode::PshReg => Instruction::PshReg { reg: src.next_register()? },
        Opcode::Pop => Instruction::Pop { reg: src.next_register()? },
    };

    Ok(instruction)
}

/// Side-effect-free reader over a memory.
#[derive(Debug)]
pub struct Cursor<'a> {
    mem: &'a Memory,
    addr: u16,
}

impl<'a> Cursor<'a> {
    pub fn new(mem: &'a Memory, addr: u16) -> Self {
        Self { mem, addr }
    }

    /// Address of the next unread byte.
    pub fn position(&self) -> u16 {
        self.addr
    }
}

impl OperandSource for Cursor<'_> {
    type Error = DecodeError;

    fn next_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = self.mem.read8(self.addr)?;
        self.addr = self.mem.next_addr(self.addr, 1)?;
        Ok(byte)
    }

    fn next_u16(&mut self) -> Result<u16, DecodeError> {
        let word = self.mem.read16(self.addr)?;
        self.addr = self.mem.next_addr(self.addr, 2)?;
        Ok(word)
    }
}

/// Decode the instruction whose opcode is at `addr`, without touching
/// any CPU state.
pub fn decode_at(mem: &Memory, addr: u16) -> Result<Instruction, DecodeError> {
    let mut cursor = Cursor::new(mem, addr);
    let opcode = Opcode::try_from(cursor.next_u8()?)?;
    decode(opcode, &mut cursor)
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid opcode: 0x{0:02X}")]
    InvalidOpcode(u8),

    #[error(transparent)]
    InvalidRegister(#[from] RegisterError),

    #[error(transparent)]
    MemoryFault(#[from] MemoryError),
}
