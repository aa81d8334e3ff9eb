//! CPU emulation for the 16-bit VM.
//!
//! This module implements the complete machine:
//! - byte-addressable memory, up to 64 KiB, big-endian words
//! - 12 registers: IP, ACC, R1..R8, SP, FP
//! - 9-instruction set with a downward-growing stack

pub mod memory;
pub mod registers;
pub mod decode;
pub mod execute;
pub mod observer;

pub use memory::{Memory, MemoryError};
pub use registers::{Register, RegisterError, Registers};
pub use decode::{decode_at, Instruction, Opcode, DecodeError};
pub use execute::{Cpu, CpuConfig, CpuError, CpuSnapshot, CpuState, OpcodePolicy};
pub use observer::{Event, EventLog, NullObserver, Observer};
