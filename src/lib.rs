//! # vm16
//!
//! A byte-addressable, register-based 16-bit virtual machine.
//!
//! The CPU fetches opcodes from a flat memory buffer, decodes them against a
//! fixed nine-instruction table, and updates its register file, the memory,
//! or both. Execution advances one `step()` at a time under the caller's
//! control; there is no halt instruction.

pub mod cpu;
pub mod config;
pub mod program;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use cpu::{
    Cpu, CpuConfig, CpuError, CpuState, Event, EventLog, Instruction, Memory, MemoryError,
    Observer, Opcode, OpcodePolicy, Register, Registers,
};
pub use config::{Config, ConfigError};
pub use program::{disassemble, load_image, save_image, Demo, ImageError, ProgramBuilder};

#[cfg(feature = "tui")]
pub use tui::run_debugger;
