//! Program tooling for drivers.
//!
//! This module provides:
//! - A typed program builder (instructions → bytes)
//! - The built-in demo programs
//! - A disassembler and register/memory dumps
//! - Program image files (hex text or raw binary)

pub mod builder;
pub mod demos;
pub mod disasm;
pub mod dump;
pub mod image;

pub use builder::ProgramBuilder;
pub use demos::Demo;
pub use disasm::{disassemble, disassemble_at};
pub use dump::{dump_registers, view_memory};
pub use image::{load_image, parse_hex, save_image, ImageError};
