//! Text dumps of registers and memory windows.

use crate::cpu::memory::{Memory, MemoryError};
use crate::cpu::registers::Registers;

/// Bytes shown by [`view_memory`] when no length is given.
pub const DEFAULT_WINDOW: usize = 8;

/// `IP: 0x0000, ACC: 0x0000, R1: 0x0000, ...`
pub fn dump_registers(regs: &Registers) -> String {
    regs.iter()
        .map(|(reg, value)| format!("{}: 0x{:04X}", reg, value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `0x0100 ⇥ 0x00 | 0x03 | ... ⇤`
///
/// The window is clipped at the end of memory; an `addr` past the end is
/// a fault.
pub fn view_memory(mem: &Memory, addr: u16, len: usize) -> Result<String, MemoryError> {
    let available = mem.len().saturating_sub(addr as usize);
    if available == 0 {
        return Err(MemoryError::OutOfBounds { addr, width: len, size: mem.len() });
    }
    let bytes = mem.window(addr, len.min(available))?;
    let cells: Vec<String> = bytes.iter().map(|b| format!("0x{:02X}", b)).collect();
    Ok(format!("0x{:04X} ⇥ {} ⇤", addr, cells.join(" | ")))
}
