//! Disassembler.
//!
//! Linear sweep over a byte image. Bytes that do not decode are shown as
//! `DB` data and skipped one at a time.

use crate::cpu::decode::{decode_at, DecodeError, Instruction};
use crate::cpu::memory::{Memory, MemoryError, MAX_MEMORY_SIZE};

/// One disassembled line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub addr: u16,
    pub bytes: Vec<u8>,
    pub instruction: Option<Instruction>,
}

impl Line {
    /// Assembly-like text, without address or bytes.
    pub fn text(&self) -> String {
        match &self.instruction {
            Some(instr) => instr.to_string(),
            None => format!("DB ${:02X}", self.bytes.first().copied().unwrap_or(0)),
        }
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hex: Vec<String> = self.bytes.iter().map(|b| format!("{:02X}", b)).collect();
        write!(f, "{:04X}: {:<15} {}", self.addr, hex.join(" "), self.text())
    }
}

/// Disassemble the instruction at `addr`.
pub fn disassemble_at(mem: &Memory, addr: u16) -> Line {
    match decode_at(mem, addr) {
        Ok(instr) => {
            let bytes = mem
                .window(addr, instr.size())
                .map(<[u8]>::to_vec)
                .unwrap_or_default();
            Line { addr, bytes, instruction: Some(instr) }
        }
        Err(_) => Line {
            addr,
            bytes: mem.read8(addr).map(|b| vec![b]).unwrap_or_default(),
            instruction: None,
        },
    }
}

/// Disassemble `count` lines starting at `start`, stopping at the end of
/// memory.
pub fn sweep(mem: &Memory, start: u16, count: usize) -> Vec<Line> {
    let mut lines = Vec::with_capacity(count);
    let mut addr = start as usize;

    while lines.len() < count && addr < mem.len() {
        let line = disassemble_at(mem, addr as u16);
        addr += line.bytes.len().max(1);
        lines.push(line);
    }

    lines
}

/// Disassemble a whole byte image into a listing.
pub fn disassemble(program: &[u8]) -> Result<String, DecodeError> {
    if program.len() > MAX_MEMORY_SIZE {
        return Err(MemoryError::ProgramTooLarge {
            size: program.len(),
            available: MAX_MEMORY_SIZE,
        }
        .into());
    }
    let mut mem = Memory::new(program.len().max(2))?;
    mem.load(0, program)?;

    let mut output = String::new();
    output.push_str("; vm16 disassembly\n");
    output.push_str("; -----------------\n\n");

    for line in sweep(&mem, 0, program.len()) {
        if line.addr as usize >= program.len() {
            break;
        }
        output.push_str(&line.to_string());
        output.push('\n');
    }

    Ok(output)
}
