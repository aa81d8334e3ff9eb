//! Typed program emitter.
//!
//! Writes instruction bytes in order, the way a driver lays out a program
//! before the first `step()`. Not an assembler: there is no text input.

use crate::cpu::decode::Instruction;
use crate::cpu::registers::Register;

/// Builds a byte image one instruction at a time.
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder {
    bytes: Vec<u8>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address the next instruction will land at, or `None` once the image
    /// has filled the 16-bit address space.
    pub fn here(&self) -> Option<u16> {
        u16::try_from(self.bytes.len()).ok()
    }

    /// Append an instruction.
    pub fn push(mut self, instr: Instruction) -> Self {
        instr.encode_into(&mut self.bytes);
        self
    }

    /// Append raw bytes (data, or deliberately malformed code).
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn mov_lit_reg(self, value: u16, reg: Register) -> Self {
        self.push(Instruction::MovLitReg { value, reg })
    }

    pub fn mov_reg_reg(self, from: Register, to: Register) -> Self {
        self.push(Instruction::MovRegReg { from, to })
    }

    pub fn mov_reg_mem(self, reg: Register, addr: u16) -> Self {
        self.push(Instruction::MovRegMem { reg, addr })
    }

    pub fn mov_mem_reg(self, addr: u16, reg: Register) -> Self {
        self.push(Instruction::MovMemReg { addr, reg })
    }

    pub fn add_reg_reg(self, a: Register, b: Register) -> Self {
        self.push(Instruction::AddRegReg { a, b })
    }

    pub fn jmp_not_eq(self, value: u16, addr: u16) -> Self {
        self.push(Instruction::JmpNotEq { value, addr })
    }

    pub fn psh_lit(self, value: u16) -> Self {
        self.push(Instruction::PshLit { value })
    }

    pub fn psh_reg(self, reg: Register) -> Self {
        self.push(Instruction::PshReg { reg })
    }

    pub fn pop(self, reg: Register) -> Self {
        self.push(Instruction::Pop { reg })
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_lays_out_bytes() {
        let program = ProgramBuilder::new()
            .mov_lit_reg(0x1234, Register::R1)
            .mov_lit_reg(0xABCD, Register::R2)
            .add_reg_reg(Register::R1, Register::R2)
            .build();

        assert_eq!(
            program,
            vec![
                0x10, 0x12, 0x34, 0x02,
                0x10, 0xAB, 0xCD, 0x03,
                0x14, 0x02, 0x03,
            ]
        );
    }

    #[test]
    fn test_here_tracks_offset() {
        let builder = ProgramBuilder::new().psh_lit(1).pop(Register::R1);
        assert_eq!(builder.here(), Some(5));
    }

    #[test]
    fn test_here_past_address_space() {
        let full = ProgramBuilder::new().raw(&vec![0; 0xFFFF]);
        assert_eq!(full.here(), Some(0xFFFF));
        assert_eq!(full.raw(&[0]).here(), None);
    }
}
