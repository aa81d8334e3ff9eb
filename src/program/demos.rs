//! Built-in reference programs.
//!
//! - `add`: two literals into R1/R2, summed into ACC
//! - `loop`: count a memory word at 0x0100 up to 3
//! - `stack`: push two registers and pop them back swapped

use crate::cpu::memory::{Memory, MemoryError};
use crate::cpu::registers::Register;
use crate::program::builder::ProgramBuilder;

/// Counter cell used by the loop demo.
pub const LOOP_COUNTER_ADDR: u16 = 0x0100;

/// A ready-to-run program and how long to run it.
#[derive(Debug, Clone)]
pub struct Demo {
    pub name: &'static str,
    pub about: &'static str,
    pub memory_size: usize,
    /// Steps needed to run the program to its end.
    pub steps: u64,
    pub program: Vec<u8>,
}

impl Demo {
    /// Fresh memory with the program loaded at address 0.
    pub fn memory(&self) -> Result<Memory, MemoryError> {
        let mut mem = Memory::new(self.memory_size)?;
        mem.load(0, &self.program)?;
        Ok(mem)
    }
}

/// `MOV $1234, R1; MOV $ABCD, R2; ADD R1, R2` leaves ACC = 0xBE01.
pub fn add() -> Demo {
    Demo {
        name: "add",
        about: "add two literals into ACC",
        memory_size: 256,
        steps: 3,
        program: ProgramBuilder::new()
            .mov_lit_reg(0x1234, Register::R1)
            .mov_lit_reg(0xABCD, Register::R2)
            .add_reg_reg(Register::R1, Register::R2)
            .build(),
    }
}

/// Increment the word at 0x0100 until ACC reaches 3.
pub fn counting_loop() -> Demo {
    let start = 0x0000;
    Demo {
        name: "loop",
        about: "count the word at 0x0100 up to 3",
        memory_size: 256 * 256,
        steps: 15,
        program: ProgramBuilder::new()
            .mov_mem_reg(LOOP_COUNTER_ADDR, Register::R1)
            .mov_lit_reg(0x0001, Register::R2)
            .add_reg_reg(Register::R1, Register::R2)
            .mov_reg_mem(Register::Acc, LOOP_COUNTER_ADDR)
            .jmp_not_eq(0x0003, start)
            .build(),
    }
}

/// Push R1 and R2, then pop them back into R1 and R2 swapped.
pub fn stack() -> Demo {
    Demo {
        name: "stack",
        about: "push two registers, pop them swapped",
        memory_size: 256 * 256,
        steps: 6,
        program: ProgramBuilder::new()
            .mov_lit_reg(0x5151, Register::R1)
            .mov_lit_reg(0x4242, Register::R2)
            .psh_reg(Register::R1)
            .psh_reg(Register::R2)
            .pop(Register::R1)
            .pop(Register::R2)
            .build(),
    }
}

pub fn all() -> Vec<Demo> {
    vec![add(), counting_loop(), stack()]
}

pub fn by_name(name: &str) -> Option<Demo> {
    all().into_iter().find(|d| d.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_program_size() {
        // 4 + 4 + 3 + 4 + 5 bytes
        assert_eq!(counting_loop().program.len(), 20);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(by_name("STACK").unwrap().name, "stack");
        assert!(by_name("halt").is_none());
    }

    #[test]
    fn test_memory_loaded() {
        let demo = add();
        let mem = demo.memory().unwrap();
        assert_eq!(mem.len(), 256);
        assert_eq!(mem.window(0, demo.program.len()).unwrap(), &demo.program[..]);
    }
}
