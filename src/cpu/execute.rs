//! CPU execution engine.
//!
//! Implements fetch/decode/execute and the downward-growing stack.
//! The CPU borrows or owns the caller's [`Memory`] through `BorrowMut`,
//! and exclusively owns its [`Registers`].

use std::borrow::{Borrow, BorrowMut};

use crate::cpu::decode::{self, DecodeError, Instruction, Opcode, OperandSource};
use crate::cpu::memory::{Memory, MemoryError};
use crate::cpu::observer::{Event, NullObserver, Observer};
use crate::cpu::registers::{Register, RegisterError, Registers};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// What to do with an opcode byte that matches no instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpcodePolicy {
    /// Fault with [`CpuError::InvalidOpcode`].
    #[default]
    Strict,
    /// Skip the byte and carry on.
    Permissive,
}

/// Execution parameters fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    /// Lowest address a push may write to.
    pub stack_limit: u16,
    pub opcode_policy: OpcodePolicy,
}

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// CPU is running normally.
    Running,
    /// The last step faulted; the driver must `resume()` or `reset()`.
    Faulted,
}

/// Read-only view of the CPU for front-ends.
#[derive(Debug, Clone, Serialize)]
pub struct CpuSnapshot {
    pub registers: Vec<RegisterValue>,
    pub state: CpuState,
    pub cycles: u64,
    pub last_instruction: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RegisterValue {
    pub name: &'static str,
    pub value: u16,
}

/// The VM CPU.
pub struct Cpu<M = Memory, O = NullObserver> {
    memory: M,
    regs: Registers,
    config: CpuConfig,
    /// Initial SP; pops may not move SP past it.
    stack_top: u16,
    observer: O,
    /// Current execution state.
    pub state: CpuState,
    /// Executed instruction count.
    pub cycles: u64,
    last_instr: Option<Instruction>,
}

enum Outcome {
    Executed(Instruction),
    Ignored(u8),
}

impl<M: BorrowMut<Memory>> Cpu<M, NullObserver> {
    /// Bind a CPU to `memory` with the default configuration.
    pub fn new(memory: M) -> Self {
        Self::with_config(memory, CpuConfig::default())
    }

    /// Bind a CPU to `memory`.
    ///
    /// IP starts at 0; SP and FP start at `memory.len() - 2`.
    pub fn with_config(memory: M, config: CpuConfig) -> Self {
        let len = <M as Borrow<Memory>>::borrow(&memory).len();
        let stack_top = u16::try_from(len.saturating_sub(2)).unwrap_or(u16::MAX - 1);

        let mut cpu = Self {
            memory,
            regs: Registers::new(),
            config,
            stack_top,
            observer: NullObserver,
            state: CpuState::Running,
            cycles: 0,
            last_instr: None,
        };
        cpu.reset();
        cpu
    }
}

impl<M: BorrowMut<Memory>, O: Observer> Cpu<M, O> {
    /// Replace the observer, keeping all other state.
    pub fn with_observer<P: Observer>(self, observer: P) -> Cpu<M, P> {
        Cpu {
            memory: self.memory,
            regs: self.regs,
            config: self.config,
            stack_top: self.stack_top,
            observer,
            state: self.state,
            cycles: self.cycles,
            last_instr: self.last_instr,
        }
    }

    /// Reset registers and state. Memory is left as the caller wrote it.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.regs.set(Register::Sp, self.stack_top);
        self.regs.set(Register::Fp, self.stack_top);
        self.state = CpuState::Running;
        self.cycles = 0;
        self.last_instr = None;
    }

    /// Leave the faulted state without touching registers or memory.
    pub fn resume(&mut self) {
        self.state = CpuState::Running;
    }

    /// Copy a program into memory at address 0.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), MemoryError> {
        self.memory_mut().load(0, program)
    }

    // ==================== Fetch ====================

    /// Read the byte at IP and advance IP by one.
    ///
    /// IP never wraps: reading the last byte of a full 64 KiB memory is an
    /// [`MemoryError::AddressOverflow`].
    pub fn fetch(&mut self) -> Result<u8, CpuError> {
        let ip = self.regs.get(Register::Ip);
        let byte = self.memory().read8(ip)?;
        let next = self.memory().next_addr(ip, 1)?;
        self.regs.set(Register::Ip, next);
        Ok(byte)
    }

    /// Read the big-endian word at IP and advance IP by two.
    pub fn fetch16(&mut self) -> Result<u16, CpuError> {
        let ip = self.regs.get(Register::Ip);
        let word = self.memory().read16(ip)?;
        let next = self.memory().next_addr(ip, 2)?;
        self.regs.set(Register::Ip, next);
        Ok(word)
    }

    /// Fetch a register operand byte and validate it against the file.
    pub fn fetch_register(&mut self) -> Result<Register, CpuError> {
        let index = self.fetch()?;
        Ok(Register::from_index(index)?)
    }

    // ==================== Execution ====================

    /// Fetch and execute exactly one instruction.
    ///
    /// Returns the executed instruction, or `None` when an unknown opcode
    /// was skipped under [`OpcodePolicy::Permissive`]. On error, IP is
    /// rewound to the faulting opcode, nothing else has changed, and the
    /// CPU stays [`CpuState::Faulted`] until `resume()` or `reset()`.
    pub fn step(&mut self) -> Result<Option<Instruction>, CpuError> {
        if self.state != CpuState::Running {
            return Err(CpuError::NotRunning(self.state));
        }

        let ip = self.regs.get(Register::Ip);
        match self.fetch_and_execute() {
            Ok(Outcome::Executed(instr)) => {
                self.cycles += 1;
                self.last_instr = Some(instr);
                tracing::trace!(ip, instruction = %instr, "executed");
                self.observer.on_event(&Event::Executed {
                    ip,
                    instruction: instr,
                    cycle: self.cycles,
                });
                Ok(Some(instr))
            }
            Ok(Outcome::Ignored(opcode)) => {
                tracing::warn!(ip, opcode, "ignored unknown opcode");
                self.observer.on_event(&Event::Ignored { ip, opcode });
                Ok(None)
            }
            Err(error) => {
                self.regs.set(Register::Ip, ip);
                self.state = CpuState::Faulted;
                tracing::debug!(ip, %error, "fault");
                self.observer.on_event(&Event::Faulted {
                    ip,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Call `step()` up to `max_steps` times, stopping at the first error.
    ///
    /// Returns the number of steps taken.
    pub fn run_for(&mut self, max_steps: u64) -> Result<u64, CpuError> {
        for taken in 0..max_steps {
            if let Err(e) = self.step() {
                tracing::debug!(taken, "run stopped by fault");
                return Err(e);
            }
        }
        Ok(max_steps)
    }

    fn fetch_and_execute(&mut self) -> Result<Outcome, CpuError> {
        let byte = self.fetch()?;
        let opcode = match Opcode::try_from(byte) {
            Ok(op) => op,
            Err(_) if self.config.opcode_policy == OpcodePolicy::Permissive => {
                return Ok(Outcome::Ignored(byte));
            }
            Err(e) => return Err(e.into()),
        };

        let instr = decode::decode(opcode, self)?;
        self.execute(instr)?;
        Ok(Outcome::Executed(instr))
    }

    /// Execute a decoded instruction.
    fn execute(&mut self, instr: Instruction) -> Result<(), CpuError> {
        match instr {
            Instruction::MovLitReg { value, reg } => {
                self.regs.set(reg, value);
            }

            Instruction::MovRegReg { from, to } => {
                let value = self.regs.get(from);
                self.regs.set(to, value);
            }

            Instruction::MovRegMem { reg, addr } => {
                let value = self.regs.get(reg);
                self.memory_mut().write16(addr, value)?;
            }

            Instruction::MovMemReg { addr, reg } => {
                let value = self.memory().read16(addr)?;
                self.regs.set(reg, value);
            }

            Instruction::AddRegReg { a, b } => {
                let sum = self.regs.get(a).wrapping_add(self.regs.get(b));
                self.regs.set(Register::Acc, sum);
            }

            Instruction::JmpNotEq { value, addr } => {
                if value != self.regs.get(Register::Acc) {
                    self.regs.set(Register::Ip, addr);
                }
            }

            Instruction::PshLit { value } => {
                self.push(value)?;
            }

            Instruction::PshReg { reg } => {
                let value = self.regs.get(reg);
                self.push(value)?;
            }

            Instruction::Pop { reg } => {
                let value = self.pop()?;
                self.regs.set(reg, value);
            }
        }

        Ok(())
    }

    // ==================== Stack ====================

    /// Write `value` at SP, then move SP down one word.
    pub fn push(&mut self, value: u16) -> Result<(), CpuError> {
        let sp = self.regs.get(Register::Sp);
        let limit = self.config.stack_limit;
        let next = sp
            .checked_sub(2)
            .filter(|_| sp >= limit)
            .ok_or(CpuError::StackOverflow { sp, limit })?;

        self.memory_mut().write16(sp, value)?;
        self.regs.set(Register::Sp, next);
        Ok(())
    }

    /// Move SP up one word, then read the value there.
    pub fn pop(&mut self) -> Result<u16, CpuError> {
        let sp = self.regs.get(Register::Sp);
        let top = self.stack_top;
        let next = sp
            .checked_add(2)
            .filter(|next| *next <= top)
            .ok_or(CpuError::StackUnderflow { sp, top })?;

        let value = self.memory().read16(next)?;
        self.regs.set(Register::Sp, next);
        Ok(value)
    }

    // ==================== Inspection ====================

    /// Current value of a register.
    pub fn register(&self, reg: Register) -> u16 {
        self.regs.get(reg)
    }

    /// Current value of a register, looked up by name.
    pub fn register_by_name(&self, name: &str) -> Result<u16, CpuError> {
        Ok(self.regs.get_by_name(name)?)
    }

    /// Set a register directly (driver pokes, tests).
    pub fn set_register(&mut self, reg: Register, value: u16) {
        self.regs.set(reg, value);
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn memory(&self) -> &Memory {
        <M as Borrow<Memory>>::borrow(&self.memory)
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        <M as BorrowMut<Memory>>::borrow_mut(&mut self.memory)
    }

    /// `len` bytes of memory starting at `addr`.
    pub fn memory_window(&self, addr: u16, len: usize) -> Result<&[u8], CpuError> {
        Ok(self.memory().window(addr, len)?)
    }

    /// Give the memory handle back to the caller.
    pub fn into_memory(self) -> M {
        self.memory
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    /// Initial SP; the bottom of an empty stack.
    pub fn stack_top(&self) -> u16 {
        self.stack_top
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Get the last executed instruction.
    pub fn last_instruction(&self) -> Option<Instruction> {
        self.last_instr
    }

    /// Check if the CPU accepts `step()`.
    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            registers: self
                .regs
                .iter()
                .map(|(reg, value)| RegisterValue { name: reg.name(), value })
                .collect(),
            state: self.state,
            cycles: self.cycles,
            last_instruction: self.last_instr.map(|i| i.to_string()),
        }
    }
}

impl<M: BorrowMut<Memory>, O: Observer> OperandSource for Cpu<M, O> {
    type Error = CpuError;

    fn next_u8(&mut self) -> Result<u8, CpuError> {
        self.fetch()
    }

    fn next_u16(&mut self) -> Result<u16, CpuError> {
        self.fetch16()
    }

    fn next_register(&mut self) -> Result<Register, CpuError> {
        self.fetch_register()
    }
}

impl<M, O> std::fmt::Debug for Cpu<M, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .finish()
    }
}

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("CPU not running: {0:?}")]
    NotRunning(CpuState),

    #[error("invalid opcode: 0x{0:02X}")]
    InvalidOpcode(u8),

    #[error(transparent)]
    InvalidRegister(#[from] RegisterError),

    #[error(transparent)]
    MemoryFault(#[from] MemoryError),

    #[error("stack overflow: SP=0x{sp:04X}, limit=0x{limit:04X}")]
    StackOverflow { sp: u16, limit: u16 },

    #[error("stack underflow: SP=0x{sp:04X}, top=0x{top:04X}")]
    StackUnderflow { sp: u16, top: u16 },
}

impl From<DecodeError> for CpuError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::InvalidOpcode(op) => CpuError::InvalidOpcode(op),
            DecodeError::InvalidRegister(e) => CpuError::InvalidRegister(e),
            DecodeError::MemoryFault(e) => CpuError::MemoryFault(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::observer::EventLog;
    use crate::program::ProgramBuilder;

    fn cpu_with(program: &[u8]) -> Cpu {
        let mut mem = Memory::new(256).unwrap();
        mem.load(0, program).unwrap();
        Cpu::new(mem)
    }

    #[test]
    fn test_initial_state() {
        let cpu = Cpu::new(Memory::new(256).unwrap());
        assert_eq!(cpu.register(Register::Ip), 0);
        assert_eq!(cpu.register(Register::Sp), 0x00FE);
        assert_eq!(cpu.register(Register::Fp), 0x00FE);
        assert!(cpu.is_running());
    }

    #[test]
    fn test_fetch_advances_ip() {
        let mut cpu = cpu_with(&[0xAA, 0x12, 0x34]);

        assert_eq!(cpu.fetch().unwrap(), 0xAA);
        assert_eq!(cpu.register(Register::Ip), 1);
        assert_eq!(cpu.fetch16().unwrap(), 0x1234);
        assert_eq!(cpu.register(Register::Ip), 3);
    }

    #[test]
    fn test_mov_reg_reg() {
        let program = ProgramBuilder::new()
            .mov_lit_reg(0x0042, Register::R3)
            .mov_reg_reg(Register::R3, Register::R8)
            .build();
        let mut cpu = cpu_with(&program);

        cpu.run_for(2).unwrap();
        assert_eq!(cpu.register(Register::R8), 0x0042);
    }

    #[test]
    fn test_store_and_load_word() {
        let program = ProgramBuilder::new()
            .mov_lit_reg(0xCAFE, Register::R1)
            .mov_reg_mem(Register::R1, 0x0080)
            .mov_mem_reg(0x0080, Register::R2)
            .build();
        let mut cpu = cpu_with(&program);

        cpu.run_for(3).unwrap();
        assert_eq!(cpu.memory().read16(0x0080).unwrap(), 0xCAFE);
        assert_eq!(cpu.register(Register::R2), 0xCAFE);
    }

    #[test]
    fn test_add_wraps() {
        let program = ProgramBuilder::new()
            .mov_lit_reg(0xFFFF, Register::R1)
            .mov_lit_reg(0x0002, Register::R2)
            .add_reg_reg(Register::R1, Register::R2)
            .build();
        let mut cpu = cpu_with(&program);

        cpu.run_for(3).unwrap();
        assert_eq!(cpu.register(Register::Acc), 0x0001);
    }

    #[test]
    fn test_jmp_not_eq_taken_and_not_taken() {
        // ACC is 0: jumping on 1 is taken, jumping on 0 falls through
        let program = ProgramBuilder::new().jmp_not_eq(0x0001, 0x0040).build();
        let mut cpu = cpu_with(&program);
        cpu.step().unwrap();
        assert_eq!(cpu.register(Register::Ip), 0x0040);

        let program = ProgramBuilder::new().jmp_not_eq(0x0000, 0x0040).build();
        let mut cpu = cpu_with(&program);
        cpu.step().unwrap();
        assert_eq!(cpu.register(Register::Ip), 5);
    }

    #[test]
    fn test_push_pop_lifo() {
        let program = ProgramBuilder::new()
            .psh_lit(0x1111)
            .psh_lit(0x2222)
            .pop(Register::R1)
            .pop(Register::R2)
            .build();
        let mut cpu = cpu_with(&program);
        let sp_before = cpu.register(Register::Sp);

        cpu.run_for(2).unwrap();
        assert_eq!(cpu.register(Register::Sp), sp_before - 4);
        assert_eq!(cpu.memory().read16(sp_before).unwrap(), 0x1111);

        cpu.run_for(2).unwrap();
        assert_eq!(cpu.register(Register::R1), 0x2222);
        assert_eq!(cpu.register(Register::R2), 0x1111);
        assert_eq!(cpu.register(Register::Sp), sp_before);
    }

    #[test]
    fn test_pop_on_empty_stack_underflows() {
        let program = ProgramBuilder::new().pop(Register::R1).build();
        let mut cpu = cpu_with(&program);

        let err = cpu.step().unwrap_err();
        assert_eq!(err, CpuError::StackUnderflow { sp: 0x00FE, top: 0x00FE });
        assert_eq!(cpu.state, CpuState::Faulted);
        assert_eq!(cpu.register(Register::Ip), 0);
    }

    #[test]
    fn test_push_below_limit_overflows() {
        let mut mem = Memory::new(256).unwrap();
        mem.load(0, &ProgramBuilder::new().psh_lit(1).psh_lit(2).psh_lit(3).build())
            .unwrap();
        let config = CpuConfig {
            stack_limit: 0x00FC,
            ..CpuConfig::default()
        };
        let mut cpu = Cpu::with_config(mem, config);

        cpu.run_for(2).unwrap();
        let err = cpu.step().unwrap_err();
        assert_eq!(err, CpuError::StackOverflow { sp: 0x00FA, limit: 0x00FC });
        // Fault is precise: SP and memory untouched
        assert_eq!(cpu.register(Register::Sp), 0x00FA);
        assert_eq!(cpu.memory().read16(0x00FA).unwrap(), 0);
    }

    #[test]
    fn test_push_at_address_zero_overflows() {
        let mut cpu = cpu_with(&[]);
        cpu.set_register(Register::Sp, 0);
        assert!(matches!(cpu.push(1), Err(CpuError::StackOverflow { sp: 0, .. })));
    }

    #[test]
    fn test_invalid_opcode_strict() {
        let mut cpu = cpu_with(&[0xFF]);

        assert_eq!(cpu.step(), Err(CpuError::InvalidOpcode(0xFF)));
        assert_eq!(cpu.register(Register::Ip), 0);
        assert_eq!(cpu.step(), Err(CpuError::NotRunning(CpuState::Faulted)));
    }

    #[test]
    fn test_invalid_opcode_permissive() {
        let mut mem = Memory::new(256).unwrap();
        mem.load(0, &[0xFF, 0x17, 0x00, 0x07]).unwrap();
        let config = CpuConfig {
            opcode_policy: OpcodePolicy::Permissive,
            ..CpuConfig::default()
        };
        let mut cpu = Cpu::with_config(mem, config);

        assert_eq!(cpu.step(), Ok(None));
        assert_eq!(cpu.register(Register::Ip), 1);
        assert_eq!(cpu.cycles, 0);
        assert_eq!(cpu.step(), Ok(Some(Instruction::PshLit { value: 7 })));
    }

    #[test]
    fn test_invalid_register_operand_faults() {
        // MOV_LIT_REG $0001, <index 12>
        let mut cpu = cpu_with(&[0x10, 0x00, 0x01, 0x0C]);

        assert!(matches!(cpu.step(), Err(CpuError::InvalidRegister(_))));
        assert_eq!(cpu.register(Register::Ip), 0);
    }

    #[test]
    fn test_memory_fault_is_reported() {
        // MOV_MEM_REG &00FF, R1 reads past the end of a 256-byte memory
        let program = ProgramBuilder::new().mov_mem_reg(0x00FF, Register::R1).build();
        let mut cpu = cpu_with(&program);

        assert!(matches!(cpu.step(), Err(CpuError::MemoryFault(_))));
    }

    #[test]
    fn test_resume_after_fault() {
        let mut cpu = cpu_with(&[0xFF]);
        cpu.step().unwrap_err();

        cpu.memory_mut().write8(0, Opcode::PshLit.byte()).unwrap();
        cpu.resume();
        assert!(cpu.step().unwrap().is_some());
    }

    #[test]
    fn test_borrowed_memory_stays_with_caller() {
        let mut mem = Memory::new(256).unwrap();
        mem.load(0, &ProgramBuilder::new().mov_reg_mem(Register::Sp, 0x0010).build())
            .unwrap();

        {
            let mut cpu = Cpu::new(&mut mem);
            cpu.step().unwrap();
        }

        assert_eq!(mem.read16(0x0010).unwrap(), 0x00FE);
    }

    #[test]
    fn test_observer_sees_events() {
        let mut cpu = cpu_with(&[0x17, 0x00, 0x01, 0xEE]).with_observer(EventLog::default());

        cpu.step().unwrap();
        cpu.step().unwrap_err();

        let events: Vec<&Event> = cpu.observer().events().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::Executed { ip: 0, cycle: 1, .. }));
        assert!(matches!(
            events[1],
            Event::Faulted { ip: 3, error: CpuError::InvalidOpcode(0xEE) }
        ));
    }

    #[test]
    fn test_snapshot_serializes() {
        let cpu = cpu_with(&[]);
        let json = serde_json::to_string(&cpu.snapshot()).unwrap();
        assert!(json.contains(r#""name":"SP","value":254"#));
    }

    #[test]
    fn test_ip_does_not_wrap_at_top_of_memory() {
        // PSH R1 with its opcode in the last byte; a wrapped IP would read 0x02 from address 0
        let mut mem = Memory::default();
        mem.write8(0xFFFF, Opcode::PshReg.byte()).unwrap();
        mem.write8(0x0000, Register::R1.index()).unwrap();
        let mut cpu = Cpu::new(mem);
        cpu.set_register(Register::Ip, 0xFFFF);
        let sp = cpu.register(Register::Sp);

        assert_eq!(
            cpu.step(),
            Err(CpuError::MemoryFault(MemoryError::AddressOverflow { addr: 0xFFFF, width: 1 }))
        );
        assert_eq!(cpu.register(Register::Ip), 0xFFFF);
        assert_eq!(cpu.register(Register::Sp), sp);
        assert_eq!(cpu.state, CpuState::Faulted);
    }

    #[test]
    fn test_operands_do_not_wrap_at_top_of_memory() {
        // MOV $1234, <operand at 0xFFFF>: the register fetch cannot advance IP
        let mut mem = Memory::default();
        mem.load(0xFFFC, &[Opcode::MovLitReg.byte(), 0x12, 0x34, Register::R1.index()]).unwrap();
        let mut cpu = Cpu::new(mem);
        cpu.set_register(Register::Ip, 0xFFFC);

        assert!(matches!(
            cpu.step(),
            Err(CpuError::MemoryFault(MemoryError::AddressOverflow { addr: 0xFFFF, .. }))
        ));
        assert_eq!(cpu.register(Register::Ip), 0xFFFC);
        assert_eq!(cpu.register(Register::R1), 0);

        cpu.set_register(Register::Ip, 0xFFFE);
        assert!(cpu.fetch16().is_err());
        assert_eq!(cpu.register(Register::Ip), 0xFFFE);
    }

    #[test]
    fn test_reset_keeps_memory() {
        let mut cpu = cpu_with(&ProgramBuilder::new().psh_lit(9).build());
        cpu.step().unwrap();
        cpu.reset();

        assert_eq!(cpu.register(Register::Ip), 0);
        assert_eq!(cpu.register(Register::Sp), 0x00FE);
        assert_eq!(cpu.memory().read8(0).unwrap(), Opcode::PshLit.byte());
    }
}
