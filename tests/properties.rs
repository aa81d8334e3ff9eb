use proptest::prelude::*;
use vm16::cpu::decode_at;
use vm16::{Cpu, CpuError, Instruction, Memory, ProgramBuilder, Register};

fn any_register() -> impl Strategy<Value = Register> {
    (0..Register::ALL.len()).prop_map(|i| Register::ALL[i])
}

fn general_register() -> impl Strategy<Value = Register> {
    (2u8..=9).prop_map(|i| Register::from_index(i).unwrap())
}

fn cpu_with(program: &[u8]) -> Cpu {
    let mut memory = Memory::default();
    memory.load(0, program).unwrap();
    Cpu::new(memory)
}

proptest! {
    #[test]
    fn mov_lit_reg_stores_value(value in any::<u16>(), reg in general_register()) {
        let mut cpu = cpu_with(&ProgramBuilder::new().mov_lit_reg(value, reg).build());
        cpu.step().unwrap();
        prop_assert_eq!(cpu.register(reg), value);
        prop_assert_eq!(cpu.register(Register::Ip), 4);
    }

    #[test]
    fn add_wraps_modulo_2_16(a in any::<u16>(), b in any::<u16>()) {
        let program = ProgramBuilder::new()
            .mov_lit_reg(a, Register::R1)
            .mov_lit_reg(b, Register::R2)
            .add_reg_reg(Register::R1, Register::R2)
            .build();
        let mut cpu = cpu_with(&program);
        cpu.run_for(3).unwrap();
        prop_assert_eq!(cpu.register(Register::Acc), a.wrapping_add(b));
    }

    #[test]
    fn fetch_advances_ip(start in 0u16..0xFFF0, hi in any::<u8>(), lo in any::<u8>()) {
        let mut cpu = cpu_with(&[]);
        cpu.memory_mut().write8(start, hi).unwrap();
        cpu.memory_mut().write8(start + 1, lo).unwrap();
        cpu.set_register(Register::Ip, start);

        prop_assert_eq!(cpu.fetch16().unwrap(), u16::from_be_bytes([hi, lo]));
        prop_assert_eq!(cpu.register(Register::Ip), start + 2);

        cpu.set_register(Register::Ip, start + 1);
        prop_assert_eq!(cpu.fetch().unwrap(), lo);
        prop_assert_eq!(cpu.register(Register::Ip), start + 2);
    }

    #[test]
    fn stack_is_lifo(values in prop::collection::vec(any::<u16>(), 1..32)) {
        let mut cpu = cpu_with(&[]);
        let sp = cpu.register(Register::Sp);

        for v in &values {
            cpu.push(*v).unwrap();
        }
        prop_assert_eq!(cpu.register(Register::Sp), sp - 2 * values.len() as u16);

        for v in values.iter().rev() {
            prop_assert_eq!(cpu.pop().unwrap(), *v);
        }
        prop_assert_eq!(cpu.register(Register::Sp), sp);
        let underflow = matches!(cpu.pop(), Err(CpuError::StackUnderflow { .. }));
        prop_assert!(underflow, "pop past the stack top must underflow");
    }

    #[test]
    fn jne_branches_only_on_mismatch(acc in any::<u16>(), value in any::<u16>(), target in 0x20u16..0x100) {
        let mut cpu = cpu_with(&ProgramBuilder::new().jmp_not_eq(value, target).build());
        cpu.set_register(Register::Acc, acc);
        cpu.step().unwrap();

        let expected = if acc == value { 5 } else { target };
        prop_assert_eq!(cpu.register(Register::Ip), expected);
    }

    #[test]
    fn register_round_trips_by_name(reg in any_register(), value in any::<u16>()) {
        let mut cpu = cpu_with(&[]);
        cpu.set_register(reg, value);
        prop_assert_eq!(cpu.register(reg), value);
        prop_assert_eq!(cpu.register_by_name(reg.name()).unwrap(), value);
    }

    #[test]
    fn decode_at_matches_step(value in any::<u16>(), reg in general_register(), addr in 0x40u16..0x1000) {
        let program = ProgramBuilder::new()
            .mov_lit_reg(value, reg)
            .mov_reg_mem(reg, addr)
            .build();
        let mut cpu = cpu_with(&program);

        let first = decode_at(cpu.memory(), 0).unwrap();
        let second = decode_at(cpu.memory(), 4).unwrap();
        prop_assert_eq!(cpu.step().unwrap(), Some(first));
        prop_assert_eq!(cpu.step().unwrap(), Some(second));
        prop_assert_eq!(second, Instruction::MovRegMem { reg, addr });
        prop_assert_eq!(cpu.memory().read16(addr).unwrap(), value);
    }
}
