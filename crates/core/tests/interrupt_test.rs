//! Reset, IRQ and NMI sequencing, including the WAI and STP halt states.

use w65c02_core::{Cpu, Flag, Ram, RunMode, IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR};

const ORIGIN: u16 = 0x0200;
const IRQ_HANDLER: u16 = 0x9000;
const NMI_HANDLER: u16 = 0xA000;

fn setup_cpu(program: &[u8]) -> Cpu<Ram> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ram = Ram::new();
    ram.load(ORIGIN, program).unwrap();
    // IRQ: LDX #$42; RTI
    ram.load(IRQ_HANDLER, &[0xA2, 0x42, 0x40]).unwrap();
    // NMI: LDY #$24; RTI
    ram.load(NMI_HANDLER, &[0xA0, 0x24, 0x40]).unwrap();
    ram.set_vector(RESET_VECTOR, ORIGIN);
    ram.set_vector(IRQ_VECTOR, IRQ_HANDLER);
    ram.set_vector(NMI_VECTOR, NMI_HANDLER);
    let mut cpu = Cpu::new(ram);
    cpu.reset();
    cpu
}

fn run(cpu: &mut Cpu<Ram>) -> u64 {
    let mut cycles = 0;
    cpu.run(1_000, &mut cycles, RunMode::CycleCount);
    cycles
}

fn stack_byte(cpu: &Cpu<Ram>, depth: u8) -> u8 {
    cpu.bus().peek(0x0100 | cpu.sp().wrapping_add(depth) as u16)
}

#[test]
fn test_reset_reads_vector_low_then_high() {
    let cpu = setup_cpu(&[]);
    assert_eq!(cpu.pc(), ORIGIN);
    assert_eq!(cpu.status(), 0x30);
    assert_eq!(cpu.sp(), 0xFD);
}

#[test]
fn test_wai_then_irq_runs_handler_and_resumes() {
    // CLI; WAI; LDA #$01; STP
    let mut cpu = setup_cpu(&[0x58, 0xCB, 0xA9, 0x01, 0xDB]);
    run(&mut cpu);
    assert!(cpu.is_waiting());
    assert_eq!(cpu.pc(), 0x0201);

    cpu.irq();
    assert!(!cpu.is_waiting());
    assert_eq!(cpu.pc(), IRQ_HANDLER);
    assert_eq!(stack_byte(&cpu, 3), 0x02);
    assert_eq!(stack_byte(&cpu, 2), 0x02);
    assert_eq!(stack_byte(&cpu, 1) & 0x30, 0x20);
    assert!(cpu.flag(Flag::IrqDisable));

    run(&mut cpu);
    assert!(cpu.is_stopped());
    assert_eq!(cpu.x(), 0x42);
    assert_eq!(cpu.a(), 0x01);
    assert!(!cpu.flag(Flag::IrqDisable));
    assert_eq!(cpu.sp(), 0xFD);
}

#[test]
fn test_masked_irq_releases_wai_without_handler() {
    // SEI; WAI; LDA #$07; STP
    let mut cpu = setup_cpu(&[0x78, 0xCB, 0xA9, 0x07, 0xDB]);
    run(&mut cpu);
    assert!(cpu.is_waiting());

    cpu.irq();
    assert!(!cpu.is_waiting());
    assert_eq!(cpu.pc(), 0x0202);
    assert_eq!(cpu.sp(), 0xFD);

    run(&mut cpu);
    assert_eq!(cpu.a(), 0x07);
    assert_eq!(cpu.x(), 0x00);
}

#[test]
fn test_nmi_taken_with_interrupts_disabled() {
    // SEI; SED; NOP; STP
    let mut cpu = setup_cpu(&[0x78, 0xF8, 0xEA, 0xDB]);
    let mut cycles = 0;
    cpu.run(4, &mut cycles, RunMode::CycleCount);
    assert_eq!(cpu.pc(), 0x0202);

    cpu.nmi();
    assert_eq!(cpu.pc(), NMI_HANDLER);
    assert!(!cpu.flag(Flag::Decimal));
    assert_eq!(stack_byte(&cpu, 1) & 0x10, 0x00);

    run(&mut cpu);
    assert_eq!(cpu.y(), 0x24);
    assert!(cpu.flag(Flag::Decimal));
    assert!(cpu.flag(Flag::IrqDisable));
    assert!(cpu.is_stopped());
}

#[test]
fn test_nmi_releases_wai() {
    // WAI; STP
    let mut cpu = setup_cpu(&[0xCB, 0xDB]);
    run(&mut cpu);
    cpu.nmi();
    assert!(!cpu.is_waiting());
    run(&mut cpu);
    assert_eq!(cpu.y(), 0x24);
    assert_eq!(cpu.pc(), 0x0201);
}

#[test]
fn test_stopped_processor_ignores_interrupts_until_reset() {
    // CLI; STP
    let mut cpu = setup_cpu(&[0x58, 0xDB]);
    run(&mut cpu);
    assert!(cpu.is_stopped());

    cpu.irq();
    cpu.nmi();
    assert_eq!(cpu.pc(), 0x0201);
    assert_eq!(cpu.sp(), 0xFD);
    assert_eq!(run(&mut cpu), 0);

    cpu.reset();
    assert_eq!(cpu.halt(), 0);
    assert_eq!(cpu.pc(), ORIGIN);
}

#[test]
fn test_brk_shares_irq_vector_and_sets_break() {
    // BRK; signature; LDA #$05; STP
    let mut cpu = setup_cpu(&[0x00, 0xFF, 0xA9, 0x05, 0xDB]);
    cpu.step();
    assert_eq!(cpu.pc(), IRQ_HANDLER);
    assert_eq!(stack_byte(&cpu, 1) & 0x30, 0x30);

    run(&mut cpu);
    assert_eq!(cpu.a(), 0x05);
    assert_eq!(cpu.x(), 0x42);
}

#[test]
fn test_reset_defaults_survive_reset() {
    let mut cpu = setup_cpu(&[]);
    cpu.set_reset_sp(0xFF);
    cpu.set_reset_a(0x10);
    cpu.set_reset_status(Flag::IrqDisable as u8);
    cpu.set_sp(0x00);
    cpu.reset();
    assert_eq!(cpu.sp(), 0xFF);
    assert_eq!(cpu.a(), 0x10);
    assert_eq!(cpu.status(), 0x34);

    cpu.irq();
    assert_eq!(cpu.pc(), ORIGIN);
}
