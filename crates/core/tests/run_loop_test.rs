//! Budget accounting of `Cpu::run` in both run modes.

use w65c02_core::{Cpu, Ram, RunMode};

const ORIGIN: u16 = 0x0200;

fn setup_cpu(program: &[u8]) -> Cpu<Ram> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ram = Ram::new();
    ram.load(ORIGIN, program).unwrap();
    ram.set_vector(0xFFFC, ORIGIN);
    ram.set_vector(0xFFFE, 0x9000);
    let mut cpu = Cpu::new(ram);
    cpu.reset();
    cpu
}

/// NOP (2), NOP (2), BRK (7).
const TWO_TWO_SEVEN: [u8; 3] = [0xEA, 0xEA, 0x00];

#[test]
fn test_cycle_budget_stops_once_exhausted() {
    let mut cpu = setup_cpu(&TWO_TWO_SEVEN);
    let mut cycles = 0;

    cpu.run(4, &mut cycles, RunMode::CycleCount);

    assert_eq!(cycles, 4);
    assert_eq!(cpu.pc(), 0x0202);
}

#[test]
fn test_cycle_budget_lets_last_instruction_overrun() {
    let mut cpu = setup_cpu(&TWO_TWO_SEVEN);
    let mut cycles = 0;

    // 10 - 2 - 2 leaves 6, so BRK still starts and ends 1 cycle over.
    cpu.run(10, &mut cycles, RunMode::CycleCount);

    assert_eq!(cycles, 11);
    assert_eq!(cpu.pc(), 0x9000);
}

#[test]
fn test_instruction_budget_counts_instructions() {
    let mut cpu = setup_cpu(&[0xEA; 16]);
    let mut cycles = 0;

    cpu.run(10, &mut cycles, RunMode::InstructionCount);

    assert_eq!(cpu.pc(), ORIGIN + 10);
    assert_eq!(cycles, 20);
}

#[test]
fn test_cycle_counter_accumulates_across_runs() {
    let mut cpu = setup_cpu(&[0xEA; 16]);
    let mut cycles = 100;

    cpu.run(3, &mut cycles, RunMode::InstructionCount);
    cpu.run(4, &mut cycles, RunMode::CycleCount);

    assert_eq!(cycles, 100 + 6 + 4);
    assert_eq!(cpu.pc(), ORIGIN + 5);
}

#[test]
fn test_run_stops_on_wai_with_budget_left() {
    // NOP; WAI; NOP
    let mut cpu = setup_cpu(&[0xEA, 0xCB, 0xEA]);
    let mut cycles = 0;

    cpu.run(1_000, &mut cycles, RunMode::CycleCount);

    assert!(cpu.is_waiting());
    assert_eq!(cpu.pc(), 0x0201);
    assert_eq!(cycles, 2 + 5);

    cpu.run(1_000, &mut cycles, RunMode::CycleCount);
    assert_eq!(cycles, 7);
}

#[test]
fn test_run_stops_on_stp() {
    // LDA #$01; STP; LDA #$02
    let mut cpu = setup_cpu(&[0xA9, 0x01, 0xDB, 0xA9, 0x02]);
    let mut cycles = 0;

    cpu.run(1_000, &mut cycles, RunMode::InstructionCount);

    assert!(cpu.is_stopped());
    assert_eq!(cpu.a(), 0x01);
    assert_eq!(cpu.pc(), 0x0202);
}

#[test]
fn test_counting_loop() {
    // LDX #$0A; LDA #$00; CLC
    // loop: STX $00; ADC $00; DEX; BNE loop
    // STA $10; STP
    let program = [
        0xA2, 0x0A, 0xA9, 0x00, 0x18, 0x86, 0x00, 0x65, 0x00, 0xCA, 0xD0, 0xF9, 0x85, 0x10, 0xDB,
    ];
    let mut cpu = setup_cpu(&program);
    let mut cycles = 0;

    cpu.run(10_000, &mut cycles, RunMode::CycleCount);

    assert!(cpu.is_stopped());
    assert_eq!(cpu.bus().peek(0x10), 55);
    assert_eq!(cpu.x(), 0);
    assert_eq!(cycles, 6 + 10 * 10 + 3 + 2);
}
