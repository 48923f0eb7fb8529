//! # WDC 65C02 CPU
//!
//! Processor state, the stack, reset/interrupt sequencing and the run loop.
//! Addressing modes live in [`crate::addressing`], operation handlers in
//! `instructions`.

use std::fmt;
use std::str::FromStr;

use crate::bus::Bus;
use crate::error::Error;
use crate::flags::{Flag, FORCED, HALT_STOPPED, HALT_WAITING};
use crate::opcodes::decode;

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

const STACK_PAGE: u16 = 0x0100;

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum Interrupt {
    Nmi,
    Irq,
    Break,
}

/// How [`Cpu::run`] charges its budget.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Every instruction costs 1.
    InstructionCount,
    /// Every instruction costs its base cycle count.
    #[default]
    CycleCount,
}

impl FromStr for RunMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "instructions" | "instruction" | "inst" => Ok(RunMode::InstructionCount),
            "cycles" | "cycle" => Ok(RunMode::CycleCount),
            _ => Err(Error::InvalidRunMode(s.to_string())),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::InstructionCount => write!(f, "instructions"),
            RunMode::CycleCount => write!(f, "cycles"),
        }
    }
}

/// Register values loaded by [`Cpu::reset`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResetDefaults {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub status: u8,
}

impl Default for ResetDefaults {
    fn default() -> Self {
        ResetDefaults {
            a: 0x00,
            x: 0x00,
            y: 0x00,
            sp: 0xFD,
            status: Flag::Constant as u8,
        }
    }
}

pub struct Cpu<B: Bus> {
    pub(crate) bus: B,
    pub(crate) pc: u16,
    pub(crate) sp: u8,
    pub(crate) a: u8,
    pub(crate) x: u8,
    pub(crate) y: u8,
    pub(crate) p: u8,
    pub(crate) halt: u8,
    defaults: ResetDefaults,
}

impl<B: Bus> Cpu<B> {
    /// Builds a processor around `bus` without touching it.
    ///
    /// Registers start at the power-on defaults with PC at 0; call
    /// [`Cpu::reset`] to fetch the reset vector.
    pub fn new(bus: B) -> Self {
        let defaults = ResetDefaults::default();
        Cpu {
            bus,
            pc: 0,
            sp: defaults.sp,
            a: defaults.a,
            x: defaults.x,
            y: defaults.y,
            p: defaults.status | FORCED,
            halt: 0,
            defaults,
        }
    }

    pub fn reset(&mut self) {
        self.halt = 0;
        self.a = self.defaults.a;
        self.x = self.defaults.x;
        self.y = self.defaults.y;
        self.pc = self.bus.read_word(RESET_VECTOR);
        self.sp = self.defaults.sp;
        self.p = self.defaults.status | FORCED;
        log::debug!("reset: PC=${:04X}", self.pc);
    }

    /// Maskable interrupt request. Wakes a WAI even when masked.
    pub fn irq(&mut self) {
        if !self.wake() {
            return;
        }
        if self.get_flag(Flag::IrqDisable) {
            log::debug!("IRQ masked at PC=${:04X}", self.pc);
            return;
        }
        self.interrupt(Interrupt::Irq);
    }

    /// Non-maskable interrupt. Ignored only by a stopped processor.
    pub fn nmi(&mut self) {
        if !self.wake() {
            return;
        }
        self.interrupt(Interrupt::Nmi);
    }

    /// Ends a WAI by stepping past it. Returns false if STP has halted the chip.
    fn wake(&mut self) -> bool {
        if self.halt & HALT_STOPPED != 0 {
            log::debug!("interrupt ignored: processor stopped");
            return false;
        }
        if self.halt & HALT_WAITING != 0 {
            self.halt &= !HALT_WAITING;
            self.increment_pc();
        }
        true
    }

    pub(crate) fn interrupt(&mut self, kind: Interrupt) {
        let status = match kind {
            Interrupt::Break => self.p | FORCED,
            Interrupt::Nmi | Interrupt::Irq => (self.p & !(Flag::Break as u8)) | Flag::Constant as u8,
        };
        self.push_word(self.pc);
        self.push_byte(status);
        self.set_flag(Flag::IrqDisable, true);
        self.set_flag(Flag::Decimal, false);

        let vector = match kind {
            Interrupt::Nmi => NMI_VECTOR,
            Interrupt::Irq | Interrupt::Break => IRQ_VECTOR,
        };
        self.pc = self.bus.read_word(vector);
        log::debug!("{:?} -> ${:04X}", kind, self.pc);
    }

    /// Executes instructions until `budget` is used up or the processor halts.
    ///
    /// Each instruction adds its base cycles to `cycles` and subtracts either
    /// those cycles or 1 from the budget, depending on `mode`. The last
    /// instruction may overrun the budget.
    pub fn run(&mut self, budget: i32, cycles: &mut u64, mode: RunMode) {
        let mut remaining = budget;
        while remaining > 0 && self.halt == 0 {
            let spent = self.step();
            *cycles += spent as u64;
            remaining -= match mode {
                RunMode::CycleCount => spent as i32,
                RunMode::InstructionCount => 1,
            };
        }
    }

    /// Fetches, decodes and executes one instruction, returning its base cycles.
    ///
    /// A halted processor does not fetch; the call returns 0.
    pub fn step(&mut self) -> u8 {
        if self.halt != 0 {
            return 0;
        }
        let pc = self.pc;
        let opcode = self.next_byte();
        let instruction = decode(opcode);

        if instruction.is_reserved(opcode) {
            log::trace!("${:04X}: undocumented opcode {:02X} executed as NOP", pc, opcode);
        } else {
            log::trace!("${:04X}: {:02X} {}", pc, opcode, instruction.op.mnemonic());
        }

        let address = self.operand_address(instruction.mode);
        self.execute(instruction.op, address);
        instruction.cycles
    }

    pub(crate) fn next_byte(&mut self) -> u8 {
        let value = self.bus.read(self.pc);
        self.increment_pc();
        value
    }

    pub(crate) fn next_word(&mut self) -> u16 {
        let lo = self.next_byte() as u16;
        let hi = self.next_byte() as u16;
        (hi << 8) | lo
    }

    pub(crate) fn increment_pc(&mut self) {
        self.pc = self.pc.wrapping_add(1);
    }

    pub(crate) fn decrement_pc(&mut self) {
        self.pc = self.pc.wrapping_sub(1);
    }

    pub(crate) fn pop_byte(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.bus.read(STACK_PAGE | self.sp as u16)
    }

    pub(crate) fn push_byte(&mut self, value: u8) {
        self.bus.write(STACK_PAGE | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub(crate) fn pop_word(&mut self) -> u16 {
        let lo = self.pop_byte() as u16;
        let hi = self.pop_byte() as u16;
        (hi << 8) | lo
    }

    pub(crate) fn push_word(&mut self, value: u16) {
        self.push_byte((value >> 8) as u8);
        self.push_byte(value as u8);
    }

    pub(crate) fn get_flag(&self, flag: Flag) -> bool {
        (self.p & flag as u8) != 0
    }

    pub(crate) fn set_flag(&mut self, flag: Flag, value: bool) {
        if value {
            self.p |= flag as u8;
        } else {
            self.p &= !(flag as u8);
        }
    }

    pub(crate) fn set_flags_zero_negative(&mut self, value: u8) {
        self.set_flag(Flag::Zero, value == 0);
        self.set_flag(Flag::Negative, value & 0b1000_0000 != 0);
    }

    pub(crate) fn carry(&self) -> u8 {
        if self.get_flag(Flag::Carry) {
            1
        } else {
            0
        }
    }

    // ========== Registers ==========

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    pub fn status(&self) -> u8 {
        self.p
    }

    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn flag(&self, flag: Flag) -> bool {
        self.get_flag(flag)
    }

    /// Raw halt indicator: bit 0 stopped (STP), bit 1 waiting (WAI).
    pub fn halt(&self) -> u8 {
        self.halt
    }

    pub fn is_stopped(&self) -> bool {
        self.halt & HALT_STOPPED != 0
    }

    pub fn is_waiting(&self) -> bool {
        self.halt & HALT_WAITING != 0
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    /// Constant and Break always read back as set.
    pub fn set_status(&mut self, value: u8) {
        self.p = value | FORCED;
    }

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    // ========== Reset defaults ==========

    pub fn reset_defaults(&self) -> ResetDefaults {
        self.defaults
    }

    pub fn set_reset_defaults(&mut self, defaults: ResetDefaults) {
        self.defaults = ResetDefaults {
            status: defaults.status | FORCED,
            ..defaults
        };
    }

    pub fn set_reset_a(&mut self, value: u8) {
        self.defaults.a = value;
    }

    pub fn set_reset_x(&mut self, value: u8) {
        self.defaults.x = value;
    }

    pub fn set_reset_y(&mut self, value: u8) {
        self.defaults.y = value;
    }

    pub fn set_reset_sp(&mut self, value: u8) {
        self.defaults.sp = value;
    }

    pub fn set_reset_status(&mut self, value: u8) {
        self.defaults.status = value | FORCED;
    }

    // ========== Bus ==========

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }
}

impl<B: Bus> fmt::Debug for Cpu<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC=${:04X} A=${:02X} X=${:02X} Y=${:02X} SP=${:02X} P=${:02X} HALT={:02b}",
            self.pc, self.a, self.x, self.y, self.sp, self.p, self.halt
        )
    }
}
