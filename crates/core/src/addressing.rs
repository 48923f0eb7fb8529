//! # Addressing Modes
//!
//! Each resolver consumes its operand bytes at PC (advancing PC) and hands the
//! effective address to the operation handler. Modes without a memory operand
//! resolve to 0, which handlers ignore.

use crate::bus::Bus;
use crate::cpu::Cpu;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// No operand.
    Implied,
    /// Operates on A.
    Accumulator,
    /// `#$nn`: the address of the operand byte itself.
    Immediate,
    /// `$nn`
    ZeroPage,
    /// `$nn,X`, wraps within the zero page.
    ZeroPageX,
    /// `$nn,Y`, wraps within the zero page.
    ZeroPageY,
    /// Signed offset from the PC following the operand.
    Relative,
    /// `$nnnn`
    Absolute,
    /// `$nnnn,X`
    AbsoluteX,
    /// `$nnnn,Y`
    AbsoluteY,
    /// `($nnnn)`, JMP only. The pointer's high byte is fetched from the next
    /// address even across a page boundary.
    Indirect,
    /// `($nnnn,X)`, JMP only.
    IndirectAbsoluteX,
    /// `($nn,X)`
    IndirectX,
    /// `($nn),Y`
    IndirectY,
    /// `($nn)`
    IndirectZeroPage,
}

impl Mode {
    /// Number of operand bytes following the opcode.
    pub const fn operand_bytes(self) -> u8 {
        match self {
            Mode::Implied | Mode::Accumulator => 0,
            Mode::Immediate
            | Mode::ZeroPage
            | Mode::ZeroPageX
            | Mode::ZeroPageY
            | Mode::Relative
            | Mode::IndirectX
            | Mode::IndirectY
            | Mode::IndirectZeroPage => 1,
            Mode::Absolute
            | Mode::AbsoluteX
            | Mode::AbsoluteY
            | Mode::Indirect
            | Mode::IndirectAbsoluteX => 2,
        }
    }
}

impl<B: Bus> Cpu<B> {
    pub(crate) fn operand_address(&mut self, mode: Mode) -> u16 {
        match mode {
            Mode::Implied | Mode::Accumulator => 0,
            Mode::Immediate => {
                let original_pc = self.pc;
                self.increment_pc();
                original_pc
            }
            Mode::ZeroPage => self.next_byte() as u16,
            Mode::ZeroPageX => low_byte(offset(self.next_byte(), self.x)),
            Mode::ZeroPageY => low_byte(offset(self.next_byte(), self.y)),
            Mode::Relative => {
                let displacement = self.next_byte() as i8;
                self.pc.wrapping_add_signed(displacement as i16)
            }
            Mode::Absolute => self.next_word(),
            Mode::AbsoluteX => offset(self.next_word(), self.x),
            Mode::AbsoluteY => offset(self.next_word(), self.y),
            Mode::Indirect => {
                let i = self.next_word();
                self.bus.read_word(i)
            }
            Mode::IndirectAbsoluteX => {
                let i = offset(self.next_word(), self.x);
                self.bus.read_word(i)
            }
            Mode::IndirectX => {
                let i = low_byte(offset(self.next_byte(), self.x));
                self.read_zero_page_word(i)
            }
            Mode::IndirectY => {
                let i = self.next_byte() as u16;
                let base = self.read_zero_page_word(i);
                offset(base, self.y)
            }
            Mode::IndirectZeroPage => {
                let i = self.next_byte() as u16;
                self.read_zero_page_word(i)
            }
        }
    }

    /// Pointer fetch from the zero page; the high byte wraps to 0x00 after 0xFF.
    fn read_zero_page_word(&mut self, address: u16) -> u16 {
        let lo = self.bus.read(address) as u16;
        let hi = self.bus.read(low_byte(address + 1)) as u16;
        (hi << 8) | lo
    }
}

fn offset<T: Into<u16>>(base: T, offset: u8) -> u16 {
    base.into().wrapping_add(offset as u16)
}

fn low_byte<T: Into<u16>>(value: T) -> u16 {
    value.into() & 0xFF
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Ram;

    fn cpu_at(program: &[u8]) -> Cpu<Ram> {
        let mut ram = Ram::new();
        ram.load(0x0200, program).unwrap();
        let mut cpu = Cpu::new(ram);
        cpu.set_pc(0x0200);
        cpu
    }

    #[test]
    fn test_immediate_returns_operand_location() {
        let mut cpu = cpu_at(&[0x42]);
        assert_eq!(cpu.operand_address(Mode::Immediate), 0x0200);
        assert_eq!(cpu.pc(), 0x0201);
    }

    #[test]
    fn test_implied_and_accumulator_consume_nothing() {
        let mut cpu = cpu_at(&[0xFF]);
        assert_eq!(cpu.operand_address(Mode::Implied), 0);
        assert_eq!(cpu.operand_address(Mode::Accumulator), 0);
        assert_eq!(cpu.pc(), 0x0200);
    }

    #[test]
    fn test_zero_page_x_wraps() {
        let mut cpu = cpu_at(&[0xF0]);
        cpu.set_x(0x20);
        assert_eq!(cpu.operand_address(Mode::ZeroPageX), 0x0010);
    }

    #[test]
    fn test_zero_page_y_wraps() {
        let mut cpu = cpu_at(&[0xFF]);
        cpu.set_y(0x01);
        assert_eq!(cpu.operand_address(Mode::ZeroPageY), 0x0000);
    }

    #[test]
    fn test_absolute_x_wraps_16_bit() {
        let mut cpu = cpu_at(&[0xFF, 0xFF]);
        cpu.set_x(0x02);
        assert_eq!(cpu.operand_address(Mode::AbsoluteX), 0x0001);
        assert_eq!(cpu.pc(), 0x0202);
    }

    #[test]
    fn test_absolute_y() {
        let mut cpu = cpu_at(&[0x00, 0x30]);
        cpu.set_y(0x10);
        assert_eq!(cpu.operand_address(Mode::AbsoluteY), 0x3010);
    }

    #[test]
    fn test_indirect_crosses_page_for_high_byte() {
        let mut cpu = cpu_at(&[0xFF, 0x10]);
        cpu.bus_mut().poke(0x10FF, 0x34);
        cpu.bus_mut().poke(0x1100, 0x12);
        cpu.bus_mut().poke(0x1000, 0x99);
        assert_eq!(cpu.operand_address(Mode::Indirect), 0x1234);
    }

    #[test]
    fn test_indirect_absolute_x_indexes_before_fetch() {
        let mut cpu = cpu_at(&[0x00, 0x30]);
        cpu.set_x(0x04);
        cpu.bus_mut().set_vector(0x3004, 0xBEEF);
        assert_eq!(cpu.operand_address(Mode::IndirectAbsoluteX), 0xBEEF);
    }

    #[test]
    fn test_indirect_x_pointer_wraps_in_zero_page() {
        let mut cpu = cpu_at(&[0xFE]);
        cpu.set_x(0x01);
        cpu.bus_mut().poke(0x00FF, 0x78);
        cpu.bus_mut().poke(0x0000, 0x56);
        assert_eq!(cpu.operand_address(Mode::IndirectX), 0x5678);
    }

    #[test]
    fn test_indirect_y_adds_after_fetch() {
        let mut cpu = cpu_at(&[0xFF]);
        cpu.set_y(0x10);
        cpu.bus_mut().poke(0x00FF, 0xF8);
        cpu.bus_mut().poke(0x0000, 0xFF);
        assert_eq!(cpu.operand_address(Mode::IndirectY), 0x0008);
    }

    #[test]
    fn test_indirect_zero_page() {
        let mut cpu = cpu_at(&[0x40]);
        cpu.bus_mut().set_vector(0x0040, 0x4000);
        assert_eq!(cpu.operand_address(Mode::IndirectZeroPage), 0x4000);
        assert_eq!(cpu.pc(), 0x0201);
    }

    #[test]
    fn test_relative_is_from_next_instruction() {
        let mut cpu = cpu_at(&[0xFE]);
        assert_eq!(cpu.operand_address(Mode::Relative), 0x01FF);
        let mut cpu = cpu_at(&[0x05]);
        assert_eq!(cpu.operand_address(Mode::Relative), 0x0206);
    }

    #[test]
    fn test_operand_bytes() {
        assert_eq!(Mode::Accumulator.operand_bytes(), 0);
        assert_eq!(Mode::IndirectZeroPage.operand_bytes(), 1);
        assert_eq!(Mode::IndirectAbsoluteX.operand_bytes(), 2);
    }
}
