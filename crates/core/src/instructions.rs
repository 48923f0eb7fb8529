//! Operation handlers. Each one receives the address produced by the
//! addressing-mode resolver (0 for implied/accumulator forms).

use crate::bus::Bus;
use crate::cpu::{Cpu, Interrupt};
use crate::flags::{Flag, FORCED, HALT_STOPPED, HALT_WAITING};
use crate::opcodes::Op;

impl<B: Bus> Cpu<B> {
    pub(crate) fn execute(&mut self, op: Op, address: u16) {
        match op {
            // Load/Store
            Op::Lda => self.lda(address),
            Op::Ldx => self.ldx(address),
            Op::Ldy => self.ldy(address),
            Op::Sta => self.bus.write(address, self.a),
            Op::Stx => self.bus.write(address, self.x),
            Op::Sty => self.bus.write(address, self.y),
            Op::Stz => self.bus.write(address, 0),

            // Arithmetic
            Op::Adc => self.adc(address),
            Op::Sbc => self.sbc(address),
            Op::Cmp => self.compare(self.a, address),
            Op::Cpx => self.compare(self.x, address),
            Op::Cpy => self.compare(self.y, address),

            // Logical
            Op::And => self.and(address),
            Op::Ora => self.ora(address),
            Op::Eor => self.eor(address),
            Op::Bit => self.bit(address),
            Op::BitImmediate => self.bit_immediate(address),
            Op::Trb => self.trb(address),
            Op::Tsb => self.tsb(address),

            // Shift/Rotate
            Op::Asl => self.modify(address, Self::shift_left),
            Op::AslA => self.a = self.shift_left(self.a),
            Op::Lsr => self.modify(address, Self::shift_right),
            Op::LsrA => self.a = self.shift_right(self.a),
            Op::Rol => self.modify(address, Self::rotate_left),
            Op::RolA => self.a = self.rotate_left(self.a),
            Op::Ror => self.modify(address, Self::rotate_right),
            Op::RorA => self.a = self.rotate_right(self.a),

            // Increment/Decrement
            Op::Inc => self.modify(address, Self::increment),
            Op::IncA => self.a = self.increment(self.a),
            Op::Inx => self.x = self.increment(self.x),
            Op::Iny => self.y = self.increment(self.y),
            Op::Dec => self.modify(address, Self::decrement),
            Op::DecA => self.a = self.decrement(self.a),
            Op::Dex => self.x = self.decrement(self.x),
            Op::Dey => self.y = self.decrement(self.y),

            // Bit manipulation
            Op::Rmb(bit) => self.modify(address, |_, value| value & !(1 << bit)),
            Op::Smb(bit) => self.modify(address, |_, value| value | (1 << bit)),
            Op::Bbr(bit) => self.branch_on_bit(address, bit, false),
            Op::Bbs(bit) => self.branch_on_bit(address, bit, true),

            // Branch
            Op::Bcc => self.branch(!self.get_flag(Flag::Carry), address),
            Op::Bcs => self.branch(self.get_flag(Flag::Carry), address),
            Op::Beq => self.branch(self.get_flag(Flag::Zero), address),
            Op::Bne => self.branch(!self.get_flag(Flag::Zero), address),
            Op::Bmi => self.branch(self.get_flag(Flag::Negative), address),
            Op::Bpl => self.branch(!self.get_flag(Flag::Negative), address),
            Op::Bvc => self.branch(!self.get_flag(Flag::Overflow), address),
            Op::Bvs => self.branch(self.get_flag(Flag::Overflow), address),
            Op::Bra => self.branch(true, address),

            // Jump/Subroutine
            Op::Jmp => self.pc = address,
            Op::Jsr => self.jsr(address),
            Op::Rts => self.pc = self.pop_word().wrapping_add(1),
            Op::Brk => {
                self.increment_pc();
                self.interrupt(Interrupt::Break);
            }
            Op::Rti => {
                self.p = self.pop_byte() | FORCED;
                self.pc = self.pop_word();
            }

            // Stack
            Op::Pha => self.push_byte(self.a),
            Op::Phx => self.push_byte(self.x),
            Op::Phy => self.push_byte(self.y),
            Op::Php => self.push_byte(self.p | FORCED),
            Op::Pla => self.a = self.pull(),
            Op::Plx => self.x = self.pull(),
            Op::Ply => self.y = self.pull(),
            Op::Plp => self.p = self.pop_byte() | FORCED,

            // Transfer
            Op::Tax => self.x = self.transfer(self.a),
            Op::Tay => self.y = self.transfer(self.a),
            Op::Tsx => self.x = self.transfer(self.sp),
            Op::Txa => self.a = self.transfer(self.x),
            Op::Tya => self.a = self.transfer(self.y),
            Op::Txs => self.sp = self.x,

            // Flags
            Op::Clc => self.set_flag(Flag::Carry, false),
            Op::Cld => self.set_flag(Flag::Decimal, false),
            Op::Cli => self.set_flag(Flag::IrqDisable, false),
            Op::Clv => self.set_flag(Flag::Overflow, false),
            Op::Sec => self.set_flag(Flag::Carry, true),
            Op::Sed => self.set_flag(Flag::Decimal, true),
            Op::Sei => self.set_flag(Flag::IrqDisable, true),

            // Halt
            Op::Wai => {
                self.halt |= HALT_WAITING;
                self.decrement_pc();
                log::debug!("WAI at ${:04X}", self.pc);
            }
            Op::Stp => {
                self.halt |= HALT_STOPPED;
                self.decrement_pc();
                log::debug!("STP at ${:04X}", self.pc);
            }

            Op::Nop => {}
        }
    }

    fn lda(&mut self, address: u16) {
        self.a = self.bus.read(address);
        self.set_flags_zero_negative(self.a);
    }

    fn ldx(&mut self, address: u16) {
        self.x = self.bus.read(address);
        self.set_flags_zero_negative(self.x);
    }

    fn ldy(&mut self, address: u16) {
        self.y = self.bus.read(address);
        self.set_flags_zero_negative(self.y);
    }

    /// Binary or BCD addition. In decimal mode Z, N and C reflect the
    /// corrected sum; V is taken after the low-nibble adjustment.
    fn adc(&mut self, address: u16) {
        let m = self.bus.read(address) as u16;
        let a = self.a as u16;
        let carry = self.carry() as u16;
        let mut result = a + m + carry;
        self.set_flag(Flag::Zero, result & 0xFF == 0);

        if self.get_flag(Flag::Decimal) {
            if (a & 0x0F) + (m & 0x0F) + carry > 9 {
                result += 0x06;
            }
            self.set_flag(Flag::Overflow, (a ^ m) & 0x80 == 0 && (a ^ result) & 0x80 != 0);
            if result > 0x99 {
                result += 0x60;
            }
            self.set_flag(Flag::Zero, result & 0xFF == 0);
            self.set_flag(Flag::Negative, result & 0x80 != 0);
            self.set_flag(Flag::Carry, result > 0x99);
        } else {
            self.set_flag(Flag::Negative, result & 0x80 != 0);
            self.set_flag(Flag::Overflow, (a ^ m) & 0x80 == 0 && (a ^ result) & 0x80 != 0);
            self.set_flag(Flag::Carry, result > 0xFF);
        }

        self.a = result as u8;
    }

    /// Binary or BCD subtraction. V always comes from the binary difference;
    /// in decimal mode N and Z are taken again from the corrected value.
    fn sbc(&mut self, address: u16) {
        let m = self.bus.read(address) as u32;
        let a = self.a as u32;
        let borrow = 1 - self.carry() as u32;
        let mut result = a.wrapping_sub(m).wrapping_sub(borrow);
        self.set_flags_zero_negative(result as u8);
        self.set_flag(Flag::Overflow, (a ^ result) & 0x80 != 0 && (a ^ m) & 0x80 != 0);

        if self.get_flag(Flag::Decimal) {
            if ((a & 0x0F) as i32 - borrow as i32) < (m & 0x0F) as i32 {
                result = result.wrapping_sub(0x06);
            }
            if result > 0x99 {
                result = result.wrapping_sub(0x60);
            }
            self.set_flags_zero_negative(result as u8);
        }

        self.set_flag(Flag::Carry, result < 0x100);
        self.a = result as u8;
    }

    fn compare(&mut self, register: u8, address: u16) {
        let m = self.bus.read(address);
        let result = register.wrapping_sub(m);
        self.set_flag(Flag::Carry, register >= m);
        self.set_flags_zero_negative(result);
    }

    fn and(&mut self, address: u16) {
        self.a &= self.bus.read(address);
        self.set_flags_zero_negative(self.a);
    }

    fn ora(&mut self, address: u16) {
        self.a |= self.bus.read(address);
        self.set_flags_zero_negative(self.a);
    }

    fn eor(&mut self, address: u16) {
        self.a ^= self.bus.read(address);
        self.set_flags_zero_negative(self.a);
    }

    /// N and V are copied from bits 7 and 6 of memory.
    fn bit(&mut self, address: u16) {
        let m = self.bus.read(address);
        self.p = (self.p & 0x3F) | (m & 0xC0) | FORCED;
        self.set_flag(Flag::Zero, m & self.a == 0);
    }

    fn bit_immediate(&mut self, address: u16) {
        let m = self.bus.read(address);
        self.set_flag(Flag::Zero, m & self.a == 0);
    }

    fn trb(&mut self, address: u16) {
        let m = self.bus.read(address);
        self.set_flag(Flag::Zero, m & self.a == 0);
        self.bus.write(address, m & !self.a);
    }

    fn tsb(&mut self, address: u16) {
        let m = self.bus.read(address);
        self.set_flag(Flag::Zero, m & self.a == 0);
        self.bus.write(address, m | self.a);
    }

    /// Read-modify-write of a memory operand.
    fn modify(&mut self, address: u16, f: impl FnOnce(&mut Self, u8) -> u8) {
        let value = self.bus.read(address);
        let result = f(self, value);
        self.bus.write(address, result);
    }

    fn shift_left(&mut self, value: u8) -> u8 {
        let result = value << 1;
        self.set_flag(Flag::Carry, value & 0x80 != 0);
        self.set_flags_zero_negative(result);
        result
    }

    fn shift_right(&mut self, value: u8) -> u8 {
        let result = value >> 1;
        self.set_flag(Flag::Carry, value & 0x01 != 0);
        self.set_flags_zero_negative(result);
        result
    }

    fn rotate_left(&mut self, value: u8) -> u8 {
        let result = (value << 1) | self.carry();
        self.set_flag(Flag::Carry, value & 0x80 != 0);
        self.set_flags_zero_negative(result);
        result
    }

    fn rotate_right(&mut self, value: u8) -> u8 {
        let result = (value >> 1) | (self.carry() << 7);
        self.set_flag(Flag::Carry, value & 0x01 != 0);
        self.set_flags_zero_negative(result);
        result
    }

    fn increment(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flags_zero_negative(result);
        result
    }

    fn decrement(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flags_zero_negative(result);
        result
    }

    fn transfer(&mut self, value: u8) -> u8 {
        self.set_flags_zero_negative(value);
        value
    }

    fn pull(&mut self) -> u8 {
        let value = self.pop_byte();
        self.set_flags_zero_negative(value);
        value
    }

    fn branch(&mut self, condition: bool, target: u16) {
        if condition {
            self.pc = target;
        }
    }

    /// BBRn/BBSn. The relative offset follows the zero-page operand and is
    /// skipped when the branch is not taken.
    fn branch_on_bit(&mut self, address: u16, bit: u8, set: bool) {
        let value = self.bus.read(address);
        if (value & (1 << bit) != 0) == set {
            let displacement = self.next_byte() as i8;
            self.pc = self.pc.wrapping_add_signed(displacement as i16);
        } else {
            self.increment_pc();
        }
    }

    fn jsr(&mut self, target: u16) {
        self.decrement_pc();
        self.push_word(self.pc);
        self.pc = target;
    }
}
