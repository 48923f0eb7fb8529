//! # Instruction Table
//!
//! All 256 opcodes decode to an [`Instruction`]: an addressing mode, an
//! operation and a base cycle count. The table is a `const`, built in two
//! passes: every slot first gets a no-op, then the documented opcodes
//! overwrite their slots. Undocumented opcodes therefore execute as no-ops
//! that consume the same operand bytes and cycles as the real chip.

use crate::addressing::Mode;

/// Operation handlers. Bit-test and bit-modify families carry their bit index.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Op {
    Adc,
    And,
    Asl,
    AslA,
    Bbr(u8),
    Bbs(u8),
    Bcc,
    Bcs,
    Beq,
    Bit,
    BitImmediate,
    Bmi,
    Bne,
    Bpl,
    Bra,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    DecA,
    Dex,
    Dey,
    Eor,
    Inc,
    IncA,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    LsrA,
    Nop,
    Ora,
    Pha,
    Php,
    Phx,
    Phy,
    Pla,
    Plp,
    Plx,
    Ply,
    Rmb(u8),
    Rol,
    RolA,
    Ror,
    RorA,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Smb(u8),
    Sta,
    Stp,
    Stx,
    Sty,
    Stz,
    Tax,
    Tay,
    Trb,
    Tsb,
    Tsx,
    Txa,
    Txs,
    Tya,
    Wai,
}

impl Op {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Op::Adc => "ADC",
            Op::And => "AND",
            Op::Asl | Op::AslA => "ASL",
            Op::Bbr(_) => "BBR",
            Op::Bbs(_) => "BBS",
            Op::Bcc => "BCC",
            Op::Bcs => "BCS",
            Op::Beq => "BEQ",
            Op::Bit | Op::BitImmediate => "BIT",
            Op::Bmi => "BMI",
            Op::Bne => "BNE",
            Op::Bpl => "BPL",
            Op::Bra => "BRA",
            Op::Brk => "BRK",
            Op::Bvc => "BVC",
            Op::Bvs => "BVS",
            Op::Clc => "CLC",
            Op::Cld => "CLD",
            Op::Cli => "CLI",
            Op::Clv => "CLV",
            Op::Cmp => "CMP",
            Op::Cpx => "CPX",
            Op::Cpy => "CPY",
            Op::Dec | Op::DecA => "DEC",
            Op::Dex => "DEX",
            Op::Dey => "DEY",
            Op::Eor => "EOR",
            Op::Inc | Op::IncA => "INC",
            Op::Inx => "INX",
            Op::Iny => "INY",
            Op::Jmp => "JMP",
            Op::Jsr => "JSR",
            Op::Lda => "LDA",
            Op::Ldx => "LDX",
            Op::Ldy => "LDY",
            Op::Lsr | Op::LsrA => "LSR",
            Op::Nop => "NOP",
            Op::Ora => "ORA",
            Op::Pha => "PHA",
            Op::Php => "PHP",
            Op::Phx => "PHX",
            Op::Phy => "PHY",
            Op::Pla => "PLA",
            Op::Plp => "PLP",
            Op::Plx => "PLX",
            Op::Ply => "PLY",
            Op::Rmb(_) => "RMB",
            Op::Rol | Op::RolA => "ROL",
            Op::Ror | Op::RorA => "ROR",
            Op::Rti => "RTI",
            Op::Rts => "RTS",
            Op::Sbc => "SBC",
            Op::Sec => "SEC",
            Op::Sed => "SED",
            Op::Sei => "SEI",
            Op::Smb(_) => "SMB",
            Op::Sta => "STA",
            Op::Stp => "STP",
            Op::Stx => "STX",
            Op::Sty => "STY",
            Op::Stz => "STZ",
            Op::Tax => "TAX",
            Op::Tay => "TAY",
            Op::Trb => "TRB",
            Op::Tsb => "TSB",
            Op::Tsx => "TSX",
            Op::Txa => "TXA",
            Op::Txs => "TXS",
            Op::Tya => "TYA",
            Op::Wai => "WAI",
        }
    }

    /// Bit index of the BBR/BBS/RMB/SMB families.
    pub const fn bit(self) -> Option<u8> {
        match self {
            Op::Bbr(n) | Op::Bbs(n) | Op::Rmb(n) | Op::Smb(n) => Some(n),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mode: Mode,
    pub op: Op,
    /// Base cost in cycles; no page-crossing or branch-taken penalties are added.
    pub cycles: u8,
}

impl Instruction {
    /// Slot value for opcodes the chip treats as a one-byte, one-cycle no-op.
    pub const RESERVED: Instruction = Instruction::new(Mode::Implied, Op::Nop, 1);

    pub const fn new(mode: Mode, op: Op, cycles: u8) -> Self {
        Instruction { mode, op, cycles }
    }

    /// Total length in bytes, opcode included. BBR/BBS fetch their branch
    /// offset inside the handler, on top of the zero-page operand.
    pub const fn size_bytes(&self) -> u8 {
        let branch_offset = match self.op {
            Op::Bbr(_) | Op::Bbs(_) => 1,
            _ => 0,
        };
        1 + self.mode.operand_bytes() + branch_offset
    }

    /// Whether this slot holds an undocumented no-op rather than a real instruction.
    pub fn is_reserved(&self, opcode: u8) -> bool {
        self.op == Op::Nop && opcode != 0xEA
    }
}

/// The decode table, indexed by opcode.
pub static INSTRUCTIONS: [Instruction; 256] = build();

pub fn decode(opcode: u8) -> &'static Instruction {
    &INSTRUCTIONS[opcode as usize]
}

const fn build() -> [Instruction; 256] {
    let mut table = [Instruction::RESERVED; 256];

    // Undocumented slots in the x2, x4 and xC columns still fetch operands.
    let mut row = 0;
    while row < 0x10 {
        table[(row << 4) | 0x02] = Instruction::new(Mode::Immediate, Op::Nop, 2);
        table[(row << 4) | 0x04] = Instruction::new(Mode::ZeroPageX, Op::Nop, 4);
        table[(row << 4) | 0x0C] = Instruction::new(Mode::AbsoluteX, Op::Nop, 4);
        row += 1;
    }
    table[0x44] = Instruction::new(Mode::ZeroPage, Op::Nop, 3);
    table[0x5C] = Instruction::new(Mode::Absolute, Op::Nop, 8);

    let mut i = 0;
    while i < documented::OPCODES.len() {
        let (opcode, mode, op, cycles) = documented::OPCODES[i];
        table[opcode as usize] = Instruction::new(mode, op, cycles);
        i += 1;
    }

    table
}

mod documented {
    use super::Mode::*;
    use super::Op::*;
    use super::{Mode, Op};

    pub(super) const OPCODES: &[(u8, Mode, Op, u8)] = &[
        (0x61, IndirectX, Adc, 6),
        (0x65, ZeroPage, Adc, 3),
        (0x69, Immediate, Adc, 2),
        (0x6D, Absolute, Adc, 4),
        (0x71, IndirectY, Adc, 6),
        (0x72, IndirectZeroPage, Adc, 5),
        (0x75, ZeroPageX, Adc, 4),
        (0x79, AbsoluteY, Adc, 4),
        (0x7D, AbsoluteX, Adc, 4),

        (0x21, IndirectX, And, 6),
        (0x25, ZeroPage, And, 3),
        (0x29, Immediate, And, 2),
        (0x2D, Absolute, And, 4),
        (0x31, IndirectY, And, 5),
        (0x32, IndirectZeroPage, And, 5),
        (0x35, ZeroPageX, And, 4),
        (0x39, AbsoluteY, And, 4),
        (0x3D, AbsoluteX, And, 4),

        (0x06, ZeroPage, Asl, 5),
        (0x0A, Accumulator, AslA, 2),
        (0x0E, Absolute, Asl, 6),
        (0x16, ZeroPageX, Asl, 6),
        (0x1E, AbsoluteX, Asl, 7),

        (0x0F, ZeroPage, Bbr(0), 4),
        (0x1F, ZeroPage, Bbr(1), 4),
        (0x2F, ZeroPage, Bbr(2), 4),
        (0x3F, ZeroPage, Bbr(3), 4),
        (0x4F, ZeroPage, Bbr(4), 4),
        (0x5F, ZeroPage, Bbr(5), 4),
        (0x6F, ZeroPage, Bbr(6), 4),
        (0x7F, ZeroPage, Bbr(7), 4),

        (0x8F, ZeroPage, Bbs(0), 4),
        (0x9F, ZeroPage, Bbs(1), 4),
        (0xAF, ZeroPage, Bbs(2), 4),
        (0xBF, ZeroPage, Bbs(3), 4),
        (0xCF, ZeroPage, Bbs(4), 4),
        (0xDF, ZeroPage, Bbs(5), 4),
        (0xEF, ZeroPage, Bbs(6), 4),
        (0xFF, ZeroPage, Bbs(7), 4),

        (0x90, Relative, Bcc, 2),

        (0xB0, Relative, Bcs, 2),

        (0xF0, Relative, Beq, 2),

        (0x24, ZeroPage, Bit, 3),
        (0x2C, Absolute, Bit, 4),
        (0x34, ZeroPageX, Bit, 4),
        (0x3C, AbsoluteX, Bit, 4),
        (0x89, Immediate, BitImmediate, 2),

        (0x30, Relative, Bmi, 2),

        (0xD0, Relative, Bne, 2),

        (0x10, Relative, Bpl, 2),

        (0x80, Relative, Bra, 3),

        (0x00, Implied, Brk, 7),

        (0x50, Relative, Bvc, 2),

        (0x70, Relative, Bvs, 2),

        (0x18, Implied, Clc, 2),

        (0xD8, Implied, Cld, 2),

        (0x58, Implied, Cli, 2),

        (0xB8, Implied, Clv, 2),

        (0xC1, IndirectX, Cmp, 6),
        (0xC5, ZeroPage, Cmp, 3),
        (0xC9, Immediate, Cmp, 2),
        (0xCD, Absolute, Cmp, 4),
        (0xD1, IndirectY, Cmp, 5),
        (0xD2, IndirectZeroPage, Cmp, 5),
        (0xD5, ZeroPageX, Cmp, 4),
        (0xD9, AbsoluteY, Cmp, 4),
        (0xDD, AbsoluteX, Cmp, 4),

        (0xE0, Immediate, Cpx, 2),
        (0xE4, ZeroPage, Cpx, 3),
        (0xEC, Absolute, Cpx, 4),

        (0xC0, Immediate, Cpy, 2),
        (0xC4, ZeroPage, Cpy, 3),
        (0xCC, Absolute, Cpy, 4),

        (0x3A, Accumulator, DecA, 2),
        (0xC6, ZeroPage, Dec, 5),
        (0xCE, Absolute, Dec, 6),
        (0xD6, ZeroPageX, Dec, 6),
        (0xDE, AbsoluteX, Dec, 7),

        (0xCA, Implied, Dex, 2),

        (0x88, Implied, Dey, 2),

        (0x41, IndirectX, Eor, 6),
        (0x45, ZeroPage, Eor, 3),
        (0x49, Immediate, Eor, 2),
        (0x4D, Absolute, Eor, 4),
        (0x51, IndirectY, Eor, 5),
        (0x52, IndirectZeroPage, Eor, 5),
        (0x55, ZeroPageX, Eor, 4),
        (0x59, AbsoluteY, Eor, 4),
        (0x5D, AbsoluteX, Eor, 4),

        (0x1A, Accumulator, IncA, 2),
        (0xE6, ZeroPage, Inc, 5),
        (0xEE, Absolute, Inc, 6),
        (0xF6, ZeroPageX, Inc, 6),
        (0xFE, AbsoluteX, Inc, 7),

        (0xE8, Implied, Inx, 2),

        (0xC8, Implied, Iny, 2),

        (0x4C, Absolute, Jmp, 3),
        (0x6C, Indirect, Jmp, 6),
        (0x7C, IndirectAbsoluteX, Jmp, 6),

        (0x20, Absolute, Jsr, 6),

        (0xA1, IndirectX, Lda, 6),
        (0xA5, ZeroPage, Lda, 3),
        (0xA9, Immediate, Lda, 2),
        (0xAD, Absolute, Lda, 4),
        (0xB1, IndirectY, Lda, 5),
        (0xB2, IndirectZeroPage, Lda, 5),
        (0xB5, ZeroPageX, Lda, 4),
        (0xB9, AbsoluteY, Lda, 4),
        (0xBD, AbsoluteX, Lda, 4),

        (0xA2, Immediate, Ldx, 2),
        (0xA6, ZeroPage, Ldx, 3),
        (0xAE, Absolute, Ldx, 4),
        (0xB6, ZeroPageY, Ldx, 4),
        (0xBE, AbsoluteY, Ldx, 4),

        (0xA0, Immediate, Ldy, 2),
        (0xA4, ZeroPage, Ldy, 3),
        (0xAC, Absolute, Ldy, 4),
        (0xB4, ZeroPageX, Ldy, 4),
        (0xBC, AbsoluteX, Ldy, 4),

        (0x46, ZeroPage, Lsr, 5),
        (0x4A, Accumulator, LsrA, 2),
        (0x4E, Absolute, Lsr, 6),
        (0x56, ZeroPageX, Lsr, 6),
        (0x5E, AbsoluteX, Lsr, 7),

        (0xEA, Implied, Nop, 2),

        (0x01, IndirectX, Ora, 6),
        (0x05, ZeroPage, Ora, 3),
        (0x09, Immediate, Ora, 2),
        (0x0D, Absolute, Ora, 4),
        (0x11, IndirectY, Ora, 5),
        (0x12, IndirectZeroPage, Ora, 5),
        (0x15, ZeroPageX, Ora, 4),
        (0x19, AbsoluteY, Ora, 4),
        (0x1D, AbsoluteX, Ora, 4),

        (0x48, Implied, Pha, 3),

        (0x08, Implied, Php, 3),

        (0xDA, Implied, Phx, 3),

        (0x5A, Implied, Phy, 3),

        (0x68, Implied, Pla, 4),

        (0x28, Implied, Plp, 4),

        (0xFA, Implied, Plx, 4),

        (0x7A, Implied, Ply, 4),

        (0x07, ZeroPage, Rmb(0), 5),
        (0x17, ZeroPage, Rmb(1), 5),
        (0x27, ZeroPage, Rmb(2), 5),
        (0x37, ZeroPage, Rmb(3), 5),
        (0x47, ZeroPage, Rmb(4), 5),
        (0x57, ZeroPage, Rmb(5), 5),
        (0x67, ZeroPage, Rmb(6), 5),
        (0x77, ZeroPage, Rmb(7), 5),

        (0x26, ZeroPage, Rol, 5),
        (0x2A, Accumulator, RolA, 2),
        (0x2E, Absolute, Rol, 6),
        (0x36, ZeroPageX, Rol, 6),
        (0x3E, AbsoluteX, Rol, 7),

        (0x66, ZeroPage, Ror, 5),
        (0x6A, Accumulator, RorA, 2),
        (0x6E, Absolute, Ror, 6),
        (0x76, ZeroPageX, Ror, 6),
        (0x7E, AbsoluteX, Ror, 7),

        (0x40, Implied, Rti, 6),

        (0x60, Implied, Rts, 6),

        (0xE1, IndirectX, Sbc, 6),
        (0xE5, ZeroPage, Sbc, 3),
        (0xE9, Immediate, Sbc, 2),
        (0xED, Absolute, Sbc, 4),
        (0xF1, IndirectY, Sbc, 5),
        (0xF2, IndirectZeroPage, Sbc, 5),
        (0xF5, ZeroPageX, Sbc, 4),
        (0xF9, AbsoluteY, Sbc, 4),
        (0xFD, AbsoluteX, Sbc, 4),

        (0x38, Implied, Sec, 2),

        (0xF8, Implied, Sed, 2),

        (0x78, Implied, Sei, 2),

        (0x87, ZeroPage, Smb(0), 5),
        (0x97, ZeroPage, Smb(1), 5),
        (0xA7, ZeroPage, Smb(2), 5),
        (0xB7, ZeroPage, Smb(3), 5),
        (0xC7, ZeroPage, Smb(4), 5),
        (0xD7, ZeroPage, Smb(5), 5),
        (0xE7, ZeroPage, Smb(6), 5),
        (0xF7, ZeroPage, Smb(7), 5),

        (0x81, IndirectX, Sta, 6),
        (0x85, ZeroPage, Sta, 3),
        (0x8D, Absolute, Sta, 4),
        (0x91, IndirectY, Sta, 6),
        (0x92, IndirectZeroPage, Sta, 6),
        (0x95, ZeroPageX, Sta, 4),
        (0x99, AbsoluteY, Sta, 5),
        (0x9D, AbsoluteX, Sta, 6),

        (0xDB, Implied, Stp, 2),

        (0x86, ZeroPage, Stx, 3),
        (0x8E, Absolute, Stx, 4),
        (0x96, ZeroPageY, Stx, 4),

        (0x84, ZeroPage, Sty, 3),
        (0x8C, Absolute, Sty, 4),
        (0x94, ZeroPageX, Sty, 4),

        (0x64, ZeroPage, Stz, 4),
        (0x74, ZeroPageX, Stz, 5),
        (0x9C, Absolute, Stz, 5),
        (0x9E, AbsoluteX, Stz, 6),

        (0xAA, Implied, Tax, 2),

        (0xA8, Implied, Tay, 2),

        (0x14, ZeroPage, Trb, 5),
        (0x1C, Absolute, Trb, 6),

        (0x04, ZeroPage, Tsb, 5),
        (0x0C, Absolute, Tsb, 6),

        (0xBA, Implied, Tsx, 2),

        (0x8A, Implied, Txa, 2),

        (0x9A, Implied, Txs, 2),

        (0x98, Implied, Tya, 2),

        (0xCB, Implied, Wai, 5),
    ];
}
