//! Status register bits and halt-state bits.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flag {
    Carry = 0b0000_0001,
    Zero = 0b0000_0010,
    IrqDisable = 0b0000_0100,
    Decimal = 0b0000_1000,
    Break = 0b0001_0000,
    Constant = 0b0010_0000,
    Overflow = 0b0100_0000,
    Negative = 0b1000_0000,
}

impl Flag {
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

/// Bits every externally written status value is forced to carry.
pub const FORCED: u8 = Flag::Constant as u8 | Flag::Break as u8;

/// Set by STP. Only `reset` clears it.
pub const HALT_STOPPED: u8 = 0b01;
/// Set by WAI. The next IRQ or NMI clears it.
pub const HALT_WAITING: u8 = 0b10;
