//! # Memory Bus
//!
//! The core talks to the outside world only through [`Bus`]: one byte read and
//! one byte write per 16-bit address. Vectors at 0xFFFA-0xFFFF and the stack
//! page at 0x0100-0x01FF go through the same two calls.

use crate::error::{Error, Result};

/// Byte-wide access to the 64 KiB address space.
///
/// Reads take `&mut self` because memory-mapped peripherals often change
/// state when read (status registers, FIFOs). Neither call can fail: whatever
/// an unmapped address returns is the implementation's business.
pub trait Bus {
    fn read(&mut self, address: u16) -> u8;
    fn write(&mut self, address: u16, value: u8);

    /// Little-endian word at `address`, high byte from `address + 1`.
    fn read_word(&mut self, address: u16) -> u16 {
        let lo = self.read(address) as u16;
        let hi = self.read(address.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}

impl<B: Bus + ?Sized> Bus for &mut B {
    fn read(&mut self, address: u16) -> u8 {
        (**self).read(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        (**self).write(address, value)
    }
}

impl<B: Bus + ?Sized> Bus for Box<B> {
    fn read(&mut self, address: u16) -> u8 {
        (**self).read(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        (**self).write(address, value)
    }
}

/// Flat 64 KiB of RAM covering the whole address space.
pub struct Ram {
    data: Box<[u8]>,
}

impl Ram {
    pub const SIZE: usize = 0x1_0000;

    pub fn new() -> Self {
        Ram {
            data: vec![0; Self::SIZE].into_boxed_slice(),
        }
    }

    /// Copies `image` into memory starting at `origin`.
    ///
    /// Fails without writing anything if the image would run past 0xFFFF.
    pub fn load(&mut self, origin: u16, image: &[u8]) -> Result<()> {
        let start = origin as usize;
        let end = start + image.len();
        if end > Self::SIZE {
            return Err(Error::ImageTooLarge {
                origin,
                len: image.len(),
            });
        }
        self.data[start..end].copy_from_slice(image);
        log::debug!("loaded {} bytes at ${:04X}", image.len(), origin);
        Ok(())
    }

    /// Writes `target` little-endian at `address` (one of the 0xFFFA/0xFFFC/0xFFFE vectors).
    pub fn set_vector(&mut self, address: u16, target: u16) {
        self.poke(address, target as u8);
        self.poke(address.wrapping_add(1), (target >> 8) as u8);
    }

    pub fn peek(&self, address: u16) -> u8 {
        self.data[address as usize]
    }

    pub fn poke(&mut self, address: u16, value: u8) {
        self.data[address as usize] = value;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Ram {
    fn read(&mut self, address: u16) -> u8 {
        self.peek(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.poke(address, value);
    }
}

/// A bus made of two host-supplied closures.
///
/// ```
/// use std::cell::RefCell;
/// use w65c02_core::{Bus, CallbackBus};
///
/// let memory = RefCell::new([0u8; 0x10000]);
/// let mut bus = CallbackBus::new(
///     |address| memory.borrow()[address as usize],
///     |address, value| memory.borrow_mut()[address as usize] = value,
/// );
/// bus.write(0x1234, 0x42);
/// assert_eq!(bus.read(0x1234), 0x42);
/// ```
pub struct CallbackBus<R, W> {
    read: R,
    write: W,
}

impl<R, W> CallbackBus<R, W>
where
    R: FnMut(u16) -> u8,
    W: FnMut(u16, u8),
{
    pub fn new(read: R, write: W) -> Self {
        CallbackBus { read, write }
    }
}

impl<R, W> Bus for CallbackBus<R, W>
where
    R: FnMut(u16) -> u8,
    W: FnMut(u16, u8),
{
    fn read(&mut self, address: u16) -> u8 {
        (self.read)(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        (self.write)(address, value)
    }
}
