//! # W65C02 Core
//!
//! Instruction-level emulator for the WDC 65C02. The host supplies memory
//! through [`Bus`], calls [`Cpu::reset`], then drives [`Cpu::run`] and raises
//! [`Cpu::irq`]/[`Cpu::nmi`] between runs.
//!
//! ```
//! use w65c02_core::{Cpu, Ram, RunMode};
//!
//! let mut ram = Ram::new();
//! // LDA #$2A; STA $10; STP
//! ram.load(0x0200, &[0xA9, 0x2A, 0x85, 0x10, 0xDB]).unwrap();
//! ram.set_vector(0xFFFC, 0x0200);
//!
//! let mut cpu = Cpu::new(ram);
//! cpu.reset();
//! let mut cycles = 0;
//! cpu.run(100, &mut cycles, RunMode::CycleCount);
//!
//! assert!(cpu.is_stopped());
//! assert_eq!(cpu.bus().peek(0x10), 0x2A);
//! assert_eq!(cycles, 2 + 3 + 2);
//! ```

pub mod addressing;
pub mod bus;
pub mod cpu;
pub mod error;
pub mod flags;
mod instructions;
pub mod opcodes;

pub use addressing::Mode;
pub use bus::{Bus, CallbackBus, Ram};
pub use cpu::{Cpu, ResetDefaults, RunMode, IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR};
pub use error::{Error, Result};
pub use flags::Flag;
pub use opcodes::{decode, Instruction, Op, INSTRUCTIONS};
