//! Error types for the edges of the emulator.
//!
//! Instruction execution itself never fails; these cover loading images into
//! a bus and parsing host-supplied settings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("image of {len} bytes at {origin:#06x} runs past the end of the address space")]
    ImageTooLarge { origin: u16, len: usize },

    #[error("unknown run mode: {0} (expected `cycles` or `instructions`)")]
    InvalidRunMode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used by the fallible helpers in this crate.
pub type Result<T> = std::result::Result<T, Error>;
