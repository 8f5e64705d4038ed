//! Error type shared by the buffer, CRC, and bitstream primitives.
//!
//! Higher crates (`phyton-crypto`, `phyton-lzss`, `phyton-firmware`) wrap
//! this with `#[from]` rather than redefining end-of-input handling.

use std::io;
use thiserror::Error;

/// Errors produced by [`crate::buffer::ByteReader`] and the bitstream types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// I/O error from the underlying reader or writer backing a bitstream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Requested more bytes than remain in the buffer.
    #[error("unexpected end of input: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        /// Number of bytes the read operation required.
        needed: usize,
        /// Number of bytes actually left in the buffer.
        available: usize,
    },

    /// Requested more bits than remain in the bit reader.
    #[error("unexpected end of bitstream: needed {needed} bits, {available} available")]
    UnexpectedEndOfBits {
        /// Number of bits the read operation required.
        needed: u32,
        /// Number of bits actually left in the reader.
        available: u32,
    },
}

/// Result type alias for `phyton-core` operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Build a [`CoreError::UnexpectedEof`].
    pub fn unexpected_eof(needed: usize, available: usize) -> Self {
        Self::UnexpectedEof { needed, available }
    }

    /// Build a [`CoreError::UnexpectedEndOfBits`].
    pub fn unexpected_end_of_bits(needed: u32, available: u32) -> Self {
        Self::UnexpectedEndOfBits { needed, available }
    }
}
