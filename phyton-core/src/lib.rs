//! # phyton-core
//!
//! Shared primitives for the Phyton/AlmaCode firmware container toolkit:
//!
//! - [`buffer`]: sequential byte reader for wire/container formats
//! - [`bitstream`]: MSB-first bit-level I/O for the LZSS-variant codec
//! - [`crc`]: the MPEG-2-style unreflected CRC-32 used throughout
//! - [`error`]: shared error type
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ phyton-firmware: container parsing, flash area decode   │
//! ├─────────────────────────────────────────────────────────┤
//! │ phyton-lzss: LZSS-variant codec (bitstream + window)    │
//! │ phyton-crypto: mangle cipher, key material, bruteforce  │
//! ├─────────────────────────────────────────────────────────┤
//! │ phyton-core (this crate): buffer, CRC, bitstream        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use phyton_core::bitstream::{BitReader, BitWriter};
//! use phyton_core::crc::checksum;
//! use std::io::Cursor;
//!
//! let data = vec![0xAB, 0xCD];
//! let mut reader = BitReader::new(Cursor::new(data));
//! let bits = reader.read_bits(12).unwrap();
//! assert_eq!(bits, 0xABC);
//!
//! assert_eq!(checksum(b""), 0xFFFF_FFFF);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod buffer;
pub mod crc;
pub mod error;

pub use bitstream::{BitReader, BitWriter};
pub use buffer::ByteReader;
pub use crc::{Crc32, checksum};
pub use error::{CoreError, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitReader, BitWriter};
    pub use crate::buffer::ByteReader;
    pub use crate::crc::{Crc32, checksum};
    pub use crate::error::{CoreError, Result};
}
