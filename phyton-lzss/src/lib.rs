//! # phyton-lzss
//!
//! The fixed 2048-byte-window LZSS variant used by Phyton/AlmaCode firmware
//! blocks: no Huffman stage, a single hardcoded window size, and MSB-first
//! bit packing.
//!
//! - [`constants`]: window size, code widths, and the firmware's size cap
//! - [`window`]: the sliding window and its match search
//! - [`codec`]: [`codec::compress`] / [`codec::decompress`]
//! - [`error`]: shared error type
//!
//! ## Example
//!
//! ```rust
//! use phyton_lzss::codec::{compress, decompress};
//!
//! let data = b"hello hello hello hello".to_vec();
//! let compressed = compress(&data, false).unwrap();
//! let decompressed = decompress(&compressed).unwrap();
//! assert_eq!(decompressed, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod constants;
pub mod error;
pub mod window;

pub use codec::{compress, decompress};
pub use error::{LzssError, Result};
pub use window::Window;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::codec::{compress, decompress};
    pub use crate::error::{LzssError, Result};
}
