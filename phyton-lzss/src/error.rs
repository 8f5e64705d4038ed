//! Error type for the LZSS-variant codec.

use thiserror::Error;

/// Errors produced by [`crate::codec::compress`] and [`crate::codec::decompress`].
#[derive(Debug, Error)]
pub enum LzssError {
    /// I/O error from the underlying bitstream reader/writer.
    #[error(transparent)]
    Core(#[from] phyton_core::CoreError),

    /// Input exceeds [`crate::constants::DATA_MAX_SIZE`].
    #[error("out of bounds input: {len} bytes exceeds the {limit} byte cap")]
    OutOfBoundsInput {
        /// The offending input length.
        len: usize,
        /// The configured cap.
        limit: usize,
    },

    /// Decompressed output would exceed [`crate::constants::DATA_MAX_SIZE`].
    #[error("out of bounds output: decompression exceeded the {limit} byte cap")]
    OutOfBoundsOutput {
        /// The configured cap.
        limit: usize,
    },
}

/// Result type alias for `phyton-lzss` operations.
pub type Result<T> = std::result::Result<T, LzssError>;
