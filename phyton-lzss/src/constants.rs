//! Fixed sizing constants for the device's LZSS-variant codec.

/// Maximum input and output size for a single compress/decompress call.
pub const DATA_MAX_SIZE: usize = 0x8000;

/// Bit width of a literal token's payload.
pub const LITERAL_BITS: u32 = 8;

/// Bit width of a reference token's offset field.
pub const OFFSET_BITS: u32 = 11;

/// Bit width of a reference token's length field (stored as `length - 2`).
pub const LENGTH_BITS: u32 = 4;

/// Sliding window size, `1 << OFFSET_BITS`.
pub const WINDOW_SIZE: usize = 1 << OFFSET_BITS as usize;

/// Minimum match length a reference token is allowed to encode; shorter
/// matches are emitted as literals instead.
pub const MAX_UNCODED: usize = 2;

/// Maximum match length a reference token can encode: `2 + (1 << LENGTH_BITS)`.
pub const MAX_CODED: usize = MAX_UNCODED + (1 << LENGTH_BITS as usize);

/// Byte value used to pre-fill the unused portion of a fresh window.
pub const WINDOW_FILL_VALUE: u8 = 0x20;

/// Initial writer index into the window: `WINDOW_SIZE - 0x10 - 1`.
pub const WINDOW_INITIAL_INDEX: usize = WINDOW_SIZE - 0x10 - 1;
