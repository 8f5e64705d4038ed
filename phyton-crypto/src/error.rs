//! Error type for cipher, key material, and bruteforce operations.

use thiserror::Error;

/// Errors produced by the mangle cipher, encrypted block, device key, and
/// bruteforce operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Propagated from a buffer read underneath an encrypted block operation.
    #[error(transparent)]
    Core(#[from] phyton_core::CoreError),

    /// `mangle_index` was not in `{0..7, 8..15, 0xFFFF}`.
    #[error("invalid key number: {mangle_index:#06x}")]
    InvalidKeyNumber {
        /// The out-of-range mangle index read from the block.
        mangle_index: u32,
    },

    /// `mangle_index == 0xFFFF` but no device key was supplied in the key material.
    #[error("unsupported device key: mangle_index requested a device key but none was provided")]
    UnsupportedDeviceKey,

    /// `CRC1 != CRC2` after decrypting a block's key header.
    #[error("invalid CRC pair: CRC1 {crc1:#010x} != CRC2 {crc2:#010x}")]
    InvalidCrcPair {
        /// CRC stored at `EncryptedBlockCRC1Offset`.
        crc1: u32,
        /// CRC stored at `EncryptedBlockCRC2Offset`.
        crc2: u32,
    },

    /// `verify_crc` was requested and the payload's CRC did not match `CRC1`.
    #[error("data CRC not matching: expected {expected:#010x}, computed {computed:#010x}")]
    DataCrcMismatch {
        /// The expected CRC read from the block.
        expected: u32,
        /// The CRC recomputed from the decrypted payload.
        computed: u32,
    },

    /// A bruteforce fingerprint check rejected the candidate key region.
    #[error("not a borland rand seed")]
    NotABorlandSeed,

    /// `EncryptedBlock::encrypt` was called with key material carrying no
    /// generator (required to fill the key block and pick a mangle index).
    #[error("missing key generator: encrypt requires KeyMaterial::generator to be set")]
    MissingGenerator,

    /// A payload length precondition (multiple of 8) was violated.
    #[error("alignment violation: length {len} is not a multiple of 8")]
    AlignmentViolation {
        /// The offending length.
        len: usize,
    },
}

/// Result type alias for `phyton-crypto` operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

impl CryptoError {
    /// Build a [`CryptoError::InvalidKeyNumber`].
    pub fn invalid_key_number(mangle_index: u32) -> Self {
        Self::InvalidKeyNumber { mangle_index }
    }

    /// Build a [`CryptoError::InvalidCrcPair`].
    pub fn invalid_crc_pair(crc1: u32, crc2: u32) -> Self {
        Self::InvalidCrcPair { crc1, crc2 }
    }

    /// Build a [`CryptoError::DataCrcMismatch`].
    pub fn data_crc_mismatch(expected: u32, computed: u32) -> Self {
        Self::DataCrcMismatch { expected, computed }
    }

    /// Build a [`CryptoError::AlignmentViolation`].
    pub fn alignment_violation(len: usize) -> Self {
        Self::AlignmentViolation { len }
    }
}
