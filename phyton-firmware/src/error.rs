//! Error type for firmware container and flash area parsing.

use thiserror::Error;

/// Errors produced while parsing a firmware container or a flash area
/// response.
#[derive(Debug, Error)]
pub enum FirmwareError {
    /// Propagated from a buffer read.
    #[error(transparent)]
    Core(#[from] phyton_core::CoreError),

    /// Propagated from block decrypt/encrypt.
    #[error(transparent)]
    Crypto(#[from] phyton_crypto::CryptoError),

    /// Propagated from LZSS compress/decompress.
    #[error(transparent)]
    Lzss(#[from] phyton_lzss::LzssError),

    /// The container's 8-byte marker was neither `"Phyton\0\0"` nor `"AlmaCode"`.
    #[error("unsupported header: marker {marker:?} is not a recognized container type")]
    UnsupportedHeader {
        /// The raw marker bytes read from the container.
        marker: [u8; 8],
    },

    /// A `RD_FLASH_AREA` response carried a non-zero status code.
    #[error("invalid flash status: {status:?} ({code})")]
    InvalidFlashStatus {
        /// The raw status code.
        code: u32,
        /// The decoded status, if recognized.
        status: FlashStatus,
    },

    /// The unveiled flash area payload's signature did not match
    /// `0x19601217`.
    #[error("invalid public signature: expected 0x19601217, got {0:#010x}")]
    InvalidPublicSignature(u32),

    /// The unveiled flash area payload's declared length did not match the
    /// observed payload length plus 8.
    #[error("invalid struct length: expected {expected}, declared {declared}")]
    InvalidStructLength {
        /// `payload_len + 8`.
        expected: u32,
        /// The value read from the payload.
        declared: u32,
    },
}

/// Result type alias for `phyton-firmware` operations.
pub type Result<T> = std::result::Result<T, FirmwareError>;

/// Stable integer status codes reported by `RD_FLASH_AREA` responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum FlashStatus {
    /// Operation succeeded.
    Ok = 0,
    /// Invalid address.
    InvAddr = 1,
    /// Write-protected region.
    WrProt = 2,
    /// Region is not blank.
    NotBlank = 3,
    /// Verification failed.
    Verify = 4,
    /// Erase failed.
    Erase = 5,
    /// Programming failed.
    Prog = 6,
    /// Initialization error.
    InitEr = 7,
    /// Signature error.
    SignEr = 8,
    /// CRC did not match.
    InvalidCrc = 9,
    /// Key number out of range.
    InvalidKeyNumb = 10,
    /// Signature invalid.
    InvalidSign = 11,
    /// Area name invalid.
    InvalidAreaName = 12,
    /// Target invalid.
    InvalidTarget = 13,
    /// Readout protection error.
    RdpErr = 14,
    /// A code outside the known enumeration.
    Unknown = u32::MAX,
}

impl From<u32> for FlashStatus {
    fn from(code: u32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::InvAddr,
            2 => Self::WrProt,
            3 => Self::NotBlank,
            4 => Self::Verify,
            5 => Self::Erase,
            6 => Self::Prog,
            7 => Self::InitEr,
            8 => Self::SignEr,
            9 => Self::InvalidCrc,
            10 => Self::InvalidKeyNumb,
            11 => Self::InvalidSign,
            12 => Self::InvalidAreaName,
            13 => Self::InvalidTarget,
            14 => Self::RdpErr,
            _ => Self::Unknown,
        }
    }
}
