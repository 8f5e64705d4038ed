//! Decoder for `RD_FLASH_AREA` command responses.

use crate::error::{FirmwareError, FlashStatus, Result};
use phyton_core::buffer::ByteReader;
use phyton_crypto::lcg::BorlandRand;

/// Signature expected at the start of an unveiled flash area payload.
pub const PUBLIC_SIGNATURE: u32 = 0x1960_1217;

/// A decoded `RD_FLASH_AREA` response: the unveiled payload, ready for the
/// caller to interpret as a typed structure.
#[derive(Debug, Clone)]
pub struct FlashArea {
    /// The unveiled payload bytes, with the 8-byte signature/length prefix
    /// already stripped.
    pub payload: Vec<u8>,
}

/// Decode a raw `RD_FLASH_AREA` response: validate the status, unveil the
/// size and payload with the device-chosen LCG seed, then validate the
/// unveiled signature and declared length.
pub fn decode_flash_area(data: &[u8]) -> Result<FlashArea> {
    let mut reader = ByteReader::new(data);

    let status = reader.read_u32_le()?;
    if status != 0 {
        return Err(FirmwareError::InvalidFlashStatus {
            code: status,
            status: FlashStatus::from(status),
        });
    }

    let random_seed = reader.read_u32_le()?;
    let mut rng = BorlandRand::new(random_seed);

    let encrypted_size = reader.read_u32_le()?;
    let size = rng.xor_u32(encrypted_size);

    let mut payload = reader.read_bytes(size as usize)?.to_vec();
    rng.xor_in_place(&mut payload);

    let mut inner = ByteReader::new(&payload);
    let public_signature = inner.read_u32_le()?;
    if public_signature != PUBLIC_SIGNATURE {
        return Err(FirmwareError::InvalidPublicSignature(public_signature));
    }

    let struct_len = inner.read_u32_le()?;
    let expected = payload.len() as u32;
    if struct_len != expected {
        return Err(FirmwareError::InvalidStructLength {
            expected,
            declared: struct_len,
        });
    }

    let remainder = inner.rest().to_vec();
    Ok(FlashArea { payload: remainder })
}
