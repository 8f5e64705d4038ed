//! Device-bound key derivation and device code encrypt/decrypt.

use crate::cipher::MangleKey;
use crate::error::{CryptoError, Result};
use crate::tables::HARDCODED_MANGLE_TABLE;

/// Three 32-bit words identifying a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId(pub [u32; 3]);

impl DeviceId {
    /// Build a device id from its three words.
    #[must_use]
    pub fn new(d0: u32, d1: u32, d2: u32) -> Self {
        Self([d0, d1, d2])
    }
}

/// Derive the offset-6 device mangle key: `d0^K0 | d1^K1 | d2^K2 | K3`,
/// where `K` is the outer table's round-keys at `offset`.
#[must_use]
pub fn device_mangle_key_offset_6(device_id: DeviceId, offset: u32) -> MangleKey {
    let outer = HARDCODED_MANGLE_TABLE[(offset as usize) % HARDCODED_MANGLE_TABLE.len()];
    let [d0, d1, d2] = device_id.0;
    MangleKey::from_round_keys([
        d0 ^ outer.round_key(0),
        d1 ^ outer.round_key(1),
        d2 ^ outer.round_key(2),
        outer.round_key(3),
    ])
}

/// Derive the offset-0 device mangle key: same as offset-6, but the last
/// word is `(!d0)^K3`.
#[must_use]
pub fn device_mangle_key_offset_0(device_id: DeviceId, offset: u32) -> MangleKey {
    let outer = HARDCODED_MANGLE_TABLE[(offset as usize) % HARDCODED_MANGLE_TABLE.len()];
    let [d0, d1, d2] = device_id.0;
    MangleKey::from_round_keys([
        d0 ^ outer.round_key(0),
        d1 ^ outer.round_key(1),
        d2 ^ outer.round_key(2),
        (!d0) ^ outer.round_key(3),
    ])
}

/// Decrypt a device code blob (length a positive multiple of 8) using the
/// offset-0 device key derivation, ECB over the mangle cipher.
pub fn decrypt_device_code(device_id: DeviceId, offset: u32, code: &mut [u8]) -> Result<()> {
    if code.is_empty() || code.len() % 8 != 0 {
        return Err(CryptoError::alignment_violation(code.len()));
    }
    let key = device_mangle_key_offset_0(device_id, offset);
    key.decrypt(code)
}

/// Encrypt a device code blob (length a positive multiple of 8) using the
/// offset-0 device key derivation, ECB over the mangle cipher.
pub fn encrypt_device_code(device_id: DeviceId, offset: u32, code: &mut [u8]) -> Result<()> {
    if code.is_empty() || code.len() % 8 != 0 {
        return Err(CryptoError::alignment_violation(code.len()));
    }
    let key = device_mangle_key_offset_0(device_id, offset);
    key.encrypt(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::OUTER_MANGLE_KEY_OFFSET_DEFAULT;

    const TEST_DEVICE_ID: DeviceId = DeviceId([0x003B_0056, 0x4D4B_5002, 0x2032_3455]);

    #[test]
    fn offset_0_and_offset_6_derivations_differ() {
        let k0 = device_mangle_key_offset_0(TEST_DEVICE_ID, OUTER_MANGLE_KEY_OFFSET_DEFAULT);
        let k6 = device_mangle_key_offset_6(TEST_DEVICE_ID, OUTER_MANGLE_KEY_OFFSET_DEFAULT);
        assert_ne!(k0, k6);
    }

    #[test]
    fn device_code_round_trips() {
        let mut code = vec![0x11u8, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0, 0, 0, 0, 0, 0, 0, 1];
        let original = code.clone();

        encrypt_device_code(TEST_DEVICE_ID, OUTER_MANGLE_KEY_OFFSET_DEFAULT, &mut code).unwrap();
        assert_ne!(code, original);

        decrypt_device_code(TEST_DEVICE_ID, OUTER_MANGLE_KEY_OFFSET_DEFAULT, &mut code).unwrap();
        assert_eq!(code, original);
    }

    #[test]
    fn different_device_ids_derive_different_keys() {
        let other = DeviceId([0, 0, 0]);
        let a = device_mangle_key_offset_0(TEST_DEVICE_ID, OUTER_MANGLE_KEY_OFFSET_DEFAULT);
        let b = device_mangle_key_offset_0(other, OUTER_MANGLE_KEY_OFFSET_DEFAULT);
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_misaligned_code_length() {
        let mut code = vec![0u8; 5];
        assert!(decrypt_device_code(TEST_DEVICE_ID, OUTER_MANGLE_KEY_OFFSET_DEFAULT, &mut code).is_err());
    }
}
