//! The mangle cipher: a Feistel-variant block cipher over 64-bit blocks
//! with a 128-bit key split into four 32-bit round sub-keys.
//!
//! # Example
//!
//! ```rust
//! use phyton_crypto::cipher::MangleKey;
//!
//! let key = MangleKey::new([0u8; 16]);
//! let mut block = [1u8, 2, 3, 4, 5, 6, 7, 8];
//! key.encrypt_block(&mut block);
//! key.decrypt_block(&mut block);
//! assert_eq!(block, [1, 2, 3, 4, 5, 6, 7, 8]);
//! ```

use crate::error::{CryptoError, Result};

/// Number of Feistel rounds applied per 64-bit block.
pub const MANGLE_KEY_ROUNDS: u32 = 16;

/// A 128-bit mangle key, held as four little-endian 32-bit round sub-keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MangleKey {
    round_keys: [u32; 4],
}

impl MangleKey {
    /// Build a key from its raw 16-byte representation.
    #[must_use]
    pub fn new(bytes: [u8; 16]) -> Self {
        let mut round_keys = [0u32; 4];
        for (i, chunk) in bytes.chunks_exact(4).enumerate() {
            round_keys[i] = u32::from_le_bytes(chunk.try_into().unwrap());
        }
        Self { round_keys }
    }

    /// Build a key from four round sub-keys directly.
    #[must_use]
    pub const fn from_round_keys(round_keys: [u32; 4]) -> Self {
        Self { round_keys }
    }

    /// The round sub-key at index `i` (taken mod 4).
    #[must_use]
    pub fn round_key(&self, i: usize) -> u32 {
        self.round_keys[i % 4]
    }

    /// Raw 16-byte little-endian representation.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        for (i, k) in self.round_keys.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&k.to_le_bytes());
        }
        out
    }

    /// Encrypt one 8-byte block in place.
    pub fn encrypt_block(&self, block: &mut [u8; 8]) {
        let (mut a, mut b) = split(block);
        for r in 0..MANGLE_KEY_ROUNDS {
            let k = self.round_key(r as usize);
            let a_next = a
                .wrapping_add(b)
                .wrapping_add(mix(b))
                .wrapping_add(k)
                .wrapping_add(r);
            a = b;
            b = a_next;
        }
        join(block, a, b);
    }

    /// Decrypt one 8-byte block in place. The exact inverse of
    /// [`MangleKey::encrypt_block`]: each round undoes the swap-and-add by
    /// reconstructing the pre-round `A` from the post-round `(A, B)` pair.
    pub fn decrypt_block(&self, block: &mut [u8; 8]) {
        let (mut a, mut b) = split(block);
        for r in (0..MANGLE_KEY_ROUNDS).rev() {
            let k = self.round_key(r as usize);
            let a_prev = b
                .wrapping_sub(a)
                .wrapping_sub(mix(a))
                .wrapping_sub(k)
                .wrapping_sub(r);
            b = a;
            a = a_prev;
        }
        join(block, a, b);
    }

    /// Encrypt `buf` in place. `buf.len()` must be a positive multiple of 8.
    pub fn encrypt(&self, buf: &mut [u8]) -> Result<()> {
        for chunk in aligned_chunks_mut(buf)? {
            self.encrypt_block(chunk);
        }
        Ok(())
    }

    /// Decrypt `buf` in place. `buf.len()` must be a positive multiple of 8.
    pub fn decrypt(&self, buf: &mut [u8]) -> Result<()> {
        for chunk in aligned_chunks_mut(buf)? {
            self.decrypt_block(chunk);
        }
        Ok(())
    }
}

/// The round mixing function applied to the high half: `(b >> 8) ^ (b << 6)`.
fn mix(b: u32) -> u32 {
    (b >> 8) ^ (b << 6)
}

fn split(block: &[u8; 8]) -> (u32, u32) {
    let a = u32::from_le_bytes(block[0..4].try_into().unwrap());
    let b = u32::from_le_bytes(block[4..8].try_into().unwrap());
    (a, b)
}

fn join(block: &mut [u8; 8], a: u32, b: u32) {
    block[0..4].copy_from_slice(&a.to_le_bytes());
    block[4..8].copy_from_slice(&b.to_le_bytes());
}

fn aligned_chunks_mut(buf: &mut [u8]) -> Result<std::slice::ChunksExactMut<'_, u8>> {
    if buf.is_empty() || buf.len() % 8 != 0 {
        return Err(CryptoError::alignment_violation(buf.len()));
    }
    Ok(buf.chunks_exact_mut(8))
}

/// Variant of [`MangleKey::encrypt_block`]/[`decrypt_block`] that operates
/// directly on `&mut [u8]` 8-byte slices rather than fixed arrays, for
/// callers (block envelope, device codes) that hold a larger buffer.
impl MangleKey {
    /// Encrypt an 8-byte slice in place.
    pub fn encrypt_block_slice(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), 8);
        let mut tmp: [u8; 8] = block.try_into().unwrap();
        self.encrypt_block(&mut tmp);
        block.copy_from_slice(&tmp);
    }

    /// Decrypt an 8-byte slice in place.
    pub fn decrypt_block_slice(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), 8);
        let mut tmp: [u8; 8] = block.try_into().unwrap();
        self.decrypt_block(&mut tmp);
        block.copy_from_slice(&tmp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_single_block() {
        let key = MangleKey::new(*b"0123456789abcdef");
        let original = [10u8, 20, 30, 40, 50, 60, 70, 80];
        let mut block = original;
        key.encrypt_block(&mut block);
        assert_ne!(block, original);
        key.decrypt_block(&mut block);
        assert_eq!(block, original);
    }

    #[test]
    fn round_trip_bulk_buffer() {
        let key = MangleKey::new([0xAAu8; 16]);
        let original: Vec<u8> = (0u8..=255).collect::<Vec<_>>()[..64].to_vec();
        let mut buf = original.clone();
        key.encrypt(&mut buf).unwrap();
        assert_ne!(buf, original);
        key.decrypt(&mut buf).unwrap();
        assert_eq!(buf, original);
    }

    #[test]
    fn rejects_misaligned_buffers() {
        let key = MangleKey::new([0u8; 16]);
        let mut buf = [0u8; 5];
        assert!(key.encrypt(&mut buf).is_err());
    }

    #[test]
    fn rejects_empty_buffer() {
        let key = MangleKey::new([0u8; 16]);
        let mut buf: [u8; 0] = [];
        assert!(key.encrypt(&mut buf).is_err());
    }

    #[test]
    fn round_key_wraps_at_four() {
        let key = MangleKey::from_round_keys([1, 2, 3, 4]);
        assert_eq!(key.round_key(0), key.round_key(4));
        assert_eq!(key.round_key(5), key.round_key(1));
    }

    #[test]
    fn to_bytes_round_trips_through_new() {
        let bytes = *b"zyxwvutsrqponmlk";
        let key = MangleKey::new(bytes);
        assert_eq!(key.to_bytes(), bytes);
    }

    #[test]
    fn different_keys_produce_different_ciphertext() {
        let plain = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let key_a = MangleKey::new([1u8; 16]);
        let key_b = MangleKey::new([2u8; 16]);

        let mut a = plain;
        key_a.encrypt_block(&mut a);
        let mut b = plain;
        key_b.encrypt_block(&mut b);

        assert_ne!(a, b);
    }
}
