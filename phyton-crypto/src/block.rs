//! The encrypted block envelope: a 512-byte key header followed by an
//! 8-byte-aligned encrypted payload.

use crate::cipher::MangleKey;
use crate::error::{CryptoError, Result};
use crate::generator::KeyGenerator;
use crate::tables::{ALTERNATE_MANGLE_TABLE, HARDCODED_MANGLE_TABLE};
use phyton_core::crc;

/// Size of the key header preceding the payload.
pub const KEY_HEADER_SIZE: usize = 512;

const MANGLE_INDEX_OFFSET: usize = 0;
const MANGLE_KEY_DATA_OFFSET: usize = 2;
const CRC1_OFFSET: usize = 18;
const CRC2_OFFSET: usize = 22;
const KEY_PADDING_OFFSET: usize = 26;

/// Length of the region covered by the inner-key encrypt/decrypt step:
/// `mangle_key_data (16) | CRC1 (4) | CRC2 (4)`.
const MANGLE_KEY_BLOCK_LEN: usize = 24;

/// `outer_key_offset` selecting the flash/default table entry.
pub const OUTER_MANGLE_KEY_OFFSET_DEFAULT: u32 = 0;
/// `outer_key_offset` selecting the flash table entry (alias of default).
pub const OUTER_MANGLE_KEY_OFFSET_FLASH: u32 = 0;
/// `outer_key_offset` selecting the device-id table entry.
pub const OUTER_MANGLE_KEY_OFFSET_DEVICE_ID: u32 = 1;
/// `outer_key_offset` selecting the memory table entry.
pub const OUTER_MANGLE_KEY_OFFSET_MEMORY: u32 = 6;

const MANGLE_INDEX_DEVICE_KEY: u32 = 0xFFFF;

/// Optional CRC override, used to model devices whose CRC is truncated.
pub type CrcFn = fn(&[u8]) -> u32;

/// Configuration supplied to [`EncryptedBlock::encrypt`]/[`EncryptedBlock::decrypt`].
pub struct KeyMaterial<'a> {
    /// Source of key-block bytes and the mangle-index selector. Required
    /// for encrypt; unused for decrypt.
    pub generator: Option<&'a mut dyn KeyGenerator>,
    /// Index into the hardcoded table selecting the outermost wrapping key.
    pub outer_key_offset: u32,
    /// Caller-supplied device key, used when `mangle_index == 0xFFFF`.
    pub device_key: Option<MangleKey>,
    /// Caller-supplied table overriding the built-in alternate-key table.
    pub alternate_key_table: Option<[MangleKey; 8]>,
    /// Override the CRC function (e.g. to model a 16-bit-truncated CRC).
    pub crc: Option<CrcFn>,
}

impl<'a> KeyMaterial<'a> {
    /// Build key material for the flash/default outer offset with no
    /// generator (decrypt-only use).
    #[must_use]
    pub fn for_decrypt(outer_key_offset: u32) -> Self {
        Self {
            generator: None,
            outer_key_offset,
            device_key: None,
            alternate_key_table: None,
            crc: None,
        }
    }

    /// Build key material for encrypt, driven by `generator`.
    #[must_use]
    pub fn for_encrypt(generator: &'a mut dyn KeyGenerator, outer_key_offset: u32) -> Self {
        Self {
            generator: Some(generator),
            outer_key_offset,
            device_key: None,
            alternate_key_table: None,
            crc: None,
        }
    }

    fn compute_crc(&self, payload: &[u8]) -> u32 {
        match self.crc {
            Some(f) => f(payload),
            None => crc::checksum(payload),
        }
    }

    fn outer_key(&self) -> MangleKey {
        HARDCODED_MANGLE_TABLE[(self.outer_key_offset as usize) % HARDCODED_MANGLE_TABLE.len()]
    }

    fn resolve_inner_key(&self, mangle_index: u32) -> Result<MangleKey> {
        match mangle_index {
            0..=7 => Ok(HARDCODED_MANGLE_TABLE[mangle_index as usize]),
            8..=15 => {
                let idx = (mangle_index - 8) as usize;
                match &self.alternate_key_table {
                    Some(table) => Ok(table[idx]),
                    None => Ok(ALTERNATE_MANGLE_TABLE[idx]),
                }
            }
            MANGLE_INDEX_DEVICE_KEY => self.device_key.ok_or(CryptoError::UnsupportedDeviceKey),
            other => Err(CryptoError::invalid_key_number(other)),
        }
    }
}

/// A `512 + payload_len` byte buffer: key header followed by an
/// 8-byte-aligned encrypted payload.
pub struct EncryptedBlock {
    buf: Vec<u8>,
}

impl EncryptedBlock {
    /// Wrap a buffer that already contains the full `512 + payload_len`
    /// layout (e.g. read off the wire). `payload_len` must be a multiple of
    /// 8; zero is permitted (a bare key header with no payload, as in the
    /// empty-memory-block case — spec.md §8 S1).
    pub fn from_buffer(buf: Vec<u8>) -> Result<Self> {
        let payload_len = buf
            .len()
            .checked_sub(KEY_HEADER_SIZE)
            .ok_or_else(|| CryptoError::alignment_violation(buf.len()))?;
        if payload_len % 8 != 0 {
            return Err(CryptoError::alignment_violation(payload_len));
        }
        Ok(Self { buf })
    }

    /// Allocate a new block with `payload` as its plaintext payload
    /// (header left zeroed, to be filled by [`EncryptedBlock::encrypt`]).
    /// `payload.len()` must be a multiple of 8; zero is permitted.
    pub fn new(payload: &[u8]) -> Result<Self> {
        if payload.len() % 8 != 0 {
            return Err(CryptoError::alignment_violation(payload.len()));
        }
        let mut buf = vec![0u8; KEY_HEADER_SIZE + payload.len()];
        buf[KEY_HEADER_SIZE..].copy_from_slice(payload);
        Ok(Self { buf })
    }

    /// The full `512 + payload_len` buffer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the block, returning the full buffer.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// The payload region (after the 512-byte key header).
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.buf[KEY_HEADER_SIZE..]
    }

    fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.buf[KEY_HEADER_SIZE..]
    }

    fn header_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..KEY_HEADER_SIZE]
    }

    fn mangle_key_block_mut(&mut self) -> &mut [u8] {
        &mut self.buf[MANGLE_KEY_DATA_OFFSET..MANGLE_KEY_DATA_OFFSET + MANGLE_KEY_BLOCK_LEN]
    }

    fn mangle_key_data(&self) -> [u8; 16] {
        self.buf[MANGLE_KEY_DATA_OFFSET..MANGLE_KEY_DATA_OFFSET + 16]
            .try_into()
            .unwrap()
    }

    fn set_mangle_index(&mut self, index: u32) {
        let lo = (index & 0xFFFF) as u16;
        self.buf[MANGLE_INDEX_OFFSET..MANGLE_INDEX_OFFSET + 2].copy_from_slice(&lo.to_le_bytes());
    }

    fn mangle_index(&self) -> u32 {
        u16::from_le_bytes(
            self.buf[MANGLE_INDEX_OFFSET..MANGLE_INDEX_OFFSET + 2]
                .try_into()
                .unwrap(),
        ) as u32
    }

    fn set_crc_pair(&mut self, crc: u32) {
        self.buf[CRC1_OFFSET..CRC1_OFFSET + 4].copy_from_slice(&crc.to_le_bytes());
        self.buf[CRC2_OFFSET..CRC2_OFFSET + 4].copy_from_slice(&crc.to_le_bytes());
    }

    fn crc1(&self) -> u32 {
        u32::from_le_bytes(self.buf[CRC1_OFFSET..CRC1_OFFSET + 4].try_into().unwrap())
    }

    fn crc2(&self) -> u32 {
        u32::from_le_bytes(self.buf[CRC2_OFFSET..CRC2_OFFSET + 4].try_into().unwrap())
    }

    /// Encrypt this block's payload and key header in place, per §4.5:
    /// stamp CRCs, fill the key block and padding from the generator, pick
    /// the inner key, encrypt the payload and the mangle key block, then
    /// encrypt the whole 512-byte header with the outer key.
    pub fn encrypt(&mut self, material: &mut KeyMaterial<'_>) -> Result<()> {
        let crc_value = material.compute_crc(self.payload());
        self.set_crc_pair(crc_value);

        let generator = material
            .generator
            .as_deref_mut()
            .ok_or(CryptoError::MissingGenerator)?;

        let mut key_data = [0u8; 16];
        generator.fill(&mut key_data);
        self.buf[MANGLE_KEY_DATA_OFFSET..MANGLE_KEY_DATA_OFFSET + 16].copy_from_slice(&key_data);

        let padding_len = KEY_HEADER_SIZE - KEY_PADDING_OFFSET;
        let mut padding = vec![0u8; padding_len];
        generator.fill(&mut padding);
        self.buf[KEY_PADDING_OFFSET..].copy_from_slice(&padding);

        let mangle_index = generator.mangle_index();

        let inner_key = MangleKey::new(key_data);
        if !self.payload().is_empty() {
            inner_key.encrypt(self.payload_mut())?;
        }

        let resolved_key = material.resolve_inner_key(mangle_index)?;
        resolved_key.encrypt(self.mangle_key_block_mut())?;

        self.set_mangle_index(mangle_index);

        let outer_key = material.outer_key();
        outer_key.encrypt(self.header_mut())?;

        Ok(())
    }

    /// Decrypt this block's key header and payload in place, per §4.5,
    /// verifying `CRC1 == CRC2` and, if `verify_crc`, the payload CRC.
    pub fn decrypt(&mut self, material: &KeyMaterial<'_>, verify_crc: bool) -> Result<()> {
        let outer_key = material.outer_key();
        outer_key.decrypt(self.header_mut())?;

        let mangle_index = self.mangle_index();
        let inner_key = material.resolve_inner_key(mangle_index)?;
        inner_key.decrypt(self.mangle_key_block_mut())?;

        let key_data = self.mangle_key_data();
        let payload_key = MangleKey::new(key_data);
        if !self.payload().is_empty() {
            payload_key.decrypt(self.payload_mut())?;
        }

        if self.crc1() != self.crc2() {
            return Err(CryptoError::invalid_crc_pair(self.crc1(), self.crc2()));
        }

        if verify_crc {
            let computed = material.compute_crc(self.payload());
            if computed != self.crc1() {
                return Err(CryptoError::data_crc_mismatch(self.crc1(), computed));
            }
        }

        Ok(())
    }
}
