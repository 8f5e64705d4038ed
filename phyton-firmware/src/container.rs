//! Firmware container parsing: the `Phyton\0\0` / `AlmaCode` file header,
//! per-entry headers, and the block stream that carries encrypted,
//! optionally-compressed firmware data.

use crate::error::{FirmwareError, Result};
use crate::util::{DosDateTime, decode_dos_datetime};
use phyton_core::buffer::ByteReader;
use phyton_core::crc;
use phyton_crypto::block::{EncryptedBlock, KeyMaterial, OUTER_MANGLE_KEY_OFFSET_FLASH};

/// Marker identifying a single-entry `Phyton` firmware file.
pub const MARKER_PHYTON: [u8; 8] = *b"Phyton\0\0";

/// Marker identifying a multi-entry `AlmaCode` container.
pub const MARKER_ALMACODE: [u8; 8] = *b"AlmaCode";

/// The Cortex-M flash base address block addresses are relative to.
pub const BASE_ADDRESS: u32 = 0x0800_0000;

/// `size` field XOR key applied to each block header.
pub const BLOCK_HEADER_SIZE_KEY: u32 = 0xCE38_B5B2;

/// `addr` field XOR key applied to each block header.
pub const BLOCK_HEADER_ADDR_KEY: u32 = 0xB2C1_F0A4;

/// The fixed-layout file header shared by both container kinds.
#[derive(Debug, Clone)]
pub struct ContainerHeader {
    /// The 8-byte marker, either [`MARKER_PHYTON`] or [`MARKER_ALMACODE`].
    pub marker: [u8; 8],
    /// Declared header size.
    pub header_size: u32,
    /// Packed DOS datetime.
    pub datetime: u32,
    /// Declared buffer size.
    pub buffer_size: u32,
    /// Serial number field.
    pub serial_number: [u8; 16],
    /// Low version byte.
    pub version_low: u8,
    /// High version byte.
    pub version_high: u8,
    /// `AlmaCode`-only tail fields.
    pub tail: Option<AlmaCodeTail>,
}

/// Tail fields present only in `AlmaCode` containers.
#[derive(Debug, Clone, Copy)]
pub struct AlmaCodeTail {
    /// Number of entries in the container.
    pub file_count: u32,
    /// Size of each per-entry firmware header.
    pub firmware_header_size: u32,
    /// Whether entries are LZSS-compressed.
    pub compressed: bool,
    /// Reserved byte.
    pub reserved: u8,
    /// Container-level CRC-32, stored verbatim for the caller to check.
    pub crc32: u32,
}

impl ContainerHeader {
    /// Parse the fixed file header from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data);

        let marker: [u8; 8] = reader.read_bytes(8)?.try_into().unwrap();
        if marker != MARKER_PHYTON && marker != MARKER_ALMACODE {
            return Err(FirmwareError::UnsupportedHeader { marker });
        }

        let header_size = reader.read_u32_le()?;
        let datetime = reader.read_u32_le()?;
        let buffer_size = reader.read_u32_le()?;
        let serial_number: [u8; 16] = reader.read_bytes(16)?.try_into().unwrap();
        let version_low = reader.read_u8()?;
        let version_high = reader.read_u8()?;

        let tail = if marker == MARKER_ALMACODE && reader.remaining() >= 4 + 4 + 1 + 1 + 4 {
            Some(AlmaCodeTail {
                file_count: reader.read_u32_le()?,
                firmware_header_size: reader.read_u32_le()?,
                compressed: reader.read_u8()? != 0,
                reserved: reader.read_u8()?,
                crc32: reader.read_u32_le()?,
            })
        } else {
            None
        };

        Ok(Self {
            marker,
            header_size,
            datetime,
            buffer_size,
            serial_number,
            version_low,
            version_high,
            tail,
        })
    }

    /// Decode [`Self::datetime`] as a calendar date/time.
    #[must_use]
    pub fn decoded_datetime(&self) -> DosDateTime {
        decode_dos_datetime(self.datetime)
    }
}

/// An `AlmaCode` per-entry header.
#[derive(Debug, Clone)]
pub struct EntryHeader {
    /// Windows-1251-decoded, zero-terminated description.
    pub description: String,
    /// Packed DOS datetime.
    pub datetime: u32,
    /// Size of this entry's data.
    pub data_size: u32,
}

impl EntryHeader {
    /// Parse a 256-byte description plus trailing datetime/size fields.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data);
        let raw_description = reader.read_bytes(256)?;
        let end = raw_description
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(raw_description.len());
        let (description, _, _) = encoding_rs::WINDOWS_1251.decode(&raw_description[..end]);

        let datetime = reader.read_u32_le()?;
        let data_size = reader.read_u32_le()?;

        Ok(Self {
            description: description.into_owned(),
            datetime,
            data_size,
        })
    }
}

/// A single `(block_header, encrypted_block)` entry in the block stream.
#[derive(Debug, Clone, Copy)]
pub struct BlockHeader {
    /// Declared header size.
    pub header_size: u32,
    /// Unveiled payload size (before 8-byte alignment).
    pub size: u32,
    /// Destination flash address.
    pub addr: u32,
}

impl BlockHeader {
    /// Parse and XOR-unveil a block header.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data);
        let header_size = reader.read_u32_le()?;
        let size = reader.read_u32_le()? ^ BLOCK_HEADER_SIZE_KEY;
        let addr = reader.read_u32_le()? ^ BLOCK_HEADER_ADDR_KEY;
        Ok(Self {
            header_size,
            size,
            addr,
        })
    }

    /// `size` rounded up to the next multiple of 8.
    #[must_use]
    pub fn size_aligned(&self) -> u32 {
        (self.size + 7) & !7
    }
}

/// A flat, sparse firmware image assembled from decoded blocks, indexed by
/// `addr - BASE_ADDRESS`.
#[derive(Debug, Default, Clone)]
pub struct FlatImage {
    data: Vec<u8>,
}

impl FlatImage {
    /// An empty image.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The assembled image bytes, from offset 0.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) {
        let end = offset + bytes.len();
        if self.data.len() < end {
            self.data.resize(end, 0);
        }
        self.data[offset..end].copy_from_slice(bytes);
    }
}

/// Decode every `(block_header, encrypted_block)` tuple in `stream`,
/// decrypting with flash key material and, if `compressed`, decompressing
/// the payload, then reassembling into a [`FlatImage`].
pub fn decode_block_stream(stream: &[u8], compressed: bool) -> Result<FlatImage> {
    let mut image = FlatImage::new();
    let mut reader = ByteReader::new(stream);

    while reader.remaining() >= 12 {
        let header_bytes = reader.read_bytes(12)?;
        let header = BlockHeader::parse(header_bytes)?;

        let block_len = 512 + header.size_aligned() as usize;
        let block_bytes = reader.read_bytes(block_len)?.to_vec();

        let mut block = EncryptedBlock::from_buffer(block_bytes)?;
        let material = KeyMaterial::for_decrypt(OUTER_MANGLE_KEY_OFFSET_FLASH);
        block.decrypt(&material, false)?;

        let decoded = if compressed {
            let compressed_payload = &block.payload()[..header.size as usize];
            phyton_lzss::decompress(compressed_payload)?
        } else {
            block.payload().to_vec()
        };

        let offset = (header.addr - BASE_ADDRESS) as usize;
        image.write_at(offset, &decoded);
    }

    Ok(image)
}

/// CRC-32 of `data`, exposed for callers validating a decoded payload
/// against a block's `CRC1`.
#[must_use]
pub fn checksum(data: &[u8]) -> u32 {
    crc::checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use phyton_crypto::generator::BorlandU16KeyGenerator;

    fn build_block_stream_entry(addr: u32, plaintext: &[u8], compressed: bool) -> Vec<u8> {
        let payload = if compressed {
            let mut c = phyton_lzss::compress(plaintext, true).unwrap();
            while c.len() % 8 != 0 {
                c.push(0);
            }
            c
        } else {
            let mut p = plaintext.to_vec();
            while p.len() % 8 != 0 {
                p.push(0);
            }
            p
        };
        let declared_size = if compressed {
            phyton_lzss::compress(plaintext, true).unwrap().len() as u32
        } else {
            plaintext.len() as u32
        };

        let mut block = EncryptedBlock::new(&payload).unwrap();
        let mut generator = BorlandU16KeyGenerator::new(0xC0FFEE);
        let mut material = KeyMaterial::for_encrypt(&mut generator, OUTER_MANGLE_KEY_OFFSET_FLASH);
        block.encrypt(&mut material).unwrap();

        let mut out = Vec::new();
        out.extend_from_slice(&12u32.to_le_bytes());
        out.extend_from_slice(&(declared_size ^ BLOCK_HEADER_SIZE_KEY).to_le_bytes());
        out.extend_from_slice(&(addr ^ BLOCK_HEADER_ADDR_KEY).to_le_bytes());
        out.extend_from_slice(block.as_bytes());
        out
    }

    #[test]
    fn decode_block_stream_reassembles_uncompressed_entry() {
        let plaintext = b"firmware-bytes-0123456789abcdef".to_vec();
        let stream = build_block_stream_entry(BASE_ADDRESS + 0x100, &plaintext, false);

        let image = decode_block_stream(&stream, false).unwrap();
        let offset = 0x100;
        assert_eq!(&image.as_bytes()[offset..offset + plaintext.len()], plaintext.as_slice());
    }

    #[test]
    fn decode_block_stream_reassembles_compressed_entry() {
        let plaintext = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_vec();
        let stream = build_block_stream_entry(BASE_ADDRESS + 0x200, &plaintext, true);

        let image = decode_block_stream(&stream, true).unwrap();
        let offset = 0x200;
        assert_eq!(&image.as_bytes()[offset..offset + plaintext.len()], plaintext.as_slice());
    }

    #[test]
    fn parses_phyton_header() {
        let mut data = Vec::new();
        data.extend_from_slice(&MARKER_PHYTON);
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&4096u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 16]);
        data.push(1);
        data.push(0);

        let header = ContainerHeader::parse(&data).unwrap();
        assert_eq!(header.marker, MARKER_PHYTON);
        assert!(header.tail.is_none());
    }

    #[test]
    fn parses_almacode_header_with_tail() {
        let mut data = Vec::new();
        data.extend_from_slice(&MARKER_ALMACODE);
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&4096u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 16]);
        data.push(2);
        data.push(1);
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&256u32.to_le_bytes());
        data.push(1);
        data.push(0);
        data.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());

        let header = ContainerHeader::parse(&data).unwrap();
        let tail = header.tail.unwrap();
        assert_eq!(tail.file_count, 3);
        assert!(tail.compressed);
    }

    #[test]
    fn rejects_unrecognized_marker() {
        let mut data = vec![0u8; 40];
        data[..8].copy_from_slice(b"Bogus!!!");
        let err = ContainerHeader::parse(&data).unwrap_err();
        assert!(matches!(err, FirmwareError::UnsupportedHeader { .. }));
    }

    #[test]
    fn block_header_unveils_size_and_addr() {
        let mut data = Vec::new();
        data.extend_from_slice(&12u32.to_le_bytes());
        data.extend_from_slice(&(64u32 ^ BLOCK_HEADER_SIZE_KEY).to_le_bytes());
        data.extend_from_slice(&((BASE_ADDRESS + 0x1000) ^ BLOCK_HEADER_ADDR_KEY).to_le_bytes());

        let header = BlockHeader::parse(&data).unwrap();
        assert_eq!(header.size, 64);
        assert_eq!(header.addr, BASE_ADDRESS + 0x1000);
        assert_eq!(header.size_aligned(), 64);
    }

    #[test]
    fn size_aligned_rounds_up() {
        let header = BlockHeader {
            header_size: 12,
            size: 13,
            addr: BASE_ADDRESS,
        };
        assert_eq!(header.size_aligned(), 16);
    }

    #[test]
    fn flat_image_grows_on_write() {
        let mut image = FlatImage::new();
        image.write_at(10, &[1, 2, 3]);
        assert_eq!(image.as_bytes().len(), 13);
        assert_eq!(&image.as_bytes()[10..13], &[1, 2, 3]);
    }
}
