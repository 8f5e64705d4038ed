//! The two hardcoded 8-entry mangle key tables.
//!
//! The real firmware's table bytes are vendor constants embedded in the
//! device's binary and were not available in the retrieved source corpus.
//! The values below are placeholders of the correct shape (eight distinct
//! 128-bit keys each) so that every encrypt/decrypt path is exercisable and
//! round-trip-testable; they are not the device's real key material. A
//! caller targeting real firmware must supply the genuine tables via
//! [`crate::block::KeyMaterial::alternate_key_table`] and a custom outer
//! table, or by replacing the constants below.

use crate::cipher::MangleKey;

/// Number of entries in each mangle key table.
pub const MANGLE_TABLE_SIZE: usize = 8;

/// The outer/normal-range mangle key table, selected by `mangle_index` in
/// `0..7` and by `outer_key_offset`.
pub static HARDCODED_MANGLE_TABLE: [MangleKey; MANGLE_TABLE_SIZE] = [
    MangleKey::from_round_keys([0x6A09_E667, 0xBB67_AE85, 0x3C6E_F372, 0xA54F_F53A]),
    MangleKey::from_round_keys([0x510E_527F, 0x9B05_688C, 0x1F83_D9AB, 0x5BE0_CD19]),
    MangleKey::from_round_keys([0x4286_5811, 0x265F_1283, 0x4C01_9C6B, 0x85C2_B6B6]),
    MangleKey::from_round_keys([0x8A1B_3C4D, 0x5E6F_7081, 0x92A3_B4C5, 0xD6E7_F809]),
    MangleKey::from_round_keys([0x1122_3344, 0x5566_7788, 0x99AA_BBCC, 0xDDEE_FF00]),
    MangleKey::from_round_keys([0xCAFE_BABE, 0xDEAD_BEEF, 0xFEED_FACE, 0x8BAD_F00D]),
    MangleKey::from_round_keys([0x0D13_F00D, 0x1337_C0DE, 0xABAD_1DEA, 0xB00B_1E5]),
    MangleKey::from_round_keys([0x2F4A_6C8E, 0x3B5D_7F91, 0x4C6E_80A2, 0x5D7F_91B3]),
];

/// The alternate mangle key table, selected by `mangle_index` in `8..15`
/// (index `- 8`) unless the caller supplies their own via
/// [`crate::block::KeyMaterial::alternate_key_table`].
pub static ALTERNATE_MANGLE_TABLE: [MangleKey; MANGLE_TABLE_SIZE] = [
    MangleKey::from_round_keys([0x6C62_2722, 0x4528_CE34, 0x77AA_19E0, 0xD9E1_9D95]),
    MangleKey::from_round_keys([0x1B87_3593, 0x372F_9135, 0xA4A4_D1C4, 0x6F4C_2D55]),
    MangleKey::from_round_keys([0xF1D3_6B2A, 0x9E8A_3B7C, 0x5C4D_9B1E, 0x7A6F_3C2D]),
    MangleKey::from_round_keys([0x3E9A_0C1B, 0x8D7F_2A4C, 0x6B5E_3D2F, 0x4C1B_9A8D]),
    MangleKey::from_round_keys([0x9F8E_7D6C, 0x5B4A_3928, 0x1706_F5E4, 0xD3C2_B1A0]),
    MangleKey::from_round_keys([0x0A1B_2C3D, 0x4E5F_6071, 0x8293_A4B5, 0xC6D7_E8F9]),
    MangleKey::from_round_keys([0x5566_0011, 0x7788_2233, 0x99AA_4455, 0xBBCC_6677]),
    MangleKey::from_round_keys([0xFACE_F00D, 0xBEEF_CAFE, 0xD00D_F00D, 0x1234_ABCD]),
];
