//! Seed recovery for the Borland LCG key generator, given a decrypted
//! (but not CRC-verified) key header.
//!
//! Each LCG step leaks 15 bits of the successor state (bits 16..30); the
//! remaining 17 bits must be searched. [`bruteforce_u16_seed`] does this by
//! template-filling the unknown bits and stepping backward, checking
//! agreement against consecutively observed outputs.

use crate::error::{CryptoError, Result};
use crate::lcg;

const CRC1_OFFSET: usize = 18;

/// Unknown-bit width for the u16 (Borland-u16) generator: 32 - 15 = 17.
const U16_FILLER_BITS: u32 = 17;

/// Unknown-bit width for the byte (Borland-byte) generator: 32 - 8 = 24.
const BYTE_FILLER_BITS: u32 = 24;

/// Read the little-endian u16 at `offset` in `header`.
fn read_u16_at(header: &[u8], offset: usize) -> Option<u16> {
    header
        .get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
}

/// Observed 15-bit outputs immediately preceding `CRC1Offset`, most recent
/// first: `header[CRC1Offset-2..]`, then `header[CRC1Offset-4..]`, etc.
fn observed_outputs(header: &[u8], count: usize) -> Result<Vec<u16>> {
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let offset = CRC1_OFFSET
            .checked_sub((i + 1) * 2)
            .ok_or(CryptoError::NotABorlandSeed)?;
        let value = read_u16_at(header, offset).ok_or(CryptoError::NotABorlandSeed)?;
        out.push(value);
    }
    Ok(out)
}

/// Verify every observed u16 in the generator-filled key region has bit 15
/// clear, i.e. is a plausible 15-bit LCG output.
fn fingerprint_ok(observed: &[u16]) -> bool {
    observed.iter().all(|v| v & 0x8000 == 0)
}

/// Recover candidate seeds for the Borland-u16 key generator from a
/// decrypted key header, per the efficient backward-search algorithm:
/// template-fill the 17 unknown bits of the successor state, step
/// backward, and keep states whose entire observed-output history agrees.
///
/// `observed_count` controls how many trailing 15-bit outputs (starting
/// just before `CRC1Offset`) are checked for agreement; more observations
/// narrow the candidate set but cost more backward steps per candidate.
pub fn bruteforce_u16_seed(header: &[u8], observed_count: usize) -> Result<Vec<u32>> {
    let observed = observed_outputs(header, observed_count)?;
    if !fingerprint_ok(&observed) {
        return Err(CryptoError::NotABorlandSeed);
    }

    let (w_n, rest) = match observed.split_first() {
        Some(pair) => pair,
        None => return Ok(Vec::new()),
    };

    let state_template = (u32::from(*w_n) << 16) & 0x7FFF_0000;
    let mut survivors = Vec::new();

    for filler in 0..(1u32 << U16_FILLER_BITS) {
        let candidate = state_template | filler;
        if !candidate_agrees(candidate, rest) {
            continue;
        }
        survivors.push(candidate);
    }

    survivors.sort_unstable();
    survivors.dedup();
    Ok(survivors)
}

fn candidate_agrees(mut state: u32, rest: &[u16]) -> bool {
    for &expected in rest {
        state = lcg::prev_seed(state);
        if lcg::output(state) != expected {
            return false;
        }
    }
    true
}

/// Byte-wise variant of [`bruteforce_u16_seed`] for the Borland-byte
/// generator: only the low 8 bits of each step are observed, so the filler
/// covers 24 unknown bits instead of 17.
pub fn bruteforce_byte_seed(observed_bytes: &[u8]) -> Result<Vec<u32>> {
    if observed_bytes.is_empty() {
        return Err(CryptoError::NotABorlandSeed);
    }

    let (w_n, rest) = observed_bytes.split_first().unwrap();
    let state_template = (u32::from(*w_n) << 16) & 0x00FF_0000;
    let mut survivors = Vec::new();

    for filler in 0..(1u32 << BYTE_FILLER_BITS) {
        let candidate = state_template | filler;
        let mut state = candidate;
        let mut ok = true;
        for &expected in rest {
            state = lcg::prev_seed(state);
            if (lcg::output(state) as u8) != expected {
                ok = false;
                break;
            }
        }
        if ok {
            survivors.push(candidate);
        }
    }

    survivors.sort_unstable();
    survivors.dedup();
    Ok(survivors)
}

/// Legacy exhaustive search over the full 2^32 seed space, used as a
/// cross-check against the efficient backward-search path. Scans every
/// seed, checking that two consecutive observed outputs match, then
/// verifies the remaining observed outputs in the key region before
/// accepting.
///
/// Behind the `parallel` feature this partitions the seed space across
/// `rayon`'s global thread pool; otherwise it runs as a single sequential
/// scan (slow, intended for small test fixtures and documentation, not
/// production use).
pub fn bruteforce_u16_seed_exhaustive(header: &[u8], observed_count: usize) -> Result<Vec<u32>> {
    let observed = observed_outputs(header, observed_count)?;
    let Some((&w_n, rest)) = observed.split_first() else {
        return Ok(Vec::new());
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        let mut found: Vec<u32> = (0u32..=u32::MAX)
            .into_par_iter()
            .filter(|&seed| {
                let (next, out) = lcg::next(seed);
                out == w_n && candidate_agrees(next, rest)
            })
            .map(|seed| lcg::next_seed(seed))
            .collect();
        found.sort_unstable();
        found.dedup();
        Ok(found)
    }

    #[cfg(not(feature = "parallel"))]
    {
        let mut found = Vec::new();
        for seed in 0u32..=u32::MAX {
            let (next, out) = lcg::next(seed);
            if out == w_n && candidate_agrees(next, rest) {
                found.push(next);
            }
        }
        found.sort_unstable();
        found.dedup();
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{BorlandU16KeyGenerator, KeyGenerator};

    fn make_header_with_seed(seed: u32) -> Vec<u8> {
        let mut header = vec![0u8; 512];
        let mut gen = BorlandU16KeyGenerator::new(seed);
        gen.fill(&mut header[2..26]);
        header
    }

    #[test]
    fn backward_search_recovers_known_seed() {
        let header = make_header_with_seed(0xCAFE_F00D);
        let candidates = bruteforce_u16_seed(&header, 6).unwrap();
        assert!(!candidates.is_empty());

        // w_n is anchored at CRC1Offset-2 == 16, the 8th fill output (offset
        // 2 + 2*7), so survivors are the state after 8 steps (16 bytes).
        let mut gen = BorlandU16KeyGenerator::new(0xCAFE_F00D);
        let mut tmp = [0u8; 16];
        gen.fill(&mut tmp);
        assert!(candidates.contains(&gen.seed()));
    }

    #[test]
    fn rejects_header_with_high_bit_set() {
        let mut header = vec![0u8; 512];
        header[16] = 0x00;
        header[17] = 0x80; // bit 15 set just before CRC1Offset
        assert!(bruteforce_u16_seed(&header, 1).is_err());
    }

    #[test]
    fn byte_variant_recovers_seed_shape() {
        let mut gen = crate::generator::BorlandByteKeyGenerator::new(77);
        let mut buf = [0u8; 4];
        gen.fill(&mut buf);
        let candidates = bruteforce_byte_seed(&buf).unwrap();
        assert!(candidates.iter().all(|c| c & 0xFF00_0000 == 0));
    }
}
