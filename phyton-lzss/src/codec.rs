//! Compress/decompress a firmware block using the fixed 2048-byte-window
//! LZSS variant: each token is either a literal byte or a back-reference
//! into the window, packed MSB-first.

use crate::constants::{DATA_MAX_SIZE, LENGTH_BITS, LITERAL_BITS, MAX_UNCODED, OFFSET_BITS, WINDOW_INITIAL_INDEX};
use crate::error::{LzssError, Result};
use crate::window::Window;
use phyton_core::bitstream::{BitReader, BitWriter};
use phyton_core::error::CoreError;
use std::io::Cursor;

/// Compress `data` into the device's LZSS-variant bitstream.
///
/// `exhaustive` selects between the device's own greedy-first-match
/// strategy (`false`) and a longest-match search (`true`); both produce
/// decodable output, but `exhaustive` typically compresses smaller.
///
/// An empty input produces empty output. Input larger than
/// [`crate::constants::DATA_MAX_SIZE`] is rejected.
pub fn compress(data: &[u8], exhaustive: bool) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    if data.len() > DATA_MAX_SIZE {
        return Err(LzssError::OutOfBoundsInput {
            len: data.len(),
            limit: DATA_MAX_SIZE,
        });
    }

    let mut window_index = WINDOW_INITIAL_INDEX;
    let mut window = Window::new();

    let mut output = Vec::with_capacity(DATA_MAX_SIZE);
    let mut writer = BitWriter::new(&mut output);

    let mut remaining = data;
    while !remaining.is_empty() {
        let found = window.find(window_index, remaining, exhaustive);

        if let Some((offset_index, length)) = found {
            writer.write_bit(false)?;
            writer.write_bits(offset_index as u32, OFFSET_BITS as u8)?;
            writer.write_bits((length - MAX_UNCODED) as u32, LENGTH_BITS as u8)?;

            window_index = window.set(window_index, &remaining[..length]);
            remaining = &remaining[length..];
        } else {
            writer.write_bit(true)?;

            let literal = remaining[0];
            remaining = &remaining[1..];
            window_index = window.set_byte(window_index, literal);

            writer.write_bits(literal as u32, LITERAL_BITS as u8)?;
        }
    }

    writer.flush()?;
    drop(writer);

    Ok(output)
}

/// Decompress a block produced by [`compress`]. There is no explicit end
/// marker; decoding stops as soon as even the flag bit cannot be read.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut window_index = WINDOW_INITIAL_INDEX;
    let mut window = Window::new();
    let mut output = Vec::with_capacity(DATA_MAX_SIZE);

    let mut reader = BitReader::new(Cursor::new(data));
    let mut scratch = vec![0u8; crate::constants::WINDOW_SIZE];

    loop {
        let is_literal = match reader.read_bit() {
            Ok(bit) => bit,
            Err(CoreError::UnexpectedEndOfBits { .. }) => break,
            Err(e) => return Err(e.into()),
        };

        if !is_literal {
            let offset_index = reader.read_bits(OFFSET_BITS as u8)? as usize;
            let length = reader.read_bits(LENGTH_BITS as u8)? as usize + MAX_UNCODED;

            if DATA_MAX_SIZE < length + output.len() {
                return Err(LzssError::OutOfBoundsOutput { limit: DATA_MAX_SIZE });
            }

            let next_index = window.get_set(offset_index, window_index, length, &mut scratch);
            output.extend_from_slice(&scratch[..length]);
            window_index = next_index;
        } else {
            let literal = reader.read_bits(LITERAL_BITS as u8)? as u8;

            if DATA_MAX_SIZE - 1 < output.len() {
                return Err(LzssError::OutOfBoundsOutput { limit: DATA_MAX_SIZE });
            }

            output.push(literal);
            window_index = window.set_byte(window_index, literal);
        }
    }

    Ok(output)
}
