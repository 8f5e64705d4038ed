//! The fixed 2048-byte sliding window shared by the compressor and
//! decompressor.

use crate::constants::{MAX_CODED, MAX_UNCODED, WINDOW_FILL_VALUE, WINDOW_INITIAL_INDEX, WINDOW_SIZE};

/// A match found by [`Window::find`]: `(offset_index, length)`, or `None`
/// if no match of at least [`MAX_UNCODED`] bytes exists.
pub type Match = Option<(usize, usize)>;

/// The sliding window: a ring buffer of `WINDOW_SIZE` bytes.
#[derive(Clone)]
pub struct Window {
    data: [u8; WINDOW_SIZE],
}

impl Window {
    /// Build a fresh window: `0x20` fill for `0..WINDOW_INITIAL_INDEX`,
    /// zero for the rest.
    #[must_use]
    pub fn new() -> Self {
        let mut data = [0u8; WINDOW_SIZE];
        data[..WINDOW_INITIAL_INDEX].fill(WINDOW_FILL_VALUE);
        Self { data }
    }

    /// Wrap `i` into `0..WINDOW_SIZE`, matching two's-complement masking
    /// semantics for negative indices (`WINDOW_SIZE` is a power of two).
    #[must_use]
    pub fn index(i: isize) -> usize {
        (i & (WINDOW_SIZE as isize - 1)) as usize
    }

    /// Search for the longest match of `buf` starting anywhere in the
    /// window, preferring offsets near `window_index`. In non-exhaustive
    /// mode, returns the first match of at least [`MAX_UNCODED`] bytes
    /// found in scan order; in exhaustive mode, keeps scanning for the
    /// longest.
    #[must_use]
    pub fn find(&self, window_index: usize, buf: &[u8], exhaustive: bool) -> Match {
        if buf.is_empty() {
            return None;
        }
        let first = buf[0];

        let mut best_offset = None;
        let mut best_len = 0usize;

        for i in 0..WINDOW_SIZE {
            let candidate_offset = Self::index(window_index as isize + i as isize - 1);
            if self.data[candidate_offset] != first {
                continue;
            }

            let mut scratch = self.clone();
            let mut lookup = scratch.set_byte(window_index, first);
            let mut match_len = 1usize;

            let limit = buf.len().min(MAX_CODED - 1);
            for (j, &expect) in buf.iter().enumerate().take(limit).skip(1) {
                let (next_lookup, data) = scratch.get_set_byte(candidate_offset + j, lookup);
                lookup = next_lookup;
                if data != expect {
                    break;
                }
                match_len += 1;
            }

            if match_len > best_len && match_len >= MAX_UNCODED {
                best_offset = Some(candidate_offset);
                best_len = match_len;
                if !exhaustive {
                    break;
                }
            }
        }

        best_offset.map(|offset| (offset, best_len))
    }

    /// Read `length` bytes starting at `offset_index` without mutating the
    /// window.
    pub fn peek(&self, offset_index: usize, length: usize, buf: &mut [u8]) {
        for (j, slot) in buf.iter_mut().take(length).enumerate() {
            *slot = self.data[Self::index(offset_index as isize + j as isize)];
        }
    }

    /// Copy `length` bytes from `offset_index` to `window_index`
    /// simultaneously, writing the copied bytes into `buf` and returning
    /// the window index just past the write.
    pub fn get_set(
        &mut self,
        offset_index: usize,
        window_index: usize,
        length: usize,
        buf: &mut [u8],
    ) -> usize {
        for j in 0..length {
            let byte = self.data[Self::index(offset_index as isize + j as isize)];
            buf[j] = byte;
            self.data[Self::index(window_index as isize + j as isize)] = byte;
        }
        Self::index(window_index as isize + length as isize)
    }

    /// Write `buf` starting at `window_index`, returning the index just
    /// past the write.
    pub fn set(&mut self, window_index: usize, buf: &[u8]) -> usize {
        for (j, &byte) in buf.iter().enumerate() {
            self.data[Self::index(window_index as isize + j as isize)] = byte;
        }
        Self::index(window_index as isize + buf.len() as isize)
    }

    /// Read one byte from `offset_index`, write it to `window_index`, and
    /// return `(next_window_index, byte)`.
    pub fn get_set_byte(&mut self, offset_index: usize, window_index: usize) -> (usize, u8) {
        let data = self.data[Self::index(offset_index as isize)];
        self.data[Self::index(window_index as isize)] = data;
        (Self::index(window_index as isize + 1), data)
    }

    /// Read one byte from `offset_index`.
    #[must_use]
    pub fn get_byte(&self, offset_index: usize) -> u8 {
        self.data[Self::index(offset_index as isize)]
    }

    /// Write one byte at `window_index`, returning the next window index.
    pub fn set_byte(&mut self, window_index: usize, data: u8) -> usize {
        self.data[Self::index(window_index as isize)] = data;
        Self::index(window_index as isize + 1)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}
