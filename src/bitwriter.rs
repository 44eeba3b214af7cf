//! Bit-level writing abstractions for variable-length codes
//!
//! Bits are packed most-significant-bit first. The writer owns a growable
//! byte buffer; the reader borrows a slice and is strictly bounds-checked.
//! Neither knows anything about Huffman codes.

use alloc::vec::Vec;

use crate::error::{CodecError, CodecResult};

/// Bit-level writer for packing variable-width values into a byte buffer
///
/// # Example
/// ```
/// # use emgcodec::bitwriter::BitWriter;
/// let mut writer = BitWriter::new();
///
/// writer.write_bits(0b1010, 4).unwrap();  // Write 4 bits
/// writer.write_bits(0b11, 2).unwrap();    // Write 2 more bits
/// let buffer = writer.flush();
///
/// assert_eq!(buffer, vec![0b10101100]); // Bits written MSB first
/// ```
#[derive(Debug, Default)]
pub struct BitWriter {
    buffer: Vec<u8>,
    /// Current bit position (0 = first bit of first byte)
    bit_pos: usize,
}

impl BitWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            bit_pos: 0,
        }
    }

    /// Continue writing after the bytes already in `buffer`
    ///
    /// Used to append a bit-packed payload directly behind a header.
    pub fn from_bytes(buffer: Vec<u8>) -> Self {
        let bit_pos = buffer.len() * 8;
        Self { buffer, bit_pos }
    }

    /// Reserve room for at least `additional` more bytes
    pub fn reserve(&mut self, additional: usize) {
        self.buffer.reserve(additional);
    }

    /// Get current bit position
    pub fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Get number of bytes touched so far (including a partial last byte)
    pub fn bytes_written(&self) -> usize {
        (self.bit_pos + 7) / 8
    }

    /// Write a single bit
    pub fn write_bit(&mut self, bit: bool) {
        let byte_idx = self.bit_pos / 8;
        let bit_idx = self.bit_pos % 8;

        if byte_idx == self.buffer.len() {
            self.buffer.push(0);
        }

        if bit {
            self.buffer[byte_idx] |= 1 << (7 - bit_idx);
        }

        self.bit_pos += 1;
    }

    /// Write the low `width` bits of `value`, most significant first
    ///
    /// # Errors
    /// Returns `BitPositionOverflow` if `width` is outside `1..=64`
    ///
    /// # Example
    /// ```
    /// # use emgcodec::bitwriter::BitWriter;
    /// let mut writer = BitWriter::new();
    ///
    /// writer.write_bits(0b1111, 4).unwrap();
    /// writer.write_bits(0b10, 2).unwrap();
    ///
    /// assert_eq!(writer.flush(), vec![0b11111000]);
    /// ```
    pub fn write_bits(&mut self, value: u64, width: u8) -> CodecResult<()> {
        if width == 0 || width > 64 {
            return Err(CodecError::BitPositionOverflow);
        }

        for i in (0..width).rev() {
            self.write_bit((value >> i) & 1 != 0);
        }

        Ok(())
    }

    /// Pad the final partial byte with zero bits and return the buffer
    pub fn flush(self) -> Vec<u8> {
        // write_bit pushes a zeroed byte before setting any bit in it,
        // so the unused tail of the last byte is already zero
        self.buffer
    }
}

/// Bit-level reader for unpacking MSB-first bit streams
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, bit_pos: 0 }
    }

    /// Get current bit position
    pub fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Get remaining bits
    pub fn remaining_bits(&self) -> usize {
        (self.buffer.len() * 8).saturating_sub(self.bit_pos)
    }

    /// Read the next bit and advance the cursor
    ///
    /// # Errors
    /// Returns `OutOfData` once every bit of the buffer has been consumed
    pub fn read_bit(&mut self) -> CodecResult<bool> {
        let byte = self
            .buffer
            .get(self.bit_pos / 8)
            .ok_or(CodecError::OutOfData)?;
        let bit = (byte >> (7 - self.bit_pos % 8)) & 1;
        self.bit_pos += 1;
        Ok(bit != 0)
    }

    /// Read `width` bits into a u64
    pub fn read_bits(&mut self, width: u8) -> CodecResult<u64> {
        if width == 0 || width > 64 {
            return Err(CodecError::BitPositionOverflow);
        }

        if self.remaining_bits() < width as usize {
            return Err(CodecError::OutOfData);
        }

        let mut value = 0u64;
        for _ in 0..width {
            value = (value << 1) | u64::from(self.read_bit()?);
        }

        Ok(value)
    }
}
