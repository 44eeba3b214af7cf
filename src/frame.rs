//! Frame header wire format
//!
//! Big-endian throughout:
//!
//! ```text
//! ┌────────────────┬───────────────────────────────┬──────────────┬──────────────┬─────────┐
//! │ Unique symbols │ (symbol u16, frequency u16) × │ Sample count │ First sample │ Payload │
//! │ (4 bytes)      │ unique symbols, ascending     │ (4 bytes)    │ (4 bytes i32)│ (bits)  │
//! └────────────────┴───────────────────────────────┴──────────────┴──────────────┴─────────┘
//! ```
//!
//! The payload is the bit-packed Huffman codes of the deltas, MSB first,
//! zero-padded to a byte boundary.

use alloc::vec::Vec;

use crate::delta::SYMBOL_SPACE;
use crate::error::{CodecError, CodecResult};
use crate::frequency::FrequencyTable;

/// One serialized symbol/frequency pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolWeight {
    /// Symbol index (`delta + 32768`)
    pub symbol: u16,
    /// Normalized frequency, always >= 1
    pub weight: u16,
}

/// Parsed or to-be-written frame header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// Symbol/frequency pairs in strictly ascending symbol order
    pub symbols: Vec<SymbolWeight>,
    /// Total samples in the frame, including the first
    pub sample_count: u32,
    /// Absolute value of the first sample
    pub first_sample: i32,
}

impl FrameHeader {
    /// Size of the unique-symbol count field
    pub const COUNT_SIZE: usize = 4;

    /// Size of one symbol/frequency pair
    pub const PAIR_SIZE: usize = 4;

    /// Size of the sample count plus first sample fields
    pub const TRAILER_SIZE: usize = 8;

    /// Build a header from a frequency table that fits in 16-bit weights
    ///
    /// # Errors
    /// `FrequencyOverflow` if the table was not normalized first
    pub fn new(table: &FrequencyTable, sample_count: u32, first_sample: i32) -> CodecResult<Self> {
        let symbols = table
            .iter_nonzero()
            .map(|(symbol, count)| {
                u16::try_from(count)
                    .map(|weight| SymbolWeight { symbol, weight })
                    .map_err(|_| CodecError::FrequencyOverflow { symbol, count })
            })
            .collect::<CodecResult<Vec<_>>>()?;

        Ok(Self {
            symbols,
            sample_count,
            first_sample,
        })
    }

    /// Serialized size in bytes
    pub fn encoded_len(&self) -> usize {
        Self::COUNT_SIZE + self.symbols.len() * Self::PAIR_SIZE + Self::TRAILER_SIZE
    }

    /// Rebuild the frequency table carried by this header
    pub fn frequency_table(&self) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        for pair in &self.symbols {
            table.set(pair.symbol, u32::from(pair.weight));
        }
        table
    }

    /// Append the header to `output`
    pub fn write(&self, output: &mut Vec<u8>) {
        output.reserve(self.encoded_len());

        // symbols.len() <= SYMBOL_SPACE, which fits in u32
        output.extend_from_slice(&(self.symbols.len() as u32).to_be_bytes());
        for pair in &self.symbols {
            output.extend_from_slice(&pair.symbol.to_be_bytes());
            output.extend_from_slice(&pair.weight.to_be_bytes());
        }
        output.extend_from_slice(&self.sample_count.to_be_bytes());
        output.extend_from_slice(&self.first_sample.to_be_bytes());
    }

    /// Parse a header from the front of `buffer`
    ///
    /// Returns the header and the offset where the payload starts. Every
    /// length is checked before the bytes it covers are touched.
    ///
    /// # Errors
    /// * `TruncatedHeader` if the buffer ends inside the header
    /// * `CorruptHeader` if the symbol count exceeds the symbol space, the
    ///   symbols are not strictly ascending, or a frequency is zero
    pub fn read(buffer: &[u8]) -> CodecResult<(Self, usize)> {
        let count_bytes = read_array::<4>(buffer, 0)?;
        let unique = u32::from_be_bytes(count_bytes) as usize;
        if unique > SYMBOL_SPACE {
            return Err(CodecError::CorruptHeader);
        }

        let required = Self::COUNT_SIZE + unique * Self::PAIR_SIZE + Self::TRAILER_SIZE;
        if buffer.len() < required {
            return Err(CodecError::TruncatedHeader {
                required,
                available: buffer.len(),
            });
        }

        let mut symbols = Vec::with_capacity(unique);
        let mut cursor = Self::COUNT_SIZE;
        let mut previous: Option<u16> = None;
        for _ in 0..unique {
            let symbol = u16::from_be_bytes(read_array::<2>(buffer, cursor)?);
            let weight = u16::from_be_bytes(read_array::<2>(buffer, cursor + 2)?);
            cursor += Self::PAIR_SIZE;

            if weight == 0 || previous.map_or(false, |p| symbol <= p) {
                return Err(CodecError::CorruptHeader);
            }
            previous = Some(symbol);
            symbols.push(SymbolWeight { symbol, weight });
        }

        let sample_count = u32::from_be_bytes(read_array::<4>(buffer, cursor)?);
        let first_sample = i32::from_be_bytes(read_array::<4>(buffer, cursor + 4)?);
        cursor += Self::TRAILER_SIZE;

        Ok((
            Self {
                symbols,
                sample_count,
                first_sample,
            },
            cursor,
        ))
    }
}

/// Copy `N` bytes starting at `offset`, or report how far short the buffer is
fn read_array<const N: usize>(buffer: &[u8], offset: usize) -> CodecResult<[u8; N]> {
    buffer
        .get(offset..offset + N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(CodecError::TruncatedHeader {
            required: offset + N,
            available: buffer.len(),
        })
}
