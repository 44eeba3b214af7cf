//! emgcodec - Lossless delta + Huffman compression for digitized EMG data
//!
//! Compresses a sequence of integer samples into a self-describing frame:
//! the first sample, the sample count and the delta symbol frequencies
//! travel in the header, so a decoder with no prior knowledge rebuilds the
//! exact Huffman tree the encoder used.
//!
//! # Example
//! ```
//! use emgcodec::{compress, decompress};
//!
//! // A quiet muscle with one burst
//! let mut samples = vec![32767i32; 1000];
//! samples[500] = 40000;
//! samples[501] = 36000;
//!
//! let compressed = compress(&samples).expect("Compression failed");
//! assert!(compressed.len() < samples.len() * 4);
//!
//! let restored = decompress(&compressed).expect("Decompression failed");
//! assert_eq!(samples, restored);
//! ```
//!
//! Differences larger than `i16` are clamped during encoding; such
//! sequences come back as the clamped walk rather than the original values.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

extern crate alloc;

pub mod bitwriter;
pub mod delta;
pub mod error;
pub mod frame;
pub mod frequency;
pub mod huffman;
pub mod signal;
pub mod stats;

use alloc::vec::Vec;

// Re-export commonly used types
pub use delta::{DELTA_MAX, DELTA_MIN, DELTA_OFFSET, SYMBOL_SPACE};
pub use error::{CodecError, CodecResult};
pub use frame::FrameHeader;
pub use frequency::{FrequencyTable, FREQUENCY_CAPACITY};
pub use huffman::HuffmanTree;
pub use stats::CompressionStats;

use bitwriter::{BitReader, BitWriter};

/// Compress a sample sequence into a self-contained frame
///
/// Empty input yields empty output. The output depends only on the input
/// values, so compressing the same samples twice gives identical bytes.
///
/// # Errors
/// `SampleCountOverflow` if there are more than `u32::MAX` samples
///
/// # Example
/// ```
/// # use emgcodec::compress;
/// assert!(compress(&[]).unwrap().is_empty());
///
/// let frame = compress(&[5, 5, 5, 5, 5]).unwrap();
/// // 12 fixed header bytes + one symbol pair + one payload byte
/// assert_eq!(frame.len(), 17);
/// ```
pub fn compress(samples: &[i32]) -> CodecResult<Vec<u8>> {
    let Some(frame) = delta::encode(samples) else {
        return Ok(Vec::new());
    };

    let sample_count = u32::try_from(samples.len()).map_err(|_| CodecError::SampleCountOverflow {
        count: samples.len(),
    })?;

    let mut table = FrequencyTable::count(&frame.deltas);
    let normalized = table.normalize(FREQUENCY_CAPACITY);

    let header = FrameHeader::new(&table, sample_count, frame.first)?;
    let mut output = Vec::with_capacity(header.encoded_len() + frame.deltas.len() / 4);
    header.write(&mut output);

    // A single sample has no deltas and therefore no tree or payload
    if let Some(tree) = HuffmanTree::build(&table) {
        let codes = tree.codes()?;
        let mut writer = BitWriter::from_bytes(output);
        for &delta in &frame.deltas {
            codes.for_delta(delta)?.write_to(&mut writer)?;
        }
        output = writer.flush();
    }

    tracing::debug!(
        samples = samples.len(),
        unique_symbols = header.symbols.len(),
        clamped = frame.clamped,
        normalized,
        bytes = output.len(),
        "compressed frame"
    );

    Ok(output)
}

/// Decompress a frame produced by [`compress`]
///
/// Empty input yields empty output. Malformed input never panics or reads
/// out of bounds; it is reported as an error.
///
/// # Errors
/// * `TruncatedHeader` / `CorruptHeader` for a malformed header
/// * `OutOfData` if the payload ends before every delta is decoded
/// * `CorruptTree` if the payload walks off the rebuilt tree
pub fn decompress(input: &[u8]) -> CodecResult<Vec<i32>> {
    decode_frame(input, PayloadEnd::Strict)
}

/// Decompress a possibly truncated frame
///
/// Header validation is identical to [`decompress`], but when the payload
/// runs out of bits the samples recovered so far are returned instead of an
/// `OutOfData` error.
///
/// # Example
/// ```
/// # use emgcodec::{compress, decompress_partial};
/// let samples: Vec<i32> = (0..64).map(|i| (i * 7) % 13).collect();
/// let compressed = compress(&samples).unwrap();
///
/// let restored = decompress_partial(&compressed[..compressed.len() - 4]).unwrap();
/// assert!(restored.len() < samples.len());
/// assert_eq!(restored[..], samples[..restored.len()]);
/// ```
pub fn decompress_partial(input: &[u8]) -> CodecResult<Vec<i32>> {
    decode_frame(input, PayloadEnd::Lenient)
}

/// How to treat a payload that ends early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadEnd {
    Strict,
    Lenient,
}

fn decode_frame(input: &[u8], policy: PayloadEnd) -> CodecResult<Vec<i32>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let (header, payload_start) = FrameHeader::read(input).map_err(|err| {
        tracing::debug!(%err, bytes = input.len(), "rejected frame header");
        err
    })?;

    if header.sample_count == 0 {
        return Ok(Vec::new());
    }

    if header.symbols.is_empty() {
        // Only a lone sample can legitimately carry no symbols
        return Ok(if header.sample_count == 1 {
            alloc::vec![header.first_sample]
        } else {
            Vec::new()
        });
    }

    let tree = HuffmanTree::build(&header.frequency_table()).ok_or(CodecError::CorruptHeader)?;
    let payload = &input[payload_start..];
    let mut reader = BitReader::new(payload);

    let expected = header.sample_count as usize - 1;
    // Every code is at least one bit, so the payload bounds the delta count
    let mut deltas = Vec::with_capacity(expected.min(payload.len() * 8));
    for _ in 0..expected {
        match tree.decode_one(&mut reader) {
            Ok(symbol) => deltas.push(delta::from_symbol(symbol)),
            Err(CodecError::OutOfData) if policy == PayloadEnd::Lenient => break,
            Err(err) => {
                tracing::debug!(
                    %err,
                    decoded = deltas.len(),
                    expected,
                    "payload decode failed"
                );
                return Err(err);
            }
        }
    }

    tracing::debug!(
        samples = deltas.len() + 1,
        unique_symbols = header.symbols.len(),
        bytes = input.len(),
        "decompressed frame"
    );

    Ok(delta::decode(header.first_sample, &deltas))
}
