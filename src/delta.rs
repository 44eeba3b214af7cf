//! Delta transformation of sample sequences
//!
//! A sequence is represented by its first sample plus clamped consecutive
//! differences. Differences outside `[DELTA_MIN, DELTA_MAX]` saturate; this
//! loses precision on extreme transitions and is never reported as an error.

use alloc::vec::Vec;

/// Smallest representable delta
pub const DELTA_MIN: i32 = -32768;

/// Largest representable delta
pub const DELTA_MAX: i32 = 32767;

/// Offset mapping a delta to a non-negative symbol index
pub const DELTA_OFFSET: i32 = 32768;

/// Number of distinct delta symbols
pub const SYMBOL_SPACE: usize = 65536;

/// First sample plus clamped differences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaFrame {
    /// Absolute value of `samples[0]`
    pub first: i32,
    /// `clamp(samples[i] - samples[i - 1])` for `i >= 1`
    pub deltas: Vec<i32>,
    /// How many differences saturated
    pub clamped: usize,
}

/// Clamp a raw difference into the delta range
#[inline]
pub fn clamp_delta(diff: i64) -> i32 {
    diff.clamp(DELTA_MIN as i64, DELTA_MAX as i64) as i32
}

/// Map a delta to its table index (`delta + 32768`)
///
/// The delta must already be clamped.
#[inline]
pub fn to_symbol(delta: i32) -> u16 {
    (delta + DELTA_OFFSET) as u16
}

/// Map a table index back to its delta
#[inline]
pub fn from_symbol(symbol: u16) -> i32 {
    symbol as i32 - DELTA_OFFSET
}

/// Delta-encode a sample sequence
///
/// Returns `None` for an empty sequence.
///
/// # Example
/// ```
/// # use emgcodec::delta::encode;
/// let frame = encode(&[10, 13, 11, 14, 12]).unwrap();
/// assert_eq!(frame.first, 10);
/// assert_eq!(frame.deltas, vec![3, -2, 3, -2]);
/// ```
pub fn encode(samples: &[i32]) -> Option<DeltaFrame> {
    let (&first, rest) = samples.split_first()?;

    let mut deltas = Vec::with_capacity(rest.len());
    let mut clamped = 0;
    let mut prev = first;
    for &sample in rest {
        let diff = sample as i64 - prev as i64;
        let delta = clamp_delta(diff);
        if delta as i64 != diff {
            clamped += 1;
        }
        deltas.push(delta);
        prev = sample;
    }

    Some(DeltaFrame {
        first,
        deltas,
        clamped,
    })
}

/// Reconstruct samples by a running prefix sum seeded at `first`
///
/// Output length is `deltas.len() + 1`. The sum wraps rather than
/// overflowing so hostile input can never panic the decoder.
///
/// # Example
/// ```
/// # use emgcodec::delta::decode;
/// assert_eq!(decode(10, &[3, -2, 3, -2]), vec![10, 13, 11, 14, 12]);
/// ```
pub fn decode(first: i32, deltas: &[i32]) -> Vec<i32> {
    let mut output = Vec::with_capacity(deltas.len() + 1);
    output.push(first);

    let mut value = first;
    for &delta in deltas {
        value = value.wrapping_add(delta);
        output.push(value);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_encode_basic() {
        let frame = encode(&[100, 103, 101, 104]).unwrap();
        assert_eq!(frame.first, 100);
        assert_eq!(frame.deltas, vec![3, -2, 3]);
        assert_eq!(frame.clamped, 0);
    }

    #[test]
    fn test_encode_empty_and_single() {
        assert!(encode(&[]).is_none());

        let frame = encode(&[i32::MIN]).unwrap();
        assert_eq!(frame.first, i32::MIN);
        assert!(frame.deltas.is_empty());
    }

    #[test]
    fn test_roundtrip_without_clamping() {
        let samples = [2048, 2050, 2049, 2051, 2048, 2052, 2047, 2053];
        let frame = encode(&samples).unwrap();
        assert_eq!(decode(frame.first, &frame.deltas), samples.to_vec());
    }

    #[test]
    fn test_clamping_is_silent() {
        let frame = encode(&[0, 100_000, 0]).unwrap();
        assert_eq!(frame.deltas, vec![DELTA_MAX, DELTA_MIN]);
        assert_eq!(frame.clamped, 2);

        // Reconstruction reproduces the clamped walk, not the originals
        assert_eq!(decode(frame.first, &frame.deltas), vec![0, 32767, -1]);
    }

    #[test]
    fn test_extreme_difference_does_not_overflow() {
        let frame = encode(&[i32::MIN, i32::MAX]).unwrap();
        assert_eq!(frame.deltas, vec![DELTA_MAX]);
    }

    #[test]
    fn test_boundary_deltas_are_exact() {
        let samples = [0, DELTA_MAX, -1];
        let frame = encode(&samples).unwrap();
        assert_eq!(frame.deltas, vec![DELTA_MAX, DELTA_MIN]);
        assert_eq!(frame.clamped, 0);
    }

    #[test]
    fn test_decode_wraps() {
        assert_eq!(decode(i32::MAX, &[1]), vec![i32::MAX, i32::MIN]);
    }

    #[test]
    fn test_symbol_mapping() {
        assert_eq!(to_symbol(DELTA_MIN), 0);
        assert_eq!(to_symbol(0), 32768);
        assert_eq!(to_symbol(DELTA_MAX), u16::MAX);
        for delta in [DELTA_MIN, -1, 0, 1, DELTA_MAX] {
            assert_eq!(from_symbol(to_symbol(delta)), delta);
        }
    }
}
