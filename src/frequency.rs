//! Frequency analysis for delta streams.
//!
//! Counts how often each delta symbol occurs and rescales the counts into
//! the 16-bit range carried by the frame header without dropping symbols.

use alloc::vec;
use alloc::vec::Vec;

use crate::delta::{to_symbol, SYMBOL_SPACE};

/// Largest frequency the wire format can carry
pub const FREQUENCY_CAPACITY: u32 = u16::MAX as u32;

/// A frequency table over the 65536 delta symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    /// Count of each symbol (index = `delta + 32768`).
    counts: Vec<u32>,
}

impl FrequencyTable {
    /// Create a new, zeroed frequency table.
    pub fn new() -> Self {
        Self {
            counts: vec![0u32; SYMBOL_SPACE],
        }
    }

    /// Tally occurrences of each delta.
    ///
    /// Deltas must already be clamped to the symbol range.
    pub fn count(deltas: &[i32]) -> Self {
        let mut table = Self::new();
        for &delta in deltas {
            let slot = &mut table.counts[to_symbol(delta) as usize];
            *slot = slot.saturating_add(1);
        }
        table
    }

    /// Get the count for a symbol index.
    pub fn get(&self, symbol: u16) -> u32 {
        self.counts[symbol as usize]
    }

    /// Set the count for a symbol index.
    pub fn set(&mut self, symbol: u16, count: u32) {
        self.counts[symbol as usize] = count;
    }

    /// Largest count in the table (0 if empty).
    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Number of symbols with a nonzero count.
    pub fn used(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// Whether every count is zero.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Nonzero `(symbol, count)` pairs in increasing symbol order.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (u16, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(i, &c)| (i as u16, c))
    }

    /// Rescale counts so none exceeds `capacity`.
    ///
    /// When the largest count is above `capacity`, every nonzero count
    /// becomes `max(1, round(count * capacity / max))`. Otherwise the table
    /// is left alone. The set of nonzero symbols never changes.
    ///
    /// Returns whether any rescaling happened.
    pub fn normalize(&mut self, capacity: u32) -> bool {
        let max = self.max();
        if max <= capacity {
            return false;
        }

        let max = u64::from(max);
        let capacity = u64::from(capacity);
        for count in self.counts.iter_mut().filter(|c| **c > 0) {
            let scaled = (u64::from(*count) * capacity + max / 2) / max;
            // scaled <= capacity, which came from a u32
            *count = scaled.max(1) as u32;
        }

        true
    }

    /// Compute the Shannon entropy of the distribution (in bits per symbol).
    ///
    /// Returns 0.0 if the table is empty.
    #[cfg(feature = "std")]
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;
        self.counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let prob = c as f64 / total;
                -prob * prob.log2()
            })
            .sum()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
