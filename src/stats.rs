//! Round-trip statistics for harnesses and demos

/// Outcome of compressing and restoring one sample sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    /// Samples in the original sequence
    pub sample_count: usize,
    /// Size of the original as 32-bit integers
    pub raw_bytes: usize,
    /// Size of the compressed frame
    pub compressed_bytes: usize,
    /// Samples returned by decompression
    pub restored_count: usize,
    /// Positions in the overlapping prefix where the values differ
    pub mismatches: usize,
}

impl CompressionStats {
    /// Compare an original sequence with its compressed form and restoration
    ///
    /// # Example
    /// ```
    /// use emgcodec::{compress, decompress, CompressionStats};
    ///
    /// let original = [2048, 2050, 2049, 2049, 2049, 2051];
    /// let compressed = compress(&original).unwrap();
    /// let restored = decompress(&compressed).unwrap();
    ///
    /// let stats = CompressionStats::measure(&original, &compressed, &restored);
    /// assert!(stats.is_lossless());
    /// ```
    pub fn measure(original: &[i32], compressed: &[u8], restored: &[i32]) -> Self {
        let mismatches = original
            .iter()
            .zip(restored)
            .filter(|(a, b)| a != b)
            .count();

        Self {
            sample_count: original.len(),
            raw_bytes: core::mem::size_of_val(original),
            compressed_bytes: compressed.len(),
            restored_count: restored.len(),
            mismatches,
        }
    }

    /// Compressed size over raw size (0.0 for empty input)
    pub fn ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.raw_bytes as f64
        }
    }

    /// Whether every sample came back unchanged
    pub fn is_lossless(&self) -> bool {
        self.mismatches == 0 && self.restored_count == self.sample_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_lossless() {
        let stats = CompressionStats::measure(&[1, 2, 3, 4], &[0; 8], &[1, 2, 3, 4]);
        assert_eq!(stats.raw_bytes, 16);
        assert_eq!(stats.compressed_bytes, 8);
        assert_eq!(stats.ratio(), 0.5);
        assert!(stats.is_lossless());
    }

    #[test]
    fn test_measure_mismatches() {
        let stats = CompressionStats::measure(&[1, 2, 3, 4], &[0; 4], &[1, 9, 3]);
        assert_eq!(stats.mismatches, 1);
        assert_eq!(stats.restored_count, 3);
        assert!(!stats.is_lossless());
    }

    #[test]
    fn test_empty_ratio() {
        let stats = CompressionStats::measure(&[], &[], &[]);
        assert_eq!(stats.ratio(), 0.0);
        assert!(stats.is_lossless());
    }
}
