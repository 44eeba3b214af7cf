//! Error types for emgcodec
//!
//! All errors are `Copy` and carry only primitive values so they can be
//! returned from `no_std` builds without allocation.

use core::fmt;

/// Result type alias for emgcodec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Error types returned by compression/decompression operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Buffer is shorter than the header says it should be
    TruncatedHeader {
        /// Number of bytes the header requires
        required: usize,
        /// Number of bytes actually available
        available: usize,
    },

    /// Header declares counts or symbols outside the structural limits
    CorruptHeader,

    /// Bit traversal left the Huffman tree before reaching a symbol leaf
    CorruptTree,

    /// Bit reader exhausted the payload
    OutOfData,

    /// More samples than the 32-bit sample count field can describe
    SampleCountOverflow {
        /// Number of samples supplied
        count: usize,
    },

    /// A frequency did not fit the 16-bit wire field (table not normalized)
    FrequencyOverflow {
        /// Table index of the offending symbol
        symbol: u16,
        /// Count that was too large
        count: u32,
    },

    /// A delta had no entry in the code table
    UnknownSymbol {
        /// Table index of the missing symbol
        symbol: u16,
    },

    /// A generated code was longer than the 64-bit code register
    CodeLengthOverflow {
        /// Depth of the offending leaf
        length: usize,
    },

    /// Bit width passed to the BitWriter is outside 1..=64
    BitPositionOverflow,
}

impl CodecError {
    /// Convert error to a numeric error code for FFI boundaries
    ///
    /// Error codes are stable and documented.
    pub const fn to_error_code(self) -> i32 {
        match self {
            CodecError::TruncatedHeader { .. } => -1,
            CodecError::CorruptHeader => -2,
            CodecError::CorruptTree => -3,
            CodecError::OutOfData => -4,
            CodecError::SampleCountOverflow { .. } => -5,
            CodecError::FrequencyOverflow { .. } => -6,
            CodecError::UnknownSymbol { .. } => -7,
            CodecError::CodeLengthOverflow { .. } => -8,
            CodecError::BitPositionOverflow => -9,
        }
    }

    /// Create error from error code (for FFI boundaries)
    pub const fn from_error_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(CodecError::TruncatedHeader {
                required: 0,
                available: 0,
            }),
            -2 => Some(CodecError::CorruptHeader),
            -3 => Some(CodecError::CorruptTree),
            -4 => Some(CodecError::OutOfData),
            -5 => Some(CodecError::SampleCountOverflow { count: 0 }),
            -6 => Some(CodecError::FrequencyOverflow {
                symbol: 0,
                count: 0,
            }),
            -7 => Some(CodecError::UnknownSymbol { symbol: 0 }),
            -8 => Some(CodecError::CodeLengthOverflow { length: 0 }),
            -9 => Some(CodecError::BitPositionOverflow),
            _ => None,
        }
    }

    /// Whether this error came from malformed compressed input
    pub const fn is_corrupt_input(self) -> bool {
        matches!(
            self,
            CodecError::TruncatedHeader { .. }
                | CodecError::CorruptHeader
                | CodecError::CorruptTree
                | CodecError::OutOfData
        )
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::TruncatedHeader {
                required,
                available,
            } => {
                write!(
                    f,
                    "Truncated header: {} bytes required, {} available",
                    required, available
                )
            }
            CodecError::CorruptHeader => {
                write!(f, "Corrupted frame header (counts or symbols out of range)")
            }
            CodecError::CorruptTree => {
                write!(f, "Bit traversal left the Huffman tree")
            }
            CodecError::OutOfData => {
                write!(f, "Out of data (truncated payload)")
            }
            CodecError::SampleCountOverflow { count } => {
                write!(f, "Sample count {} exceeds the 32-bit frame limit", count)
            }
            CodecError::FrequencyOverflow { symbol, count } => {
                write!(
                    f,
                    "Frequency {} of symbol {} does not fit a 16-bit field",
                    count, symbol
                )
            }
            CodecError::UnknownSymbol { symbol } => {
                write!(f, "Symbol {} has no Huffman code", symbol)
            }
            CodecError::CodeLengthOverflow { length } => {
                write!(f, "Huffman code length {} exceeds 64 bits", length)
            }
            CodecError::BitPositionOverflow => {
                write!(f, "Bit width out of range in BitWriter")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CodecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_roundtrip() {
        let errors = [
            CodecError::TruncatedHeader {
                required: 12,
                available: 3,
            },
            CodecError::CorruptHeader,
            CodecError::CorruptTree,
            CodecError::OutOfData,
            CodecError::SampleCountOverflow { count: 1 << 20 },
            CodecError::FrequencyOverflow {
                symbol: 32768,
                count: 70_000,
            },
            CodecError::UnknownSymbol { symbol: 7 },
            CodecError::CodeLengthOverflow { length: 65 },
            CodecError::BitPositionOverflow,
        ];

        for error in &errors {
            let code = error.to_error_code();
            let reconstructed = CodecError::from_error_code(code);
            assert!(reconstructed.is_some());
            // Parameter details are lost, only the discriminant survives
            assert_eq!(reconstructed.unwrap().to_error_code(), code);
        }
    }

    #[test]
    fn test_invalid_error_code() {
        assert!(CodecError::from_error_code(0).is_none());
        assert!(CodecError::from_error_code(100).is_none());
        assert!(CodecError::from_error_code(-100).is_none());
    }

    #[test]
    fn test_corrupt_input_classification() {
        assert!(CodecError::CorruptTree.is_corrupt_input());
        assert!(CodecError::OutOfData.is_corrupt_input());
        assert!(!CodecError::SampleCountOverflow { count: 0 }.is_corrupt_input());
        assert!(!CodecError::BitPositionOverflow.is_corrupt_input());
    }

    #[test]
    #[cfg(feature = "std")]
    fn test_error_display() {
        let err = CodecError::TruncatedHeader {
            required: 20,
            available: 9,
        };
        let display = format!("{}", err);
        assert!(display.contains("20"));
        assert!(display.contains("9"));

        let err = CodecError::FrequencyOverflow {
            symbol: 32768,
            count: 70_000,
        };
        let display = format!("{}", err);
        assert!(display.contains("32768"));
        assert!(display.contains("70000"));
    }
}
