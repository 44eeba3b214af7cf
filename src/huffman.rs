//! Huffman coding: tree construction, code generation and bit-walk decoding.
//!
//! The tree is rebuilt purely from a frequency table, so the encoder and the
//! decoder arrive at the same tree as long as they see the same table.
//! Nodes live in a flat arena and refer to their children by index; the
//! whole tree is dropped with the call that built it.

use alloc::collections::BinaryHeap;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Reverse;
use core::fmt;

use crate::bitwriter::{BitReader, BitWriter};
use crate::delta::{to_symbol, SYMBOL_SPACE};
use crate::error::{CodecError, CodecResult};
use crate::frequency::FrequencyTable;

/// Longest code the 64-bit code register can hold
pub const MAX_CODE_LENGTH: usize = 64;

/// A node in the Huffman tree.
#[derive(Debug, Clone)]
struct HuffmanNode {
    /// Frequency weight of this node (or subtree).
    weight: u64,
    /// Symbol index for real leaves. `None` for internal nodes and for the
    /// zero-weight sibling added next to a lone symbol.
    symbol: Option<u16>,
    left: Option<usize>,
    right: Option<usize>,
}

impl HuffmanNode {
    fn leaf(symbol: Option<u16>, weight: u64) -> Self {
        Self {
            weight,
            symbol,
            left: None,
            right: None,
        }
    }

    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// A Huffman tree built from a symbol frequency table.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<HuffmanNode>,
    root: usize,
    /// Number of real symbols in the tree.
    leaf_count: usize,
}

impl HuffmanTree {
    /// Build a tree from every nonzero entry of `table`.
    ///
    /// Returns `None` when the table is empty (nothing to encode). A single
    /// symbol gets a zero-weight right sibling so it still receives the
    /// one-bit code `0`.
    ///
    /// Ties between equal weights go to the node that entered the queue
    /// first: leaves in ascending symbol order, then merged parents in
    /// creation order. The smaller node of each pair becomes the left child.
    pub fn build(table: &FrequencyTable) -> Option<Self> {
        let mut nodes: Vec<HuffmanNode> = table
            .iter_nonzero()
            .map(|(symbol, count)| HuffmanNode::leaf(Some(symbol), u64::from(count)))
            .collect();
        let leaf_count = nodes.len();

        match leaf_count {
            0 => return None,
            1 => {
                nodes.push(HuffmanNode::leaf(None, 0));
                nodes.push(HuffmanNode {
                    weight: nodes[0].weight,
                    symbol: None,
                    left: Some(0),
                    right: Some(1),
                });
                return Some(Self {
                    nodes,
                    root: 2,
                    leaf_count,
                });
            }
            _ => {}
        }

        // Keyed on (weight, arena index); arena order is insertion order
        let mut heap: BinaryHeap<Reverse<(u64, usize)>> = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| Reverse((node.weight, idx)))
            .collect();

        while heap.len() > 1 {
            let (Some(Reverse((left_weight, left))), Some(Reverse((right_weight, right)))) =
                (heap.pop(), heap.pop())
            else {
                break;
            };

            let weight = left_weight + right_weight;
            let parent = nodes.len();
            nodes.push(HuffmanNode {
                weight,
                symbol: None,
                left: Some(left),
                right: Some(right),
            });
            heap.push(Reverse((weight, parent)));
        }

        let Reverse((_, root)) = heap.pop()?;

        tracing::trace!(
            symbols = leaf_count,
            nodes = nodes.len(),
            root_weight = nodes[root].weight,
            "built huffman tree"
        );

        Some(Self {
            nodes,
            root,
            leaf_count,
        })
    }

    /// Number of real symbols in the tree.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Total weight at the root.
    pub fn root_weight(&self) -> u64 {
        self.nodes[self.root].weight
    }

    /// Assign every real leaf its root-to-leaf path (`0` = left, `1` = right).
    ///
    /// # Errors
    /// `CodeLengthOverflow` if a leaf sits deeper than 64 levels, which a
    /// table normalized to 16-bit weights can never produce.
    pub fn codes(&self) -> CodecResult<CodeTable> {
        let mut table = CodeTable::new();
        // Explicit stack: (node, code so far, depth)
        let mut stack = vec![(self.root, 0u64, 0usize)];

        while let Some((idx, bits, depth)) = stack.pop() {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                if let Some(symbol) = node.symbol {
                    table.insert(symbol, Code::new(bits, depth as u8));
                }
                continue;
            }

            if depth + 1 > MAX_CODE_LENGTH {
                return Err(CodecError::CodeLengthOverflow { length: depth + 1 });
            }
            if let Some(right) = node.right {
                stack.push((right, (bits << 1) | 1, depth + 1));
            }
            if let Some(left) = node.left {
                stack.push((left, bits << 1, depth + 1));
            }
        }

        Ok(table)
    }

    /// Walk the tree one bit at a time until a symbol leaf is reached.
    ///
    /// # Errors
    /// * `OutOfData` if the reader runs dry mid-code
    /// * `CorruptTree` if the walk follows a missing child or lands on the
    ///   padding leaf of a single-symbol tree
    pub fn decode_one(&self, reader: &mut BitReader<'_>) -> CodecResult<u16> {
        let mut idx = self.root;
        loop {
            let node = self.nodes.get(idx).ok_or(CodecError::CorruptTree)?;
            if node.is_leaf() {
                return node.symbol.ok_or(CodecError::CorruptTree);
            }

            let next = if reader.read_bit()? {
                node.right
            } else {
                node.left
            };
            idx = next.ok_or(CodecError::CorruptTree)?;
        }
    }
}

/// A prefix code: the low `len` bits of `bits`, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Code {
    bits: u64,
    len: u8,
}

impl Code {
    /// Create a code from its bit pattern and length.
    pub const fn new(bits: u64, len: u8) -> Self {
        Self { bits, len }
    }

    /// Code bits, right-aligned.
    pub const fn bits(self) -> u64 {
        self.bits
    }

    /// Code length in bits.
    pub const fn len(self) -> u8 {
        self.len
    }

    /// Whether this is the empty code (no entry).
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Append this code to a bit stream.
    pub fn write_to(self, writer: &mut BitWriter) -> CodecResult<()> {
        writer.write_bits(self.bits, self.len)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.len).rev() {
            let bit = if (self.bits >> i) & 1 == 1 { '1' } else { '0' };
            fmt::Write::write_char(f, bit)?;
        }
        Ok(())
    }
}

/// Lookup table from symbol index to its code.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Code>,
}

impl CodeTable {
    fn new() -> Self {
        Self {
            codes: vec![Code::default(); SYMBOL_SPACE],
        }
    }

    fn insert(&mut self, symbol: u16, code: Code) {
        self.codes[symbol as usize] = code;
    }

    /// Code for a symbol index, if the symbol is in the tree.
    pub fn get(&self, symbol: u16) -> Option<Code> {
        let code = self.codes[symbol as usize];
        (!code.is_empty()).then_some(code)
    }

    /// Code for a (clamped) delta value.
    pub fn for_delta(&self, delta: i32) -> CodecResult<Code> {
        let symbol = to_symbol(delta);
        self.get(symbol)
            .ok_or(CodecError::UnknownSymbol { symbol })
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| !c.is_empty()).count()
    }

    /// Whether no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total payload bits needed to encode `deltas`.
    pub fn encoded_bits(&self, deltas: &[i32]) -> CodecResult<u64> {
        deltas.iter().try_fold(0u64, |acc, &delta| {
            Ok(acc + u64::from(self.for_delta(delta)?.len()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn table_from(pairs: &[(u16, u32)]) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        for &(symbol, count) in pairs {
            table.set(symbol, count);
        }
        table
    }

    #[test]
    fn test_empty_table_has_no_tree() {
        assert!(HuffmanTree::build(&FrequencyTable::new()).is_none());
    }

    #[test]
    fn test_single_symbol_gets_code_zero() {
        let table = table_from(&[(to_symbol(0), 42)]);
        let tree = HuffmanTree::build(&table).unwrap();
        assert_eq!(tree.leaf_count(), 1);

        let codes = tree.codes().unwrap();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes.for_delta(0).unwrap().to_string(), "0");
    }

    #[test]
    fn test_single_symbol_padding_branch_is_corrupt() {
        let table = table_from(&[(7, 3)]);
        let tree = HuffmanTree::build(&table).unwrap();

        let buffer = [0b0100_0000];
        let mut reader = BitReader::new(&buffer);
        assert_eq!(tree.decode_one(&mut reader), Ok(7));
        assert_eq!(tree.decode_one(&mut reader), Err(CodecError::CorruptTree));
    }

    #[test]
    fn test_code_lengths_follow_frequencies() {
        // Classic example: weights 45, 13, 12, 16, 9, 5
        let table = table_from(&[(0, 45), (1, 13), (2, 12), (3, 16), (4, 9), (5, 5)]);
        let tree = HuffmanTree::build(&table).unwrap();
        assert_eq!(tree.root_weight(), 100);

        let codes = tree.codes().unwrap();
        let lengths: Vec<u8> = (0..6).map(|s| codes.get(s).unwrap().len()).collect();
        assert_eq!(lengths, vec![1, 3, 3, 3, 4, 4]);
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let table = table_from(&[(10, 1), (11, 1), (12, 2), (13, 3), (14, 5), (15, 8)]);
        let codes = HuffmanTree::build(&table).unwrap().codes().unwrap();

        let all: Vec<Code> = (10..16).map(|s| codes.get(s).unwrap()).collect();
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                if i == j || a.len() > b.len() {
                    continue;
                }
                let prefix = b.bits() >> (b.len() - a.len());
                assert_ne!(prefix, a.bits(), "{} is a prefix of {}", a, b);
            }
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let table = table_from(&[(1, 4), (2, 4), (3, 4), (4, 4), (5, 4)]);
        let first = HuffmanTree::build(&table).unwrap().codes().unwrap();
        let second = HuffmanTree::build(&table).unwrap().codes().unwrap();
        for symbol in 1..6 {
            assert_eq!(first.get(symbol), second.get(symbol));
        }
    }

    #[test]
    fn test_encode_decode_symbols() {
        let table = table_from(&[(100, 50), (200, 20), (300, 20), (400, 10)]);
        let tree = HuffmanTree::build(&table).unwrap();
        let codes = tree.codes().unwrap();

        let message = [100u16, 400, 200, 100, 300, 100];
        let mut writer = BitWriter::new();
        for &symbol in &message {
            codes.get(symbol).unwrap().write_to(&mut writer).unwrap();
        }
        let buffer = writer.flush();

        let mut reader = BitReader::new(&buffer);
        for &symbol in &message {
            assert_eq!(tree.decode_one(&mut reader).unwrap(), symbol);
        }
    }

    #[test]
    fn test_decode_runs_out_of_bits() {
        let table = table_from(&[(1, 1), (2, 1), (3, 1), (4, 1)]);
        let tree = HuffmanTree::build(&table).unwrap();

        let mut reader = BitReader::new(&[]);
        assert_eq!(tree.decode_one(&mut reader), Err(CodecError::OutOfData));
    }

    #[test]
    fn test_encoded_bits_and_unknown_symbol() {
        let deltas = [0, 0, 0, 1];
        let table = FrequencyTable::count(&deltas);
        let codes = HuffmanTree::build(&table).unwrap().codes().unwrap();

        assert_eq!(codes.encoded_bits(&deltas).unwrap(), 4);
        assert_eq!(
            codes.for_delta(5),
            Err(CodecError::UnknownSymbol {
                symbol: to_symbol(5)
            })
        );
    }

    #[test]
    fn test_code_display() {
        assert_eq!(Code::new(0b0110, 4).to_string(), "0110");
        assert_eq!(Code::new(1, 1).to_string(), "1");
        assert_eq!(Code::default().to_string(), "");
    }
}
