use crate::consts::WORD_BITS;

/// Fixed-length bit array, all zero at construction.
///
/// Bits only ever go from 0 to 1; there is no clear or reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitStore {
    len: usize,
    words: Vec<u64>,
}

impl BitStore {
    pub fn new(len: usize) -> Self {
        let words = len.div_ceil(WORD_BITS);
        Self { len, words: vec![0u64; words] }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sets bit `idx`; returns true if it was previously zero.
    #[inline]
    pub fn set_bit(&mut self, idx: usize) -> bool {
        assert!(idx < self.len, "bit index {idx} out of range {}", self.len);
        let (w, mask) = (idx / WORD_BITS, 1u64 << (idx % WORD_BITS));
        let was_clear = self.words[w] & mask == 0;
        self.words[w] |= mask;
        was_clear
    }

    #[inline]
    pub fn test_bit(&self, idx: usize) -> bool {
        assert!(idx < self.len, "bit index {idx} out of range {}", self.len);
        self.words[idx / WORD_BITS] & (1u64 << (idx % WORD_BITS)) != 0
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Heap footprint of the backing words.
    pub fn byte_len(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>()
    }
}
