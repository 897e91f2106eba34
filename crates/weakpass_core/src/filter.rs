//! Bloom filter over string items, sized from a target false-positive rate.
//!
//! `Absent` is always exact; `PossiblyPresent` may be a false positive.
use crate::bits::BitStore;
use crate::consts::{LABEL_ABSENT, LABEL_POSSIBLY_PRESENT};
use crate::errors::Result;
use crate::hash::buckets;
use crate::sizing::{estimated_fp_rate, FilterParams, Rounding};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Absent,
    PossiblyPresent,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Absent => LABEL_ABSENT,
            Verdict::PossiblyPresent => LABEL_POSSIBLY_PRESENT,
        }
    }

    pub fn is_possibly_present(self) -> bool {
        self == Verdict::PossiblyPresent
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug)]
pub struct BloomFilter {
    params: FilterParams,
    bits: BitStore,
    inserted: u64,
}

impl BloomFilter {
    pub fn new(expected_items: u64, fp_rate: f64) -> Result<Self> {
        Self::with_rounding(expected_items, fp_rate, Rounding::default())
    }

    pub fn with_rounding(expected_items: u64, fp_rate: f64, rounding: Rounding) -> Result<Self> {
        Ok(Self::with_params(FilterParams::plan(expected_items, fp_rate, rounding)?))
    }

    pub fn with_params(params: FilterParams) -> Self {
        let size = params.size.max(1);
        let hash_count = params.hash_count.max(1);
        let params = FilterParams { size, hash_count, ..params };
        Self { params, bits: BitStore::new(size), inserted: 0 }
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    pub fn size(&self) -> usize {
        self.params.size
    }

    pub fn hash_count(&self) -> u32 {
        self.params.hash_count
    }

    /// Number of non-empty insert calls, duplicates included.
    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    /// Empty items are ignored.
    pub fn insert(&mut self, item: &str) {
        if item.is_empty() {
            return;
        }
        for idx in buckets(item.as_bytes(), self.params.hash_count, self.params.size) {
            self.bits.set_bit(idx);
        }
        self.inserted += 1;
    }

    pub fn check(&self, item: &str) -> Verdict {
        // never inserted, so the answer is exact
        if item.is_empty() {
            return Verdict::Absent;
        }
        let all_set = buckets(item.as_bytes(), self.params.hash_count, self.params.size)
            .all(|idx| self.bits.test_bit(idx));
        if all_set {
            Verdict::PossiblyPresent
        } else {
            Verdict::Absent
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.check(item).is_possibly_present()
    }

    pub fn set_bits(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn fill_ratio(&self) -> f64 {
        self.set_bits() as f64 / self.params.size as f64
    }

    /// Theoretical false-positive rate for the items inserted so far.
    pub fn estimated_fp_rate(&self) -> f64 {
        estimated_fp_rate(self.params.size, self.params.hash_count, self.inserted)
    }

    pub fn byte_len(&self) -> usize {
        self.bits.byte_len()
    }

    #[cfg(test)]
    pub(crate) fn bits(&self) -> &BitStore {
        &self.bits
    }
}

impl<'a> Extend<&'a str> for BloomFilter {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}
