//! Seeded index derivation for the filter.
//!
//! Every bit position is `murmur3_32(item, seed) as i32` reduced with
//! Euclidean modulo over the filter size, for seeds `0..hash_count`.
//! The function is pure, so fixtures built from it are stable across runs
//! and platforms.

use std::io::Cursor;

/// MurmurHash3, x86 32-bit variant.
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    murmur3::murmur3_32(&mut Cursor::new(data), seed)
        .expect("reading from an in-memory slice cannot fail")
}

/// Maps `(item, seed)` onto `[0, size)`. `size` must be non-zero.
#[inline]
pub fn bucket(item: &[u8], seed: u32, size: usize) -> usize {
    debug_assert!(size > 0);
    let signed = murmur3_32(item, seed) as i32 as i64;
    signed.rem_euclid(size as i64) as usize
}

/// All `hash_count` indices for one item, in seed order.
pub fn buckets(item: &[u8], hash_count: u32, size: usize) -> impl Iterator<Item = usize> + '_ {
    (0..hash_count).map(move |seed| bucket(item, seed, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn murmur_known_vectors() {
        assert_eq!(murmur3_32(b"", 0), 0);
        assert_eq!(murmur3_32(b"", 1), 0x514e_28b7);
        assert_eq!(murmur3_32(b"", 0xffff_ffff), 0x81f1_6f39);
        assert_eq!(murmur3_32(b"foo", 0) as i32, -156_908_512);
        assert_eq!(murmur3_32(b"foo", 42) as i32, -1_322_301_282);
        assert_eq!(murmur3_32(b"hello", 0), 613_153_351);
        assert_eq!(murmur3_32(b"Hello, world!", 1234), 0xfaf6_cdb3);
    }

    #[test]
    fn bucket_is_deterministic() {
        for seed in 0..16 {
            let a = bucket(b"password1", seed, 1_000_003);
            let b = bucket(b"password1", seed, 1_000_003);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn negative_hashes_wrap_into_range() {
        // murmur3("alpha", 0) has the high bit set
        assert!((murmur3_32(b"alpha", 0) as i32) < 0);
        assert_eq!(bucket(b"alpha", 0, 18), 17);
        let idx: Vec<usize> = buckets(b"alpha", 4, 18).collect();
        assert_eq!(idx, vec![17, 17, 7, 2]);
    }

    #[test]
    fn seeds_spread_indices() {
        let idx: Vec<usize> = buckets(b"correct horse battery staple", 8, 1 << 20).collect();
        let mut uniq = idx.clone();
        uniq.sort_unstable();
        uniq.dedup();
        assert!(uniq.len() >= 7, "seeds collapsed: {idx:?}");
        assert!(idx.iter().all(|&i| i < 1 << 20));
    }

    #[test]
    fn size_one_always_maps_to_zero() {
        assert!(buckets(b"anything", 5, 1).all(|i| i == 0));
    }
}
