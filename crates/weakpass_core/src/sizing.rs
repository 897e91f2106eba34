//! Capacity planning from an expected item count and a target
//! false-positive probability.
//!
//! `m = -(n * ln p) / ln(2)^2` bits and `k = (m / n) * ln 2` hashes.

use crate::errors::{Result, WeakpassError};
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;

/// How the real-valued `m` and `k` are turned into integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    /// Truncate both toward zero. Compatible with existing fixtures.
    #[default]
    Truncate,
    /// `ceil` the size and round the hash count to nearest.
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub expected_items: u64,
    pub fp_rate: f64,
    pub size: usize,
    pub hash_count: u32,
}

pub fn validate_fp_rate(p: f64) -> Result<()> {
    if !p.is_finite() || p <= 0.0 || p >= 1.0 {
        return Err(WeakpassError::invalid(format!(
            "false-positive probability must be in (0, 1), got {p}"
        )));
    }
    Ok(())
}

/// Bit-array length for `n` items at probability `p`, at least 1.
pub fn optimal_size(n: u64, p: f64, rounding: Rounding) -> Result<usize> {
    if n == 0 {
        return Err(WeakpassError::invalid("expected item count must be positive"));
    }
    validate_fp_rate(p)?;
    let m = -(n as f64 * p.ln()) / (LN_2 * LN_2);
    let m = match rounding {
        Rounding::Truncate => m.trunc(),
        Rounding::Standard => m.ceil(),
    };
    Ok((m as usize).max(1))
}

/// Number of hash derivations for a `size`-bit array holding `n` items, at least 1.
pub fn optimal_hash_count(size: usize, n: u64, rounding: Rounding) -> Result<u32> {
    if n == 0 {
        return Err(WeakpassError::invalid("expected item count must be positive"));
    }
    let k = (size as f64 / n as f64) * LN_2;
    let k = match rounding {
        Rounding::Truncate => k.trunc(),
        Rounding::Standard => k.round(),
    };
    Ok((k as u32).max(1))
}

/// Probability that a never-inserted item tests positive after `inserted` inserts.
pub fn estimated_fp_rate(size: usize, hash_count: u32, inserted: u64) -> f64 {
    if size == 0 {
        return 1.0;
    }
    let k = hash_count as f64;
    let exp = -(k * inserted as f64) / size as f64;
    (1.0 - exp.exp()).powf(k)
}

impl FilterParams {
    pub fn plan(expected_items: u64, fp_rate: f64, rounding: Rounding) -> Result<Self> {
        let size = optimal_size(expected_items, fp_rate, rounding)?;
        let hash_count = optimal_hash_count(size, expected_items, rounding)?;
        Ok(Self { expected_items, fp_rate, size, hash_count })
    }

    /// Rate expected once exactly `expected_items` have been inserted.
    pub fn expected_fp_rate(&self) -> f64 {
        estimated_fp_rate(self.size, self.hash_count, self.expected_items)
    }

    pub fn byte_len(&self) -> usize {
        self.size.div_ceil(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncating_fixtures() {
        let p = FilterParams::plan(3, 0.05, Rounding::Truncate).unwrap();
        assert_eq!((p.size, p.hash_count), (18, 4));
        let p = FilterParams::plan(1000, 0.01, Rounding::Truncate).unwrap();
        assert_eq!((p.size, p.hash_count), (9585, 6));
        let p = FilterParams::plan(100, 0.05, Rounding::Truncate).unwrap();
        assert_eq!((p.size, p.hash_count), (623, 4));
    }

    #[test]
    fn standard_rounding_fixtures() {
        let p = FilterParams::plan(3, 0.05, Rounding::Standard).unwrap();
        assert_eq!((p.size, p.hash_count), (19, 4));
        let p = FilterParams::plan(1000, 0.01, Rounding::Standard).unwrap();
        assert_eq!((p.size, p.hash_count), (9586, 7));
    }

    #[test]
    fn minimums_are_one() {
        // m = 1/ln2 ~ 1.44, k = ln2 ~ 0.69
        let p = FilterParams::plan(1, 0.5, Rounding::Truncate).unwrap();
        assert_eq!((p.size, p.hash_count), (1, 1));
        let p = FilterParams::plan(1, 0.99, Rounding::Truncate).unwrap();
        assert_eq!(p.size, 1);
        assert_eq!(p.hash_count, 1);
    }

    #[test]
    fn plan_is_pure() {
        let a = FilterParams::plan(12_345, 0.001, Rounding::Truncate).unwrap();
        let b = FilterParams::plan(12_345, 0.001, Rounding::Truncate).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_zero_items() {
        let err = FilterParams::plan(0, 0.05, Rounding::Truncate).unwrap_err();
        assert!(matches!(err, WeakpassError::InvalidArgument(_)));
        assert!(optimal_hash_count(10, 0, Rounding::Standard).is_err());
    }

    #[test]
    fn rejects_bad_probabilities() {
        for p in [0.0, 1.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            let err = FilterParams::plan(10, p, Rounding::Truncate).unwrap_err();
            assert!(matches!(err, WeakpassError::InvalidArgument(_)), "p={p}");
        }
    }

    #[test]
    fn expected_rate_tracks_target() {
        let p = FilterParams::plan(100_000, 0.05, Rounding::Standard).unwrap();
        let est = p.expected_fp_rate();
        assert!((est - 0.05).abs() < 0.005, "estimate {est}");
        assert_eq!(estimated_fp_rate(p.size, p.hash_count, 0), 0.0);
    }
}
