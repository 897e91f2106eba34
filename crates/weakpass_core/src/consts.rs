// crates/weakpass_core/src/consts.rs

/// False-positive probability used when none is configured.
pub const DEFAULT_FP_RATE: f64 = 0.05;

pub const LABEL_POSSIBLY_PRESENT: &str = "maybe";
pub const LABEL_ABSENT: &str = "no";

pub const STATS_HEADER: &str = "===== Statistics =====";
pub const LABEL_TRUE_POSITIVES: &str = "True Positives";
pub const LABEL_TRUE_NEGATIVES: &str = "True Negatives";
pub const LABEL_FALSE_POSITIVES: &str = "False Positives";
pub const LABEL_FALSE_NEGATIVES: &str = "False Negatives";

/// Bits per storage word in the bit store.
pub const WORD_BITS: usize = u64::BITS as usize;
