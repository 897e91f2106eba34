pub mod bits;
pub mod config;
pub mod consts;
pub mod errors;
pub mod filter;
pub mod hash;
pub mod lexicon;
pub mod session;
pub mod sizing;
pub mod stats;

pub use bits::BitStore;
pub use config::RunConfig;
pub use errors::{Result, WeakpassError};
pub use filter::{BloomFilter, Verdict};
pub use lexicon::{Entries, TextEncoding, WordSource};
pub use session::{build_filter, classify, inspect, run, run_paths, RunSummary};
pub use sizing::{FilterParams, Rounding};
pub use stats::{Reconciler, ReferenceSet, StatsTally};
