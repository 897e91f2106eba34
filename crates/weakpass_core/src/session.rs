//! One full run: size the filter from the corpus, build it, then classify
//! every candidate word.
//!
//! The filter is borrowed mutably only while it is built, so no query can
//! observe a partially populated filter.

use crate::config::RunConfig;
use crate::errors::{Result, WeakpassError};
use crate::filter::BloomFilter;
use crate::lexicon::{TextEncoding, WordSource};
use crate::sizing::{validate_fp_rate, FilterParams, Rounding};
use crate::stats::{Reconciler, ReferenceSet, StatsTally};
use std::io::Write;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub params: FilterParams,
    pub inserted: u64,
    pub queried: u64,
    pub possibly_present: u64,
    /// Present when statistics were requested.
    pub stats: Option<StatsTally>,
}

/// Counts the corpus, plans the filter and builds it in a single insert pass.
/// When `reference` is given it is filled from the same pass.
pub fn build_filter(
    corpus: &WordSource,
    fp_rate: f64,
    rounding: Rounding,
    mut reference: Option<&mut ReferenceSet>,
) -> Result<BloomFilter> {
    validate_fp_rate(fp_rate)?;
    let n = corpus.count_entries()?;
    if n == 0 {
        return Err(WeakpassError::invalid(format!(
            "corpus {} has no entries",
            corpus.path().display()
        )));
    }
    let params = FilterParams::plan(n, fp_rate, rounding)?;
    info!(
        expected_items = params.expected_items,
        size = params.size,
        hash_count = params.hash_count,
        fp_rate = params.fp_rate,
        "planned filter"
    );

    let mut filter = BloomFilter::with_params(params);
    for word in corpus.entries()? {
        let word = word?;
        filter.insert(&word);
        if let Some(set) = reference.as_deref_mut() {
            set.insert(word);
        }
    }
    info!(
        inserted = filter.inserted(),
        fill_ratio = filter.fill_ratio(),
        "filter built"
    );
    Ok(filter)
}

/// Writes one label line per query, in source order, to `out`.
pub fn classify<W: Write>(
    filter: &BloomFilter,
    queries: &WordSource,
    reference: Option<&ReferenceSet>,
    out: &mut W,
) -> Result<(u64, u64, Option<StatsTally>)> {
    let mut reconciler = Reconciler::new(filter, reference);
    for word in queries.entries()? {
        let word = word?;
        if let Some(verdict) = reconciler.classify(&word) {
            writeln!(out, "{verdict}")?;
        }
    }
    let (queried, positives) = (reconciler.queried(), reconciler.possibly_present());
    debug!(queried, possibly_present = positives, "queries classified");
    Ok((queried, positives, reconciler.tally()))
}

pub fn run<W: Write>(cfg: &RunConfig, out: &mut W) -> Result<RunSummary> {
    cfg.validate()?;
    let (Some(corpus), Some(queries)) = (&cfg.corpus, &cfg.queries) else {
        return Err(WeakpassError::invalid("corpus and queries paths are required"));
    };
    let corpus = WordSource::new(corpus, cfg.encoding);
    let queries = WordSource::new(queries, cfg.encoding);

    let mut reference = cfg.stats.then(ReferenceSet::new);
    let filter = build_filter(&corpus, cfg.fp_rate, cfg.rounding, reference.as_mut())?;

    let (queried, possibly_present, stats) = classify(&filter, &queries, reference.as_ref(), out)?;
    if let Some(t) = &stats {
        write!(out, "{t}")?;
        t.log_health(cfg.fp_rate);
    }
    out.flush()?;
    info!(queried, possibly_present, "run complete");

    Ok(RunSummary {
        params: *filter.params(),
        inserted: filter.inserted(),
        queried,
        possibly_present,
        stats,
    })
}

/// Builds a filter from `corpus` without querying it.
pub fn inspect(corpus: &WordSource, fp_rate: f64, rounding: Rounding) -> Result<BloomFilter> {
    build_filter(corpus, fp_rate, rounding, None)
}

/// Defaults for callers that only have two paths.
pub fn run_paths<W: Write>(
    corpus: impl Into<std::path::PathBuf>,
    queries: impl Into<std::path::PathBuf>,
    out: &mut W,
) -> Result<RunSummary> {
    let cfg = RunConfig {
        corpus: Some(corpus.into()),
        queries: Some(queries.into()),
        encoding: TextEncoding::Latin1,
        ..RunConfig::default()
    };
    run(&cfg, out)
}
