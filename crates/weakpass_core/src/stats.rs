use crate::consts::{
    LABEL_FALSE_NEGATIVES, LABEL_FALSE_POSITIVES, LABEL_TRUE_NEGATIVES, LABEL_TRUE_POSITIVES,
    STATS_HEADER,
};
use crate::filter::{BloomFilter, Verdict};
use std::collections::HashSet;
use std::fmt;
use tracing::{error, warn};

/// Exact membership, used as ground truth for the filter's answers.
#[derive(Debug, Default, Clone)]
pub struct ReferenceSet {
    words: HashSet<String>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: impl Into<String>) {
        self.words.insert(word.into());
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

impl<S: Into<String>> FromIterator<S> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ReferenceSet::new();
        for w in iter {
            set.insert(w);
        }
        set
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsTally {
    pub true_positives: u64,
    pub true_negatives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
}

impl StatsTally {
    pub fn record(&mut self, verdict: Verdict, in_reference: bool) {
        match (verdict, in_reference) {
            (Verdict::PossiblyPresent, true) => self.true_positives += 1,
            (Verdict::Absent, false) => self.true_negatives += 1,
            (Verdict::PossiblyPresent, false) => self.false_positives += 1,
            (Verdict::Absent, true) => self.false_negatives += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// `fp / (fp + tn)`; zero when no negatives were queried.
    pub fn observed_fp_rate(&self) -> f64 {
        let negatives = self.false_positives + self.true_negatives;
        if negatives == 0 {
            0.0
        } else {
            self.false_positives as f64 / negatives as f64
        }
    }

    /// Logs the tally; false negatives mean the filter is broken.
    pub fn log_health(&self, target_fp_rate: f64) {
        if self.false_negatives > 0 {
            error!(
                false_negatives = self.false_negatives,
                "filter reported inserted words as absent"
            );
        }
        let observed = self.observed_fp_rate();
        if self.false_positives + self.true_negatives > 0 && observed > target_fp_rate * 2.0 {
            warn!(observed, target = target_fp_rate, "false-positive rate well above target");
        }
    }
}

impl fmt::Display for StatsTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{STATS_HEADER}")?;
        writeln!(f, "{:<17}{}", format!("{LABEL_TRUE_POSITIVES}:"), self.true_positives)?;
        writeln!(f, "{:<17}{}", format!("{LABEL_TRUE_NEGATIVES}:"), self.true_negatives)?;
        writeln!(f, "{:<17}{}", format!("{LABEL_FALSE_POSITIVES}:"), self.false_positives)?;
        writeln!(f, "{:<17}{}", format!("{LABEL_FALSE_NEGATIVES}:"), self.false_negatives)
    }
}

/// Classifies queries against the filter and, when given, the reference set.
/// Only ever reads the filter.
pub struct Reconciler<'a> {
    filter: &'a BloomFilter,
    reference: Option<&'a ReferenceSet>,
    tally: StatsTally,
    queried: u64,
    possibly_present: u64,
}

impl<'a> Reconciler<'a> {
    pub fn new(filter: &'a BloomFilter, reference: Option<&'a ReferenceSet>) -> Self {
        Self { filter, reference, tally: StatsTally::default(), queried: 0, possibly_present: 0 }
    }

    /// Empty words are skipped and return `None`.
    pub fn classify(&mut self, word: &str) -> Option<Verdict> {
        if word.is_empty() {
            return None;
        }
        let verdict = self.filter.check(word);
        self.queried += 1;
        if verdict.is_possibly_present() {
            self.possibly_present += 1;
        }
        if let Some(set) = self.reference {
            self.tally.record(verdict, set.contains(word));
        }
        Some(verdict)
    }

    pub fn queried(&self) -> u64 {
        self.queried
    }

    pub fn possibly_present(&self) -> u64 {
        self.possibly_present
    }

    /// `None` when no reference set was supplied.
    pub fn tally(&self) -> Option<StatsTally> {
        self.reference.map(|_| self.tally)
    }
}
