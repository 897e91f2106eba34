use crate::consts::DEFAULT_FP_RATE;
use crate::errors::{Result, WeakpassError};
use crate::lexicon::TextEncoding;
use crate::sizing::{validate_fp_rate, Rounding};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one build-and-query run.
///
/// Usually read from a JSON file and then overridden from the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Known-bad words, one per line.
    pub corpus: Option<PathBuf>,
    /// Candidate words to classify, one per line.
    pub queries: Option<PathBuf>,
    pub fp_rate: f64,
    pub encoding: TextEncoding,
    pub rounding: Rounding,
    /// Build the exact reference set and print the summary block.
    pub stats: bool,
    /// Where verdicts go; stdout when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            corpus: None,
            queries: None,
            fp_rate: DEFAULT_FP_RATE,
            encoding: TextEncoding::default(),
            rounding: Rounding::default(),
            stats: true,
            output: None,
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path).map_err(|source| WeakpassError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: RunConfig = serde_json::from_str(&s)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        validate_fp_rate(self.fp_rate)?;
        if self.corpus.is_none() {
            return Err(WeakpassError::invalid("corpus path is required"));
        }
        if self.queries.is_none() {
            return Err(WeakpassError::invalid("queries path is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.fp_rate, 0.05);
        assert_eq!(cfg.encoding, TextEncoding::Latin1);
        assert_eq!(cfg.rounding, Rounding::Truncate);
        assert!(cfg.stats);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("run.json");
        fs::write(
            &p,
            r#"{ "corpus": "rockyou.txt", "queries": "dictionary.txt", "encoding": "utf8" }"#,
        )
        .unwrap();
        let cfg = RunConfig::load(&p).unwrap();
        assert_eq!(cfg.corpus.as_deref(), Some(Path::new("rockyou.txt")));
        assert_eq!(cfg.encoding, TextEncoding::Utf8);
        assert_eq!(cfg.fp_rate, 0.05);
        assert_eq!(cfg.rounding, Rounding::Truncate);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_bad_rate_and_bad_json() {
        let mut cfg = RunConfig {
            corpus: Some("a".into()),
            queries: Some("b".into()),
            ..RunConfig::default()
        };
        cfg.fp_rate = 1.0;
        assert!(matches!(cfg.validate(), Err(WeakpassError::InvalidArgument(_))));

        let tmp = tempdir().unwrap();
        let p = tmp.path().join("broken.json");
        fs::write(&p, "{ not json").unwrap();
        assert!(matches!(RunConfig::load(&p), Err(WeakpassError::Config(_))));
    }
}
