//! Line-delimited word sources (known-bad corpus, candidate lists).
//!
//! Lines end at `\n`, `\r\n` or a lone `\r`. Each line is decoded, trimmed
//! of surrounding whitespace, and dropped if nothing is left.

use crate::errors::{Result, WeakpassError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// ISO-8859-1: every byte is the code point of the same value. Never fails.
    #[default]
    Latin1,
    /// Strict UTF-8; an invalid line is an error.
    Utf8,
}

impl TextEncoding {
    /// `None` means the bytes are not valid in this encoding.
    pub fn decode(self, raw: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Latin1 => Some(raw.iter().map(|&b| b as char).collect()),
            TextEncoding::Utf8 => std::str::from_utf8(raw).ok().map(str::to_owned),
        }
    }
}

/// Streaming iterator over the non-blank entries of a reader.
pub struct Entries<R> {
    reader: R,
    encoding: TextEncoding,
    origin: PathBuf,
    line_no: u64,
    buf: Vec<u8>,
    // last line ended in `\r`; a leading `\n` belongs to it
    skip_lf: bool,
}

impl<R: BufRead> Entries<R> {
    pub fn new(reader: R, encoding: TextEncoding, origin: impl Into<PathBuf>) -> Self {
        Self { reader, encoding, origin: origin.into(), line_no: 0, buf: Vec::new(), skip_lf: false }
    }

    /// 1-based number of the last line read.
    pub fn line_no(&self) -> u64 {
        self.line_no
    }

    /// Reads one line into `buf` without its terminator. Returns bytes consumed.
    fn read_line(&mut self) -> std::io::Result<usize> {
        self.buf.clear();
        let mut read = 0;
        loop {
            let available = match self.reader.fill_buf() {
                Ok(b) => b,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(read);
            }
            if self.skip_lf {
                self.skip_lf = false;
                if available[0] == b'\n' {
                    self.reader.consume(1);
                    continue;
                }
            }
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    self.skip_lf = available[i] == b'\r';
                    self.buf.extend_from_slice(&available[..i]);
                    self.reader.consume(i + 1);
                    return Ok(read + i + 1);
                }
                None => {
                    let n = available.len();
                    self.buf.extend_from_slice(available);
                    self.reader.consume(n);
                    read += n;
                }
            }
        }
    }
}

/// Unicode White_Space plus the U+001C..U+001F information separators.
fn is_strip_char(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

impl<R: BufRead> Iterator for Entries<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.read_line() {
                Ok(0) => return None,
                Ok(_) => {}
                Err(source) => {
                    return Some(Err(WeakpassError::SourceUnavailable {
                        path: self.origin.clone(),
                        source,
                    }))
                }
            }
            self.line_no += 1;
            let Some(text) = self.encoding.decode(&self.buf) else {
                return Some(Err(WeakpassError::Encoding {
                    path: self.origin.clone(),
                    line: self.line_no,
                }));
            };
            let word = text.trim_matches(is_strip_char);
            if !word.is_empty() {
                return Some(Ok(word.to_owned()));
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct WordSource {
    path: PathBuf,
    encoding: TextEncoding,
}

impl WordSource {
    pub fn new(path: impl Into<PathBuf>, encoding: TextEncoding) -> Self {
        Self { path: path.into(), encoding }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> Result<Entries<BufReader<File>>> {
        let file = File::open(&self.path).map_err(|source| WeakpassError::SourceUnavailable {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), encoding = ?self.encoding, "opened word source");
        Ok(Entries::new(BufReader::new(file), self.encoding, self.path.clone()))
    }

    /// Non-blank entries, duplicates included.
    pub fn count_entries(&self) -> Result<u64> {
        let mut n = 0u64;
        let mut entries = self.entries()?;
        for entry in entries.by_ref() {
            entry?;
            n += 1;
        }
        debug!(
            path = %self.path.display(),
            entries = n,
            lines = entries.line_no(),
            "counted word source"
        );
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn collect(bytes: &[u8], enc: TextEncoding) -> Result<Vec<String>> {
        Entries::new(Cursor::new(bytes.to_vec()), enc, "mem").collect()
    }

    #[test]
    fn skips_blank_and_trims() {
        let got = collect(b"  alpha \n\n\t\nbeta\r\ngamma", TextEncoding::Latin1).unwrap();
        assert_eq!(got, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn latin1_maps_high_bytes() {
        let got = collect(b"caf\xe9\n\xff\xfe\n", TextEncoding::Latin1).unwrap();
        assert_eq!(got, vec!["café".to_string(), "ÿþ".to_string()]);
    }

    #[test]
    fn latin1_strips_nbsp_like_whitespace() {
        // 0xA0 decodes to U+00A0, which is whitespace
        let got = collect(b"\xa0pass\xa0\n", TextEncoding::Latin1).unwrap();
        assert_eq!(got, vec!["pass"]);
    }

    #[test]
    fn lone_cr_and_crlf_end_lines() {
        let got = collect(b"alpha\rbeta\r\ngamma\n\rdelta\r", TextEncoding::Latin1).unwrap();
        assert_eq!(got, vec!["alpha", "beta", "gamma", "delta"]);
    }

    #[test]
    fn crlf_split_across_reads_counts_once() {
        // capacity 1 forces `\r` and `\n` into separate fill_buf calls
        let reader = std::io::BufReader::with_capacity(1, Cursor::new(b"a\r\n\r\nb\r\n".to_vec()));
        let mut entries = Entries::new(reader, TextEncoding::Latin1, "mem");
        let got: Vec<String> = entries.by_ref().map(|e| e.unwrap()).collect();
        assert_eq!(got, vec!["a", "b"]);
        assert_eq!(entries.line_no(), 3);
    }

    #[test]
    fn strips_ascii_information_separators() {
        let got = collect(b"pass\x1f\n\x1cword\x1d\x1e\n\x85x\n", TextEncoding::Latin1).unwrap();
        assert_eq!(got, vec!["pass", "word", "x"]);
    }

    #[test]
    fn utf8_rejects_invalid_line() {
        let err = collect(b"ok\nbad\xe9\n", TextEncoding::Utf8).unwrap_err();
        match err {
            WeakpassError::Encoding { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
        let got = collect("naïve\n".as_bytes(), TextEncoding::Utf8).unwrap();
        assert_eq!(got, vec!["naïve"]);
    }

    #[test]
    fn file_source_counts_entries() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "123456\npassword\n\n123456\n   \nqwerty").unwrap();
        let src = WordSource::new(tmp.path(), TextEncoding::Latin1);
        assert_eq!(src.count_entries().unwrap(), 4);
        let words: Vec<String> = src.entries().unwrap().map(|e| e.unwrap()).collect();
        assert_eq!(words, vec!["123456", "password", "123456", "qwerty"]);
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let src = WordSource::new(dir.path().join("nope.txt"), TextEncoding::Latin1);
        assert!(matches!(src.entries(), Err(WeakpassError::SourceUnavailable { .. })));
        assert!(matches!(src.count_entries(), Err(WeakpassError::SourceUnavailable { .. })));
    }
}
