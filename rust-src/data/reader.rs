//! Line-by-line transcript reader.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::TranscriptRecord;


/// Errors raised while reading a transcript.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid UTF-8 in {path} at line {line}")]
    InvalidUtf8 { path: PathBuf, line: usize },

    #[error("Malformed JSON at {path}:{line}: {source}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}


/// Streams decoded records out of a JSONL transcript.
///
/// Each item is one non-blank line; callers decide what to do with errors.
/// Line-level errors can be skipped, an `Io` error ends the useful stream.
pub struct TranscriptReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_num: usize,
}


impl TranscriptError {
    /// Whether reading can continue past this error.
    pub fn is_line_local(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}


impl TranscriptReader {
    pub fn open(path: &Path) -> Result<Self, TranscriptError> {
        let file = File::open(path).map_err(|source| TranscriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
            line_num: 0,
        })
    }
}


impl Iterator for TranscriptReader {
    type Item = Result<TranscriptRecord, TranscriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_num += 1;

            let line = match line {
                Ok(l) => l,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    return Some(Err(TranscriptError::InvalidUtf8 {
                        path: self.path.clone(),
                        line: self.line_num,
                    }))
                }
                Err(source) => {
                    return Some(Err(TranscriptError::Io {
                        path: self.path.clone(),
                        source,
                    }))
                }
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            return Some(serde_json::from_str(line).map_err(|source| {
                TranscriptError::MalformedLine {
                    path: self.path.clone(),
                    line: self.line_num,
                    source,
                }
            }));
        }
    }
}
