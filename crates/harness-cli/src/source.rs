//! # Command Sources
//!
//! A command source yields raw lines, one command per line, with the line
//! terminator stripped. `None` means the input is exhausted.

use std::collections::VecDeque;
use std::io::BufRead;
use std::path::Path;

use harness_core::ProtocolError;

/// Produces raw command lines.
pub trait CommandSource {
    /// The next line, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Io`] if the underlying input fails.
    fn next_line(&mut self) -> Result<Option<String>, ProtocolError>;
}

/// Lines read on demand from a buffered reader, e.g. locked stdin.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    /// Wrap `reader`.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> CommandSource for ReaderSource<R> {
    fn next_line(&mut self) -> Result<Option<String>, ProtocolError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Lines replayed from a file that was read in full up front.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    lines: VecDeque<String>,
}

impl ReplaySource {
    /// Load every line of `path`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&content))
    }

    /// Replay the lines of `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Lines not yet replayed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl CommandSource for ReplaySource {
    fn next_line(&mut self) -> Result<Option<String>, ProtocolError> {
        Ok(self.lines.pop_front())
    }
}
