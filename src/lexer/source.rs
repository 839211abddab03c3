//! Character sources feeding the scanner
//!
//! A source hands out characters one at a time, tracks the location of the
//! next character, and can take back the most recently read one.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::token::SourceLocation;
use crate::error::Result;

/// Consumed characters a [`ReaderSource`] remembers for `unget_char`
const HISTORY_LIMIT: usize = 256;

/// Character stream with location tracking and single-step pushback
pub trait CharSource {
    /// Consume and return the next character
    fn next_char(&mut self) -> Option<char>;

    /// Return the next character without consuming it
    fn peek_char(&mut self) -> Option<char>;

    /// Put the most recently consumed character back
    ///
    /// Does nothing when no character has been consumed.
    fn unget_char(&mut self);

    /// True once every character has been consumed
    fn is_eof(&mut self) -> bool;

    /// Location of the next character
    fn location(&self) -> SourceLocation;

    /// Identifier of this source
    fn source_id(&self) -> &str;
}

/// In-memory source
#[derive(Debug, Clone)]
pub struct StringSource {
    chars: Vec<char>,
    position: usize,
    location: SourceLocation,
}

impl StringSource {
    /// Creates a source over `text`, labelled `source_id` in locations
    pub fn new(text: &str, source_id: impl Into<String>) -> Self {
        StringSource {
            chars: text.chars().collect(),
            position: 0,
            location: SourceLocation::start_of(source_id),
        }
    }
}

impl CharSource for StringSource {
    fn next_char(&mut self) -> Option<char> {
        let c = *self.chars.get(self.position)?;
        self.position += 1;
        self.location.offset += 1;
        if c == '\n' {
            self.location.line += 1;
            self.location.column = 1;
        } else {
            self.location.column += 1;
        }
        Some(c)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn unget_char(&mut self) {
        if self.position == 0 {
            return;
        }
        self.position -= 1;
        self.location.offset -= 1;
        if self.chars[self.position] == '\n' {
            // Column is the distance from the previous line boundary.
            let line_start = self.chars[..self.position]
                .iter()
                .rposition(|&c| c == '\n')
                .map_or(0, |i| i + 1);
            self.location.line -= 1;
            self.location.column = self.position - line_start + 1;
        } else {
            self.location.column -= 1;
        }
    }

    fn is_eof(&mut self) -> bool {
        self.position >= self.chars.len()
    }

    fn location(&self) -> SourceLocation {
        self.location.clone()
    }

    fn source_id(&self) -> &str {
        &self.location.source
    }
}

/// Streaming source over any buffered reader
///
/// Lines are decoded lazily. A bounded history of consumed characters and
/// their positions keeps `unget_char` working across line refills.
pub struct ReaderSource<R> {
    reader: R,
    lookahead: VecDeque<char>,
    history: VecDeque<(char, usize, usize)>,
    location: SourceLocation,
    exhausted: bool,
}

/// Source reading a file from disk
pub type FileSource = ReaderSource<BufReader<File>>;

impl ReaderSource<BufReader<File>> {
    /// Opens `path`; the path also becomes the source identifier
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(ReaderSource::new(
            BufReader::new(file),
            path.display().to_string(),
        ))
    }
}

impl<R: BufRead> ReaderSource<R> {
    /// Wraps `reader`, labelled `source_id` in locations
    pub fn new(reader: R, source_id: impl Into<String>) -> Self {
        ReaderSource {
            reader,
            lookahead: VecDeque::new(),
            history: VecDeque::new(),
            location: SourceLocation::start_of(source_id),
            exhausted: false,
        }
    }

    fn fill(&mut self) {
        while self.lookahead.is_empty() && !self.exhausted {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => self.exhausted = true,
                Ok(_) => self.lookahead.extend(line.chars()),
                Err(err) => {
                    tracing::error!(
                        source = %self.location.source,
                        "Failed to read source: {}", err
                    );
                    self.exhausted = true;
                }
            }
        }
    }
}

impl<R: BufRead> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> Option<char> {
        self.fill();
        let c = self.lookahead.pop_front()?;
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history
            .push_back((c, self.location.line, self.location.column));
        self.location.offset += 1;
        if c == '\n' {
            self.location.line += 1;
            self.location.column = 1;
        } else {
            self.location.column += 1;
        }
        Some(c)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.fill();
        self.lookahead.front().copied()
    }

    fn unget_char(&mut self) {
        if let Some((c, line, column)) = self.history.pop_back() {
            self.lookahead.push_front(c);
            self.location.line = line;
            self.location.column = column;
            self.location.offset -= 1;
        }
    }

    fn is_eof(&mut self) -> bool {
        self.fill();
        self.lookahead.is_empty()
    }

    fn location(&self) -> SourceLocation {
        self.location.clone()
    }

    fn source_id(&self) -> &str {
        &self.location.source
    }
}
