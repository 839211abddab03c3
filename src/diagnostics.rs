//! Accumulated errors and warnings
//!
//! The scanner, parser and analyzer never stop at the first problem. They
//! report into a caller-owned [`Diagnostics`] list, which also forwards every
//! entry to `tracing`.

use crate::error::{Error, ErrorClass, ErrorSeverity};

/// Ordered list of reported errors and warnings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    entries: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `error` and log it
    pub fn report(&mut self, error: Error) {
        match error.classify() {
            ErrorSeverity::Warning => tracing::warn!("{}", error),
            _ => tracing::error!("{}", error),
        }
        self.entries.push(error);
    }

    /// Every entry in report order
    pub fn entries(&self) -> &[Error] {
        &self.entries
    }

    /// Entries that are not warnings
    pub fn errors(&self) -> impl Iterator<Item = &Error> {
        self.entries.iter().filter(|e| !e.is_warning())
    }

    /// Warning entries
    pub fn warnings(&self) -> impl Iterator<Item = &Error> {
        self.entries.iter().filter(|e| e.is_warning())
    }

    /// Lexical and syntax errors, the parser's outward error list
    pub fn syntax_errors(&self) -> impl Iterator<Item = &Error> {
        self.errors()
            .filter(|e| matches!(e.class(), ErrorClass::Lexical | ErrorClass::Syntax))
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
