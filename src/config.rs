//! Interpreter configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::lexer::AutomatonKind;
use crate::parser::ParserConfig;
use crate::runtime::AnalyzerConfig;

/// Interpreter options
///
/// Every field has a default, so a JSON document only needs the fields it
/// changes:
///
/// ```rust
/// use drawlang::{AutomatonKind, InterpreterConfig};
///
/// # fn main() -> drawlang::Result<()> {
/// let config = InterpreterConfig::from_json(r#"{ "automaton": "direct_coded" }"#)?;
/// assert_eq!(config.automaton, AutomatonKind::DirectCoded);
/// assert!(config.recover_from_errors);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Automaton encoding driving the scanner
    pub automaton: AutomatonKind,
    /// Trace every parser rule at `trace` level
    pub trace_parsing: bool,
    /// Resynchronize after syntax errors
    pub recover_from_errors: bool,
    /// Log statement effects and sampled points at `debug` level
    pub debug_output: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            automaton: AutomatonKind::TableDriven,
            trace_parsing: false,
            recover_from_errors: true,
            debug_output: false,
        }
    }
}

impl InterpreterConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parser part of the configuration
    pub fn parser(&self) -> ParserConfig {
        ParserConfig {
            trace: self.trace_parsing,
            recover_from_errors: self.recover_from_errors,
        }
    }

    /// Analyzer part of the configuration
    pub fn analyzer(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            debug_output: self.debug_output,
        }
    }
}
