//! Source-to-points pipeline
//!
//! [`parse_source`] is the parser's outward contract: a program plus the
//! syntax errors found while building it. [`Interpreter`] runs the whole
//! pipeline against a [`DrawSink`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::InterpreterConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::lexer::{CharSource, FileSource, Scanner, StringSource, SymbolTable};
use crate::parser::{Parser, Program};
use crate::runtime::{ColorTable, DrawSink, SemanticAnalyzer};

/// A parsed program and everything reported while parsing it
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub program: Program,
    pub diagnostics: Diagnostics,
}

impl ParseOutcome {
    /// Lexical and syntax errors, in report order
    pub fn syntax_errors(&self) -> impl Iterator<Item = &Error> {
        self.diagnostics.syntax_errors()
    }

    /// True when parsing reported no errors
    pub fn is_clean(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Parse `source` with the built-in symbol table
pub fn parse_source(source: &str, source_id: &str, config: &InterpreterConfig) -> ParseOutcome {
    let symbols = SymbolTable::new();
    let mut diagnostics = Diagnostics::new();
    let program = parse_with(
        StringSource::new(source, source_id),
        &symbols,
        &mut diagnostics,
        config,
    );
    ParseOutcome {
        program,
        diagnostics,
    }
}

fn parse_with<S: CharSource>(
    source: S,
    symbols: &SymbolTable,
    diagnostics: &mut Diagnostics,
    config: &InterpreterConfig,
) -> Program {
    let scanner = Scanner::new(source, symbols, config.automaton);
    Parser::with_config(scanner, diagnostics, config.parser()).parse()
}

/// Summary of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Statements in the parsed program
    pub statements: usize,
    /// Points sent to the sink
    pub points: usize,
    pub errors: usize,
    pub warnings: usize,
}

/// Complete interpreter: scanner, parser and analyzer over shared tables
///
/// Each run starts from the default transform and pen, and from an empty
/// diagnostics list; [`diagnostics`](Self::diagnostics) describes the most
/// recent run.
pub struct Interpreter {
    config: InterpreterConfig,
    symbols: SymbolTable,
    colors: ColorTable,
    diagnostics: Diagnostics,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Interpreter::with_tables(config, SymbolTable::new(), ColorTable::new())
    }

    /// Interpreter over caller-supplied symbol and color tables
    pub fn with_tables(config: InterpreterConfig, symbols: SymbolTable, colors: ColorTable) -> Self {
        Interpreter {
            config,
            symbols,
            colors,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Named colors, open for additions
    pub fn colors_mut(&mut self) -> &mut ColorTable {
        &mut self.colors
    }

    /// Parse an in-memory source, adding to the diagnostics list
    pub fn parse_str(&mut self, source: &str, source_id: &str) -> Program {
        parse_with(
            StringSource::new(source, source_id),
            &self.symbols,
            &mut self.diagnostics,
            &self.config,
        )
    }

    /// Parse a file, adding to the diagnostics list
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<Program> {
        let source = FileSource::open(path)?;
        Ok(parse_with(
            source,
            &self.symbols,
            &mut self.diagnostics,
            &self.config,
        ))
    }

    /// Execute a parsed program from the default state
    pub fn execute<D: DrawSink + ?Sized>(&mut self, program: &Program, sink: &mut D) -> usize {
        let mut analyzer = SemanticAnalyzer::with_config(
            &self.colors,
            &mut self.diagnostics,
            self.config.analyzer(),
        );
        analyzer.run(program, sink)
    }

    /// Parse and execute an in-memory source
    pub fn run_str<D: DrawSink + ?Sized>(
        &mut self,
        source: &str,
        source_id: &str,
        sink: &mut D,
    ) -> RunReport {
        self.diagnostics.clear();
        let program = self.parse_str(source, source_id);
        self.finish(&program, sink)
    }

    /// Parse and execute a file
    pub fn run_file<D: DrawSink + ?Sized>(
        &mut self,
        path: impl AsRef<Path>,
        sink: &mut D,
    ) -> Result<RunReport> {
        self.diagnostics.clear();
        let program = self.parse_file(path)?;
        Ok(self.finish(&program, sink))
    }

    fn finish<D: DrawSink + ?Sized>(&mut self, program: &Program, sink: &mut D) -> RunReport {
        let points = self.execute(program, sink);
        let report = RunReport {
            statements: program.len(),
            points,
            errors: self.diagnostics.error_count(),
            warnings: self.diagnostics.warning_count(),
        };
        tracing::info!(
            source = %program.source,
            statements = report.statements,
            points = report.points,
            errors = report.errors,
            warnings = report.warnings,
            "Run finished"
        );
        report
    }
}
