//! # drawlang - an interpreter for a parametric curve plotting language
//!
//! Programs in this small language place an origin, scale and rotation on a
//! canvas, pick a pen, and plot curves with a single stepped loop:
//!
//! ```text
//! ORIGIN IS (350, 220);
//! SCALE IS (100, 100);
//! COLOR IS blue;
//! FOR T FROM 0 TO 2*PI STEP PI/50 DRAW (cos(T), sin(T));
//! ```
//!
//! The crate is the interpreter front end. It turns source text into
//! `draw(x, y, color, size)` calls on a caller-supplied sink; windows,
//! canvases and logging setup belong to the host.
//!
//! ## Quick Start
//!
//! ```rust
//! use drawlang::{Interpreter, InterpreterConfig, PointRecorder};
//!
//! let mut interpreter = Interpreter::new(InterpreterConfig::default());
//! let mut canvas = PointRecorder::new();
//!
//! let report = interpreter.run_str(
//!     "origin is (100, 100); scale is (50, 50);
//!      for t from 0 to pi step pi/2 draw (cos(t), sin(t));",
//!     "circle.draw",
//!     &mut canvas,
//! );
//!
//! assert_eq!(report.points, 3);
//! assert_eq!(report.errors, 0);
//! assert_eq!(canvas.points()[0].x, 150.0);
//! assert_eq!(canvas.points()[0].y, 100.0);
//! ```
//!
//! Any `FnMut(f64, f64, Rgb, u32)` closure is a sink too:
//!
//! ```rust
//! use drawlang::{Interpreter, Rgb};
//!
//! let mut xs = Vec::new();
//! let mut sink = |x: f64, _y: f64, _color: Rgb, _size: u32| xs.push(x);
//! Interpreter::default().run_str("for t from 1 to 3 step 1 draw (t, 0);", "inline", &mut sink);
//! assert_eq!(xs, vec![1.0, 2.0, 3.0]);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source → CharSource → Scanner (+ Automaton) → Tokens → Parser → AST → SemanticAnalyzer → DrawSink
//! ```
//!
//! - [`Scanner`] - maximal-munch tokenizer driven by a finite automaton. Two
//!   interchangeable encodings exist, see [`AutomatonKind`].
//! - [`Parser`] - recursive descent with discard-and-resync error recovery;
//!   always produces a [`Program`].
//! - [`SemanticAnalyzer`] - executes statements, applying scale, clockwise
//!   rotation and translation to every plotted point.
//! - [`Diagnostics`] - lexical, syntax and semantic problems are collected
//!   here instead of stopping the run, and logged through `tracing`.
//!
//! ## Errors
//!
//! Only host-level failures (unreadable files, bad configuration) surface as
//! `Err`. Everything else is an [`Error`] entry in [`Diagnostics`], classified
//! by [`Error::classify`].

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod runtime;

pub use config::InterpreterConfig;
pub use diagnostics::Diagnostics;
pub use error::{Error, ErrorClass, ErrorSeverity, Result};
pub use interpreter::{parse_source, Interpreter, ParseOutcome, RunReport};
pub use lexer::{
    Automaton, AutomatonKind, CharSource, FileSource, KeywordId, MathFunction, ReaderSource,
    Scanner, SourceLocation, StringSource, SymbolTable, Token, TokenCategory,
};
pub use parser::{EvalContext, Expression, NodeKind, Parser, ParserConfig, Program, Statement};
pub use runtime::{
    AnalyzerConfig, ColorTable, DrawSink, Pen, Point, PointRecorder, Rgb, SemanticAnalyzer,
    Transform,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
