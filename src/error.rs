//! Error types for the drawing language interpreter

use thiserror::Error;

use crate::lexer::{LexicalErrorKind, SourceLocation};

/// Interpreter diagnostics
///
/// Every problem the scanner, parser or semantic analyzer can detect is one of
/// these variants. Most of them are accumulated in a
/// [`Diagnostics`](crate::Diagnostics) list instead of being returned, so a
/// single run can report many of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Lexical errors
    /// Text the scanner could not classify
    ///
    /// **Triggered by:** characters outside the alphabet, or a number cut off
    /// inside its exponent
    /// **Example:** `ORIGIN IS (1 # 2);`, `SIZE IS 2e;`
    #[error("Lexical error at {location}: {message}")]
    Lexical {
        /// What kind of text was rejected
        kind: LexicalErrorKind,
        /// The rejected text
        lexeme: String,
        /// Where the rejected text starts
        location: SourceLocation,
        /// Error description
        message: String,
    },

    // Syntax errors
    /// A token that does not fit the grammar
    ///
    /// **Triggered by:** missing punctuation, misspelled keywords, stray tokens
    /// **Example:** `ORIGIN IS (100, 200)` (missing `;`)
    #[error("Syntax error at {location}: {message}")]
    Syntax {
        /// Where the offending token starts
        location: SourceLocation,
        /// The offending token text (empty at end of input)
        lexeme: String,
        /// Error description
        message: String,
    },

    /// Identifier that names neither a constant nor a function
    #[error("Unknown identifier `{name}` at {location}, using 0")]
    UnknownIdentifier {
        /// Identifier as written
        name: String,
        /// Where the identifier appears
        location: SourceLocation,
    },

    /// Call of a function the symbol table does not bind
    #[error("Unknown function `{name}` at {location}, calls evaluate to 0")]
    UnknownFunction {
        /// Function name as written
        name: String,
        /// Where the call appears
        location: SourceLocation,
    },

    // Semantic errors
    /// Loop with a step of exactly zero
    #[error("Step value cannot be zero at {location}")]
    ZeroStep {
        /// Location of the FOR statement
        location: SourceLocation,
    },

    /// Loop whose step points away from its end value
    ///
    /// **Example:** `FOR T FROM 10 TO 0 STEP 1 DRAW (T, T);`
    #[error(
        "Step direction does not reach the end value at {location} \
         (from {start} to {end} step {step}), loop skipped"
    )]
    StepDirectionMismatch {
        /// Location of the FOR statement
        location: SourceLocation,
        /// Evaluated start value
        start: f64,
        /// Evaluated end value
        end: f64,
        /// Evaluated step value
        step: f64,
    },

    /// Loop whose step is too small to change the parameter
    #[error("Loop at {location} stalled at T = {value} (step {step} has no effect)")]
    LoopStalled {
        /// Location of the FOR statement
        location: SourceLocation,
        /// Parameter value that could not advance
        value: f64,
        /// Evaluated step value
        step: f64,
    },

    // Host errors
    /// Reading a source file failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Fatal error that stops the current operation
    Fatal,
    /// Error that is recorded while processing continues
    Recoverable,
    /// Warning that doesn't prevent execution
    Warning,
}

/// Which stage of the interpreter produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Scanner
    Lexical,
    /// Parser
    Syntax,
    /// Semantic analyzer
    Semantic,
    /// Source input
    Io,
    /// Configuration loading
    Config,
}

impl Error {
    /// Create a syntax error at a location
    pub fn syntax(
        location: SourceLocation,
        lexeme: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Syntax {
            location,
            lexeme: lexeme.into(),
            message: message.into(),
        }
    }

    /// Classify error severity
    pub fn classify(&self) -> ErrorSeverity {
        match self {
            Error::Io(_) => ErrorSeverity::Fatal,
            Error::Config(_) => ErrorSeverity::Fatal,

            Error::UnknownIdentifier { .. } => ErrorSeverity::Warning,
            Error::UnknownFunction { .. } => ErrorSeverity::Warning,
            Error::StepDirectionMismatch { .. } => ErrorSeverity::Warning,

            _ => ErrorSeverity::Recoverable,
        }
    }

    /// Stage that produced the error
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::Lexical { .. } => ErrorClass::Lexical,
            Error::Syntax { .. }
            | Error::UnknownIdentifier { .. }
            | Error::UnknownFunction { .. } => ErrorClass::Syntax,
            Error::ZeroStep { .. }
            | Error::StepDirectionMismatch { .. }
            | Error::LoopStalled { .. } => ErrorClass::Semantic,
            Error::Io(_) => ErrorClass::Io,
            Error::Config(_) => ErrorClass::Config,
        }
    }

    /// Source location the error points at, if it has one
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Error::Lexical { location, .. }
            | Error::Syntax { location, .. }
            | Error::UnknownIdentifier { location, .. }
            | Error::UnknownFunction { location, .. }
            | Error::ZeroStep { location }
            | Error::StepDirectionMismatch { location, .. }
            | Error::LoopStalled { location, .. } => Some(location),
            Error::Io(_) | Error::Config(_) => None,
        }
    }

    /// True for warnings
    pub fn is_warning(&self) -> bool {
        self.classify() == ErrorSeverity::Warning
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type for interpreter operations
pub type Result<T> = std::result::Result<T, Error>;
