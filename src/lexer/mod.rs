//! Lexical analysis for the drawing language
//!
//! Converts source text into a stream of tokens. A [`CharSource`] supplies
//! characters, an [`Automaton`] recognizes the longest token prefix, and the
//! [`Scanner`] classifies what the automaton accepted using the
//! [`SymbolTable`].

pub mod automaton;
mod scanner;
mod source;
mod symbols;
mod token;

pub use automaton::{
    Automaton, AutomatonKind, AutomatonStats, DirectCodedAutomaton, StateInfo, StateKind,
    TableDrivenAutomaton,
};
pub use scanner::Scanner;
pub use source::{CharSource, FileSource, ReaderSource, StringSource};
pub use symbols::{MathFunction, SymbolEntry, SymbolTable};
pub use token::{
    KeywordId, LexicalErrorKind, LiteralKind, SourceLocation, Token, TokenCategory, TokenPayload,
};
