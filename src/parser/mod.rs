//! Drawing language parser
//!
//! Parses the token stream into an Abstract Syntax Tree (AST) by recursive
//! descent with one token of lookahead.

mod ast;
mod draw_parser;

pub use ast::{
    BinaryOp, ColorName, ColorSpec, EvalContext, Expression, NodeKind, Program, SizeSpec,
    Statement, UnaryOp,
};
pub use draw_parser::{Parser, ParserConfig};
