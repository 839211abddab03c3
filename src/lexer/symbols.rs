//! Keyword, constant and function table
//!
//! Lookups are case-insensitive: names are stored and searched in upper case.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts;

use super::token::{KeywordId, TokenCategory};

/// Built-in single-argument math functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathFunction {
    Sin,
    Cos,
    Tan,
    /// Natural logarithm
    Ln,
    Exp,
    Sqrt,
    Abs,
    Asin,
    Acos,
    Atan,
    /// Base-10 logarithm
    Log10,
    Ceil,
    Floor,
}

impl MathFunction {
    /// Apply the function to `x`
    pub fn apply(self, x: f64) -> f64 {
        match self {
            MathFunction::Sin => x.sin(),
            MathFunction::Cos => x.cos(),
            MathFunction::Tan => x.tan(),
            MathFunction::Ln => x.ln(),
            MathFunction::Exp => x.exp(),
            MathFunction::Sqrt => x.sqrt(),
            MathFunction::Abs => x.abs(),
            MathFunction::Asin => x.asin(),
            MathFunction::Acos => x.acos(),
            MathFunction::Atan => x.atan(),
            MathFunction::Log10 => x.log10(),
            MathFunction::Ceil => x.ceil(),
            MathFunction::Floor => x.floor(),
        }
    }
}

/// What a name means
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    /// Category tokens spelling this name receive
    pub category: TokenCategory,
    /// Keyword id for keywords and function names
    pub keyword: Option<KeywordId>,
    /// Canonical (upper-case) name
    pub name: String,
    /// Value of a named constant
    pub value: Option<f64>,
    /// Function bound to a function name
    pub function: Option<MathFunction>,
}

impl SymbolEntry {
    /// Statement or control keyword
    pub fn keyword(name: &str, id: KeywordId) -> Self {
        SymbolEntry {
            category: TokenCategory::Keyword,
            keyword: Some(id),
            name: name.to_ascii_uppercase(),
            value: None,
            function: None,
        }
    }

    /// Named constant
    pub fn constant(name: &str, value: f64) -> Self {
        SymbolEntry {
            category: TokenCategory::Literal,
            keyword: None,
            name: name.to_ascii_uppercase(),
            value: Some(value),
            function: None,
        }
    }

    /// Function name
    pub fn function(name: &str, function: MathFunction) -> Self {
        SymbolEntry {
            category: TokenCategory::Keyword,
            keyword: Some(KeywordId::Func),
            name: name.to_ascii_uppercase(),
            value: None,
            function: Some(function),
        }
    }
}

/// Case-insensitive symbol table
///
/// Populated before scanning starts; the scanner and parser only read it.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: HashMap<String, SymbolEntry>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Table holding every built-in keyword, constant and function
    pub fn new() -> Self {
        let mut table = SymbolTable::empty();

        table.insert(SymbolEntry::constant("PI", consts::PI));
        table.insert(SymbolEntry::constant("E", consts::E));

        table.insert(SymbolEntry::keyword("T", KeywordId::Param));

        for (name, function) in [
            ("SIN", MathFunction::Sin),
            ("COS", MathFunction::Cos),
            ("TAN", MathFunction::Tan),
            ("LN", MathFunction::Ln),
            ("EXP", MathFunction::Exp),
            ("SQRT", MathFunction::Sqrt),
            ("ABS", MathFunction::Abs),
            ("ASIN", MathFunction::Asin),
            ("ACOS", MathFunction::Acos),
            ("ATAN", MathFunction::Atan),
            ("LOG", MathFunction::Log10),
            ("LOG10", MathFunction::Log10),
            ("CEIL", MathFunction::Ceil),
            ("FLOOR", MathFunction::Floor),
        ] {
            table.insert(SymbolEntry::function(name, function));
        }

        for (name, id) in [
            ("ORIGIN", KeywordId::Origin),
            ("SCALE", KeywordId::Scale),
            ("ROT", KeywordId::Rot),
            ("IS", KeywordId::Is),
            ("FOR", KeywordId::For),
            ("FROM", KeywordId::From),
            ("TO", KeywordId::To),
            ("STEP", KeywordId::Step),
            ("DRAW", KeywordId::Draw),
            ("COLOR", KeywordId::Color),
            ("SIZE", KeywordId::Size),
            ("PIXSIZE", KeywordId::Size),
            ("PIXELSIZE", KeywordId::Size),
            ("PIX", KeywordId::Size),
        ] {
            table.insert(SymbolEntry::keyword(name, id));
        }

        table
    }

    /// Table with no entries
    pub fn empty() -> Self {
        SymbolTable {
            entries: HashMap::new(),
        }
    }

    /// Add or replace an entry
    pub fn insert(&mut self, entry: SymbolEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Entry for `name`, ignoring case
    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.get(&name.to_ascii_uppercase())
    }

    /// Function bound to `name`
    pub fn function(&self, name: &str) -> Option<MathFunction> {
        self.lookup(name).and_then(|entry| entry.function)
    }

    /// Value of the constant `name`
    pub fn constant(&self, name: &str) -> Option<f64> {
        self.lookup(name).and_then(|entry| entry.value)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
