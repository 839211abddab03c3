use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a character in a named source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Source identifier (file name or a caller-chosen label)
    pub source: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Character offset from the start of the source (0-indexed)
    pub offset: usize,
}

impl SourceLocation {
    /// Location of the first character of a source
    pub fn start_of(source: impl Into<String>) -> Self {
        SourceLocation {
            source: source.into(),
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}

/// Coarse token classes produced by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenCategory {
    /// Reserved word, statement keyword or function name
    Keyword,
    /// Name with no entry in the symbol table
    Identifier,
    /// Numeric literal or named constant
    Literal,
    /// `+ - * / **`
    Operator,
    /// `( ) , ;`
    Punctuation,
    /// `//` or `--` line comment
    Comment,
    /// End of the source
    EndOfInput,
    /// Text the scanner could not classify
    Invalid,
}

/// Identity of a keyword, operator or punctuation token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordId {
    // Statement keywords
    /// ORIGIN
    Origin,
    /// SCALE
    Scale,
    /// ROT
    Rot,
    /// IS
    Is,
    /// FOR
    For,
    /// FROM
    From,
    /// TO
    To,
    /// STEP
    Step,
    /// DRAW
    Draw,
    /// COLOR
    Color,
    /// SIZE (also PIXSIZE, PIXELSIZE, PIX)
    Size,
    /// The loop parameter `T`
    Param,
    /// A built-in math function name
    Func,

    // Operators
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `**`
    Power,

    // Punctuation
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
}

impl KeywordId {
    /// Operator id for an operator lexeme
    pub fn operator(lexeme: &str) -> Option<Self> {
        match lexeme {
            "+" => Some(KeywordId::Plus),
            "-" => Some(KeywordId::Minus),
            "*" => Some(KeywordId::Mul),
            "/" => Some(KeywordId::Div),
            "**" => Some(KeywordId::Power),
            _ => None,
        }
    }

    /// Punctuation id for a punctuation lexeme
    pub fn punctuation(lexeme: &str) -> Option<Self> {
        match lexeme {
            "(" => Some(KeywordId::LeftParen),
            ")" => Some(KeywordId::RightParen),
            ";" => Some(KeywordId::Semicolon),
            "," => Some(KeywordId::Comma),
            _ => None,
        }
    }

    /// Human-readable name used in error messages
    pub fn describe(self) -> &'static str {
        match self {
            KeywordId::Origin => "ORIGIN",
            KeywordId::Scale => "SCALE",
            KeywordId::Rot => "ROT",
            KeywordId::Is => "IS",
            KeywordId::For => "FOR",
            KeywordId::From => "FROM",
            KeywordId::To => "TO",
            KeywordId::Step => "STEP",
            KeywordId::Draw => "DRAW",
            KeywordId::Color => "COLOR",
            KeywordId::Size => "SIZE",
            KeywordId::Param => "T",
            KeywordId::Func => "function name",
            KeywordId::Plus => "'+'",
            KeywordId::Minus => "'-'",
            KeywordId::Mul => "'*'",
            KeywordId::Div => "'/'",
            KeywordId::Power => "'**'",
            KeywordId::LeftParen => "'('",
            KeywordId::RightParen => "')'",
            KeywordId::Semicolon => "';'",
            KeywordId::Comma => "','",
        }
    }
}

/// Numeric literal flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    /// Digits only
    Integer,
    /// Contains `.`, `e` or `E`, or comes from a named constant
    Decimal,
}

/// Why the scanner produced an Invalid token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LexicalErrorKind {
    /// Character that cannot start any token
    UnknownCharacter,
    /// Number that stopped inside its exponent (`1e`, `2E+`)
    MalformedNumber,
}

/// Category-specific token data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenPayload {
    /// Identifiers, comments and end of input
    None,
    /// Keywords, operators and punctuation
    Keyword(KeywordId),
    /// Numeric literals and named constants
    Literal {
        /// Integer or decimal spelling
        kind: LiteralKind,
        /// Numeric value
        value: f64,
    },
    /// Invalid tokens
    Error {
        /// Error kind
        kind: LexicalErrorKind,
        /// Error description
        message: String,
    },
}

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Token class
    pub category: TokenCategory,
    /// Original text of the token
    pub lexeme: String,
    /// Where the token starts
    pub location: SourceLocation,
    /// Category-specific data
    pub payload: TokenPayload,
}

impl Token {
    /// Keyword, operator or punctuation token
    pub fn keyword(
        category: TokenCategory,
        id: KeywordId,
        lexeme: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        debug_assert!(matches!(
            category,
            TokenCategory::Keyword | TokenCategory::Operator | TokenCategory::Punctuation
        ));
        Token {
            category,
            lexeme: lexeme.into(),
            location,
            payload: TokenPayload::Keyword(id),
        }
    }

    /// Identifier with no symbol table entry
    pub fn identifier(lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Token {
            category: TokenCategory::Identifier,
            lexeme: lexeme.into(),
            location,
            payload: TokenPayload::None,
        }
    }

    /// Numeric literal or named constant
    pub fn literal(
        kind: LiteralKind,
        value: f64,
        lexeme: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Token {
            category: TokenCategory::Literal,
            lexeme: lexeme.into(),
            location,
            payload: TokenPayload::Literal { kind, value },
        }
    }

    /// End-of-input marker
    pub fn end_of_input(location: SourceLocation) -> Self {
        Token {
            category: TokenCategory::EndOfInput,
            lexeme: String::new(),
            location,
            payload: TokenPayload::None,
        }
    }

    /// Unclassifiable text
    pub fn invalid(
        kind: LexicalErrorKind,
        lexeme: impl Into<String>,
        location: SourceLocation,
        message: impl Into<String>,
    ) -> Self {
        Token {
            category: TokenCategory::Invalid,
            lexeme: lexeme.into(),
            location,
            payload: TokenPayload::Error {
                kind,
                message: message.into(),
            },
        }
    }

    /// Keyword id of keyword, operator and punctuation tokens
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self.payload {
            TokenPayload::Keyword(id) => Some(id),
            _ => None,
        }
    }

    /// Value of literal tokens
    pub fn literal_value(&self) -> Option<f64> {
        match self.payload {
            TokenPayload::Literal { value, .. } => Some(value),
            _ => None,
        }
    }

    /// True if this token carries the given keyword id
    pub fn is(&self, id: KeywordId) -> bool {
        self.keyword_id() == Some(id)
    }

    /// True for the end-of-input marker
    pub fn is_end(&self) -> bool {
        self.category == TokenCategory::EndOfInput
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            TokenCategory::EndOfInput => write!(f, "<end of input> at {}", self.location),
            _ => write!(
                f,
                "{:?} '{}' at {}",
                self.category, self.lexeme, self.location
            ),
        }
    }
}
