use super::automaton::{Automaton, AutomatonKind, StateKind};
use super::source::{CharSource, StringSource};
use super::symbols::SymbolTable;
use super::token::{
    KeywordId, LexicalErrorKind, LiteralKind, SourceLocation, Token, TokenCategory,
};

/// Maximal-munch scanner over a character source
///
/// Tokens are produced on demand. Comments are skipped; everything else,
/// including unclassifiable text, comes back as a token.
pub struct Scanner<'a, S> {
    source: S,
    automaton: Box<dyn Automaton>,
    symbols: &'a SymbolTable,
    finished: bool,
}

impl<'a> Scanner<'a, StringSource> {
    /// Scanner over an in-memory string
    pub fn from_text(
        text: &str,
        source_id: impl Into<String>,
        symbols: &'a SymbolTable,
        kind: AutomatonKind,
    ) -> Self {
        Scanner::new(StringSource::new(text, source_id), symbols, kind)
    }
}

impl<'a, S: CharSource> Scanner<'a, S> {
    /// Creates a scanner driving an automaton of the given encoding
    pub fn new(source: S, symbols: &'a SymbolTable, kind: AutomatonKind) -> Self {
        Scanner::with_automaton(source, symbols, kind.build())
    }

    /// Creates a scanner driving a caller-supplied automaton
    pub fn with_automaton(
        source: S,
        symbols: &'a SymbolTable,
        automaton: Box<dyn Automaton>,
    ) -> Self {
        Scanner {
            source,
            automaton,
            symbols,
            finished: false,
        }
    }

    /// Symbol table used for classification
    pub fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    /// Identifier of the underlying source
    pub fn source_id(&self) -> &str {
        self.source.source_id()
    }

    /// Encoding of the automaton in use
    pub fn automaton_kind(&self) -> AutomatonKind {
        self.automaton.kind()
    }

    /// False once the end-of-input token has been returned
    pub fn has_more_tokens(&self) -> bool {
        !self.finished
    }

    /// Scans the next token
    ///
    /// After the end of input every call returns another end-of-input token.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            let location = self.source.location();

            let Some(first) = self.source.next_char() else {
                self.finished = true;
                return Token::end_of_input(location);
            };

            self.automaton.reset();
            if !self.automaton.feed(first) {
                return Token::invalid(
                    LexicalErrorKind::UnknownCharacter,
                    first.to_string(),
                    location,
                    format!("Unknown token: {}", first),
                );
            }
            while let Some(c) = self.source.next_char() {
                if !self.automaton.feed(c) {
                    self.source.unget_char();
                    break;
                }
            }

            if let Some(token) = self.classify(location) {
                return token;
            }
        }
    }

    /// Scans every remaining token, ending with the end-of-input token
    pub fn tokenize_all(&mut self) -> Vec<Token> {
        self.by_ref().collect()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.source.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.source.next_char();
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.source.peek_char() {
            if c == '\n' {
                break;
            }
            self.source.next_char();
        }
    }

    /// Turns the automaton's accepted lexeme into a token; `None` for comments
    fn classify(&mut self, location: SourceLocation) -> Option<Token> {
        let lexeme = self.automaton.processed_input().to_string();

        let token = match self.automaton.accepted_category() {
            Some(TokenCategory::Identifier) => self.classify_word(lexeme, location),
            Some(TokenCategory::Literal) => classify_number(lexeme, location),
            Some(TokenCategory::Operator) => match KeywordId::operator(&lexeme) {
                Some(id) => Token::keyword(TokenCategory::Operator, id, lexeme, location),
                None => unknown(lexeme, location),
            },
            Some(TokenCategory::Punctuation) => match KeywordId::punctuation(&lexeme) {
                Some(id) => Token::keyword(TokenCategory::Punctuation, id, lexeme, location),
                None => unknown(lexeme, location),
            },
            Some(TokenCategory::Comment) => {
                self.skip_comment();
                return None;
            }
            _ if self.automaton.current_state().kind == StateKind::Rejecting => {
                let message = format!("Incomplete number: {}", lexeme);
                Token::invalid(LexicalErrorKind::MalformedNumber, lexeme, location, message)
            }
            _ => unknown(lexeme, location),
        };
        Some(token)
    }

    fn classify_word(&self, lexeme: String, location: SourceLocation) -> Token {
        match self.symbols.lookup(&lexeme) {
            Some(entry) => {
                if let Some(value) = entry.value {
                    Token::literal(LiteralKind::Decimal, value, lexeme, location)
                } else if let Some(id) = entry.keyword {
                    Token::keyword(TokenCategory::Keyword, id, lexeme, location)
                } else {
                    Token::identifier(lexeme, location)
                }
            }
            None => Token::identifier(lexeme, location),
        }
    }
}

impl<S: CharSource> Iterator for Scanner<'_, S> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            None
        } else {
            Some(self.next_token())
        }
    }
}

fn classify_number(lexeme: String, location: SourceLocation) -> Token {
    let kind = if lexeme.contains(['.', 'e', 'E']) {
        LiteralKind::Decimal
    } else {
        LiteralKind::Integer
    };
    let value = lexeme.parse::<f64>().unwrap_or_else(|err| {
        tracing::warn!(%location, "Malformed numeric literal '{}': {}, using 0", lexeme, err);
        0.0
    });
    Token::literal(kind, value, lexeme, location)
}

fn unknown(lexeme: String, location: SourceLocation) -> Token {
    let message = format!("Unknown token: {}", lexeme);
    Token::invalid(LexicalErrorKind::UnknownCharacter, lexeme, location, message)
}
