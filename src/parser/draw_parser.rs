use super::ast::{
    BinaryOp, ColorName, ColorSpec, Expression, Program, SizeSpec, Statement, UnaryOp,
};
use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::lexer::{
    CharSource, KeywordId, LexicalErrorKind, Scanner, SourceLocation, Token, TokenCategory,
    TokenPayload,
};

/// Deepest rule nesting accepted before an expression is cut off
const MAX_DEPTH: usize = 256;

/// Parser behavior switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Emit `tracing` trace events for every rule and matched token
    pub trace: bool,
    /// Discard tokens after a mismatch until the expected one shows up
    pub recover_from_errors: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            trace: false,
            recover_from_errors: true,
        }
    }
}

/// Recursive-descent parser for drawing programs
///
/// Pulls tokens from a [`Scanner`] one at a time and reports every lexical
/// and syntax problem into a caller-owned [`Diagnostics`] list. Parsing never
/// fails: the result is always a well-formed (possibly empty) [`Program`].
pub struct Parser<'a, S> {
    scanner: Scanner<'a, S>,
    diagnostics: &'a mut Diagnostics,
    config: ParserConfig,
    current: Token,
    depth: usize,
}

impl<'a, S: CharSource> Parser<'a, S> {
    /// Creates a parser with the default configuration
    pub fn new(scanner: Scanner<'a, S>, diagnostics: &'a mut Diagnostics) -> Self {
        Parser::with_config(scanner, diagnostics, ParserConfig::default())
    }

    /// Creates a parser
    pub fn with_config(
        scanner: Scanner<'a, S>,
        diagnostics: &'a mut Diagnostics,
        config: ParserConfig,
    ) -> Self {
        let placeholder = Token::end_of_input(SourceLocation::start_of(scanner.source_id()));
        let mut parser = Parser {
            scanner,
            diagnostics,
            config,
            current: placeholder,
            depth: 0,
        };
        parser.advance();
        parser
    }

    /// Parses the whole source
    pub fn parse(&mut self) -> Program {
        self.enter("program");
        let mut program = Program::new(self.scanner.source_id());

        while !self.current.is_end() {
            match self.statement() {
                Some(statement) => {
                    if self.config.trace {
                        tracing::trace!("parsed statement `{}`\n{}", statement, statement.dump());
                    }
                    program.statements.push(statement);
                    self.expect(KeywordId::Semicolon);
                }
                None => self.synchronize(),
            }
        }

        self.leave("program");
        program
    }

    fn statement(&mut self) -> Option<Statement> {
        let statement = match self.current.keyword_id() {
            Some(KeywordId::Origin) => self.origin_statement(),
            Some(KeywordId::Scale) => self.scale_statement(),
            Some(KeywordId::Rot) => self.rot_statement(),
            Some(KeywordId::For) => self.for_statement(),
            Some(KeywordId::Color) => self.color_statement(),
            Some(KeywordId::Size) => self.size_statement(),
            _ => {
                self.unexpected("a statement");
                return None;
            }
        };
        Some(statement)
    }

    fn origin_statement(&mut self) -> Statement {
        self.enter("origin_statement");
        let location = self.advance().location;
        self.expect(KeywordId::Is);
        let (x, y) = self.pair();
        self.leave("origin_statement");
        Statement::Origin { x, y, location }
    }

    fn scale_statement(&mut self) -> Statement {
        self.enter("scale_statement");
        let location = self.advance().location;
        self.expect(KeywordId::Is);
        let (x, y) = self.pair();
        self.leave("scale_statement");
        Statement::Scale { x, y, location }
    }

    fn rot_statement(&mut self) -> Statement {
        self.enter("rot_statement");
        let location = self.advance().location;
        self.expect(KeywordId::Is);
        let angle = self.expression();
        self.leave("rot_statement");
        Statement::Rot { angle, location }
    }

    fn for_statement(&mut self) -> Statement {
        self.enter("for_statement");
        let location = self.advance().location;
        self.expect(KeywordId::Param);
        self.expect(KeywordId::From);
        let start = self.expression();
        self.expect(KeywordId::To);
        let end = self.expression();
        self.expect(KeywordId::Step);
        let step = self.expression();
        self.expect(KeywordId::Draw);
        let (x, y) = self.pair();
        self.leave("for_statement");
        Statement::ForDraw {
            start,
            end,
            step,
            x,
            y,
            location,
        }
    }

    fn color_statement(&mut self) -> Statement {
        self.enter("color_statement");
        let location = self.advance().location;
        self.expect(KeywordId::Is);

        let color = if self.check(KeywordId::LeftParen) {
            self.advance();
            let red = self.expression();
            self.expect(KeywordId::Comma);
            let green = self.expression();
            self.expect(KeywordId::Comma);
            let blue = self.expression();
            self.expect(KeywordId::RightParen);
            ColorSpec::Rgb { red, green, blue }
        } else if matches!(
            self.current.category,
            TokenCategory::Identifier | TokenCategory::Keyword
        ) {
            let token = self.advance();
            ColorSpec::Named(Expression::ColorName(ColorName {
                name: token.lexeme,
                location: token.location,
            }))
        } else {
            self.unexpected("a color");
            ColorSpec::Named(Expression::ColorName(ColorName {
                name: String::new(),
                location: self.current.location.clone(),
            }))
        };

        self.leave("color_statement");
        Statement::Color { color, location }
    }

    fn size_statement(&mut self) -> Statement {
        self.enter("size_statement");
        let location = self.advance().location;
        self.expect(KeywordId::Is);

        let size = if self.check(KeywordId::LeftParen) {
            self.advance();
            let first = self.expression();
            if self.check(KeywordId::Comma) {
                self.advance();
                let height = self.expression();
                self.expect(KeywordId::RightParen);
                SizeSpec::Pair {
                    width: first,
                    height,
                }
            } else {
                // `( e )` was the leading atom of a longer expression.
                self.expect(KeywordId::RightParen);
                let component = self.component_tail(first);
                let term = self.term_tail(component);
                SizeSpec::Uniform(self.expression_tail(term))
            }
        } else {
            SizeSpec::Uniform(self.expression())
        };

        self.leave("size_statement");
        Statement::Size { size, location }
    }

    /// `( expr , expr )`
    fn pair(&mut self) -> (Expression, Expression) {
        self.expect(KeywordId::LeftParen);
        let first = self.expression();
        self.expect(KeywordId::Comma);
        let second = self.expression();
        self.expect(KeywordId::RightParen);
        (first, second)
    }

    fn expression(&mut self) -> Expression {
        self.enter("expression");
        let left = self.term();
        let expr = self.expression_tail(left);
        self.leave("expression");
        expr
    }

    /// Folds `+`/`-` links onto `left`
    ///
    /// Each link nests the tree one level deeper, so links count against
    /// [`MAX_DEPTH`] like recursive rules do.
    fn expression_tail(&mut self, mut left: Expression) -> Expression {
        let depth = self.depth;
        loop {
            let op = match self.current.keyword_id() {
                Some(KeywordId::Plus) => BinaryOp::Add,
                Some(KeywordId::Minus) => BinaryOp::Sub,
                _ => break,
            };
            if self.depth >= MAX_DEPTH {
                self.report_too_deep();
                break;
            }
            self.depth += 1;
            let location = self.advance().location;
            let right = self.term();
            left = Expression::binary(op, left, right, location);
        }
        self.depth = depth;
        left
    }

    fn term(&mut self) -> Expression {
        self.enter("term");
        let left = self.factor();
        let expr = self.term_tail(left);
        self.leave("term");
        expr
    }

    fn term_tail(&mut self, mut left: Expression) -> Expression {
        let depth = self.depth;
        loop {
            let op = match self.current.keyword_id() {
                Some(KeywordId::Mul) => BinaryOp::Mul,
                Some(KeywordId::Div) => BinaryOp::Div,
                _ => break,
            };
            if self.depth >= MAX_DEPTH {
                self.report_too_deep();
                break;
            }
            self.depth += 1;
            let location = self.advance().location;
            let right = self.factor();
            left = Expression::binary(op, left, right, location);
        }
        self.depth = depth;
        left
    }

    fn factor(&mut self) -> Expression {
        let op = match self.current.keyword_id() {
            Some(KeywordId::Plus) => UnaryOp::Plus,
            Some(KeywordId::Minus) => UnaryOp::Neg,
            _ => return self.component(),
        };
        if self.depth >= MAX_DEPTH {
            return self.too_deep();
        }
        self.enter("factor");
        let location = self.advance().location;
        let operand = self.factor();
        self.leave("factor");
        Expression::Unary {
            op,
            operand: Box::new(operand),
            location,
        }
    }

    fn component(&mut self) -> Expression {
        if self.depth >= MAX_DEPTH {
            return self.too_deep();
        }
        self.enter("component");
        let base = self.atom();
        let expr = self.component_tail(base);
        self.leave("component");
        expr
    }

    fn component_tail(&mut self, base: Expression) -> Expression {
        if !self.check(KeywordId::Power) {
            return base;
        }
        let location = self.advance().location;
        let exponent = self.component();
        Expression::binary(BinaryOp::Pow, base, exponent, location)
    }

    fn atom(&mut self) -> Expression {
        match (self.current.category, self.current.keyword_id()) {
            (TokenCategory::Literal, _) => {
                let token = self.advance();
                Expression::Const {
                    value: token.literal_value().unwrap_or(0.0),
                    lexeme: token.lexeme,
                    location: token.location,
                }
            }
            (TokenCategory::Keyword, Some(KeywordId::Param)) => {
                let location = self.advance().location;
                Expression::Param { location }
            }
            (TokenCategory::Keyword, Some(KeywordId::Func)) => {
                let token = self.advance();
                self.call(token.lexeme, token.location)
            }
            (TokenCategory::Identifier, _) => {
                let token = self.advance();
                if self.check(KeywordId::LeftParen) {
                    return self.call(token.lexeme, token.location);
                }
                let value = match self.scanner.symbols().constant(&token.lexeme) {
                    Some(value) => value,
                    None => {
                        self.diagnostics.report(Error::UnknownIdentifier {
                            name: token.lexeme.clone(),
                            location: token.location.clone(),
                        });
                        0.0
                    }
                };
                Expression::constant(value, token.lexeme, token.location)
            }
            (TokenCategory::Punctuation, Some(KeywordId::LeftParen)) => {
                self.advance();
                let expr = self.expression();
                self.expect(KeywordId::RightParen);
                expr
            }
            _ => {
                self.unexpected("an expression");
                Expression::constant(0.0, "0", self.current.location.clone())
            }
        }
    }

    fn call(&mut self, name: String, location: SourceLocation) -> Expression {
        let function = self.scanner.symbols().function(&name);
        if function.is_none() {
            self.diagnostics.report(Error::UnknownFunction {
                name: name.clone(),
                location: location.clone(),
            });
        }
        self.expect(KeywordId::LeftParen);
        let argument = self.expression();
        self.expect(KeywordId::RightParen);
        Expression::Call {
            name,
            function,
            argument: Box::new(argument),
            location,
        }
    }

    fn too_deep(&mut self) -> Expression {
        self.report_too_deep();
        Expression::constant(0.0, "0", self.current.location.clone())
    }

    fn report_too_deep(&mut self) {
        self.diagnostics.report(Error::syntax(
            self.current.location.clone(),
            self.current.lexeme.clone(),
            "expression nested too deeply",
        ));
    }

    // Token handling

    /// Moves to the next valid token and returns the previous one
    ///
    /// Invalid tokens are reported as lexical errors and skipped.
    fn advance(&mut self) -> Token {
        loop {
            let token = self.scanner.next_token();
            if token.category != TokenCategory::Invalid {
                if self.config.trace {
                    tracing::trace!("{}fetch {}", "  ".repeat(self.depth), token);
                }
                return std::mem::replace(&mut self.current, token);
            }

            tracing::debug!(location = %token.location, "Discard invalid token '{}'", token.lexeme);
            let (kind, message) = match token.payload {
                TokenPayload::Error { kind, message } => (kind, message),
                _ => (
                    LexicalErrorKind::UnknownCharacter,
                    format!("invalid text '{}'", token.lexeme),
                ),
            };
            self.diagnostics.report(Error::Lexical {
                kind,
                lexeme: token.lexeme,
                location: token.location,
                message,
            });
        }
    }

    fn check(&self, id: KeywordId) -> bool {
        self.current.is(id)
    }

    /// Consumes the expected token, recovering from a mismatch
    ///
    /// On a mismatch one error is reported at the current token; with
    /// recovery enabled tokens are then discarded until the expected one
    /// (which is consumed) or the end of input.
    fn expect(&mut self, expected: KeywordId) -> bool {
        if self.check(expected) {
            if self.config.trace {
                tracing::trace!("{}match {}", "  ".repeat(self.depth), expected.describe());
            }
            self.advance();
            return true;
        }

        self.unexpected(expected.describe());
        if !self.config.recover_from_errors {
            return false;
        }

        while !self.current.is_end() {
            self.discard();
            if self.check(expected) {
                self.advance();
                return true;
            }
        }
        false
    }

    /// Skips the rest of an unparseable statement, including its `;`
    fn synchronize(&mut self) {
        if !self.config.recover_from_errors {
            if !self.current.is_end() {
                self.discard();
            }
            return;
        }
        while !self.current.is_end() {
            if self.check(KeywordId::Semicolon) {
                self.advance();
                return;
            }
            self.discard();
        }
    }

    fn discard(&mut self) {
        tracing::debug!(
            location = %self.current.location,
            "Discard mismatched token '{}'", self.current.lexeme
        );
        self.advance();
    }

    fn unexpected(&mut self, expected: &str) {
        let token = &self.current;
        let message = if token.is_end() {
            format!("unexpected end of input, expected {}", expected)
        } else {
            format!("unexpected token '{}', expected {}", token.lexeme, expected)
        };
        self.diagnostics.report(Error::syntax(
            token.location.clone(),
            token.lexeme.clone(),
            message,
        ));
    }

    fn enter(&mut self, rule: &str) {
        if self.config.trace {
            tracing::trace!("{}enter {}", "  ".repeat(self.depth), rule);
        }
        self.depth += 1;
    }

    fn leave(&mut self, rule: &str) {
        self.depth = self.depth.saturating_sub(1);
        if self.config.trace {
            tracing::trace!("{}exit {}", "  ".repeat(self.depth), rule);
        }
    }
}
