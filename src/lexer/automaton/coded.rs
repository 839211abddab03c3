use super::*;
use crate::lexer::token::TokenCategory;

/// Transition function written out as a `match`
#[derive(Debug, Clone, Copy, Default)]
pub struct CodedTransitions;

impl Transitions for CodedTransitions {
    const KIND: AutomatonKind = AutomatonKind::DirectCoded;

    fn next(&self, state: StateId, c: char) -> Option<StateId> {
        let letter = c.is_ascii_alphabetic() || c == '_';
        let digit = c.is_ascii_digit();

        let next = match state {
            START => match c {
                _ if letter => IDENTIFIER,
                _ if digit => INTEGER,
                '*' => STAR,
                '/' => SLASH,
                '+' => PLUS,
                '-' => MINUS,
                ',' => COMMA,
                ';' => SEMICOLON,
                '(' => LEFT_PAREN,
                ')' => RIGHT_PAREN,
                _ => return None,
            },
            IDENTIFIER if letter || digit => IDENTIFIER,
            INTEGER => match c {
                _ if digit => INTEGER,
                '.' => FRACTION,
                'e' | 'E' => EXPONENT_MARK,
                _ => return None,
            },
            FRACTION => match c {
                _ if digit => FRACTION,
                'e' | 'E' => EXPONENT_MARK,
                _ => return None,
            },
            STAR if c == '*' => POWER,
            SLASH if c == '/' => COMMENT,
            MINUS if c == '-' => COMMENT,
            EXPONENT_MARK => match c {
                '+' | '-' => EXPONENT_SIGN,
                _ if digit => EXPONENT,
                _ => return None,
            },
            EXPONENT_SIGN | EXPONENT if digit => EXPONENT,
            _ => return None,
        };
        Some(next)
    }

    fn accepts(&self, state: StateId) -> Option<TokenCategory> {
        match state {
            IDENTIFIER => Some(TokenCategory::Identifier),
            INTEGER | FRACTION | EXPONENT => Some(TokenCategory::Literal),
            STAR | POWER | SLASH | MINUS | PLUS => Some(TokenCategory::Operator),
            COMMA | SEMICOLON | LEFT_PAREN | RIGHT_PAREN => Some(TokenCategory::Punctuation),
            COMMENT => Some(TokenCategory::Comment),
            _ => None,
        }
    }

    fn transition_count(&self) -> usize {
        27
    }
}
