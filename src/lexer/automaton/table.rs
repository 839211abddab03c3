use std::collections::HashMap;

use super::*;
use crate::lexer::token::TokenCategory;

const fn on(c: char) -> CharClass {
    CharClass::Other(c)
}

/// Transition triples `(from, input, to)`
const TRANSITIONS: &[(StateId, CharClass, StateId)] = &[
    (START, CharClass::Letter, IDENTIFIER),
    (START, CharClass::Digit, INTEGER),
    (START, on('*'), STAR),
    (START, on('/'), SLASH),
    (START, on('+'), PLUS),
    (START, on('-'), MINUS),
    (START, on(','), COMMA),
    (START, on(';'), SEMICOLON),
    (START, on('('), LEFT_PAREN),
    (START, on(')'), RIGHT_PAREN),
    (IDENTIFIER, CharClass::Letter, IDENTIFIER),
    (IDENTIFIER, CharClass::Digit, IDENTIFIER),
    (INTEGER, CharClass::Digit, INTEGER),
    (INTEGER, on('.'), FRACTION),
    (INTEGER, on('e'), EXPONENT_MARK),
    (INTEGER, on('E'), EXPONENT_MARK),
    (FRACTION, CharClass::Digit, FRACTION),
    (FRACTION, on('e'), EXPONENT_MARK),
    (FRACTION, on('E'), EXPONENT_MARK),
    (STAR, on('*'), POWER),
    (SLASH, on('/'), COMMENT),
    (MINUS, on('-'), COMMENT),
    (EXPONENT_MARK, on('+'), EXPONENT_SIGN),
    (EXPONENT_MARK, on('-'), EXPONENT_SIGN),
    (EXPONENT_MARK, CharClass::Digit, EXPONENT),
    (EXPONENT_SIGN, CharClass::Digit, EXPONENT),
    (EXPONENT, CharClass::Digit, EXPONENT),
];

/// Accepting states and the category each one recognizes
const ACCEPTING: &[(StateId, TokenCategory)] = &[
    (IDENTIFIER, TokenCategory::Identifier),
    (INTEGER, TokenCategory::Literal),
    (FRACTION, TokenCategory::Literal),
    (EXPONENT, TokenCategory::Literal),
    (STAR, TokenCategory::Operator),
    (POWER, TokenCategory::Operator),
    (SLASH, TokenCategory::Operator),
    (MINUS, TokenCategory::Operator),
    (PLUS, TokenCategory::Operator),
    (COMMA, TokenCategory::Punctuation),
    (SEMICOLON, TokenCategory::Punctuation),
    (LEFT_PAREN, TokenCategory::Punctuation),
    (RIGHT_PAREN, TokenCategory::Punctuation),
    (COMMENT, TokenCategory::Comment),
];

lazy_static::lazy_static! {
    static ref TRANSITION_INDEX: HashMap<(StateId, CharClass), StateId> = TRANSITIONS
        .iter()
        .map(|&(from, input, to)| ((from, input), to))
        .collect();
}

/// Transition function backed by a static table
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionTable;

impl Transitions for TransitionTable {
    const KIND: AutomatonKind = AutomatonKind::TableDriven;

    fn next(&self, state: StateId, c: char) -> Option<StateId> {
        // Class entries win; literal entries catch letters like `e`.
        let class = CharClass::of(c);
        TRANSITION_INDEX
            .get(&(state, class))
            .or_else(|| TRANSITION_INDEX.get(&(state, CharClass::Other(c))))
            .copied()
    }

    fn accepts(&self, state: StateId) -> Option<TokenCategory> {
        ACCEPTING
            .iter()
            .find(|&&(id, _)| id == state)
            .map(|&(_, category)| category)
    }

    fn transition_count(&self) -> usize {
        TRANSITIONS.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_no_duplicate_keys() {
        assert_eq!(TRANSITION_INDEX.len(), TRANSITIONS.len());
    }

    #[test]
    fn test_letter_e_falls_back_to_literal_entry() {
        let table = TransitionTable;
        assert_eq!(table.next(INTEGER, 'e'), Some(EXPONENT_MARK));
        assert_eq!(table.next(INTEGER, 'E'), Some(EXPONENT_MARK));
        assert_eq!(table.next(INTEGER, 'x'), None);
        assert_eq!(table.next(IDENTIFIER, 'e'), Some(IDENTIFIER));
    }

    #[test]
    fn test_non_ascii_letters_have_no_transition() {
        let table = TransitionTable;
        assert_eq!(table.next(START, 'é'), None);
        assert_eq!(table.next(IDENTIFIER, 'λ'), None);
    }
}
