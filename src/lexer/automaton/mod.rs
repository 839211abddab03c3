//! Finite automata recognizing the token alphabet
//!
//! Both encodings describe the same 17-state machine:
//!
//! | state | meaning | accepts |
//! |---|---|---|
//! | 0 | start | |
//! | 1 | identifier | Identifier |
//! | 2, 3, 16 | integer, fraction, exponent digits | Literal |
//! | 4..=8 | `*` `**` `/` `-` `+` | Operator |
//! | 9..=12 | `,` `;` `(` `)` | Punctuation |
//! | 13 | `//` or `--` | Comment |
//! | 14, 15 | after `e`/`E`, after exponent sign | |
//!
//! [`TableDrivenAutomaton`] looks transitions up in a static table.
//! [`DirectCodedAutomaton`] hard-codes them in a `match`.

mod coded;
mod table;

pub use coded::CodedTransitions;
pub use table::TransitionTable;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::token::TokenCategory;
use crate::error::{Error, Result};

/// Automaton state number
pub type StateId = usize;

pub(crate) const START: StateId = 0;
pub(crate) const IDENTIFIER: StateId = 1;
pub(crate) const INTEGER: StateId = 2;
pub(crate) const FRACTION: StateId = 3;
pub(crate) const STAR: StateId = 4;
pub(crate) const POWER: StateId = 5;
pub(crate) const SLASH: StateId = 6;
pub(crate) const MINUS: StateId = 7;
pub(crate) const PLUS: StateId = 8;
pub(crate) const COMMA: StateId = 9;
pub(crate) const SEMICOLON: StateId = 10;
pub(crate) const LEFT_PAREN: StateId = 11;
pub(crate) const RIGHT_PAREN: StateId = 12;
pub(crate) const COMMENT: StateId = 13;
pub(crate) const EXPONENT_MARK: StateId = 14;
pub(crate) const EXPONENT_SIGN: StateId = 15;
pub(crate) const EXPONENT: StateId = 16;

/// Number of states in the machine
pub const STATE_COUNT: usize = 17;

/// Input class of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// `[A-Za-z_]`
    Letter,
    /// `[0-9]`
    Digit,
    /// Anything else, matched verbatim
    Other(char),
}

impl CharClass {
    /// Class of `c`
    pub fn of(c: char) -> Self {
        if c.is_ascii_alphabetic() || c == '_' {
            CharClass::Letter
        } else if c.is_ascii_digit() {
            CharClass::Digit
        } else {
            CharClass::Other(c)
        }
    }
}

/// Kind of an automaton state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateKind {
    /// State 0
    Start,
    /// A complete token has been read
    Accepting,
    /// Intermediate state that cannot end a token
    Rejecting,
    /// No valid state
    Error,
}

/// Snapshot of the automaton's position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo {
    /// State number, `None` in the error state
    pub id: Option<StateId>,
    /// Kind of the state
    pub kind: StateKind,
    /// Category recognized in this state
    pub accepted: Option<TokenCategory>,
}

impl fmt::Display for StateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.id, self.accepted) {
            (Some(id), Some(category)) => write!(f, "state {} accepting {:?}", id, category),
            (Some(id), None) => write!(f, "state {} ({:?})", id, self.kind),
            (None, _) => write!(f, "error state"),
        }
    }
}

/// Size of an automaton description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutomatonStats {
    /// Number of states
    pub states: usize,
    /// Number of transitions
    pub transitions: usize,
}

/// Available automaton encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomatonKind {
    /// Static transition table
    #[default]
    TableDriven,
    /// Hard-coded transition function
    DirectCoded,
}

impl AutomatonKind {
    /// Builds a fresh automaton of this kind
    pub fn build(self) -> Box<dyn Automaton> {
        match self {
            AutomatonKind::TableDriven => Box::new(TableDrivenAutomaton::new()),
            AutomatonKind::DirectCoded => Box::new(DirectCodedAutomaton::new()),
        }
    }
}

impl FromStr for AutomatonKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "table_driven" | "table" => Ok(AutomatonKind::TableDriven),
            "direct_coded" | "coded" => Ok(AutomatonKind::DirectCoded),
            other => Err(Error::Config(format!("unknown automaton kind `{}`", other))),
        }
    }
}

/// Token recognizer fed one character at a time
pub trait Automaton {
    /// Return to the start state with an empty lexeme
    fn reset(&mut self);

    /// Follow the transition for `c`
    ///
    /// Returns false, leaving state and lexeme untouched, if there is none.
    fn feed(&mut self, c: char) -> bool;

    /// Current state
    fn current_state(&self) -> StateInfo;

    /// True in an accepting state
    fn is_accepting(&self) -> bool {
        self.current_state().kind == StateKind::Accepting
    }

    /// True in the error state
    fn is_error(&self) -> bool {
        self.current_state().kind == StateKind::Error
    }

    /// Category recognized in the current state
    fn accepted_category(&self) -> Option<TokenCategory> {
        self.current_state().accepted
    }

    /// Characters consumed since the last reset
    fn processed_input(&self) -> &str;

    /// Drop the last consumed character and replay the rest from the start
    fn backtrack(&mut self);

    /// Push the current state and lexeme
    fn save_state(&mut self);

    /// Pop the most recently saved state and lexeme
    ///
    /// Does nothing when nothing is saved.
    fn restore_state(&mut self);

    /// Size of the description
    fn stats(&self) -> AutomatonStats;

    /// Encoding of this automaton
    fn kind(&self) -> AutomatonKind;
}

/// A transition function and its accepting states
pub trait Transitions: Default {
    /// Encoding implemented
    const KIND: AutomatonKind;

    /// Target of the transition from `state` on `c`
    fn next(&self, state: StateId, c: char) -> Option<StateId>;

    /// Category accepted in `state`
    fn accepts(&self, state: StateId) -> Option<TokenCategory>;

    /// Number of transitions in the description
    fn transition_count(&self) -> usize;
}

/// Deterministic automaton over a transition encoding
#[derive(Debug, Clone)]
pub struct Dfa<T> {
    transitions: T,
    state: Option<StateId>,
    lexeme: String,
    saved: Vec<(Option<StateId>, String)>,
}

/// Automaton driven by a static transition table
pub type TableDrivenAutomaton = Dfa<TransitionTable>;

/// Automaton with a hard-coded transition function
pub type DirectCodedAutomaton = Dfa<CodedTransitions>;

impl<T: Transitions> Dfa<T> {
    /// Automaton in the start state
    pub fn new() -> Self {
        Dfa {
            transitions: T::default(),
            state: Some(START),
            lexeme: String::new(),
            saved: Vec::new(),
        }
    }

    fn run(&self, input: &str) -> Option<StateId> {
        input
            .chars()
            .try_fold(START, |state, c| self.transitions.next(state, c))
    }
}

impl<T: Transitions> Default for Dfa<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transitions> Automaton for Dfa<T> {
    fn reset(&mut self) {
        self.state = Some(START);
        self.lexeme.clear();
        self.saved.clear();
    }

    fn feed(&mut self, c: char) -> bool {
        let Some(state) = self.state else {
            return false;
        };
        match self.transitions.next(state, c) {
            Some(next) => {
                self.state = Some(next);
                self.lexeme.push(c);
                true
            }
            None => false,
        }
    }

    fn current_state(&self) -> StateInfo {
        match self.state {
            None => StateInfo {
                id: None,
                kind: StateKind::Error,
                accepted: None,
            },
            Some(START) => StateInfo {
                id: Some(START),
                kind: StateKind::Start,
                accepted: None,
            },
            Some(id) => {
                let accepted = self.transitions.accepts(id);
                StateInfo {
                    id: Some(id),
                    kind: if accepted.is_some() {
                        StateKind::Accepting
                    } else {
                        StateKind::Rejecting
                    },
                    accepted,
                }
            }
        }
    }

    fn processed_input(&self) -> &str {
        &self.lexeme
    }

    fn backtrack(&mut self) {
        if self.lexeme.pop().is_none() {
            return;
        }
        self.state = self.run(&self.lexeme);
    }

    fn save_state(&mut self) {
        self.saved.push((self.state, self.lexeme.clone()));
    }

    fn restore_state(&mut self) {
        if let Some((state, lexeme)) = self.saved.pop() {
            self.state = state;
            self.lexeme = lexeme;
        }
    }

    fn stats(&self) -> AutomatonStats {
        AutomatonStats {
            states: STATE_COUNT,
            transitions: self.transitions.transition_count(),
        }
    }

    fn kind(&self) -> AutomatonKind {
        T::KIND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(automaton: &mut dyn Automaton, input: &str) -> usize {
        input.chars().take_while(|&c| automaton.feed(c)).count()
    }

    fn both() -> Vec<Box<dyn Automaton>> {
        vec![
            AutomatonKind::TableDriven.build(),
            AutomatonKind::DirectCoded.build(),
        ]
    }

    #[test]
    fn test_number_with_exponent_is_one_literal() {
        for mut a in both() {
            assert_eq!(feed_all(a.as_mut(), "1.5e10"), 6);
            assert_eq!(a.accepted_category(), Some(TokenCategory::Literal));
            assert_eq!(a.processed_input(), "1.5e10");
        }
    }

    #[test]
    fn test_exponent_without_digits_is_rejecting() {
        for mut a in both() {
            assert_eq!(feed_all(a.as_mut(), "2e+;"), 3);
            assert_eq!(a.current_state().kind, StateKind::Rejecting);
            assert!(!a.is_accepting());
            assert!(!a.is_error());
        }
    }

    #[test]
    fn test_failed_feed_leaves_state_untouched() {
        for mut a in both() {
            assert!(a.feed('*'));
            let before = a.current_state();
            assert!(!a.feed('/'));
            assert_eq!(a.current_state(), before);
            assert_eq!(a.processed_input(), "*");
            assert!(a.feed('*'));
            assert_eq!(a.current_state().id, Some(POWER));
        }
    }

    #[test]
    fn test_comment_starts() {
        for mut a in both() {
            assert_eq!(feed_all(a.as_mut(), "//"), 2);
            assert_eq!(a.accepted_category(), Some(TokenCategory::Comment));
            a.reset();
            assert_eq!(feed_all(a.as_mut(), "--"), 2);
            assert_eq!(a.accepted_category(), Some(TokenCategory::Comment));
        }
    }

    #[test]
    fn test_backtrack_replays_prefix() {
        for mut a in both() {
            feed_all(a.as_mut(), "12e");
            assert_eq!(a.current_state().id, Some(EXPONENT_MARK));
            a.backtrack();
            assert_eq!(a.processed_input(), "12");
            assert_eq!(a.current_state().id, Some(INTEGER));
            a.backtrack();
            a.backtrack();
            assert_eq!(a.current_state().kind, StateKind::Start);
            a.backtrack();
            assert_eq!(a.current_state().kind, StateKind::Start);
        }
    }

    #[test]
    fn test_save_and_restore() {
        for mut a in both() {
            feed_all(a.as_mut(), "ab");
            a.save_state();
            feed_all(a.as_mut(), "c1");
            assert_eq!(a.processed_input(), "abc1");
            a.restore_state();
            assert_eq!(a.processed_input(), "ab");
            a.restore_state();
            assert_eq!(a.processed_input(), "ab");
        }
    }

    #[test]
    fn test_stats_agree() {
        let table = TableDrivenAutomaton::new();
        let coded = DirectCodedAutomaton::new();
        assert_eq!(table.stats(), coded.stats());
        assert_eq!(table.stats().states, 17);
        assert_eq!(table.stats().transitions, 27);
        assert_eq!(table.kind(), AutomatonKind::TableDriven);
        assert_eq!(coded.kind(), AutomatonKind::DirectCoded);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "direct-coded".parse::<AutomatonKind>().ok(),
            Some(AutomatonKind::DirectCoded)
        );
        assert_eq!(
            "TABLE_DRIVEN".parse::<AutomatonKind>().ok(),
            Some(AutomatonKind::TableDriven)
        );
        assert!("regex".parse::<AutomatonKind>().is_err());
    }

    #[test]
    fn test_every_state_agrees_on_every_ascii_input() {
        let table = TransitionTable::default();
        let coded = CodedTransitions::default();
        for state in 0..STATE_COUNT {
            assert_eq!(table.accepts(state), coded.accepts(state), "state {}", state);
            for c in (0u8..128).map(char::from) {
                assert_eq!(
                    table.next(state, c),
                    coded.next(state, c),
                    "state {} on {:?}",
                    state,
                    c
                );
            }
        }
    }
}
