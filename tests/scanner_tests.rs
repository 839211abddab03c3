//! Scanner and automaton behavior through the public API

use drawlang::lexer::{LexicalErrorKind, LiteralKind, TokenPayload};
use drawlang::{
    Automaton, AutomatonKind, CharSource, KeywordId, ReaderSource, Scanner, StringSource,
    SymbolTable, Token, TokenCategory,
};
use std::io::Cursor;

const PROGRAM: &str = "ORIGIN is (350, 220);\n\
                       // a comment line\n\
                       rot is -pi/6; pixsize is 2.5e0;\n\
                       for T from 0 to 2*PI step pi/50 draw (cos(t), sin(t)**2);\n";

fn scan(source: &str, kind: AutomatonKind) -> Vec<Token> {
    let symbols = SymbolTable::new();
    Scanner::from_text(source, "scan", &symbols, kind).tokenize_all()
}

#[test]
fn test_encodings_agree_on_program() {
    assert_eq!(
        scan(PROGRAM, AutomatonKind::TableDriven),
        scan(PROGRAM, AutomatonKind::DirectCoded)
    );
}

#[test]
fn test_encodings_describe_the_same_machine() {
    let table = AutomatonKind::TableDriven.build();
    let coded = AutomatonKind::DirectCoded.build();
    assert_eq!(table.stats(), coded.stats());
    assert_eq!(table.stats().states, 17);
    assert_eq!(table.stats().transitions, 27);
    assert_eq!(table.kind(), AutomatonKind::TableDriven);
    assert_eq!(coded.kind(), AutomatonKind::DirectCoded);
}

#[test]
fn test_automaton_walk() {
    let mut automaton = AutomatonKind::DirectCoded.build();
    for c in "2.5e-3".chars() {
        assert!(automaton.feed(c), "rejected {:?}", c);
    }
    assert!(automaton.is_accepting());
    assert_eq!(automaton.accepted_category(), Some(TokenCategory::Literal));
    assert_eq!(automaton.processed_input(), "2.5e-3");
    assert!(!automaton.feed('x'));

    automaton.backtrack();
    automaton.backtrack();
    assert_eq!(automaton.processed_input(), "2.5e");
    assert!(!automaton.is_accepting());
    assert!(automaton.accepted_category().is_none());
}

#[test]
fn test_program_token_sequence() {
    let tokens = scan("for T from 0 to 2*PI step 0.5 draw (t, t);", AutomatonKind::TableDriven);
    let categories: Vec<TokenCategory> = tokens.iter().map(|t| t.category).collect();
    use TokenCategory::*;
    assert_eq!(
        categories,
        vec![
            Keyword, Keyword, Keyword, Literal, Keyword, Literal, Operator, Literal, Keyword,
            Literal, Keyword, Punctuation, Keyword, Punctuation, Keyword, Punctuation,
            Punctuation, EndOfInput,
        ]
    );
    assert!(tokens[6].is(KeywordId::Mul));
    assert_eq!(tokens[7].lexeme, "PI");
    assert_eq!(tokens[7].literal_value(), Some(std::f64::consts::PI));
}

#[test]
fn test_literal_kinds() {
    let tokens = scan("7 7.25 1E2", AutomatonKind::TableDriven);
    let kinds: Vec<Option<LiteralKind>> = tokens
        .iter()
        .map(|t| match t.payload {
            TokenPayload::Literal { kind, .. } => Some(kind),
            _ => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            Some(LiteralKind::Integer),
            Some(LiteralKind::Decimal),
            Some(LiteralKind::Decimal),
            None,
        ]
    );
    assert_eq!(tokens[2].literal_value(), Some(100.0));
}

#[test]
fn test_malformed_number_then_recovery() {
    let tokens = scan("2e+ ;", AutomatonKind::TableDriven);
    assert_eq!(tokens[0].category, TokenCategory::Invalid);
    assert_eq!(tokens[0].lexeme, "2e+");
    assert!(matches!(
        tokens[0].payload,
        TokenPayload::Error {
            kind: LexicalErrorKind::MalformedNumber,
            ..
        }
    ));
    assert!(tokens[1].is(KeywordId::Semicolon));
}

#[test]
fn test_reader_source_scans_like_string_source() {
    let symbols = SymbolTable::new();
    let from_reader = Scanner::new(
        ReaderSource::new(Cursor::new(PROGRAM.as_bytes()), "scan"),
        &symbols,
        AutomatonKind::TableDriven,
    )
    .tokenize_all();
    assert_eq!(from_reader, scan(PROGRAM, AutomatonKind::TableDriven));
}

#[test]
fn test_token_locations_span_lines() {
    let tokens = scan(PROGRAM, AutomatonKind::TableDriven);
    let rot = tokens
        .iter()
        .find(|t| t.is(KeywordId::Rot))
        .expect("ROT token");
    assert_eq!(rot.location.line, 3);
    assert_eq!(rot.location.column, 1);
    let last = tokens.last().expect("end token");
    assert!(last.is_end());
    assert_eq!(last.location.line, 5);
}

#[test]
fn test_invalid_utf8_ends_input() {
    let symbols = SymbolTable::new();
    let bytes: &[u8] = b"rot is 1;\n\xff\xfe rot is 2;\n";
    let tokens = Scanner::new(
        ReaderSource::new(Cursor::new(bytes), "bytes"),
        &symbols,
        AutomatonKind::TableDriven,
    )
    .tokenize_all();
    assert_eq!(tokens.len(), 5);
    assert!(tokens[4].is_end());
}

#[test]
fn test_string_source_cursor() {
    let mut source = StringSource::new("ab\ncd", "cursor");
    assert_eq!(source.next_char(), Some('a'));
    assert_eq!(source.next_char(), Some('b'));
    assert_eq!(source.next_char(), Some('\n'));
    assert_eq!(source.location().line, 2);
    source.unget_char();
    assert_eq!(source.location().line, 1);
    assert_eq!(source.location().column, 3);
    assert_eq!(source.peek_char(), Some('\n'));
    assert!(!source.is_eof());
}

#[test]
fn test_scanner_iterator_stops_after_end() {
    let symbols = SymbolTable::new();
    let mut scanner = Scanner::from_text("size is 3;", "iter", &symbols, AutomatonKind::DirectCoded);
    assert_eq!(scanner.by_ref().count(), 5);
    assert!(!scanner.has_more_tokens());
    assert!(scanner.next_token().is_end());
    assert_eq!(scanner.automaton_kind(), AutomatonKind::DirectCoded);
}
