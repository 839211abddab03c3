//! Property-based fuzz tests for the scanner, parser and analyzer
//!
//! These tests feed arbitrary and structured input through the pipeline and
//! check that nothing panics, that both automaton encodings agree, and that
//! parsing is deterministic.

use drawlang::{
    parse_source, AutomatonKind, Interpreter, InterpreterConfig, PointRecorder, Scanner,
    SymbolTable, TokenCategory,
};
use proptest::prelude::*;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Arbitrary printable text, newlines included
fn arbitrary_source_string() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~\n\t]{0,200}").unwrap()
}

/// Sequences of tokens the language knows about, in any order
fn token_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(token_fragment(), 0..40).prop_map(|parts| parts.join(" "))
}

fn token_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        // Keywords
        Just("ORIGIN".to_string()),
        Just("scale".to_string()),
        Just("rot".to_string()),
        Just("is".to_string()),
        Just("for".to_string()),
        Just("T".to_string()),
        Just("from".to_string()),
        Just("to".to_string()),
        Just("step".to_string()),
        Just("draw".to_string()),
        Just("color".to_string()),
        Just("pixsize".to_string()),
        // Operators and punctuation
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("**".to_string()),
        Just("/".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just(",".to_string()),
        Just(";".to_string()),
        // Numbers, including half-written exponents
        (0u32..1000).prop_map(|n| n.to_string()),
        (0.0f64..100.0).prop_map(|f| format!("{:.3}", f)),
        "[0-9]{1,3}[eE][+-]?[0-9]{0,2}".prop_map(|s| s),
        // Names and functions
        "[a-z][a-z0-9]{0,6}".prop_map(|s| s),
        Just("sin(".to_string()),
        Just("pi".to_string()),
        // Comments and stray characters
        "//[a-z ]{0,10}\n".prop_map(|s| s),
        "--[a-z ]{0,10}\n".prop_map(|s| s),
        "[@#$%&!?]".prop_map(|s| s),
    ]
}

fn small_expr() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (-20i32..20).prop_map(|n| format!("({})", n)),
        (0.0f64..10.0).prop_map(|f| format!("{:.2}", f)),
        Just("t".to_string()),
        Just("pi".to_string()),
    ];
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), prop_oneof![Just("+"), Just("-"), Just("*"), Just("/")], inner.clone())
                .prop_map(|(l, op, r)| format!("({} {} {})", l, op, r)),
            (prop_oneof![Just("sin"), Just("cos"), Just("abs")], inner)
                .prop_map(|(f, e)| format!("{}({})", f, e)),
        ]
    })
}

/// Well-formed programs with a bounded number of plotted points
fn valid_program() -> impl Strategy<Value = String> {
    let statement = prop_oneof![
        (small_expr(), small_expr()).prop_map(|(x, y)| format!("origin is ({}, {});", x, y)),
        (small_expr(), small_expr()).prop_map(|(x, y)| format!("scale is ({}, {});", x, y)),
        small_expr().prop_map(|a| format!("rot is {};", a)),
        (0u8..=255, 0u8..=255, 0u8..=255)
            .prop_map(|(r, g, b)| format!("color is ({}, {}, {});", r, g, b)),
        (1u32..5).prop_map(|s| format!("size is {};", s)),
        (-5i32..5, 1u32..20, small_expr(), small_expr()).prop_map(|(start, n, x, y)| {
            format!(
                "for t from {} to {} step 0.5 draw ({}, {});",
                start,
                start + n as i32,
                x,
                y
            )
        }),
    ];
    prop::collection::vec(statement, 0..8).prop_map(|stmts| stmts.join("\n"))
}

fn tokens_with(source: &str, kind: AutomatonKind) -> Vec<drawlang::Token> {
    let symbols = SymbolTable::new();
    Scanner::from_text(source, "fuzz", &symbols, kind).tokenize_all()
}

// =============================================================================
// SCANNER FUZZ TESTS
// =============================================================================

proptest! {
    /// The scanner never panics and always ends with exactly one end token
    #[test]
    fn scanner_never_panics(source in arbitrary_source_string()) {
        let tokens = tokens_with(&source, AutomatonKind::TableDriven);
        let ends = tokens
            .iter()
            .filter(|t| t.category == TokenCategory::EndOfInput)
            .count();
        prop_assert_eq!(ends, 1);
        prop_assert!(tokens.last().map(|t| t.is_end()).unwrap_or(false));
    }

    /// Both automaton encodings produce the same token stream
    #[test]
    fn automata_agree_on_arbitrary_text(source in arbitrary_source_string()) {
        prop_assert_eq!(
            tokens_with(&source, AutomatonKind::TableDriven),
            tokens_with(&source, AutomatonKind::DirectCoded)
        );
    }

    #[test]
    fn automata_agree_on_token_soup(source in token_soup()) {
        prop_assert_eq!(
            tokens_with(&source, AutomatonKind::TableDriven),
            tokens_with(&source, AutomatonKind::DirectCoded)
        );
    }

    /// Token lexemes never overlap and appear in source order
    #[test]
    fn token_offsets_increase(source in token_soup()) {
        let tokens = tokens_with(&source, AutomatonKind::TableDriven);
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].location.offset < pair[1].location.offset
                || pair[1].is_end());
        }
    }
}

// =============================================================================
// PARSER FUZZ TESTS
// =============================================================================

proptest! {
    /// The parser never panics, whatever the recovery mode
    #[test]
    fn parser_never_panics(source in token_soup(), recover in prop::bool::ANY) {
        let config = InterpreterConfig {
            recover_from_errors: recover,
            ..InterpreterConfig::default()
        };
        let _ = parse_source(&source, "fuzz", &config);
    }

    /// Parsing the same text twice gives the same program and errors
    #[test]
    fn parsing_is_deterministic(source in token_soup()) {
        let config = InterpreterConfig::default();
        let first = parse_source(&source, "fuzz", &config);
        let second = parse_source(&source, "fuzz", &config);
        prop_assert_eq!(first.program, second.program);
        prop_assert_eq!(first.diagnostics.entries(), second.diagnostics.entries());
    }

    /// Generated programs parse without errors
    #[test]
    fn valid_programs_parse_cleanly(source in valid_program()) {
        let outcome = parse_source(&source, "fuzz", &InterpreterConfig::default());
        prop_assert!(outcome.is_clean(), "errors in {:?}: {:?}", source, outcome.diagnostics);
    }

    /// Deeply nested parentheses are either parsed or cut off, never a crash
    #[test]
    fn parser_handles_deep_nesting(depth in 1usize..200) {
        let source = format!("rot is {}1{};", "(".repeat(depth), ")".repeat(depth));
        let outcome = parse_source(&source, "fuzz", &InterpreterConfig::default());
        prop_assert_eq!(outcome.program.len(), 1);
    }

    /// Unbalanced parentheses produce errors, not panics
    #[test]
    fn parser_handles_unbalanced_parens(opens in 0usize..30, closes in 0usize..30) {
        let source = format!("rot is {}1{};", "(".repeat(opens), ")".repeat(closes));
        let outcome = parse_source(&source, "fuzz", &InterpreterConfig::default());
        if opens == closes {
            prop_assert!(outcome.is_clean());
        } else {
            prop_assert!(!outcome.is_clean());
        }
    }
}

// =============================================================================
// ANALYZER FUZZ TESTS
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Running generated programs plots exactly what the report says
    #[test]
    fn run_report_matches_sink(source in valid_program()) {
        let mut interpreter = Interpreter::default();
        let mut canvas = PointRecorder::new();
        let report = interpreter.run_str(&source, "fuzz", &mut canvas);
        prop_assert_eq!(report.points, canvas.points().len());
        prop_assert_eq!(report.errors, 0);
    }
}
