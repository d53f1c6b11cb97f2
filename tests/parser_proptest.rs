//! Property-based tests for the scanner and parser
//!
//! These tests check the structural guarantees the parser gives for any
//! input, not just well-formed programs:
//! - Scanning is a pure function of the source text
//! - Comments are invisible to the token stream
//! - A rule run in try mode either matches or leaves the cursor untouched
//! - Every node reports the line of its first token

use cminus::parser::{
    tokenize, Cursor, Mode, Parser, Rule, SyntaxNode, Token, TokenKind, TokenStream,
};
use proptest::prelude::*;

const VOCABULARY: &[&str] = &[
    "int", "void", "if", "else", "while", "return", "x", "f", "a", "0", "12", "(", ")", "[",
    "]", "{", "}", ";", ",", "=", "==", "!=", "<", "<=", ">", ">=", "+", "-", "*", "/", "\n",
];

/// Generate a space separated sequence of valid lexemes
fn token_text_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(VOCABULARY.to_vec()), 0..24)
}

/// Generate short programs that are likely to parse at least partially
fn program_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("int x;"),
            Just("int a[4];"),
            Just("void f(void) { }"),
            Just("int f(int v[], int n) { return v[n]; }"),
            Just("void g(void) { if (x < 1) x = x + 1; else f(x, 2); }"),
            Just("int h(int k) { int t; while (k) { t = k * 2; k = k - 1; } return t; }"),
        ],
        1..6,
    )
    .prop_map(|parts| parts.join("\n"))
}

fn assert_lines_consistent(node: &SyntaxNode) -> Result<(), TestCaseError> {
    if let Some(token) = node.first_token() {
        prop_assert_eq!(node.line(), token.line);
    }
    for child in node.children() {
        assert_lines_consistent(child)?;
    }
    Ok(())
}

/// Scan generated lexemes as a file ending in a newline.
fn scan(words: &[&str]) -> TokenStream {
    tokenize(&format!("{}\n", words.join(" "))).unwrap()
}

/// True if `rule`, reading `tokens`, got past a comma inside an argument list.
/// Argument lists commit to the element after a comma, even in try mode.
fn passed_argument_comma(rule: Rule, tokens: &[Token]) -> bool {
    let from = if matches!(rule, Rule::Args | Rule::ArgList) {
        Some(0)
    } else {
        tokens.iter().position(|t| t.is(TokenKind::Lp))
    };
    from.is_some_and(|i| tokens[i..].iter().any(|t| t.is(TokenKind::Comma)))
}

/// Run every rule in try mode from every position of `stream`.
fn check_every_rule(stream: &TokenStream) -> Result<(), TestCaseError> {
    let mut parser = Parser::new(stream);

    for start in 0..=stream.len() {
        let start = Cursor::new(start);
        for rule in Rule::ALL {
            parser.restore(start);
            let result = match parser.parse_rule(rule, Mode::Try) {
                Ok(result) => result,
                Err(err) => {
                    let scanned = &stream.tokens()[start.index()..parser.position().index()];
                    prop_assert!(
                        passed_argument_comma(rule, scanned),
                        "{} failed hard outside an argument list: {}",
                        rule,
                        err
                    );
                    continue;
                }
            };

            let end = parser.position();
            match result {
                None => prop_assert_eq!(end, start, "{} moved the cursor on failure", rule),
                Some(node) => {
                    prop_assert!(node.is(rule));
                    let consumed: Vec<_> =
                        stream.tokens()[start.index()..end.index()].iter().collect();
                    prop_assert_eq!(node.tokens(), consumed);
                    assert_lines_consistent(&node)?;
                }
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_scanning_is_deterministic(source in "[a-z0-9 <>=!/*+;(){},\\[\\]\n-]{0,64}") {
        prop_assert_eq!(tokenize(&source), tokenize(&source));
    }

    #[test]
    fn test_scanning_never_panics(source in "\\PC{0,64}") {
        let _ = tokenize(&source);
    }

    #[test]
    fn test_comments_are_invisible(words in token_text_strategy(), comment in "[a-z ]{0,12}") {
        let plain = words.join(" ");
        let commented = words.join(&format!(" /*{}*/ ", comment));

        prop_assert_eq!(tokenize(&plain), tokenize(&commented));
    }

    #[test]
    fn test_try_mode_restores_or_consumes(words in token_text_strategy()) {
        check_every_rule(&scan(&words))?;
    }

    #[test]
    fn test_commit_mode_never_yields_nothing(words in token_text_strategy()) {
        let stream = scan(&words);

        for rule in Rule::ALL {
            let mut parser = Parser::new(&stream);
            prop_assert!(!matches!(parser.parse_rule(rule, Mode::Commit), Ok(None)), "{}", rule);
        }
    }

    #[test]
    fn test_programs_parse(source in program_strategy()) {
        let stream = tokenize(&source).unwrap();
        let tree = Parser::new(&stream).parse_program().unwrap();

        prop_assert_eq!(tree.tokens().len(), stream.len());
        assert_lines_consistent(&tree)?;
    }
}
