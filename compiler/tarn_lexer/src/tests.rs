#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use num_bigint::BigInt;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tarn_ir::{BinaryOp, Location};

fn kinds(src: &str) -> Vec<TokenKind> {
    lex(src).unwrap().into_iter().map(|t| t.kind).collect()
}

fn name(s: &str) -> TokenKind {
    TokenKind::Name(s.into())
}

fn int(n: i64) -> TokenKind {
    TokenKind::Int(BigInt::from(n))
}

// === Simple tokens ===

#[test]
fn assignment_line() {
    assert_eq!(
        kinds("x = 1 + 2"),
        vec![
            name("x"),
            TokenKind::Assign,
            int(1),
            TokenKind::Plus,
            int(2),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn multi_char_operators() {
    assert_eq!(
        kinds("a ** b // c << d >= e != f"),
        vec![
            name("a"),
            TokenKind::DoubleStar,
            name("b"),
            TokenKind::DoubleSlash,
            name("c"),
            TokenKind::LShift,
            name("d"),
            TokenKind::GtEq,
            name("e"),
            TokenKind::NotEq,
            name("f"),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn augmented_assignment_operators() {
    assert_eq!(
        kinds("a **= 2")[1],
        TokenKind::AugAssign(BinaryOp::Pow)
    );
    assert_eq!(
        kinds("a //= 2")[1],
        TokenKind::AugAssign(BinaryOp::FloorDiv)
    );
    assert_eq!(kinds("a >>= 2")[1], TokenKind::AugAssign(BinaryOp::RShift));
}

#[test]
fn keywords_and_names() {
    assert_eq!(
        kinds("if not x is None: print")[..6],
        [
            TokenKind::Keyword(Keyword::If),
            TokenKind::Keyword(Keyword::Not),
            name("x"),
            TokenKind::Keyword(Keyword::Is),
            TokenKind::Keyword(Keyword::None),
            TokenKind::Colon,
        ]
    );
    // `print` and `eval` are plain names
    assert_eq!(kinds("print")[0], name("print"));
    assert_eq!(kinds("eval")[0], name("eval"));
}

// === Numbers ===

#[test]
fn number_literals() {
    assert_eq!(kinds("0x1F")[0], int(31));
    assert_eq!(kinds("0o17")[0], int(15));
    assert_eq!(kinds("0b101")[0], int(5));
    assert_eq!(kinds("1_000_000")[0], int(1_000_000));
    assert_eq!(kinds("1.5")[0], TokenKind::Float(1.5));
    assert_eq!(kinds(".25")[0], TokenKind::Float(0.25));
    assert_eq!(kinds("1e3")[0], TokenKind::Float(1000.0));
    assert_eq!(kinds("2.5E-1")[0], TokenKind::Float(0.25));
    assert_eq!(kinds("1.")[0], TokenKind::Float(1.0));
}

#[test]
fn huge_integers_are_exact() {
    let digits = "123456789012345678901234567890";
    assert_eq!(kinds(digits)[0], TokenKind::Int(digits.parse().unwrap()));
}

#[test]
fn rejected_number_forms() {
    assert!(lex("1x = 1").is_err());
    assert!(lex("x = 1.A").is_err());
    assert!(lex("3j").is_err());
    assert!(lex("0777").is_err());
    assert!(lex("0x").is_err());
}

// === Strings ===

#[test]
fn string_escapes() {
    assert_eq!(kinds(r"'a\tb\n'")[0], TokenKind::Str("a\tb\n".into()));
    assert_eq!(kinds(r#""\x41\u00e9""#)[0], TokenKind::Str("Aé".into()));
    assert_eq!(kinds(r"'\101'")[0], TokenKind::Str("A".into()));
    assert_eq!(kinds(r"'\q'")[0], TokenKind::Str("\\q".into()));
}

#[test]
fn raw_and_prefixed_strings() {
    assert_eq!(kinds(r"r'a\nb'")[0], TokenKind::Str(r"a\nb".into()));
    assert_eq!(kinds("b'xy'")[0], TokenKind::Str("xy".into()));
    assert_eq!(kinds("u'xy'")[0], TokenKind::Str("xy".into()));
}

#[test]
fn triple_quoted_strings_span_lines() {
    let toks = lex("s = '''one\ntwo'''\ny = 1").unwrap();
    assert_eq!(toks[2].kind, TokenKind::Str("one\ntwo".into()));
    assert_eq!(toks[4].loc, Location::new(3, 0));
}

#[test]
fn string_errors() {
    assert!(lex("'abc").is_err());
    assert!(lex("'ab\ncd'").is_err());
    assert!(lex("'''abc").is_err());
    let err = lex("f'{x}'").unwrap_err();
    assert_eq!(err.message, "f-strings are not supported");
}

// === Layout ===

#[test]
fn indentation_blocks() {
    assert_eq!(
        kinds("if x:\n    y\nz"),
        vec![
            TokenKind::Keyword(Keyword::If),
            name("x"),
            TokenKind::Colon,
            TokenKind::Newline,
            TokenKind::Indent,
            name("y"),
            TokenKind::Newline,
            TokenKind::Dedent,
            name("z"),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn dedents_flushed_at_eof() {
    let toks = kinds("def f():\n  if x:\n    return 1\n");
    let tail: Vec<_> = toks.iter().rev().take(3).cloned().collect();
    assert_eq!(
        tail,
        vec![TokenKind::Eof, TokenKind::Dedent, TokenKind::Dedent]
    );
}

#[test]
fn blank_and_comment_lines_are_ignored() {
    assert_eq!(
        kinds("x = 1\n\n   # note\n\ny = 2 # trailing\n"),
        kinds("x = 1\ny = 2")
    );
}

#[test]
fn brackets_join_lines() {
    assert_eq!(kinds("f(1,\n  2)"), kinds("f(1, 2)"));
    assert_eq!(kinds("x = 1 + \\\n 2"), kinds("x = 1 + 2"));
}

#[test]
fn inconsistent_dedent_is_an_error() {
    let err = lex("if x:\n    y\n  z\n").unwrap_err();
    assert_eq!(err.location.line, 3);
}

#[test]
fn invalid_characters() {
    assert!(lex("x = $").is_err());
    assert!(lex("a ? b").is_err());
}

#[test]
fn empty_source_is_just_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
    assert_eq!(kinds("\n\n# only a comment\n"), vec![TokenKind::Eof]);
}

proptest! {
    #[test]
    fn lexing_never_panics(src in "\\PC{0,64}") {
        let _ = lex(&src);
    }

    #[test]
    fn decimal_integers_roundtrip(n in 0u64..u64::MAX) {
        let toks = kinds(&n.to_string());
        prop_assert_eq!(&toks[0], &TokenKind::Int(BigInt::from(n)));
    }
}
