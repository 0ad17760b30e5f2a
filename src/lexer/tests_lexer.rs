#![cfg(test)]
use crate::ast::NameId;
use crate::diagnostic::ParseError;
use crate::lexer::{Lexer, TokenKind};
use crate::source::SourcePos;

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source)
        .tokenize()
        .expect("lexing failed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn keywords_and_punctuation() {
    let tokens = kinds("module Geo { struct Point { long x; }; };");
    assert_eq!(
        tokens,
        vec![
            TokenKind::Module,
            TokenKind::Identifier(NameId::new("Geo")),
            TokenKind::LBrace,
            TokenKind::Struct,
            TokenKind::Identifier(NameId::new("Point")),
            TokenKind::LBrace,
            TokenKind::Long,
            TokenKind::Identifier(NameId::new("x")),
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn literals_keep_raw_text() {
    let tokens = kinds(r#"10 10.901f 23.234d 'a' "abc" true"#);
    assert_eq!(
        tokens,
        vec![
            TokenKind::IntegerLit(NameId::new("10")),
            TokenKind::FloatLit(NameId::new("10.901f")),
            TokenKind::FloatLit(NameId::new("23.234d")),
            TokenKind::CharLit(NameId::new("'a'")),
            TokenKind::StringLit(NameId::new("\"abc\"")),
            TokenKind::BooleanLit(NameId::new("true")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn operators_and_scope_separator() {
    let tokens = kinds("| ^ & << >> + - * / % ~ :: =");
    assert_eq!(
        tokens,
        vec![
            TokenKind::Or,
            TokenKind::Xor,
            TokenKind::And,
            TokenKind::LShift,
            TokenKind::RShift,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Tilde,
            TokenKind::ScopeSep,
            TokenKind::Assign,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_skipped() {
    let tokens = kinds("// line comment\nmodule /* block */ M");
    assert_eq!(
        tokens,
        vec![
            TokenKind::Module,
            TokenKind::Identifier(NameId::new("M")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn spans_are_one_based_lines_and_columns() {
    let tokens = Lexer::new("module\n  Geo").tokenize().expect("lexing failed");
    assert_eq!(tokens[0].span.start, SourcePos::new(1, 1));
    assert_eq!(tokens[0].span.end, SourcePos::new(1, 6));
    assert_eq!(tokens[1].span.start, SourcePos::new(2, 3));
    assert_eq!(tokens[1].span.end, SourcePos::new(2, 5));
}

#[test]
fn unterminated_string_is_an_error() {
    let err = Lexer::new("\"abc").tokenize().unwrap_err();
    assert!(matches!(
        err,
        ParseError::UnterminatedLiteral { what: "string", .. }
    ));
}

#[test]
fn stray_character_is_an_error() {
    let err = Lexer::new("long x @").tokenize().unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedCharacter { ch: '@', .. }));
}

#[test]
fn exponent_float() {
    let tokens = kinds("1e10 2.5e-3");
    assert_eq!(
        tokens,
        vec![
            TokenKind::FloatLit(NameId::new("1e10")),
            TokenKind::FloatLit(NameId::new("2.5e-3")),
            TokenKind::Eof,
        ]
    );
}
