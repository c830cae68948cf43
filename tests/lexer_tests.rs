// Integration tests for tokenization through the public API

use veles::parser::{Dialect, DialectConfig, LexHandler, SourceLocation, TokenKind};
use veles::FrontendError;

fn kinds(source: &str, dialect: Dialect) -> Vec<TokenKind> {
    veles::tokenize(source, dialect)
        .expect("Tokenizing failed")
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_function_definition_tokens() {
    assert_eq!(
        kinds("fn i32 :: add(i32 a, i32 b) { return a + b }", Dialect::Vs),
        vec![
            TokenKind::Fn,
            TokenKind::I32,
            TokenKind::DoubleColon,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::I32,
            TokenKind::Identifier,
            TokenKind::Comma,
            TokenKind::I32,
            TokenKind::Identifier,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::Return,
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::Identifier,
            TokenKind::CloseCurly,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_every_stream_ends_with_single_eof() {
    for source in ["", "   ", "// only a comment", "x\n", "let i32 x = 1;"] {
        let tokens = veles::tokenize(source, Dialect::Vs).unwrap();
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();

        assert_eq!(eofs, 1, "source {source:?}");
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }
}

#[test]
fn test_keywords_types_and_identifiers() {
    assert_eq!(
        kinds("pub let bool ready = true as letter", Dialect::Vs),
        vec![
            TokenKind::Pub,
            TokenKind::Let,
            TokenKind::Bool,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::True,
            TokenKind::As,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keywords_are_per_dialect() {
    // `fn` and `bool` are only special in the primary dialect.
    assert_eq!(
        kinds("fn bool", Dialect::Wat),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
    );
    assert_eq!(
        kinds("func", Dialect::Vs),
        vec![TokenKind::Identifier, TokenKind::Eof]
    );
}

#[test]
fn test_unrecognized_character() {
    let err = veles::tokenize("let i32 x = @oops", Dialect::Vs).unwrap_err();

    match err {
        FrontendError::Lex(lex) => {
            assert_eq!(lex.location, SourceLocation::new(1, 13));
            assert_eq!(lex.remainder, "@oops");
            assert!(lex.to_string().contains("line 1, column 13"));
        }
        other => panic!("Expected lex error, got {other:?}"),
    }
}

#[test]
fn test_wat_module_tokens() {
    let source = "(module\n  (; block\n comment ;)\n  (func $main (result i32)\n    i32.const 42))";

    assert_eq!(
        kinds(source, Dialect::Wat),
        vec![
            TokenKind::OpenParen,
            TokenKind::Module,
            TokenKind::OpenParen,
            TokenKind::Func,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Result,
            TokenKind::I32,
            TokenKind::CloseParen,
            TokenKind::Identifier,
            TokenKind::Integer,
            TokenKind::CloseParen,
            TokenKind::CloseParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_wat_rejects_primary_operators() {
    assert!(matches!(
        veles::tokenize("(func) + 1", Dialect::Wat),
        Err(FrontendError::Lex(_))
    ));
}

#[test]
fn test_custom_dialect_profile() {
    let config = DialectConfig::builder(Dialect::Vs)
        .keyword("let", TokenKind::Let)
        .pattern(r"\s+", LexHandler::Skip)
        .pattern(r"[a-z]+", LexHandler::Symbol)
        .pattern(r"[0-9]+", LexHandler::Integer)
        .fixed(TokenKind::Assignment, "=")
        .build()
        .unwrap();

    let tokens = config.tokenize("let x = 7").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Let,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Integer,
            TokenKind::Eof,
        ]
    );
    assert!(config.tokenize("let x: 7").is_err());
}

#[test]
fn test_one_config_serves_many_threads() {
    let config = DialectConfig::for_dialect(Dialect::Vs).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let config = &config;
                scope.spawn(move || config.tokenize(&format!("let i32 x{i} = {i}")).map(|t| t.len()))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 6);
        }
    });
}
