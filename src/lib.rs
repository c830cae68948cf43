//! # Introduction
//!
//! Veles is the front end of a small compiler: it turns source text into an
//! abstract syntax tree. Two dialects share the machinery, selected by file
//! extension.
//!
//! ## Pipeline
//!
//! ```text
//! Source → DialectConfig → Tokens → Grammar → Program
//! ```
//!
//! 1. [`parser::dialect`] describes how a dialect tokenizes: an ordered list
//!    of anchored patterns plus keyword and type tables.
//! 2. [`parser::lexer`] runs those patterns over the source, first match wins.
//! 3. [`parser::lookups`] holds the prefix, infix and statement tables that
//!    drive the Pratt parser in [`parser::parse`].
//! 4. [`parser::ast`] defines the tree and its canonical textual rendering.
//!
//! Semantic analysis, module resolution and code generation live elsewhere.
//!
//! ## Quick start
//!
//! ```
//! use veles::parser::Dialect;
//!
//! let program = veles::parse_source("let i32 x = 1 + 2", Dialect::Vs, "main.vs").unwrap();
//! assert_eq!(program.to_string(), "let i32 x = 1 + 2\n");
//! ```

pub mod parser;

use parser::{ConfigError, Dialect, DialectConfig, Grammar, LexError, ParseError, Program, Token};
use thiserror::Error;

/// Any failure between source text and a [`Program`].
#[derive(Debug, Error)]
pub enum FrontendError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Tokenize `source` with the built-in configuration of `dialect`.
///
/// The returned stream always ends with an EOF token.
pub fn tokenize(source: &str, dialect: Dialect) -> Result<Vec<Token>, FrontendError> {
    let config = DialectConfig::for_dialect(dialect)?;
    Ok(config.tokenize(source)?)
}

/// Parse a token stream with the built-in grammar of `dialect`.
pub fn parse_file(tokens: &[Token], dialect: Dialect, file_id: &str) -> Result<Program, ParseError> {
    Grammar::for_dialect(dialect).parse_file(tokens, file_id)
}

/// Tokenize and parse `source` in one step.
pub fn parse_source(source: &str, dialect: Dialect, file_id: &str) -> Result<Program, FrontendError> {
    let tokens = tokenize(source, dialect)?;
    Ok(parse_file(&tokens, dialect, file_id)?)
}
