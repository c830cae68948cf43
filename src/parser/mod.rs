//! Veles source code front end
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`dialect`]: Dialect selection and tokenizer configuration
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`lookups`]: Dispatch tables and binding powers
//! - [`parse`]: Parsing (tokens → AST)
//! - [`ast`]: AST node definitions and canonical rendering
//!
//! # Dialects
//!
//! - `.vs`: the primary language, with functions, variables, imports and a
//!   full expression grammar
//! - `.wat`: a text-assembly dialect that tokenizes fully but has no grammar
//!   rules wired yet
//!
//! # Parser Implementation
//!
//! Table-driven Pratt parser. Each dialect is plain data built once and then
//! shared read-only, so one configuration can serve any number of parses.

pub mod ast;
mod declarations;
pub mod dialect;
mod expressions;
pub mod lexer;
pub mod lookups;
pub mod parse;
mod statements;

pub use ast::{Expr, Function, FunctionParameter, Linkage, Program, SourceLocation, Statement};
pub use dialect::{ConfigError, Dialect, DialectConfig, LexHandler, LexPattern};
pub use lexer::{LexError, Token, TokenKind};
pub use lookups::{BindingPower, DispatchTables};
pub use parse::{Grammar, ParseError, Parser};
