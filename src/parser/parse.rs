//! Main parser coordinator
//!
//! This module provides the reusable [`Grammar`], the per-parse [`Parser`]
//! cursor, the [`ParseError`] type and the helper methods shared by the rest
//! of the parser.
//!
//! # Parser Architecture
//!
//! A Pratt parser driven by the [`DispatchTables`] of one dialect:
//! - This module: Grammar, Parser struct, helper methods, and coordination
//! - `declarations`: `fn`, `pub` and `extern` declarations
//! - `statements`: statement dispatch, blocks and keyword statements
//! - `expressions`: precedence climbing over prefix and infix rules
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state. The first structural error
//! aborts the whole parse; there is no recovery.

use crate::parser::ast::*;
use crate::parser::dialect::Dialect;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::lookups::DispatchTables;
use thiserror::Error;
use tracing::debug;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Parse error at {location}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        location: SourceLocation,
    },

    #[error("Parse error at {location}: expected one of {}, found {found}", list_kinds(.expected))]
    UnexpectedOneOf {
        expected: Vec<TokenKind>,
        found: TokenKind,
        location: SourceLocation,
    },

    /// No prefix rule exists for the token where an expression is required.
    #[error("Parse error at {location}: expected expression {context}, found {found}")]
    ExpectedExpression {
        context: &'static str,
        found: TokenKind,
        location: SourceLocation,
    },

    #[error("Parse error at {location}: invalid numeric literal '{text}'")]
    InvalidNumber {
        text: String,
        location: SourceLocation,
    },

    #[error("Parse error at {location}: extern function '{name}' cannot have a body")]
    ExternWithBody {
        name: String,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::UnexpectedToken { location, .. }
            | ParseError::UnexpectedOneOf { location, .. }
            | ParseError::ExpectedExpression { location, .. }
            | ParseError::InvalidNumber { location, .. }
            | ParseError::ExternWithBody { location, .. } => *location,
        }
    }

    /// Token kind found where something else was required, if any.
    pub fn found(&self) -> Option<TokenKind> {
        match self {
            ParseError::UnexpectedToken { found, .. }
            | ParseError::UnexpectedOneOf { found, .. }
            | ParseError::ExpectedExpression { found, .. } => Some(*found),
            ParseError::InvalidNumber { .. } | ParseError::ExternWithBody { .. } => None,
        }
    }
}

fn list_kinds(kinds: &[TokenKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Tokens that may end a simple statement.
pub(crate) const TERMINATORS: [TokenKind; 4] = [
    TokenKind::Semicolon,
    TokenKind::Newline,
    TokenKind::Eof,
    TokenKind::CloseCurly,
];

/// Configured grammar of one dialect, reusable across any number of parses.
#[derive(Debug, Clone)]
pub struct Grammar {
    dialect: Dialect,
    tables: DispatchTables,
}

impl Grammar {
    pub fn new(dialect: Dialect, tables: DispatchTables) -> Self {
        Self { dialect, tables }
    }

    /// Built-in grammar for `dialect`.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::new(dialect, DispatchTables::for_dialect(dialect))
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Parse a whole token stream into a [`Program`].
    ///
    /// `file_id` is attached to the program untouched.
    pub fn parse_file(&self, tokens: &[Token], file_id: &str) -> Result<Program, ParseError> {
        let mut parser = Parser::new(&self.tables, tokens);
        let mut program = Program::new(self.dialect(), file_id);
        program.statements = parser.parse_program()?;

        debug!(
            file = file_id,
            dialect = %self.dialect,
            statements = program.statements.len(),
            "parsed file"
        );
        Ok(program)
    }
}

/// Cursor over one token stream
pub struct Parser<'a> {
    pub(crate) tables: &'a DispatchTables,
    pub(crate) tokens: &'a [Token],
    pub(crate) position: usize,
    /// Stands in for a missing trailing EOF token.
    eof: Token,
}

impl<'a> Parser<'a> {
    pub fn new(tables: &'a DispatchTables, tokens: &'a [Token]) -> Self {
        let end = tokens.last().map(|t| t.location).unwrap_or_default();
        Self {
            tables,
            tokens,
            position: 0,
            eof: Token::new(TokenKind::Eof, "", end),
        }
    }

    /// Parse top-level statements until end of file
    pub fn parse_program(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();

        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }
            // A stray '}' would otherwise end the loop without consuming anything.
            if self.check(TokenKind::CloseCurly) {
                return Err(self.unexpected(TokenKind::Eof));
            }
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }

        Ok(statements)
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&self.eof)
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    pub(crate) fn unexpected(&self, expected: TokenKind) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.peek_kind(),
            location: self.current_location(),
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind))
        }
    }

    pub(crate) fn expect_one_of(&mut self, kinds: &[TokenKind]) -> Result<Token, ParseError> {
        if self.peek().is_one_of(kinds) {
            Ok(self.advance())
        } else {
            Err(ParseError::UnexpectedOneOf {
                expected: kinds.to_vec(),
                found: self.peek_kind(),
                location: self.current_location(),
            })
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        self.expect(TokenKind::Identifier).map(|token| token.text)
    }

    pub(crate) fn at_terminator(&self) -> bool {
        self.peek().is_one_of(&TERMINATORS)
    }

    /// End a simple statement: `;` or a newline is consumed, while end of
    /// file and a closing brace are left for the enclosing loop.
    pub(crate) fn expect_terminator(&mut self) -> Result<(), ParseError> {
        match self.peek_kind() {
            TokenKind::Semicolon | TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::CloseCurly => Ok(()),
            _ => self.expect_one_of(&TERMINATORS).map(|_| ()),
        }
    }
}
