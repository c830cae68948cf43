//! Declaration parsing implementation
//!
//! This module handles parsing of function and exported declarations:
//!
//! - Function definitions: `fn i32 :: add(i32 a, i32 b) { ... }`
//! - Prototypes: `fn i32 :: add(i32 a, i32 b)`
//! - Exported items: `pub fn ...`, `pub let ...`
//! - External linkage: `extern fn ...` and `extern { fn ... }`
//! - Type names and parameter lists
//!
//! # Grammar
//!
//! ```text
//! fn_decl     ::= "fn" type? "::" identifier params? block?
//! params      ::= "(" (type identifier ("," type identifier)*)? ")"
//! pub_decl    ::= "pub" (fn_decl | let_stmt)
//! extern_decl ::= "extern" (fn_decl | "{" fn_decl+ "}")
//! type        ::= i32 | i64 | f32 | f64 | bool | identifier
//! ```
//!
//! Parameter lists take no trailing comma. The body's `{` must follow the
//! signature on the same line: a newline there ends the declaration as a
//! prototype, and the `{` on the next line is a stray token.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser<'_> {
    /// Parse a type name: a primitive type keyword or a named type.
    pub(crate) fn parse_type_name(&mut self) -> Result<String, ParseError> {
        let kind = self.peek_kind();
        if kind.is_primitive_type() || kind == TokenKind::Identifier {
            return Ok(self.advance().text);
        }

        let mut expected = TokenKind::PRIMITIVE_TYPES.to_vec();
        expected.push(TokenKind::Identifier);
        Err(ParseError::UnexpectedOneOf {
            expected,
            found: kind,
            location: self.current_location(),
        })
    }

    /// Parse `fn [type] :: name [(params)] [{ body }]`.
    ///
    /// The leading modifier, if any, has already been consumed by the caller
    /// and is passed in as `linkage`.
    pub(crate) fn parse_function_declaration(
        &mut self,
        linkage: Linkage,
        location: SourceLocation,
    ) -> Result<Function, ParseError> {
        self.expect(TokenKind::Fn)?;

        let return_type = if self.check(TokenKind::DoubleColon) {
            None
        } else {
            Some(self.parse_type_name()?)
        };

        self.expect(TokenKind::DoubleColon)?;
        let name = self.expect_identifier()?;

        let parameters = if self.check(TokenKind::OpenParen) {
            self.parse_parameter_list()?
        } else {
            Vec::new()
        };

        let body = if self.check(TokenKind::OpenCurly) {
            if linkage == Linkage::Extern {
                return Err(ParseError::ExternWithBody {
                    name,
                    location: self.current_location(),
                });
            }
            Some(self.parse_block()?)
        } else {
            self.expect_terminator()?;
            None
        };

        Ok(Function {
            linkage,
            name,
            parameters,
            return_type,
            body,
            location,
        })
    }

    /// Parse parameter list: (type name, type name, ...)
    fn parse_parameter_list(&mut self) -> Result<Vec<FunctionParameter>, ParseError> {
        self.expect(TokenKind::OpenParen)?;
        let mut parameters = Vec::new();

        self.skip_newlines();
        if !self.check(TokenKind::CloseParen) {
            loop {
                let param_type = self.parse_type_name()?;
                let name = self.expect_identifier()?;
                parameters.push(FunctionParameter { name, param_type });

                self.skip_newlines();
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
                self.skip_newlines();
            }
        }

        self.expect(TokenKind::CloseParen)?;
        Ok(parameters)
    }

    /// Parse `pub fn ...` or `pub let ...`
    pub(crate) fn parse_public_declaration(&mut self) -> Result<Statement, ParseError> {
        let location = self.current_location();
        self.expect(TokenKind::Pub)?;

        match self.peek_kind() {
            TokenKind::Fn => self
                .parse_function_declaration(Linkage::Exported, location)
                .map(Statement::Function),
            TokenKind::Let => {
                self.advance(); // consume 'let'
                self.parse_variable_declaration(true, location)
            }
            _ => Err(ParseError::UnexpectedOneOf {
                expected: vec![TokenKind::Fn, TokenKind::Let],
                found: self.peek_kind(),
                location: self.current_location(),
            }),
        }
    }

    /// Parse `extern fn ...` or an `extern { ... }` block of prototypes
    pub(crate) fn parse_extern_declaration(&mut self) -> Result<Statement, ParseError> {
        let location = self.current_location();
        self.expect(TokenKind::Extern)?;

        match self.peek_kind() {
            TokenKind::Fn => self
                .parse_function_declaration(Linkage::Extern, location)
                .map(Statement::Function),
            TokenKind::OpenCurly => {
                self.advance(); // consume '{'

                let mut declarations = Vec::new();
                loop {
                    self.skip_newlines();
                    while self.match_token(TokenKind::Semicolon) {
                        self.skip_newlines();
                    }
                    if self.check(TokenKind::CloseCurly) && !declarations.is_empty() {
                        break;
                    }

                    let prototype_location = self.current_location();
                    declarations.push(self.parse_function_declaration(Linkage::Extern, prototype_location)?);
                }

                self.expect(TokenKind::CloseCurly)?;
                Ok(Statement::ExternBlock {
                    declarations,
                    location,
                })
            }
            _ => Err(ParseError::UnexpectedOneOf {
                expected: vec![TokenKind::Fn, TokenKind::OpenCurly],
                found: self.peek_kind(),
                location: self.current_location(),
            }),
        }
    }
}
