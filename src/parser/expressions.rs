//! Expression parsing implementation
//!
//! This module implements precedence climbing (Pratt parsing) over the
//! dispatch tables of the active grammar.
//!
//! # Algorithm
//!
//! [`parse_expr`](Parser::parse_expr) looks up the prefix rule of the current
//! token and runs it. While the next token has an infix rule whose binding
//! power is strictly greater than the caller's minimum, the infix rule is
//! applied to the expression parsed so far. A token without a prefix rule
//! means the expression is absent; callers decide whether that is an error.
//!
//! # Supported Expressions
//!
//! - Literals: integers, floats, strings, `true` / `false`
//! - Identifiers
//! - Grouping: `( expr )`
//! - Prefix operators: `-`, `!`
//! - Binary operators: arithmetic, `**`, comparison, logical
//! - Assignment: `target = value`
//! - Calls: `callee(a, b)` and member access: `container::member`
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::lookups::{BindingPower, InfixRule, PrefixRule};
use crate::parser::parse::{ParseError, Parser};

impl Parser<'_> {
    /// Parse an expression whose operators all bind tighter than `min_bp`.
    ///
    /// Returns `Ok(None)` when the current token cannot start an expression.
    pub(crate) fn parse_expr(&mut self, min_bp: BindingPower) -> Result<Option<Expr>, ParseError> {
        self.skip_newlines();

        let Some(prefix) = self.tables.prefix_rule(self.peek_kind()) else {
            return Ok(None);
        };
        let mut left = self.parse_prefix(prefix)?;

        while let Some((infix, bp)) = self.tables.infix_rule(self.peek_kind()) {
            if bp <= min_bp {
                break;
            }
            left = self.parse_infix(infix, left, bp)?;
        }

        Ok(Some(left))
    }

    /// Like [`parse_expr`](Self::parse_expr), but an absent expression is an error.
    pub(crate) fn expect_expr(
        &mut self,
        min_bp: BindingPower,
        context: &'static str,
    ) -> Result<Expr, ParseError> {
        match self.parse_expr(min_bp)? {
            Some(expr) => Ok(expr),
            None => Err(ParseError::ExpectedExpression {
                context,
                found: self.peek_kind(),
                location: self.current_location(),
            }),
        }
    }

    fn parse_prefix(&mut self, rule: PrefixRule) -> Result<Expr, ParseError> {
        match rule {
            PrefixRule::Literal => self.parse_literal(),
            PrefixRule::Symbol => Ok(Expr::Symbol(self.advance().text)),
            PrefixRule::Grouping => self.parse_grouping(),
            PrefixRule::Unary => self.parse_unary(),
        }
    }

    fn parse_infix(&mut self, rule: InfixRule, left: Expr, bp: BindingPower) -> Result<Expr, ParseError> {
        match rule {
            InfixRule::Binary(associativity) => {
                let operator = self.advance();
                let right = self.expect_expr(
                    associativity.operand_power(bp),
                    "after binary operator",
                )?;
                Ok(Expr::Binary {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                })
            }
            InfixRule::Assignment => {
                self.advance(); // consume '='
                // Right-associative: a = b = c is a = (b = c)
                let value = self.expect_expr(bp.below(), "after '='")?;
                Ok(Expr::Assignment {
                    target: Box::new(left),
                    value: Box::new(value),
                })
            }
            InfixRule::Call => self.parse_call(left),
            InfixRule::Member => {
                self.advance(); // consume '::'
                let member = self.expect_identifier()?;
                Ok(Expr::Member {
                    container: Box::new(left),
                    member,
                })
            }
        }
    }

    /// Parse literal token into its native value
    fn parse_literal(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance();

        match token.kind {
            TokenKind::Integer => parse_integer(&token).map(Expr::IntegerLiteral),
            TokenKind::Float => parse_float(&token).map(Expr::FloatLiteral),
            TokenKind::True => Ok(Expr::BooleanLiteral(true)),
            TokenKind::False => Ok(Expr::BooleanLiteral(false)),
            TokenKind::String => {
                let text = token.text.trim_start_matches('"').trim_end_matches('"');
                Ok(Expr::StringLiteral(text.to_string()))
            }
            _ => Err(ParseError::ExpectedExpression {
                context: "as literal",
                found: token.kind,
                location: token.location,
            }),
        }
    }

    /// Parse parenthesized expression
    fn parse_grouping(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::OpenParen)?;
        let expr = self.expect_expr(BindingPower::Default, "inside parentheses")?;
        self.skip_newlines();
        self.expect(TokenKind::CloseParen)?;
        Ok(expr)
    }

    /// Parse prefix operator (- !)
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let operator = self.advance();
        let operand = self.expect_expr(BindingPower::Unary, "after prefix operator")?;
        Ok(Expr::Prefix {
            operator,
            operand: Box::new(operand),
        })
    }

    /// Parse argument list: callee(expr, expr, ...)
    ///
    /// A trailing comma is rejected.
    fn parse_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        self.expect(TokenKind::OpenParen)?;
        let mut arguments = Vec::new();

        self.skip_newlines();
        if !self.check(TokenKind::CloseParen) {
            loop {
                arguments.push(self.expect_expr(BindingPower::Default, "in argument list")?);

                self.skip_newlines();
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::CloseParen)?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            arguments,
        })
    }
}

/// Decimal integer text with optional `_` separators.
fn parse_integer(token: &Token) -> Result<i64, ParseError> {
    token
        .text
        .replace('_', "")
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidNumber {
            text: token.text.clone(),
            location: token.location,
        })
}

/// Decimal float text; values too large for `f64` are rejected, not rounded to infinity.
fn parse_float(token: &Token) -> Result<f64, ParseError> {
    token
        .text
        .replace('_', "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            text: token.text.clone(),
            location: token.location,
        })
}
