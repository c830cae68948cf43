//! Statement parsing implementation
//!
//! This module handles statement dispatch and every keyword statement that is
//! not a declaration:
//!
//! - Expression statements: `x = f(1)`
//! - Variable declarations: `let i32 x = 42`
//! - Imports: `use math::trig as t`
//! - `return`, `drop`, `if`
//! - Blocks: `{ ... }`
//!
//! # Grammar
//!
//! ```text
//! statement  ::= use_stmt | return_stmt | let_stmt | if_stmt | drop_stmt
//!              | fn_decl | pub_decl | extern_decl | expr_stmt
//! use_stmt   ::= "use" identifier ("::" identifier)* ("as" identifier)? end
//! let_stmt   ::= "let" type identifier ("=" expr)? end
//! return_stmt::= "return" expr? end
//! if_stmt    ::= "if" expr block
//! block      ::= "{" statement* "}"
//! end        ::= ";" | NEWLINE | EOF | (before) "}"
//! ```
//!
//! Line breaks end statements, so the `{` of an `if` body must stay on the
//! line of its condition.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::lookups::{BindingPower, StatementRule};
use crate::parser::parse::{ParseError, Parser};
use tracing::trace;

impl Parser<'_> {
    /// Parse one statement.
    ///
    /// Returns `Ok(None)` at end of file, before a closing brace, and for an
    /// empty `;` statement.
    pub(crate) fn parse_statement(&mut self) -> Result<Option<Statement>, ParseError> {
        self.skip_newlines();

        let kind = self.peek_kind();
        if kind == TokenKind::Eof || kind == TokenKind::CloseCurly {
            return Ok(None);
        }

        match self.tables.statement_rule(kind) {
            Some(rule) => {
                trace!(?rule, location = %self.current_location(), "statement");
                self.parse_rule(rule).map(Some)
            }
            None => self.parse_expression_statement(),
        }
    }

    fn parse_rule(&mut self, rule: StatementRule) -> Result<Statement, ParseError> {
        let location = self.current_location();

        match rule {
            StatementRule::Use => self.parse_use_statement(),
            StatementRule::Return => {
                self.advance(); // consume 'return'
                let value = self.parse_optional_value("after 'return'")?;
                Ok(Statement::Return { value, location })
            }
            StatementRule::Drop => {
                self.advance(); // consume 'drop'
                let value = self.parse_optional_value("after 'drop'")?;
                Ok(Statement::Drop { value, location })
            }
            StatementRule::VariableDeclaration => {
                self.advance(); // consume 'let'
                self.parse_variable_declaration(false, location)
            }
            StatementRule::If => self.parse_if_statement(),
            StatementRule::Function => self
                .parse_function_declaration(Linkage::Private, location)
                .map(Statement::Function),
            StatementRule::Public => self.parse_public_declaration(),
            StatementRule::Extern => self.parse_extern_declaration(),
        }
    }

    /// Parse block statements including the braces
    pub(crate) fn parse_block(&mut self) -> Result<Vec<Statement>, ParseError> {
        self.expect(TokenKind::OpenCurly)?;

        let mut statements = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenKind::CloseCurly) || self.is_at_end() {
                break;
            }
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }

        self.expect(TokenKind::CloseCurly)?;
        Ok(statements)
    }

    fn parse_expression_statement(&mut self) -> Result<Option<Statement>, ParseError> {
        let location = self.current_location();

        if self.match_token(TokenKind::Semicolon) {
            return Ok(None);
        }

        let expr = self.expect_expr(BindingPower::Default, "at start of statement")?;
        self.expect_terminator()?;

        Ok(Some(Statement::Expression { expr, location }))
    }

    /// Value of `return` / `drop`, absent when the statement ends right away.
    fn parse_optional_value(&mut self, context: &'static str) -> Result<Option<Expr>, ParseError> {
        if self.at_terminator() {
            self.expect_terminator()?;
            return Ok(None);
        }

        let value = self.expect_expr(BindingPower::Default, context)?;
        self.expect_terminator()?;
        Ok(Some(value))
    }

    /// Parse variable declaration after 'let': type name [= expr]
    pub(crate) fn parse_variable_declaration(
        &mut self,
        exported: bool,
        location: SourceLocation,
    ) -> Result<Statement, ParseError> {
        let var_type = self.parse_type_name()?;
        let name = self.expect_identifier()?;

        let initializer = if self.match_token(TokenKind::Assignment) {
            Some(self.expect_expr(BindingPower::Default, "after '='")?)
        } else {
            None
        };

        self.expect_terminator()?;

        Ok(Statement::VariableDeclaration {
            exported,
            var_type,
            name,
            initializer,
            location,
        })
    }

    /// Parse import: use module(::segment)* [as alias]
    fn parse_use_statement(&mut self) -> Result<Statement, ParseError> {
        let location = self.current_location();
        self.expect(TokenKind::Use)?;

        let module = self.expect_identifier()?;

        let mut path = Vec::new();
        while self.match_token(TokenKind::DoubleColon) {
            path.push(self.expect_identifier()?);
        }

        let alias = if self.match_token(TokenKind::As) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        self.expect_terminator()?;

        Ok(Statement::Use {
            module,
            path,
            alias,
            location,
        })
    }

    /// Parse if statement: if condition { body }
    fn parse_if_statement(&mut self) -> Result<Statement, ParseError> {
        let location = self.current_location();
        self.expect(TokenKind::If)?;

        let condition = self.expect_expr(BindingPower::Default, "after 'if'")?;
        let body = self.parse_block()?;

        Ok(Statement::If {
            condition,
            body,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::dialect::{Dialect, DialectConfig};
    use crate::parser::lexer::TokenKind;
    use crate::parser::parse::{Grammar, ParseError};

    fn parse(source: &str) -> Result<Program, ParseError> {
        let tokens = DialectConfig::for_dialect(Dialect::Vs)
            .unwrap()
            .tokenize(source)
            .unwrap();
        Grammar::for_dialect(Dialect::Vs).parse_file(&tokens, "statements.vs")
    }

    #[test]
    fn test_variable_declaration() {
        let program = parse("let i64 total = 1 + 2").unwrap();

        match &program.statements[0] {
            Statement::VariableDeclaration {
                exported,
                var_type,
                name,
                initializer,
                ..
            } => {
                assert!(!exported);
                assert_eq!(var_type, "i64");
                assert_eq!(name, "total");
                assert_eq!(initializer.as_ref().map(|e| e.to_string()).as_deref(), Some("1 + 2"));
            }
            _ => panic!("Expected variable declaration"),
        }
    }

    #[test]
    fn test_declaration_without_initializer() {
        let program = parse("let bool ready\nlet Point origin").unwrap();

        assert!(matches!(
            &program.statements[0],
            Statement::VariableDeclaration { initializer: None, .. }
        ));
        assert_eq!(
            program.statements[0].effective_initializer(),
            Some(Expr::BooleanLiteral(false))
        );
        assert_eq!(program.statements[1].effective_initializer(), None);
    }

    #[test]
    fn test_use_forms() {
        let program = parse("use math\nuse math::trig\nuse math::trig as t").unwrap();

        assert!(matches!(
            &program.statements[0],
            Statement::Use { module, path, alias: None, .. } if module == "math" && path.is_empty()
        ));
        assert!(matches!(
            &program.statements[1],
            Statement::Use { path, alias: None, .. } if path == &["trig".to_string()]
        ));
        assert!(matches!(
            &program.statements[2],
            Statement::Use { alias: Some(alias), .. } if alias == "t"
        ));
    }

    #[test]
    fn test_grouped_use_is_rejected() {
        let err = parse("use math::(sin, cos)").unwrap_err();

        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::Identifier,
                found: TokenKind::OpenParen,
                ..
            }
        ));
    }

    #[test]
    fn test_return_forms() {
        let program = parse("fn :: f() {\n\treturn\n}\nfn :: g() { return; }").unwrap();

        for statement in &program.statements {
            match statement {
                Statement::Function(Function { body: Some(body), .. }) => {
                    assert!(matches!(body.as_slice(), [Statement::Return { value: None, .. }]));
                }
                _ => panic!("Expected function definition"),
            }
        }
    }

    #[test]
    fn test_if_and_drop() {
        let program = parse("if x > 1 {\n\tdrop x\n\ty = 2\n}").unwrap();

        match &program.statements[0] {
            Statement::If {
                condition, body, ..
            } => {
                assert_eq!(condition.to_string(), "x > 1");
                assert_eq!(body.len(), 2);
                assert!(matches!(&body[0], Statement::Drop { value: Some(Expr::Symbol(name)), .. } if name == "x"));
            }
            _ => panic!("Expected if statement"),
        }
    }

    #[test]
    fn test_if_brace_must_share_the_line() {
        let err = parse("if ready\n{\n\tgo()\n}").unwrap_err();

        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::OpenCurly,
                found: TokenKind::Newline,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_statements_are_ignored() {
        let program = parse(";;\nx;;").unwrap();
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_statement_must_end() {
        let err = parse("x y").unwrap_err();

        assert!(matches!(
            err,
            ParseError::UnexpectedOneOf { found: TokenKind::Identifier, ref expected, .. }
                if expected.contains(&TokenKind::Newline)
        ));
    }

    #[test]
    fn test_unterminated_block() {
        let err = parse("if ready {\n\tgo()\n").unwrap_err();

        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::CloseCurly,
                found: TokenKind::Eof,
                ..
            }
        ));
    }

    #[test]
    fn test_no_expression_at_statement_start() {
        let err = parse(")").unwrap_err();
        assert!(matches!(
            err,
            ParseError::ExpectedExpression { found: TokenKind::CloseParen, .. }
        ));
    }
}
