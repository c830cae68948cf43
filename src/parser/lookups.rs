//! Dispatch tables driving the Pratt parser
//!
//! Each dialect's grammar is data: three maps keyed by [`TokenKind`] telling
//! the parser what to do when a token of that kind starts an expression
//! ([`PrefixRule`]), continues one ([`InfixRule`] plus its [`BindingPower`]),
//! or starts a statement ([`StatementRule`]). The tables are filled once when a
//! grammar is built and only read while parsing.
//!
//! # Binding powers
//!
//! ```text
//! Default < Comma < Assignment < Logical < Relational < Additive
//!         < Multiplicative < Exponentiation < Unary < Call < Member < Primary
//! ```
//!
//! The expression loop keeps extending the left operand while the next infix
//! token's power is strictly greater than the caller's minimum. A
//! left-associative rule therefore parses its right operand at its own power,
//! and a right-associative rule one level below it, so `a - b - c` groups left
//! and `a ** b ** c` groups right.

use super::dialect::Dialect;
use super::lexer::TokenKind;
use rustc_hash::FxHashMap;

/// Precedence levels, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingPower {
    Default,
    Comma,
    Assignment,
    Logical,
    Relational,
    Additive,
    Multiplicative,
    Exponentiation,
    Unary,
    Call,
    Member,
    Primary,
}

impl BindingPower {
    /// The next weaker level; `Default` is its own floor.
    pub fn below(self) -> Self {
        match self {
            BindingPower::Default | BindingPower::Comma => BindingPower::Default,
            BindingPower::Assignment => BindingPower::Comma,
            BindingPower::Logical => BindingPower::Assignment,
            BindingPower::Relational => BindingPower::Logical,
            BindingPower::Additive => BindingPower::Relational,
            BindingPower::Multiplicative => BindingPower::Additive,
            BindingPower::Exponentiation => BindingPower::Multiplicative,
            BindingPower::Unary => BindingPower::Exponentiation,
            BindingPower::Call => BindingPower::Unary,
            BindingPower::Member => BindingPower::Call,
            BindingPower::Primary => BindingPower::Member,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

impl Associativity {
    /// Minimum binding power for the right operand of an operator at `bp`.
    pub fn operand_power(self, bp: BindingPower) -> BindingPower {
        match self {
            Associativity::Left => bp,
            Associativity::Right => bp.below(),
        }
    }
}

/// Parses a complete expression starting at the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixRule {
    /// Integer, float, string and boolean literals
    Literal,
    /// Identifier reference
    Symbol,
    /// `( expr )`
    Grouping,
    /// Prefix operator applied to an operand, e.g. `-x` or `!done`
    Unary,
}

/// Extends an already-parsed left expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixRule {
    Binary(Associativity),
    /// `target = value`, right-associative
    Assignment,
    /// `callee(args...)`
    Call,
    /// `container::member`
    Member,
}

/// Parses a full statement introduced by a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementRule {
    Use,
    Return,
    VariableDeclaration,
    Function,
    Public,
    Extern,
    If,
    Drop,
}

/// Prefix, infix and statement tables for one grammar.
#[derive(Debug, Clone, Default)]
pub struct DispatchTables {
    prefix: FxHashMap<TokenKind, PrefixRule>,
    infix: FxHashMap<TokenKind, (InfixRule, BindingPower)>,
    statement: FxHashMap<TokenKind, StatementRule>,
}

impl DispatchTables {
    /// Empty tables: every token is an absent expression.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Vs => Self::primary(),
            Dialect::Wat => Self::secondary(),
        }
    }

    /// The Veles grammar.
    pub fn primary() -> Self {
        let mut tables = Self::new();

        tables.register_infix(TokenKind::Assignment, BindingPower::Assignment, InfixRule::Assignment);

        for kind in [TokenKind::And, TokenKind::Or] {
            tables.register_infix(kind, BindingPower::Logical, InfixRule::Binary(Associativity::Left));
        }
        for kind in [
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::LessEqual,
            TokenKind::Greater,
            TokenKind::GreaterEqual,
        ] {
            tables.register_infix(kind, BindingPower::Relational, InfixRule::Binary(Associativity::Left));
        }
        for kind in [TokenKind::Plus, TokenKind::Dash] {
            tables.register_infix(kind, BindingPower::Additive, InfixRule::Binary(Associativity::Left));
        }
        for kind in [TokenKind::Asterisk, TokenKind::Slash, TokenKind::Remainder] {
            tables.register_infix(kind, BindingPower::Multiplicative, InfixRule::Binary(Associativity::Left));
        }
        tables.register_infix(
            TokenKind::Exponentiation,
            BindingPower::Exponentiation,
            InfixRule::Binary(Associativity::Right),
        );
        tables.register_infix(TokenKind::OpenParen, BindingPower::Call, InfixRule::Call);
        tables.register_infix(TokenKind::DoubleColon, BindingPower::Member, InfixRule::Member);

        for kind in [
            TokenKind::Integer,
            TokenKind::Float,
            TokenKind::String,
            TokenKind::True,
            TokenKind::False,
        ] {
            tables.register_prefix(kind, PrefixRule::Literal);
        }
        tables.register_prefix(TokenKind::Identifier, PrefixRule::Symbol);
        tables.register_prefix(TokenKind::OpenParen, PrefixRule::Grouping);
        tables.register_prefix(TokenKind::Dash, PrefixRule::Unary);
        tables.register_prefix(TokenKind::Not, PrefixRule::Unary);

        tables.register_statement(TokenKind::Use, StatementRule::Use);
        tables.register_statement(TokenKind::Return, StatementRule::Return);
        tables.register_statement(TokenKind::Let, StatementRule::VariableDeclaration);
        tables.register_statement(TokenKind::If, StatementRule::If);
        tables.register_statement(TokenKind::Fn, StatementRule::Function);
        tables.register_statement(TokenKind::Pub, StatementRule::Public);
        tables.register_statement(TokenKind::Extern, StatementRule::Extern);
        tables.register_statement(TokenKind::Drop, StatementRule::Drop);

        tables
    }

    /// The WAT grammar. Nothing is wired yet; only empty input parses.
    pub fn secondary() -> Self {
        Self::new()
    }

    pub fn register_prefix(&mut self, kind: TokenKind, rule: PrefixRule) -> &mut Self {
        self.prefix.insert(kind, rule);
        self
    }

    pub fn register_infix(&mut self, kind: TokenKind, bp: BindingPower, rule: InfixRule) -> &mut Self {
        self.infix.insert(kind, (rule, bp));
        self
    }

    pub fn register_statement(&mut self, kind: TokenKind, rule: StatementRule) -> &mut Self {
        self.statement.insert(kind, rule);
        self
    }

    pub fn prefix_rule(&self, kind: TokenKind) -> Option<PrefixRule> {
        self.prefix.get(&kind).copied()
    }

    pub fn infix_rule(&self, kind: TokenKind) -> Option<(InfixRule, BindingPower)> {
        self.infix.get(&kind).copied()
    }

    pub fn statement_rule(&self, kind: TokenKind) -> Option<StatementRule> {
        self.statement.get(&kind).copied()
    }

    /// Registered binding power of `kind`.
    ///
    /// Infix entries report their own power; prefix-only kinds report
    /// `Primary`; anything else is `Default`.
    pub fn binding_power(&self, kind: TokenKind) -> BindingPower {
        match self.infix_rule(kind) {
            Some((_, bp)) => bp,
            None if self.prefix.contains_key(&kind) => BindingPower::Primary,
            None => BindingPower::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_scale_is_ordered() {
        assert!(BindingPower::Default < BindingPower::Comma);
        assert!(BindingPower::Additive < BindingPower::Multiplicative);
        assert!(BindingPower::Multiplicative < BindingPower::Exponentiation);
        assert!(BindingPower::Member < BindingPower::Primary);
        assert_eq!(BindingPower::Additive.below(), BindingPower::Relational);
        assert_eq!(BindingPower::Default.below(), BindingPower::Default);
    }

    #[test]
    fn test_operand_power() {
        let bp = BindingPower::Exponentiation;
        assert_eq!(Associativity::Left.operand_power(bp), bp);
        assert_eq!(Associativity::Right.operand_power(bp), BindingPower::Multiplicative);
    }

    #[test]
    fn test_primary_wiring() {
        let tables = DispatchTables::primary();

        assert_eq!(
            tables.infix_rule(TokenKind::Exponentiation),
            Some((InfixRule::Binary(Associativity::Right), BindingPower::Exponentiation))
        );
        assert_eq!(tables.prefix_rule(TokenKind::Dash), Some(PrefixRule::Unary));
        assert_eq!(tables.statement_rule(TokenKind::Extern), Some(StatementRule::Extern));
        assert_eq!(tables.statement_rule(TokenKind::Identifier), None);
    }

    #[test]
    fn test_prefix_registration_keeps_infix_power() {
        let tables = DispatchTables::primary();

        // '-' and '(' are both prefix and infix; the infix power must survive.
        assert_eq!(tables.binding_power(TokenKind::Dash), BindingPower::Additive);
        assert_eq!(tables.binding_power(TokenKind::OpenParen), BindingPower::Call);
        assert_eq!(tables.binding_power(TokenKind::Integer), BindingPower::Primary);
        assert_eq!(tables.binding_power(TokenKind::Comma), BindingPower::Default);
    }

    #[test]
    fn test_secondary_is_empty() {
        let tables = DispatchTables::secondary();
        assert_eq!(tables.prefix_rule(TokenKind::Integer), None);
        assert_eq!(tables.statement_rule(TokenKind::Func), None);
    }
}
