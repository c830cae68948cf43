//! Lexer (tokenizer) for Veles and WAT source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! The lexer itself knows nothing about either dialect: it walks the ordered
//! pattern list of a [`DialectConfig`] and applies the handler of the first
//! pattern that matches at the cursor. Exactly one [`TokenKind::Eof`] token
//! terminates every successful run.

use super::ast::SourceLocation;
use super::dialect::{DialectConfig, LexHandler};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// All token kinds produced by the lexer, across both dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Eof,
    Newline,

    // Literals
    String,
    Integer,
    Float,
    Identifier,

    // Primitive type keywords
    I32,
    I64,
    F32,
    F64,
    Bool,

    // Punctuation
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    DoubleColon,
    Colon,
    Comma,
    Semicolon,

    // Arithmetic
    Plus,
    Dash,
    Slash,
    Asterisk,
    Remainder,
    Exponentiation,

    // Comparison
    Equals,
    NotEquals,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Logical
    And,
    Or,
    Not,

    Assignment,

    // Keywords
    Module,
    Param,
    Result,
    Type,
    Func,
    Import,
    Export,
    Return,
    Fn,
    If,
    Pub,
    Use,
    Drop,
    Let,
    Extern,
    As,
    True,
    False,
}

impl TokenKind {
    /// Primitive type keywords accepted wherever a type name is expected.
    pub const PRIMITIVE_TYPES: [TokenKind; 5] = [
        TokenKind::I32,
        TokenKind::I64,
        TokenKind::F32,
        TokenKind::F64,
        TokenKind::Bool,
    ];

    pub fn is_primitive_type(self) -> bool {
        Self::PRIMITIVE_TYPES.contains(&self)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Eof => "end of file",
            TokenKind::Newline => "newline",
            TokenKind::String => "string literal",
            TokenKind::Integer => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::Identifier => "identifier",
            TokenKind::I32 => "'i32'",
            TokenKind::I64 => "'i64'",
            TokenKind::F32 => "'f32'",
            TokenKind::F64 => "'f64'",
            TokenKind::Bool => "'bool'",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::OpenCurly => "'{'",
            TokenKind::CloseCurly => "'}'",
            TokenKind::DoubleColon => "'::'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Plus => "'+'",
            TokenKind::Dash => "'-'",
            TokenKind::Slash => "'/'",
            TokenKind::Asterisk => "'*'",
            TokenKind::Remainder => "'%'",
            TokenKind::Exponentiation => "'**'",
            TokenKind::Equals => "'=='",
            TokenKind::NotEquals => "'!='",
            TokenKind::Less => "'<'",
            TokenKind::LessEqual => "'<='",
            TokenKind::Greater => "'>'",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::And => "'&&'",
            TokenKind::Or => "'||'",
            TokenKind::Not => "'!'",
            TokenKind::Assignment => "'='",
            TokenKind::Module => "'module'",
            TokenKind::Param => "'param'",
            TokenKind::Result => "'result'",
            TokenKind::Type => "'type'",
            TokenKind::Func => "'func'",
            TokenKind::Import => "'import'",
            TokenKind::Export => "'export'",
            TokenKind::Return => "'return'",
            TokenKind::Fn => "'fn'",
            TokenKind::If => "'if'",
            TokenKind::Pub => "'pub'",
            TokenKind::Use => "'use'",
            TokenKind::Drop => "'drop'",
            TokenKind::Let => "'let'",
            TokenKind::Extern => "'extern'",
            TokenKind::As => "'as'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
        };
        f.write_str(text)
    }
}

/// A single lexed token.
///
/// `text` is the raw matched source text; numeric literals are converted to
/// native values by the parser, not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    pub fn is_one_of(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::Integer | TokenKind::Float | TokenKind::String => {
                write!(f, "{} {}", self.kind, self.text)
            }
            _ => write!(f, "{}", self.kind),
        }
    }
}

/// Longest slice of the unmatched remainder quoted in error messages.
const SNIPPET_LEN: usize = 24;

/// No tokenizer pattern matched at `location`.
///
/// `remainder` holds the complete unconsumed source from the failure point.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Lexer error at {location}: unrecognized input near '{}'", snippet(.remainder))]
pub struct LexError {
    pub remainder: String,
    pub location: SourceLocation,
}

/// First line of the remainder, cut to a readable length.
fn snippet(remainder: &str) -> String {
    let line = remainder.lines().next().unwrap_or_default();
    line.chars().take(SNIPPET_LEN).collect()
}

/// Pattern-driven lexer over one source text.
///
/// The cursor is a byte offset into `source`; every pattern is anchored, so a
/// match always begins exactly at the cursor.
pub struct Lexer<'a> {
    config: &'a DialectConfig,
    source: &'a str,
    position: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for `source` using the given dialect profile.
    pub fn new(config: &'a DialectConfig, source: &'a str) -> Self {
        Self {
            config,
            source,
            position: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while !self.is_at_end() {
            let remainder = self.remainder();
            let matched = self
                .config
                .patterns()
                .iter()
                .find_map(|pattern| pattern.match_len(remainder).map(|len| (pattern.handler(), len)));

            match matched {
                Some((handler, len)) => self.apply(handler, len),
                None => {
                    return Err(LexError {
                        remainder: remainder.to_string(),
                        location: self.current_location(),
                    })
                }
            }
        }

        let eof = Token::new(TokenKind::Eof, "", self.current_location());
        self.tokens.push(eof);
        Ok(self.tokens)
    }

    /// Run `handler` over the `len` bytes matched at the cursor.
    fn apply(&mut self, handler: LexHandler, len: usize) {
        let location = self.current_location();
        let source = self.source;
        let matched = &source[self.position..self.position + len];

        match handler {
            LexHandler::Skip | LexHandler::Comment => self.advance(len),
            LexHandler::Newline => {
                // A run of line breaks is one statement terminator.
                self.tokens.push(Token::new(TokenKind::Newline, "\n", location));
                self.advance(len);
            }
            LexHandler::String => self.push_literal(TokenKind::String, matched, location, len),
            LexHandler::Integer => self.push_literal(TokenKind::Integer, matched, location, len),
            LexHandler::Float => self.push_literal(TokenKind::Float, matched, location, len),
            LexHandler::Symbol => {
                let kind = self.config.lookup_symbol(matched);
                self.tokens.push(Token::new(kind, matched, location));
                self.advance(len);
            }
            LexHandler::Fixed { kind, text } => {
                self.tokens.push(Token::new(kind, text, location));
                self.advance(text.len());
            }
        }
    }

    fn push_literal(&mut self, kind: TokenKind, text: &str, location: SourceLocation, len: usize) {
        self.tokens.push(Token::new(kind, text, location));
        self.advance(len);
    }

    /// Move the cursor `len` bytes forward, tracking line and column.
    fn advance(&mut self, len: usize) {
        let end = (self.position + len).min(self.source.len());
        for ch in self.source[self.position..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position = end;
    }

    fn remainder(&self) -> &'a str {
        &self.source[self.position..]
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
