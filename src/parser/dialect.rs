//! Dialect profiles for the tokenizer
//!
//! A [`DialectConfig`] bundles everything the [`Lexer`] needs for one surface
//! syntax: the reserved-word table, the type-keyword table and an **ordered**
//! list of [`LexPattern`]s. Order is load-bearing: the first pattern matching
//! at the cursor wins, so `**` must come before `*`, `::` before `:`, and the
//! dotted WAT identifier form (`i32.const`) before the plain identifier form.
//!
//! Profiles are plain values built once and never mutated afterwards, so one
//! profile can tokenize any number of sources, from any number of threads.
//!
//! # Dialects
//!
//! - [`Dialect::Vs`]: the Veles language (`.vs`), newline-sensitive.
//! - [`Dialect::Wat`]: a WebAssembly-text-like syntax (`.wat`).

use super::lexer::{LexError, Lexer, Token, TokenKind};
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Surface syntax selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Dialect {
    /// The Veles language
    Vs,
    /// WebAssembly-text-like dialect
    Wat,
}

impl Dialect {
    /// Map a file extension (without the dot) to a dialect.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "vs" => Some(Dialect::Vs),
            "wat" => Some(Dialect::Wat),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(self) -> &'static str {
        match self {
            Dialect::Vs => "vs",
            Dialect::Wat => "wat",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// What the lexer does with the text a pattern matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexHandler {
    /// Whitespace: consumed, no token
    Skip,
    /// Comment: consumed, no token
    Comment,
    /// One or more line breaks: a single NEWLINE token
    Newline,
    String,
    Integer,
    Float,
    /// Identifier-shaped text: keyword, type keyword, or IDENTIFIER
    Symbol,
    /// Punctuation and operators with a fixed spelling
    Fixed { kind: TokenKind, text: &'static str },
}

/// Invalid tokenizer configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid tokenizer pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled, start-anchored pattern and its handler.
#[derive(Debug, Clone)]
pub struct LexPattern {
    regex: Regex,
    handler: LexHandler,
}

impl LexPattern {
    /// Compile `pattern`, anchored so it can only match at the cursor.
    pub fn new(pattern: &str, handler: LexHandler) -> Result<Self, ConfigError> {
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
            ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self { regex, handler })
    }

    pub fn handler(&self) -> LexHandler {
        self.handler
    }

    /// Length in bytes of the match at the start of `input`.
    ///
    /// Empty matches are ignored so a careless pattern cannot stall the lexer.
    pub fn match_len(&self, input: &str) -> Option<usize> {
        self.regex
            .find(input)
            .map(|m| m.end())
            .filter(|&len| len > 0)
    }
}

/// Lexical profile of one dialect.
#[derive(Debug, Clone)]
pub struct DialectConfig {
    dialect: Dialect,
    keywords: FxHashMap<String, TokenKind>,
    types: FxHashMap<String, TokenKind>,
    patterns: Vec<LexPattern>,
}

impl DialectConfig {
    /// Build the built-in profile for `dialect`.
    pub fn for_dialect(dialect: Dialect) -> Result<Self, ConfigError> {
        match dialect {
            Dialect::Vs => Self::primary(),
            Dialect::Wat => Self::secondary(),
        }
    }

    /// Start a custom profile with no keywords and no patterns.
    pub fn builder(dialect: Dialect) -> DialectConfigBuilder {
        DialectConfigBuilder::new(dialect)
    }

    /// The Veles profile.
    pub fn primary() -> Result<Self, ConfigError> {
        Self::builder(Dialect::Vs)
            .keyword("module", TokenKind::Module)
            .keyword("fn", TokenKind::Fn)
            .keyword("pub", TokenKind::Pub)
            .keyword("use", TokenKind::Use)
            .keyword("return", TokenKind::Return)
            .keyword("let", TokenKind::Let)
            .keyword("extern", TokenKind::Extern)
            .keyword("as", TokenKind::As)
            .keyword("if", TokenKind::If)
            .keyword("drop", TokenKind::Drop)
            .keyword("true", TokenKind::True)
            .keyword("false", TokenKind::False)
            .type_keyword("i32", TokenKind::I32)
            .type_keyword("i64", TokenKind::I64)
            .type_keyword("f32", TokenKind::F32)
            .type_keyword("f64", TokenKind::F64)
            .type_keyword("bool", TokenKind::Bool)
            .pattern(r"(?:[ \t\r]*\n)+", LexHandler::Newline)
            .pattern(r"[ \t\r]+", LexHandler::Skip)
            .pattern(r"//[^\n]*", LexHandler::Comment)
            .pattern(r#""[^"]*""#, LexHandler::String)
            .pattern(r"[0-9][0-9_]*\.[0-9][0-9_]*", LexHandler::Float)
            .pattern(r"[0-9][0-9_]*", LexHandler::Integer)
            .pattern(r"[a-zA-Z_][a-zA-Z0-9_]*", LexHandler::Symbol)
            .fixed(TokenKind::OpenParen, "(")
            .fixed(TokenKind::CloseParen, ")")
            .fixed(TokenKind::OpenCurly, "{")
            .fixed(TokenKind::CloseCurly, "}")
            .fixed(TokenKind::DoubleColon, "::")
            .fixed(TokenKind::Colon, ":")
            .fixed(TokenKind::Exponentiation, "**")
            .fixed(TokenKind::Asterisk, "*")
            .fixed(TokenKind::Plus, "+")
            .fixed(TokenKind::Dash, "-")
            .fixed(TokenKind::Slash, "/")
            .fixed(TokenKind::Remainder, "%")
            .fixed(TokenKind::Equals, "==")
            .fixed(TokenKind::NotEquals, "!=")
            .fixed(TokenKind::LessEqual, "<=")
            .fixed(TokenKind::GreaterEqual, ">=")
            .fixed(TokenKind::Less, "<")
            .fixed(TokenKind::Greater, ">")
            .fixed(TokenKind::And, "&&")
            .fixed(TokenKind::Or, "||")
            .fixed(TokenKind::Not, "!")
            .fixed(TokenKind::Assignment, "=")
            .fixed(TokenKind::Comma, ",")
            .fixed(TokenKind::Semicolon, ";")
            .build()
    }

    /// The WAT-like profile. Line breaks are plain whitespace here.
    pub fn secondary() -> Result<Self, ConfigError> {
        Self::builder(Dialect::Wat)
            .keyword("module", TokenKind::Module)
            .keyword("param", TokenKind::Param)
            .keyword("result", TokenKind::Result)
            .keyword("type", TokenKind::Type)
            .keyword("func", TokenKind::Func)
            .keyword("import", TokenKind::Import)
            .keyword("export", TokenKind::Export)
            .keyword("return", TokenKind::Return)
            .keyword("drop", TokenKind::Drop)
            .type_keyword("i32", TokenKind::I32)
            .type_keyword("i64", TokenKind::I64)
            .type_keyword("f32", TokenKind::F32)
            .type_keyword("f64", TokenKind::F64)
            .pattern(r"\s+", LexHandler::Skip)
            .pattern(r";;[^\n]*", LexHandler::Comment)
            .pattern(r"\(;(?s:.*?);\)", LexHandler::Comment)
            .pattern(r#""[^"]*""#, LexHandler::String)
            .pattern(r"[0-9][0-9_]*\.[0-9][0-9_]*", LexHandler::Float)
            .pattern(r"[0-9][0-9_]*", LexHandler::Integer)
            .pattern(r"\$[a-zA-Z_][a-zA-Z0-9_]*", LexHandler::Symbol)
            .pattern(r"[a-zA-Z_][a-zA-Z0-9_]*\.[a-zA-Z_][a-zA-Z0-9_]*", LexHandler::Symbol)
            .pattern(r"[a-zA-Z_][a-zA-Z0-9_]*", LexHandler::Symbol)
            .fixed(TokenKind::OpenParen, "(")
            .fixed(TokenKind::CloseParen, ")")
            .build()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn patterns(&self) -> &[LexPattern] {
        &self.patterns
    }

    pub fn keyword(&self, text: &str) -> Option<TokenKind> {
        self.keywords.get(text).copied()
    }

    pub fn type_keyword(&self, text: &str) -> Option<TokenKind> {
        self.types.get(text).copied()
    }

    /// Classify identifier-shaped text: keywords first, then type keywords,
    /// otherwise a plain identifier.
    pub fn lookup_symbol(&self, text: &str) -> TokenKind {
        self.keyword(text)
            .or_else(|| self.type_keyword(text))
            .unwrap_or(TokenKind::Identifier)
    }

    /// Tokenize `source` with this profile.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexError> {
        let tokens = Lexer::new(self, source).tokenize()?;
        debug!(dialect = %self.dialect, tokens = tokens.len(), "tokenized source");
        Ok(tokens)
    }
}

/// Incremental construction of a [`DialectConfig`].
///
/// Patterns are compiled in [`build`](Self::build), in registration order.
#[derive(Debug, Clone)]
pub struct DialectConfigBuilder {
    dialect: Dialect,
    keywords: FxHashMap<String, TokenKind>,
    types: FxHashMap<String, TokenKind>,
    patterns: Vec<(String, LexHandler)>,
}

impl DialectConfigBuilder {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            keywords: FxHashMap::default(),
            types: FxHashMap::default(),
            patterns: Vec::new(),
        }
    }

    pub fn keyword(mut self, text: &str, kind: TokenKind) -> Self {
        self.keywords.insert(text.to_string(), kind);
        self
    }

    pub fn type_keyword(mut self, text: &str, kind: TokenKind) -> Self {
        self.types.insert(text.to_string(), kind);
        self
    }

    /// Append a regex pattern; it is tried after every pattern added before it.
    pub fn pattern(mut self, pattern: &str, handler: LexHandler) -> Self {
        self.patterns.push((pattern.to_string(), handler));
        self
    }

    /// Append a fixed-spelling token such as `::` or `+`.
    pub fn fixed(self, kind: TokenKind, text: &'static str) -> Self {
        let pattern = regex::escape(text);
        self.pattern(&pattern, LexHandler::Fixed { kind, text })
    }

    pub fn build(self) -> Result<DialectConfig, ConfigError> {
        let patterns = self
            .patterns
            .iter()
            .map(|(pattern, handler)| LexPattern::new(pattern, *handler))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DialectConfig {
            dialect: self.dialect,
            keywords: self.keywords,
            types: self.types,
            patterns,
        })
    }
}
