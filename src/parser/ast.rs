// AST (Abstract Syntax Tree) definitions for the Veles front end

use super::dialect::Dialect;
use super::lexer::Token;
use serde::Serialize;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    IntegerLiteral(i64),
    FloatLiteral(f64),
    BooleanLiteral(bool),
    StringLiteral(String), // Without the surrounding quotes
    Symbol(String),
    Prefix {
        operator: Token,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    /// The grammar does not restrict `target` to symbols or members.
    Assignment {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Member {
        container: Box<Expr>,
        member: String,
    },
}

impl Expr {
    /// Operators and assignments, which need parentheses when nested.
    fn is_compound(&self) -> bool {
        matches!(
            self,
            Expr::Prefix { .. } | Expr::Binary { .. } | Expr::Assignment { .. }
        )
    }
}

/// Who can see a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Linkage {
    Private,
    Exported, // pub fn
    Extern,   // extern fn, or a prototype inside extern { }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionParameter {
    pub name: String,
    pub param_type: String, // Raw type name, unresolved
}

/// Function declaration; `body` is `None` for a prototype
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub linkage: Linkage,
    pub name: String,
    pub parameters: Vec<FunctionParameter>,
    pub return_type: Option<String>,
    pub body: Option<Vec<Statement>>,
    pub location: SourceLocation,
}

impl Function {
    pub fn is_prototype(&self) -> bool {
        self.body.is_none()
    }

    pub fn is_exported(&self) -> bool {
        self.linkage == Linkage::Exported
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Expression {
        expr: Expr,
        location: SourceLocation,
    },
    VariableDeclaration {
        exported: bool,
        var_type: String,
        name: String,
        initializer: Option<Expr>,
        location: SourceLocation,
    },
    Function(Function),
    Return {
        value: Option<Expr>,
        location: SourceLocation,
    },
    Use {
        module: String,
        path: Vec<String>,
        alias: Option<String>,
        location: SourceLocation,
    },
    ExternBlock {
        declarations: Vec<Function>, // Prototypes only
        location: SourceLocation,
    },
    If {
        condition: Expr,
        body: Vec<Statement>,
        location: SourceLocation,
    },
    Drop {
        value: Option<Expr>,
        location: SourceLocation,
    },
}

impl Statement {
    /// Get the source location of this statement
    pub fn location(&self) -> &SourceLocation {
        match self {
            Statement::Expression { location, .. } => location,
            Statement::VariableDeclaration { location, .. } => location,
            Statement::Function(function) => &function.location,
            Statement::Return { location, .. } => location,
            Statement::Use { location, .. } => location,
            Statement::ExternBlock { location, .. } => location,
            Statement::If { location, .. } => location,
            Statement::Drop { location, .. } => location,
        }
    }

    /// Initializer of a variable declaration, falling back to the zero value
    /// of its declared type when none was written.
    ///
    /// Returns `None` for other statements and for named types, which have no
    /// known zero value.
    pub fn effective_initializer(&self) -> Option<Expr> {
        match self {
            Statement::VariableDeclaration {
                initializer: Some(expr),
                ..
            } => Some(expr.clone()),
            Statement::VariableDeclaration { var_type, .. } => zero_value(var_type),
            _ => None,
        }
    }
}

/// Zero value of a primitive type name.
pub fn zero_value(type_name: &str) -> Option<Expr> {
    match type_name {
        "i32" | "i64" => Some(Expr::IntegerLiteral(0)),
        "f32" | "f64" => Some(Expr::FloatLiteral(0.0)),
        "bool" => Some(Expr::BooleanLiteral(false)),
        _ => None,
    }
}

/// Root of one parsed source file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub dialect: Dialect,
    pub file_id: String, // Supplied by the caller, used in diagnostics
}

impl Program {
    pub fn new(dialect: Dialect, file_id: impl Into<String>) -> Self {
        Program {
            statements: Vec::new(),
            dialect,
            file_id: file_id.into(),
        }
    }
}

// ===== Canonical rendering =====
//
// Not guaranteed to re-parse to the same tree, but literals, identifiers and
// operator expressions round-trip token for token.

/// Nested operand, parenthesised when it is itself an operator expression.
struct Operand<'a>(&'a Expr);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_compound() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Floats always keep a decimal point so they re-lex as floats.
fn format_float(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::IntegerLiteral(value) => write!(f, "{value}"),
            Expr::FloatLiteral(value) => f.write_str(&format_float(*value)),
            Expr::BooleanLiteral(value) => write!(f, "{value}"),
            Expr::StringLiteral(value) => write!(f, "\"{value}\""),
            Expr::Symbol(name) => f.write_str(name),
            Expr::Prefix { operator, operand } => {
                write!(f, "{}{}", operator.text, Operand(operand))
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => write!(f, "{} {} {}", Operand(left), operator.text, Operand(right)),
            Expr::Assignment { target, value } => {
                write!(f, "{} = {}", Operand(target), Operand(value))
            }
            Expr::Call { callee, arguments } => {
                write!(f, "{}(", Operand(callee))?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                f.write_str(")")
            }
            Expr::Member { container, member } => {
                write!(f, "{}::{}", Operand(container), member)
            }
        }
    }
}

fn write_indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str("\t")?;
    }
    Ok(())
}

fn write_block(f: &mut fmt::Formatter<'_>, body: &[Statement], depth: usize) -> fmt::Result {
    f.write_str("{\n")?;
    for statement in body {
        write_indent(f, depth + 1)?;
        write_statement(f, statement, depth + 1)?;
        f.write_str("\n")?;
    }
    write_indent(f, depth)?;
    f.write_str("}")
}

fn write_function(
    f: &mut fmt::Formatter<'_>,
    function: &Function,
    depth: usize,
    show_linkage: bool,
) -> fmt::Result {
    if show_linkage {
        match function.linkage {
            Linkage::Exported => f.write_str("pub ")?,
            Linkage::Extern => f.write_str("extern ")?,
            Linkage::Private => {}
        }
    }

    f.write_str("fn ")?;
    if let Some(return_type) = &function.return_type {
        write!(f, "{return_type} ")?;
    }
    write!(f, ":: {}(", function.name)?;
    for (i, param) in function.parameters.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{} {}", param.param_type, param.name)?;
    }
    f.write_str(")")?;

    if let Some(body) = &function.body {
        f.write_str(" ")?;
        write_block(f, body, depth)?;
    }
    Ok(())
}

fn write_optional_value(f: &mut fmt::Formatter<'_>, keyword: &str, value: &Option<Expr>) -> fmt::Result {
    match value {
        Some(expr) => write!(f, "{keyword} {expr}"),
        None => f.write_str(keyword),
    }
}

fn write_statement(f: &mut fmt::Formatter<'_>, statement: &Statement, depth: usize) -> fmt::Result {
    match statement {
        Statement::Expression { expr, .. } => write!(f, "{expr}"),
        Statement::VariableDeclaration {
            exported,
            var_type,
            name,
            initializer,
            ..
        } => {
            if *exported {
                f.write_str("pub ")?;
            }
            write!(f, "let {var_type} {name}")?;
            if let Some(expr) = initializer {
                write!(f, " = {expr}")?;
            }
            Ok(())
        }
        Statement::Function(function) => write_function(f, function, depth, true),
        Statement::Return { value, .. } => write_optional_value(f, "return", value),
        Statement::Use {
            module,
            path,
            alias,
            ..
        } => {
            write!(f, "use {module}")?;
            for segment in path {
                write!(f, "::{segment}")?;
            }
            if let Some(alias) = alias {
                write!(f, " as {alias}")?;
            }
            Ok(())
        }
        Statement::ExternBlock { declarations, .. } => {
            f.write_str("extern {\n")?;
            for function in declarations {
                write_indent(f, depth + 1)?;
                write_function(f, function, depth + 1, false)?;
                f.write_str("\n")?;
            }
            write_indent(f, depth)?;
            f.write_str("}")
        }
        Statement::If {
            condition, body, ..
        } => {
            write!(f, "if {condition} ")?;
            write_block(f, body, depth)
        }
        Statement::Drop { value, .. } => write_optional_value(f, "drop", value),
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statement(f, self, 0)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_function(f, self, 0, true)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        Ok(())
    }
}
