//! Expression AST nodes

use super::Spanned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer literal
    Number(i64),

    /// Parenthesized expression, kept so printers can reproduce the source
    Paren(Box<Spanned<Expr>>),

    /// Arithmetic: left op right
    BinaryArith {
        op: ArithOp,
        left: Box<Spanned<Expr>>,
        right: Box<Spanned<Expr>>,
    },

    /// Comparison: evaluates to 0 when the relation holds, 1 otherwise
    Comparison {
        op: CmpOp,
        left: Box<Spanned<Expr>>,
        right: Box<Spanned<Expr>>,
    },

    /// Assignment: name = value
    VarAssign {
        name: String,
        value: Box<Spanned<Expr>>,
    },

    /// Variable reference
    VarAccess(String),

    /// Block: { stmt; stmt; ... }
    Block(Block),

    /// Conditional: if (cond): then_block else else_expr
    If {
        cond: Box<Spanned<Expr>>,
        then_block: Spanned<Block>,
        else_expr: Box<Spanned<Expr>>,
    },

    /// Loop: while cond body
    While {
        cond: Box<Spanned<Expr>>,
        body: Spanned<Block>,
    },

    /// Loop: for var in range(start, end) body
    For {
        var: String,
        range: RangeExpr,
        body: Spanned<Block>,
    },

    /// Function literal: lambda params : body
    FunctionDef {
        params: Vec<String>,
        body: Box<Spanned<Expr>>,
    },

    /// Function call: name(args)
    FunctionCall {
        name: String,
        args: Vec<Spanned<Expr>>,
    },
}

/// Braced statement sequence; introduces a scope frame when evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Spanned<Expr>>,
}

/// Bounds of a `for` loop: range(end) or range(start, end)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeExpr {
    pub start: Option<Box<Spanned<Expr>>>,
    pub end: Box<Spanned<Expr>>,
}

/// Arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            ArithOp::Add | ArithOp::Sub => 1,
            ArithOp::Mul | ArithOp::Div => 2,
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        };
        write!(f, "{s}")
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
}

impl CmpOp {
    /// Whether the mathematical relation holds between two integers
    pub fn holds(self, left: i64, right: i64) -> bool {
        match self {
            CmpOp::Gt => left > right,
            CmpOp::Lt => left < right,
            CmpOp::Ge => left >= right,
            CmpOp::Le => left <= right,
            CmpOp::Eq => left == right,
            CmpOp::Ne => left != right,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CmpOp::Gt => ">",
            CmpOp::Lt => "<",
            CmpOp::Ge => ">=",
            CmpOp::Le => "<=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
        };
        write!(f, "{s}")
    }
}
