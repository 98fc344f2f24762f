//! Abstract Syntax Tree definitions
//!
//! The tree is produced once per input unit by the parser and is never
//! mutated by the interpreter.

mod expr;
mod span;

pub use expr::*;
pub use span::*;

use serde::{Deserialize, Serialize};

/// One parsed input unit: the statements of a source line or file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Spanned<Expr>>,
}
