//! esolang: a small imperative expression language
//!
//! Integer arithmetic, assignment, block scoping, inverted-truth
//! conditionals, loops and first-class functions, evaluated by a
//! tree-walking interpreter over a stack of scope frames.

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod logging;
pub mod notation;
pub mod parser;
pub mod repl;

pub use ast::Span;
pub use error::{CompileError, EvalError, Result};
pub use interp::{Interpreter, Value};

/// Evaluate `source` in a fresh interpreter and return the last statement's value
pub fn eval(source: &str) -> std::result::Result<Value, EvalError> {
    Interpreter::new().eval_source(source)
}
