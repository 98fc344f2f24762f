//! Runtime errors for the interpreter

use std::fmt;

/// Runtime error during interpretation
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Name not bound in any frame
    UndefinedVariable,
    /// Function called with the wrong number of arguments
    ArityMismatch,
    /// Integer division with a zero divisor
    DivisionByZero,
    /// `for` over a range with no elements
    EmptyRange,
    /// `while` whose condition failed on the first check
    LoopNeverExecuted,
    /// Call target is not a function
    NotCallable,
    /// Operand or condition of the wrong kind
    TypeError,
    /// Integer arithmetic overflowed i64
    Overflow,
    /// Call depth limit exceeded
    StackOverflow,
    /// Writing to the output sink failed
    IoError,
}

impl RuntimeError {
    pub fn undefined_variable(name: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::UndefinedVariable,
            message: format!("undefined variable: {name}"),
        }
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::ArityMismatch,
            message: format!("function {name} expects {expected} argument(s), got {got}"),
        }
    }

    pub fn division_by_zero() -> Self {
        RuntimeError {
            kind: ErrorKind::DivisionByZero,
            message: "division by zero".to_string(),
        }
    }

    pub fn empty_range(start: i64, end: i64) -> Self {
        RuntimeError {
            kind: ErrorKind::EmptyRange,
            message: format!("for loop over empty range({start}, {end})"),
        }
    }

    pub fn loop_never_executed() -> Self {
        RuntimeError {
            kind: ErrorKind::LoopNeverExecuted,
            message: "while loop body never executed".to_string(),
        }
    }

    pub fn not_callable(name: &str, got: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::NotCallable,
            message: format!("{name} is not a function (found {got})"),
        }
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::TypeError,
            message: format!("type error: expected {expected}, got {got}"),
        }
    }

    pub fn overflow(op: &str, left: i64, right: i64) -> Self {
        RuntimeError {
            kind: ErrorKind::Overflow,
            message: format!("integer overflow: {left} {op} {right}"),
        }
    }

    pub fn stack_overflow(limit: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::StackOverflow,
            message: format!("stack overflow: call depth exceeded {limit}"),
        }
    }

    pub fn io_error(msg: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::IoError,
            message: format!("IO error: {msg}"),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
