//! Runtime values for the interpreter

use super::eval::Interpreter;
use super::error::{InterpResult, RuntimeError};
use crate::ast::{Expr, Spanned};
use std::fmt;
use std::rc::Rc;

/// Integer produced by a comparison whose relation holds
pub const TRUE: i64 = 0;
/// Integer produced by a comparison whose relation does not hold
pub const FALSE: i64 = 1;

/// Built-in function body
pub type BuiltinFn = fn(&mut Interpreter, &[Value]) -> InterpResult<Value>;

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit signed integer, the only source-level type
    Int(i64),
    /// User-defined function
    Function(Rc<Closure>),
    /// Host function installed in the built-ins frame
    Builtin(Builtin),
    /// No value: empty blocks and programs, `stack()`
    None,
}

/// A `lambda`: parameter names and an unevaluated body.
///
/// The body is evaluated against the scope stack live at the call site, not
/// an environment captured at definition.
#[derive(Debug)]
pub struct Closure {
    pub params: Vec<String>,
    pub body: Spanned<Expr>,
}

/// Named host function
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

impl Value {
    /// Encode a relation result: 0 when it holds, 1 otherwise
    pub fn from_relation(holds: bool) -> Value {
        Value::Int(if holds { TRUE } else { FALSE })
    }

    /// Interpret the value as a condition. Zero is true; every other
    /// integer is false.
    pub fn is_true(&self) -> InterpResult<bool> {
        match self {
            Value::Int(n) => Ok(*n == TRUE),
            other => Err(RuntimeError::type_error("int condition", other.type_name())),
        }
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin",
            Value::None => "None",
        }
    }

    /// Try to convert to i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer operand, or a type error naming the offending kind
    pub fn expect_int(&self) -> InterpResult<i64> {
        self.as_int()
            .ok_or_else(|| RuntimeError::type_error("int", self.type_name()))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Function(closure) if closure.params.is_empty() => write!(f, "<lambda>"),
            Value::Function(closure) => write!(f, "<lambda {}>", closure.params.join(", ")),
            Value::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name),
            Value::None => write!(f, "None"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            (Value::None, Value::None) => true,
            _ => false,
        }
    }
}
