//! Tree-walking interpreter

mod error;
mod eval;
mod scope;
mod value;

pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{DEFAULT_MAX_CALL_DEPTH, Interpreter, apply_arith, floor_div};
pub use scope::{Frame, ScopeStack};
pub use value::{Builtin, BuiltinFn, Closure, FALSE, TRUE, Value};
