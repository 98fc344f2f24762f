//! Expression evaluator

use super::error::{InterpResult, RuntimeError};
use super::scope::ScopeStack;
use super::value::{Builtin, BuiltinFn, Closure, Value};
use crate::ast::{ArithOp, Block, Expr, Program, RangeExpr, Spanned};
use crate::config::InterpreterConfig;
use crate::error::EvalError;
use crate::parser::parse_source;
use std::io::{self, Write};
use std::rc::Rc;

/// Default limit on nested function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// Built-ins installed in the outermost frame
const BUILTINS: [(&str, BuiltinFn); 3] = [
    ("print", builtin_print),
    ("stack", builtin_stack),
    ("prime", builtin_prime),
];

/// The interpreter: one scope stack for the lifetime of a session
pub struct Interpreter {
    /// Frame 0 holds the built-ins, frame 1 the session globals
    scope: ScopeStack,
    /// Current closure call depth
    call_depth: usize,
    max_call_depth: usize,
    /// Sink for `print` and `stack`
    out: Box<dyn Write>,
}

impl Interpreter {
    /// Create a new interpreter writing to stdout
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Create a new interpreter writing built-in output to `out`
    pub fn with_output(out: Box<dyn Write>) -> Self {
        let mut interp = Interpreter {
            scope: ScopeStack::new(),
            call_depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            out,
        };
        interp.install_builtins();
        interp
    }

    pub fn with_config(config: &InterpreterConfig) -> Self {
        let mut interp = Self::new();
        interp.max_call_depth = config.max_call_depth;
        interp
    }

    pub fn set_max_call_depth(&mut self, limit: usize) {
        self.max_call_depth = limit;
    }

    fn install_builtins(&mut self) {
        for (name, func) in BUILTINS {
            self.scope.define(name, Value::Builtin(Builtin { name, func }));
        }
        self.scope.push_frame();
    }

    /// Forget every user binding, keeping the built-ins
    pub fn reset(&mut self) {
        self.scope.reset();
        self.call_depth = 0;
        self.install_builtins();
    }

    pub fn scope(&self) -> &ScopeStack {
        &self.scope
    }

    /// Tokenize, parse and run one input unit
    pub fn eval_source(&mut self, source: &str) -> Result<Value, EvalError> {
        let program = parse_source("<input>", source)?;
        tracing::debug!(statements = program.statements.len(), "evaluate input");
        Ok(self.run(&program)?)
    }

    /// Run a program's statements in the current frame.
    /// The result is the last statement's value, or `None` for an empty program
    pub fn run(&mut self, program: &Program) -> InterpResult<Value> {
        let depth = self.scope.depth();
        let result = self.eval_statements(&program.statements);
        debug_assert_eq!(self.scope.depth(), depth, "frame leaked by evaluation");
        result
    }

    /// Evaluate a single expression
    pub fn eval_expr(&mut self, expr: &Spanned<Expr>) -> InterpResult<Value> {
        self.eval(expr)
    }

    fn eval(&mut self, expr: &Spanned<Expr>) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(expr))
    }

    fn eval_inner(&mut self, expr: &Spanned<Expr>) -> InterpResult<Value> {
        match &expr.node {
            Expr::Number(n) => Ok(Value::Int(*n)),

            Expr::Paren(inner) => self.eval(inner),

            Expr::BinaryArith { op, left, right } => {
                let lval = self.eval(left)?.expect_int()?;
                let rval = self.eval(right)?.expect_int()?;
                apply_arith(*op, lval, rval).map(Value::Int)
            }

            Expr::Comparison { op, left, right } => {
                let lval = self.eval(left)?.expect_int()?;
                let rval = self.eval(right)?.expect_int()?;
                Ok(Value::from_relation(op.holds(lval, rval)))
            }

            Expr::VarAssign { name, value } => {
                let val = self.eval(value)?;
                Ok(self.scope.assign(name, val))
            }

            Expr::VarAccess(name) => self.scope.lookup(name),

            Expr::Block(block) => self.eval_block(block),

            Expr::If { cond, then_block, else_expr } => {
                if self.eval(cond)?.is_true()? {
                    self.eval_block(&then_block.node)
                } else {
                    self.eval(else_expr)
                }
            }

            Expr::While { cond, body } => {
                let mut last = None;
                while self.eval(cond)?.is_true()? {
                    last = Some(self.eval_block(&body.node)?);
                }
                last.ok_or_else(RuntimeError::loop_never_executed)
            }

            Expr::For { var, range, body } => {
                let (start, end) = self.eval_range(range)?;
                if end <= start {
                    return Err(RuntimeError::empty_range(start, end));
                }
                // One frame for the loop variable; each iteration's block
                // pushes its own frame on top of it
                self.with_frame(|this| {
                    let mut last = Value::None;
                    for i in start..end {
                        this.scope.define(var.as_str(), Value::Int(i));
                        last = this.eval_block(&body.node)?;
                    }
                    Ok(last)
                })
            }

            Expr::FunctionDef { params, body } => Ok(Value::Function(Rc::new(Closure {
                params: params.clone(),
                body: (**body).clone(),
            }))),

            Expr::FunctionCall { name, args } => {
                let callee = self.scope.lookup(name)?;
                let arg_vals: Vec<Value> = args
                    .iter()
                    .map(|a| self.eval(a))
                    .collect::<InterpResult<Vec<_>>>()?;
                self.call_value(name, callee, &arg_vals)
            }
        }
    }

    fn eval_statements(&mut self, statements: &[Spanned<Expr>]) -> InterpResult<Value> {
        let mut result = Value::None;
        for stmt in statements {
            result = self.eval(stmt)?;
        }
        Ok(result)
    }

    fn eval_block(&mut self, block: &Block) -> InterpResult<Value> {
        self.with_frame(|this| this.eval_statements(&block.statements))
    }

    /// Run `f` inside a fresh frame; the frame is popped on success and failure alike
    fn with_frame<T>(&mut self, f: impl FnOnce(&mut Self) -> InterpResult<T>) -> InterpResult<T> {
        self.scope.push_frame();
        let result = f(self);
        self.scope.pop_frame();
        result
    }

    fn eval_range(&mut self, range: &RangeExpr) -> InterpResult<(i64, i64)> {
        let start = match &range.start {
            Some(start) => self.eval(start)?.expect_int()?,
            None => 0,
        };
        let end = self.eval(&range.end)?.expect_int()?;
        Ok((start, end))
    }

    fn call_value(&mut self, name: &str, callee: Value, args: &[Value]) -> InterpResult<Value> {
        match callee {
            Value::Function(closure) => self.call_closure(name, &closure, args),
            Value::Builtin(builtin) => (builtin.func)(self, args),
            other => Err(RuntimeError::not_callable(name, other.type_name())),
        }
    }

    /// Invoke a closure. Parameters are bound in a new frame and the body
    /// sees the whole live scope stack, including the caller's frames.
    fn call_closure(&mut self, name: &str, closure: &Closure, args: &[Value]) -> InterpResult<Value> {
        if closure.params.len() != args.len() {
            return Err(RuntimeError::arity_mismatch(name, closure.params.len(), args.len()));
        }
        if self.call_depth >= self.max_call_depth {
            return Err(RuntimeError::stack_overflow(self.max_call_depth));
        }

        tracing::debug!(function = name, args = args.len(), depth = self.call_depth, "call");
        self.call_depth += 1;
        let result = self.with_frame(|this| {
            for (param, arg) in closure.params.iter().zip(args) {
                this.scope.define(param.as_str(), arg.clone());
            }
            this.eval(&closure.body)
        });
        self.call_depth -= 1;
        result
    }

    /// Render every frame above the built-ins, e.g. `[{a: 4, b: 5}]`
    pub fn format_stack(&self) -> String {
        let frames: Vec<String> = self
            .scope
            .user_frames()
            .iter()
            .map(|frame| {
                let mut entries: Vec<_> = frame.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                let body: Vec<String> = entries.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                format!("{{{}}}", body.join(", "))
            })
            .collect();
        format!("[{}]", frames.join(", "))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply an arithmetic operator with overflow checks; `/` floors
pub fn apply_arith(op: ArithOp, left: i64, right: i64) -> InterpResult<i64> {
    let result = match op {
        ArithOp::Add => left.checked_add(right),
        ArithOp::Sub => left.checked_sub(right),
        ArithOp::Mul => left.checked_mul(right),
        ArithOp::Div => {
            if right == 0 {
                return Err(RuntimeError::division_by_zero());
            }
            floor_div(left, right)
        }
    };
    result.ok_or_else(|| RuntimeError::overflow(&op.to_string(), left, right))
}

/// Division rounding toward negative infinity. `None` on overflow or a zero divisor
pub fn floor_div(left: i64, right: i64) -> Option<i64> {
    let quotient = left.checked_div(right)?;
    if left % right != 0 && ((left < 0) != (right < 0)) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}

// ============ Built-in Functions ============

fn builtin_print(interp: &mut Interpreter, args: &[Value]) -> InterpResult<Value> {
    let [value] = args else {
        return Err(RuntimeError::arity_mismatch("print", 1, args.len()));
    };
    writeln!(interp.out, "{value}").map_err(|e| RuntimeError::io_error(&e.to_string()))?;
    Ok(value.clone())
}

fn builtin_stack(interp: &mut Interpreter, args: &[Value]) -> InterpResult<Value> {
    if !args.is_empty() {
        return Err(RuntimeError::arity_mismatch("stack", 0, args.len()));
    }
    let text = interp.format_stack();
    writeln!(interp.out, "{text}").map_err(|e| RuntimeError::io_error(&e.to_string()))?;
    Ok(Value::None)
}

fn builtin_prime(_interp: &mut Interpreter, args: &[Value]) -> InterpResult<Value> {
    let [value] = args else {
        return Err(RuntimeError::arity_mismatch("prime", 1, args.len()));
    };
    Ok(Value::from_relation(is_prime(value.expect_int()?)))
}

/// Trial division over 6k ± 1
fn is_prime(n: i64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5;
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}
