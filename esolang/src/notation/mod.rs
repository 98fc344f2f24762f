//! Source printers: minified source and Reverse Polish Notation
//!
//! `minify` re-prints a program without whitespace and with only the
//! parentheses its meaning depends on. `to_rpn` and `eval_rpn` handle the
//! arithmetic subset of the language.

use crate::ast::{ArithOp, Block, Expr, Program, Spanned};
use crate::interp::{RuntimeError, apply_arith};
use std::fmt::Write;
use thiserror::Error;

/// Errors from the notation tools
#[derive(Debug, Error)]
pub enum NotationError {
    #[error("expected a single expression, found {0} statements")]
    NotSingleExpression(usize),

    #[error("{0} is not arithmetic; only numbers, parentheses and + - * / convert to RPN")]
    NotArithmetic(&'static str),

    #[error("invalid RPN token: {0:?}")]
    InvalidToken(String),

    #[error("operator {0} needs two operands")]
    StackUnderflow(String),

    #[error("RPN expression leaves {0} values on the stack")]
    Leftover(usize),

    #[error("empty RPN expression")]
    Empty,

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Print `program` with no whitespace and no redundant parentheses
pub fn minify(program: &Program) -> String {
    let mut out = String::new();
    write_statements(&mut out, &program.statements);
    out
}

/// Convert a single arithmetic expression to space-separated RPN
pub fn to_rpn(program: &Program) -> Result<String, NotationError> {
    let [stmt] = program.statements.as_slice() else {
        return Err(NotationError::NotSingleExpression(program.statements.len()));
    };
    let mut tokens = Vec::new();
    collect_rpn(&stmt.node, &mut tokens)?;
    Ok(tokens.join(" "))
}

/// Evaluate space-separated RPN, e.g. `1 2 + 3 *`
pub fn eval_rpn(text: &str) -> Result<i64, NotationError> {
    let mut stack: Vec<i64> = Vec::new();
    for token in text.split_whitespace() {
        let op = match token {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            _ => None,
        };
        match op {
            Some(op) => {
                let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                    return Err(NotationError::StackUnderflow(token.to_string()));
                };
                stack.push(apply_arith(op, left, right)?);
            }
            None => {
                let n = token
                    .parse::<i64>()
                    .map_err(|_| NotationError::InvalidToken(token.to_string()))?;
                stack.push(n);
            }
        }
    }
    match stack.as_slice() {
        [] => Err(NotationError::Empty),
        [n] => Ok(*n),
        rest => Err(NotationError::Leftover(rest.len())),
    }
}

fn collect_rpn(expr: &Expr, tokens: &mut Vec<String>) -> Result<(), NotationError> {
    match expr {
        Expr::Number(n) => tokens.push(n.to_string()),
        Expr::Paren(inner) => collect_rpn(&inner.node, tokens)?,
        Expr::BinaryArith { op, left, right } => {
            collect_rpn(&left.node, tokens)?;
            collect_rpn(&right.node, tokens)?;
            tokens.push(op.to_string());
        }
        other => return Err(NotationError::NotArithmetic(describe(other))),
    }
    Ok(())
}

fn describe(expr: &Expr) -> &'static str {
    match expr {
        Expr::Number(_) => "number",
        Expr::Paren(_) => "parenthesized expression",
        Expr::BinaryArith { .. } => "arithmetic",
        Expr::Comparison { .. } => "comparison",
        Expr::VarAssign { .. } => "assignment",
        Expr::VarAccess(_) => "variable",
        Expr::Block(_) => "block",
        Expr::If { .. } => "if",
        Expr::While { .. } => "while loop",
        Expr::For { .. } => "for loop",
        Expr::FunctionDef { .. } => "lambda",
        Expr::FunctionCall { .. } => "function call",
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Look through source-level parentheses
fn unparen(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(inner) => unparen(&inner.node),
        other => other,
    }
}

/// Atoms never need parentheses
fn is_atom(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Number(_) | Expr::VarAccess(_) | Expr::FunctionCall { .. }
    )
}

fn write_statements(out: &mut String, statements: &[Spanned<Expr>]) {
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        write_expr(out, &stmt.node);
    }
}

fn write_block(out: &mut String, block: &Block) {
    out.push('{');
    write_statements(out, &block.statements);
    out.push('}');
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Expr::Paren(inner) => write_expr(out, &inner.node),
        Expr::BinaryArith { op, left, right } => {
            write_arith_operand(out, &left.node, *op, Side::Left);
            let _ = write!(out, "{op}");
            write_arith_operand(out, &right.node, *op, Side::Right);
        }
        Expr::Comparison { op, left, right } => {
            write_comparison_operand(out, &left.node);
            let _ = write!(out, "{op}");
            write_comparison_operand(out, &right.node);
        }
        Expr::VarAssign { name, value } => {
            out.push_str(name);
            out.push('=');
            write_expr(out, &value.node);
        }
        Expr::VarAccess(name) => out.push_str(name),
        Expr::Block(block) => write_block(out, block),
        Expr::If { cond, then_block, else_expr } => {
            out.push_str("if(");
            write_expr(out, &cond.node);
            out.push_str("):");
            write_block(out, &then_block.node);
            out.push_str("else ");
            write_expr(out, &else_expr.node);
        }
        Expr::While { cond, body } => {
            out.push_str("while ");
            match unparen(&cond.node) {
                cmp @ Expr::Comparison { .. } => write_expr(out, cmp),
                other => write_comparison_operand(out, other),
            }
            write_block(out, &body.node);
        }
        Expr::For { var, range, body } => {
            let _ = write!(out, "for {var} in range(");
            if let Some(start) = &range.start {
                write_expr(out, &start.node);
                out.push(',');
            }
            write_expr(out, &range.end.node);
            out.push(')');
            write_block(out, &body.node);
        }
        Expr::FunctionDef { params, body } => {
            out.push_str("lambda");
            if !params.is_empty() {
                out.push(' ');
                out.push_str(&params.join(","));
            }
            out.push(':');
            write_expr(out, &body.node);
        }
        Expr::FunctionCall { name, args } => {
            out.push_str(name);
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_expr(out, &arg.node);
            }
            out.push(')');
        }
    }
}

fn write_parenthesized(out: &mut String, expr: &Expr) {
    out.push('(');
    write_expr(out, expr);
    out.push(')');
}

/// Operand of `parent`. Lower precedence always needs parentheses; equal
/// precedence on the right only keeps meaning for `a+(b±c)` and `a*(b*c)`.
fn write_arith_operand(out: &mut String, operand: &Expr, parent: ArithOp, side: Side) {
    let operand = unparen(operand);
    let needs_parens = match operand {
        Expr::BinaryArith { op: child, .. } => {
            let (child_prec, parent_prec) = (child.precedence(), parent.precedence());
            child_prec < parent_prec
                || (side == Side::Right
                    && child_prec == parent_prec
                    && !(parent == ArithOp::Add || (parent == ArithOp::Mul && *child == ArithOp::Mul)))
        }
        other => !is_atom(other),
    };
    if needs_parens {
        write_parenthesized(out, operand);
    } else {
        write_expr(out, operand);
    }
}

/// Operand of a comparison: any sum or product, never another comparison
fn write_comparison_operand(out: &mut String, operand: &Expr) {
    let operand = unparen(operand);
    if is_atom(operand) || matches!(operand, Expr::BinaryArith { .. }) {
        write_expr(out, operand);
    } else {
        write_parenthesized(out, operand);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::ErrorKind;
    use crate::parser::parse_source;
    use insta::assert_snapshot;

    fn minify_str(source: &str) -> String {
        minify(&parse_source("test.eso", source).unwrap())
    }

    fn rpn_str(source: &str) -> Result<String, NotationError> {
        to_rpn(&parse_source("test.eso", source).unwrap())
    }

    #[test]
    fn test_minify_arithmetic() {
        assert_snapshot!(minify_str("1 + 2"), @"1+2");
        assert_snapshot!(minify_str("1 + ((((2))))"), @"1+2");
        assert_snapshot!(minify_str("1 + (2*3)"), @"1+2*3");
        assert_snapshot!(minify_str("1 + (2/3)"), @"1+2/3");
        assert_snapshot!(minify_str("(1 + 2)*3"), @"(1+2)*3");
        assert_snapshot!(minify_str("(1 - 2)*3"), @"(1-2)*3");
        assert_snapshot!(minify_str("(1 - 2)+3"), @"1-2+3");
        assert_snapshot!(minify_str("(1 + 2)+(3 + 4)"), @"1+2+3+4");
    }

    #[test]
    fn test_minify_keeps_meaningful_right_parens() {
        assert_snapshot!(minify_str("1 - (2 - 3)"), @"1-(2-3)");
        assert_snapshot!(minify_str("1 - (2 + 3)"), @"1-(2+3)");
        assert_snapshot!(minify_str("8 / (4 / 2)"), @"8/(4/2)");
        assert_snapshot!(minify_str("2 * (3 / 2)"), @"2*(3/2)");
        assert_snapshot!(minify_str("2 * (3 * 4)"), @"2*3*4");
    }

    #[test]
    fn test_minify_signed_literals() {
        assert_snapshot!(minify_str("1 - -2"), @"1--2");
        assert_snapshot!(minify_str("a * (-2)"), @"a*-2");
    }

    #[test]
    fn test_minify_statements() {
        assert_snapshot!(minify_str("a = 3 ; { a = 5 ; a + 5 } ;"), @"a=3;{a=5;a+5}");
        assert_snapshot!(minify_str(";{};{;;}"), @"{};{}");
        assert_snapshot!(minify_str("a = (b = 3)"), @"a=b=3");
    }

    #[test]
    fn test_minify_control_flow() {
        assert_snapshot!(
            minify_str("if (a == 1): { 2 } else b + 1"),
            @"if(a==1):{2}else b+1"
        );
        assert_snapshot!(minify_str("while a < 10 { a = a + 1 }"), @"while a<10{a=a+1}");
        assert_snapshot!(
            minify_str("for i in range(2, n) { print(i) }"),
            @"for i in range(2,n){print(i)}"
        );
    }

    #[test]
    fn test_minify_functions() {
        assert_snapshot!(minify_str("f = lambda x, y : x + y; f(5, 6)"), @"f=lambda x,y:x+y;f(5,6)");
        assert_snapshot!(minify_str("g = lambda : a"), @"g=lambda:a");
    }

    #[test]
    fn test_minify_parenthesizes_non_arithmetic_operands() {
        assert_snapshot!(minify_str("(a = 3) + 1"), @"(a=3)+1");
        assert_snapshot!(minify_str("(1 < 2) == 0"), @"(1<2)==0");
    }

    #[test]
    fn test_minified_source_evaluates_the_same() {
        let sources = [
            "x = 7; y = -3; (x - (y - 1)) * (x / (2 - y))",
            "a = 0; for i in range(1, 5) { a = a + i * (i - 1) }; a",
            "f = lambda n: if (n < 2): {n} else f(n - 1) + f(n - 2); f(10)",
        ];
        for source in sources {
            let minified = minify_str(source);
            let expected = crate::eval(source).unwrap();
            let actual = crate::eval(&minified).unwrap();
            assert_eq!(actual, expected, "{source} -> {minified}");
        }
    }

    #[test]
    fn test_to_rpn() {
        assert_eq!(rpn_str("1").unwrap(), "1");
        assert_eq!(rpn_str("1+2").unwrap(), "1 2 +");
        assert_eq!(rpn_str("1-2").unwrap(), "1 2 -");
        assert_eq!(rpn_str("(1+2)*3").unwrap(), "1 2 + 3 *");
        assert_eq!(rpn_str("1+2*3").unwrap(), "1 2 3 * +");
        assert_eq!(rpn_str("1*2+3").unwrap(), "1 2 * 3 +");
        assert_eq!(rpn_str("1*(2+3)").unwrap(), "1 2 3 + *");
        assert_eq!(rpn_str("(1*2)+3+4*(5-6)").unwrap(), "1 2 * 3 + 4 5 6 - * +");
    }

    #[test]
    fn test_to_rpn_rejects_non_arithmetic() {
        assert!(matches!(rpn_str("a + 1"), Err(NotationError::NotArithmetic("variable"))));
        assert!(matches!(rpn_str("1; 2"), Err(NotationError::NotSingleExpression(2))));
        assert!(matches!(rpn_str(""), Err(NotationError::NotSingleExpression(0))));
    }

    #[test]
    fn test_eval_rpn() {
        assert_eq!(eval_rpn("1").unwrap(), 1);
        assert_eq!(eval_rpn("1 2 +").unwrap(), 3);
        assert_eq!(eval_rpn("1 2 -").unwrap(), -1);
        assert_eq!(eval_rpn("1 2 + 3 *").unwrap(), 9);
        assert_eq!(eval_rpn("-7 2 /").unwrap(), -4);
        assert_eq!(eval_rpn("1 2 * 3 + 4 5 6 - * +").unwrap(), 1);
    }

    #[test]
    fn test_eval_rpn_errors() {
        assert!(matches!(eval_rpn(""), Err(NotationError::Empty)));
        assert!(matches!(eval_rpn("1 +"), Err(NotationError::StackUnderflow(_))));
        assert!(matches!(eval_rpn("1 2"), Err(NotationError::Leftover(2))));
        assert!(matches!(eval_rpn("1 x +"), Err(NotationError::InvalidToken(_))));
        match eval_rpn("1 0 /") {
            Err(NotationError::Runtime(err)) => assert_eq!(err.kind, ErrorKind::DivisionByZero),
            other => panic!("Expected division by zero, got {other:?}"),
        }
    }

    #[test]
    fn test_rpn_agrees_with_evaluator() {
        for source in ["(1*2)+3+4*(5-6)", "-7/2", "100-3*(4-10)/5"] {
            let rpn = rpn_str(source).unwrap();
            assert_eq!(crate::eval(source).unwrap().as_int(), Some(eval_rpn(&rpn).unwrap()), "{source}");
        }
    }
}
