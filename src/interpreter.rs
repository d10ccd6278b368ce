// src/interpreter.rs
use std::{fmt, io::Write};

use log::debug;
use thiserror::Error;

use crate::{
    parser::ast::{BinaryOp, PrintKind},
    source::Span,
    type_checker::{CheckedExpr, CheckedExprKind, CheckedStmt},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    U64(u64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::U64(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("division by zero")]
    DivisionByZero { span: Span },
    #[error("arithmetic overflow in `{op}`")]
    Overflow { op: BinaryOp, span: Span },
    #[error("operands of `{op}` are not both U64")]
    OperandMismatch { op: BinaryOp, span: Span },
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl InterpretError {
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::DivisionByZero { span }
            | Self::Overflow { span, .. }
            | Self::OperandMismatch { span, .. } => Some(*span),
            Self::Io(_) => None,
        }
    }
}

pub fn apply(op: BinaryOp, lhs: u64, rhs: u64, span: Span) -> Result<u64, InterpretError> {
    let r = match op {
        BinaryOp::Add => lhs.checked_add(rhs),
        BinaryOp::Sub => lhs.checked_sub(rhs),
        BinaryOp::Mul => lhs.checked_mul(rhs),
        BinaryOp::Div | BinaryOp::Mod if rhs == 0 => {
            return Err(InterpretError::DivisionByZero { span });
        }
        BinaryOp::Div => lhs.checked_div(rhs),
        BinaryOp::Mod => lhs.checked_rem(rhs),
    };
    r.ok_or(InterpretError::Overflow { op, span })
}

pub fn evaluate(expr: &CheckedExpr) -> Result<Value, InterpretError> {
    match &expr.kind {
        CheckedExprKind::String(s) => Ok(Value::String(s.clone())),
        CheckedExprKind::U64(v) => Ok(Value::U64(*v)),
        CheckedExprKind::Binary {
            lhs,
            op,
            op_span,
            rhs,
        } => match (evaluate(lhs)?, evaluate(rhs)?) {
            (Value::U64(a), Value::U64(b)) => apply(*op, a, b, *op_span).map(Value::U64),
            // the checker only lets U64 reach arithmetic
            _ => Err(InterpretError::OperandMismatch {
                op: *op,
                span: expr.span,
            }),
        },
    }
}

pub struct Interpreter<W: Write> {
    out: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn execute(&mut self, stmt: &CheckedStmt) -> Result<(), InterpretError> {
        match stmt {
            CheckedStmt::Print { kind, argument } => {
                let value = evaluate(argument)?;
                debug!("[run] {kind:?} {value:?}");
                match kind {
                    PrintKind::Print => write!(self.out, "{value}")?,
                    PrintKind::Println => writeln!(self.out, "{value}")?,
                }
            }
        }
        Ok(())
    }

    pub fn run(&mut self, program: &[CheckedStmt]) -> Result<(), InterpretError> {
        for stmt in program {
            self.execute(stmt)?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Run `program`, writing to `out`.
pub fn run<W: Write>(program: &[CheckedStmt], out: W) -> Result<(), InterpretError> {
    Interpreter::new(out).run(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, parser::parse, type_checker::check};

    fn run_src(src: &str) -> Result<String, InterpretError> {
        let toks = tokenize("test.bs", src.as_bytes()).unwrap();
        let prog = check(&parse(&toks, src.as_bytes()).unwrap()).unwrap();
        let mut it = Interpreter::new(Vec::new());
        it.run(&prog)?;
        Ok(String::from_utf8(it.into_inner()).unwrap())
    }

    #[test]
    fn print_and_println() {
        assert_eq!(
            run_src("print(\"a\"); println(\"b\"); println(40_u64 + 2_u64);").unwrap(),
            "ab\n42\n"
        );
    }

    #[test]
    fn arithmetic() {
        assert_eq!(
            run_src("println(7_u64 mod 4_u64 * (10_u64 - 4_u64) / 2_u64);").unwrap(),
            "9\n"
        );
    }

    #[test]
    fn division_by_zero_points_at_the_operator() {
        let err = run_src("println(1_u64 / 0_u64);").unwrap_err();
        assert!(matches!(err, InterpretError::DivisionByZero { .. }));
        assert_eq!(err.span(), Some(Span::new(14, 1)));
        assert!(matches!(
            run_src("println(1_u64 mod 0_u64);").unwrap_err(),
            InterpretError::DivisionByZero { .. }
        ));
    }

    #[test]
    fn overflow_is_an_error() {
        assert!(matches!(
            run_src("println(0_u64 - 1_u64);").unwrap_err(),
            InterpretError::Overflow {
                op: BinaryOp::Sub,
                ..
            }
        ));
        assert!(matches!(
            run_src("println(18446744073709551615_u64 + 1_u64);").unwrap_err(),
            InterpretError::Overflow {
                op: BinaryOp::Add,
                ..
            }
        ));
    }
}
