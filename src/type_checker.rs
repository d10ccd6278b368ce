// src/type_checker.rs
use std::fmt;

use thiserror::Error;

use crate::{
    parser::ast::{BinaryOp, Expr, ExprKind, PrintKind, Stmt},
    source::Span,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    String,
    U64,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "String",
            Self::U64 => "U64",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("no operator `{op}` for operands of type `{lhs}` and `{rhs}`")]
    InvalidOperands {
        op: BinaryOp,
        lhs: DataType,
        rhs: DataType,
        span: Span,
    },
}

impl TypeError {
    pub fn span(&self) -> Span {
        match self {
            Self::InvalidOperands { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckedExprKind {
    String(String),
    U64(u64),
    Binary {
        lhs: Box<CheckedExpr>,
        op: BinaryOp,
        op_span: Span,
        rhs: Box<CheckedExpr>,
    },
}

/// Expression annotated with its result type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedExpr {
    pub kind: CheckedExprKind,
    pub data_type: DataType,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckedStmt {
    Print {
        kind: PrintKind,
        argument: CheckedExpr,
    },
}

/// Result type of `lhs op rhs`, if the combination exists.
pub fn binary_result(op: BinaryOp, lhs: DataType, rhs: DataType) -> Option<DataType> {
    use BinaryOp::*;
    match (lhs, op, rhs) {
        (DataType::U64, Add | Sub | Mul | Div | Mod, DataType::U64) => Some(DataType::U64),
        _ => None,
    }
}

pub fn check_expr(expr: &Expr) -> Result<CheckedExpr, TypeError> {
    let (kind, data_type) = match &expr.kind {
        ExprKind::StringLiteral(s) => (CheckedExprKind::String(s.clone()), DataType::String),
        ExprKind::UnsignedIntegerLiteral(v) => (CheckedExprKind::U64(*v), DataType::U64),
        ExprKind::Binary {
            lhs,
            op,
            op_span,
            rhs,
        } => {
            let lhs = check_expr(lhs)?;
            let rhs = check_expr(rhs)?;
            let Some(ty) = binary_result(*op, lhs.data_type, rhs.data_type) else {
                return Err(TypeError::InvalidOperands {
                    op: *op,
                    lhs: lhs.data_type,
                    rhs: rhs.data_type,
                    span: expr.span,
                });
            };
            (
                CheckedExprKind::Binary {
                    lhs: Box::new(lhs),
                    op: *op,
                    op_span: *op_span,
                    rhs: Box::new(rhs),
                },
                ty,
            )
        }
    };
    Ok(CheckedExpr {
        kind,
        data_type,
        span: expr.span,
    })
}

// Every builtin type is printable, so statements only check their argument.
pub fn check_stmt(stmt: &Stmt) -> Result<CheckedStmt, TypeError> {
    match stmt {
        Stmt::Print { kind, argument, .. } => Ok(CheckedStmt::Print {
            kind: *kind,
            argument: check_expr(argument)?,
        }),
    }
}

pub fn check(program: &[Stmt]) -> Result<Vec<CheckedStmt>, TypeError> {
    program.iter().map(check_stmt).collect()
}
