// src/parser/ast.rs
use std::fmt;

use crate::{lexer::tables::TokenKind, source::Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Unknown,
    Term,
    Factor,
    Unary,
}

impl Precedence {
    /// Binding level for the right operand of a left-associative operator.
    #[inline]
    pub fn next(self) -> Self {
        match self {
            Self::Unknown => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor | Self::Unary => Self::Unary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Sub,
            TokenKind::Asterisk => Self::Mul,
            TokenKind::ForwardSlash => Self::Div,
            TokenKind::Mod => Self::Mod,
            _ => return None,
        })
    }

    pub fn precedence(self) -> Precedence {
        match self {
            Self::Add | Self::Sub => Precedence::Term,
            Self::Mul | Self::Div | Self::Mod => Precedence::Factor,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "mod",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    StringLiteral(String),
    UnsignedIntegerLiteral(u64),
    Binary {
        lhs: Box<Expr>,
        op: BinaryOp,
        op_span: Span,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintKind {
    Print,
    Println,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Print {
        kind: PrintKind,
        argument: Expr,
        span: Span,
    },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Self::Print { span, .. } => *span,
        }
    }
}
