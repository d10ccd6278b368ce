// src/parser/mod.rs
pub mod ast;
pub mod literal;

use thiserror::Error;

use self::{
    ast::{BinaryOp, Expr, ExprKind, Precedence, PrintKind, Stmt},
    literal::LiteralError,
};
use crate::{
    lexer::{Token, tables::TokenKind},
    source::Span,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("token stream does not end with `EndOfFile`")]
    MissingEndOfFile,
    #[error("unexpected token `{found:?}`")]
    UnexpectedToken { found: TokenKind, span: Span },
    #[error("expected `{expected:?}`, got `{found:?}`")]
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
        span: Span,
    },
    #[error("expected expression, got `{found:?}`")]
    ExpectedExpression { found: TokenKind, span: Span },
    #[error("{source}")]
    InvalidLiteral { source: LiteralError, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::MissingEndOfFile => None,
            Self::UnexpectedToken { span, .. }
            | Self::ExpectedToken { span, .. }
            | Self::ExpectedExpression { span, .. }
            | Self::InvalidLiteral { span, .. } => Some(*span),
        }
    }
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    source: &'a [u8],
    index: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], source: &'a [u8]) -> Result<Self, ParseError> {
        match tokens.last() {
            Some(t) if t.kind == TokenKind::EndOfFile => Ok(Self {
                tokens,
                source,
                index: 0,
            }),
            _ => Err(ParseError::MissingEndOfFile),
        }
    }

    pub fn parse(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.index = 0;
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            stmts.push(self.statement()?);
        }
        Ok(stmts)
    }

    // ---- cursor ----

    #[inline]
    fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::EndOfFile
    }

    // The stream ends with EndOfFile, so the cursor never runs off the end.
    #[inline]
    fn current(&self) -> Token {
        self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let t = self.current();
        if !self.is_at_end() {
            self.index += 1;
        }
        t
    }

    fn matches(&mut self, kind: TokenKind) -> Option<Token> {
        (self.current().kind == kind).then(|| self.advance())
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        self.matches(expected).ok_or_else(|| {
            let found = self.current();
            ParseError::ExpectedToken {
                expected,
                found: found.kind,
                span: found.span(),
            }
        })
    }

    // ---- grammar ----

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current();
        let kind = match start.kind {
            TokenKind::Print => PrintKind::Print,
            TokenKind::Println => PrintKind::Println,
            found => {
                return Err(ParseError::UnexpectedToken {
                    found,
                    span: start.span(),
                });
            }
        };
        self.advance();
        self.expect(TokenKind::LeftParenthesis)?;
        let argument = self.expression(Precedence::Term)?;
        self.expect(TokenKind::RightParenthesis)?;
        let end = self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Print {
            kind,
            argument,
            span: start.span().to(end.span()),
        })
    }

    /// Pratt loop: fold operators binding at least as tightly as `min`.
    fn expression(&mut self, min: Precedence) -> Result<Expr, ParseError> {
        let mut lhs = self.primary()?;
        while let Some(op) = BinaryOp::from_token(self.current().kind) {
            let prec = op.precedence();
            if prec < min {
                break;
            }
            let op_tok = self.advance();
            let rhs = self.expression(prec.next())?;
            let span = lhs.span.to(rhs.span);
            lhs = Expr {
                kind: ExprKind::Binary {
                    lhs: Box::new(lhs),
                    op,
                    op_span: op_tok.span(),
                    rhs: Box::new(rhs),
                },
                span,
            };
        }
        Ok(lhs)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.current();
        let decoded = |r: Result<ExprKind, LiteralError>| {
            r.map_err(|source| ParseError::InvalidLiteral {
                source,
                span: tok.span(),
            })
        };
        let kind = match tok.kind {
            TokenKind::StringLiteral => {
                decoded(literal::decode_string(tok.lexeme(self.source)).map(ExprKind::StringLiteral))?
            }
            TokenKind::UnsignedIntegerLiteral => decoded(
                literal::decode_unsigned(tok.lexeme(self.source))
                    .map(ExprKind::UnsignedIntegerLiteral),
            )?,
            TokenKind::LeftParenthesis => {
                self.advance();
                let mut inner = self.expression(Precedence::Term)?;
                let close = self.expect(TokenKind::RightParenthesis)?;
                inner.span = tok.span().to(close.span());
                return Ok(inner);
            }
            found => {
                return Err(ParseError::ExpectedExpression {
                    found,
                    span: tok.span(),
                });
            }
        };
        self.advance();
        Ok(Expr {
            kind,
            span: tok.span(),
        })
    }
}

/// Parse a full token stream (which must end with `EndOfFile`).
pub fn parse(tokens: &[Token], source: &[u8]) -> Result<Vec<Stmt>, ParseError> {
    Parser::new(tokens, source)?.parse()
}
