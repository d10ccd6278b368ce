// src/error.rs
use thiserror::Error;

use crate::{
    diagnostics::{self, Style},
    interpreter::InterpretError,
    lexer::LexError,
    parser::ParseError,
    source::{SourceLocation, Span},
    type_checker::TypeError,
};

/// Any stage failure of a `lex -> parse -> check -> run` pipeline.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Interpret(#[from] InterpretError),
}

impl CompileError {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Lex(_) => "Lexer error",
            Self::Parse(_) => "Parse error",
            Self::Type(_) => "Type error",
            Self::Interpret(_) => "Runtime error",
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lex(e) => Some(e.span),
            Self::Parse(e) => e.span(),
            Self::Type(e) => Some(e.span()),
            Self::Interpret(e) => e.span(),
        }
    }

    fn annotation(&self) -> &'static str {
        match self {
            Self::Lex(_) => "not a valid token",
            Self::Parse(ParseError::ExpectedExpression { .. }) => "expected an expression here",
            Self::Parse(_) => "unexpected here",
            Self::Type(_) => "invalid operand types",
            Self::Interpret(_) => "evaluated here",
        }
    }

    // LexError's Display carries the file name; the excerpt already shows it.
    fn message(&self) -> String {
        match self {
            Self::Lex(e) => e.message.clone(),
            other => other.to_string(),
        }
    }

    /// Render with a source excerpt when the error has a span.
    pub fn render(&self, filename: &str, source: &[u8], style: Style) -> String {
        match self.span() {
            Some(span) => diagnostics::render(
                self.title(),
                &self.message(),
                self.annotation(),
                &SourceLocation::new(filename, source, span),
                style,
            ),
            None => diagnostics::render_bare(self.title(), &self.message(), style),
        }
    }
}
