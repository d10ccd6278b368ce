// src/lexer/scanner.rs
// Runs every token pattern side by side over the input. A token ends when no
// pattern can take the next byte; the first pattern (in kind order) that is
// still alive and sits in a final, non-start state wins.

use log::trace;
use thiserror::Error;

use crate::{
    lexer::tables::{Pattern, PatternTable, TokenKind, patterns},
    source::{SourceLocation, Span},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
    pub length: usize,
}

impl Token {
    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.length)
    }

    /// Source bytes of this token. Tokens never copy their text.
    #[inline]
    pub fn lexeme<'s>(&self, source: &'s [u8]) -> &'s [u8] {
        &source[self.offset..self.offset + self.length]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{filename}: {message} at byte {}", span.offset)]
pub struct LexError {
    pub filename: String,
    pub message: String,
    pub span: Span,
}

impl LexError {
    pub fn location<'a>(&'a self, source: &'a [u8]) -> SourceLocation<'a> {
        SourceLocation::new(&self.filename, source, self.span)
    }
}

#[derive(Debug, Clone, Copy)]
struct Progress {
    is_matching: bool,
    state: usize,
}

const FRESH: Progress = Progress {
    is_matching: true,
    state: Pattern::START,
};

pub struct Lexer<'a> {
    table: &'a PatternTable,
    filename: &'a str,
    source: &'a [u8],
    pos: usize,
    done: bool,
    progress: Vec<Progress>,
    next_progress: Vec<Progress>,
}

impl<'a> Lexer<'a> {
    /// Lexer over the built-in grammar.
    pub fn new(filename: &'a str, source: &'a [u8]) -> Self {
        Self::with_table(patterns(), filename, source)
    }

    pub fn with_table(table: &'a PatternTable, filename: &'a str, source: &'a [u8]) -> Self {
        Self {
            table,
            filename,
            source,
            pos: 0,
            done: false,
            progress: vec![FRESH; table.len()],
            next_progress: vec![FRESH; table.len()],
        }
    }

    // The buffer is followed by one virtual NUL; nothing exists past it.
    #[inline]
    fn byte_at(&self, i: usize) -> Option<u8> {
        match i.cmp(&self.source.len()) {
            std::cmp::Ordering::Less => Some(self.source[i]),
            std::cmp::Ordering::Equal => Some(0),
            std::cmp::Ordering::Greater => None,
        }
    }

    /// Advance every live pattern over `b`. Nothing is committed unless at
    /// least one pattern moved, so the stall decision sees the last live set.
    fn step(&mut self, b: u8) -> bool {
        let mut advanced = false;
        for ((slot, next), pat) in self
            .progress
            .iter()
            .zip(self.next_progress.iter_mut())
            .zip(self.table.patterns())
        {
            *next = *slot;
            if !slot.is_matching {
                continue;
            }
            match pat.next(slot.state, b) {
                Some(target) => {
                    next.state = target;
                    advanced = true;
                }
                None => next.is_matching = false,
            }
        }
        if advanced {
            std::mem::swap(&mut self.progress, &mut self.next_progress);
        }
        advanced
    }

    fn winner(&self) -> Option<&'a Pattern> {
        let table: &'a PatternTable = self.table;
        table
            .patterns()
            .iter()
            .zip(&self.progress)
            .find(|(pat, p)| p.is_matching && p.state != Pattern::START && pat.is_final(p.state))
            .map(|(pat, _)| pat)
    }

    /// One match attempt from the current position. Returns the matched kind
    /// and its span, discarded kinds included.
    fn match_one(&mut self) -> Result<(&'a Pattern, Span), LexError> {
        let start = self.pos;
        self.progress.fill(FRESH);

        let mut cursor = start;
        while let Some(b) = self.byte_at(cursor) {
            if !self.step(b) {
                break;
            }
            cursor += 1;
        }

        let len = self.source.len();
        let end = cursor.min(len);
        match self.winner() {
            Some(pat) => {
                self.pos = cursor;
                Ok((pat, Span::new(start.min(len), end.saturating_sub(start))))
            }
            None => {
                self.done = true;
                // at least the offending byte, never past the buffer
                let offset = start.min(len);
                let length = end.saturating_sub(offset).max(1).min(len - offset);
                Err(LexError {
                    filename: self.filename.to_owned(),
                    message: "invalid token".into(),
                    span: Span::new(offset, length),
                })
            }
        }
    }

    /// Next emitted token; discarded kinds are skipped. `None` after
    /// `EndOfFile` or an error.
    pub fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        while !self.done {
            let (pat, span) = match self.match_one() {
                Ok(m) => m,
                Err(e) => return Some(Err(e)),
            };
            trace!(
                "[lex] {:?} {:?} @{}+{}",
                pat.kind,
                String::from_utf8_lossy(&self.source[span.offset..span.end()]),
                span.offset,
                span.length
            );
            if pat.kind == TokenKind::EndOfFile {
                self.done = true;
            }
            if pat.should_emit {
                return Some(Ok(Token {
                    kind: pat.kind,
                    offset: span.offset,
                    length: span.length,
                }));
            }
        }
        None
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize with the built-in grammar. The stream ends with `EndOfFile`.
pub fn tokenize(filename: &str, source: &[u8]) -> Result<Vec<Token>, LexError> {
    Lexer::new(filename, source).collect()
}

pub fn tokenize_with(
    table: &PatternTable,
    filename: &str,
    source: &[u8],
) -> Result<Vec<Token>, LexError> {
    Lexer::with_table(table, filename, source).collect()
}
