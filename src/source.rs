// src/source.rs
use std::fmt;

/// Byte range `[offset, offset + length)` into a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub offset: usize,
    pub length: usize,
}

impl Span {
    #[inline]
    pub const fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    #[inline]
    pub const fn end(self) -> usize {
        self.offset + self.length
    }

    /// Smallest span covering both.
    pub fn to(self, other: Span) -> Span {
        let start = self.offset.min(other.offset);
        let end = self.end().max(other.end());
        Span::new(start, end - start)
    }
}

/// 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span together with the buffer it points into.
#[derive(Debug, Clone, Copy)]
pub struct SourceLocation<'a> {
    pub filename: &'a str,
    pub source: &'a [u8],
    pub span: Span,
}

impl<'a> SourceLocation<'a> {
    pub fn new(filename: &'a str, source: &'a [u8], span: Span) -> Self {
        Self {
            filename,
            source,
            span,
        }
    }

    /// Bytes under the span, clipped to the buffer.
    pub fn lexeme(&self) -> &'a [u8] {
        let start = self.span.offset.min(self.source.len());
        let end = self.span.end().min(self.source.len());
        &self.source[start..end]
    }

    pub fn position(&self) -> Position {
        let mut line = 1;
        let mut column = 1;
        for &b in self.source.iter().take(self.span.offset) {
            if b == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position { line, column }
    }

    /// The whole line holding the span's first byte, without its newline.
    pub fn line(&self) -> &'a [u8] {
        let at = self.span.offset.min(self.source.len());
        let start = self.source[..at]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let end = self.source[at..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.source.len(), |i| at + i);
        &self.source[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &[u8] = b"print(1_u64);\nprintln(\"x\" + 2_u64);\n";

    #[test]
    fn position_is_one_based() {
        let at = |offset| SourceLocation::new("t.bs", SRC, Span::new(offset, 1)).position();
        assert_eq!(at(0), Position { line: 1, column: 1 });
        assert_eq!(at(6), Position { line: 1, column: 7 });
        assert_eq!(at(14), Position { line: 2, column: 1 });
        assert_eq!(at(26), Position { line: 2, column: 13 });
    }

    #[test]
    fn line_and_lexeme() {
        let loc = SourceLocation::new("t.bs", SRC, Span::new(22, 3));
        assert_eq!(loc.line(), b"println(\"x\" + 2_u64);");
        assert_eq!(loc.lexeme(), b"\"x\"");

        let first = SourceLocation::new("t.bs", SRC, Span::new(0, 5));
        assert_eq!(first.line(), b"print(1_u64);");
    }

    #[test]
    fn spans_at_end_of_input_are_clipped() {
        let loc = SourceLocation::new("t.bs", b"ab", Span::new(2, 0));
        assert_eq!(loc.lexeme(), b"");
        assert_eq!(loc.line(), b"ab");
        assert_eq!(loc.position(), Position { line: 1, column: 3 });
        assert_eq!(Span::new(2, 3).to(Span::new(0, 1)), Span::new(0, 5));
    }
}
