// src/diagnostics.rs
// Caret-style rendering of an error against its source line:
//
//   Lexer error: invalid token
//    --> main.bs:2:9
//     |
//   2 | println(@);
//     |         ^ here

use std::fmt::Write as _;

use crate::source::SourceLocation;

const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub color: bool,
}

impl Style {
    pub const PLAIN: Self = Self { color: false };
    pub const COLORED: Self = Self { color: true };

    #[inline]
    fn paint(self, code: &'static str) -> &'static str {
        if self.color { code } else { "" }
    }
}

/// `title: message` followed by the source excerpt and a caret run under the span.
pub fn render(
    title: &str,
    message: &str,
    annotation: &str,
    loc: &SourceLocation<'_>,
    style: Style,
) -> String {
    let (red, blue, yellow, reset) = (
        style.paint(RED),
        style.paint(BLUE),
        style.paint(YELLOW),
        style.paint(RESET),
    );
    let pos = loc.position();
    let gutter = pos.line.to_string().len();
    let line = String::from_utf8_lossy(loc.line());
    let carets = "^".repeat(loc.span.length.max(1));
    let pad = " ".repeat(pos.column - 1);

    let mut out = String::new();
    // writing into a String cannot fail
    let _ = writeln!(out, "{red}{title}{reset}: {message}");
    let _ = writeln!(out, "{blue}{:gutter$}-->{reset} {}:{pos}", "", loc.filename);
    let _ = writeln!(out, "{blue}{:gutter$} |{reset}", "");
    let _ = writeln!(out, "{blue}{} |{reset} {line}", pos.line);
    let _ = writeln!(
        out,
        "{blue}{:gutter$} |{reset} {pad}{yellow}{carets} {annotation}{reset}",
        ""
    );
    out
}

/// Location-free variant for errors with no span.
pub fn render_bare(title: &str, message: &str, style: Style) -> String {
    format!(
        "{}{title}{}: {message}\n",
        style.paint(RED),
        style.paint(RESET)
    )
}
