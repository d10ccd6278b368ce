// src/lexer/tables/tokens.rs
use serde::{Deserialize, Serialize};

use super::{
    char_mask::{CharMask, Range},
    regex::{RegexElement, either, maybe, none_of, one_or_more, seq, set, zero_or_more},
};

// Declares `TokenKind` and `TokenKind::ALL` from one list, so the two cannot drift.
macro_rules! token_kinds {
    ($($kind:ident,)*) => {
        /// Token kinds. Declaration order is match priority: when several patterns
        /// finish on the same span, the earliest kind wins (keywords before identifiers).
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[repr(u32)]
        pub enum TokenKind {
            $($kind,)*
        }

        impl TokenKind {
            /// Every kind, in declaration order.
            pub const ALL: [TokenKind; [$(stringify!($kind)),*].len()] = [$(TokenKind::$kind,)*];
        }
    };
}

token_kinds! {
    EndOfFile,
    Print,
    Println,
    LowercaseFunction,
    UppercaseFunction,
    Let,
    Mutable,
    Const,
    If,
    Else,
    Loop,
    Break,
    Continue,
    While,
    Do,
    For,
    Return,
    Mod,
    And,
    Or,
    Not,
    BoolLiteral,
    NothingLiteral,
    LowercaseIdentifier,
    UppercaseIdentifier,
    SignedIntegerLiteral,
    UnsignedIntegerLiteral,
    CharLiteral,
    StringLiteral,
    Colon,
    Comma,
    TildeArrow,
    Semicolon,
    Plus,
    Minus,
    Asterisk,
    ForwardSlash,
    LeftParenthesis,
    RightParenthesis,
    LeftCurlyBracket,
    RightCurlyBracket,
    EqualsEquals,
    ExclamationEquals,
    GreaterOrEquals,
    LessOrEquals,
    GreaterThan,
    LessThan,
    Equals,
    LineComment,
    Whitespace,
}

pub const N_KINDS: usize = TokenKind::ALL.len();

impl TokenKind {
    /// Fixed spelling for keyword and punctuation kinds.
    pub fn text(self) -> Option<&'static str> {
        use TokenKind::*;
        Some(match self {
            Print => "print",
            Println => "println",
            LowercaseFunction => "function",
            UppercaseFunction => "Function",
            Let => "let",
            Mutable => "mutable",
            Const => "const",
            If => "if",
            Else => "else",
            Loop => "loop",
            Break => "break",
            Continue => "continue",
            While => "while",
            Do => "do",
            For => "for",
            Return => "return",
            Mod => "mod",
            And => "and",
            Or => "or",
            Not => "not",
            NothingLiteral => "nothing",
            Colon => ":",
            Comma => ",",
            TildeArrow => "~>",
            Semicolon => ";",
            Plus => "+",
            Minus => "-",
            Asterisk => "*",
            ForwardSlash => "/",
            LeftParenthesis => "(",
            RightParenthesis => ")",
            LeftCurlyBracket => "{",
            RightCurlyBracket => "}",
            EqualsEquals => "==",
            ExclamationEquals => "!=",
            GreaterOrEquals => ">=",
            LessOrEquals => "<=",
            GreaterThan => ">",
            LessThan => "<",
            Equals => "=",
            EndOfFile | BoolLiteral | LowercaseIdentifier | UppercaseIdentifier
            | SignedIntegerLiteral | UnsignedIntegerLiteral | CharLiteral | StringLiteral
            | LineComment | Whitespace => return None,
        })
    }
}

/// Input to the table compiler: one pattern per token kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDescription {
    pub kind: TokenKind,
    pub pattern: RegexElement,
    pub should_emit: bool,
}

impl TokenDescription {
    pub fn new(kind: TokenKind, pattern: impl Into<RegexElement>) -> Self {
        Self {
            kind,
            pattern: pattern.into(),
            should_emit: true,
        }
    }

    pub fn discarded(mut self) -> Self {
        self.should_emit = false;
        self
    }
}

const DIGIT: Range = Range::new(b'0', b'9');

fn ident_tail() -> RegexElement {
    zero_or_more(Range::new(b'a', b'z') | Range::new(b'A', b'Z') | DIGIT | b'_')
}

// -? [0-9] ('? [0-9])* _<suffix>
fn integer(signed: bool, suffix: &str) -> RegexElement {
    let mut parts = Vec::with_capacity(4);
    if signed {
        parts.push(maybe(b'-'));
    }
    parts.push(set(DIGIT));
    parts.push(zero_or_more(seq([maybe(b'\''), set(DIGIT)])));
    parts.push(suffix.into());
    seq(parts)
}

// `\n \t \f \r \\` or an escaped `quote`, else any byte except those controls, `\\` and `quote`
fn quoted_char(quote: u8) -> RegexElement {
    either([
        seq([b'\\'.into(), set(CharMask::bytes(b"ntfr\\") | quote)]),
        none_of(&[b'\n', b'\t', 0x0c, b'\r', b'\\', quote]),
    ])
}

/// The built-in grammar, in `TokenKind` order.
pub fn token_descriptions() -> Vec<TokenDescription> {
    use TokenKind::*;
    TokenKind::ALL
        .iter()
        .map(|&kind| {
            if let Some(text) = kind.text() {
                return TokenDescription::new(kind, text);
            }
            match kind {
                EndOfFile => TokenDescription::new(kind, 0u8),
                BoolLiteral => TokenDescription::new(
                    kind,
                    either([RegexElement::from("true"), RegexElement::from("false")]),
                ),
                LowercaseIdentifier => TokenDescription::new(
                    kind,
                    seq([set(Range::new(b'a', b'z') | b'_'), ident_tail()]),
                ),
                UppercaseIdentifier => {
                    TokenDescription::new(kind, seq([set(Range::new(b'A', b'Z')), ident_tail()]))
                }
                SignedIntegerLiteral => TokenDescription::new(kind, integer(true, "_i64")),
                UnsignedIntegerLiteral => TokenDescription::new(kind, integer(false, "_u64")),
                CharLiteral => TokenDescription::new(
                    kind,
                    seq([b'\''.into(), quoted_char(b'\''), b'\''.into()]),
                ),
                StringLiteral => TokenDescription::new(
                    kind,
                    seq([b'"'.into(), zero_or_more(quoted_char(b'"')), b'"'.into()]),
                ),
                LineComment => TokenDescription::new(
                    kind,
                    seq([b'/'.into(), b'/'.into(), zero_or_more(none_of(b"\n\0"))]),
                )
                .discarded(),
                Whitespace => {
                    TokenDescription::new(kind, one_or_more(CharMask::bytes(b" \x0c\n\r\t\x0b")))
                        .discarded()
                }
                _ => unreachable!("{kind:?} has fixed text"),
            }
        })
        .collect()
}
