// src/lexer/tables/regex.rs
// Pattern AST used to describe token kinds. Compiled into per-token automata by `build`.

use super::char_mask::{CharMask, Range};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexElement {
    CharSet(CharMask),
    Sequence(Vec<RegexElement>),
    EitherOf(Vec<RegexElement>),
    Maybe(Box<RegexElement>),
    ZeroOrMoreOf(Box<RegexElement>),
}

impl RegexElement {
    /// One `CharSet` per byte of `text`, chained in a `Sequence`.
    /// A single byte is returned as a bare `CharSet`.
    pub fn literal(text: &[u8]) -> Self {
        match text {
            [b] => Self::CharSet(CharMask::byte(*b)),
            _ => Self::Sequence(text.iter().map(|&b| Self::CharSet(CharMask::byte(b))).collect()),
        }
    }

    /// Number of `CharSet` leaves, i.e. the number of non-start states the
    /// builder will allocate for this pattern.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::CharSet(_) => 1,
            Self::Sequence(xs) | Self::EitherOf(xs) => xs.iter().map(Self::leaf_count).sum(),
            Self::Maybe(x) | Self::ZeroOrMoreOf(x) => x.leaf_count(),
        }
    }
}

impl From<CharMask> for RegexElement {
    fn from(m: CharMask) -> Self {
        Self::CharSet(m)
    }
}

impl From<Range> for RegexElement {
    fn from(r: Range) -> Self {
        Self::CharSet(r.mask())
    }
}

impl From<u8> for RegexElement {
    fn from(b: u8) -> Self {
        Self::CharSet(CharMask::byte(b))
    }
}

impl From<&str> for RegexElement {
    fn from(s: &str) -> Self {
        Self::literal(s.as_bytes())
    }
}

// ---- combinators, so grammar tables read close to the regex they encode ----

pub fn seq<I>(items: I) -> RegexElement
where
    I: IntoIterator<Item = RegexElement>,
{
    RegexElement::Sequence(items.into_iter().collect())
}

pub fn either<I>(items: I) -> RegexElement
where
    I: IntoIterator<Item = RegexElement>,
{
    RegexElement::EitherOf(items.into_iter().collect())
}

pub fn maybe(x: impl Into<RegexElement>) -> RegexElement {
    RegexElement::Maybe(Box::new(x.into()))
}

pub fn zero_or_more(x: impl Into<RegexElement>) -> RegexElement {
    RegexElement::ZeroOrMoreOf(Box::new(x.into()))
}

/// `x x*`. The two copies get distinct state indices.
pub fn one_or_more(x: impl Into<RegexElement>) -> RegexElement {
    let x = x.into();
    seq([x.clone(), zero_or_more(x)])
}

pub fn set(m: impl Into<CharMask>) -> RegexElement {
    RegexElement::CharSet(m.into())
}

/// Every byte except the given ones.
pub fn none_of(bytes: &[u8]) -> RegexElement {
    RegexElement::CharSet(CharMask::bytes(bytes).inverse())
}
