// src/lexer/tables/char_mask.rs
use std::{fmt, ops::BitOr};

/// Membership set over the 128 ASCII byte values. Bytes >= 128 are never members.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CharMask(u128);

impl CharMask {
    pub const EMPTY: Self = Self(0);
    pub const FULL: Self = Self(u128::MAX);

    #[inline]
    pub const fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u128 {
        self.0
    }

    #[inline]
    pub const fn byte(b: u8) -> Self {
        if b < 128 { Self(1 << b) } else { Self::EMPTY }
    }

    pub const fn bytes(bs: &[u8]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < bs.len() {
            if bs[i] < 128 {
                bits |= 1 << bs[i];
            }
            i += 1;
        }
        Self(bits)
    }

    #[inline]
    pub const fn contains(self, b: u8) -> bool {
        b < 128 && (self.0 >> b) & 1 == 1
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn inverse(self) -> Self {
        Self(!self.0)
    }

    #[inline]
    pub const fn is_disjoint(self, other: Self) -> bool {
        self.0 & other.0 == 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Member bytes in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0u8..128).filter(move |&b| self.contains(b))
    }
}

impl BitOr for CharMask {
    type Output = CharMask;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOr<Range> for CharMask {
    type Output = CharMask;

    #[inline]
    fn bitor(self, rhs: Range) -> Self {
        self.union(rhs.mask())
    }
}

impl BitOr<u8> for CharMask {
    type Output = CharMask;

    #[inline]
    fn bitor(self, rhs: u8) -> Self {
        self.union(Self::byte(rhs))
    }
}

impl From<u8> for CharMask {
    #[inline]
    fn from(b: u8) -> Self {
        Self::byte(b)
    }
}

impl From<Range> for CharMask {
    #[inline]
    fn from(r: Range) -> Self {
        r.mask()
    }
}

// Printable members only, like the generated-table comments.
impl fmt::Display for CharMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.iter().filter(|b| (32..=126).contains(b)) {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CharMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for b in self.iter() {
            set.entry(&(b as char));
        }
        set.finish()
    }
}

/// Inclusive byte range, e.g. `Range::new(b'a', b'z')`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: u8,
    pub end: u8,
}

impl Range {
    #[inline]
    pub const fn new(start: u8, end: u8) -> Self {
        Self { start, end }
    }

    pub const fn mask(self) -> CharMask {
        let mut bits = 0u128;
        let mut b = self.start;
        while b <= self.end && b < 128 {
            bits |= 1 << b;
            b += 1;
        }
        CharMask::from_bits(bits)
    }
}

impl BitOr for Range {
    type Output = CharMask;

    #[inline]
    fn bitor(self, rhs: Self) -> CharMask {
        self.mask().union(rhs.mask())
    }
}

impl BitOr<u8> for Range {
    type Output = CharMask;

    #[inline]
    fn bitor(self, rhs: u8) -> CharMask {
        self.mask().union(CharMask::byte(rhs))
    }
}
