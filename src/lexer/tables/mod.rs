// src/lexer/tables/mod.rs
pub mod analysis;
pub mod arena;
pub mod build;
pub mod char_mask;
pub mod io;
pub mod reduce;
pub mod regex;
pub mod tokens;

use std::sync::OnceLock;

use thiserror::Error;

pub use build::{compile_pattern, compile_patterns};
pub use char_mask::{CharMask, Range};
pub use io::{TablesIoError, load_tables_json_bytes, save_tables_json};
pub use regex::RegexElement;
pub use tokens::{N_KINDS, TokenDescription, TokenKind, token_descriptions};

/// Edge guarded by a byte mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transition {
    pub mask: CharMask,
    pub target: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub transitions: Vec<Transition>,
    pub is_final: bool,
}

impl State {
    /// Target of the transition whose mask holds `b`, if any.
    /// Masks within one state are disjoint, so at most one can match.
    #[inline]
    pub fn next(&self, b: u8) -> Option<usize> {
        self.transitions
            .iter()
            .find(|t| t.mask.contains(b))
            .map(|t| t.target)
    }
}

/// Compiled automaton for one token kind. State 0 is the start state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub kind: TokenKind,
    pub states: Vec<State>,
    pub should_emit: bool,
}

impl Pattern {
    pub const START: usize = 0;

    #[inline]
    pub fn next(&self, state: usize, b: u8) -> Option<usize> {
        self.states.get(state).and_then(|s| s.next(b))
    }

    #[inline]
    pub fn is_final(&self, state: usize) -> bool {
        self.states.get(state).is_some_and(|s| s.is_final)
    }
}

/// One pattern per token kind, ordered by kind. Table order is match priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTable {
    patterns: Vec<Pattern>,
}

impl PatternTable {
    pub fn new(mut patterns: Vec<Pattern>) -> Result<Self, GrammarError> {
        patterns.sort_by_key(|p| p.kind);
        if let Some(w) = patterns.windows(2).find(|w| w[0].kind == w[1].kind) {
            return Err(GrammarError::DuplicateKind(w[0].kind));
        }
        Ok(Self { patterns })
    }

    #[inline]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, kind: TokenKind) -> Option<&Pattern> {
        self.patterns
            .binary_search_by_key(&kind, |p| p.kind)
            .ok()
            .map(|i| &self.patterns[i])
    }

    /// Total number of states across all patterns.
    pub fn n_states(&self) -> usize {
        self.patterns.iter().map(|p| p.states.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("{kind:?}: pattern contains an empty {group}")]
    EmptyGroup {
        kind: TokenKind,
        group: &'static str,
    },
    #[error("{kind:?}: state {state} has overlapping transitions on {overlap:?}")]
    OverlappingTransitions {
        kind: TokenKind,
        state: usize,
        overlap: CharMask,
    },
    #[error("{kind:?}: state {state} has a transition to missing state {target}")]
    DanglingTarget {
        kind: TokenKind,
        state: usize,
        target: usize,
    },
    #[error("{0:?}: described more than once")]
    DuplicateKind(TokenKind),
}

static PATTERNS: OnceLock<PatternTable> = OnceLock::new();

/// Process-wide tables for the built-in token grammar, compiled on first use.
pub fn patterns() -> &'static PatternTable {
    PATTERNS.get_or_init(|| {
        compile_patterns(&token_descriptions())
            .unwrap_or_else(|e| panic!("built-in token grammar failed to compile: {e}"))
    })
}
