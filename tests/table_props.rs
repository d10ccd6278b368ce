//! Structural and property tests over the compiled built-in tables.

use bsc::{
    lexer::{
        tables::{TokenKind, io::write_tables_json, load_tables_json_bytes, patterns},
        tokenize,
    },
    parser::literal::{decode_string, decode_unsigned},
};
use proptest::prelude::*;

#[test]
fn no_byte_is_covered_twice() {
    for pat in patterns().patterns() {
        for (i, state) in pat.states.iter().enumerate() {
            for b in 0..=255u8 {
                let hits = state.transitions.iter().filter(|t| t.mask.contains(b)).count();
                assert!(hits <= 1, "{:?} state {i}: byte {b} matches {hits} transitions", pat.kind);
            }
            for t in &state.transitions {
                assert!(t.target < pat.states.len(), "{:?} state {i}", pat.kind);
                assert!(!t.mask.is_empty(), "{:?} state {i}: empty mask", pat.kind);
            }
        }
    }
}

#[test]
fn every_kind_has_a_pattern() {
    let table = patterns();
    for kind in TokenKind::ALL {
        let pat = table.get(kind).unwrap_or_else(|| panic!("{kind:?} missing"));
        assert!(!pat.states.is_empty());
        // state 0 never accepts: no pattern matches the empty string
        assert!(!pat.is_final(0), "{kind:?}");
    }
}

#[test]
fn json_round_trip_is_lossless() {
    let mut json = Vec::new();
    write_tables_json(&mut json, patterns()).unwrap();
    let back = load_tables_json_bytes(&json).unwrap();
    assert_eq!(&back, patterns());
}

fn expected_word_kind(s: &str) -> TokenKind {
    if s == "true" || s == "false" {
        return TokenKind::BoolLiteral;
    }
    TokenKind::ALL
        .into_iter()
        .find(|k| k.text() == Some(s))
        .unwrap_or(TokenKind::LowercaseIdentifier)
}

proptest! {
    #[test]
    fn tokenize_is_deterministic(src in prop::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(tokenize("p.bs", &src), tokenize("p.bs", &src));
    }

    #[test]
    fn results_stay_inside_the_buffer(src in prop::collection::vec(any::<u8>(), 0..256)) {
        match tokenize("p.bs", &src) {
            Ok(toks) => {
                let mut prev_end = 0;
                for t in &toks {
                    prop_assert!(t.offset >= prev_end);
                    prop_assert!(t.offset + t.length <= src.len());
                    prev_end = t.offset + t.length;
                }
                prop_assert_eq!(toks.last().map(|t| t.kind), Some(TokenKind::EndOfFile));
            }
            Err(e) => {
                prop_assert!(e.span.length >= 1);
                prop_assert!(e.span.end() <= src.len());
            }
        }
    }

    #[test]
    fn lowercase_words(word in "[a-z_][a-zA-Z0-9_]{0,20}") {
        let toks = tokenize("p.bs", word.as_bytes()).unwrap();
        prop_assert_eq!(toks.len(), 2);
        prop_assert_eq!(toks[0].kind, expected_word_kind(&word));
        prop_assert_eq!(toks[0].length, word.len());
    }

    #[test]
    fn unsigned_literals(digits in "[0-9]('?[0-9]){0,12}") {
        let src = format!("{digits}_u64");
        let toks = tokenize("p.bs", src.as_bytes()).unwrap();
        prop_assert_eq!(toks[0].kind, TokenKind::UnsignedIntegerLiteral);
        prop_assert_eq!(toks[0].length, src.len());
        let plain: String = digits.chars().filter(|c| *c != '\'').collect();
        prop_assert_eq!(decode_unsigned(src.as_bytes()).ok(), plain.parse::<u64>().ok());
    }

    #[test]
    fn string_literals(src in r#""([ !#-\[\]-~]|\\[ntfr\\"]){0,24}""#) {
        let toks = tokenize("p.bs", src.as_bytes()).unwrap();
        prop_assert_eq!(toks.len(), 2);
        prop_assert_eq!(toks[0].kind, TokenKind::StringLiteral);
        prop_assert_eq!(toks[0].length, src.len());
        prop_assert!(decode_string(src.as_bytes()).is_ok());
    }
}
