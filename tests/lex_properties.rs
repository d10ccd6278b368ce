//! Scanner behaviour on the built-in grammar and on small hand-made tables.

use bsc::{
    lexer::{
        Token,
        tables::{
            CharMask, Range, TokenDescription, TokenKind, compile_patterns,
            regex::{one_or_more, seq, set},
        },
        tokenize, tokenize_with,
    },
    parser::literal::{decode_string, decode_unsigned},
    source::Span,
};
use TokenKind::*;

fn lex(src: &str) -> Vec<Token> {
    tokenize("props.bs", src.as_bytes()).unwrap_or_else(|e| panic!("{e}"))
}

fn kinds(src: &str) -> Vec<TokenKind> {
    lex(src).into_iter().map(|t| t.kind).collect()
}

#[test]
fn longest_match_wins() {
    let toks = lex("for12");
    assert_eq!(toks.len(), 2);
    assert_eq!(toks[0].kind, LowercaseIdentifier);
    assert_eq!(toks[0].span(), Span::new(0, 5));
}

#[test]
fn earlier_kind_wins_a_tie() {
    assert_eq!(kinds("for"), vec![For, EndOfFile]);
    assert_eq!(kinds("mod"), vec![Mod, EndOfFile]);
    assert_eq!(kinds("Function"), vec![UppercaseFunction, EndOfFile]);
}

#[test]
fn tie_break_follows_table_order() {
    // Same pattern under two kinds: the smaller kind takes every match.
    let word = || one_or_more(Range::new(b'a', b'z'));
    let descs = vec![
        TokenDescription::new(EndOfFile, 0u8),
        TokenDescription::new(Let, word()),
        TokenDescription::new(LowercaseIdentifier, word()),
        TokenDescription::new(Whitespace, one_or_more(b' ')).discarded(),
    ];
    let table = compile_patterns(&descs).unwrap();
    let toks = tokenize_with(&table, "t", b"ab cd").unwrap();
    let got: Vec<_> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(got, vec![Let, Let, EndOfFile]);
}

#[test]
fn invalid_byte_span() {
    let e = tokenize("props.bs", b"@").unwrap_err();
    assert_eq!(e.span, Span::new(0, 1));
    assert_eq!(e.message, "invalid token");
}

#[test]
fn println_with_escapes_end_to_end() {
    let src = r#"println("he said \"hi\"\n");"#;
    let toks = lex(src);
    let got: Vec<_> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(got, vec![
        Println,
        LeftParenthesis,
        StringLiteral,
        RightParenthesis,
        Semicolon,
        EndOfFile
    ]);
    let text = decode_string(toks[2].lexeme(src.as_bytes())).unwrap();
    assert_eq!(text, "he said \"hi\"\n");
}

#[test]
fn grouped_unsigned_literal() {
    let src = "1'000_u64";
    let toks = lex(src);
    assert_eq!(toks.len(), 2);
    assert_eq!(toks[0].kind, UnsignedIntegerLiteral);
    assert_eq!(toks[0].length, src.len());
    assert_eq!(decode_unsigned(toks[0].lexeme(src.as_bytes())), Ok(1000));
}

#[test]
fn signed_and_unsigned_literals() {
    assert_eq!(kinds("-5_i64 5_i64 5_u64"), vec![
        SignedIntegerLiteral,
        SignedIntegerLiteral,
        UnsignedIntegerLiteral,
        EndOfFile
    ]);
    // a minus that is not followed by digits is an operator
    assert_eq!(kinds("a - b"), vec![
        LowercaseIdentifier,
        Minus,
        LowercaseIdentifier,
        EndOfFile
    ]);
}

#[test]
fn discarded_only_source_is_just_eof() {
    for src in ["", " ", "\n\n\t", "// a\n// b", "  // trailing comment", "\x0b\x0c\r\n"] {
        let toks = lex(src);
        assert_eq!(toks.len(), 1, "{src:?}");
        assert_eq!(toks[0].kind, EndOfFile);
        assert_eq!(toks[0].span(), Span::new(src.len(), 0));
    }
}

#[test]
fn tokenize_is_deterministic() {
    let src = "let x = 'a' // c\nprintln(\"s\" ~> -1'0_i64 >= y);";
    assert_eq!(lex(src), lex(src));
}

#[test]
fn tokens_slice_the_source() {
    let src = "print ( \"x\" ) ;";
    let lexemes: Vec<_> = lex(src)
        .iter()
        .map(|t| String::from_utf8_lossy(t.lexeme(src.as_bytes())).into_owned())
        .collect();
    assert_eq!(lexemes, vec!["print", "(", "\"x\"", ")", ";", ""]);
}

#[test]
fn custom_masks_partition_bytes() {
    // Digits and letters go to different kinds; anything else is invalid.
    let descs = vec![
        TokenDescription::new(EndOfFile, 0u8),
        TokenDescription::new(LowercaseIdentifier, one_or_more(Range::new(b'a', b'z'))),
        TokenDescription::new(
            UnsignedIntegerLiteral,
            seq([set(CharMask::from(Range::new(b'0', b'9'))), b'u'.into(), b'v'.into()]),
        ),
    ];
    let table = compile_patterns(&descs).unwrap();
    let toks = tokenize_with(&table, "t", b"abc7uv").unwrap();
    let got: Vec<_> = toks.iter().map(|t| (t.kind, t.offset, t.length)).collect();
    assert_eq!(got, vec![
        (LowercaseIdentifier, 0, 3),
        (UnsignedIntegerLiteral, 3, 3),
        (EndOfFile, 6, 0)
    ]);
    assert!(tokenize_with(&table, "t", b"7").is_err());
    assert!(tokenize_with(&table, "t", b"7u").is_err());
}

#[test]
fn merged_twins_can_widen_a_pattern() {
    // `[0-9] u u*`: the post-digit state ends up sharing its edges with the
    // final loop state, so merging also accepts the bare digit.
    let descs = vec![
        TokenDescription::new(EndOfFile, 0u8),
        TokenDescription::new(
            UnsignedIntegerLiteral,
            seq([set(CharMask::from(Range::new(b'0', b'9'))), one_or_more(b'u')]),
        ),
    ];
    let table = compile_patterns(&descs).unwrap();
    let toks = tokenize_with(&table, "t", b"7").unwrap();
    assert_eq!((toks[0].kind, toks[0].offset, toks[0].length), (UnsignedIntegerLiteral, 0, 1));
    let toks = tokenize_with(&table, "t", b"7uuu").unwrap();
    assert_eq!((toks[0].kind, toks[0].length), (UnsignedIntegerLiteral, 4));
}
