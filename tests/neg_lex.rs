//! Negative lexer tests: inputs the built-in grammar must reject.

use bsc::{lexer::tokenize, source::Span};

fn lex(src: &str) -> Result<Vec<bsc::lexer::Token>, bsc::lexer::LexError> {
    tokenize("neg.bs", src.as_bytes())
}

#[test]
fn unterminated_string_eof() {
    let src = "s = \"hello"; // missing closing quote
    assert!(lex(src).is_err(), "unterminated string should error");
}

#[test]
fn newline_in_string() {
    let src = "s = \"hello\nworld\""; // newline inside string not allowed
    assert!(lex(src).is_err(), "newline in string should error");
}

#[test]
fn tab_in_string() {
    assert!(lex("\"a\tb\"").is_err(), "raw tab inside string should error");
    assert!(lex("\"a\\tb\"").is_ok(), "escaped tab is fine");
}

#[test]
fn unterminated_char_eof() {
    let src = "c = 'a"; // missing closing quote
    assert!(lex(src).is_err(), "unterminated char should error");
}

#[test]
fn char_literal_holds_one_character() {
    assert!(lex("'ab'").is_err(), "two characters in a char literal should error");
    assert!(lex("''").is_err(), "empty char literal should error");
}

#[test]
fn unknown_escape() {
    assert!(lex("\"\\q\"").is_err(), "\\q is not an escape");
    assert!(lex("'\\\"'").is_err(), "\\\" is not an escape inside a char literal");
}

#[test]
fn stray_characters() {
    for src in ["@", "#", "$", "?", "!", "~", "&", "|", "[", "]", "%", "^", "."] {
        let e = lex(src).unwrap_err();
        assert_eq!(e.span, Span::new(0, 1), "{src:?}");
    }
}

#[test]
fn integer_without_suffix() {
    assert!(lex("12").is_err(), "bare integer should error");
    assert!(lex("12_u6;").is_err(), "truncated suffix should error");
    assert!(lex("12_i32").is_err(), "unknown suffix should error");
    assert!(lex("1''2_u64").is_err(), "doubled separator should error");
    assert!(lex("-1_u64").is_err(), "unsigned literal cannot be negative");
}

#[test]
fn error_stops_at_first_problem() {
    let e = lex("println(1_u64);\nprintln(@);\n@").unwrap_err();
    assert_eq!(e.span, Span::new(24, 1));
    let loc = e.location(b"println(1_u64);\nprintln(@);\n@");
    assert_eq!(loc.position().to_string(), "2:9");
}
