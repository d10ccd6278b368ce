// src/dev/generator.rs
// Random source that the built-in grammar accepts. Every emitted token is
// followed by a separator, so maximal munch can never glue two of them into
// something the scanner rejects (e.g. `1_u64` followed by `'x'`).

use rand::Rng;

use crate::lexer::tables::TokenKind;

/// At least `target_len` bytes of valid source, ending in a newline.
pub fn gen_valid_source<R: Rng>(rng: &mut R, target_len: usize) -> String {
    let mut out = String::with_capacity(target_len + target_len / 8);

    while out.len() < target_len {
        let roll = rng.random_range(0u32..100);

        match roll {
            0..=19 => push_ident(rng, &mut out),         // ~20%
            20..=29 => push_keyword(rng, &mut out),      // ~10%
            30..=44 => push_int(rng, &mut out),          // ~15%
            45..=51 => push_string(rng, &mut out),       // ~7%
            52..=55 => push_char(rng, &mut out),         // ~4%
            56..=67 => push_ws(rng, &mut out),           // ~12%
            68..=73 => push_line_comment(rng, &mut out), // ~6%
            74..=99 => push_operator(rng, &mut out),     // ~26%
            _ => unreachable!(),
        }
    }

    // Trailer: a line comment or token always ends cleanly before this.
    out.push('\n');
    out
}

fn sep<R: Rng>(rng: &mut R, out: &mut String) {
    out.push(if rng.random_bool(0.8) { ' ' } else { '\n' });
}

fn push_ident<R: Rng>(rng: &mut R, out: &mut String) {
    let len = rng.random_range(1..=12);
    out.push(random_alpha(rng));
    for _ in 1..len {
        if rng.random_bool(0.6) {
            out.push(random_alpha(rng));
        } else {
            out.push(random_digit(rng));
        }
    }
    sep(rng, out);
}

fn push_keyword<R: Rng>(rng: &mut R, out: &mut String) {
    let words: Vec<&str> = TokenKind::ALL
        .iter()
        .filter_map(|k| k.text())
        .filter(|t| t.bytes().all(|b| b.is_ascii_alphabetic()))
        .chain(["true", "false"])
        .collect();
    let i = rng.random_range(0..words.len());
    out.push_str(words[i]);
    sep(rng, out);
}

fn push_int<R: Rng>(rng: &mut R, out: &mut String) {
    let signed = rng.random_bool(0.3);
    if signed && rng.random_bool(0.5) {
        out.push('-');
    }
    let len = rng.random_range(1..=8);
    for i in 0..len {
        if i > 0 && rng.random_bool(0.15) {
            out.push('\'');
        }
        out.push(random_digit(rng));
    }
    out.push_str(if signed { "_i64" } else { "_u64" });
    sep(rng, out);
}

fn push_string<R: Rng>(rng: &mut R, out: &mut String) {
    out.push('"');
    let len = rng.random_range(0..=16);
    for _ in 0..len {
        if rng.random_bool(0.15) {
            out.push_str(random_escape(rng, '"'));
        } else {
            out.push(random_body(rng));
        }
    }
    out.push('"');
    sep(rng, out);
}

fn push_char<R: Rng>(rng: &mut R, out: &mut String) {
    out.push('\'');
    if rng.random_bool(0.25) {
        out.push_str(random_escape(rng, '\''));
    } else {
        out.push(random_body(rng));
    }
    out.push('\'');
    sep(rng, out);
}

fn push_ws<R: Rng>(rng: &mut R, out: &mut String) {
    let opts: [char; 6] = [' ', '\t', '\r', '\n', '\x0b', '\x0c'];
    let len = rng.random_range(1..=8);
    for _ in 0..len {
        let i = rng.random_range(0..opts.len());
        out.push(opts[i]);
    }
}

fn push_line_comment<R: Rng>(rng: &mut R, out: &mut String) {
    out.push_str("//");
    let len = rng.random_range(0..=40);
    const ALPH: &str =
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 +-*/\"'~>{}()<>=\t";
    let bytes = ALPH.as_bytes();
    for _ in 0..len {
        let i = rng.random_range(0..bytes.len());
        out.push(bytes[i] as char);
    }
    out.push('\n');
}

fn push_operator<R: Rng>(rng: &mut R, out: &mut String) {
    let ops = [
        ":", ",", "~>", ";", "+", "-", "*", "/", "(", ")", "{", "}", "==", "!=", ">=", "<=", ">",
        "<", "=",
    ];
    let i = rng.random_range(0..ops.len());
    out.push_str(ops[i]);
    sep(rng, out);
}

fn random_escape<R: Rng>(rng: &mut R, quote: char) -> &'static str {
    let set: [&str; 5] = ["\\n", "\\t", "\\f", "\\r", "\\\\"];
    if rng.random_bool(0.2) {
        return if quote == '"' { "\\\"" } else { "\\'" };
    }
    set[rng.random_range(0..set.len())]
}

// Printable ASCII minus the backslash and both quotes.
fn random_body<R: Rng>(rng: &mut R) -> char {
    loop {
        let c = rng.random_range(b' '..=b'~') as char;
        if !matches!(c, '\\' | '"' | '\'') {
            return c;
        }
    }
}

fn random_alpha<R: Rng>(rng: &mut R) -> char {
    let set = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
    let i = rng.random_range(0..set.len());
    set[i] as char
}

fn random_digit<R: Rng>(rng: &mut R) -> char {
    let set = b"0123456789";
    let i = rng.random_range(0..set.len());
    set[i] as char
}
