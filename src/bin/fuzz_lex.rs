// src/bin/fuzz_lex.rs
// Generate large random-but-valid inputs and lex them twice: once with the
// tables compiled in-process and once with the same tables after a JSON
// round trip. Both streams must agree and be well formed.
// Extras:
//   - FUZZ_SAVE=1 and FUZZ_DIR=... save generated fuzz cases
//   - FUZZ_INPUT=path         replay a saved case
//   - FUZZ_EX=<files>         comma/colon-separated list of handcrafted .bs files
//   - FUZZ_EX_DIR=<dir>       directory of .bs files (default: "lexer_tests")
//
// Handcrafted cases may carry a golden sidecar <case>.tokens.json with
// {"tokens":[{"kind":"Print", "text":"print"}...]} that both streams must match.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use bsc::{
    dev::generator::gen_valid_source,
    lexer::{
        Token,
        tables::{PatternTable, TokenKind, io::write_tables_json, load_tables_json_bytes, patterns},
        tokenize_with,
    },
    source::{SourceLocation, Span},
};
use rand::{SeedableRng, rngs::StdRng};

// ------------------ goldens ------------------

#[derive(serde::Deserialize)]
struct Golden {
    tokens: Vec<GoldenTok>,
}

#[derive(serde::Deserialize)]
struct GoldenTok {
    kind: TokenKind,
    text: String,
}

fn load_golden_for(case: &Path) -> Option<Golden> {
    let p = case.with_extension("tokens.json");
    let s = fs::read_to_string(&p).ok()?;
    match serde_json::from_str::<Golden>(&s) {
        Ok(g) => Some(g),
        Err(e) => {
            eprintln!("[golden] failed to parse {}: {e}", p.display());
            None
        }
    }
}

fn check_against_golden(src: &str, toks: &[Token], golden: &Golden) -> bool {
    let got: Vec<(TokenKind, String)> = toks
        .iter()
        .map(|t| {
            (
                t.kind,
                String::from_utf8_lossy(t.lexeme(src.as_bytes())).into_owned(),
            )
        })
        .collect();
    if got.len() != golden.tokens.len() {
        eprintln!(
            "[golden] count mismatch: got={} expected={}",
            got.len(),
            golden.tokens.len()
        );
        return false;
    }
    for (i, ((gk, gtxt), exp)) in got.iter().zip(golden.tokens.iter()).enumerate() {
        if *gk != exp.kind || *gtxt != exp.text {
            eprintln!(
                "[golden] mismatch at {i}:\n  got:  kind={gk:?} text={gtxt:?}\n  want: kind={:?} text={:?}",
                exp.kind, exp.text
            );
            return false;
        }
    }
    true
}

// ------------------ main ------------------

struct Tables {
    live: &'static PatternTable,
    reloaded: PatternTable,
}

fn reload(table: &PatternTable) -> PatternTable {
    let mut json = Vec::new();
    write_tables_json(&mut json, table).expect("failed to serialize tables");
    load_tables_json_bytes(&json).expect("failed to reload serialized tables")
}

fn main() {
    let t0 = Instant::now();
    let live = patterns();
    let tables = Tables {
        live,
        reloaded: reload(live),
    };
    eprintln!(
        "[tables] {} patterns, {} states, ready in {:.2?}",
        live.len(),
        live.n_states(),
        t0.elapsed()
    );

    // --- REPLAY A SINGLE CASE ---
    if let Ok(path) = std::env::var("FUZZ_INPUT") {
        eprintln!("[replay] reading {path}");
        let s = fs::read_to_string(&path).expect("failed to read FUZZ_INPUT");
        if !run_once(&tables, &s, None, Some(Path::new(&path))) {
            std::process::exit(1);
        }
        return;
    }

    // --- HANDCRAFTED EXAMPLES (run before fuzzing) ---
    let examples = collect_examples();
    if !examples.is_empty() {
        eprintln!("[ex] running {} handcrafted example(s)…", examples.len());
        for (j, p) in examples.iter().enumerate() {
            match fs::read_to_string(p) {
                Ok(s) => {
                    eprintln!("[ex {j}] {}", p.display());
                    if !run_once(&tables, &s, None, Some(p.as_path())) {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("[ex {j}] failed to read {}: {e}", p.display());
                    std::process::exit(1);
                }
            }
        }
    }

    // --- FUZZ MODE ---
    let save_cases = std::env::var("FUZZ_SAVE").ok().as_deref() == Some("1");
    let out_dir = std::env::var("FUZZ_DIR").unwrap_or_else(|_| "fuzz-cases".to_string());
    let len: usize = std::env::var("FUZZ_LEN")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1_000_000);
    let iters: usize = std::env::var("FUZZ_ITERS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3);
    let seed: u64 = std::env::var("FUZZ_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    eprintln!("[fuzz] len={len} iters={iters} seed={seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    if save_cases {
        if let Err(e) = fs::create_dir_all(&out_dir) {
            eprintln!("error: failed to create {out_dir}: {e}");
            std::process::exit(1);
        }
    }

    for i in 0..iters {
        let s = gen_valid_source(&mut rng, len);
        eprintln!("[fuzz] iter {i}: generated {} bytes", s.len());

        if save_cases {
            let path = save_case(&out_dir, seed, i, len, &s);
            eprintln!("[save] wrote {}", path.display());
        }

        if !run_once(&tables, &s, Some(i), None) {
            std::process::exit(1);
        }
    }
    eprintln!("[fuzz] all iterations matched ✅");
}

// ---------- run one (live vs reloaded [+ optional golden]) ----------

fn run_once(tables: &Tables, src: &str, iter: Option<usize>, case: Option<&Path>) -> bool {
    let name = case.map_or_else(|| "fuzz.bs".to_string(), |p| p.display().to_string());
    let bytes = src.as_bytes();

    let t0 = Instant::now();
    let live = tokenize_with(tables.live, &name, bytes);
    let t1 = Instant::now();
    let reloaded = tokenize_with(&tables.reloaded, &name, bytes);
    let t2 = Instant::now();

    let (live, reloaded) = match (live, reloaded) {
        (Ok(a), Ok(b)) => (a, b),
        (a, b) => {
            // generated and handcrafted cases are valid source
            for e in [a.err(), b.err()].into_iter().flatten() {
                eprintln!("\n[lex] {e}");
                dump_src_window(src, e.span, "error");
            }
            return false;
        }
    };

    let eq = compare_streams(src, &live, &reloaded);
    let well_formed = check_stream(src, &live);
    let label = iter.map_or_else(|| "[replay]".to_string(), |i| format!("[fuzz] iter {i}:"));
    eprintln!(
        "{label} live {} ms  |  reloaded {} ms  |  tokens kept = {}  -> {}",
        (t1 - t0).as_millis(),
        (t2 - t1).as_millis(),
        live.len(),
        if eq && well_formed { "OK" } else { "MISMATCH!" }
    );

    let mut ok = eq && well_formed;
    if let Some(p) = case {
        match load_golden_for(p) {
            Some(g) => ok &= check_against_golden(src, &live, &g),
            None => eprintln!("[golden] no sidecar found for {}", p.display()),
        }
    }
    ok
}

// Tokens in order, inside the buffer, and the stream ends in `EndOfFile`.
fn check_stream(src: &str, toks: &[Token]) -> bool {
    let mut prev_end = 0usize;
    for (i, t) in toks.iter().enumerate() {
        if t.offset < prev_end || t.offset + t.length > src.len() {
            eprintln!(
                "[check] token {i} {:?} @{}+{} out of order or out of bounds (prev end {prev_end})",
                t.kind, t.offset, t.length
            );
            dump_src_window(src, t.span(), "check");
            return false;
        }
        prev_end = t.offset + t.length;
    }
    match toks.last() {
        Some(t) if t.kind == TokenKind::EndOfFile => true,
        other => {
            eprintln!("[check] stream does not end with EndOfFile: {other:?}");
            false
        }
    }
}

fn compare_streams(src: &str, a: &[Token], b: &[Token]) -> bool {
    let n = a.len().min(b.len());
    let Some(i) = (0..n).find(|&i| a[i] != b[i]).or((a.len() != b.len()).then_some(n)) else {
        return true;
    };
    eprintln!(
        "[diff] first divergence at token {i} (live={} reloaded={})",
        a.len(),
        b.len()
    );
    let hi = (i + 6).min(a.len().max(b.len()));
    for j in i.saturating_sub(3)..hi {
        let (x, y) = (a.get(j), b.get(j));
        let mark = if x == y { "✅" } else { "❌" };
        eprintln!("{mark} #{j:06} live={x:?}  reloaded={y:?}");
    }
    if let Some(t) = a.get(i).or(b.get(i)) {
        dump_src_window(src, t.span(), "diff");
    }
    false
}

fn dump_src_window(src: &str, span: Span, who: &str) {
    let lo = span.offset.saturating_sub(64);
    let hi = (span.end() + 64).min(src.len());
    let pos = SourceLocation::new("", src.as_bytes(), span).position();
    let snippet = String::from_utf8_lossy(&src.as_bytes()[lo..hi]);

    eprintln!(
        "[src:{who}] @{}+{} (line {pos})  window [{lo}..{hi}]",
        span.offset, span.length
    );
    eprintln!("    {snippet:?}");
}

// ---------- handcrafted examples discovery ----------

fn collect_examples() -> Vec<PathBuf> {
    // FUZZ_EX takes precedence; split on ',' or ':'
    if let Ok(list) = std::env::var("FUZZ_EX") {
        let out: Vec<PathBuf> = list
            .split([',', ':'])
            .map(|part| PathBuf::from(part.trim()))
            .filter(|p| !p.as_os_str().is_empty() && p.exists())
            .collect();
        if !out.is_empty() {
            return out;
        }
    }

    let dir = std::env::var("FUZZ_EX_DIR").unwrap_or_else(|_| "lexer_tests".into());
    let Ok(rd) = fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut out: Vec<PathBuf> = rd
        .flatten()
        .map(|ent| ent.path())
        .filter(|p| p.extension().is_some_and(|e| e.eq_ignore_ascii_case("bs")))
        .collect();
    out.sort();
    out
}

// ---------- save / replay helpers ----------

#[derive(serde::Serialize)]
struct CaseMeta<'a> {
    unix_ts: u64,
    seed: u64,
    iter: usize,
    requested_len: usize,
    actual_bytes: usize,
    note: &'a str,
}

fn save_case(dir: &str, seed: u64, iter: usize, requested_len: usize, src: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let base = format!("case_s{seed}_i{iter}_n{}.bs", src.len());
    let path = Path::new(dir).join(base);

    fs::write(&path, src.as_bytes()).expect("failed to write case file");

    let meta = CaseMeta {
        unix_ts: ts,
        seed,
        iter,
        requested_len,
        actual_bytes: src.len(),
        note: "Replay with: FUZZ_INPUT=<this file> cargo run --bin fuzz_lex",
    };
    let meta_path = path.with_extension("json");
    let mut f = fs::File::create(&meta_path).expect("failed to write meta");
    let _ = writeln!(
        f,
        "{}",
        serde_json::to_string_pretty(&meta).expect("case metadata serializes")
    );

    path
}
