// src/bin/gen_tables.rs
// Compile the built-in token grammar and write the tables to JSON.
// Usage:
//   cargo run --bin gen_tables                # writes tables/patterns.json
//   cargo run --bin gen_tables -- /path/out.json

use std::{env, fs, path::Path, time::Instant};

use anyhow::Context;
use bsc::lexer::tables::{compile_patterns, save_tables_json, token_descriptions};

fn main() -> anyhow::Result<()> {
    let out = env::args()
        .nth(1)
        .unwrap_or_else(|| "tables/patterns.json".to_string());
    let out_path = Path::new(&out);

    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    println!("[gen_tables] compiling token grammar…");
    let descs = token_descriptions();
    let t0 = Instant::now();
    let table = compile_patterns(&descs).context("built-in grammar failed to compile")?;
    let elapsed = t0.elapsed();

    let leaves: usize = descs.iter().map(|d| d.pattern.leaf_count()).sum();
    let largest = table
        .patterns()
        .iter()
        .max_by_key(|p| p.states.len())
        .map(|p| (p.kind, p.states.len()));
    println!(
        "[gen_tables] {} patterns, {} char-set leaves -> {} states in {:.2?}",
        table.len(),
        leaves,
        table.n_states(),
        elapsed
    );
    if let Some((kind, n)) = largest {
        println!("[gen_tables] largest pattern: {kind:?} ({n} states)");
    }

    save_tables_json(out_path, &table)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    println!("[gen_tables] wrote {}", out_path.display());
    println!("         tip: run `bsc --tables {}` to skip start-up compilation.", out_path.display());
    Ok(())
}
