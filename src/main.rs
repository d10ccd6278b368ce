// src/main.rs
// Driver: read one source file, lex -> parse -> check -> run, print the
// program's output to stdout and any stage error to stderr.

use std::{
    fs,
    io::{self, IsTerminal, Write},
    path::PathBuf,
};

use anyhow::Context;
use bsc::{
    CompileError,
    diagnostics::Style,
    interpreter,
    lexer::{
        Token,
        tables::{self, PatternTable, load_tables_json_bytes},
        tokenize_with,
    },
    parser, type_checker,
};
use log::warn;
use tracing_subscriber::{EnvFilter, prelude::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
struct Opts {
    /// Source file to run
    #[arg(default_value = "source.bs")]
    file: PathBuf,

    /// Load precompiled lexer tables (JSON) instead of compiling the grammar
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Print the token stream and exit
    #[arg(long)]
    tokens: bool,

    /// When to color diagnostics
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Log filter, using env_logger-like syntax
    #[arg(long, env = "RUST_LOG")]
    log_filter: Option<String>,
}

fn init_logger(filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter).with_context(|| format!("Invalid log filter {filter:?}"))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init()
        .context("Error initializing logger")
}

fn style(choice: ColorChoice) -> Style {
    match choice {
        ColorChoice::Always => Style::COLORED,
        ColorChoice::Never => Style::PLAIN,
        ColorChoice::Auto if io::stderr().is_terminal() => Style::COLORED,
        ColorChoice::Auto => Style::PLAIN,
    }
}

fn dump_tokens(tokens: &[Token], source: &[u8]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for t in tokens {
        writeln!(
            out,
            "{:>6}+{:<4} {:?}  {:?}",
            t.offset,
            t.length,
            t.kind,
            String::from_utf8_lossy(t.lexeme(source))
        )?;
    }
    out.flush()
}

fn compile_and_run(
    table: &PatternTable,
    filename: &str,
    source: &[u8],
    tokens_only: bool,
) -> Result<bool, CompileError> {
    let tokens = tokenize_with(table, filename, source)?;
    if tokens_only {
        // stdout errors are not stage errors; report them and fail
        if let Err(e) = dump_tokens(&tokens, source) {
            eprintln!("error: failed to write tokens: {e}");
            return Ok(false);
        }
        return Ok(true);
    }
    let program = parser::parse(&tokens, source)?;
    let checked = type_checker::check(&program)?;
    interpreter::run(&checked, io::stdout().lock())?;
    Ok(true)
}

fn run(opts: Opts) -> anyhow::Result<bool> {
    init_logger(opts.log_filter.as_deref().unwrap_or("warn"))?;

    let source =
        fs::read(&opts.file).with_context(|| format!("Error reading {}", opts.file.display()))?;

    let loaded;
    let table = match &opts.tables {
        Some(path) => {
            let bytes =
                fs::read(path).with_context(|| format!("Error reading {}", path.display()))?;
            loaded = load_tables_json_bytes(&bytes)
                .with_context(|| format!("Error loading tables from {}", path.display()))?;
            &loaded
        }
        None => tables::patterns(),
    };

    let filename = opts.file.display().to_string();
    match compile_and_run(table, &filename, &source, opts.tokens) {
        Ok(ok) => Ok(ok),
        Err(e) => {
            // keep anything the program already printed ahead of the diagnostic
            if let Err(flush) = io::stdout().flush() {
                warn!("failed to flush program output: {flush}");
            }
            eprint!("{}", e.render(&filename, &source, style(opts.color)));
            Ok(false)
        }
    }
}

fn main() {
    let opts: Opts = clap::Parser::parse();

    std::process::exit(run(opts).map_or_else(
        |e| {
            eprintln!("error: {e:?}");
            1
        },
        |ok| if ok { 0 } else { 1 },
    ));
}
