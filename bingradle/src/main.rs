//! Command-line tool that converts Gradle build scripts into data documents.
//!
//! Usage: gradle2json [OPTIONS] <PATH>
//!
//! PATH is a build script, a directory of `*.gradle` scripts, or `-` for
//! standard input.
//!
//! Options:
//!   -t, --to <FORMAT>        Output format (json, yaml, toml, cbor) [default: json]
//!   -o, --output <FILE>      Write output to the given file
//!   -w, --write              Write output next to each input with the format's extension
//!       --check              Only parse; print `PATH: ok` for each script
//!       --max-depth <N>      Deepest block nesting accepted [env: GRADLE2JSON_MAX_DEPTH]
//!       --max-bytes <N>      Largest input accepted [env: GRADLE2JSON_MAX_BYTES]
//!   -v, --verbose            Log parser progress to stderr
//!   -h, --help               Print help
//!   -V, --version            Print version

use anyhow::{bail, Context, Result};
use clap::Parser;
use libgradle::{
    parse_file_with, parse_text_with, Document, ParseOptions, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_INPUT_BYTES,
};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod transcode;

use transcode::Format;

/// Convert Gradle build scripts into JSON, YAML, TOML or CBOR
#[derive(Parser, Debug)]
#[command(name = "gradle2json")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Build script, directory of *.gradle scripts, or `-` for stdin
    path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    to: Format,

    /// Write output to the given file
    #[arg(short, long, conflicts_with = "write")]
    output: Option<PathBuf>,

    /// Write output next to each input, replacing its extension
    #[arg(short, long)]
    write: bool,

    /// Only check that each script parses
    #[arg(long, conflicts_with_all = ["output", "write"])]
    check: bool,

    /// Deepest block nesting accepted
    #[arg(long, env = "GRADLE2JSON_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Largest input accepted, in bytes
    #[arg(long, env = "GRADLE2JSON_MAX_BYTES", default_value_t = DEFAULT_MAX_INPUT_BYTES)]
    max_bytes: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_max_depth(self.max_depth)
            .with_max_input_bytes(self.max_bytes)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();

    if cli.path.as_os_str() == "-" {
        process_stdin(&cli)
    } else if cli.path.is_dir() {
        process_directory(&cli, &cli.path)
    } else {
        process_file(&cli, &cli.path)
    }
}

fn process_stdin(cli: &Cli) -> Result<()> {
    if cli.write {
        bail!("--write requires an input file");
    }
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Cannot read standard input")?;
    let doc = parse_text_with(&input, &cli.parse_options().with_filename("<stdin>"))?;
    if cli.check {
        println!("<stdin>: ok");
        return Ok(());
    }
    output_document(cli, &doc, None)
}

fn process_directory(cli: &Cli, dir: &Path) -> Result<()> {
    if cli.output.is_some() {
        bail!("--output cannot be used with a directory; use --write");
    }
    let mut scripts: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory {}", dir.display()))?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "gradle").unwrap_or(false))
        .collect();
    scripts.sort();
    debug!(dir = %dir.display(), count = scripts.len(), "processing directory");

    let mut failed = 0;
    for script in &scripts {
        if let Err(e) = process_file(cli, script) {
            warn!(path = %script.display(), "conversion failed");
            eprintln!("Error: {:#}", e);
            failed += 1;
        }
    }
    if failed > 0 {
        bail!("{} of {} scripts failed", failed, scripts.len());
    }
    Ok(())
}

fn process_file(cli: &Cli, path: &Path) -> Result<()> {
    let doc = parse_file_with(path, &cli.parse_options())?;
    if cli.check {
        println!("{}: ok", path.display());
        return Ok(());
    }
    output_document(cli, &doc, Some(path))
}

fn output_document(cli: &Cli, doc: &Document, input: Option<&Path>) -> Result<()> {
    let mut bytes = transcode::encode(doc, cli.to).map_err(anyhow::Error::msg)?;
    if !cli.to.is_binary() && !bytes.ends_with(b"\n") {
        bytes.push(b'\n');
    }

    let target = match (&cli.output, cli.write, input) {
        (Some(path), _, _) => Some(path.clone()),
        (None, true, Some(input)) => Some(input.with_extension(cli.to.extension())),
        (None, true, None) => bail!("--write requires an input file"),
        (None, false, _) => None,
    };

    match target {
        Some(path) => {
            fs::write(&path, &bytes).with_context(|| format!("Cannot write {}", path.display()))?;
            debug!(path = %path.display(), bytes = bytes.len(), "wrote output");
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&bytes)
                .context("Cannot write to standard output")?;
        }
    }
    Ok(())
}
