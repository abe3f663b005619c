//! `md2toon` CLI: convert Markdown system prompts to TOON from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Convert a prompt (stdin → stdout)
//! cat system.md | md2toon
//!
//! # Convert from file to file
//! md2toon system.md -o system.toon
//!
//! # Inspect the extracted structure instead of TOON
//! md2toon system.md --json
//!
//! # Report the size reduction on stderr
//! md2toon system.md --stats
//!
//! # Convert a whole pattern library (DIR/*.md and DIR/<name>/system.md)
//! md2toon --batch patterns/ --output-dir toon/
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use md2toon_core::{classify_with, encode, ClassifyOptions, CompressionStats};

#[derive(Parser)]
#[command(
    name = "md2toon",
    version,
    about = "Convert Markdown system prompts to TOON (Token-Oriented Object Notation)"
)]
struct Cli {
    /// Markdown file to convert (reads from stdin if omitted)
    #[arg(conflicts_with = "batch")]
    input: Option<PathBuf>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, conflicts_with = "batch")]
    output: Option<PathBuf>,

    /// Emit the extracted prompt structure as JSON instead of TOON
    #[arg(long)]
    json: bool,

    /// Print a size comparison between the Markdown and the TOON to stderr
    #[arg(long)]
    stats: bool,

    /// Also extract expertise areas and named output sections
    #[arg(long)]
    enrich: bool,

    /// Convert every prompt in a directory
    #[arg(long, value_name = "DIR")]
    batch: Option<PathBuf>,

    /// Where batch output goes (defaults to the batch directory)
    #[arg(long, value_name = "DIR", requires = "batch")]
    output_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> ClassifyOptions {
        if self.enrich {
            ClassifyOptions::enriched()
        } else {
            ClassifyOptions::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("md2toon: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(dir) = &cli.batch {
        let out_dir = cli.output_dir.as_deref().unwrap_or(dir);
        return run_batch(cli, dir, out_dir);
    }

    let markdown = read_input(cli.input.as_deref())?;
    let rendered = render(cli, &markdown)?;
    write_output(cli.output.as_deref(), &rendered)
}

/// Classify and render one document as TOON, or as JSON with `--json`.
fn render(cli: &Cli, markdown: &str) -> Result<String> {
    if markdown.is_empty() {
        bail!("empty input");
    }

    let prompt = classify_with(markdown, &cli.options());
    let toon = encode(&prompt);
    if cli.stats {
        eprintln!("{}", CompressionStats::measure(markdown, &toon));
    }

    if cli.json {
        serde_json::to_string_pretty(&prompt).context("Failed to serialize prompt as JSON")
    } else {
        Ok(toon)
    }
}

fn run_batch(cli: &Cli, dir: &Path, out_dir: &Path) -> Result<()> {
    let sources = batch_sources(dir)?;
    if sources.is_empty() {
        bail!("no prompts found in {}", dir.display());
    }
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create directory: {}", out_dir.display()))?;

    let extension = if cli.json { "json" } else { "toon" };
    let mut failed = 0;
    for (name, source) in &sources {
        let target = out_dir.join(format!("{name}.{extension}"));
        let result = read_input(Some(source.as_path()))
            .and_then(|markdown| render(cli, &markdown))
            .and_then(|rendered| write_output(Some(target.as_path()), &rendered));

        match result {
            Ok(()) => debug!(source = %source.display(), target = %target.display(), "converted"),
            Err(e) => {
                eprintln!("md2toon: {}: {e:#}", source.display());
                failed += 1;
            }
        }
    }

    info!(total = sources.len(), failed, "batch finished");
    if failed > 0 {
        bail!("{failed} of {} prompts failed", sources.len());
    }
    Ok(())
}

/// `DIR/<name>.md` files and `DIR/<name>/system.md` pattern directories,
/// sorted by name.
fn batch_sources(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut sources = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
            .path();

        let (name, source) = if path.is_dir() {
            let system = path.join("system.md");
            if !system.is_file() {
                continue;
            }
            (path.file_name(), system)
        } else if path.extension().is_some_and(|ext| ext == "md") {
            (path.file_stem(), path.clone())
        } else {
            continue;
        };

        if let Some(name) = name.and_then(|n| n.to_str()) {
            sources.push((name.to_string(), source));
        }
    }

    sources.sort();
    Ok(sources)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

/// Files get a trailing newline; stdout gets one from `println!`.
fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, format!("{content}\n"))
            .with_context(|| format!("Failed to write file: {}", path.display()))?,
        None => println!("{content}"),
    }
    Ok(())
}
