//! Translate preference specifications into plain logic programs:
//! read the named files (or standard input) and print the result.

use std::fs::read_to_string;
use std::io::{stdin, Read};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context as _, Result};
use atty::Stream;
use clap::Parser;

use prefer_tracer::Trace;
use prefer_translate::{Config, Translator};

#[derive(Parser)]
#[command(name = "prefer")]
#[command(about = "Translate #preference and #optimize statements into logic programs.")]
#[command(version)]
struct Cli {
    /// Input files, translated as one program; `-` names stdin, as does no file at all
    files: Vec<PathBuf>,
    /// Number of underscores prefixing internal predicate names
    #[arg(short = 'u', long, default_value_t = 1)]
    underscores: usize,
    /// Trace to stderr: a comma-separated list of scan, parse, reify, emit, or all
    #[arg(long, value_name = "CATEGORIES", num_args = 0..=1, default_missing_value = "all")]
    trace: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let trace = match cli.trace.as_deref() {
        Some(names) => parse_trace(names)?,
        None => Trace::none(),
    };
    let translator = Translator::new(Config {
        underscores: cli.underscores,
    })
    .with_trace(trace);

    let output = if cli.files.is_empty() {
        translator.translate_str(&read_file(Path::new("-"))?)?
    } else {
        let sources = cli
            .files
            .iter()
            .map(|file| -> Result<(String, String)> { Ok((source_name(file), read_file(file)?)) })
            .collect::<Result<Vec<_>>>()?;
        translator.translate_sources(sources)?
    };
    print!("{output}");
    Ok(())
}

fn parse_trace(names: &str) -> Result<Trace> {
    names.split(',').try_fold(Trace::none(), |trace, name| {
        Trace::from_name(name.trim())
            .map(|t| trace | t)
            .ok_or_else(|| anyhow!("unknown trace category `{name}`"))
    })
}

fn source_name(file: &Path) -> String {
    if file.as_os_str() == "-" {
        String::from("<stdin>")
    } else {
        file.display().to_string()
    }
}

/// Read a file or standard input and return the content as a string.
fn read_file(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        if atty::is(Stream::Stdin) {
            eprintln!("Reading preference specification from stdin, terminate with Ctrl-D.");
        }
        let mut buffer = String::new();
        stdin()
            .read_to_string(&mut buffer)
            .context("Reading from stdin")?;
        Ok(buffer)
    } else {
        read_to_string(file).with_context(|| format!("Reading {}", file.display()))
    }
}
