//! Command-line interface for shimmyformula
//!
//! Usage:
//!   shimmyformula [--set NAME=VALUE]... [--alias NAME]... [--raw] [FORMULA]
//!
//! Without FORMULA the formula is read from stdin.

use anyhow::{anyhow, Context};
use clap::Parser;
use shimmyformula::Renderer;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shimmyformula", version, about = "Render a formula against variable bindings")]
struct Cli {
    /// Formula to render; read from stdin when omitted
    formula: Option<String>,

    /// Bind a variable, e.g. `--set name=Stan`
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Activate an alias
    #[arg(short, long = "alias", value_name = "NAME")]
    alias: Vec<String>,

    /// Keep whitespace exactly as rendered
    #[arg(long)]
    raw: bool,

    /// Log scanning and block decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let mut renderer = Renderer::new();

    for binding in &cli.set {
        let (name, value) = split_binding(binding)?;
        renderer
            .assign(name, value)
            .with_context(|| format!("invalid binding {binding:?}"))?;
    }
    for alias in &cli.alias {
        renderer
            .activate(alias.as_str(), true)
            .with_context(|| format!("invalid alias {alias:?}"))?;
    }

    let formula = match cli.formula {
        Some(formula) => formula,
        None => read_stdin()?,
    };

    Ok(renderer.execute(&formula, !cli.raw, true))
}

fn split_binding(binding: &str) -> anyhow::Result<(&str, &str)> {
    binding
        .split_once('=')
        .ok_or_else(|| anyhow!("binding {binding:?} is not of the form NAME=VALUE"))
}

fn read_stdin() -> anyhow::Result<String> {
    let mut formula = String::new();
    std::io::stdin()
        .read_to_string(&mut formula)
        .context("failed to read formula from stdin")?;
    Ok(strip_line_ending(&formula).to_string())
}

/// Drop one trailing `\n` or `\r\n` left by shells and editors.
fn strip_line_ending(formula: &str) -> &str {
    match formula.strip_suffix('\n') {
        Some(line) => line.strip_suffix('\r').unwrap_or(line),
        None => formula,
    }
}
