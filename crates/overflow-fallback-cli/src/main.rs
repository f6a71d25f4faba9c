//! overflow-fallback - Main Entry Point

mod args;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use overflow_fallback::{parse_stylesheet, FallbackOptions, OverflowFallbacks};
use tracing_subscriber::EnvFilter;

use crate::args::{CliArgs, Command};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    match args::parse(std::env::args().skip(1))? {
        Command::Help => println!("{}", args::usage()),
        Command::Version => println!("overflow-fallback {}", env!("CARGO_PKG_VERSION")),
        Command::Run(cli) => run(&cli)?,
    }

    Ok(())
}

fn run(cli: &CliArgs) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Some(read_config(path)?),
        None => None,
    };
    let options = FallbackOptions::from_json_value(cli.options_value(config)?)
        .context("invalid overflow-fallback options")?;
    tracing::debug!(?options, "options loaded");

    let css = read_input(cli.input.as_deref())?;
    let mut stylesheet = parse_stylesheet(&css).context("failed to parse stylesheet")?;
    let stats = OverflowFallbacks::new(options).transform(&mut stylesheet);
    tracing::info!(
        rules = stats.rules,
        visited = stats.visited,
        inserted = stats.inserted,
        "transform complete"
    );

    write_output(cli.output.as_deref(), &stylesheet.to_css())
}

fn read_config(path: &Path) -> Result<serde_json::Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("config {} is not valid JSON", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut css = String::new();
            io::stdin().read_to_string(&mut css).context("failed to read stdin")?;
            Ok(css)
        }
    }
}

fn write_output(path: Option<&Path>, css: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, css).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(css.as_bytes()).context("failed to write stdout")?;
            stdout.flush().context("failed to write stdout")
        }
    }
}
