use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::error;

use mailsift::pipeline::{self, RunOptions};
use mailsift::utils;
use mailsift::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);

    let input = match args.input {
        Some(path) => path,
        None => prompt_for_input_path()?,
    };

    let mut opts = RunOptions::new(input);
    if let Some(config_path) = args.config {
        opts.config_path = config_path;
    }

    match pipeline::run(&opts) {
        Ok(summary) => {
            pipeline::print_run_summary(&summary, &opts);
            Ok(())
        }
        Err(e) => {
            error!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn prompt_for_input_path() -> Result<PathBuf> {
    print!("Enter email list file path: ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read input path from stdin")?;

    let trimmed = line.trim();
    if trimmed.is_empty() {
        anyhow::bail!("No input file path provided");
    }
    Ok(PathBuf::from(trimmed))
}
