use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::classify::{self, Classifier};
use crate::config::{self, DomainConfig};
use crate::output::{self, Buckets, WriteSummary};
use crate::reader;
use crate::utils::format_number;

pub const DEFAULT_OUTPUT_DIR: &str = "result";

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
}

impl RunOptions {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            config_path: PathBuf::from(config::DEFAULT_CONFIG_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub encoding: &'static str,
    pub total_lines: usize,
    pub matched_emails: u64,
    pub other_emails: u64,
    pub skipped_lines: u64,
    pub country_count: usize,
    pub write: WriteSummary,
    pub elapsed: Duration,
}

pub fn run(opts: &RunOptions) -> Result<RunSummary> {
    let start_time = Instant::now();
    info!(input = ?opts.input, "Starting email classification");

    // Persisting the default config is a startup side effect; a failure here
    // is reported but does not stop the run.
    if let Err(e) = config::ensure_config_file(&opts.config_path) {
        warn!(error = %e, "Could not persist default domain config");
    }

    let config = config::load(&opts.config_path, DomainConfig::embedded_default()?)?;
    let decoded = reader::read_email_lines(&opts.input)?;

    let classifier = Classifier::new(&config);
    let mut buckets = Buckets::new();

    let progress = ProgressBar::new(decoded.lines.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    progress.set_message("Classifying emails");

    for email in &decoded.lines {
        match classify::split_domain(email) {
            Some(domain) => match classifier.country_for(&domain) {
                Some(country) => buckets.add_matched(country, &domain, email),
                None => buckets.add_other(email),
            },
            None => {
                warn!(email = %email, "Skipping email with empty domain");
                buckets.mark_skipped();
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let write = output::write_buckets(&opts.output_dir, &buckets)?;

    let summary = RunSummary {
        encoding: decoded.encoding,
        total_lines: decoded.lines.len(),
        matched_emails: buckets.matched_count(),
        other_emails: buckets.other_count(),
        skipped_lines: buckets.skipped_count(),
        country_count: buckets.country_count(),
        write,
        elapsed: start_time.elapsed(),
    };

    info!(
        matched = summary.matched_emails,
        other = summary.other_emails,
        skipped = summary.skipped_lines,
        duration_ms = summary.elapsed.as_millis(),
        "Email classification completed"
    );
    Ok(summary)
}

pub fn print_run_summary(summary: &RunSummary, opts: &RunOptions) {
    println!("\n--- Email Classification Summary ---");
    println!("Input decoded as: {}", summary.encoding);
    println!(
        "Email lines read: {}",
        format_number(summary.total_lines as u64)
    );
    println!(
        "Matched emails: {} across {} countries",
        format_number(summary.matched_emails),
        summary.country_count
    );
    println!(
        "Unmatched emails: {}",
        format_number(summary.other_emails)
    );

    if summary.skipped_lines > 0 {
        println!(
            "Skipped malformed lines: {}",
            format_number(summary.skipped_lines)
        );
    }

    println!(
        "Files written: {} ({} emails) under {}",
        summary.write.files_written,
        format_number(summary.write.emails_written),
        opts.output_dir.display()
    );

    if summary.write.failed_files > 0 {
        println!("Failed writes: {}", summary.write.failed_files);
    }

    println!("Completed in {:.2}s", summary.elapsed.as_secs_f64());
}
