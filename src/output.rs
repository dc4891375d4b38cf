use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub const OTHER_MAIL_FILE: &str = "other_mail.txt";

// Per-domain buckets key emails by their lowercased form and keep the
// first-seen original spelling, so case variants collapse to one entry while
// output preserves what the input actually contained. BTreeMap iteration
// gives the lexicographic output order for free.
type EmailBucket = BTreeMap<String, String>;

/// Classification result: matched emails grouped by (country, domain), plus
/// the residual "other" bucket and a malformed-line counter.
#[derive(Debug, Default)]
pub struct Buckets {
    matched: IndexMap<String, BTreeMap<String, EmailBucket>>,
    other: EmailBucket,
    skipped: u64,
}

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_matched(&mut self, country: &str, domain: &str, email: &str) {
        self.matched
            .entry(country.to_owned())
            .or_default()
            .entry(domain.to_owned())
            .or_default()
            .entry(email.to_lowercase())
            .or_insert_with(|| email.to_owned());
    }

    pub fn add_other(&mut self, email: &str) {
        self.other
            .entry(email.to_lowercase())
            .or_insert_with(|| email.to_owned());
    }

    pub fn mark_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn matched_count(&self) -> u64 {
        self.matched
            .values()
            .flat_map(|domains| domains.values())
            .map(|emails| emails.len() as u64)
            .sum()
    }

    pub fn other_count(&self) -> u64 {
        self.other.len() as u64
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped
    }

    pub fn country_count(&self) -> usize {
        self.matched.len()
    }

    /// Emails bucketed under (country, domain), in output order.
    pub fn emails_for(&self, country: &str, domain: &str) -> Vec<&str> {
        self.matched
            .get(country)
            .and_then(|domains| domains.get(domain))
            .map(|emails| emails.values().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct WriteSummary {
    pub files_written: u32,
    pub emails_written: u64,
    pub failed_files: u32,
}

fn write_email_file(path: &Path, emails: &EmailBucket, summary: &mut WriteSummary) {
    let body = emails.values().cloned().collect::<Vec<_>>().join("\n");
    match fs::write(path, body) {
        Ok(()) => {
            info!(file = ?path, email_count = emails.len(), "Wrote email file");
            summary.files_written += 1;
            summary.emails_written += emails.len() as u64;
        }
        Err(e) => {
            error!(file = ?path, error = %e, "Failed to write email file");
            summary.failed_files += 1;
        }
    }
}

/// Write one `<domain>.txt` per matched (country, domain) under a country
/// subdirectory, plus a root-level `other_mail.txt` when the residual bucket
/// is non-empty. Emails are sorted, deduplicated, newline-joined with no
/// trailing newline. Individual write failures are reported and counted;
/// the remaining files are still written.
pub fn write_buckets(output_dir: &Path, buckets: &Buckets) -> Result<WriteSummary> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    let mut summary = WriteSummary::default();

    for (country, domains) in &buckets.matched {
        let country_dir = output_dir.join(country);
        if let Err(e) = fs::create_dir_all(&country_dir) {
            error!(country = %country, error = %e, "Failed to create country directory, skipping its files");
            summary.failed_files += domains.len() as u32;
            continue;
        }

        for (domain, emails) in domains {
            let file_path = country_dir.join(format!("{domain}.txt"));
            write_email_file(&file_path, emails, &mut summary);
        }
    }

    if !buckets.other.is_empty() {
        let file_path = output_dir.join(OTHER_MAIL_FILE);
        write_email_file(&file_path, &buckets.other, &mut summary);
    }

    Ok(summary)
}
