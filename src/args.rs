use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mailsift",
    about = "Classify email address lists by domain country and write grouped output files",
    version,
    long_about = None
)]
pub struct Args {
    /// Path to the email list file (prompted for interactively when omitted)
    pub input: Option<PathBuf>,

    /// Path to a custom domain config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
