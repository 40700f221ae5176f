//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mkcpio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Archive file to create (truncated if it exists)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Regular files to add, in order; only the final path component is kept
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// Copy buffer size (512 to 16M, suffixes K and M)
    #[arg(long, value_name = "BYTES", value_parser = parse_byte_size)]
    pub buffer_size: Option<usize>,

    /// Skip inputs that are symbolic links instead of archiving their target
    #[arg(long)]
    pub no_follow_symlinks: bool,
}

/// Parse byte size with optional suffix (K, M)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024 * 1024)
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<usize>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}
