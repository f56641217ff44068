//! Command-line interface definitions for dupescan.
//!
//! This module defines all CLI arguments using the clap derive API.
//! Options that can also come from the config file are optional here, so
//! an omitted flag falls back to the file and then to the built-in default.
//!
//! # Example
//!
//! ```bash
//! # Find files with identical content (default)
//! dupescan ~/Downloads
//!
//! # Find files sharing a filename
//! dupescan ~/Downloads --method name
//!
//! # JSON output, hashing on 4 threads with BLAKE3
//! dupescan ~/Downloads --output json --io-threads 4 --algorithm blake3
//!
//! # Verbose mode for debugging
//! dupescan -v ~/Downloads
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::duplicates::ScanMode;
use crate::scanner::HashAlgorithm;

/// Find duplicate files in a directory.
///
/// Files are grouped by identical content (default) or by identical
/// filename. Nothing is ever modified or deleted.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the directory to scan
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Duplicate detection method: content hash (default) or file name
    #[arg(short, long, value_enum, value_name = "METHOD")]
    pub method: Option<ScanMode>,

    /// Digest used by the hash method (default: md5)
    #[arg(short, long, value_enum, value_name = "ALGORITHM")]
    pub algorithm: Option<HashAlgorithm>,

    /// Number of threads used for hashing (default: 1)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub io_threads: Option<u16>,

    /// Follow symbolic links during scan
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Glob patterns to ignore (can be specified multiple times)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Maximum directory depth below DIRECTORY (0 = only its own files)
    #[arg(long, value_name = "DEPTH")]
    pub max_depth: Option<usize>,

    /// Abort on the first unreadable file or directory
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Path to a JSON config file
    ///
    /// If not specified, a default platform-specific path is used when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Ignore any config file and use built-in defaults
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
