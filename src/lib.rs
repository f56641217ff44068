//! dupescan - Duplicate File Finder
//!
//! Walks a directory tree and reports files that share identical content
//! (by digest) or an identical base filename. Nothing is ever modified.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//!
//! let finder = DuplicateFinder::open("/some/path")?;
//! let (groups, _summary) = finder.find_duplicates_by_content()?;
//! for group in &groups {
//!     println!("{} -> {:?}", group.display_key(), group.files);
//! }
//! # Ok::<(), dupescan::duplicates::FinderError>(())
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderError, ScanRoot};
use crate::error::{ExitCode, StructuredError};
use crate::output::{JsonOutput, TextOutput};
use crate::progress::Progress;

/// Run the application, writing the report to stdout.
///
/// # Errors
///
/// Returns an error for failures that prevent a report: an unreadable
/// `--config` file, a strict-mode abort, or a failed write.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

/// Run the application, writing the report to `out`.
///
/// An invalid scan root is reported on stderr, as JSON under
/// `--output json`, and mapped to [`ExitCode::InvalidRoot`] without scanning.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_with_output<W: Write>(cli: Cli, out: &mut W) -> Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }

    let root = match ScanRoot::new(&cli.directory) {
        Ok(root) => root,
        Err(e) if e.is_invalid_root() => {
            log::debug!("Rejected scan root: {:?}", e);
            report_invalid_root(&e, cli.output, &mut std::io::stderr().lock())
                .context("Failed to write error report")?;
            return Ok(ExitCode::InvalidRoot);
        }
        Err(e) => return Err(e.into()),
    };

    let config = Config::resolve(&cli)?;
    let mode = config.scan_mode(&cli);
    let mut finder_config = config.finder_config(&cli);

    if cli.output == OutputFormat::Text && !cli.quiet {
        finder_config = finder_config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    log::debug!("Finder configuration: {:?}", finder_config);

    let finder = DuplicateFinder::new(root, finder_config);
    let (groups, summary) = finder
        .find_duplicates(mode)
        .with_context(|| format!("Scan of {} aborted", cli.directory.display()))?;

    match cli.output {
        OutputFormat::Text => {
            TextOutput::new(mode, finder.root(), &groups, &summary)
                .write_to(out)
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(mode, finder.root(), &groups, &summary)
                .write_to(out, true)
                .context("Failed to write JSON report")?;
        }
    }

    if summary.has_errors() {
        log::warn!(
            "{} entries could not be read and were skipped",
            summary.errors.len()
        );
        Ok(ExitCode::PartialSuccess)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Describe a rejected scan root in the requested output format.
fn report_invalid_root<W: Write>(
    err: &FinderError,
    format: OutputFormat,
    writer: &mut W,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(writer, "Error: {}", err),
        OutputFormat::Json => {
            let structured = StructuredError::from_message(err.to_string(), ExitCode::InvalidRoot);
            let json = serde_json::to_string_pretty(&structured)?;
            writeln!(writer, "{}", json)
        }
    }
}
