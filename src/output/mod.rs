//! Output formatters for duplicate scan results.
//!
//! - [`text`] renders the human-readable report
//! - [`json`] renders a machine-readable document for scripting
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{DuplicateFinder, ScanMode};
//! use dupescan::output::TextOutput;
//!
//! let finder = DuplicateFinder::open(".").unwrap();
//! let (groups, summary) = finder.find_duplicates(ScanMode::Content).unwrap();
//!
//! let report = TextOutput::new(ScanMode::Content, finder.root(), &groups, &summary);
//! report.write_to(&mut std::io::stdout()).unwrap();
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;
