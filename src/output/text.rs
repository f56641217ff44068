//! Human-readable report.
//!
//! ```text
//! --- Duplicate Files (by Hash) in /data ---
//!
//! Duplicates for 4f4e99c2da696a47de3b455758bff316:
//!   - /data/file1.txt
//!   - /data/file3.txt
//!
//! Scanned 7 files (63 B) in 0.01s: 1 duplicate group, 1 duplicate file
//! ```
//!
//! Colour is applied with `yansi` and follows its global switch, so callers
//! disable it once with `yansi::disable()` for `--no-color`.

use std::io::{self, Write};
use std::path::Path;

use yansi::Paint;

use crate::duplicates::{DuplicateGroups, ScanMode, ScanSummary};

/// Text renderer over one scan's results.
pub struct TextOutput<'a> {
    mode: ScanMode,
    root: &'a Path,
    groups: &'a DuplicateGroups,
    summary: &'a ScanSummary,
}

impl<'a> TextOutput<'a> {
    /// Create a renderer for a completed scan.
    #[must_use]
    pub fn new(
        mode: ScanMode,
        root: &'a Path,
        groups: &'a DuplicateGroups,
        summary: &'a ScanSummary,
    ) -> Self {
        Self {
            mode,
            root,
            groups,
            summary,
        }
    }

    /// Write the full report.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let header = format!(
            "--- Duplicate Files (by {}) in {} ---",
            self.mode.label(),
            self.root.display()
        );
        writeln!(writer, "{}", header.bold())?;

        if self.groups.is_empty() {
            writeln!(writer, "No duplicate files found.")?;
        } else {
            for group in self.groups {
                writeln!(writer)?;
                writeln!(writer, "Duplicates for {}:", group.display_key().cyan())?;
                for path in &group.files {
                    writeln!(writer, "  - {}", path.display())?;
                }
            }
        }

        self.write_errors(writer)?;

        writeln!(writer)?;
        writeln!(writer, "{}", self.summary_line().dim())?;
        Ok(())
    }

    /// Render the report into a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn write_errors<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if !self.summary.has_errors() {
            return Ok(());
        }

        writeln!(writer)?;
        let title = format!(
            "Warning: {} {} could not be read and {} skipped:",
            self.summary.errors.len(),
            plural(self.summary.errors.len(), "entry", "entries"),
            plural(self.summary.errors.len(), "was", "were"),
        );
        writeln!(writer, "{}", title.yellow().bold())?;
        for error in &self.summary.errors {
            writeln!(writer, "  ! {}", error)?;
        }
        Ok(())
    }

    fn summary_line(&self) -> String {
        format!(
            "Scanned {} {} ({}) in {:.2}s: {} duplicate {}, {} duplicate {}",
            self.summary.total_files,
            plural(self.summary.total_files, "file", "files"),
            self.summary.total_size_display(),
            self.summary.scan_duration.as_secs_f64(),
            self.summary.duplicate_groups,
            plural(self.summary.duplicate_groups, "group", "groups"),
            self.summary.duplicate_files,
            plural(self.summary.duplicate_files, "file", "files"),
        )
    }
}

fn plural<'s>(count: usize, one: &'s str, many: &'s str) -> &'s str {
    if count == 1 {
        one
    } else {
        many
    }
}
