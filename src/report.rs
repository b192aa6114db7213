//! Report output.
//!
//! [`Reporter`] writes the plain-text report to stdout:
//!
//! ```text
//! /data
//! Potential savings of 10 bytes in duplicated files:
//!     /data/a.txt
//!     /data/b.txt
//!     /data/c.txt
//! ```
//!
//! [`ProfileReport`] is the JSON document written for `--cpuprofile`:
//!
//! ```json
//! {
//!   "root": "/data",
//!   "total_ms": 812,
//!   "stages": [
//!     { "stage": "walk", "duration_ms": 120, "input_files": 5210, "output_files": 1200 },
//!     { "stage": "prefix", "duration_ms": 300, "input_files": 1200, "output_files": 412 }
//!   ],
//!   "duplicate_groups": 37,
//!   "duplicate_files": 52,
//!   "reclaimable_space": 1048576,
//!   "errors": 1
//! }
//! ```

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::progress::Phase;

/// Plain-text report writer.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    /// Wrap an output stream.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// First line of the report: the root as given by the user.
    ///
    /// # Errors
    ///
    /// Returns any write error.
    pub fn write_root(&mut self, root: &Path) -> io::Result<()> {
        writeln!(self.out, "{}", root.display())
    }

    /// One savings line followed by a tab-indented line per member.
    ///
    /// # Errors
    ///
    /// Returns any write error.
    pub fn write_group(&mut self, group: &DuplicateGroup) -> io::Result<()> {
        writeln!(
            self.out,
            "Potential savings of {} bytes in duplicated files:",
            group.savings()
        )?;
        for path in &group.paths {
            writeln!(self.out, "\t{}", path.display())?;
        }
        Ok(())
    }

    /// Write every group in order. Singletons are skipped.
    ///
    /// # Errors
    ///
    /// Returns any write error.
    pub fn write_groups(&mut self, groups: &[DuplicateGroup]) -> io::Result<()> {
        for group in groups.iter().filter(|g| g.len() > 1) {
            self.write_group(group)?;
        }
        Ok(())
    }

    /// Flush and return the stream.
    ///
    /// # Errors
    ///
    /// Returns any flush error.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Timing and counts for one phase.
#[derive(Debug, Clone, Serialize)]
pub struct StageProfile {
    /// Phase name
    pub stage: &'static str,
    /// Wall-clock time in milliseconds
    pub duration_ms: u64,
    /// Files that entered the phase
    pub input_files: usize,
    /// Files that left the phase in groups of 2+
    pub output_files: usize,
}

/// `--cpuprofile` document.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    /// Root as given
    pub root: String,
    /// Whole scan in milliseconds
    pub total_ms: u64,
    /// Per-phase breakdown, in execution order
    pub stages: Vec<StageProfile>,
    /// Groups reported
    pub duplicate_groups: usize,
    /// Redundant copies reported
    pub duplicate_files: usize,
    /// Bytes reclaimable
    pub reclaimable_space: u64,
    /// Entries skipped because of errors
    pub errors: usize,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl ProfileReport {
    /// Build the profile from a finished scan.
    #[must_use]
    pub fn new(root: &Path, summary: &ScanSummary, paranoid: bool) -> Self {
        let t = &summary.timings;
        let size_survivors = summary.total_files.saturating_sub(summary.eliminated_by_size);
        let prefix_survivors = summary
            .partial_candidates
            .saturating_sub(summary.eliminated_by_prefix);
        let digest_survivors = summary
            .full_candidates
            .saturating_sub(summary.eliminated_by_digest);

        let mut stages = vec![
            StageProfile {
                stage: Phase::Walk.name(),
                duration_ms: millis(t.walk),
                input_files: summary.total_files,
                output_files: size_survivors,
            },
            StageProfile {
                stage: Phase::Partial.name(),
                duration_ms: millis(t.partial),
                input_files: summary.partial_candidates,
                output_files: prefix_survivors,
            },
            StageProfile {
                stage: Phase::Full.name(),
                duration_ms: millis(t.full),
                input_files: summary.full_candidates,
                output_files: digest_survivors,
            },
        ];
        if paranoid {
            stages.push(StageProfile {
                stage: Phase::Verify.name(),
                duration_ms: millis(t.verify),
                input_files: digest_survivors,
                output_files: digest_survivors.saturating_sub(summary.eliminated_by_verify),
            });
        }

        Self {
            root: root.display().to_string(),
            total_ms: millis(t.total),
            stages,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            errors: summary.errors.len(),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()
    }
}
