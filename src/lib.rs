//! dupefind - duplicate file finder by progressive narrowing
//!
//! Files under a root are grouped by size, then by a bounded prefix, then by a
//! whole-file digest. Each stage only reads files that still share a bucket
//! with at least one other file, so most of the tree is never opened.
//!
//! ```no_run
//! use dupefind::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (groups, _summary) = finder.find_duplicates(Path::new("/data")).unwrap();
//! for group in groups {
//!     println!("{} bytes: {:?}", group.savings(), group.paths);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod signal;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::Settings;
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::progress::{Progress, ProgressCallback};
use crate::report::{ProfileReport, Reporter};
use crate::signal::CancelToken;

/// Run one scan and write the report to `out`.
///
/// Per-file errors are logged and counted but never change the result.
///
/// # Errors
///
/// Returns an error for invalid configuration, an unusable root, a
/// cancelled scan, or a failed write to `out` or the profile file.
pub fn run<W: Write>(cli: &Cli, cancel: CancelToken, out: &mut W) -> anyhow::Result<ExitCode> {
    let settings = Settings::load(cli.config.as_deref())?
        .with_cli_overrides(cli)
        .validate()?;
    log::debug!("Effective settings: {:?}", settings);

    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(cli.quiet));
    let config = settings
        .finder_config()
        .with_cancel_token(cancel)
        .with_progress_callback(progress);

    let finder = DuplicateFinder::new(config);
    let (groups, summary) = finder.find_duplicates(&cli.dir)?;

    if !summary.errors.is_empty() {
        log::warn!(
            "{} entries could not be read and were skipped",
            summary.errors.len()
        );
    }

    let mut reporter = Reporter::new(out);
    reporter.write_root(&cli.dir)?;
    reporter.write_groups(&groups)?;
    reporter.finish().context("Failed to write report")?;

    if let Some(ref path) = cli.cpuprofile {
        ProfileReport::new(&cli.dir, &summary, settings.paranoid)
            .write_to(path)
            .with_context(|| format!("Failed to write profile to {}", path.display()))?;
        log::info!("Stage profile written to {}", path.display());
    }

    Ok(ExitCode::Success)
}
