//! Progress reporting using indicatif.
//!
//! The pipeline reports through [`ProgressCallback`]; [`Progress`] renders
//! one spinner or bar per phase on stderr so stdout stays reserved for the
//! report.

use std::fmt;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Pipeline phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Directory traversal and size bucketing
    Walk,
    /// Stage one: prefix signatures
    Partial,
    /// Stage two: whole-file digests
    Full,
    /// Optional byte-by-byte confirmation
    Verify,
}

impl Phase {
    /// Short lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Partial => "prefix",
            Self::Full => "digest",
            Self::Verify => "verify",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress callback for the detection pipeline.
///
/// Methods are called concurrently from worker threads.
pub trait ProgressCallback: Send + Sync {
    /// A phase begins; `total` is 0 when the item count is unknown.
    fn on_phase_start(&self, phase: Phase, total: usize);

    /// One item of the current phase was processed.
    fn on_item(&self, path: &Path);

    /// The phase finished (including by cancellation).
    fn on_phase_end(&self, phase: Phase);
}

/// Terminal progress reporter.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    hidden: bool,
}

impl Progress {
    /// Create a reporter; `quiet` hides all output.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            hidden: quiet,
        }
    }

    fn make_bar(&self, phase: Phase, total: usize) -> ProgressBar {
        if self.hidden {
            return ProgressBar::hidden();
        }

        let bar = if total == 0 {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} {prefix:>7} {pos} files {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        } else {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::with_template("{prefix:>7} [{bar:30}] {pos}/{len} {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            bar
        };
        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.set_prefix(phase.name());
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: Phase, total: usize) {
        let bar = self.make_bar(phase, total);
        let previous = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(bar);
        if let Some(previous) = previous {
            previous.finish_and_clear();
        }
    }

    fn on_item(&self, path: &Path) {
        if let Some(bar) = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            bar.inc(1);
            bar.set_message(path.display().to_string());
        }
    }

    fn on_phase_end(&self, phase: Phase) {
        if let Some(bar) = self.bar.lock().unwrap_or_else(PoisonError::into_inner).take() {
            bar.finish_and_clear();
        }
        log::debug!("Phase {} finished", phase);
    }
}
