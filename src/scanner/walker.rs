//! Concurrent directory walker built on jwalk.
//!
//! # Overview
//!
//! [`Walker`] reads directories on a bounded rayon pool. Every directory is
//! an independent task: the worker that lists it also stats its regular
//! files and hands the resulting [`FileRecord`]s to a caller-supplied sink.
//! Only subdirectories are passed back to jwalk for further descent, so the
//! consuming iterator merely drives the walk and collects errors.
//!
//! Filtering happens here, at discovery time:
//!
//! - symlinks are never followed and never reported
//! - zero-length files are dropped
//! - an entry that cannot be stat'ed is dropped and recorded as a
//!   [`ScanError`]; the rest of the walk continues
//!
//! [`Walker::walk`] returns only after every directory task has finished,
//! which is the barrier the size bucketer relies on.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use jwalk::{Parallelism, WalkDir};

use super::{FileRecord, ScanError, WalkerConfig};
use crate::progress::{Phase, ProgressCallback};
use crate::signal::CancelToken;

/// Outcome of a completed walk.
#[derive(Debug, Default)]
pub struct WalkReport {
    /// Regular non-empty files handed to the sink
    pub files_found: usize,
    /// Total size of those files
    pub bytes_found: u64,
    /// Symlinks skipped
    pub skipped_symlinks: usize,
    /// Zero-length files skipped
    pub skipped_empty: usize,
    /// Entries that could not be read
    pub errors: Vec<ScanError>,
    /// Whether the walk stopped early because of cancellation
    pub interrupted: bool,
}

/// Counters shared between directory tasks.
#[derive(Default)]
struct WalkCounters {
    files: AtomicUsize,
    bytes: AtomicU64,
    symlinks: AtomicUsize,
    empty: AtomicUsize,
    errors: Mutex<Vec<ScanError>>,
}

impl WalkCounters {
    fn push_error(&self, error: ScanError) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }
}

/// Directory walker for parallel file discovery.
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
    cancel: Option<CancelToken>,
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("cancel", &self.cancel)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl Walker {
    /// Create a new walker rooted at `path`.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            cancel: None,
            progress: None,
        }
    }

    /// Stop descending as soon as `token` is cancelled.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Report each discovered file to `callback`.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(callback);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Walk the tree, handing every regular non-empty file to `sink`.
    ///
    /// `sink` is called concurrently from the directory reader threads. It
    /// should do as little as possible while holding any lock.
    ///
    /// Errors on individual entries are collected into the returned
    /// [`WalkReport`]; they never stop the walk.
    pub fn walk<F>(&self, sink: F) -> WalkReport
    where
        F: Fn(FileRecord) + Send + Sync + 'static,
    {
        let counters = Arc::new(WalkCounters::default());
        let task_counters = Arc::clone(&counters);
        let cancel = self.cancel.clone();
        let progress = self.progress.clone();

        if let Some(ref callback) = self.progress {
            callback.on_phase_start(Phase::Walk, 0);
        }

        let walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .skip_hidden(self.config.skip_hidden)
            .sort(false)
            .parallelism(Parallelism::RayonNewPool(self.config.threads.max(1)))
            .process_read_dir(move |_depth, dir, _state, children| {
                if cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                    children.clear();
                    return;
                }

                // Files are consumed here; only directories and errors go
                // back to jwalk.
                children.retain(|child| {
                    let Ok(entry) = child else {
                        return true;
                    };
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        return true;
                    }
                    if file_type.is_symlink() {
                        task_counters.symlinks.fetch_add(1, Ordering::Relaxed);
                        log::trace!("Skipping symlink: {}", entry.path().display());
                        return false;
                    }
                    if !file_type.is_file() {
                        return false;
                    }

                    let path = entry.path();
                    match std::fs::symlink_metadata(&path) {
                        Ok(metadata) if !metadata.is_file() => {}
                        Ok(metadata) if metadata.len() == 0 => {
                            task_counters.empty.fetch_add(1, Ordering::Relaxed);
                            log::trace!("Skipping empty file: {}", path.display());
                        }
                        Ok(metadata) => {
                            let size = metadata.len();
                            task_counters.files.fetch_add(1, Ordering::Relaxed);
                            task_counters.bytes.fetch_add(size, Ordering::Relaxed);
                            if let Some(ref callback) = progress {
                                callback.on_item(&path);
                            }
                            sink(FileRecord::new(path, size));
                        }
                        Err(e) => {
                            log::warn!("Cannot stat {} in {}: {}", path.display(), dir.display(), e);
                            task_counters.push_error(ScanError::from_io(&path, e));
                        }
                    }
                    false
                });
            });

        let mut interrupted = false;
        for entry in walk_dir {
            if self.is_cancelled() {
                log::debug!("Walker: cancellation requested, stopping iteration");
                interrupted = true;
                break;
            }
            if let Err(e) = entry {
                let path = e
                    .path()
                    .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                log::warn!("Cannot read {}: {}", path.display(), e);
                counters.push_error(ScanError::Io {
                    path,
                    source: std::io::Error::other(e.to_string()),
                });
            }
        }

        let errors = std::mem::take(
            &mut *counters
                .errors
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );

        let report = WalkReport {
            files_found: counters.files.load(Ordering::Relaxed),
            bytes_found: counters.bytes.load(Ordering::Relaxed),
            skipped_symlinks: counters.symlinks.load(Ordering::Relaxed),
            skipped_empty: counters.empty.load(Ordering::Relaxed),
            errors,
            interrupted: interrupted || self.is_cancelled(),
        };

        if let Some(ref callback) = self.progress {
            callback.on_phase_end(Phase::Walk);
        }

        report
    }
}
