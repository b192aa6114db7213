//! Duplicate finder implementation with progressive narrowing.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Walk + size bucketing**: the walker feeds a shared size bucket map
//! 2. **Stage one**: same-size files are re-grouped by a bounded prefix
//! 3. **Stage two**: prefix matches are re-grouped by a whole-file digest
//! 4. **Verify** (optional): digest matches are split by byte comparison
//!
//! Every stage runs on one bounded rayon pool and only sees members of
//! buckets with two or more paths from the stage before. A stage starts only
//! after the previous one has drained completely; a file that fails to read
//! is dropped from its stage and recorded, and never affects other files.
//!
//! # Example
//!
//! ```no_run
//! use dupefind::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(4));
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! for group in &groups {
//!     println!("{} bytes reclaimable in {} files", group.savings(), group.len());
//! }
//! println!("Total: {} bytes", summary.reclaimable_space);
//! ```

use std::hash::Hash;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use rayon::prelude::*;
use rayon::ThreadPool;

use super::{sort_groups, BucketWriter, Buckets, DuplicateGroup, GroupingStats};
use crate::progress::{Phase, ProgressCallback};
use crate::scanner::{
    default_io_threads, FileRecord, HashAlgorithm, HashError, Hasher, PrefixMode, ScanError,
    Signature, Walker, WalkerConfig, DEFAULT_PREFIX_LEN,
};
use crate::signal::CancelToken;

/// Stage-one key: size plus prefix signature.
pub type PartialKey = (u64, Signature);

/// Stage-two key: size plus whole-file digest.
pub type FullKey = (u64, Signature);

/// Shared execution context for the comparison stages.
///
/// Owns the worker pool that bounds how many files are open at once.
pub struct StageContext {
    pool: ThreadPool,
    cancel: Option<CancelToken>,
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for StageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageContext")
            .field("threads", &self.pool.current_num_threads())
            .field("cancel", &self.cancel)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl StageContext {
    /// Build a context with `io_threads` workers (minimum 1).
    ///
    /// # Errors
    ///
    /// Fails if the thread pool cannot be created.
    pub fn new(io_threads: usize) -> Result<Self, FinderError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(io_threads.max(1))
            .thread_name(|i| format!("dupefind-io-{i}"))
            .build()?;
        Ok(Self {
            pool,
            cancel: None,
            progress: None,
        })
    }

    /// Stop issuing work once `token` is cancelled.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Report stage progress to `callback`.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(callback);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

/// Statistics from one comparison stage.
#[derive(Debug, Default)]
pub struct StageStats {
    /// Files that entered the stage
    pub input_files: usize,
    /// Files whose signature was computed
    pub signed_files: usize,
    /// Files dropped because they could not be read
    pub failed_files: usize,
    /// Read errors, one per failed file
    pub errors: Vec<HashError>,
    /// Files left in groups of 2+
    pub potential_duplicates: usize,
    /// Groups of 2+ after the stage
    pub duplicate_groups: usize,
    /// Whether the stage was cut short by cancellation
    pub interrupted: bool,
}

impl StageStats {
    /// Files that entered but did not survive the stage.
    #[must_use]
    pub fn eliminated(&self) -> usize {
        self.input_files.saturating_sub(self.potential_duplicates)
    }

    /// Percentage of input files eliminated.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.input_files == 0 {
            0.0
        } else {
            (self.eliminated() as f64 / self.input_files as f64) * 100.0
        }
    }
}

/// Re-key every candidate of `input` with `sign`, in parallel.
///
/// Returns once every candidate has been signed, skipped or has failed.
fn run_stage<KIn, KOut, F>(
    input: &Buckets<KIn>,
    ctx: &StageContext,
    phase: Phase,
    sign: F,
) -> (Buckets<KOut>, StageStats)
where
    KIn: Eq + Hash + Sync,
    KOut: Eq + Hash + Send,
    F: Fn(&KIn, &Path) -> Result<KOut, HashError> + Sync,
{
    let candidates: Vec<(&KIn, &Path)> = input.candidates().collect();
    let mut stats = StageStats {
        input_files: candidates.len(),
        ..Default::default()
    };

    if candidates.is_empty() {
        log::debug!("Stage {}: no candidates", phase);
        return (Buckets::default(), stats);
    }

    if let Some(ref callback) = ctx.progress {
        callback.on_phase_start(phase, candidates.len());
    }
    log::info!("Stage {}: signing {} files", phase, candidates.len());

    let writer = BucketWriter::new();
    let errors: Vec<HashError> = ctx.pool.install(|| {
        candidates
            .par_iter()
            .filter_map(|&(key, path)| {
                if ctx.is_cancelled() {
                    return None;
                }

                let result = sign(key, path);
                if let Some(ref callback) = ctx.progress {
                    callback.on_item(path);
                }

                match result {
                    Ok(new_key) => {
                        writer.insert(new_key, path.to_path_buf());
                        None
                    }
                    Err(e) if e.is_cancelled() => None,
                    Err(e) => {
                        log::warn!("Skipping {}: {}", path.display(), e);
                        Some(e)
                    }
                }
            })
            .collect()
    });

    let buckets = writer.finish();
    stats.signed_files = buckets.path_count();
    stats.failed_files = errors.len();
    stats.errors = errors;
    stats.potential_duplicates = buckets.candidate_count();
    stats.duplicate_groups = buckets.multi_member().count();
    stats.interrupted = ctx.is_cancelled();

    if let Some(ref callback) = ctx.progress {
        callback.on_phase_end(phase);
    }

    log::info!(
        "Stage {} complete: {} files → {} potential duplicates ({:.1}% eliminated, {} unreadable)",
        phase,
        stats.input_files,
        stats.potential_duplicates,
        stats.elimination_rate(),
        stats.failed_files
    );

    (buckets, stats)
}

/// Stage one: group same-size files by their prefix signature.
///
/// Only size buckets with two or more members are read.
#[must_use]
pub fn stage_one(
    size_buckets: &Buckets<u64>,
    hasher: &Hasher,
    ctx: &StageContext,
) -> (Buckets<PartialKey>, StageStats) {
    run_stage(size_buckets, ctx, Phase::Partial, |&size, path| {
        hasher.partial_signature(path).map(|sig| (size, sig))
    })
}

/// Stage two: group prefix matches by a whole-file digest.
///
/// Only stage-one buckets with two or more members are read.
#[must_use]
pub fn stage_two(
    partial_buckets: &Buckets<PartialKey>,
    hasher: &Hasher,
    ctx: &StageContext,
) -> (Buckets<FullKey>, StageStats) {
    run_stage(partial_buckets, ctx, Phase::Full, |&(size, _), path| {
        hasher.full_signature(path).map(|sig| (size, sig))
    })
}

/// Split one digest group into classes of byte-identical files.
///
/// Each class is represented by its first readable member. When the
/// representative fails, it alone is dropped and the next member takes over.
fn split_by_content(
    group: DuplicateGroup,
    hasher: &Hasher,
    ctx: &StageContext,
) -> (Vec<DuplicateGroup>, Vec<HashError>) {
    let mut classes: Vec<Vec<PathBuf>> = Vec::new();
    let mut errors = Vec::new();

    'paths: for path in group.paths {
        if ctx.is_cancelled() {
            break;
        }
        if let Some(ref callback) = ctx.progress {
            callback.on_item(&path);
        }

        let mut i = 0;
        while i < classes.len() {
            match hasher.same_content(&classes[i][0], &path) {
                Ok(true) => {
                    classes[i].push(path);
                    continue 'paths;
                }
                Ok(false) => i += 1,
                Err(e) if e.is_cancelled() => break 'paths,
                Err(e) if e.path() == classes[i][0].as_path() => {
                    log::warn!("Skipping {} during verification: {}", e.path().display(), e);
                    errors.push(e);
                    classes[i].remove(0);
                    if classes[i].is_empty() {
                        classes.remove(i);
                    }
                }
                Err(e) => {
                    log::warn!("Skipping {} during verification: {}", path.display(), e);
                    errors.push(e);
                    continue 'paths;
                }
            }
        }
        classes.push(vec![path]);
    }

    if classes.len() > 1 {
        log::warn!(
            "Digest {} matched {} distinct contents",
            group.signature.to_hex(),
            classes.len()
        );
    }

    let groups = classes
        .into_iter()
        .filter(|paths| paths.len() > 1)
        .map(|paths| DuplicateGroup::new(group.signature.clone(), group.size, paths))
        .collect();
    (groups, errors)
}

/// Confirm digest groups by comparing bytes, dropping hash collisions.
#[must_use]
pub fn verify_groups(
    groups: Vec<DuplicateGroup>,
    hasher: &Hasher,
    ctx: &StageContext,
) -> (Vec<DuplicateGroup>, StageStats) {
    let mut stats = StageStats {
        input_files: groups.iter().map(DuplicateGroup::len).sum(),
        ..Default::default()
    };
    if groups.is_empty() {
        return (groups, stats);
    }

    if let Some(ref callback) = ctx.progress {
        callback.on_phase_start(Phase::Verify, stats.input_files);
    }

    let results: Vec<(Vec<DuplicateGroup>, Vec<HashError>)> = ctx.pool.install(|| {
        groups
            .into_par_iter()
            .map(|group| split_by_content(group, hasher, ctx))
            .collect()
    });

    let mut verified = Vec::new();
    for (split, errors) in results {
        stats.failed_files += errors.len();
        stats.errors.extend(errors);
        verified.extend(split);
    }

    stats.potential_duplicates = verified.iter().map(DuplicateGroup::len).sum();
    stats.signed_files = stats.input_files - stats.failed_files;
    stats.duplicate_groups = verified.len();
    stats.interrupted = ctx.is_cancelled();

    if let Some(ref callback) = ctx.progress {
        callback.on_phase_end(Phase::Verify);
    }

    (verified, stats)
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Worker count for directory reads and file hashing.
    pub io_threads: usize,
    /// Stage-one prefix length in bytes.
    pub prefix_len: u64,
    /// How prefixes are compared.
    pub prefix_mode: PrefixMode,
    /// Whole-file digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Byte-compare members of digest groups before reporting.
    pub paranoid: bool,
    /// Skip dot-files and dot-directories.
    pub skip_hidden: bool,
    /// Optional cancellation token.
    pub cancel: Option<CancelToken>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("prefix_len", &self.prefix_len)
            .field("prefix_mode", &self.prefix_mode)
            .field("algorithm", &self.algorithm)
            .field("paranoid", &self.paranoid)
            .field("skip_hidden", &self.skip_hidden)
            .field("cancel", &self.cancel)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: default_io_threads(),
            prefix_len: DEFAULT_PREFIX_LEN,
            prefix_mode: PrefixMode::default(),
            algorithm: HashAlgorithm::default(),
            paranoid: false,
            skip_hidden: false,
            cancel: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the worker count (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the stage-one prefix length (minimum 1).
    #[must_use]
    pub fn with_prefix_len(mut self, len: u64) -> Self {
        self.prefix_len = len.max(1);
        self
    }

    /// Set how prefixes are compared.
    #[must_use]
    pub fn with_prefix_mode(mut self, mode: PrefixMode) -> Self {
        self.prefix_mode = mode;
        self
    }

    /// Set the whole-file digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Enable byte-by-byte verification of digest groups.
    #[must_use]
    pub fn with_paranoid(mut self, enabled: bool) -> Self {
        self.paranoid = enabled;
        self
    }

    /// Skip dot-files and dot-directories.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Set the cancellation token.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

/// Wall-clock time spent in each phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTimings {
    /// Directory walk and size bucketing
    pub walk: Duration,
    /// Stage one
    pub partial: Duration,
    /// Stage two
    pub full: Duration,
    /// Byte verification (zero unless paranoid)
    pub verify: Duration,
    /// Entire scan
    pub total: Duration,
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Regular non-empty files discovered
    pub total_files: usize,
    /// Total size of discovered files
    pub total_size: u64,
    /// Zero-length files skipped
    pub skipped_empty: usize,
    /// Symlinks skipped
    pub skipped_symlinks: usize,
    /// Files that were the only one of their size
    pub eliminated_by_size: usize,
    /// Same-size files eliminated by prefix
    pub eliminated_by_prefix: usize,
    /// Prefix matches eliminated by digest
    pub eliminated_by_digest: usize,
    /// Digest matches eliminated by byte comparison
    pub eliminated_by_verify: usize,
    /// Files signed in stage one
    pub partial_candidates: usize,
    /// Files signed in stage two
    pub full_candidates: usize,
    /// Number of duplicate groups reported
    pub duplicate_groups: usize,
    /// Redundant copies across all groups
    pub duplicate_files: usize,
    /// Space reclaimable by keeping one copy per group
    pub reclaimable_space: u64,
    /// Per-phase timings
    pub timings: StageTimings,
    /// Per-entry errors that were skipped
    pub errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Percentage of scanned bytes that are redundant.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    fn absorb_stage(&mut self, stats: StageStats) {
        self.errors.extend(stats.errors.into_iter().map(ScanError::from));
    }
}

/// Errors that abort a scan before or between stages.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was cancelled (Ctrl+C or token).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The root does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root exists but cannot be listed.
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        /// The root path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Check that `path` is a listable directory and return its canonical form.
fn validate_root(path: &Path) -> Result<PathBuf, FinderError> {
    let unreadable = |source| FinderError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => FinderError::PathNotFound(path.to_path_buf()),
        _ => unreadable(e),
    })?;
    if !metadata.is_dir() {
        return Err(FinderError::NotADirectory(path.to_path_buf()));
    }
    std::fs::read_dir(path).map_err(unreadable)?;
    std::fs::canonicalize(path).map_err(unreadable)
}

/// Duplicate finder that runs the progressive narrowing pipeline.
///
/// All bucket state lives inside a single call to
/// [`find_duplicates`](Self::find_duplicates); nothing is kept between runs.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new()
            .with_algorithm(config.algorithm)
            .with_prefix_mode(config.prefix_mode)
            .with_prefix_len(config.prefix_len);
        if let Some(ref token) = config.cancel {
            hasher = hasher.with_cancel_token(token.clone());
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    fn stage_context(&self) -> Result<StageContext, FinderError> {
        let mut ctx = StageContext::new(self.config.io_threads)?;
        if let Some(ref token) = self.config.cancel {
            ctx = ctx.with_cancel_token(token.clone());
        }
        if let Some(ref callback) = self.config.progress_callback {
            ctx = ctx.with_progress_callback(Arc::clone(callback));
        }
        Ok(ctx)
    }

    fn check_cancelled(&self) -> Result<(), FinderError> {
        if self.config.is_cancelled() {
            log::info!("Scan cancelled at stage boundary");
            Err(FinderError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Find all duplicate files under `root`.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if the root is missing, not a directory or not
    /// listable, or if the scan is cancelled. Unreadable files and
    /// directories below the root are skipped and listed in
    /// [`ScanSummary::errors`] instead.
    pub fn find_duplicates(
        &self,
        root: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start = Instant::now();
        let root = validate_root(root)?;
        self.check_cancelled()?;

        log::info!("Starting duplicate scan of {}", root.display());
        let ctx = self.stage_context()?;

        let size_writer = Arc::new(BucketWriter::<u64>::new());
        let sink = Arc::clone(&size_writer);

        let mut walker = Walker::new(
            &root,
            WalkerConfig::default()
                .with_threads(self.config.io_threads)
                .with_skip_hidden(self.config.skip_hidden),
        );
        if let Some(ref token) = self.config.cancel {
            walker = walker.with_cancel_token(token.clone());
        }
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(Arc::clone(callback));
        }

        let walk = walker.walk(move |record| sink.insert(record.size, record.path));
        if walk.interrupted {
            return Err(FinderError::Interrupted);
        }
        let size_buckets = size_writer.drain();

        let mut summary = ScanSummary {
            skipped_empty: walk.skipped_empty,
            skipped_symlinks: walk.skipped_symlinks,
            errors: walk.errors,
            ..Default::default()
        };
        summary.timings.walk = start.elapsed();

        log::info!(
            "Walk complete: {} files ({}), {} unreadable entries",
            walk.files_found,
            ByteSize::b(walk.bytes_found),
            summary.errors.len()
        );

        self.narrow(size_buckets, &ctx, summary, start)
    }

    /// Find duplicates among records collected by some other means.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if the scan is cancelled or the worker pool
    /// cannot be started.
    pub fn find_duplicates_from_records(
        &self,
        records: Vec<FileRecord>,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start = Instant::now();
        self.check_cancelled()?;

        let ctx = self.stage_context()?;
        let (size_buckets, _) = super::group_by_size(records);
        self.narrow(size_buckets, &ctx, ScanSummary::default(), start)
    }

    /// Run every stage after size bucketing.
    fn narrow(
        &self,
        size_buckets: Buckets<u64>,
        ctx: &StageContext,
        mut summary: ScanSummary,
        start: Instant,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let size_stats = GroupingStats::from_buckets(&size_buckets);
        summary.total_files = size_stats.total_files;
        summary.total_size = size_stats.total_size;
        summary.eliminated_by_size = size_stats.eliminated_unique;

        log::info!(
            "Size bucketing complete: {} → {} files ({:.1}% eliminated)",
            size_stats.total_files,
            size_stats.potential_duplicates,
            size_stats.elimination_rate()
        );
        self.check_cancelled()?;

        let phase_start = Instant::now();
        let (partial_buckets, partial_stats) = stage_one(&size_buckets, &self.hasher, ctx);
        drop(size_buckets);
        summary.timings.partial = phase_start.elapsed();
        summary.partial_candidates = partial_stats.input_files;
        summary.eliminated_by_prefix = partial_stats.eliminated();
        let interrupted = partial_stats.interrupted;
        summary.absorb_stage(partial_stats);
        if interrupted {
            return Err(FinderError::Interrupted);
        }
        self.check_cancelled()?;

        let phase_start = Instant::now();
        let (full_buckets, full_stats) = stage_two(&partial_buckets, &self.hasher, ctx);
        drop(partial_buckets);
        summary.timings.full = phase_start.elapsed();
        summary.full_candidates = full_stats.input_files;
        summary.eliminated_by_digest = full_stats.eliminated();
        let interrupted = full_stats.interrupted;
        summary.absorb_stage(full_stats);
        if interrupted {
            return Err(FinderError::Interrupted);
        }
        self.check_cancelled()?;

        let mut groups: Vec<DuplicateGroup> = full_buckets
            .into_multi_member()
            .map(|((size, signature), paths)| DuplicateGroup::new(signature, size, paths))
            .collect();

        if self.config.paranoid {
            let phase_start = Instant::now();
            let (verified, verify_stats) = verify_groups(groups, &self.hasher, ctx);
            summary.timings.verify = phase_start.elapsed();
            summary.eliminated_by_verify = verify_stats.eliminated();
            let interrupted = verify_stats.interrupted;
            summary.absorb_stage(verify_stats);
            if interrupted {
                return Err(FinderError::Interrupted);
            }
            groups = verified;
        }

        sort_groups(&mut groups);

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::savings).sum();
        summary.timings.total = start.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable, {} skipped",
            summary.duplicate_groups,
            summary.duplicate_files,
            ByteSize::b(summary.reclaimable_space),
            summary.errors.len()
        );

        Ok((groups, summary))
    }
}
