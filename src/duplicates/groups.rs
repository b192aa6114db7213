//! Size bucketing and confirmed duplicate groups.
//!
//! # Overview
//!
//! Size grouping is the first filter: files of different length cannot be
//! duplicates. During a directory scan the walker feeds a
//! [`BucketWriter<u64>`](super::BucketWriter) directly; [`group_by_size`]
//! does the same for records that were collected some other way.
//!
//! # Example
//!
//! ```
//! use dupefind::scanner::FileRecord;
//! use dupefind::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/file1.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file2.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (buckets, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(buckets.multi_member().count(), 1);
//! ```

use std::path::PathBuf;

use super::Buckets;
use crate::scanner::{FileRecord, Signature};

/// Confirmed duplicate group of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Whole-file signature shared by every member
    pub signature: Signature,
    /// File size in bytes, shared by every member
    pub size: u64,
    /// Member paths, sorted
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group; paths are sorted for stable output.
    #[must_use]
    pub fn new(signature: Signature, size: u64, mut paths: Vec<PathBuf>) -> Self {
        paths.sort();
        Self {
            signature,
            size,
            paths,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of redundant copies (total - 1).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Space reclaimable by keeping one copy: `size × (members − 1)`.
    #[must_use]
    pub fn savings(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }
}

/// Order groups for reporting: largest savings first, then by first path.
pub fn sort_groups(groups: &mut [DuplicateGroup]) {
    groups.sort_by(|a, b| {
        b.savings()
            .cmp(&a.savings())
            .then_with(|| a.paths.first().cmp(&b.paths.first()))
    });
}

/// Statistics from size grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes
    pub unique_sizes: usize,
    /// Number of files in size buckets of 2+
    pub potential_duplicates: usize,
    /// Number of files eliminated as the only file of their size
    pub eliminated_unique: usize,
    /// Number of size buckets with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Summarize a populated size bucket map.
    #[must_use]
    pub fn from_buckets(buckets: &Buckets<u64>) -> Self {
        Self {
            total_files: buckets.path_count(),
            total_size: buckets
                .iter()
                .map(|(size, paths)| size * paths.len() as u64)
                .sum(),
            unique_sizes: buckets.len(),
            potential_duplicates: buckets.candidate_count(),
            eliminated_unique: buckets.singleton_count(),
            duplicate_groups: buckets.multi_member().count(),
        }
    }

    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group pre-collected records by exact size.
///
/// Zero-length records are dropped here too, so records from any source obey
/// the same rule as walker output.
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileRecord>,
) -> (Buckets<u64>, GroupingStats) {
    let buckets: Buckets<u64> = files
        .into_iter()
        .filter(|file| {
            if file.size == 0 {
                log::debug!("Dropping empty file: {}", file.path.display());
            }
            file.size > 0
        })
        .map(|file| (file.size, file.path))
        .collect();

    let stats = GroupingStats::from_buckets(&buckets);
    (buckets, stats)
}
