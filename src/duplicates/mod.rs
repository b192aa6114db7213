//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size bucketing (fed by the walker)
//! - Stage one: prefix comparison
//! - Stage two: whole-file digest comparison
//! - Optional byte-by-byte verification
//! - Duplicate group management

pub mod buckets;
pub mod finder;
pub mod groups;

pub use buckets::{BucketWriter, Buckets};
pub use finder::{
    stage_one, stage_two, verify_groups, DuplicateFinder, FinderConfig, FinderError, FullKey,
    PartialKey, ScanSummary, StageContext, StageStats, StageTimings,
};
pub use groups::{group_by_size, sort_groups, DuplicateGroup, GroupingStats};
