//! Keyed path buckets shared between pipeline stages.
//!
//! A stage populates a [`BucketWriter`] from many worker threads; the mutex
//! guards only the map insert, never the I/O that produced the key. Once the
//! stage barrier is reached the writer is turned into an immutable
//! [`Buckets`] value and handed to the next stage, which only looks at
//! buckets with two or more members.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Concurrently writable bucket map.
#[derive(Debug)]
pub struct BucketWriter<K> {
    inner: Mutex<HashMap<K, Vec<PathBuf>>>,
}

impl<K: Eq + Hash> Default for BucketWriter<K> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash> BucketWriter<K> {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `path` to the bucket for `key`.
    pub fn insert(&self, key: K, path: PathBuf) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_default()
            .push(path);
    }

    /// Take everything inserted so far, leaving the writer empty.
    ///
    /// Used when other owners of the writer may still hold a reference.
    pub fn drain(&self) -> Buckets<K> {
        let map = std::mem::take(&mut *self.inner.lock().unwrap_or_else(PoisonError::into_inner));
        Buckets { map }
    }

    /// Consume the writer.
    #[must_use]
    pub fn finish(self) -> Buckets<K> {
        Buckets {
            map: self
                .inner
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }
}

/// Immutable result of one stage: paths grouped by key.
#[derive(Debug, Clone)]
pub struct Buckets<K> {
    map: HashMap<K, Vec<PathBuf>>,
}

impl<K: Eq + Hash> Default for Buckets<K> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> FromIterator<(K, PathBuf)> for Buckets<K> {
    fn from_iter<I: IntoIterator<Item = (K, PathBuf)>>(iter: I) -> Self {
        let mut map: HashMap<K, Vec<PathBuf>> = HashMap::new();
        for (key, path) in iter {
            map.entry(key).or_default().push(path);
        }
        Self { map }
    }
}

impl<K: Eq + Hash> Buckets<K> {
    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no path was bucketed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Paths sharing `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&[PathBuf]> {
        self.map.get(key).map(Vec::as_slice)
    }

    /// Total number of bucketed paths.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    /// All buckets, including singletons.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[PathBuf])> {
        self.map.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Buckets with two or more members: the only ones a later stage sees.
    pub fn multi_member(&self) -> impl Iterator<Item = (&K, &[PathBuf])> {
        self.iter().filter(|(_, paths)| paths.len() > 1)
    }

    /// Paths that survive into the next stage, paired with their key.
    pub fn candidates(&self) -> impl Iterator<Item = (&K, &Path)> {
        self.multi_member()
            .flat_map(|(key, paths)| paths.iter().map(move |p| (key, p.as_path())))
    }

    /// Number of paths in multi-member buckets.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.multi_member().map(|(_, paths)| paths.len()).sum()
    }

    /// Number of buckets with exactly one member.
    #[must_use]
    pub fn singleton_count(&self) -> usize {
        self.map.values().filter(|paths| paths.len() == 1).count()
    }

    /// Consume into the multi-member buckets.
    pub fn into_multi_member(self) -> impl Iterator<Item = (K, Vec<PathBuf>)> {
        self.map.into_iter().filter(|(_, paths)| paths.len() > 1)
    }
}
