//! Prefix signatures and whole-file digests.
//!
//! # Overview
//!
//! [`Hasher`] computes the two signatures the comparison stages group by:
//!
//! - [`Hasher::partial_signature`] reads at most `prefix_len` bytes and keeps
//!   them verbatim ([`PrefixMode::Bytes`]) or digests them
//!   ([`PrefixMode::Hashed`]).
//! - [`Hasher::full_signature`] digests the whole file, streaming it through a
//!   fixed buffer or, for large files, through a read-only memory map.
//!
//! The digest is pluggable ([`HashAlgorithm`]). Neither algorithm is used for
//! its collision resistance: equal digests are treated as equal content, which
//! is an approximation unless groups are re-checked with
//! [`Hasher::same_content`].

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

use super::HashError;
use crate::signal::CancelToken;

/// Default number of leading bytes compared in stage one.
pub const DEFAULT_PREFIX_LEN: u64 = 4096;

/// Buffer size for streaming reads.
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Files at least this large are digested through a memory map.
const DEFAULT_MMAP_THRESHOLD: u64 = 16 * 1024 * 1024;

/// Cancellation is polled once per mapped chunk.
const MMAP_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Digest used for whole-file signatures and hashed prefixes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// 128-bit XXH3, non-cryptographic
    #[default]
    Xxh3,
    /// 256-bit BLAKE3
    Blake3,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Self::Xxh3 => 16,
            Self::Blake3 => blake3::OUT_LEN,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xxh3 => f.write_str("xxh3"),
            Self::Blake3 => f.write_str("blake3"),
        }
    }
}

/// How the stage-one prefix is turned into a signature.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PrefixMode {
    /// Keep the raw prefix bytes (exact comparison)
    #[default]
    Bytes,
    /// Digest the prefix with the configured algorithm
    Hashed,
}

/// Opaque signature bytes: a raw prefix or a digest.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(Box<[u8]>);

impl Signature {
    /// Raw signature bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hexadecimal rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        use std::fmt::Write as _;
        self.0.iter().fold(String::with_capacity(self.0.len() * 2), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
    }
}

impl From<Vec<u8>> for Signature {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into_boxed_slice())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Raw prefixes can be kilobytes long; keep debug output readable.
        let hex = self.to_hex();
        if hex.len() > 64 {
            write!(f, "Signature({}.., {} bytes)", &hex[..64], self.0.len())
        } else {
            write!(f, "Signature({hex})")
        }
    }
}

enum DigestState {
    Xxh3(Box<Xxh3>),
    Blake3(Box<blake3::Hasher>),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Xxh3 => Self::Xxh3(Box::new(Xxh3::new())),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, bytes: &[u8]) {
        match self {
            Self::Xxh3(state) => state.update(bytes),
            Self::Blake3(state) => {
                state.update(bytes);
            }
        }
    }

    /// Feed a large in-memory block; BLAKE3 spreads it over the current pool.
    fn update_large(&mut self, bytes: &[u8]) {
        match self {
            Self::Xxh3(state) => state.update(bytes),
            Self::Blake3(state) => {
                state.update_rayon(bytes);
            }
        }
    }

    fn finish(self) -> Signature {
        match self {
            Self::Xxh3(state) => Signature::from(state.digest128().to_be_bytes().to_vec()),
            Self::Blake3(state) => Signature::from(state.finalize().as_bytes().to_vec()),
        }
    }
}

/// Computes prefix and whole-file signatures.
///
/// A `Hasher` is immutable and shared by every worker of a stage.
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    prefix_mode: PrefixMode,
    prefix_len: u64,
    mmap_threshold: u64,
    cancel: Option<CancelToken>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            prefix_mode: PrefixMode::default(),
            prefix_len: DEFAULT_PREFIX_LEN,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
            cancel: None,
        }
    }
}

impl Hasher {
    /// Create a hasher with default settings (XXH3, raw 4 KiB prefix).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Select how prefixes are compared.
    #[must_use]
    pub fn with_prefix_mode(mut self, mode: PrefixMode) -> Self {
        self.prefix_mode = mode;
        self
    }

    /// Set the prefix length (minimum 1 byte).
    #[must_use]
    pub fn with_prefix_len(mut self, len: u64) -> Self {
        self.prefix_len = len.max(1);
        self
    }

    /// Files of at least `bytes` are digested through a memory map.
    #[must_use]
    pub fn with_mmap_threshold(mut self, bytes: u64) -> Self {
        self.mmap_threshold = bytes;
        self
    }

    /// Stop reading as soon as `token` is cancelled.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Configured digest algorithm.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Configured prefix length.
    #[must_use]
    pub fn prefix_len(&self) -> u64 {
        self.prefix_len
    }

    fn check_cancelled(&self, path: &Path) -> Result<(), HashError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(HashError::Cancelled(path.to_path_buf())),
            _ => Ok(()),
        }
    }

    fn open(&self, path: &Path) -> Result<File, HashError> {
        self.check_cancelled(path)?;
        File::open(path).map_err(|e| HashError::from_io(path, e))
    }

    /// Signature of the first `prefix_len` bytes of `path`.
    ///
    /// Files shorter than the prefix contribute their entire content.
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`] if the file cannot be opened or read, or if
    /// the scan was cancelled.
    pub fn partial_signature(&self, path: &Path) -> Result<Signature, HashError> {
        let file = self.open(path)?;

        let capacity = usize::try_from(self.prefix_len.min(READ_BUFFER_SIZE as u64))
            .unwrap_or(READ_BUFFER_SIZE);
        let mut prefix = Vec::with_capacity(capacity);
        file.take(self.prefix_len)
            .read_to_end(&mut prefix)
            .map_err(|e| HashError::from_io(path, e))?;

        Ok(match self.prefix_mode {
            PrefixMode::Bytes => Signature::from(prefix),
            PrefixMode::Hashed => {
                let mut state = DigestState::new(self.algorithm);
                state.update(&prefix);
                state.finish()
            }
        })
    }

    /// Digest of the entire content of `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`] if the file cannot be opened, mapped or read,
    /// or if the scan was cancelled mid-read.
    pub fn full_signature(&self, path: &Path) -> Result<Signature, HashError> {
        let file = self.open(path)?;
        let len = file
            .metadata()
            .map_err(|e| HashError::from_io(path, e))?
            .len();

        if len >= self.mmap_threshold && len > 0 {
            log::trace!("Mapping {} ({} bytes)", path.display(), len);
            self.digest_mapped(path, &file)
        } else {
            self.digest_streamed(path, file)
        }
    }

    fn digest_streamed(&self, path: &Path, mut file: File) -> Result<Signature, HashError> {
        let mut state = DigestState::new(self.algorithm);
        let mut buf = vec![0u8; READ_BUFFER_SIZE];

        loop {
            self.check_cancelled(path)?;
            match file.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => state.update(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            }
        }

        Ok(state.finish())
    }

    fn digest_mapped(&self, path: &Path, file: &File) -> Result<Signature, HashError> {
        // SAFETY: the mapping is read-only and dropped before this returns.
        let map = unsafe { Mmap::map(file) }.map_err(|e| HashError::from_io(path, e))?;

        let mut state = DigestState::new(self.algorithm);
        for chunk in map.chunks(MMAP_CHUNK_SIZE) {
            self.check_cancelled(path)?;
            state.update_large(chunk);
        }

        Ok(state.finish())
    }

    /// Compare two files byte by byte.
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`] for whichever file fails to read first.
    pub fn same_content(&self, a: &Path, b: &Path) -> Result<bool, HashError> {
        let mut file_a = self.open(a)?;
        let mut file_b = self.open(b)?;
        let mut buf_a = vec![0u8; READ_BUFFER_SIZE];
        let mut buf_b = vec![0u8; READ_BUFFER_SIZE];

        loop {
            self.check_cancelled(a)?;
            let n_a = read_full(&mut file_a, &mut buf_a).map_err(|e| HashError::from_io(a, e))?;
            let n_b = read_full(&mut file_b, &mut buf_b).map_err(|e| HashError::from_io(b, e))?;

            if n_a != n_b || buf_a[..n_a] != buf_b[..n_b] {
                return Ok(false);
            }
            if n_a == 0 {
                return Ok(true);
            }
        }
    }
}

/// Fill `buf` as far as the file allows; a short count means end of file.
fn read_full(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
