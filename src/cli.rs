//! Command-line interface definitions for dupefind.
//!
//! # Example
//!
//! ```bash
//! # Scan the whole filesystem (default root is /)
//! dupefind
//!
//! # Scan one directory, write stage timings as JSON
//! dupefind -d ~/Downloads --cpuprofile profile.json
//!
//! # Longer prefix, BLAKE3 digests, byte verification
//! dupefind -d ~/Photos --prefix-len 65536 --hash blake3 --paranoid
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::scanner::{HashAlgorithm, PrefixMode};

/// Find duplicate files by progressive narrowing.
///
/// Files are grouped by size, then by a short prefix, then by a whole-file
/// digest. Only groups with two or more members move on to the next stage.
#[derive(Debug, Parser)]
#[command(name = "dupefind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory to scan
    #[arg(short, long, value_name = "DIR", default_value = "/")]
    pub dir: PathBuf,

    /// Write per-stage timings and counts as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub cpuprofile: Option<PathBuf>,

    /// Configuration file (TOML)
    ///
    /// If not specified, a platform-specific default path is used when present.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of leading bytes compared in stage one
    #[arg(long, value_name = "BYTES")]
    pub prefix_len: Option<u64>,

    /// How prefixes are compared
    #[arg(long, value_enum, value_name = "MODE")]
    pub prefix_mode: Option<PrefixMode>,

    /// Whole-file digest algorithm
    #[arg(long, value_enum, value_name = "ALGO")]
    pub hash: Option<HashAlgorithm>,

    /// Worker count for directory reads and hashing (0 = available parallelism)
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(short = 'j', long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Byte-by-byte verification after a digest match
    ///
    /// Slower but guarantees no hash collisions.
    #[arg(long)]
    pub paranoid: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
