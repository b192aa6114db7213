//! Layered configuration.
//!
//! Settings are merged with `figment` in increasing priority:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config`, else the platform config dir when present)
//! 3. Environment variables prefixed `DUPEFIND_`
//! 4. Command-line flags
//!
//! ```toml
//! prefix_len = 8192
//! prefix_mode = "hashed"
//! hash = "blake3"
//! io_threads = 4
//! skip_hidden = true
//! paranoid = false
//! ```

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::duplicates::FinderConfig;
use crate::scanner::{default_io_threads, HashAlgorithm, PrefixMode, DEFAULT_PREFIX_LEN};

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "DUPEFIND_";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A provider could not be parsed or a value has the wrong type.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// `prefix_len` was set to zero.
    #[error("Invalid configuration: prefix_len must be at least 1")]
    ZeroPrefixLen,
}

/// Effective scan settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Stage-one prefix length in bytes.
    pub prefix_len: u64,
    /// How prefixes are compared.
    pub prefix_mode: PrefixMode,
    /// Whole-file digest algorithm.
    pub hash: HashAlgorithm,
    /// Worker count; 0 means available parallelism.
    pub io_threads: usize,
    /// Skip dot-files and dot-directories.
    pub skip_hidden: bool,
    /// Byte-compare digest groups before reporting.
    pub paranoid: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix_len: DEFAULT_PREFIX_LEN,
            prefix_mode: PrefixMode::default(),
            hash: HashAlgorithm::default(),
            io_threads: 0,
            skip_hidden: false,
            paranoid: false,
        }
    }
}

impl Settings {
    /// Platform-specific default config file location.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupefind").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Merge defaults, the TOML file and the environment.
    ///
    /// An explicit `path` must exist; the default path is skipped when absent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for a missing explicit file.
    pub fn figment(path: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));

        match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
                    log::debug!("Using config file {}", path.display());
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Load and validate settings from every layer below the CLI.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a layer cannot be parsed or a value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings: Settings = Self::figment(path)?.extract().map_err(Box::new)?;
        settings.validate()
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroPrefixLen` if `prefix_len` is 0.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.prefix_len == 0 {
            return Err(ConfigError::ZeroPrefixLen);
        }
        Ok(self)
    }

    /// Apply command-line overrides on top of the loaded layers.
    #[must_use]
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if let Some(len) = cli.prefix_len {
            self.prefix_len = len;
        }
        if let Some(mode) = cli.prefix_mode {
            self.prefix_mode = mode;
        }
        if let Some(hash) = cli.hash {
            self.hash = hash;
        }
        if let Some(threads) = cli.io_threads {
            self.io_threads = threads;
        }
        self.skip_hidden |= cli.skip_hidden;
        self.paranoid |= cli.paranoid;
        self
    }

    /// Worker count with 0 resolved to available parallelism.
    #[must_use]
    pub fn effective_io_threads(&self) -> usize {
        if self.io_threads == 0 {
            default_io_threads()
        } else {
            self.io_threads
        }
    }

    /// Finder configuration for these settings.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_io_threads(self.effective_io_threads())
            .with_prefix_len(self.prefix_len)
            .with_prefix_mode(self.prefix_mode)
            .with_algorithm(self.hash)
            .with_skip_hidden(self.skip_hidden)
            .with_paranoid(self.paranoid)
    }
}
