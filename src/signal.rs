//! Cancellation and Ctrl+C handling.
//!
//! A [`CancelToken`] is a shared flag that the walker, the hasher and the
//! finder poll at stage boundaries and between reads. Setting it stops new
//! work from being issued; work already in flight finishes its current chunk
//! and is discarded without touching the buckets.
//!
//! ```rust,no_run
//! use dupefind::signal::install_handler;
//!
//! let token = install_handler().expect("Failed to install signal handler");
//! // Pass `token.clone()` to DuplicateFinder via FinderConfig::with_cancel_token
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Exit code for SIGINT (Ctrl+C) interruption: 128 + SIGINT.
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared cancellation flag.
///
/// Cloning is cheap and every clone observes the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

/// Install a Ctrl+C handler that cancels the returned token.
///
/// # Errors
///
/// Fails if a handler is already registered for this process.
pub fn install_handler() -> Result<CancelToken, SignalError> {
    let token = CancelToken::new();
    let hooked = token.clone();

    ctrlc::set_handler(move || {
        hooked.cancel();
        let _ = writeln!(std::io::stderr(), "\nInterrupted. Finishing in-flight reads...");
        let _ = std::io::stderr().flush();
        log::info!("Cancellation requested by signal");
    })?;

    Ok(token)
}
