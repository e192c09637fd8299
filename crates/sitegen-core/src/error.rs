//! Error types and handling for sitegen-core operations.
//!
//! All failures surface through a single [`Error`] enum so callers can match
//! on the failure class without digging through nested error types. Errors
//! are synchronous and reported at the call that caused them.
//!
//! ## Error Categories
//!
//! - **Configuration errors**: invalid generator-wide settings. Raised at
//!   construction time, never once writing has started.
//! - **Validation errors**: a submitted record is unacceptable (URL outside
//!   the configured base, out-of-range priority, empty required field).
//!   Raised before the record enters any batch.
//! - **Capacity errors**: a file limit would be exceeded while automatic
//!   flushing is disabled.
//! - **I/O errors**: the output sink could not be opened, written, or
//!   committed. The in-flight file is abandoned; nothing partial is
//!   registered.

use thiserror::Error;

/// The main error type for sitegen-core operations.
///
/// All public fallible functions in sitegen-core return [`Result<T>`] with
/// this error. The `Display` output is a short user-facing message; the
/// underlying `std::io::Error` is preserved for sink failures.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers opening, writing, flushing, and renaming output files. The
    /// batch being written when this occurs is lost; the session does not
    /// retry on its own.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generator-wide settings are invalid.
    ///
    /// Raised when a generator is constructed, e.g. a per-file URL limit
    /// above the variant's protocol ceiling, a zero byte budget, or an
    /// output path that is not a directory.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A submitted record failed validation.
    ///
    /// The record never enters a batch, so prior session state is
    /// unaffected. Covers URLs outside the configured base URL, priorities
    /// outside `[0.0, 1.0]`, and empty required fields on richer variants.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A per-file limit would be exceeded while automatic flushing is off.
    ///
    /// The current batch is left untouched; the caller can finalize the
    /// session or re-enable automatic flushing.
    #[error("Capacity exceeded: {0}")]
    Capacity(String),

    /// URL is malformed or cannot be used as a base for joining.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// XML markup could not be produced.
    #[error("XML write error: {0}")]
    Xml(String),

    /// The session was already finalized.
    ///
    /// Submitting records or finalizing a second time requires constructing
    /// a fresh generator.
    #[error("sitemap session already finalized")]
    Finished,
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Only temporary I/O failures (timeouts, interruptions) are considered
    /// recoverable; everything else reflects bad input or a finished
    /// session and will fail again unchanged.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(e) => {
                matches!(
                    e.kind(),
                    std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
                )
            },
            _ => false,
        }
    }

    /// Get the error category as a static string identifier.
    ///
    /// Useful for grouping failures in logs or metrics without matching on
    /// every variant.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::Capacity(_) => "capacity",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Xml(_) => "xml",
            Self::Finished => "finished",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
