//! Error types for archive creation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PpapError`.
pub type Result<T> = std::result::Result<T, PpapError>;

/// Errors that can occur while preparing or writing an archive.
#[derive(Error, Debug)]
pub enum PpapError {
    /// No input paths were supplied.
    #[error("No files/dirs")]
    NoInput,

    /// An input path does not exist.
    #[error("Not found {}", path.display())]
    NotFound {
        /// The offending path, exactly as supplied.
        path: PathBuf,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file exists but could not be read or parsed.
    #[error("invalid settings file: {0}")]
    Config(#[from] config::ConfigError),

    /// The configured charset label is not a known text encoding.
    #[error("unknown charset: {label}")]
    UnknownCharset {
        /// The label as written in the settings file.
        label: String,
    },

    /// The configured ignore pattern is not a valid regular expression.
    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidIgnorePattern {
        /// The pattern source.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The archive would exceed the limits of the classic ZIP format.
    #[error("archive too large: {reason}")]
    ArchiveTooLarge {
        /// Which limit was exceeded.
        reason: String,
    },
}

impl PpapError {
    /// Returns `true` if the error was caused by the user's input rather
    /// than by the environment.
    ///
    /// # Examples
    ///
    /// ```
    /// use ppap_core::PpapError;
    /// use std::path::PathBuf;
    ///
    /// assert!(PpapError::NoInput.is_usage_error());
    /// let err = PpapError::NotFound {
    ///     path: PathBuf::from("missing.txt"),
    /// };
    /// assert!(err.is_usage_error());
    ///
    /// let err = PpapError::Io(std::io::Error::other("disk full"));
    /// assert!(!err.is_usage_error());
    /// ```
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(self, Self::NoInput | Self::NotFound { .. })
    }
}
