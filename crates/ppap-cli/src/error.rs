//! Error conversion utilities for CLI.
//!
//! Converts ppap-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use ppap_core::PpapError;
use std::path::Path;

/// Converts `PpapError` to a user-facing anyhow error.
///
/// `settings_path` is the settings file the run used, if any, and is named
/// in hints about its contents.
pub fn convert_ppap_error(err: PpapError, settings_path: Option<&Path>) -> anyhow::Error {
    let settings = settings_path.map_or_else(
        || "~/.ppaprc".to_string(),
        |path| path.display().to_string(),
    );
    tracing::debug!(usage_error = err.is_usage_error(), error = %err, "run failed");

    match err {
        PpapError::NoInput => anyhow!(
            "No files/dirs\n\
             HINT: Pass at least one file or directory, e.g. `ppap report.pdf`."
        ),
        PpapError::NotFound { path } => anyhow!("Not found {}", path.display()),
        PpapError::Config(source) => anyhow!(
            "Invalid settings file '{settings}': {source}\n\
             HINT: Use one `key=value` per line with the keys password, charset and ignore."
        ),
        PpapError::UnknownCharset { label } => anyhow!(
            "Unknown charset '{label}' in '{settings}'\n\
             HINT: Use an encoding label such as windows-31j, shift_jis or utf-8."
        ),
        PpapError::InvalidIgnorePattern { pattern, source } => anyhow!(
            "Invalid ignore pattern '{pattern}' in '{settings}': {source}\n\
             HINT: The pattern is a regular expression matched against whole file names."
        ),
        PpapError::ArchiveTooLarge { reason } => anyhow!(
            "Archive too large: {reason}\n\
             HINT: Split the inputs across several archives."
        ),
        err @ PpapError::Io(_) => anyhow::Error::from(err),
    }
}

/// Converts a core result, attaching hints to the error.
pub fn with_hints<T>(
    result: Result<T, PpapError>,
    settings_path: Option<&Path>,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_ppap_error(e, settings_path))
}
