//! Basename filtering for archive inputs.

use crate::PpapError;
use crate::Result;
use regex::Regex;
use std::ffi::OsStr;
use std::path::Path;

/// A regular expression matched against whole basenames.
///
/// The pattern is anchored on both ends, so `drop` matches a file named
/// `drop` but not `dropped.txt`.
///
/// # Examples
///
/// ```
/// use ppap_core::filter::IgnorePattern;
/// use std::path::Path;
///
/// let pattern = IgnorePattern::new(r"drop\.tmp").unwrap();
/// assert!(pattern.is_ignored(Path::new("root/drop.tmp")));
/// assert!(!pattern.is_ignored(Path::new("root/drop.tmp.bak")));
/// ```
#[derive(Debug, Clone)]
pub struct IgnorePattern {
    source: String,
    regex: Regex,
}

impl IgnorePattern {
    /// Compiles a pattern for full-name matching.
    ///
    /// # Errors
    ///
    /// Returns `PpapError::InvalidIgnorePattern` if the pattern is not a
    /// valid regular expression.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            PpapError::InvalidIgnorePattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as it was written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns whether `name` matches the pattern in full.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Returns whether the basename of `path` matches the pattern.
    ///
    /// Paths without a basename never match.
    #[must_use]
    pub fn is_ignored(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| self.matches_os(name))
    }

    pub(crate) fn matches_os(&self, name: &OsStr) -> bool {
        self.matches_name(&name.to_string_lossy())
    }
}

/// Returns whether `path` is excluded by an optional pattern.
#[must_use]
pub fn should_skip(path: &Path, pattern: Option<&IgnorePattern>) -> bool {
    pattern.is_some_and(|pattern| pattern.is_ignored(path))
}
