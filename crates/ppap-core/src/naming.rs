//! Output archive naming.
//!
//! The archive is named after its single input, or `archive` when several
//! inputs are bundled, and receives a numeric suffix when the plain name is
//! already taken in the target directory. A single regular file loses its
//! own extension, so `report.pdf` becomes `report.zip`.

use crate::PpapError;
use crate::Result;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// Basename used when more than one input is archived.
pub const DEFAULT_BASENAME: &str = "archive";

/// Extension appended to every archive name.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Computes a non-colliding archive file name for `args` inside `dir`.
///
/// # Examples
///
/// ```no_run
/// use ppap_core::naming::resolve_archive_name;
/// use std::path::Path;
///
/// let name = resolve_archive_name(&["report.pdf"], Path::new("."))?;
/// assert!(name.starts_with("report"));
/// # Ok::<(), ppap_core::PpapError>(())
/// ```
///
/// # Errors
///
/// Returns `PpapError::NoInput` if `args` is empty, or an I/O error if
/// `dir` cannot be listed.
pub fn resolve_archive_name<S: AsRef<OsStr>>(args: &[S], dir: &Path) -> Result<String> {
    let basename = archive_stem(args)?;

    let existing: HashSet<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(&basename))
        .collect();

    let name = first_free_name(&basename, |candidate| existing.contains(candidate));
    tracing::debug!(%name, "resolved archive name");
    Ok(name)
}

/// Returns the basename the archive is derived from.
///
/// # Errors
///
/// Returns `PpapError::NoInput` if `args` is empty.
pub fn archive_basename<S: AsRef<OsStr>>(args: &[S]) -> Result<String> {
    match args {
        [] => Err(PpapError::NoInput),
        [single] => Ok(last_segment(Path::new(single.as_ref()))),
        _ => Ok(DEFAULT_BASENAME.to_string()),
    }
}

/// Returns the basename with the extension of a single regular file removed.
fn archive_stem<S: AsRef<OsStr>>(args: &[S]) -> Result<String> {
    let basename = archive_basename(args)?;
    match args {
        [single] if Path::new(single.as_ref()).is_file() => Ok(Path::new(&basename)
            .file_stem()
            .map_or(basename.clone(), |stem| stem.to_string_lossy().into_owned())),
        _ => Ok(basename),
    }
}

/// Returns the final path segment, resolving `.`/`..`/roots through the
/// filesystem when the path itself has none.
pub(crate) fn last_segment(path: &Path) -> String {
    if let Some(name) = path.file_name() {
        return name.to_string_lossy().into_owned();
    }

    fs::canonicalize(path)
        .ok()
        .and_then(|resolved| {
            resolved
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| DEFAULT_BASENAME.to_string())
}

/// Walks `<base>.zip`, `<base>.1.zip`, `<base>.2.zip`, ... and returns the
/// first candidate for which `taken` is false.
fn first_free_name(basename: &str, taken: impl Fn(&str) -> bool) -> String {
    let plain = format!("{basename}{ARCHIVE_EXTENSION}");
    if !taken(&plain) {
        return plain;
    }

    (1_u64..)
        .map(|n| format!("{basename}.{n}{ARCHIVE_EXTENSION}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or(plain)
}
