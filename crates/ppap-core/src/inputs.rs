//! Validation and classification of the paths given on the command line.

use crate::PpapError;
use crate::Result;
use std::ffi::OsStr;
use std::path::Path;
use std::path::PathBuf;

/// Input paths split into regular files and directories.
///
/// Both lists keep the order in which the paths were supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedInputs {
    /// Inputs that are not directories.
    pub files: Vec<PathBuf>,

    /// Inputs that are directories.
    pub directories: Vec<PathBuf>,
}

impl ClassifiedInputs {
    /// Total number of classified inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len() + self.directories.len()
    }

    /// Returns whether no inputs were classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }
}

/// Checks that every argument exists and splits them into files and
/// directories.
///
/// Symlinks are followed, so a link to a directory counts as a directory.
/// Validation stops at the first missing path.
///
/// # Examples
///
/// ```no_run
/// use ppap_core::inputs::classify_inputs;
///
/// let inputs = classify_inputs(&["notes.txt", "photos"])?;
/// println!("{} files, {} dirs", inputs.files.len(), inputs.directories.len());
/// # Ok::<(), ppap_core::PpapError>(())
/// ```
///
/// # Errors
///
/// Returns `PpapError::NotFound` carrying the first argument that does not
/// exist.
pub fn classify_inputs<S: AsRef<OsStr>>(args: &[S]) -> Result<ClassifiedInputs> {
    let mut inputs = ClassifiedInputs::default();

    for arg in args {
        let path = Path::new(arg.as_ref());
        if !path.exists() {
            return Err(PpapError::NotFound {
                path: path.to_path_buf(),
            });
        }

        if path.is_dir() {
            inputs.directories.push(path.to_path_buf());
        } else {
            inputs.files.push(path.to_path_buf());
        }
    }

    Ok(inputs)
}
