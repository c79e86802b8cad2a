//! Version string shown by `--version`.
//!
//! Release binaries are shipped as `ppap-<version>[.exe]`, so the version is
//! read back from the executable's own file name. Development builds named
//! plain `ppap` report the package version instead.

use std::env;
use std::path::Path;

/// Returns the version of the running executable.
pub fn current() -> String {
    env::current_exe()
        .ok()
        .and_then(|exe| from_executable_name(&exe))
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
}

/// Extracts `<version>` from a `ppap-<version>[EXE_SUFFIX]` file name.
fn from_executable_name(exe: &Path) -> Option<String> {
    let name = exe.file_name()?.to_str()?;
    let name = name.strip_suffix(env::consts::EXE_SUFFIX).unwrap_or(name);
    let version = name.strip_prefix("ppap-")?;

    version
        .starts_with(|c: char| c.is_ascii_digit())
        .then(|| version.to_string())
}
