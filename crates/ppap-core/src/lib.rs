//! Password-protected ZIP archive creation.
//!
//! `ppap-core` turns a list of files and directories into a single
//! ZipCrypto-encrypted ZIP archive. Entry names are encoded in a legacy
//! charset (Windows-31J by default) so that archives open cleanly on
//! systems that do not understand UTF-8 names.
//!
//! Creation runs in stages, each usable on its own:
//!
//! 1. [`inputs::classify_inputs`] validates the command-line paths.
//! 2. [`naming::resolve_archive_name`] picks a collision-free file name.
//! 3. [`Settings`] loads `~/.ppaprc` and [`password::resolve_password`]
//!    decides the password.
//! 4. [`collect::collect_entries`] walks directories and applies the
//!    ignore pattern.
//! 5. [`archive::create_archive`] writes the archive.
//!
//! # Examples
//!
//! ```no_run
//! use ppap_core::NoopProgress;
//! use ppap_core::archive::ArchiveOptions;
//! use ppap_core::archive::create_archive;
//! use ppap_core::collect::collect_entries;
//! use ppap_core::inputs::classify_inputs;
//! use ppap_core::naming::resolve_archive_name;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = ["report.pdf"];
//! let inputs = classify_inputs(&args)?;
//! let name = resolve_archive_name(&args, Path::new("."))?;
//! let plan = collect_entries(&inputs, None)?;
//! let options = ArchiveOptions::new("s3cret");
//! let report = create_archive(Path::new(&name), &plan, &options, &mut NoopProgress)?;
//! println!("Created {name} with {} files", report.files_added);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
pub mod collect;
pub mod error;
pub mod filter;
pub mod inputs;
pub mod io;
pub mod naming;
pub mod password;
pub mod report;
pub mod settings;

pub use archive::ArchiveOptions;
pub use archive::create_archive;
pub use collect::ArchivePlan;
pub use collect::collect_entries;
pub use error::PpapError;
pub use error::Result;
pub use filter::IgnorePattern;
pub use inputs::ClassifiedInputs;
pub use inputs::classify_inputs;
pub use naming::resolve_archive_name;
pub use password::Password;
pub use password::PasswordOrigin;
pub use password::SecretConsole;
pub use password::resolve_password;
pub use report::CreationReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use settings::Settings;
