//! Encrypted ZIP archive creation.

pub mod zipcrypto;
mod writer;

pub use writer::ArchiveWriter;

use crate::ProgressCallback;
use crate::Result;
use crate::collect::ArchivePlan;
use crate::collect::EntryKind;
use crate::report::CreationReport;
use encoding_rs::Encoding;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

/// Default deflate level.
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 6;

/// Entry encryption method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptionMethod {
    /// Traditional PKWARE encryption, readable by every ZIP tool.
    #[default]
    ZipStandard,
}

/// Options controlling how entries are written.
///
/// # Examples
///
/// ```
/// use ppap_core::archive::ArchiveOptions;
///
/// let options = ArchiveOptions::new("s3cret")
///     .with_charset(encoding_rs::UTF_8)
///     .with_compression_level(9);
/// assert_eq!(options.compression_level(), 9);
/// assert_eq!(options.charset(), encoding_rs::UTF_8);
/// ```
#[derive(Clone)]
pub struct ArchiveOptions {
    password: Vec<u8>,
    charset: &'static Encoding,
    compression_level: u8,
    encryption: EncryptionMethod,
}

impl ArchiveOptions {
    /// Creates options for the given password, Windows-31J names and the
    /// default compression level.
    pub fn new(password: impl AsRef<[u8]>) -> Self {
        Self {
            password: password.as_ref().to_vec(),
            charset: encoding_rs::SHIFT_JIS,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            encryption: EncryptionMethod::default(),
        }
    }

    /// Sets the charset entry names are encoded with.
    #[must_use]
    pub fn with_charset(mut self, charset: &'static Encoding) -> Self {
        self.charset = charset;
        self
    }

    /// Sets the deflate level, clamped to 0-9.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level.min(9);
        self
    }

    /// Password bytes used for encryption.
    #[must_use]
    pub fn password_bytes(&self) -> &[u8] {
        &self.password
    }

    /// Charset for entry names.
    #[must_use]
    pub fn charset(&self) -> &'static Encoding {
        self.charset
    }

    /// Deflate level.
    #[must_use]
    pub fn compression_level(&self) -> u8 {
        self.compression_level
    }

    /// Encryption method.
    #[must_use]
    pub fn encryption(&self) -> EncryptionMethod {
        self.encryption
    }
}

impl std::fmt::Debug for ArchiveOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveOptions")
            .field("password", &"<redacted>")
            .field("charset", &self.charset.name())
            .field("compression_level", &self.compression_level)
            .field("encryption", &self.encryption)
            .finish()
    }
}

/// Writes every planned entry to a new archive at `output`.
///
/// The output file must not exist yet. A partially written archive is
/// removed when creation fails.
///
/// # Examples
///
/// ```no_run
/// use ppap_core::NoopProgress;
/// use ppap_core::archive::ArchiveOptions;
/// use ppap_core::archive::create_archive;
/// use ppap_core::collect::collect_entries;
/// use ppap_core::inputs::classify_inputs;
/// use std::path::Path;
///
/// let inputs = classify_inputs(&["docs"])?;
/// let plan = collect_entries(&inputs, None)?;
/// let options = ArchiveOptions::new("s3cret");
/// let report = create_archive(Path::new("docs.zip"), &plan, &options, &mut NoopProgress)?;
/// println!("Added {} files", report.files_added);
/// # Ok::<(), ppap_core::PpapError>(())
/// ```
///
/// # Errors
///
/// Returns an error if the output already exists or cannot be created, a
/// source cannot be read, or the archive exceeds the classic ZIP limits.
pub fn create_archive(
    output: &Path,
    plan: &ArchivePlan,
    options: &ArchiveOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<CreationReport> {
    let file = OpenOptions::new().write(true).create_new(true).open(output)?;

    match write_plan(file, plan, options, progress) {
        Ok(report) => Ok(report),
        Err(e) => {
            if let Err(cleanup) = std::fs::remove_file(output) {
                tracing::warn!(path = %output.display(), error = %cleanup, "failed to remove partial archive");
            }
            Err(e)
        }
    }
}

fn write_plan(
    file: File,
    plan: &ArchivePlan,
    options: &ArchiveOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<CreationReport> {
    let start = Instant::now();
    let mut writer = ArchiveWriter::new(BufWriter::new(file), options.clone());
    let total = plan.len();

    for (idx, entry) in plan.entries.iter().enumerate() {
        let name = Path::new(&entry.archive_name);
        progress.on_entry_start(name, total, idx + 1);
        match entry.kind {
            EntryKind::File => {
                tracing::debug!(source = %entry.source.display(), name = %entry.archive_name, "adding file");
                writer.add_file(&entry.source, &entry.archive_name, progress)?;
            }
            EntryKind::Directory => {
                tracing::debug!(name = %entry.archive_name, "adding directory");
                let modified = std::fs::metadata(&entry.source)
                    .and_then(|m| m.modified())
                    .ok();
                writer.add_directory(&entry.archive_name, modified)?;
            }
        }
        progress.on_entry_complete(name);
    }

    let (buffered, mut report) = writer.finish()?;
    buffered
        .into_inner()
        .map_err(std::io::IntoInnerError::into_error)?
        .sync_all()?;

    report.files_skipped += plan.skipped;
    for warning in &plan.warnings {
        report.add_warning(warning.clone());
    }
    report.duration = start.elapsed();
    progress.on_complete();

    tracing::info!(
        files = report.files_added,
        directories = report.directories_added,
        skipped = report.files_skipped,
        bytes = report.bytes_compressed,
        "archive written"
    );
    Ok(report)
}
