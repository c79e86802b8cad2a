//! ZIP container writer.
//!
//! Writes classic (non-ZIP64) archives: local headers, deflated and
//! ZipCrypto-encrypted file data, a central directory and the end record.
//! Entry names are encoded with the configured charset instead of always
//! UTF-8, which legacy extractors expect.

use crate::PpapError;
use crate::ProgressCallback;
use crate::Result;
use crate::archive::ArchiveOptions;
use crate::archive::zipcrypto::ZipCryptoWriter;
use crate::io::CountingWriter;
use crate::io::checksum_reader;
use crate::report::CreationReport;
use chrono::DateTime;
use chrono::Datelike;
use chrono::Local;
use chrono::Timelike;
use encoding_rs::EncoderResult;
use encoding_rs::Encoding;
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;
use std::time::SystemTime;

const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4B50;
const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4B50;
const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0605_4B50;

/// Version 2.0: deflate and traditional encryption.
const VERSION_NEEDED: u16 = 20;
const VERSION_MADE_BY: u16 = 20;

const FLAG_ENCRYPTED: u16 = 1;
const FLAG_UTF8: u16 = 1 << 11;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATED: u16 = 8;

const ATTRIBUTE_DIRECTORY: u32 = 0x10;
const ATTRIBUTE_ARCHIVE: u32 = 0x20;

/// Offset of the compressed-size field inside a local header.
const LOCAL_COMPRESSED_SIZE_OFFSET: u64 = 18;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Central directory record kept until the archive is finished.
#[derive(Debug, Clone)]
struct CentralRecord {
    name: Vec<u8>,
    flags: u16,
    method: u16,
    time: u16,
    date: u16,
    crc: u32,
    compressed_size: u32,
    uncompressed_size: u32,
    external_attributes: u32,
    offset: u32,
}

/// Streams entries into a ZIP archive.
///
/// # Examples
///
/// ```no_run
/// use ppap_core::NoopProgress;
/// use ppap_core::archive::ArchiveOptions;
/// use ppap_core::archive::ArchiveWriter;
/// use std::fs::File;
/// use std::path::Path;
///
/// let options = ArchiveOptions::new("s3cret");
/// let mut writer = ArchiveWriter::new(File::create("out.zip")?, options);
/// writer.add_directory("docs/", None)?;
/// writer.add_file(Path::new("docs/a.txt"), "docs/a.txt", &mut NoopProgress)?;
/// let (_file, report) = writer.finish()?;
/// println!("{} files", report.files_added);
/// # Ok::<(), ppap_core::PpapError>(())
/// ```
pub struct ArchiveWriter<W: Write + Seek> {
    inner: W,
    options: ArchiveOptions,
    records: Vec<CentralRecord>,
    buffer: Vec<u8>,
    report: CreationReport,
}

impl<W: Write + Seek> ArchiveWriter<W> {
    /// Creates a writer that appends the archive to `inner`.
    pub fn new(inner: W, options: ArchiveOptions) -> Self {
        Self {
            inner,
            options,
            records: Vec::new(),
            buffer: vec![0u8; COPY_BUFFER_SIZE],
            report: CreationReport::default(),
        }
    }

    /// Adds a regular file, compressed and encrypted.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, changes size while it
    /// is being archived, or exceeds the 4 GiB limit.
    pub fn add_file(
        &mut self,
        source: &Path,
        archive_name: &str,
        progress: &mut dyn ProgressCallback,
    ) -> Result<()> {
        let mut file = File::open(source)?;
        let modified = file.metadata()?.modified().ok();
        let (time, date) = dos_date_time(modified);

        let (crc, size) = checksum_reader(&mut file, &mut self.buffer)?;
        let uncompressed_size = to_u32(size, || {
            format!("{} is larger than 4 GiB", source.display())
        })?;
        file.seek(SeekFrom::Start(0))?;

        let (name, flags) = self.encode_name(archive_name);
        let flags = flags | FLAG_ENCRYPTED;
        let offset = self.current_offset()?;

        write_local_header(
            &mut self.inner,
            &LocalHeader {
                name: &name,
                flags,
                method: METHOD_DEFLATED,
                time,
                date,
                crc,
                compressed_size: 0,
                uncompressed_size,
            },
        )?;

        let mut consumed = 0u64;
        let counting = CountingWriter::new(&mut self.inner);
        let encryptor = ZipCryptoWriter::new(counting, self.options.password_bytes(), crc)?;
        let mut deflater = DeflateEncoder::new(
            encryptor,
            Compression::new(u32::from(self.options.compression_level())),
        );
        loop {
            let read = file.read(&mut self.buffer)?;
            if read == 0 {
                break;
            }
            deflater.write_all(&self.buffer[..read])?;
            consumed += read as u64;
            progress.on_bytes_written(read as u64);
        }
        let compressed = deflater.finish()?.into_inner().total_bytes();

        if consumed != size {
            return Err(PpapError::Io(std::io::Error::other(format!(
                "{} changed while it was being archived",
                source.display()
            ))));
        }
        let compressed_size = to_u32(compressed, || {
            format!("compressed {} is larger than 4 GiB", source.display())
        })?;

        let end = self.inner.stream_position()?;
        self.inner
            .seek(SeekFrom::Start(u64::from(offset) + LOCAL_COMPRESSED_SIZE_OFFSET))?;
        self.inner.write_all(&compressed_size.to_le_bytes())?;
        self.inner.seek(SeekFrom::Start(end))?;

        self.records.push(CentralRecord {
            name,
            flags,
            method: METHOD_DEFLATED,
            time,
            date,
            crc,
            compressed_size,
            uncompressed_size,
            external_attributes: ATTRIBUTE_ARCHIVE,
            offset,
        });
        self.report.files_added += 1;
        self.report.bytes_written += size;

        Ok(())
    }

    /// Adds an empty directory entry. `archive_name` must end with `/`.
    ///
    /// Directory entries carry no data and are not encrypted.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written.
    pub fn add_directory(&mut self, archive_name: &str, modified: Option<SystemTime>) -> Result<()> {
        let (time, date) = dos_date_time(modified);
        let (name, flags) = self.encode_name(archive_name);
        let offset = self.current_offset()?;

        write_local_header(
            &mut self.inner,
            &LocalHeader {
                name: &name,
                flags,
                method: METHOD_STORED,
                time,
                date,
                crc: 0,
                compressed_size: 0,
                uncompressed_size: 0,
            },
        )?;

        self.records.push(CentralRecord {
            name,
            flags,
            method: METHOD_STORED,
            time,
            date,
            crc: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            external_attributes: ATTRIBUTE_DIRECTORY,
            offset,
        });
        self.report.directories_added += 1;

        Ok(())
    }

    /// Writes the central directory and returns the inner writer with the
    /// report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or the archive has more entries
    /// or bytes than the classic format allows.
    pub fn finish(mut self) -> Result<(W, CreationReport)> {
        let entry_count = u16::try_from(self.records.len()).map_err(|_| PpapError::ArchiveTooLarge {
            reason: format!("{} entries exceed the limit of 65535", self.records.len()),
        })?;

        let directory_offset = self.current_offset()?;
        let mut directory = CountingWriter::new(&mut self.inner);
        for record in &self.records {
            write_central_header(&mut directory, record)?;
        }
        let directory_size = to_u32(directory.total_bytes(), || {
            "central directory is larger than 4 GiB".to_string()
        })?;

        write_u32(&mut self.inner, END_OF_CENTRAL_DIRECTORY_SIGNATURE)?;
        write_u16(&mut self.inner, 0)?;
        write_u16(&mut self.inner, 0)?;
        write_u16(&mut self.inner, entry_count)?;
        write_u16(&mut self.inner, entry_count)?;
        write_u32(&mut self.inner, directory_size)?;
        write_u32(&mut self.inner, directory_offset)?;
        write_u16(&mut self.inner, 0)?;
        self.inner.flush()?;

        self.report.bytes_compressed = self.inner.stream_position()?;
        Ok((self.inner, self.report))
    }

    /// Encodes an entry name, returning its bytes and the UTF-8 flag.
    fn encode_name(&mut self, archive_name: &str) -> (Vec<u8>, u16) {
        let charset = self.options.charset();
        let (bytes, had_errors) = encode_lossy(charset, archive_name);
        if had_errors {
            tracing::debug!(name = archive_name, charset = charset.name(), "unmappable entry name");
            self.report.add_warning(format!(
                "Entry name {archive_name} cannot be represented in {}",
                charset.name()
            ));
        }

        let flags = if charset.output_encoding() == encoding_rs::UTF_8 {
            FLAG_UTF8
        } else {
            0
        };
        (bytes, flags)
    }

    fn current_offset(&mut self) -> Result<u32> {
        let position = self.inner.stream_position()?;
        to_u32(position, || "archive is larger than 4 GiB".to_string())
    }
}

struct LocalHeader<'a> {
    name: &'a [u8],
    flags: u16,
    method: u16,
    time: u16,
    date: u16,
    crc: u32,
    compressed_size: u32,
    uncompressed_size: u32,
}

fn write_local_header<W: Write>(w: &mut W, header: &LocalHeader<'_>) -> Result<()> {
    let name_len = name_length(header.name)?;
    write_u32(w, LOCAL_HEADER_SIGNATURE)?;
    write_u16(w, VERSION_NEEDED)?;
    write_u16(w, header.flags)?;
    write_u16(w, header.method)?;
    write_u16(w, header.time)?;
    write_u16(w, header.date)?;
    write_u32(w, header.crc)?;
    write_u32(w, header.compressed_size)?;
    write_u32(w, header.uncompressed_size)?;
    write_u16(w, name_len)?;
    write_u16(w, 0)?;
    w.write_all(header.name)?;
    Ok(())
}

fn write_central_header<W: Write>(w: &mut W, record: &CentralRecord) -> Result<()> {
    let name_len = name_length(&record.name)?;
    write_u32(w, CENTRAL_HEADER_SIGNATURE)?;
    write_u16(w, VERSION_MADE_BY)?;
    write_u16(w, VERSION_NEEDED)?;
    write_u16(w, record.flags)?;
    write_u16(w, record.method)?;
    write_u16(w, record.time)?;
    write_u16(w, record.date)?;
    write_u32(w, record.crc)?;
    write_u32(w, record.compressed_size)?;
    write_u32(w, record.uncompressed_size)?;
    write_u16(w, name_len)?;
    // extra field, comment, disk number, internal attributes
    write_u16(w, 0)?;
    write_u16(w, 0)?;
    write_u16(w, 0)?;
    write_u16(w, 0)?;
    write_u32(w, record.external_attributes)?;
    write_u32(w, record.offset)?;
    w.write_all(&record.name)?;
    Ok(())
}

/// Encodes `text`, replacing each unmappable character with `?`.
///
/// Returns the bytes and whether any replacement happened.
fn encode_lossy(charset: &'static Encoding, text: &str) -> (Vec<u8>, bool) {
    let mut encoder = charset.new_encoder();
    let mut out = Vec::with_capacity(text.len() + 8);
    let mut had_errors = false;
    let mut rest = text;

    loop {
        let needed = encoder
            .max_buffer_length_from_utf8_without_replacement(rest.len())
            .unwrap_or(rest.len() * 4 + 16);
        out.reserve(needed);
        let (result, read) = encoder.encode_from_utf8_to_vec_without_replacement(rest, &mut out, true);
        rest = &rest[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => {
                had_errors = true;
                out.push(b'?');
            }
        }
    }
    (out, had_errors)
}

fn name_length(name: &[u8]) -> Result<u16> {
    u16::try_from(name.len()).map_err(|_| PpapError::ArchiveTooLarge {
        reason: format!("entry name of {} bytes is too long", name.len()),
    })
}

fn to_u32(value: u64, reason: impl FnOnce() -> String) -> Result<u32> {
    u32::try_from(value).map_err(|_| PpapError::ArchiveTooLarge { reason: reason() })
}

fn write_u16<W: Write>(w: &mut W, value: u16) -> std::io::Result<()> {
    w.write_all(&value.to_le_bytes())
}

fn write_u32<W: Write>(w: &mut W, value: u32) -> std::io::Result<()> {
    w.write_all(&value.to_le_bytes())
}

/// Converts a modification time to MS-DOS `(time, date)` in local time.
///
/// Times before 1980 are clamped to 1980-01-01 00:00:00, the earliest
/// representable value. A missing time uses the current time.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn dos_date_time(modified: Option<SystemTime>) -> (u16, u16) {
    let local: DateTime<Local> = modified.unwrap_or_else(SystemTime::now).into();
    let year = local.year();
    if year < 1980 {
        return (0, (1 << 5) | 1);
    }

    let year = (year.min(2107) - 1980) as u16;
    let time = ((local.hour() as u16) << 11)
        | ((local.minute() as u16) << 5)
        | ((local.second() as u16) / 2);
    let date = (year << 9) | ((local.month() as u16) << 5) | (local.day() as u16);
    (time, date)
}
