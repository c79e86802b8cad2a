//! CRC-32 pre-pass over entry data.
//!
//! Traditional ZIP encryption stores the high byte of the entry CRC in the
//! encryption header, so the checksum must be known before any data is
//! written.

use std::io::Read;

/// Reads `reader` to the end, returning its CRC-32 and length.
///
/// `buffer` is reused across calls to avoid reallocating per entry.
///
/// # Examples
///
/// ```
/// use ppap_core::io::checksum_reader;
///
/// let mut buffer = vec![0u8; 16];
/// let (crc, len) = checksum_reader(&b"123456789"[..], &mut buffer)?;
/// assert_eq!(crc, 0xCBF4_3926);
/// assert_eq!(len, 9);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn checksum_reader<R: Read>(mut reader: R, buffer: &mut [u8]) -> std::io::Result<(u32, u64)> {
    let mut hasher = crc32fast::Hasher::new();
    let mut len = 0u64;
    loop {
        let read = match reader.read(buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
        len += read as u64;
    }
    Ok((hasher.finalize(), len))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let mut buffer = vec![0u8; 8];
        assert_eq!(checksum_reader(&b""[..], &mut buffer).unwrap(), (0, 0));
    }

    #[test]
    fn test_input_longer_than_buffer() {
        let data = vec![7u8; 100];
        let mut small = vec![0u8; 3];
        let mut large = vec![0u8; 4096];
        let a = checksum_reader(&data[..], &mut small).unwrap();
        let b = checksum_reader(&data[..], &mut large).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.1, 100);
        assert_eq!(a.0, crc32fast::hash(&data));
    }
}
