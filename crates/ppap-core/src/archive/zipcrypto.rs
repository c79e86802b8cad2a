//! Traditional PKWARE encryption ("ZipCrypto").
//!
//! The cipher is a byte-oriented stream cipher keyed from the password
//! through three 32-bit registers. Every encrypted entry starts with a
//! 12-byte header of random bytes whose last byte is the high byte of the
//! entry CRC-32, which readers use as a password check.
//!
//! ZipCrypto is weak. It is provided for compatibility with consumers that
//! cannot read AES-encrypted entries.

use rand::Rng;
use std::io;
use std::io::Write;

/// Size of the encryption header preceding entry data.
pub const ENCRYPTION_HEADER_SIZE: usize = 12;

const KEY0: u32 = 0x1234_5678;
const KEY1: u32 = 0x2345_6789;
const KEY2: u32 = 0x3456_7890;

static CRC_TABLE: [u32; 256] = crc_table();

const fn crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        #[allow(clippy::cast_possible_truncation)]
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 == 1 {
                0xEDB8_8320 ^ (crc >> 1)
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

fn crc32_step(crc: u32, byte: u8) -> u32 {
    CRC_TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize] ^ (crc >> 8)
}

/// The three cipher registers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZipCryptoKeys {
    k0: u32,
    k1: u32,
    k2: u32,
}

impl ZipCryptoKeys {
    /// Initializes the registers from a password.
    #[must_use]
    pub fn new(password: &[u8]) -> Self {
        let mut keys = Self {
            k0: KEY0,
            k1: KEY1,
            k2: KEY2,
        };
        for &byte in password {
            keys.update(byte);
        }
        keys
    }

    fn update(&mut self, byte: u8) {
        self.k0 = crc32_step(self.k0, byte);
        self.k1 = self
            .k1
            .wrapping_add(self.k0 & 0xFF)
            .wrapping_mul(134_775_813)
            .wrapping_add(1);
        self.k2 = crc32_step(self.k2, (self.k1 >> 24) as u8);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn keystream_byte(&self) -> u8 {
        let temp = (self.k2 | 2) as u16;
        (temp.wrapping_mul(temp ^ 1) >> 8) as u8
    }

    /// Encrypts one byte and advances the registers.
    pub fn encrypt_byte(&mut self, plain: u8) -> u8 {
        let cipher = plain ^ self.keystream_byte();
        self.update(plain);
        cipher
    }

    /// Decrypts one byte and advances the registers.
    pub fn decrypt_byte(&mut self, cipher: u8) -> u8 {
        let plain = cipher ^ self.keystream_byte();
        self.update(plain);
        plain
    }
}

/// Writer that encrypts everything written through it.
///
/// The encryption header is written on construction.
///
/// # Examples
///
/// ```
/// use ppap_core::archive::zipcrypto::ENCRYPTION_HEADER_SIZE;
/// use ppap_core::archive::zipcrypto::ZipCryptoWriter;
/// use std::io::Write;
///
/// let crc = crc32fast::hash(b"secret data");
/// let mut writer = ZipCryptoWriter::new(Vec::new(), b"password", crc)?;
/// writer.write_all(b"secret data")?;
/// let encrypted = writer.into_inner();
/// assert_eq!(encrypted.len(), ENCRYPTION_HEADER_SIZE + 11);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct ZipCryptoWriter<W> {
    inner: W,
    keys: ZipCryptoKeys,
    buffer: Vec<u8>,
}

impl<W: Write> ZipCryptoWriter<W> {
    /// Starts an encrypted entry whose plaintext has the given CRC-32.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be written.
    pub fn new(inner: W, password: &[u8], crc: u32) -> io::Result<Self> {
        let mut header = [0u8; ENCRYPTION_HEADER_SIZE];
        rand::rng().fill(&mut header[..ENCRYPTION_HEADER_SIZE - 1]);
        Self::with_header(inner, password, crc, header)
    }

    /// Starts an encrypted entry with caller-supplied header bytes.
    ///
    /// The last header byte is replaced by the CRC check byte.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be written.
    pub fn with_header(
        mut inner: W,
        password: &[u8],
        crc: u32,
        mut header: [u8; ENCRYPTION_HEADER_SIZE],
    ) -> io::Result<Self> {
        let mut keys = ZipCryptoKeys::new(password);
        header[ENCRYPTION_HEADER_SIZE - 1] = (crc >> 24) as u8;
        for byte in &mut header {
            *byte = keys.encrypt_byte(*byte);
        }
        inner.write_all(&header)?;

        Ok(Self {
            inner,
            keys,
            buffer: Vec::new(),
        })
    }

    /// Consumes the writer and returns the inner writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for ZipCryptoWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Self {
            inner,
            keys,
            buffer,
        } = self;
        buffer.clear();
        buffer.extend(buf.iter().map(|&byte| keys.encrypt_byte(byte)));
        inner.write_all(buffer)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn decrypt(password: &[u8], data: &[u8]) -> Vec<u8> {
        let mut keys = ZipCryptoKeys::new(password);
        data.iter().map(|&byte| keys.decrypt_byte(byte)).collect()
    }

    #[test]
    fn test_crc_table_matches_crc32() {
        let mut crc = 0xFFFF_FFFF;
        for &byte in b"123456789" {
            crc = crc32_step(crc, byte);
        }
        assert_eq!(!crc, 0xCBF4_3926);
    }

    #[test]
    fn test_decrypts_back_to_plaintext() {
        let plain = b"The quick brown fox jumps over the lazy dog";
        let crc = crc32fast::hash(plain);
        let mut writer = ZipCryptoWriter::new(Vec::new(), b"pw", crc).unwrap();
        writer.write_all(plain).unwrap();
        let encrypted = writer.into_inner();

        let decrypted = decrypt(b"pw", &encrypted);
        assert_eq!(&decrypted[ENCRYPTION_HEADER_SIZE..], plain);
        assert_eq!(decrypted[ENCRYPTION_HEADER_SIZE - 1], (crc >> 24) as u8);
    }

    #[test]
    fn test_wrong_password_garbles_header() {
        let crc = 0xAB00_0000;
        let writer =
            ZipCryptoWriter::with_header(Vec::new(), b"right", crc, [0x55; ENCRYPTION_HEADER_SIZE])
                .unwrap();
        let encrypted = writer.into_inner();

        let mut expected = [0x55; ENCRYPTION_HEADER_SIZE];
        expected[ENCRYPTION_HEADER_SIZE - 1] = 0xAB;
        assert_eq!(decrypt(b"right", &encrypted), expected);
        assert_ne!(decrypt(b"wrong", &encrypted), expected);
    }

    #[test]
    fn test_output_is_deterministic_for_fixed_header() {
        let header = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0];
        let encrypt = || {
            let mut writer = ZipCryptoWriter::with_header(Vec::new(), b"pw", 0, header).unwrap();
            writer.write_all(b"abc").unwrap();
            writer.into_inner()
        };
        assert_eq!(encrypt(), encrypt());
        assert_ne!(&encrypt()[ENCRYPTION_HEADER_SIZE..], b"abc");
    }

    #[test]
    fn test_password_changes_keys() {
        assert_ne!(ZipCryptoKeys::new(b"a"), ZipCryptoKeys::new(b"b"));
        assert_eq!(ZipCryptoKeys::new(b""), ZipCryptoKeys::new(b""));
    }
}
