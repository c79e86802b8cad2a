//! I/O helpers used while writing archives.

pub mod checksum;
pub mod counting;

pub use checksum::checksum_reader;
pub use counting::CountingWriter;
