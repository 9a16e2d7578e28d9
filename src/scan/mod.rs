pub mod offsets;
pub mod stream;

use std::fs::File;
use std::io::{self, Cursor, Read, Seek};

/// Line terminator byte
pub(crate) const LF: u8 = b'\n';

/// Default maximum number of bytes read per backward window (32 KiB)
pub const WINDOW_SIZE: usize = 32 * 1024;

/// Trait for seekable byte sources with a queryable total size
///
/// The scan components take exclusive control of the source's seek
/// position for the duration of a scan. The size is queried once at
/// scan start; behavior for sources that change size mid-scan is
/// undefined (short reads are treated as end of data).
pub trait ScanSource: Read + Seek {
    /// Get total size of the source in bytes
    fn byte_len(&mut self) -> io::Result<u64>;
}

impl ScanSource for File {
    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

impl<T: AsRef<[u8]>> ScanSource for Cursor<T> {
    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.get_ref().as_ref().len() as u64)
    }
}
