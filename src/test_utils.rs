use crate::scan::ScanSource;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared I/O call counters for a `CountingSource`.
#[derive(Debug, Default)]
pub struct IoCounters {
    seeks: AtomicUsize,
    reads: AtomicUsize,
    size_queries: AtomicUsize,
}

impl IoCounters {
    pub fn seeks(&self) -> usize {
        self.seeks.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn size_queries(&self) -> usize {
        self.size_queries.load(Ordering::SeqCst)
    }
}

/// ScanSource double that counts every seek, read, and size query.
pub struct CountingSource<S> {
    inner: S,
    counters: Arc<IoCounters>,
}

impl<S> CountingSource<S> {
    pub fn new(inner: S) -> (Self, Arc<IoCounters>) {
        let counters = Arc::new(IoCounters::default());
        (
            Self {
                inner,
                counters: counters.clone(),
            },
            counters,
        )
    }
}

impl<S: Read> Read for CountingSource<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.counters.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(buf)
    }
}

impl<S: Seek> Seek for CountingSource<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.counters.seeks.fetch_add(1, Ordering::SeqCst);
        self.inner.seek(pos)
    }
}

impl<S: ScanSource> ScanSource for CountingSource<S> {
    fn byte_len(&mut self) -> io::Result<u64> {
        self.counters.size_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.byte_len()
    }
}

/// ScanSource double whose reads always fail.
pub struct FailingSource {
    inner: Cursor<Vec<u8>>,
}

impl FailingSource {
    pub fn new(content: Vec<u8>) -> Self {
        Self {
            inner: Cursor::new(content),
        }
    }
}

impl Read for FailingSource {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "injected read failure"))
    }
}

impl Seek for FailingSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl ScanSource for FailingSource {
    fn byte_len(&mut self) -> io::Result<u64> {
        self.inner.byte_len()
    }
}
