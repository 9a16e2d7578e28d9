use super::{ScanSource, LF, WINDOW_SIZE};
use crate::cancel::CancelToken;
use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::io::SeekFrom;

/// Pull-driven producer of a file's lines in last-to-first order
///
/// Reads the source backward in fixed windows and emits each line as an
/// owned byte buffer, terminator excluded. A line that straddles a
/// window boundary is carried in the retained buffer until the window
/// containing its start has been read.
///
/// The stream owns its source and closes it exactly once, by dropping
/// it, when the scan is exhausted, cancelled, or fails. Lines already
/// extracted before a cancellation was observed are still delivered to
/// a consumer that keeps polling; cancellation only prevents further
/// window reads and further extraction.
pub struct RevLines<S: ScanSource> {
    /// The source being scanned; None once the stream has closed
    source: Option<S>,

    /// Cancellation flag, checked at pull start and before each extraction
    cancel: CancelToken,

    /// Maximum bytes read per backward window
    window_size: usize,

    /// Total source size, queried once on the first pull
    size: Option<u64>,

    /// Bytes read but not yet resolved into a complete line
    buf: Vec<u8>,

    /// Index of the next backward window to read
    iteration: u64,

    /// Lines extracted but not yet handed to the consumer
    ready: VecDeque<Vec<u8>>,
}

impl<S: ScanSource> RevLines<S> {
    /// Create a stream over `source` with the default 32 KiB window
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
            cancel: CancelToken::new(),
            window_size: WINDOW_SIZE,
            size: None,
            buf: Vec::new(),
            iteration: 0,
            ready: VecDeque::new(),
        }
    }

    /// Set the window size (bytes read per backward step)
    ///
    /// The window size never affects which lines are emitted, only how
    /// many reads it takes to find them.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        assert!(window_size > 0, "window size must be non-zero");
        self.window_size = window_size;
        self
    }

    /// Share an external cancellation token with this stream
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Drop the source, releasing the file handle (best-effort close)
    fn close(&mut self) {
        self.source = None;
    }

    /// Read one backward window and extract the lines it completes.
    ///
    /// Extracted lines are queued on `ready`; closes the stream when the
    /// source is exhausted or cancellation is observed.
    fn pull(&mut self) -> Result<()> {
        let Some(source) = self.source.as_mut() else {
            return Ok(());
        };

        // Get source size on first pull
        let size = match self.size {
            Some(size) => size,
            None => {
                let size = source.byte_len().context("Failed to query file size")?;
                self.size = Some(size);
                if size == 0 {
                    self.close();
                    return Ok(());
                }
                size
            }
        };

        if self.cancel.is_cancelled() {
            self.close();
            return Ok(());
        }

        let max_read = (self.window_size as u64).min(size);
        let max_iterations = size.div_ceil(max_read);

        // All windows read: whatever is retained is the file's first line
        if self.iteration >= max_iterations {
            if !self.buf.is_empty() {
                let line = std::mem::take(&mut self.buf);
                self.ready.push_back(line);
            }
            self.close();
            return Ok(());
        }

        let mut read_len = max_read;
        if max_iterations > 1 {
            let mut seek_target = (self.iteration + 1) * max_read;
            if seek_target > size {
                read_len = max_read - (seek_target - size);
                seek_target = size;
            }
            source.seek(SeekFrom::End(-(seek_target as i64)))?;
        }

        let mut window = vec![0u8; read_len as usize];
        let read = source.read(&mut window)?;
        if read == 0 {
            self.close();
            return Ok(());
        }
        // A short read is treated as end of data for this pull
        window.truncate(read);

        // A final terminator does not produce a trailing empty line
        if self.iteration == 0 && window.last() == Some(&LF) {
            if window.len() == 1 && max_iterations == 1 {
                // Source is a single empty line
                self.ready.push_back(Vec::new());
                self.close();
                return Ok(());
            }
            window.pop();
        }

        // Working buffer: this window's bytes, then the retained tail
        // from prior windows (which sits later in the file)
        window.extend_from_slice(&self.buf);
        self.buf = window;

        // The final window's buffer is anchored at source offset 0
        let final_window = self.iteration + 1 == max_iterations;

        let mut cursor = self.buf.len();
        loop {
            if self.cancel.is_cancelled() {
                self.close();
                return Ok(());
            }
            match memchr::memrchr(LF, &self.buf[..cursor]) {
                None => {
                    // Source is exactly one line
                    if max_iterations == 1 {
                        self.ready.push_back(self.buf[..cursor].to_vec());
                    }
                    break;
                }
                Some(p) => {
                    self.ready.push_back(self.buf[p + 1..cursor].to_vec());
                    cursor = p;
                    if cursor == 0 {
                        // Terminator at the start of the buffer: only a
                        // terminator at source offset 0 yields a leading
                        // empty line; at an interior window seam the line
                        // is completed by the next window.
                        if final_window {
                            self.ready.push_back(Vec::new());
                        }
                        break;
                    }
                }
            }
        }

        if max_iterations == 1 {
            self.close();
            return Ok(());
        }

        // Shrink to the unresolved head for the next iteration
        self.buf.truncate(cursor);
        self.iteration += 1;

        Ok(())
    }
}

impl<S: ScanSource> Iterator for RevLines<S> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.ready.pop_front() {
                return Some(Ok(line));
            }
            self.source.as_ref()?;
            if let Err(err) = self.pull() {
                // Close before propagating so the handle is released
                // exactly once even on I/O failure
                self.close();
                return Some(Err(err));
            }
        }
    }
}
