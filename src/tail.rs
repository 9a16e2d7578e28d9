use crate::cancel::CancelToken;
use crate::decode::DecodeOptions;
use crate::scan::stream::RevLines;
use crate::scan::ScanSource;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;

/// Lazy iterator over the last `max_lines` decoded lines, newest first
///
/// Cancels the underlying stream once the requested count has been
/// yielded, so no window is read beyond what the count required. A line
/// that fails strict decoding surfaces as an `Err` item and does not
/// count toward the limit; iteration may continue past it.
pub struct TailLines<S: ScanSource> {
    stream: RevLines<S>,
    cancel: CancelToken,
    options: DecodeOptions,
    remaining: usize,
}

/// Stream the last `max_lines` lines of `source` in last-to-first order
///
/// `max_lines == 0` yields nothing and performs no I/O.
pub fn tail_lines<S: ScanSource>(
    source: S,
    max_lines: usize,
    options: DecodeOptions,
) -> TailLines<S> {
    let cancel = CancelToken::new();
    let stream = RevLines::new(source).with_cancel_token(cancel.clone());
    TailLines {
        stream,
        cancel,
        options,
        remaining: max_lines,
    }
}

impl<S: ScanSource> Iterator for TailLines<S> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let bytes = match self.stream.next()? {
            Ok(bytes) => bytes,
            Err(err) => return Some(Err(err)),
        };
        match self.options.decode(&bytes) {
            Ok(text) => {
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.cancel.cancel();
                }
                Some(Ok(text))
            }
            Err(err) => Some(Err(err.into())),
        }
    }
}

/// Collect the last `max_lines` lines of the file at `path` in file order
///
/// The trailing section reads top-to-bottom, as `tail(1)` prints it.
pub fn tail<P: AsRef<Path>>(path: P, max_lines: usize, options: DecodeOptions) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).context(format!("Failed to open file: {}", path.display()))?;

    let mut lines = tail_lines(file, max_lines, options).collect::<Result<Vec<_>>>()?;
    lines.reverse();
    Ok(lines)
}
