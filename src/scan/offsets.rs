use super::{ScanSource, LF, WINDOW_SIZE};
use anyhow::Result;
use std::io::SeekFrom;

/// Eagerly scan a source backward and collect every line-boundary offset.
///
/// Offsets are measured backward from the end of the source (offset 0 is
/// the end, offset `size` is the start) and returned in ascending order,
/// so consecutive pairs delimit lines from last to first: line `i` spans
/// `offsets[i]..offsets[i+1]` counted from the end. The list always
/// starts with `0` and ends with the total size; an empty source yields
/// `[0]`.
///
/// `max_offsets` is a scan-stop hint checked once per window, so the
/// result may exceed it by however many boundaries the final window
/// contributed.
///
/// Superseded by [`stream::RevLines`](super::stream::RevLines) for
/// production use; kept as the eager all-offsets form.
pub fn read_offsets<S: ScanSource>(source: &mut S, max_offsets: usize) -> Result<Vec<u64>> {
    scan_with_window(source, max_offsets, WINDOW_SIZE)
}

fn scan_with_window<S: ScanSource>(
    source: &mut S,
    max_offsets: usize,
    window_size: usize,
) -> Result<Vec<u64>> {
    let size = source.byte_len()?;
    if size == 0 {
        return Ok(vec![0]);
    }

    let max_read = (window_size as u64).min(size);
    let iterations = size.div_ceil(max_read);
    let mut offsets: Vec<u64> = Vec::new();
    let mut window = vec![0u8; max_read as usize];

    for i in 0..iterations {
        let mut read_len = max_read;
        let mut seek_target = (i + 1) * max_read;
        if seek_target > size {
            read_len = max_read - (seek_target - size);
            seek_target = size;
        }

        source.seek(SeekFrom::End(-(seek_target as i64)))?;
        let read = source.read(&mut window[..read_len as usize])?;
        if read == 0 {
            break;
        }

        // Backward within the window keeps the combined list ascending:
        // a terminator at window index p starts a line at end-relative
        // offset seek_target - p - 1.
        for p in memchr::memrchr_iter(LF, &window[..read]) {
            offsets.push(seek_target - p as u64 - 1);
        }

        if offsets.len() >= max_offsets {
            break;
        }
    }

    if offsets.first() != Some(&0) {
        offsets.insert(0, 0);
    }
    if offsets.last() != Some(&size) {
        offsets.push(size);
    }

    Ok(offsets)
}
