// Library interface for revtail
// Exposes the backward scan core, decoding, and the tail facade

pub mod cancel;
pub mod decode;
pub mod scan;
pub mod tail;

#[cfg(test)]
pub mod test_utils;
