//! Text decoding configuration for emitted byte ranges.
//!
//! Follows the WHATWG TextDecoder surface: an encoding label, a fatal
//! flag (fail on malformed input instead of substituting U+FFFD), and a
//! flag to keep a leading byte order mark. Each line is decoded
//! independently, so BOM handling applies per line.

use encoding_rs::Encoding;
use std::fmt;

/// A byte sequence that is not valid under the configured encoding.
///
/// Only produced in fatal mode; lenient decoding substitutes U+FFFD.
#[derive(Debug)]
pub struct DecodeError {
    encoding: &'static str,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid byte sequence for encoding {}", self.encoding)
    }
}

impl std::error::Error for DecodeError {}

/// How emitted byte ranges are decoded into text.
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    encoding: &'static Encoding,
    fatal: bool,
    ignore_bom: bool,
}

impl DecodeOptions {
    /// Lenient UTF-8 with BOM stripping (the TextDecoder defaults)
    pub fn new() -> Self {
        Self {
            encoding: encoding_rs::UTF_8,
            fatal: false,
            ignore_bom: false,
        }
    }

    /// Resolve a WHATWG encoding label (e.g. "utf-8", "windows-1252")
    ///
    /// Returns None for unknown labels and for labels that map to the
    /// replacement encoding.
    pub fn for_label(label: &str) -> Option<Self> {
        let encoding = Encoding::for_label_no_replacement(label.as_bytes())?;
        Some(Self {
            encoding,
            ..Self::new()
        })
    }

    /// Fail on malformed input instead of substituting U+FFFD
    pub fn with_fatal(mut self, fatal: bool) -> Self {
        self.fatal = fatal;
        self
    }

    /// Keep a leading byte order mark instead of stripping it
    pub fn with_ignore_bom(mut self, ignore_bom: bool) -> Self {
        self.ignore_bom = ignore_bom;
        self
    }

    /// Canonical name of the configured encoding
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decode one line's bytes under this configuration
    pub fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        let bytes = if self.ignore_bom {
            bytes
        } else {
            self.strip_bom(bytes)
        };
        if self.fatal {
            match self
                .encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
            {
                Some(text) => Ok(text.into_owned()),
                None => Err(DecodeError {
                    encoding: self.encoding.name(),
                }),
            }
        } else {
            Ok(self.encoding.decode_without_bom_handling(bytes).0.into_owned())
        }
    }

    /// Strip the BOM only when it matches the configured encoding
    fn strip_bom<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        if self.encoding == encoding_rs::UTF_8 && bytes.starts_with(b"\xEF\xBB\xBF") {
            &bytes[3..]
        } else if self.encoding == encoding_rs::UTF_16LE && bytes.starts_with(b"\xFF\xFE") {
            &bytes[2..]
        } else if self.encoding == encoding_rs::UTF_16BE && bytes.starts_with(b"\xFE\xFF") {
            &bytes[2..]
        } else {
            bytes
        }
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}
