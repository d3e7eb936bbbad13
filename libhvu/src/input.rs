//! Encoding-aware line input.
//!
//! hvu dumps come from systems where ISO-8859-1 is the customary text
//! encoding, with UTF-8 the other one seen in practice. The reader pulls
//! raw bytes one line at a time and decodes each line under the selected
//! encoding without replacement, so a byte sequence the encoding cannot
//! represent surfaces as a hard [`HvuError::Decoding`] carrying the line
//! count reached.

use crate::error::{HvuError, Result};
use encoding_rs::Encoding;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Default encoding label, matching the usual Windows-originated dumps.
pub const DEFAULT_ENCODING: &str = "ISO-8859-1";

/// Resolve an encoding label such as `UTF-8` or `ISO-8859-1`.
pub fn resolve_encoding(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
}

/// Buffered, decoding line reader over an hvu byte stream.
pub struct LineReader<R> {
    input: R,
    encoding: &'static Encoding,
    line_count: u64,
    buf: Vec<u8>,
}

impl LineReader<BufReader<File>> {
    /// Open a file for reading under the given encoding.
    pub fn open(path: &Path, encoding: &'static Encoding) -> Result<Self> {
        let file = File::open(path).map_err(|source| HvuError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file), encoding))
    }
}

impl<R: BufRead> LineReader<R> {
    pub fn new(input: R, encoding: &'static Encoding) -> Self {
        Self {
            input,
            encoding,
            line_count: 0,
            buf: Vec::new(),
        }
    }

    /// Number of physical lines consumed so far.
    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Read and decode the next line, stripping the line break and any
    /// trailing whitespace (dumps frequently carry stray `\r`).
    /// Returns `None` once the stream is exhausted.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        let read = self
            .input
            .read_until(b'\n', &mut self.buf)
            .map_err(|source| HvuError::Read {
                line: self.line_count,
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_count += 1;
        match self
            .encoding
            .decode_without_bom_handling_and_without_replacement(&self.buf)
        {
            Some(text) => Ok(Some(text.trim_end().to_string())),
            None => Err(HvuError::Decoding {
                line: self.line_count,
                encoding: self.encoding.name(),
            }),
        }
    }
}
