//! Streaming decoder for the legacy LCS "hvu" stream dump format.
//!
//! An hvu dump is a flat, line-oriented rendition of hierarchical
//! database records: one physical line per field occurrence or record
//! marker, disambiguated by a one-character leading tag. This crate
//! reconstructs the records without holding more than one of them in
//! memory.
//!
//! # Decoding Pipeline
//!
//! 1. **Line input**: reads raw bytes line by line and decodes them
//!    under a caller-selected encoding (ISO-8859-1 by default).
//!
//! 2. **Line classification**: categorizes each line by its leading tag
//!    and extracts the payload that kind of line carries.
//!
//! 3. **Record assembly**: folds the classified stream into one record
//!    at a time, merging repeated field occurrences into ordered lists
//!    and multi-line text into one value.
//!
//! An independent statistics pass counts field-name references without
//! assembling records; it doubles as the pre-pass that fixes the column
//! header for tabular output.

mod error;
mod input;
mod line;
mod reader;
mod stats;
mod value;

pub use encoding_rs::Encoding;
pub use error::{HvuError, Result};
pub use input::{resolve_encoding, LineReader, DEFAULT_ENCODING};
pub use line::{classify, LineKind};
pub use reader::RecordReader;
pub use stats::{FieldStats, TagTally};
pub use value::{FieldValue, Record, Scalar};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Open a dump file and return a record reader over it.
pub fn open_records(
    path: &Path,
    encoding: &'static Encoding,
) -> Result<RecordReader<BufReader<File>>> {
    Ok(RecordReader::new(LineReader::open(path, encoding)?))
}
