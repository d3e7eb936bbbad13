//! Error types for hvu stream decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for hvu decoding operations.
pub type Result<T> = std::result::Result<T, HvuError>;

/// Error type for hvu stream decoding.
///
/// Malformed lines are not represented here: the decoder recovers from
/// them locally and only counts them. The variants below are the fatal
/// conditions that invalidate the rest of a pass.
#[derive(Error, Debug)]
pub enum HvuError {
    /// An input or output path could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while reading the stream.
    #[error("read error at line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: std::io::Error,
    },

    /// A byte sequence that is invalid under the selected encoding.
    /// The whole pass fails; the caller must rerun with another encoding.
    #[error("undecodable byte sequence at line {line}; try another encoding (used {encoding})")]
    Decoding { line: u64, encoding: &'static str },
}
