//! Serialization backends: one module per output format.
//!
//! Each writer pulls one record at a time off the [`RecordReader`] and
//! flushes it before requesting the next, so memory stays bounded by a
//! single record. The CSV writer is the exception in spirit: its column
//! header comes from a separate statistics pre-pass the caller runs
//! before handing over a fresh reader.
//!
//! [`RecordReader`]: libhvu::RecordReader

pub mod csv;
pub mod json;
pub mod xml;

use libhvu::HvuError;
use thiserror::Error;

/// Progress is logged every this many records.
pub const TRACE_EVERY: u64 = 10_000;

/// Result type for conversion runs.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Error type for conversion runs.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Failure in the decoding pass (open, read, or encoding).
    #[error(transparent)]
    Stream(#[from] HvuError),

    /// Failure writing the output stream.
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure in the JSON serializer.
    #[error("json write error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure in the CSV serializer.
    #[error("csv write error: {0}")]
    Csv(#[from] ::csv::Error),

    /// Failure in the XML serializer.
    #[error("xml write error: {0}")]
    Xml(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use libhvu::{resolve_encoding, FieldStats, LineReader, RecordReader};
    use std::io::Cursor;

    const SAMPLE: &str = "\
        R  EMPLOYEE                     <<< record # 1 >>>\n\
        V  NAME(1)=Alice\n\
        V  PHONE(1)=111\n\
        V  PHONE(2)=222\n\
        R  EMPLOYEE                     <<< record # 2 >>>\n\
        V  NAME(1)=Bob\n\
        R  DEPARTMENT                   <<< record # 3 >>>\n\
        V  DEPTNAME(1)=Sales\n";

    fn sample_reader() -> RecordReader<Cursor<Vec<u8>>> {
        let encoding = resolve_encoding("UTF-8").unwrap();
        RecordReader::new(LineReader::new(
            Cursor::new(SAMPLE.as_bytes().to_vec()),
            encoding,
        ))
    }

    #[test]
    fn test_all_writers_agree_on_record_count() {
        let mut out = Vec::new();
        let json_count = json::write(&mut sample_reader(), &mut out).unwrap();

        let mut out = Vec::new();
        let xml_count = xml::write(&mut sample_reader(), &mut out).unwrap();

        let encoding = resolve_encoding("UTF-8").unwrap();
        let mut lines = LineReader::new(Cursor::new(SAMPLE.as_bytes().to_vec()), encoding);
        let header = FieldStats::collect(&mut lines).unwrap().header();
        let mut out = Vec::new();
        let csv_count = csv::write(&mut sample_reader(), &header, b'#', &mut out).unwrap();

        assert_eq!(json_count, 3);
        assert_eq!(xml_count, 3);
        assert_eq!(csv_count, 3);
    }
}
