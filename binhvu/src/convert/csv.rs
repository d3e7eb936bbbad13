//! CSV serialization.
//!
//! The column set must be stable across the whole file, so the caller
//! first runs the statistics pre-pass over the input to collect every
//! referenced field name, then reopens the input and hands this writer
//! the sorted header. Every row carries exactly the header's columns;
//! fields absent from a record are empty cells.
//!
//! The dialect follows the historic exports: a single-character column
//! delimiter (`#` unless overridden), single-quote quoting only when a
//! cell needs it, and backslash escaping.

use super::{Result, TRACE_EVERY};
use csv::WriterBuilder;
use libhvu::{FieldValue, Record, RecordReader};
use log::info;
use std::io::{BufRead, Write};

/// Stream every record to `out` as one CSV row under the fixed header.
/// Returns the record count.
pub fn write<R: BufRead, W: Write>(
    records: &mut RecordReader<R>,
    header: &[String],
    delimiter: u8,
    out: &mut W,
) -> Result<u64> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .quote(b'\'')
        .escape(b'\\')
        .double_quote(false)
        .from_writer(out);
    writer.write_record(header)?;

    let mut count: u64 = 0;
    while let Some(record) = records.read_record()? {
        count += 1;
        if count % TRACE_EVERY == 0 {
            info!("{count} records");
        }
        let row: Vec<String> = header.iter().map(|column| cell(&record, column)).collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(count)
}

/// Render one cell. The record name is not a column; repeated
/// occurrences collapse into one cell, separated by `;`.
fn cell(record: &Record, column: &str) -> String {
    match record.fields.get(column) {
        None => String::new(),
        Some(FieldValue::Single(scalar)) => scalar.to_string(),
        Some(FieldValue::Repeated(list)) => list
            .iter()
            .map(|scalar| scalar.to_string())
            .collect::<Vec<_>>()
            .join(";"),
    }
}
