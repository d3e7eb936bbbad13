//! XML serialization via quick-xml.
//!
//! Emits a declaration, a `RECORDS` root holding one element per record
//! named after the record, and a `RECORDS_COUNT` element trailing the
//! root, matching the layout of the historic hvu exports:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <RECORDS>
//!   <EMPLOYEE>
//!     <NAME>Alice</NAME>
//!     <PHONE>111</PHONE>
//!     <PHONE>222</PHONE>
//!   </EMPLOYEE>
//! </RECORDS>
//! <RECORDS_COUNT>1</RECORDS_COUNT>
//! ```
//!
//! Repeated field occurrences become repeated elements.

use super::{ConvertError, Result, TRACE_EVERY};
use libhvu::{FieldValue, Record, RecordReader, Scalar};
use log::info;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{BufRead, Write};

/// Stream every record to `out` as XML. Returns the record count.
pub fn write<R: BufRead, W: Write>(records: &mut RecordReader<R>, out: &mut W) -> Result<u64> {
    let mut count: u64 = 0;
    {
        let mut writer = Writer::new_with_indent(&mut *out, b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_err)?;
        writer
            .write_event(Event::Start(BytesStart::new("RECORDS")))
            .map_err(xml_err)?;
        while let Some(record) = records.read_record()? {
            count += 1;
            if count % TRACE_EVERY == 0 {
                info!("{count} records");
            }
            write_record(&mut writer, &record)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("RECORDS")))
            .map_err(xml_err)?;
    }
    write!(out, "\n<RECORDS_COUNT>{count}</RECORDS_COUNT>\n")?;
    Ok(count)
}

fn write_record<W: Write>(writer: &mut Writer<W>, record: &Record) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(record.name.as_str())))
        .map_err(xml_err)?;
    for (field, value) in &record.fields {
        match value {
            FieldValue::Single(scalar) => write_element(writer, field, scalar)?,
            FieldValue::Repeated(list) => {
                for scalar in list {
                    write_element(writer, field, scalar)?;
                }
            }
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(record.name.as_str())))
        .map_err(xml_err)?;
    Ok(())
}

fn write_element<W: Write>(writer: &mut Writer<W>, name: &str, scalar: &Scalar) -> Result<()> {
    let text = scalar.to_string();
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(&text)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)?;
    Ok(())
}

fn xml_err(err: quick_xml::Error) -> ConvertError {
    ConvertError::Xml(err.to_string())
}
