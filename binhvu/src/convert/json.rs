//! JSON serialization.
//!
//! Emits one top-level object holding a `RECORDS` array and a trailing
//! `RECORDS_COUNT` integer:
//!
//! ```text
//! {
//! "RECORDS" : [
//! {
//!   "EMPLOYEE": {
//!     "AGE": 30,
//!     "NAME": "Alice"
//!   }
//! },
//! ...
//! ],
//! "RECORDS_COUNT" : 2
//! }
//! ```
//!
//! Records are serialized and written one at a time; keys sort within
//! each record.

use super::{Result, TRACE_EVERY};
use libhvu::{FieldValue, Record, RecordReader, Scalar};
use log::info;
use serde_json::{Map, Number, Value};
use std::io::{BufRead, Write};

/// Stream every record to `out` as JSON. Returns the record count.
pub fn write<R: BufRead, W: Write>(records: &mut RecordReader<R>, out: &mut W) -> Result<u64> {
    let mut count: u64 = 0;
    out.write_all(b"{\n\"RECORDS\" : [\n")?;
    while let Some(record) = records.read_record()? {
        count += 1;
        if count % TRACE_EVERY == 0 {
            info!("{count} records");
        }
        if count > 1 {
            out.write_all(b",\n")?;
        }
        serde_json::to_writer_pretty(&mut *out, &record_to_json(&record))?;
    }
    write!(out, "\n],\n\"RECORDS_COUNT\" : {count}\n}}\n")?;
    Ok(count)
}

/// One record as `{ recordName: { field: value, ... } }`.
fn record_to_json(record: &Record) -> Value {
    let mut fields = Map::new();
    for (name, value) in &record.fields {
        fields.insert(name.clone(), field_to_json(value));
    }
    let mut doc = Map::new();
    doc.insert(record.name.clone(), Value::Object(fields));
    Value::Object(doc)
}

fn field_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Single(scalar) => scalar_to_json(scalar),
        FieldValue::Repeated(list) => Value::Array(list.iter().map(scalar_to_json).collect()),
    }
}

fn scalar_to_json(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Integer(n) => Value::Number((*n).into()),
        // Non-finite floats have no JSON rendition; fall back to text.
        Scalar::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        Scalar::Text(t) => Value::String(t.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libhvu::{resolve_encoding, LineReader};
    use std::io::Cursor;

    fn convert(input: &str) -> (String, u64) {
        let encoding = resolve_encoding("UTF-8").unwrap();
        let mut records = RecordReader::new(LineReader::new(
            Cursor::new(input.as_bytes().to_vec()),
            encoding,
        ));
        let mut out = Vec::new();
        let count = write(&mut records, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), count)
    }

    #[test]
    fn test_frame_and_count() {
        let (output, count) = convert("R  A\nV  X(1)=1\nR  B\nV  Y(1)=2\n");
        assert_eq!(count, 2);
        assert!(output.starts_with("{\n\"RECORDS\" : [\n"));
        assert!(output.ends_with("\n],\n\"RECORDS_COUNT\" : 2\n}\n"));
    }

    #[test]
    fn test_output_is_valid_json() {
        let (output, _) = convert("R  EMP\nV  NAME(1)=Alice\nV  PHONE(1)=1\nV  PHONE(2)=2\n");
        let doc: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(doc["RECORDS_COUNT"], 1);
        assert_eq!(doc["RECORDS"][0]["EMP"]["NAME"], "Alice");
        assert_eq!(doc["RECORDS"][0]["EMP"]["PHONE"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_record_keys_are_sorted() {
        let (output, _) = convert("R  EMP\nV  ZETA(1)=1\nV  ALPHA(1)=2\n");
        assert!(output.find("\"ALPHA\"").unwrap() < output.find("\"ZETA\"").unwrap());
    }

    #[test]
    fn test_scalar_typing_shows_in_output() {
        let (output, _) = convert("R  EMP\nV  AGE(1)=30\nV  COMM(1)=400.00\nV  NAME(1)=x1\n");
        let doc: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(doc["RECORDS"][0]["EMP"]["AGE"], 30);
        assert_eq!(doc["RECORDS"][0]["EMP"]["COMM"], 400.0);
        assert_eq!(doc["RECORDS"][0]["EMP"]["NAME"], "x1");
    }

    #[test]
    fn test_empty_input_emits_empty_array() {
        let (output, count) = convert("");
        assert_eq!(count, 0);
        let doc: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(doc["RECORDS"], serde_json::json!([]));
        assert_eq!(doc["RECORDS_COUNT"], 0);
    }
}
