//! Phase 2: Record assembly.
//!
//! Folds the classified line stream into complete records, one per call.
//! The accumulator is a small state machine: a record opens on an `R`
//! line, a field opens on a `V`/`E` line with occurrence 1, and the
//! pending field flushes on the next field start, the next record start,
//! or end of stream. Repeated occurrences of one field merge into an
//! ordered list; a single occurrence stays a bare scalar.
//!
//! Malformed lines never abort the scan: they are counted in the
//! undefined tally and treated as continuations of the pending text,
//! which tolerates stray line breaks inside values.

use crate::error::Result;
use crate::input::LineReader;
use crate::line::{classify, LineKind};
use crate::value::{FieldValue, Record, Scalar};
use indexmap::IndexMap;
use log::debug;
use std::io::BufRead;

/// Pulls complete records off an hvu line stream.
///
/// Implements `Iterator<Item = Result<Record>>`; the stream is exhausted
/// once the iterator returns `None`.
pub struct RecordReader<R> {
    lines: LineReader<R>,
    /// Name from a record-start line consumed while finishing the
    /// previous record; the next call opens this record.
    carried: Option<String>,
    undefined_lines: u64,
    done: bool,
}

/// Transient state for the field currently being accumulated.
struct FieldBuffer {
    name: String,
    pending: String,
    occurrences: Vec<Scalar>,
    last_occurrence: u32,
}

impl FieldBuffer {
    fn new(name: String, pending: String, occurrence: u32) -> Self {
        Self {
            name,
            pending,
            occurrences: Vec::new(),
            last_occurrence: occurrence,
        }
    }

    /// Finalize the pending text as one occurrence. Empty values are
    /// dropped, not stored.
    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            self.occurrences.push(Scalar::from_text(&self.pending));
            self.pending.clear();
        }
    }

    /// Commit the collected occurrences into the record's field map.
    /// Inserting an existing name replaces its value but keeps its
    /// position, so an occurrence counter restarting at 1 starts a new
    /// list under the same entry.
    fn commit(mut self, fields: &mut IndexMap<String, FieldValue>) {
        self.flush_pending();
        if let Some(value) = FieldValue::from_occurrences(self.occurrences) {
            fields.insert(self.name, value);
        }
    }
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(lines: LineReader<R>) -> Self {
        Self {
            lines,
            carried: None,
            undefined_lines: 0,
            done: false,
        }
    }

    /// Physical lines consumed so far.
    pub fn line_count(&self) -> u64 {
        self.lines.line_count()
    }

    /// Lines that could not be classified and were folded into the
    /// pending text instead.
    pub fn undefined_lines(&self) -> u64 {
        self.undefined_lines
    }

    /// Read the next complete record. Returns `None` once the stream is
    /// exhausted.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        if self.done {
            return Ok(None);
        }

        let mut name = self.carried.take();
        let mut fields: IndexMap<String, FieldValue> = IndexMap::new();
        let mut buffer: Option<FieldBuffer> = None;

        while let Some(line) = self.lines.next_line()? {
            match classify(&line) {
                LineKind::RecordStart { name: next } => {
                    if name.is_none() && fields.is_empty() && buffer.is_none() {
                        name = Some(next);
                    } else {
                        self.carried = Some(next);
                        if let Some(buf) = buffer.take() {
                            buf.commit(&mut fields);
                        }
                        return Ok(Some(Self::finish(name, fields)));
                    }
                }
                LineKind::Value {
                    field,
                    occurrence,
                    value,
                } => self.open_field(&mut buffer, &mut fields, field, occurrence, value),
                LineKind::FieldRef { field, occurrence } => {
                    self.open_field(&mut buffer, &mut fields, field, occurrence, String::new())
                }
                LineKind::Key | LineKind::Comment => {}
                LineKind::LongTextStart { payload }
                | LineKind::LongTextContinuation { payload } => {
                    if let Some(buf) = buffer.as_mut() {
                        buf.pending.push_str(&payload);
                    }
                }
                LineKind::Unrecognized { payload } => {
                    self.undefined_lines += 1;
                    if let Some(buf) = buffer.as_mut() {
                        buf.pending.push_str(&payload);
                    }
                }
            }
        }

        // End of stream: flush whatever is open and emit the last record.
        self.done = true;
        if let Some(buf) = buffer.take() {
            buf.commit(&mut fields);
        }
        if name.is_none() && fields.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self::finish(name, fields)))
    }

    /// Start a new field or continue one, per the occurrence counter.
    /// A counter of 1 always opens a new field identity. A counter above
    /// 1 extends the open field, or reattaches to an already-committed
    /// field that another field interrupted. A counter that is not the
    /// direct successor of what was collected so far is out of order and
    /// handled like any other malformed line.
    fn open_field(
        &mut self,
        buffer: &mut Option<FieldBuffer>,
        fields: &mut IndexMap<String, FieldValue>,
        field: String,
        occurrence: u32,
        value: String,
    ) {
        if occurrence == 1 {
            if let Some(buf) = buffer.take() {
                buf.commit(fields);
            }
            *buffer = Some(FieldBuffer::new(field, value, 1));
            return;
        }

        if let Some(buf) = buffer.as_mut() {
            if buf.name == field {
                if occurrence == buf.last_occurrence + 1 {
                    buf.flush_pending();
                    buf.pending = value;
                    buf.last_occurrence = occurrence;
                } else {
                    self.undefined_lines += 1;
                }
                return;
            }
        }

        // Another field interrupted this one; pick its list back up from
        // the committed map. The commit at the end of the chain replaces
        // the entry in place, keeping its original position.
        let prior = match fields.get(&field) {
            Some(FieldValue::Single(scalar)) => vec![scalar.clone()],
            Some(FieldValue::Repeated(list)) => list.clone(),
            None => {
                self.undefined_lines += 1;
                return;
            }
        };
        if occurrence != prior.len() as u32 + 1 {
            self.undefined_lines += 1;
            return;
        }
        if let Some(buf) = buffer.take() {
            buf.commit(fields);
        }
        let mut buf = FieldBuffer::new(field, value, occurrence);
        buf.occurrences = prior;
        *buffer = Some(buf);
    }

    fn finish(name: Option<String>, fields: IndexMap<String, FieldValue>) -> Record {
        let record = Record {
            name: name.unwrap_or_default(),
            fields,
        };
        debug!(
            "assembled record {:?} with {} fields",
            record.name,
            record.fields.len()
        );
        record
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}
