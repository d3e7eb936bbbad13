//! Field-occurrence statistics.
//!
//! An independent single pass over the line stream that counts how often
//! each distinct field name is referenced, plus a per-tag-family tally
//! for the post-run summary. It never assembles records, so it also
//! serves as the pre-pass that fixes the CSV column header.

use crate::error::Result;
use crate::input::LineReader;
use crate::line::{classify, LineKind};
use indexmap::IndexMap;
use std::io::BufRead;

/// Line totals per tag family.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagTally {
    pub records: u64,
    pub values: u64,
    pub keys: u64,
    pub field_refs: u64,
    pub long_text: u64,
    pub continuations: u64,
    pub comments: u64,
    pub undefined: u64,
}

/// Occurrence counts of every field name referenced in the input.
#[derive(Debug, Default)]
pub struct FieldStats {
    counts: IndexMap<String, u64>,
    tally: TagTally,
    line_count: u64,
}

impl FieldStats {
    /// Run the whole statistics pass over a line stream.
    pub fn collect<R: BufRead>(lines: &mut LineReader<R>) -> Result<FieldStats> {
        let mut stats = FieldStats::default();
        while let Some(line) = lines.next_line()? {
            stats.observe(&classify(&line));
        }
        stats.line_count = lines.line_count();
        Ok(stats)
    }

    /// Record one classified line. `V` and `E` lines count their field
    /// name, ignoring the occurrence ordinal.
    pub fn observe(&mut self, kind: &LineKind) {
        match kind {
            LineKind::RecordStart { .. } => self.tally.records += 1,
            LineKind::Value { field, .. } => {
                self.tally.values += 1;
                self.bump(field);
            }
            LineKind::FieldRef { field, .. } => {
                self.tally.field_refs += 1;
                self.bump(field);
            }
            LineKind::Key => self.tally.keys += 1,
            LineKind::Comment => self.tally.comments += 1,
            LineKind::LongTextStart { .. } => self.tally.long_text += 1,
            LineKind::LongTextContinuation { .. } => self.tally.continuations += 1,
            LineKind::Unrecognized { .. } => self.tally.undefined += 1,
        }
    }

    fn bump(&mut self, field: &str) {
        if let Some(count) = self.counts.get_mut(field) {
            *count += 1;
        } else {
            self.counts.insert(field.to_string(), 1);
        }
    }

    pub fn tally(&self) -> &TagTally {
        &self.tally
    }

    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    /// Entries sorted alphabetically by field name (the `stats` view).
    pub fn by_name(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> =
            self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Entries sorted by descending count (the `cstats` view); the sort
    /// is stable, so ties keep first-seen order.
    pub fn by_count(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> =
            self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    /// The alphabetically sorted set of distinct field names, fixed as
    /// the column header before any tabular row is emitted.
    pub fn header(&self) -> Vec<String> {
        let mut header: Vec<String> = self.counts.keys().cloned().collect();
        header.sort();
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::resolve_encoding;
    use std::io::Cursor;

    fn collect(input: &str) -> FieldStats {
        let encoding = resolve_encoding("UTF-8").unwrap();
        let mut lines = LineReader::new(Cursor::new(input.as_bytes().to_vec()), encoding);
        FieldStats::collect(&mut lines).unwrap()
    }

    const SAMPLE: &str = "R  EMP\n\
        V  ZETA(1)=1\n\
        V  ALPHA(1)=2\n\
        V  ZETA(2)=3\n\
        E  MID(1)\n\
        L70text\n\
        K  keyValue\n\
        C...comment\n\
        junk\n";

    #[test]
    fn test_tag_tally() {
        let stats = collect(SAMPLE);
        let tally = stats.tally();
        assert_eq!(tally.records, 1);
        assert_eq!(tally.values, 3);
        assert_eq!(tally.field_refs, 1);
        assert_eq!(tally.long_text, 1);
        assert_eq!(tally.keys, 1);
        assert_eq!(tally.comments, 1);
        assert_eq!(tally.undefined, 1);
        assert_eq!(stats.line_count(), 9);
    }

    #[test]
    fn test_by_name_is_alphabetical() {
        let stats = collect(SAMPLE);
        assert_eq!(
            stats.by_name(),
            vec![("ALPHA", 1), ("MID", 1), ("ZETA", 2)]
        );
    }

    #[test]
    fn test_by_count_descends_with_first_seen_ties() {
        let stats = collect(SAMPLE);
        // ZETA counts 2; ALPHA and MID tie at 1 and keep encounter order.
        assert_eq!(
            stats.by_count(),
            vec![("ZETA", 2), ("ALPHA", 1), ("MID", 1)]
        );
    }

    #[test]
    fn test_header_is_sorted() {
        let stats = collect(SAMPLE);
        assert_eq!(stats.header(), vec!["ALPHA", "MID", "ZETA"]);
    }
}
