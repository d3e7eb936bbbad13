//! Phase 1: Line classification.
//!
//! Every physical line of an hvu stream starts with a one-character type
//! tag padded to a fixed width of three columns. The tag decides what the
//! rest of the line means:
//!
//! ```text
//! R  EMPLOYEE                     <<< record # 2 >>>   record start
//! V  COMM(1)=400.00                                    field value
//! E  DISPLAY_TI(1)                                     field reference
//! L70La monnaie et...                                  long text start
//! D  La monnaie et...                                  long text continuation
//! K  keyValue                                          key (ignored)
//! C...comment                                          comment (ignored)
//! ```
//!
//! Classification is pure: the classifier extracts each kind's payload
//! (record name, field name + occurrence + value, or raw text) so the
//! record assembler never slices substrings itself.

/// Width of the leading tag columns.
pub const TAG_WIDTH: usize = 3;

/// Lines shorter than this are unrecognized without inspection.
pub const MIN_LINE_WIDTH: usize = 3;

/// End of the fixed record-name window on a record-start line.
pub const RECORD_NAME_END: usize = 32;

/// One classified line of an hvu stream.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// `R` line: starts a new record.
    RecordStart { name: String },
    /// `V` line: a field occurrence with an inline value.
    Value {
        field: String,
        occurrence: u32,
        value: String,
    },
    /// `E` line: a field occurrence whose value follows as long text.
    FieldRef { field: String, occurrence: u32 },
    /// `K` line: key material, ignored by record assembly.
    Key,
    /// `C` line: comment, ignored by record assembly.
    Comment,
    /// `L` line: first chunk of a long text value.
    LongTextStart { payload: String },
    /// `D` line: further chunk of a long text value.
    LongTextContinuation { payload: String },
    /// Too short, unknown tag, or a `V`/`E` line missing its delimiters.
    /// Treated as a continuation of the pending text value downstream.
    Unrecognized { payload: String },
}

/// Classify one physical line by its leading tag.
pub fn classify(line: &str) -> LineKind {
    if line.chars().count() < MIN_LINE_WIDTH {
        return LineKind::Unrecognized {
            payload: line.to_string(),
        };
    }
    match line.chars().next().unwrap() {
        'R' => LineKind::RecordStart {
            name: record_name(line),
        },
        'V' => match field_data(line) {
            Some((field, occurrence, Some(value))) => LineKind::Value {
                field,
                occurrence,
                value,
            },
            _ => LineKind::Unrecognized {
                payload: line.to_string(),
            },
        },
        'E' => match field_data(line) {
            Some((field, occurrence, _)) => LineKind::FieldRef { field, occurrence },
            None => LineKind::Unrecognized {
                payload: line.to_string(),
            },
        },
        'K' => LineKind::Key,
        'C' => LineKind::Comment,
        'L' => LineKind::LongTextStart {
            payload: after_tag(line).to_string(),
        },
        'D' => LineKind::LongTextContinuation {
            payload: after_tag(line).to_string(),
        },
        _ => LineKind::Unrecognized {
            payload: line.to_string(),
        },
    }
}

/// Content after the fixed tag columns.
fn after_tag(line: &str) -> &str {
    match line.char_indices().nth(TAG_WIDTH) {
        Some((i, _)) => &line[i..],
        None => "",
    }
}

/// Record name from the fixed window of an `R` line, trimmed.
fn record_name(line: &str) -> String {
    line.chars()
        .skip(TAG_WIDTH)
        .take(RECORD_NAME_END - TAG_WIDTH)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse `name(occurrence)` and the optional `=value` tail of a `V`/`E`
/// line. Returns `None` when the delimiters are missing or the counter
/// is not a number, so the line falls through to `Unrecognized`.
fn field_data(line: &str) -> Option<(String, u32, Option<String>)> {
    let rest = after_tag(line);
    let (field, tail) = rest.split_once('(')?;
    let (occ, tail) = tail.split_once(')')?;
    let occurrence = occ.trim().parse().ok()?;
    let value = tail.split_once('=').map(|(_, v)| v.to_string());
    Some((field.to_string(), occurrence, value))
}
