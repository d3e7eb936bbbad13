//! Record value model and scalar typing.

use indexmap::IndexMap;
use std::fmt;

/// A typed scalar field value.
///
/// hvu carries every value as text; [`Scalar::from_text`] narrows it to
/// the most specific type so the serializers can emit real numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Type a raw textual value: integer parse, then float parse, else
    /// keep the text as-is. Total, never fails. Numeric parses ignore
    /// surrounding whitespace; the fallback preserves the raw text.
    pub fn from_text(raw: &str) -> Scalar {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Scalar::Integer(n);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Scalar::Float(f);
        }
        Scalar::Text(raw.to_string())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(t) => f.write_str(t),
        }
    }
}

/// A field's collected value within one record: a single occurrence
/// collapses to a bare scalar, several keep encounter order as a list.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Single(Scalar),
    Repeated(Vec<Scalar>),
}

impl FieldValue {
    /// Collapse an occurrence list. Empty lists produce no value at all
    /// (empty textual values are dropped upstream, never stored).
    pub fn from_occurrences(mut occurrences: Vec<Scalar>) -> Option<FieldValue> {
        match occurrences.len() {
            0 => None,
            1 => Some(FieldValue::Single(occurrences.remove(0))),
            _ => Some(FieldValue::Repeated(occurrences)),
        }
    }
}

/// One decoded hvu record: the name from its record-start line and the
/// ordered field map built from every line up to the next record start.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub name: String,
    pub fields: IndexMap<String, FieldValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_narrows() {
        assert_eq!(Scalar::from_text("12"), Scalar::Integer(12));
        assert_eq!(Scalar::from_text("12.5"), Scalar::Float(12.5));
        assert_eq!(Scalar::from_text("abc"), Scalar::Text("abc".to_string()));
    }

    #[test]
    fn test_typing_is_idempotent() {
        for raw in ["42", "-7", "400.00", "abc"] {
            let typed = Scalar::from_text(raw);
            assert_eq!(Scalar::from_text(&typed.to_string()), typed);
        }
    }

    #[test]
    fn test_numeric_parse_ignores_padding() {
        assert_eq!(Scalar::from_text(" 30 "), Scalar::Integer(30));
        // Non-numeric text keeps its padding.
        assert_eq!(Scalar::from_text(" a "), Scalar::Text(" a ".to_string()));
    }

    #[test]
    fn test_occurrence_collapse() {
        assert_eq!(FieldValue::from_occurrences(vec![]), None);
        assert_eq!(
            FieldValue::from_occurrences(vec![Scalar::Integer(1)]),
            Some(FieldValue::Single(Scalar::Integer(1)))
        );
        assert_eq!(
            FieldValue::from_occurrences(vec![Scalar::Integer(1), Scalar::Integer(2)]),
            Some(FieldValue::Repeated(vec![
                Scalar::Integer(1),
                Scalar::Integer(2)
            ]))
        );
    }
}
