//! In-memory model of one EFD line.
//!
//! A record is its raw field strings, nothing more. Numeric interpretation of
//! monetary fields belongs to the rule engine; the record itself never coerces
//! values. Field 0 is the record type tag and is frozen at construction.

use std::fmt;

/// One logical line of an EFD-Contribuições file.
///
/// `fields[0]` always equals `record_type`. The type tag can only be set at
/// construction; [`EfdRecord::set_field`] refuses index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EfdRecord {
    record_type: String,
    fields: Vec<String>,
}

impl EfdRecord {
    /// Build a record from its split fields. Returns `None` when the field
    /// list is empty or the type tag (field 0) is empty.
    pub fn new(fields: Vec<String>) -> Option<Self> {
        let record_type = fields.first()?.clone();
        if record_type.is_empty() {
            return None;
        }
        Some(Self { record_type, fields })
    }

    /// The record type tag, e.g. `"M210"`.
    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// Total number of fields, counting the type tag at index 0.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// All fields in order, type tag included.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Read a field by 0-based index. Out-of-range reads are absence, not an
    /// error; the official layout numbers its fields from this same index.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Overwrite a field in place. Returns `false` without mutating anything
    /// when `index` is 0 (the type tag is immutable) or past the parsed width
    /// of the record; records are never grown by this method.
    pub fn set_field(&mut self, index: usize, value: impl Into<String>) -> bool {
        if index == 0 || index >= self.fields.len() {
            return false;
        }
        self.fields[index] = value.into();
        true
    }

    /// Serialize back to the wire form: `|FIELD0|FIELD1|...|FIELDn|`.
    pub fn to_line(&self) -> String {
        format!("|{}|", self.fields.join("|"))
    }

    /// Short preview of the leading data fields, for list display.
    pub fn preview(&self) -> String {
        let data = &self.fields[1..self.fields.len().min(4)];
        if data.is_empty() {
            self.record_type.clone()
        } else {
            format!("{} | {}...", self.record_type, data.join("|"))
        }
    }
}

impl fmt::Display for EfdRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EfdRecord(type='{}', fields={})",
            self.record_type,
            self.fields.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EfdRecord {
        let fields = vec!["M210", "01", "1500,00", "1000,00", "1,65", "0,00"]
            .into_iter()
            .map(String::from)
            .collect();
        EfdRecord::new(fields).expect("valid record")
    }

    #[test]
    fn test_new_rejects_empty_fields() {
        assert!(EfdRecord::new(vec![]).is_none());
        assert!(EfdRecord::new(vec![String::new(), "x".into()]).is_none());
    }

    #[test]
    fn test_field_zero_is_the_type_tag() {
        let rec = sample();
        assert_eq!(rec.field(0), Some("M210"));
        assert_eq!(rec.record_type(), "M210");
    }

    #[test]
    fn test_set_field_rejects_type_tag() {
        let mut rec = sample();
        assert!(!rec.set_field(0, "C170"));
        assert_eq!(rec.record_type(), "M210");
        assert_eq!(rec.field(0), Some("M210"));
    }

    #[test]
    fn test_set_field_rejects_out_of_range() {
        let mut rec = sample();
        assert!(!rec.set_field(99, "value"));
        assert_eq!(rec.field_count(), 6);
    }

    #[test]
    fn test_set_field_mutates_in_place() {
        let mut rec = sample();
        assert!(rec.set_field(5, "16,50"));
        assert_eq!(rec.field(5), Some("16,50"));
    }

    #[test]
    fn test_out_of_range_read_is_absent() {
        let rec = sample();
        assert_eq!(rec.field(99), None);
    }

    #[test]
    fn test_to_line_round_trip_shape() {
        let rec = sample();
        assert_eq!(rec.to_line(), "|M210|01|1500,00|1000,00|1,65|0,00|");
    }
}
