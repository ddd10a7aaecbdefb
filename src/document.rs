//! Session façade owning the records of one loaded file.
//!
//! The editor surface talks to the core through this type: load a file, read
//! and edit fields, run rules, save. The document tracks a dirty flag the way
//! the editor window does (only flips when a stored value actually changes)
//! and keeps its prior state intact on any failed operation.

use std::path::Path;

use tracing::info;

use crate::error::{EfdError, ParseWarning, RuleError};
use crate::generator::write_efd_file;
use crate::parser::parse_efd_file;
use crate::record::EfdRecord;
use crate::rules::{ChangedFields, EfdRule};

/// One loaded EFD file and its editing session state.
#[derive(Debug, Default)]
pub struct EfdDocument {
    records: Vec<EfdRecord>,
    warnings: Vec<ParseWarning>,
    modified: bool,
}

impl EfdDocument {
    /// Load a file from disk. Structural warnings are retained for display;
    /// an unreadable file is an error and no document is produced.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EfdError> {
        let outcome = parse_efd_file(&path)?;
        info!(
            path = %path.as_ref().display(),
            records = outcome.records.len(),
            warnings = outcome.warnings.len(),
            "EFD file loaded"
        );
        Ok(Self {
            records: outcome.records,
            warnings: outcome.warnings,
            modified: false,
        })
    }

    /// Build a document from in-memory records (tests, programmatic use).
    pub fn from_records(records: Vec<EfdRecord>) -> Self {
        Self {
            records,
            warnings: Vec::new(),
            modified: false,
        }
    }

    pub fn records(&self) -> &[EfdRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&EfdRecord> {
        self.records.get(index)
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Whether any edit or rule application changed a field since the last
    /// successful load or save.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Edit one field of one record. Returns `true` only when the stored
    /// value actually changed; writing the same value back, the type tag, or
    /// an out-of-range index all leave the document (and its dirty flag)
    /// alone.
    pub fn set_field(&mut self, record_index: usize, field_index: usize, value: &str) -> bool {
        let Some(record) = self.records.get_mut(record_index) else {
            return false;
        };
        if record.field(field_index) == Some(value) {
            return false;
        }
        if record.set_field(field_index, value) {
            self.modified = true;
            true
        } else {
            false
        }
    }

    /// Run one rule against one record, with the whole record sequence
    /// available as context. Marks the document modified when the rule
    /// changed at least one field.
    pub fn apply_rule(
        &mut self,
        rule: &dyn EfdRule,
        record_index: usize,
    ) -> Result<ChangedFields, RuleError> {
        // The rule gets the pre-application view of the file as context; its
        // only write target is the record itself, put back below.
        let Some(record) = self.records.get(record_index) else {
            return Err(RuleError::NoSuchRecord {
                index: record_index,
            });
        };
        let mut working = record.clone();
        let changed = rule.apply(&mut working, &self.records)?;
        if !changed.is_empty() {
            self.records[record_index] = working;
            self.modified = true;
        }
        Ok(changed)
    }

    /// Write the document to disk. The dirty flag is cleared only on success;
    /// a failed save leaves the session state untouched.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), EfdError> {
        write_efd_file(&path, &self.records)?;
        self.modified = false;
        Ok(())
    }

    /// Indices of records whose type contains `type_filter`, case-insensitive.
    /// An empty filter matches everything (the editor's filter-box contract).
    pub fn filter_indices(&self, type_filter: &str) -> Vec<usize> {
        let needle = type_filter.trim().to_uppercase();
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| needle.is_empty() || r.record_type().to_uppercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::PisContribution;

    fn record(fields: &[&str]) -> EfdRecord {
        EfdRecord::new(fields.iter().map(|f| f.to_string()).collect()).expect("valid record")
    }

    fn doc() -> EfdDocument {
        EfdDocument::from_records(vec![
            record(&["0000", "LEIAUTE", "0", "EMPRESA TESTE"]),
            record(&["M001", "0"]),
            record(&["M210", "01", "1500,00", "1000,00", "1,65", "0,00"]),
        ])
    }

    #[test]
    fn test_set_field_marks_modified() {
        let mut d = doc();
        assert!(!d.is_modified());
        assert!(d.set_field(0, 3, "OUTRA EMPRESA"));
        assert!(d.is_modified());
    }

    #[test]
    fn test_unchanged_value_does_not_mark_modified() {
        let mut d = doc();
        assert!(!d.set_field(0, 3, "EMPRESA TESTE"));
        assert!(!d.is_modified());
    }

    #[test]
    fn test_rejected_edit_does_not_mark_modified() {
        let mut d = doc();
        assert!(!d.set_field(0, 0, "9999"), "type tag is immutable");
        assert!(!d.set_field(0, 99, "x"), "out of range is rejected");
        assert!(!d.set_field(99, 1, "x"), "unknown record is rejected");
        assert!(!d.is_modified());
    }

    #[test]
    fn test_apply_rule_marks_modified_on_change() {
        let mut d = doc();
        let changed = d.apply_rule(&PisContribution, 2).expect("rule applies");
        assert_eq!(changed, vec![5]);
        assert!(d.is_modified());
        assert_eq!(d.record(2).unwrap().field(5), Some("16,50"));
    }

    #[test]
    fn test_apply_rule_no_change_keeps_clean() {
        let mut d = EfdDocument::from_records(vec![record(&[
            "M210", "01", "1500,00", "1000,00", "1,65", "16,50",
        ])]);
        let changed = d.apply_rule(&PisContribution, 0).expect("rule applies");
        assert!(changed.is_empty());
        assert!(!d.is_modified());
    }

    #[test]
    fn test_failed_rule_leaves_record_intact() {
        let mut d = EfdDocument::from_records(vec![record(&[
            "M210", "01", "1500,00", "garbage", "1,65", "0,00",
        ])]);
        assert!(d.apply_rule(&PisContribution, 0).is_err());
        assert!(!d.is_modified());
        assert_eq!(d.record(0).unwrap().field(3), Some("garbage"));
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let d = doc();
        assert_eq!(d.filter_indices("m2"), vec![2]);
        assert_eq!(d.filter_indices("M"), vec![1, 2]);
        assert_eq!(d.filter_indices(""), vec![0, 1, 2]);
        assert!(d.filter_indices("C170").is_empty());
    }
}
