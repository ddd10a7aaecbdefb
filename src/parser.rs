//! Line parser for EFD-Contribuições files.
//!
//! The format is one record per line, fields delimited by `|`, the whole line
//! framed by a leading and a trailing `|`. Files are encoded in a single-byte
//! Latin encoding (the SPED validator emits latin-1), so decoding maps each
//! byte straight to its ISO-8859-1 code point and can never fail.
//!
//! Malformed lines are skipped with a warning and parsing continues; an EFD
//! file with a handful of broken lines is still worth editing.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{EfdError, ParseWarning, WarningReason};
use crate::record::EfdRecord;

/// Result of parsing one file: the well-formed records in file order, plus a
/// warning per skipped line.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub records: Vec<EfdRecord>,
    pub warnings: Vec<ParseWarning>,
}

/// Decode ISO-8859-1 bytes. Total over 0x00–0xFF: every byte value is its own
/// Unicode code point.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Parse already-decoded file text into records.
///
/// Blank lines are skipped silently. Lines that are not `|`-framed, or whose
/// first field is empty, are skipped with a [`ParseWarning`]. The split on `|`
/// is deliberately naive: the wire format has no escape for a literal `|`
/// inside a field, and pretending otherwise would desynchronize field indices.
pub fn parse_str(text: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (line_no, raw_line) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let line = raw_line.trim();

        if line.is_empty() {
            continue;
        }

        if !line.starts_with('|') || !line.ends_with('|') || line.len() < 2 {
            warn!(line = line_no, "skipping line not framed by '|' delimiters");
            outcome.warnings.push(ParseWarning {
                line: line_no,
                reason: WarningReason::NotPipeFramed,
            });
            continue;
        }

        // Strip the outer delimiters, then split on the inner ones.
        let inner = &line[1..line.len() - 1];
        let fields: Vec<String> = inner.split('|').map(String::from).collect();

        match EfdRecord::new(fields) {
            Some(record) => outcome.records.push(record),
            None => {
                warn!(line = line_no, "skipping line with missing record type tag");
                outcome.warnings.push(ParseWarning {
                    line: line_no,
                    reason: WarningReason::MissingTypeTag,
                });
            }
        }
    }

    debug!(
        records = outcome.records.len(),
        warnings = outcome.warnings.len(),
        "parse finished"
    );
    outcome
}

/// Load and parse an EFD file from disk.
///
/// A file that cannot be opened is an [`EfdError::Io`] value, never a panic;
/// structural problems inside a readable file surface as warnings in the
/// returned [`ParseOutcome`].
pub fn parse_efd_file(path: impl AsRef<Path>) -> Result<ParseOutcome, EfdError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| EfdError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_str(&decode_latin1(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_lines() {
        let text = "|0000|LEIAUTE|0|EMPRESA TESTE|\n|M001|0|\n";
        let outcome = parse_str(text);
        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.records[0].record_type(), "0000");
        assert_eq!(outcome.records[0].field(3), Some("EMPRESA TESTE"));
        assert_eq!(outcome.records[1].field_count(), 2);
    }

    #[test]
    fn test_blank_lines_are_skipped_silently() {
        let text = "\n|M001|0|\n   \n\n|1001|0|\n";
        let outcome = parse_str(text);
        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_malformed_line_is_a_warning_not_an_error() {
        let text = "|M001|0|\n|M210|01|100,00\n";
        let outcome = parse_str(text);
        assert_eq!(outcome.records.len(), 1, "only the framed line survives");
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].line, 2);
        assert_eq!(outcome.warnings[0].reason, WarningReason::NotPipeFramed);
    }

    #[test]
    fn test_missing_type_tag_is_a_warning() {
        let text = "||campo1|campo2|\n";
        let outcome = parse_str(text);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].reason, WarningReason::MissingTypeTag);
    }

    #[test]
    fn test_empty_fields_inside_a_record_are_preserved() {
        let outcome = parse_str("|0000|||NOME||\n");
        assert_eq!(outcome.records.len(), 1);
        let rec = &outcome.records[0];
        assert_eq!(rec.field_count(), 5);
        assert_eq!(rec.field(1), Some(""));
        assert_eq!(rec.field(3), Some("NOME"));
        assert_eq!(rec.field(4), Some(""));
    }

    #[test]
    fn test_latin1_decoding_never_fails() {
        // "JOÃO" with Ã as the latin-1 byte 0xC3.
        let bytes = b"|0000|LEIAUTE|0|JO\xC3O|\n";
        let outcome = parse_str(&decode_latin1(bytes));
        assert_eq!(outcome.records[0].field(3), Some("JO\u{c3}O"));
    }

    #[test]
    fn test_missing_file_is_an_error_value() {
        let result = parse_efd_file("/definitely/not/there.txt");
        assert!(matches!(result, Err(EfdError::Io { .. })));
    }

    #[test]
    fn test_single_pipe_line_is_malformed() {
        let outcome = parse_str("|\n");
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_crlf_terminators_are_stripped() {
        let outcome = parse_str("|M001|0|\r\n|1001|0|\r\n");
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].field(1), Some("0"));
    }
}
