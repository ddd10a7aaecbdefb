//! Serializer for EFD-Contribuições files.
//!
//! The generator is the exact inverse of the parser for well-formed input:
//! every record becomes `|f0|f1|...|fn|` followed by a newline, encoded back
//! to ISO-8859-1.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::EfdError;
use crate::record::EfdRecord;

/// Serialize records to file text, one line per record.
pub fn generate_string(records: &[EfdRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_line());
        out.push('\n');
    }
    out
}

/// Encode text as ISO-8859-1. Code points above U+00FF cannot appear in text
/// produced by the parser; if a caller injects one anyway it degrades to `?`
/// rather than aborting the save.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
        .collect()
}

/// Serialize records straight to bytes in the file encoding.
pub fn generate_bytes(records: &[EfdRecord]) -> Vec<u8> {
    encode_latin1(&generate_string(records))
}

/// Write the records to `path`, replacing any existing file.
///
/// Failures (permission, disk full, bad path) come back as [`EfdError::Io`];
/// the caller keeps its in-memory records either way.
pub fn write_efd_file(path: impl AsRef<Path>, records: &[EfdRecord]) -> Result<(), EfdError> {
    let path = path.as_ref();
    fs::write(path, generate_bytes(records)).map_err(|source| EfdError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), records = records.len(), "EFD file written");
    Ok(())
}
