//! Error handling for the EFD rectifier core.
//!
//! Two failure domains are kept apart: [`EfdError`] covers file-level
//! operations (load/save), [`RuleError`] covers rule preconditions. Structural
//! problems found while parsing are *not* errors at all; they are collected as
//! [`ParseWarning`] values and the offending line is skipped.

use std::path::PathBuf;

use thiserror::Error;

/// File-level errors for load and save operations.
#[derive(Error, Debug)]
pub enum EfdError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a rule application was refused. A failed rule never mutates the record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("field {index} is missing from the {record_type} record")]
    MissingField { record_type: String, index: usize },

    #[error("field {index} ('{value}') is not a valid decimal number")]
    InvalidDecimal { index: usize, value: String },

    #[error("field {index} ('{value}') must not be negative")]
    NegativeValue { index: usize, value: String },

    #[error("record is too short to hold output field {index}")]
    WriteRejected { index: usize },

    #[error("no record at index {index}")]
    NoSuchRecord { index: usize },
}

/// One skipped input line. Non-fatal: parsing continues past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number in the source file.
    pub line: usize,
    pub reason: WarningReason,
}

/// What was wrong with a skipped line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningReason {
    /// The line does not both start and end with the `|` delimiter.
    NotPipeFramed,
    /// The first field after the split is empty, so the record has no type tag.
    MissingTypeTag,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            WarningReason::NotPipeFramed => {
                write!(f, "line {}: not framed by '|' delimiters", self.line)
            }
            WarningReason::MissingTypeTag => {
                write!(f, "line {}: record type tag is missing", self.line)
            }
        }
    }
}
