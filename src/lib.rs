//! Core engine for rectifying EFD-Contribuições (SPED) digital tax ledgers.
//!
//! An EFD file is plain text in a single-byte Latin encoding, one record per
//! line, fields delimited and framed by `|`:
//!
//! ```text
//! |0000|006|0|...|EMPRESA EXEMPLO LTDA|12345678000199|SP|...|
//! |M210|01|1500,00|1000,00|1,65|16,50|...|
//! ```
//!
//! The crate covers the full edit cycle:
//!
//! - [`parser`] / [`generator`] — lossless parse and re-emission of the file
//!   (byte-for-byte round trip for well-formed input);
//! - [`record`] — the in-memory record model with a protected type tag;
//! - [`layout`] — the field registry giving positional fields their official
//!   names and descriptions;
//! - [`rules`] — record automations that recompute derived fields under exact
//!   decimal arithmetic;
//! - [`document`] — the session façade the editor surface drives.
//!
//! Nothing here panics on malformed input: file problems are error values,
//! broken lines are warnings, and rule preconditions fail without touching
//! the record.

pub mod document;
pub mod error;
pub mod generator;
pub mod layout;
pub mod numeric;
pub mod parser;
pub mod record;
pub mod rules;

pub use document::EfdDocument;
pub use error::{EfdError, ParseWarning, RuleError, WarningReason};
pub use generator::{generate_bytes, generate_string, write_efd_file};
pub use layout::{describe, field_label, FieldDescriptor};
pub use parser::{parse_efd_file, parse_str, ParseOutcome};
pub use record::EfdRecord;
pub use rules::{ChangedFields, EfdRule, RuleCatalog};
