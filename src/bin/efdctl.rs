//! Command-line front end for the EFD rectifier core.
//!
//! `efdctl inspect` summarizes a ledger file, `efdctl describe` prints the
//! registered layout of a record type, and `efdctl apply` runs every catalog
//! rule over a file and writes the rectified result.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use efd_retificador::{field_label, layout, EfdDocument, RuleCatalog};

#[derive(Parser)]
#[command(name = "efdctl", about = "Inspect and rectify EFD-Contribuições files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a file: record counts per type and parse warnings
    Inspect {
        /// EFD-Contribuições .txt file
        file: PathBuf,
        /// List the records whose type contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Print the registered field layout of a record type
    Describe {
        /// Record type, e.g. M210 (omit to list the registered types)
        record_type: Option<String>,
    },
    /// Apply every applicable automation rule and write the rectified file
    Apply {
        /// EFD-Contribuições .txt file
        file: PathBuf,
        /// Where to write the rectified file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match Cli::parse().command {
        Command::Inspect { file, filter } => inspect(file, filter),
        Command::Describe { record_type } => describe(record_type),
        Command::Apply { file, output } => apply(file, output),
    }
}

fn inspect(file: PathBuf, filter: Option<String>) -> Result<()> {
    let doc = EfdDocument::load(&file).with_context(|| format!("loading {}", file.display()))?;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in doc.records() {
        *counts.entry(record.record_type()).or_default() += 1;
    }

    println!("{}: {} records", file.display(), doc.records().len());
    for (record_type, count) in counts {
        println!("  {record_type:<6} {count}");
    }
    if let Some(filter) = filter {
        for index in doc.filter_indices(&filter) {
            println!("  [{index}] {}", doc.records()[index].preview());
        }
    }
    if !doc.warnings().is_empty() {
        println!("{} skipped line(s):", doc.warnings().len());
        for warning in doc.warnings() {
            println!("  {warning}");
        }
    }
    Ok(())
}

fn describe(record_type: Option<String>) -> Result<()> {
    let Some(record_type) = record_type else {
        println!("registered record types:");
        for ty in layout::registered_types() {
            println!("  {ty}");
        }
        return Ok(());
    };

    let record_type = record_type.to_uppercase();
    let covered = layout::covered_fields(&record_type);
    if covered == 0 {
        bail!("record type '{record_type}' is not in the field registry");
    }

    println!("{record_type}:");
    for index in 0..covered {
        if let Some(descriptor) = layout::describe(&record_type, index) {
            println!("  {index:>2} {:<24} {}", descriptor.name, descriptor.description);
        }
    }
    Ok(())
}

fn apply(file: PathBuf, output: PathBuf) -> Result<()> {
    let mut doc = EfdDocument::load(&file).with_context(|| format!("loading {}", file.display()))?;
    let catalog = RuleCatalog::standard();

    let mut applied = 0usize;
    for index in 0..doc.records().len() {
        let record_type = doc.records()[index].record_type().to_string();
        for rule in catalog.rules_for(&record_type) {
            match doc.apply_rule(rule.as_ref(), index) {
                Ok(changed) if !changed.is_empty() => {
                    applied += 1;
                    let labels: Vec<String> = changed
                        .iter()
                        .map(|&i| field_label(&record_type, i))
                        .collect();
                    println!("record {index} ({record_type}): {} -> {}", rule.name(), labels.join(", "));
                }
                Ok(_) => {}
                // A rule refusing one record is not fatal for the run.
                Err(err) => warn!(record = index, rule = rule.name(), %err, "rule not applied"),
            }
        }
    }

    doc.save(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "{} rule application(s) changed fields; rectified file written to {}",
        applied,
        output.display()
    );
    Ok(())
}
