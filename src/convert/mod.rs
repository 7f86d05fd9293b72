//! Spreadsheet to vCard archive conversion engine.
//!
//! A conversion runs synchronously through a fixed sequence of stages:
//!
//! `ParsingInput → Validating → Grouping → Serializing → Packaging → Done`
//!
//! Any stage may fail, which ends the conversion with a classified
//! [`ConversionError`]. Rows that fail validation are skipped and counted,
//! never escalated. The engine keeps no state between calls, so one value can
//! be shared freely across threads.

pub mod archive;
pub mod grouper;
pub mod table;
pub mod validator;
pub mod vcard;

pub use archive::ArchiveEntry;
pub use grouper::{group_contacts, CategoryGroup, ContactGrouper};
pub use table::{CellText, ColumnIndex, RawRow, SpreadsheetTable, REQUIRED_COLUMNS};
pub use validator::validate;

use crate::error::{ConversionError, ConversionResult};
use std::fmt;

/// Pipeline stage of a running conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ParsingInput,
    Validating,
    Grouping,
    Serializing,
    Packaging,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ParsingInput => "parsing_input",
            Self::Validating => "validating",
            Self::Grouping => "grouping",
            Self::Serializing => "serializing",
            Self::Packaging => "packaging",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a successful conversion with the counts the bot reports back.
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    /// Zip archive bytes.
    pub archive: Vec<u8>,
    /// Contacts written across all entries.
    pub contacts: usize,
    /// Data rows skipped by validation.
    pub rejected_rows: usize,
    /// Archive entry names in category order.
    pub entries: Vec<String>,
}

/// Stateless spreadsheet to vCard archive converter.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConversionEngine;

impl ConversionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Convert workbook bytes into zip archive bytes.
    pub fn convert(&self, input: &[u8]) -> ConversionResult<Vec<u8>> {
        self.convert_with_summary(input)
            .map(|summary| summary.archive)
    }

    /// Convert workbook bytes, also returning contact and row counts.
    ///
    /// # Errors
    ///
    /// - `InputParse` when the bytes are not a readable workbook.
    /// - `Schema` when `Names`, `Phone` or `Cat` is missing from the header.
    /// - `NoValidContacts` when no row survives validation.
    /// - `Unexpected` when the archive cannot be written.
    pub fn convert_with_summary(&self, input: &[u8]) -> ConversionResult<ConversionSummary> {
        let mut stage = Stage::ParsingInput;
        let result = run_pipeline(input, &mut stage);

        match &result {
            Ok(summary) => {
                advance(&mut stage, Stage::Done);
                tracing::info!(
                    contacts = summary.contacts,
                    rejected_rows = summary.rejected_rows,
                    entries = summary.entries.len(),
                    archive_bytes = summary.archive.len(),
                    "Conversion completed"
                );
            }
            Err(err) => {
                tracing::debug!(
                    failed_in = %stage,
                    kind = %err.kind(),
                    error = %err,
                    "Conversion failed"
                );
                stage = Stage::Failed;
                tracing::trace!(stage = %stage, "Conversion stage");
            }
        }

        result
    }
}

/// Convert workbook bytes into zip archive bytes with a default engine.
pub fn convert(input: &[u8]) -> ConversionResult<Vec<u8>> {
    ConversionEngine::new().convert(input)
}

fn advance(stage: &mut Stage, next: Stage) {
    *stage = next;
    tracing::trace!(stage = %next, "Conversion stage");
}

fn run_pipeline(input: &[u8], stage: &mut Stage) -> ConversionResult<ConversionSummary> {
    tracing::trace!(stage = %stage, input_bytes = input.len(), "Conversion stage");
    let table = SpreadsheetTable::from_bytes(input)?;

    advance(stage, Stage::Validating);
    let mut grouper = ContactGrouper::new();
    let mut rejected_rows = 0;
    for row in table.rows() {
        match validate(&row) {
            Ok(record) => grouper.push(record),
            Err(reason) => {
                rejected_rows += 1;
                tracing::trace!(row = row.number, %reason, "Row rejected");
            }
        }
    }

    advance(stage, Stage::Grouping);
    let contacts = grouper.len();
    let groups = grouper.into_groups();
    tracing::debug!(
        data_rows = table.data_row_count(),
        contacts,
        rejected_rows,
        groups = groups.len(),
        "Rows validated and grouped"
    );
    if groups.is_empty() {
        return Err(ConversionError::NoValidContacts);
    }

    advance(stage, Stage::Serializing);
    let entries = archive::build_entries(&groups);
    if entries.is_empty() {
        return Err(ConversionError::NoValidContacts);
    }

    advance(stage, Stage::Packaging);
    let bytes = archive::write_archive(&entries)?;

    Ok(ConversionSummary {
        archive: bytes,
        contacts,
        rejected_rows,
        entries: entries.into_iter().map(|e| e.filename).collect(),
    })
}
