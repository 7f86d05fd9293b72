//! Spreadsheet decoding and the required-column schema.
//!
//! The first worksheet of an `.xlsx` workbook is decoded once; its first row
//! is the header. Columns are looked up by name, so their order is irrelevant
//! and extra columns are ignored.

use crate::error::{ConversionError, ConversionResult};
use calamine::{Data, Range, Reader, Xlsx};
use std::io::Cursor;

pub const NAMES_COLUMN: &str = "Names";
pub const PHONE_COLUMN: &str = "Phone";
pub const CATEGORY_COLUMN: &str = "Cat";

/// Columns every input sheet must expose, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 3] = [NAMES_COLUMN, PHONE_COLUMN, CATEGORY_COLUMN];

/// A cell reduced to what row validation cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellText {
    /// No value in the cell.
    Empty,
    /// The cell's text form.
    Text(String),
    /// The cell holds an error value with no meaningful text form.
    Uncoercible,
}

impl CellText {
    /// Text form of a decoded cell.
    ///
    /// Integral numbers lose their fractional part so that phone numbers
    /// typed into numeric columns come out as digits only.
    pub fn from_cell(cell: &Data) -> Self {
        match cell {
            Data::Empty => Self::Empty,
            Data::String(s) => Self::Text(s.clone()),
            Data::Int(n) => Self::Text(n.to_string()),
            Data::Float(f) => Self::Text(format_float(*f)),
            Data::Bool(b) => Self::Text(b.to_string()),
            Data::Error(_) => Self::Uncoercible,
            Data::DateTime(dt) => Self::Text(format!("{}", dt)),
            Data::DateTimeIso(s) => Self::Text(s.clone()),
            Data::DurationIso(s) => Self::Text(s.clone()),
        }
    }
}

fn format_float(value: f64) -> String {
    // Above 2^53 integral floats are no longer exact; leave them alone.
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// The three required cells of one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based row number within the sheet's used range (header is row 1).
    pub number: usize,
    pub names: CellText,
    pub phone: CellText,
    pub category: CellText,
}

/// Positions of the required columns within the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    names: usize,
    phone: usize,
    category: usize,
}

impl ColumnIndex {
    /// Resolve the required columns against a header row.
    ///
    /// Header cells are compared after trimming surrounding whitespace; the
    /// first matching cell wins when a name repeats.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::Schema` listing every missing column.
    pub fn resolve(header: &[Data]) -> ConversionResult<Self> {
        let position = |name: &str| {
            header.iter().position(|cell| match CellText::from_cell(cell) {
                CellText::Text(text) => text.trim() == name,
                _ => false,
            })
        };

        match (
            position(NAMES_COLUMN),
            position(PHONE_COLUMN),
            position(CATEGORY_COLUMN),
        ) {
            (Some(names), Some(phone), Some(category)) => Ok(Self {
                names,
                phone,
                category,
            }),
            (names, phone, category) => {
                let missing = [names, phone, category]
                    .iter()
                    .zip(REQUIRED_COLUMNS)
                    .filter(|(found, _)| found.is_none())
                    .map(|(_, name)| name.to_string())
                    .collect();
                Err(ConversionError::Schema { missing })
            }
        }
    }

    fn extract(&self, number: usize, row: &[Data]) -> RawRow {
        let cell = |idx: usize| row.get(idx).map_or(CellText::Empty, CellText::from_cell);
        RawRow {
            number,
            names: cell(self.names),
            phone: cell(self.phone),
            category: cell(self.category),
        }
    }
}

/// A decoded sheet whose header has passed the schema check.
#[derive(Debug)]
pub struct SpreadsheetTable {
    columns: ColumnIndex,
    range: Range<Data>,
}

impl SpreadsheetTable {
    /// Decode workbook bytes and check the header of the first worksheet.
    ///
    /// # Errors
    ///
    /// - `ConversionError::InputParse` if the bytes are not an xlsx workbook
    ///   or the workbook has no worksheet.
    /// - `ConversionError::Schema` if required columns are missing. An empty
    ///   sheet has no header, so all three are reported.
    pub fn from_bytes(bytes: &[u8]) -> ConversionResult<Self> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| ConversionError::InputParse(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| {
                ConversionError::InputParse("workbook contains no worksheets".to_string())
            })?
            .map_err(|e| ConversionError::InputParse(e.to_string()))?;

        let header = range.rows().next().unwrap_or(&[]);
        let columns = ColumnIndex::resolve(header)?;

        Ok(Self { columns, range })
    }

    pub fn columns(&self) -> ColumnIndex {
        self.columns
    }

    /// Number of rows below the header.
    pub fn data_row_count(&self) -> usize {
        self.range.height().saturating_sub(1)
    }

    /// Data rows in sheet order, header excluded.
    pub fn rows(&self) -> impl Iterator<Item = RawRow> + '_ {
        self.range
            .rows()
            .enumerate()
            .skip(1)
            .map(move |(idx, row)| self.columns.extract(idx + 1, row))
    }
}
