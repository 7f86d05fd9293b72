//! Row validation.

use super::table::{CellText, RawRow, CATEGORY_COLUMN, NAMES_COLUMN, PHONE_COLUMN};
use crate::domain::{ContactRecord, RejectReason};

/// Turn one raw row into a contact record, or say why it was skipped.
///
/// A blank `Cat` cell is not a rejection: such rows are grouped under the
/// empty category.
pub fn validate(row: &RawRow) -> Result<ContactRecord, RejectReason> {
    let name = required_text(&row.names, NAMES_COLUMN, RejectReason::MissingName)?;
    let phone = required_text(&row.phone, PHONE_COLUMN, RejectReason::MissingPhone)?;

    let category = match &row.category {
        CellText::Text(text) => text.clone(),
        CellText::Empty => String::new(),
        CellText::Uncoercible => {
            return Err(RejectReason::UncoercibleCell {
                column: CATEGORY_COLUMN.to_string(),
            })
        }
    };

    ContactRecord::new(name, phone, category)
}

fn required_text<'a>(
    cell: &'a CellText,
    column: &str,
    missing: RejectReason,
) -> Result<&'a str, RejectReason> {
    match cell {
        CellText::Text(text) if !text.trim().is_empty() => Ok(text.as_str()),
        CellText::Text(_) | CellText::Empty => Err(missing),
        CellText::Uncoercible => Err(RejectReason::UncoercibleCell {
            column: column.to_string(),
        }),
    }
}
