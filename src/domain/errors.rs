//! Row rejection reasons.

use std::fmt;

/// Why a spreadsheet row did not become a contact.
///
/// Rejections are local to the row: they are counted and logged, never
/// surfaced to the uploader.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The `Names` cell is empty or blank.
    MissingName,

    /// The `Phone` cell is empty or blank.
    MissingPhone,

    /// A cell holds a value that has no text form (e.g. `#DIV/0!`).
    UncoercibleCell { column: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "name is empty"),
            Self::MissingPhone => write!(f, "phone is empty"),
            Self::UncoercibleCell { column } => {
                write!(f, "cell in column {} cannot be read as text", column)
            }
        }
    }
}

impl std::error::Error for RejectReason {}
