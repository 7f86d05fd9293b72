//! PhoneNumber value object.

use super::errors::RejectReason;
use serde::{Serialize, Serializer};
use std::fmt;

/// A phone number restored to its dialable local form.
///
/// Source spreadsheets store local numbers without their leading zero
/// (spreadsheet apps drop it when the column is numeric), so every number is
/// restored by prefixing `0` to its trimmed text form.
///
/// The prefix is applied unconditionally: a number that already starts with
/// `0` gains a second one, and an international `+98…` number becomes
/// `0+98…`. Callers that need to keep such numbers intact must pre-process
/// the spreadsheet.
///
/// # Example
///
/// ```
/// use sheet_vcf_bot::domain::PhoneNumber;
///
/// let phone = PhoneNumber::from_source(" 989123456789 ").unwrap();
/// assert_eq!(phone.as_str(), "0989123456789");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Build a phone number from the cell's text form.
    ///
    /// # Errors
    ///
    /// Returns `RejectReason::MissingPhone` if the text is empty or blank.
    pub fn from_source(raw: &str) -> Result<Self, RejectReason> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RejectReason::MissingPhone);
        }

        Ok(Self(format!("0{}", trimmed)))
    }

    /// Get the phone number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

// Serde support - serialize as string
impl Serialize for PhoneNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
