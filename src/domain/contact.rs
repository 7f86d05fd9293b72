//! Validated contact record.

use super::errors::RejectReason;
use super::phone::PhoneNumber;
use serde::Serialize;

/// One contact derived from a valid spreadsheet row.
///
/// `name` is trimmed and never empty; `phone` carries the restored leading
/// zero. `category` is kept verbatim, so `"A"` and `"a "` are different
/// groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    name: String,
    phone: PhoneNumber,
    category: String,
}

impl ContactRecord {
    /// Create a record from the text forms of the three required cells.
    ///
    /// # Errors
    ///
    /// Returns `RejectReason::MissingName` or `RejectReason::MissingPhone` when
    /// either value is blank. The name is checked first.
    pub fn new(
        name: &str,
        phone: &str,
        category: impl Into<String>,
    ) -> Result<Self, RejectReason> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RejectReason::MissingName);
        }

        let phone = PhoneNumber::from_source(phone)?;

        Ok(Self {
            name: name.to_string(),
            phone,
            category: category.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}
