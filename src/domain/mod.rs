//! Domain value objects and types.
//!
//! Contact records are built only from validated spreadsheet cells, so a
//! `ContactRecord` in hand always has a name and a normalized phone.

pub mod contact;
pub mod errors;
pub mod phone;

pub use contact::ContactRecord;
pub use errors::RejectReason;
pub use phone::PhoneNumber;
