//! Data models for the bot API.
//!
//! The Bale bot API mirrors the Telegram Bot API, so these structures follow
//! its JSON field names. Only the fields the bot reads are modelled.

pub mod update;

pub use update::{ApiResponse, Chat, Document, File, Message, Update, User};
