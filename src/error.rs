//! Error types for the spreadsheet-to-vCard bot.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use std::fmt;
use thiserror::Error;

/// Classification of a failed conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionErrorKind {
    InputParseError,
    SchemaError,
    NoValidContacts,
    UnexpectedError,
}

impl fmt::Display for ConversionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InputParseError => "input_parse_error",
            Self::SchemaError => "schema_error",
            Self::NoValidContacts => "no_valid_contacts",
            Self::UnexpectedError => "unexpected_error",
        };
        f.write_str(name)
    }
}

/// Errors that terminate a single spreadsheet conversion.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The uploaded bytes are not a readable spreadsheet
    #[error("Failed to read spreadsheet: {0}")]
    InputParse(String),

    /// One or more required columns are missing from the header row
    #[error("Missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// No row survived validation
    #[error("No valid contacts found")]
    NoValidContacts,

    /// Anything else, e.g. a failure while writing the archive
    #[error("Unexpected conversion failure: {0}")]
    Unexpected(String),
}

impl ConversionError {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ConversionErrorKind {
        match self {
            Self::InputParse(_) => ConversionErrorKind::InputParseError,
            Self::Schema { .. } => ConversionErrorKind::SchemaError,
            Self::NoValidContacts => ConversionErrorKind::NoValidContacts,
            Self::Unexpected(_) => ConversionErrorKind::UnexpectedError,
        }
    }

    /// Whether the error describes a problem with the user's file.
    ///
    /// Unexpected errors are operator problems; their details are logged and
    /// forwarded to the admin, never shown to the uploader.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Unexpected(_))
    }

    /// Text safe to show to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::InputParse(_) => "Could not read the uploaded file.".to_string(),
            Self::Schema { missing } => {
                format!("Missing required column(s): {}", missing.join(", "))
            }
            Self::NoValidContacts => "No valid contacts found.".to_string(),
            Self::Unexpected(_) => {
                "An unexpected error occurred. Please try again later.".to_string()
            }
        }
    }
}

impl From<zip::result::ZipError> for ConversionError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Unexpected(format!("archive write failed: {}", err))
    }
}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        Self::Unexpected(format!("I/O failure: {}", err))
    }
}

/// Errors that can occur when talking to the bot API.
#[derive(Error, Debug)]
pub enum BotApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication failed (bad bot token)
    #[error("Authentication failed")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Downloaded file is larger than the configured upload limit
    #[error("File exceeds the {limit} byte upload limit")]
    PayloadTooLarge { limit: u64 },

    /// Generic API error with context
    #[error("API error: {0}")]
    Other(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Other(String),
}

/// Convenience type alias for Results with ConversionError
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Convenience type alias for Results with BotApiError
pub type BotApiResult<T> = Result<T, BotApiError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
