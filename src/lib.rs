//! Sheet VCF Bot - converts contact spreadsheets into vCard archives over chat.
//!
//! Users upload an `.xlsx` workbook whose header names the columns `Names`,
//! `Phone` and `Cat`. Every valid row becomes a vCard 3.0 contact; contacts
//! are grouped by category and each group is written to its own
//! `contacts_<category>.vcf` file inside a single zip archive.
//!
//! # Architecture
//!
//! - **convert**: The conversion engine (decode, validate, group, render, package)
//! - **domain**: Validated contact values
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **client**: HTTP client for the Bale bot API
//! - **models**: Bot API payloads
//! - **bot**: Update dispatch and the long-polling loop
//! - **metrics**: Counters for API calls and conversions

pub mod bot;
pub mod client;
pub mod config;
pub mod convert;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;

pub use bot::{Poller, UpdateHandler};
pub use client::{AsyncBaleClient, BaleClient, BotApi};
pub use config::Config;
pub use convert::{convert, ConversionEngine, ConversionSummary, Stage};
pub use domain::{ContactRecord, PhoneNumber, RejectReason};
pub use error::{BotApiError, ConfigError, ConversionError, ConversionErrorKind};
pub use metrics::{Metrics, MetricsSummary};
