//! Basic metrics instrumentation for tracking bot activity.
//!
//! Provides counters and duration tracking for bot API calls and conversions.
//! The conversion engine itself never touches these; the bot records outcomes
//! after each conversion returns.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector shared by the HTTP client and the update handler.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of HTTP requests made
    http_requests_total: Arc<AtomicU64>,

    /// Total number of HTTP errors
    http_errors_total: Arc<AtomicU64>,

    /// Total duration of all HTTP requests in milliseconds
    http_duration_total_ms: Arc<AtomicU64>,

    /// Conversions that produced an archive
    conversions_succeeded_total: Arc<AtomicU64>,

    /// Conversions that ended in an error
    conversions_failed_total: Arc<AtomicU64>,

    /// Contacts written into archives
    contacts_converted_total: Arc<AtomicU64>,

    /// Spreadsheet rows skipped by validation
    rows_rejected_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            http_requests_total: Arc::new(AtomicU64::new(0)),
            http_errors_total: Arc::new(AtomicU64::new(0)),
            http_duration_total_ms: Arc::new(AtomicU64::new(0)),
            conversions_succeeded_total: Arc::new(AtomicU64::new(0)),
            conversions_failed_total: Arc::new(AtomicU64::new(0)),
            contacts_converted_total: Arc::new(AtomicU64::new(0)),
            rows_rejected_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record an HTTP request with duration.
    pub fn record_http_request(&self, duration: Duration) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record an HTTP error.
    pub fn record_http_error(&self) {
        self.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful conversion.
    pub fn record_conversion(&self, contacts: usize, rejected_rows: usize) {
        self.conversions_succeeded_total
            .fetch_add(1, Ordering::Relaxed);
        self.contacts_converted_total
            .fetch_add(contacts as u64, Ordering::Relaxed);
        self.rows_rejected_total
            .fetch_add(rejected_rows as u64, Ordering::Relaxed);
    }

    /// Record a failed conversion.
    pub fn record_conversion_failure(&self) {
        self.conversions_failed_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total HTTP requests.
    pub fn http_requests_total(&self) -> u64 {
        self.http_requests_total.load(Ordering::Relaxed)
    }

    /// Get total HTTP errors.
    pub fn http_errors_total(&self) -> u64 {
        self.http_errors_total.load(Ordering::Relaxed)
    }

    /// Get total HTTP duration in milliseconds.
    pub fn http_duration_total_ms(&self) -> u64 {
        self.http_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average HTTP request duration in milliseconds.
    pub fn http_duration_avg_ms(&self) -> f64 {
        let total = self.http_duration_total_ms.load(Ordering::Relaxed);
        let count = self.http_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn conversions_succeeded_total(&self) -> u64 {
        self.conversions_succeeded_total.load(Ordering::Relaxed)
    }

    pub fn conversions_failed_total(&self) -> u64 {
        self.conversions_failed_total.load(Ordering::Relaxed)
    }

    pub fn contacts_converted_total(&self) -> u64 {
        self.contacts_converted_total.load(Ordering::Relaxed)
    }

    pub fn rows_rejected_total(&self) -> u64 {
        self.rows_rejected_total.load(Ordering::Relaxed)
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            http_requests_total: self.http_requests_total(),
            http_errors_total: self.http_errors_total(),
            http_duration_avg_ms: self.http_duration_avg_ms(),
            conversions_succeeded_total: self.conversions_succeeded_total(),
            conversions_failed_total: self.conversions_failed_total(),
            contacts_converted_total: self.contacts_converted_total(),
            rows_rejected_total: self.rows_rejected_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub http_duration_avg_ms: f64,
    pub conversions_succeeded_total: u64,
    pub conversions_failed_total: u64,
    pub contacts_converted_total: u64,
    pub rows_rejected_total: u64,
}

/// Helper for timing HTTP requests.
pub struct HttpTimer {
    start: Instant,
    metrics: Metrics,
}

impl HttpTimer {
    /// Start timing an HTTP request.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
        self.metrics.record_http_error();
    }
}
