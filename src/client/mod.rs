//! HTTP client for the Bale bot API.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. Methods are called as
//! `POST {base}/bot{token}/{method}` with a JSON body (or multipart for uploads);
//! files are fetched from `{base}/file/bot{token}/{file_path}`.

mod async_wrapper;
pub use async_wrapper::{AsyncBaleClient, BotApi};

use crate::config::Config;
use crate::error::{BotApiError, BotApiResult};
use crate::metrics::{HttpTimer, Metrics};
use crate::models::{ApiResponse, File, Message, Update, User};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client for the Bale bot API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct BaleClient {
    /// Base URL for the bot API
    base_url: String,

    /// Bot token, embedded in every request path
    token: String,

    /// Per-request timeout outside of long polling
    request_timeout: Duration,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl BaleClient {
    /// Create a new BaleClient from configuration.
    pub fn new(config: &Config, metrics: Metrics) -> Self {
        Self {
            base_url: config.api_url.clone(),
            token: config.bot_token.clone(),
            request_timeout: Duration::from_secs(config.request_timeout),
            agent: Arc::new(ureq::AgentBuilder::new().build()),
            metrics,
        }
    }

    /// Create a BaleClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, token: String) -> Self {
        Self {
            base_url,
            token,
            request_timeout: Duration::from_secs(10),
            agent: Arc::new(ureq::AgentBuilder::new().build()),
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url.trim_end_matches('/'),
            self.token,
            method
        )
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.base_url.trim_end_matches('/'),
            self.token,
            file_path.trim_start_matches('/')
        )
    }

    /// Call a bot API method with a JSON body and unwrap its envelope.
    fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> BotApiResult<T> {
        tracing::debug!(method, "Bot API call");
        let timer = HttpTimer::new(self.metrics.clone());

        let result = self
            .agent
            .post(&self.method_url(method))
            .timeout(timeout)
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(|e| self.map_error(e));

        self.finish(method, timer, result)
    }

    /// Call a bot API method with a pre-encoded multipart body.
    fn call_multipart<T: DeserializeOwned>(
        &self,
        method: &str,
        form: MultipartForm,
    ) -> BotApiResult<T> {
        tracing::debug!(method, body_bytes = form.body.len(), "Bot API multipart call");
        let timer = HttpTimer::new(self.metrics.clone());

        let result = self
            .agent
            .post(&self.method_url(method))
            .timeout(self.request_timeout)
            .set("Content-Type", &form.content_type())
            .send_bytes(&form.body)
            .map_err(|e| self.map_error(e));

        self.finish(method, timer, result)
    }

    fn finish<T: DeserializeOwned>(
        &self,
        method: &str,
        timer: HttpTimer,
        result: Result<ureq::Response, BotApiError>,
    ) -> BotApiResult<T> {
        let response = match result {
            Ok(response) => {
                timer.complete();
                response
            }
            Err(e) => {
                tracing::error!(method, error = %e, "Bot API call failed");
                timer.complete_with_error();
                return Err(e);
            }
        };

        let body = response
            .into_string()
            .map_err(|e| BotApiError::HttpError(e.to_string()))?;
        let envelope: ApiResponse<T> = serde_json::from_str(&body)?;

        if !envelope.ok {
            return Err(BotApiError::ApiError {
                status: envelope.error_code.unwrap_or(0),
                message: envelope
                    .description
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        envelope
            .result
            .ok_or_else(|| BotApiError::Other(format!("{} returned no result", method)))
    }

    /// Map a ureq error to a BotApiError.
    fn map_error(&self, error: ureq::Error) -> BotApiError {
        match error {
            ureq::Error::Status(code, response) => {
                let raw = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());
                // Error bodies are usually the same JSON envelope.
                let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&raw)
                    .ok()
                    .and_then(|envelope| envelope.description)
                    .unwrap_or(raw);

                match code {
                    401 => BotApiError::Unauthorized,
                    404 => BotApiError::NotFound(message),
                    429 => BotApiError::RateLimitExceeded,
                    _ => BotApiError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    BotApiError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    BotApiError::Timeout
                } else {
                    BotApiError::HttpError(transport.to_string())
                }
            }
        }
    }

    // ========================= Bot Methods =========================

    /// Identify the bot account behind the token.
    pub fn get_me(&self) -> BotApiResult<User> {
        self.call("getMe", &json!({}), self.request_timeout)
    }

    /// Long-poll for updates with IDs at or above `offset`.
    ///
    /// The HTTP timeout is extended by `timeout_secs` so the server can hold
    /// the request open for the whole poll window.
    pub fn get_updates(&self, offset: i64, timeout_secs: u64) -> BotApiResult<Vec<Update>> {
        let body = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        let timeout = self.request_timeout + Duration::from_secs(timeout_secs);
        self.call("getUpdates", &body, timeout)
    }

    /// Send a text message, optionally as a reply.
    pub fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> BotApiResult<Message> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(message_id) = reply_to {
            body["reply_to_message_id"] = json!(message_id);
        }
        self.call("sendMessage", &body, self.request_timeout)
    }

    /// Upload a file from memory as a document message.
    pub fn send_document(
        &self,
        chat_id: i64,
        file_name: &str,
        content: &[u8],
        caption: Option<&str>,
        reply_to: Option<i64>,
    ) -> BotApiResult<Message> {
        let mut form = MultipartForm::new();
        form.text("chat_id", &chat_id.to_string());
        if let Some(caption) = caption {
            form.text("caption", caption);
        }
        if let Some(message_id) = reply_to {
            form.text("reply_to_message_id", &message_id.to_string());
        }
        form.file("document", file_name, "application/zip", content);
        form.close();

        self.call_multipart("sendDocument", form)
    }

    /// Delete a message previously sent by the bot.
    pub fn delete_message(&self, chat_id: i64, message_id: i64) -> BotApiResult<bool> {
        let body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });
        self.call("deleteMessage", &body, self.request_timeout)
    }

    /// Resolve a file ID to a downloadable path.
    pub fn get_file(&self, file_id: &str) -> BotApiResult<File> {
        self.call("getFile", &json!({ "file_id": file_id }), self.request_timeout)
    }

    /// Download a file's bytes, refusing anything larger than `max_bytes`.
    pub fn download_file(&self, file_path: &str, max_bytes: u64) -> BotApiResult<Vec<u8>> {
        let timer = HttpTimer::new(self.metrics.clone());
        let response = match self
            .agent
            .get(&self.file_url(file_path))
            .timeout(self.request_timeout)
            .call()
        {
            Ok(response) => {
                timer.complete();
                response
            }
            Err(e) => {
                timer.complete_with_error();
                return Err(self.map_error(e));
            }
        };

        let mut content = Vec::new();
        response
            .into_reader()
            .take(max_bytes + 1)
            .read_to_end(&mut content)
            .map_err(|e| BotApiError::HttpError(e.to_string()))?;

        if content.len() as u64 > max_bytes {
            return Err(BotApiError::PayloadTooLarge { limit: max_bytes });
        }

        tracing::debug!(bytes = content.len(), "Downloaded file");
        Ok(content)
    }
}

/// A `multipart/form-data` body built in memory.
struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    fn new() -> Self {
        let nanos = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default();
        Self {
            boundary: format!("----sheet-vcf-bot-{:x}", nanos),
            body: Vec::new(),
        }
    }

    fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    fn text(&mut self, name: &str, value: &str) {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
    }

    fn file(&mut self, name: &str, file_name: &str, mime: &str, content: &[u8]) {
        let file_name = file_name.replace(['"', '\r', '\n'], "_");
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, file_name
            )
            .as_bytes(),
        );
        self.body
            .extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime).as_bytes());
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
    }

    fn close(&mut self) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
    }
}
