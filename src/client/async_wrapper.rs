//! Async wrapper around synchronous BaleClient.
//!
//! This module provides an async interface to the synchronous BaleClient by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use crate::client::BaleClient;
use crate::error::{BotApiError, BotApiResult};
use crate::models::{File, Message, Update, User};
use async_trait::async_trait;
use std::sync::Arc;

/// Async bot API operations used by the update handler.
///
/// The bot only depends on this trait, so tests can substitute an in-memory
/// implementation for the HTTP client.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn get_me(&self) -> BotApiResult<User>;
    async fn get_updates(&self, offset: i64, timeout_secs: u64) -> BotApiResult<Vec<Update>>;

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> BotApiResult<Message>;

    async fn send_document(
        &self,
        chat_id: i64,
        file_name: &str,
        content: Vec<u8>,
        caption: Option<&str>,
        reply_to: Option<i64>,
    ) -> BotApiResult<Message>;

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> BotApiResult<bool>;

    async fn get_file(&self, file_id: &str) -> BotApiResult<File>;
    async fn download_file(&self, file_path: &str, max_bytes: u64) -> BotApiResult<Vec<u8>>;
}

/// Async wrapper around synchronous BaleClient.
///
/// Uses `tokio::task::spawn_blocking` to run synchronous HTTP
/// operations on a dedicated thread pool, preventing blocking
/// the async runtime.
#[derive(Clone)]
pub struct AsyncBaleClient {
    client: Arc<BaleClient>,
}

impl AsyncBaleClient {
    pub fn new(client: BaleClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> BotApiError {
    BotApiError::HttpError(format!("Task join error: {}", e))
}

#[async_trait]
impl BotApi for AsyncBaleClient {
    async fn get_me(&self) -> BotApiResult<User> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.get_me())
            .await
            .map_err(join_error)?
    }

    async fn get_updates(&self, offset: i64, timeout_secs: u64) -> BotApiResult<Vec<Update>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.get_updates(offset, timeout_secs))
            .await
            .map_err(join_error)?
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> BotApiResult<Message> {
        let client = self.client.clone();
        let text = text.to_string();

        tokio::task::spawn_blocking(move || client.send_message(chat_id, &text, reply_to))
            .await
            .map_err(join_error)?
    }

    async fn send_document(
        &self,
        chat_id: i64,
        file_name: &str,
        content: Vec<u8>,
        caption: Option<&str>,
        reply_to: Option<i64>,
    ) -> BotApiResult<Message> {
        let client = self.client.clone();
        let file_name = file_name.to_string();
        let caption = caption.map(str::to_string);

        tokio::task::spawn_blocking(move || {
            client.send_document(
                chat_id,
                &file_name,
                &content,
                caption.as_deref(),
                reply_to,
            )
        })
        .await
        .map_err(join_error)?
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> BotApiResult<bool> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.delete_message(chat_id, message_id))
            .await
            .map_err(join_error)?
    }

    async fn get_file(&self, file_id: &str) -> BotApiResult<File> {
        let client = self.client.clone();
        let file_id = file_id.to_string();

        tokio::task::spawn_blocking(move || client.get_file(&file_id))
            .await
            .map_err(join_error)?
    }

    async fn download_file(&self, file_path: &str, max_bytes: u64) -> BotApiResult<Vec<u8>> {
        let client = self.client.clone();
        let file_path = file_path.to_string();

        tokio::task::spawn_blocking(move || client.download_file(&file_path, max_bytes))
            .await
            .map_err(join_error)?
    }
}
