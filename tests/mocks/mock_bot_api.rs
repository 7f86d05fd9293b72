use async_trait::async_trait;
use sheet_vcf_bot::client::BotApi;
use sheet_vcf_bot::error::{BotApiError, BotApiResult};
use sheet_vcf_bot::models::{Chat, File, Message, Update, User};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

/// A text message the bot sent.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: String,
    pub reply_to: Option<i64>,
}

/// A document the bot uploaded.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SentDocument {
    pub chat_id: i64,
    pub file_name: String,
    pub content: Vec<u8>,
    pub caption: Option<String>,
    pub reply_to: Option<i64>,
}

/// In-memory bot API for testing.
///
/// Files registered with `add_file` are served from `documents/<file_id>`.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockBotApi {
    messages: Arc<Mutex<Vec<SentMessage>>>,
    documents: Arc<Mutex<Vec<SentDocument>>>,
    deleted: Arc<Mutex<Vec<(i64, i64)>>>,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    updates: Arc<Mutex<VecDeque<Vec<Update>>>>,
    requested_offsets: Arc<Mutex<Vec<i64>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    fail_downloads: Arc<AtomicBool>,
    next_message_id: Arc<AtomicI64>,
}

#[allow(dead_code)]
impl MockBotApi {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            documents: Arc::new(Mutex::new(Vec::new())),
            deleted: Arc::new(Mutex::new(Vec::new())),
            files: Arc::new(Mutex::new(HashMap::new())),
            updates: Arc::new(Mutex::new(VecDeque::new())),
            requested_offsets: Arc::new(Mutex::new(Vec::new())),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
            fail_downloads: Arc::new(AtomicBool::new(false)),
            next_message_id: Arc::new(AtomicI64::new(1000)),
        }
    }

    pub fn add_file(&self, file_id: &str, content: Vec<u8>) {
        let mut files = self.files.lock().unwrap();
        files.insert(file_id.to_string(), content);
    }

    /// Queue a batch returned by the next getUpdates call.
    pub fn push_updates(&self, batch: Vec<Update>) {
        let mut updates = self.updates.lock().unwrap();
        updates.push_back(batch);
    }

    pub fn fail_downloads(&self, fail: bool) {
        self.fail_downloads.store(fail, Ordering::SeqCst);
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Texts sent to one chat, in order.
    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text.clone())
            .collect()
    }

    pub fn sent_documents(&self) -> Vec<SentDocument> {
        self.documents.lock().unwrap().clone()
    }

    pub fn deleted_messages(&self) -> Vec<(i64, i64)> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn requested_offsets(&self) -> Vec<i64> {
        self.requested_offsets.lock().unwrap().clone()
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }
}

impl Default for MockBotApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BotApi for MockBotApi {
    async fn get_me(&self) -> BotApiResult<User> {
        self.track_call("get_me");
        Ok(User {
            id: 1,
            is_bot: true,
            first_name: "Sheets".to_string(),
            username: Some("sheet_vcf_bot".to_string()),
        })
    }

    async fn get_updates(&self, offset: i64, _timeout_secs: u64) -> BotApiResult<Vec<Update>> {
        self.track_call("get_updates");
        self.requested_offsets.lock().unwrap().push(offset);
        let mut updates = self.updates.lock().unwrap();
        Ok(updates.pop_front().unwrap_or_default())
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> BotApiResult<Message> {
        self.track_call("send_message");
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().unwrap().push(SentMessage {
            chat_id,
            message_id,
            text: text.to_string(),
            reply_to,
        });

        Ok(Message {
            message_id,
            from: None,
            chat: Chat {
                id: chat_id,
                kind: "private".to_string(),
            },
            text: Some(text.to_string()),
            caption: None,
            document: None,
        })
    }

    async fn send_document(
        &self,
        chat_id: i64,
        file_name: &str,
        content: Vec<u8>,
        caption: Option<&str>,
        reply_to: Option<i64>,
    ) -> BotApiResult<Message> {
        self.track_call("send_document");
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        self.documents.lock().unwrap().push(SentDocument {
            chat_id,
            file_name: file_name.to_string(),
            content,
            caption: caption.map(str::to_string),
            reply_to,
        });

        Ok(Message {
            message_id,
            from: None,
            chat: Chat {
                id: chat_id,
                kind: "private".to_string(),
            },
            text: None,
            caption: caption.map(str::to_string),
            document: None,
        })
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> BotApiResult<bool> {
        self.track_call("delete_message");
        self.deleted.lock().unwrap().push((chat_id, message_id));
        Ok(true)
    }

    async fn get_file(&self, file_id: &str) -> BotApiResult<File> {
        self.track_call("get_file");
        let files = self.files.lock().unwrap();
        let content = files
            .get(file_id)
            .ok_or_else(|| BotApiError::NotFound(file_id.to_string()))?;

        Ok(File {
            file_id: file_id.to_string(),
            file_size: Some(content.len() as u64),
            file_path: Some(format!("documents/{}", file_id)),
        })
    }

    async fn download_file(&self, file_path: &str, max_bytes: u64) -> BotApiResult<Vec<u8>> {
        self.track_call("download_file");
        if self.fail_downloads.load(Ordering::SeqCst) {
            return Err(BotApiError::HttpError("Connection failed".to_string()));
        }

        let file_id = file_path.trim_start_matches("documents/");
        let files = self.files.lock().unwrap();
        let content = files
            .get(file_id)
            .cloned()
            .ok_or_else(|| BotApiError::NotFound(file_path.to_string()))?;

        if content.len() as u64 > max_bytes {
            return Err(BotApiError::PayloadTooLarge { limit: max_bytes });
        }
        Ok(content)
    }
}
