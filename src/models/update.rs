//! Updates, messages and files exchanged with the bot API.

use serde::{Deserialize, Serialize};

/// Envelope every bot API method responds with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,

    pub result: Option<T>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub error_code: Option<u16>,
}

/// An incoming update from getUpdates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Update {
    pub update_id: i64,

    #[serde(default)]
    pub message: Option<Message>,
}

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub message_id: i64,

    #[serde(default)]
    pub from: Option<User>,

    pub chat: Chat,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub caption: Option<String>,

    #[serde(default)]
    pub document: Option<Document>,
}

impl Message {
    /// The bot command in this message, without the leading slash or any
    /// `@botname` suffix.
    pub fn command(&self) -> Option<&str> {
        let text = self.text.as_deref()?.trim();
        let word = text.strip_prefix('/')?.split_whitespace().next()?;
        Some(word.split('@').next().unwrap_or(word))
    }

    /// ID of the sender, when known.
    pub fn sender_id(&self) -> Option<i64> {
        self.from.as_ref().map(|user| user.id)
    }
}

/// A chat (private, group or channel).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chat {
    pub id: i64,

    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Chat {
    pub fn is_private(&self) -> bool {
        self.kind == "private"
    }
}

/// A user or bot account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

/// A file attached to a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub file_id: String,

    #[serde(default)]
    pub file_name: Option<String>,

    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub file_size: Option<u64>,
}

/// A file ready to be downloaded, as returned by getFile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct File {
    pub file_id: String,

    #[serde(default)]
    pub file_size: Option<u64>,

    #[serde(default)]
    pub file_path: Option<String>,
}
