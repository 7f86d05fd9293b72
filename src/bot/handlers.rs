//! Update handlers: commands and spreadsheet uploads.

use crate::client::BotApi;
use crate::config::Config;
use crate::convert::{ConversionEngine, ConversionSummary, REQUIRED_COLUMNS};
use crate::error::{BotApiError, BotApiResult, ConversionError};
use crate::metrics::Metrics;
use crate::models::{Document, Message, Update};
use std::sync::Arc;

/// Name of the archive sent back to the user.
pub const ARCHIVE_FILE_NAME: &str = "contacts.zip";

const ACCEPTED_EXTENSION: &str = ".xlsx";

const PROCESSING_TEXT: &str = "Processing your file, please wait... ⏳";
const WRONG_FORMAT_TEXT: &str = "❌ Please send an Excel file in .xlsx format.";
const UNEXPECTED_TEXT: &str =
    "❌ An unexpected error occurred. Please try again later or contact support.";

fn welcome_text() -> String {
    format!(
        "🤖 Hi! Send me an Excel (.xlsx) file and I will turn it into contact cards.\n\n\
         The first row must name these columns: {}.\n\
         Contacts are grouped by the {} column; you get one .vcf file per group, \
         packed into a single zip archive.",
        REQUIRED_COLUMNS.join(", "),
        REQUIRED_COLUMNS[2]
    )
}

fn help_text() -> String {
    format!(
        "How to use:\n\
         1. Prepare an .xlsx file whose header row contains {}.\n\
         2. Put one contact per row. Rows without a name or phone are skipped.\n\
         3. Send the file in this chat.\n\
         4. Wait for the zip archive with your .vcf files.\n\n\
         ⚠️ Other formats (such as .xls or .csv) are not supported.",
        REQUIRED_COLUMNS.join(", ")
    )
}

/// Why an upload could not be turned into an archive.
#[derive(Debug)]
enum UploadError {
    Conversion(ConversionError),
    Api(BotApiError),
    Worker(String),
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conversion(e) => write!(f, "{}", e),
            Self::Api(e) => write!(f, "{}", e),
            Self::Worker(e) => write!(f, "conversion worker failed: {}", e),
        }
    }
}

/// Dispatches incoming updates.
///
/// Each update is handled independently; the handler holds no per-chat state,
/// so it can serve many uploads concurrently.
pub struct UpdateHandler {
    api: Arc<dyn BotApi>,
    engine: ConversionEngine,
    admin_chat_id: Option<i64>,
    max_upload_bytes: u64,
    metrics: Metrics,
}

impl UpdateHandler {
    pub fn new(api: Arc<dyn BotApi>, config: &Config, metrics: Metrics) -> Self {
        Self {
            api,
            engine: ConversionEngine::new(),
            admin_chat_id: config.admin_chat_id,
            max_upload_bytes: config.max_upload_bytes,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Handle one update. Failures are logged, never returned.
    pub async fn handle_update(&self, update: Update) {
        let Some(message) = update.message else {
            tracing::trace!(update_id = update.update_id, "Ignoring non-message update");
            return;
        };

        if !message.chat.is_private() {
            tracing::debug!(chat_id = message.chat.id, "Ignoring message outside private chat");
            return;
        }

        if let Err(e) = self.handle_message(&message).await {
            tracing::error!(
                update_id = update.update_id,
                chat_id = message.chat.id,
                error = %e,
                "Failed to handle message"
            );
        }
    }

    async fn handle_message(&self, message: &Message) -> BotApiResult<()> {
        if let Some(document) = &message.document {
            return self.handle_document(message, document).await;
        }

        let reply = match message.command() {
            Some("start") => welcome_text(),
            Some("help") => help_text(),
            _ => return Ok(()),
        };

        self.api
            .send_message(message.chat.id, &reply, Some(message.message_id))
            .await?;
        Ok(())
    }

    async fn handle_document(&self, message: &Message, document: &Document) -> BotApiResult<()> {
        let chat_id = message.chat.id;
        let file_name = document.file_name.as_deref().unwrap_or_default();

        if !is_spreadsheet_name(file_name) {
            tracing::debug!(chat_id, file_name, "Rejected upload with unsupported extension");
            self.api
                .send_message(chat_id, WRONG_FORMAT_TEXT, Some(message.message_id))
                .await?;
            return Ok(());
        }

        if document
            .file_size
            .is_some_and(|size| size > self.max_upload_bytes)
        {
            tracing::debug!(chat_id, size = document.file_size, "Rejected oversized upload");
            self.api
                .send_message(chat_id, &self.too_large_text(), Some(message.message_id))
                .await?;
            return Ok(());
        }

        let progress = self
            .api
            .send_message(chat_id, PROCESSING_TEXT, Some(message.message_id))
            .await?;

        let outcome = self.process_upload(message, document).await;
        let reported = self.report_outcome(message, outcome).await;

        // The progress note goes away whatever happened above.
        if let Err(e) = self.api.delete_message(chat_id, progress.message_id).await {
            tracing::warn!(chat_id, error = %e, "Failed to delete progress message");
        }

        reported
    }

    async fn process_upload(
        &self,
        message: &Message,
        document: &Document,
    ) -> Result<ConversionSummary, UploadError> {
        let file = self
            .api
            .get_file(&document.file_id)
            .await
            .map_err(UploadError::Api)?;
        let file_path = file.file_path.ok_or_else(|| {
            UploadError::Api(BotApiError::NotFound(format!(
                "no download path for file {}",
                document.file_id
            )))
        })?;

        let content = self
            .api
            .download_file(&file_path, self.max_upload_bytes)
            .await
            .map_err(UploadError::Api)?;

        let engine = self.engine;
        let mut summary = tokio::task::spawn_blocking(move || engine.convert_with_summary(&content))
            .await
            .map_err(|e| UploadError::Worker(e.to_string()))?
            .map_err(UploadError::Conversion)?;

        let caption = format!(
            "✅ {} contact(s) in {} file(s). Open the .vcf files on your phone to import them.",
            summary.contacts,
            summary.entries.len()
        );
        self.api
            .send_document(
                message.chat.id,
                ARCHIVE_FILE_NAME,
                std::mem::take(&mut summary.archive),
                Some(&caption),
                Some(message.message_id),
            )
            .await
            .map_err(UploadError::Api)?;

        Ok(summary)
    }

    async fn report_outcome(
        &self,
        message: &Message,
        outcome: Result<ConversionSummary, UploadError>,
    ) -> BotApiResult<()> {
        let chat_id = message.chat.id;
        let user_id = message.sender_id();

        let reply = match outcome {
            Ok(summary) => {
                self.metrics
                    .record_conversion(summary.contacts, summary.rejected_rows);
                tracing::info!(
                    chat_id,
                    user_id,
                    contacts = summary.contacts,
                    rejected_rows = summary.rejected_rows,
                    entries = summary.entries.len(),
                    "Delivered contact archive"
                );
                return Ok(());
            }
            Err(UploadError::Conversion(e)) if e.is_user_facing() => {
                self.metrics.record_conversion_failure();
                tracing::warn!(chat_id, user_id, kind = %e.kind(), error = %e, "Conversion rejected upload");
                format!("❌ {}", e.user_message())
            }
            Err(UploadError::Api(BotApiError::PayloadTooLarge { .. })) => {
                tracing::warn!(chat_id, user_id, "Upload exceeded size limit during download");
                self.too_large_text()
            }
            Err(e) => {
                if matches!(e, UploadError::Conversion(_)) {
                    self.metrics.record_conversion_failure();
                }
                tracing::error!(chat_id, user_id, error = %e, "Unexpected failure handling upload");
                self.alert_admin(&format!(
                    "⚠️ Unexpected error for user {}: {}",
                    user_id.map_or_else(|| "unknown".to_string(), |id| id.to_string()),
                    e
                ))
                .await;
                UNEXPECTED_TEXT.to_string()
            }
        };

        self.api
            .send_message(chat_id, &reply, Some(message.message_id))
            .await?;
        Ok(())
    }

    /// Send a note to the admin chat, if one is configured.
    pub async fn alert_admin(&self, text: &str) {
        let Some(admin_chat_id) = self.admin_chat_id else {
            return;
        };

        if let Err(e) = self.api.send_message(admin_chat_id, text, None).await {
            tracing::warn!(admin_chat_id, error = %e, "Failed to alert admin");
        }
    }

    fn too_large_text(&self) -> String {
        format!(
            "❌ The file is too large. The limit is {} KB.",
            self.max_upload_bytes / 1024
        )
    }
}

fn is_spreadsheet_name(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(ACCEPTED_EXTENSION)
}
