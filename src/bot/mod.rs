//! Bot runtime: long polling and update dispatch.
//!
//! Updates are fetched with `getUpdates` and each one is handled on its own
//! tokio task, so a slow conversion in one chat never delays another.

pub mod handlers;

pub use handlers::{UpdateHandler, ARCHIVE_FILE_NAME};

use crate::client::BotApi;
use crate::error::BotApiResult;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Fetches updates and hands them to the handler.
pub struct Poller {
    api: Arc<dyn BotApi>,
    handler: Arc<UpdateHandler>,
    poll_timeout: u64,
    offset: i64,
}

impl Poller {
    pub fn new(api: Arc<dyn BotApi>, handler: Arc<UpdateHandler>, poll_timeout: u64) -> Self {
        Self {
            api,
            handler,
            poll_timeout,
            offset: 0,
        }
    }

    /// Next update ID to request.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Run one getUpdates round and spawn a task per update.
    ///
    /// The offset moves past every received update before any of them is
    /// handled, so a handler failure never causes redelivery.
    pub async fn poll_once(&mut self) -> BotApiResult<Vec<JoinHandle<()>>> {
        let updates = self
            .api
            .get_updates(self.offset, self.poll_timeout)
            .await?;

        if !updates.is_empty() {
            tracing::debug!(count = updates.len(), offset = self.offset, "Received updates");
        }

        let mut tasks = Vec::with_capacity(updates.len());
        for update in updates {
            self.offset = self.offset.max(update.update_id + 1);
            let handler = self.handler.clone();
            tasks.push(tokio::spawn(async move {
                handler.handle_update(update).await;
            }));
        }

        Ok(tasks)
    }

    /// Poll forever, backing off exponentially while the API is unreachable.
    pub async fn run(&mut self) {
        let mut backoff = INITIAL_BACKOFF;
        loop {
            match self.poll_once().await {
                Ok(_) => backoff = INITIAL_BACKOFF,
                Err(e) => {
                    tracing::warn!(error = %e, retry_in_secs = backoff.as_secs(), "Polling failed");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }
    }
}

/// Run the bot until Ctrl-C.
///
/// Verifies the token with `getMe`, tells the admin chat the bot is online,
/// then long-polls for updates.
///
/// # Returns
/// An error if the token is rejected or the signal handler cannot be installed
pub async fn run_bot(
    api: Arc<dyn BotApi>,
    handler: Arc<UpdateHandler>,
    poll_timeout: u64,
) -> Result<()> {
    let me = api.get_me().await?;
    tracing::info!(
        username = me.username.as_deref().unwrap_or("<none>"),
        "Bot is connected"
    );
    handler.alert_admin("✅ Bot is online.").await;

    let mut poller = Poller::new(api, handler, poll_timeout);
    tokio::select! {
        _ = poller.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
