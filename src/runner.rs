//! Long-polling loop

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::application::errors::BotError;
use crate::application::services::MessageService;
use crate::domain::entities::User;
use crate::infrastructure::adapters::telegram::{TelegramAdapter, Update};

/// Pause after a failed getUpdates call
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

pub type TelegramService = MessageService<TelegramAdapter>;

/// Handle one update. Each update runs in its own task so a panicking handler
/// is logged instead of taking the loop down.
pub async fn handle_update(service: &Arc<TelegramService>, update: &Update) {
    let Some(msg) = &update.message else {
        return;
    };
    let Some(text) = msg.text.clone() else {
        return;
    };

    let chat_id = msg.chat.id.to_string();
    let sender = msg.from.as_ref().map(User::from);

    let svc = Arc::clone(service);
    let task_chat = chat_id.clone();
    let handle = tokio::spawn(async move { svc.process(&task_chat, &text, sender).await });

    match handle.await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => tracing::error!("[{}] Failed to handle update {}: {}", chat_id, update.update_id, e),
        Err(e) => tracing::error!("[{}] Handler for update {} aborted: {}", chat_id, update.update_id, e),
    }
}

/// Handle a received batch in order and return the next offset
pub async fn handle_batch(service: &Arc<TelegramService>, updates: &[Update], offset: i64) -> i64 {
    if !updates.is_empty() {
        tracing::info!("Received {} updates", updates.len());
    }

    for update in updates {
        handle_update(service, update).await;
    }

    TelegramAdapter::get_next_offset(updates, offset)
}

/// One getUpdates round: handle everything received and return the next offset
pub async fn poll_once(service: &Arc<TelegramService>, offset: i64, timeout_secs: u64) -> Result<i64, BotError> {
    let updates = service.bot().get_updates(offset, timeout_secs).await?;
    Ok(handle_batch(service, &updates, offset).await)
}

/// Poll until Ctrl+C
pub async fn run_polling(service: Arc<TelegramService>, timeout_secs: u64) {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down...");
    };
    run_until(service, timeout_secs, shutdown).await;
}

/// Poll until `shutdown` resolves and return the last confirmed offset.
///
/// Shutdown only interrupts the wait for updates or the pause after an error.
/// A batch already received is handled to the end, and its offset is sent
/// back to Telegram before returning so those updates are not delivered again.
pub async fn run_until<F>(service: Arc<TelegramService>, timeout_secs: u64, shutdown: F) -> i64
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut offset: i64 = 0;
    let mut pending_ack = false;

    tracing::info!("Starting message loop...");

    loop {
        let result = tokio::select! {
            biased;
            _ = &mut shutdown => break,
            result = service.bot().get_updates(offset, timeout_secs) => result,
        };

        match result {
            Ok(updates) => {
                let next = handle_batch(&service, &updates, offset).await;
                pending_ack = next != offset;
                offset = next;
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::select! {
                    biased;
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(ERROR_BACKOFF) => {}
                }
            }
        }
    }

    if pending_ack {
        // getUpdates with a new offset confirms everything before it
        if let Err(e) = service.bot().get_updates(offset, 0).await {
            tracing::warn!("Failed to confirm offset {}: {}", offset, e);
        }
    }

    offset
}
