//! Price lookups for the `/prices` command

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::errors::{CommandError, OzonError};
use crate::application::replies;
use crate::domain::entities::{format_price_lines, CommandHandler, Message};
use crate::domain::traits::PriceSource;

/// Default number of products shown by `/prices`
pub const DEFAULT_PRICE_LIMIT: usize = 10;

/// Turns a price source into reply text. Never fails: errors become the reply.
pub struct PriceService {
    source: Option<Arc<dyn PriceSource>>,
    limit: usize,
}

impl PriceService {
    pub fn new(source: Option<Arc<dyn PriceSource>>) -> Self {
        Self {
            source,
            limit: DEFAULT_PRICE_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Fetch prices, truncated to the limit
    pub async fn fetch(&self) -> Result<Vec<crate::domain::entities::PriceRecord>, OzonError> {
        let source = self.source.as_ref().ok_or(OzonError::NotConfigured)?;
        let mut records = source.fetch_prices(self.limit).await?;
        if records.is_empty() {
            return Err(OzonError::Empty);
        }
        records.truncate(self.limit);
        Ok(records)
    }

    /// Reply text for `/prices`
    pub async fn reply(&self) -> String {
        match self.fetch().await {
            Ok(records) => {
                tracing::info!("Fetched {} price records", records.len());
                format_price_lines(&records)
            }
            Err(OzonError::NotConfigured) => replies::OZON_NOT_CONFIGURED.to_string(),
            Err(e) => {
                tracing::warn!("Ozon price lookup failed: {}", e);
                format!("{}: {}", replies::OZON_ERROR_PREFIX, e)
            }
        }
    }
}

/// `/prices` handler: access check, then the price service
pub struct PricesCommand {
    service: PriceService,
    admin_ids: Vec<String>,
}

impl PricesCommand {
    pub fn new(service: PriceService, admin_ids: Vec<String>) -> Self {
        Self { service, admin_ids }
    }

    /// Empty admin list means everyone is allowed
    fn is_allowed(&self, message: &Message) -> bool {
        if self.admin_ids.is_empty() {
            return true;
        }
        message.sender_id()
            .map(|id| self.admin_ids.iter().any(|a| a == id))
            .unwrap_or(false)
    }
}

#[async_trait]
impl CommandHandler for PricesCommand {
    async fn handle(&self, message: &Message) -> Result<String, CommandError> {
        if !self.is_allowed(message) {
            tracing::warn!("Denied /prices for sender {:?} in chat {}", message.sender_id(), message.chat_id);
            return Err(CommandError::PermissionDenied);
        }
        Ok(self.service.reply().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{PriceRecord, User};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSource {
        count: usize,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(count: usize) -> Self {
            Self { count, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl PriceSource for FixedSource {
        async fn fetch_prices(&self, _limit: usize) -> Result<Vec<PriceRecord>, OzonError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..self.count)
                .map(|i| PriceRecord::new(format!("SKU-{}", i), i as i64).with_price("100", "RUB"))
                .collect())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl PriceSource for FailingSource {
        async fn fetch_prices(&self, _limit: usize) -> Result<Vec<PriceRecord>, OzonError> {
            Err(OzonError::Auth(401))
        }
    }

    #[tokio::test]
    async fn test_reply_truncates_to_limit() {
        let service = PriceService::new(Some(Arc::new(FixedSource::new(25))));
        assert_eq!(service.reply().await.lines().count(), 10);
    }

    #[tokio::test]
    async fn test_reply_keeps_short_lists() {
        let service = PriceService::new(Some(Arc::new(FixedSource::new(4))));
        assert_eq!(service.reply().await.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_empty_result_is_an_error_reply() {
        let service = PriceService::new(Some(Arc::new(FixedSource::new(0))));
        let reply = service.reply().await;
        assert!(reply.starts_with(replies::OZON_ERROR_PREFIX));
        assert!(reply.contains("no products"));
    }

    #[tokio::test]
    async fn test_source_error_becomes_reply() {
        let service = PriceService::new(Some(Arc::new(FailingSource)));
        let reply = service.reply().await;
        assert!(reply.contains("authentication failed"));
    }

    #[tokio::test]
    async fn test_missing_source_reply() {
        let service = PriceService::new(None);
        assert_eq!(service.reply().await, replies::OZON_NOT_CONFIGURED);
    }

    #[tokio::test]
    async fn test_admin_list_blocks_other_senders() {
        let source = Arc::new(FixedSource::new(3));
        let command = PricesCommand::new(PriceService::new(Some(source.clone())), vec!["1".to_string()]);

        let stranger = Message::from_command("5", "prices", vec![]).with_sender(User::new("5"));
        assert!(matches!(command.handle(&stranger).await, Err(CommandError::PermissionDenied)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);

        let admin = Message::from_command("1", "prices", vec![]).with_sender(User::new("1"));
        assert_eq!(command.handle(&admin).await.unwrap().lines().count(), 3);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
