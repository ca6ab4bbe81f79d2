use async_trait::async_trait;
use crate::domain::entities::PriceRecord;
use crate::application::errors::OzonError;

/// Source of product prices - abstraction over the marketplace seller API
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch prices for at most `limit` products from the first page of the catalog
    async fn fetch_prices(&self, limit: usize) -> Result<Vec<PriceRecord>, OzonError>;
}
