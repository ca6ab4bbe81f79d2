//! Ozon Seller API client

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::errors::OzonError;
use crate::domain::entities::{Amount, PriceRecord};
use crate::domain::traits::PriceSource;

/// Ozon Seller API base URL
pub const API_BASE: &str = "https://api-seller.ozon.ru";

/// Longest error body quoted back to the user
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Serialize)]
struct ProductListRequest<'a> {
    filter: ProductFilter<'a>,
    last_id: &'a str,
    limit: usize,
}

#[derive(Debug, Serialize)]
struct ProductFilter<'a> {
    visibility: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProductListResponse {
    result: ProductListResult,
}

#[derive(Debug, Deserialize)]
struct ProductListResult {
    #[serde(default)]
    items: Vec<ProductItem>,
}

#[derive(Debug, Deserialize)]
pub struct ProductItem {
    pub product_id: i64,
    #[serde(default)]
    pub offer_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct PricesRequest<'a> {
    product_id: &'a [i64],
}

/// Prices come back as `{"result": [...]}`, `{"result": {"items": [...]}}`
/// or `{"items": [...]}` depending on the API version
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PricesResponse {
    Wrapped { result: PricesResult },
    Items { items: Vec<PriceItem> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PricesResult {
    List(Vec<PriceItem>),
    Page { items: Vec<PriceItem> },
}

impl PricesResponse {
    fn into_items(self) -> Vec<PriceItem> {
        match self {
            PricesResponse::Wrapped { result: PricesResult::List(items) }
            | PricesResponse::Wrapped { result: PricesResult::Page { items } }
            | PricesResponse::Items { items } => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PriceItem {
    product_id: i64,
    #[serde(default)]
    offer_id: Option<String>,
    #[serde(default, alias = "price")]
    prices: Option<PriceValues>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceValues {
    price: Option<Amount>,
    old_price: Option<Amount>,
    price_with_discount: Option<Amount>,
    currency_code: Option<String>,
}

impl From<PriceItem> for PriceRecord {
    fn from(item: PriceItem) -> Self {
        let offer_id = item.offer_id
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| item.product_id.to_string());
        let prices = item.prices.unwrap_or_default();
        PriceRecord {
            offer_id,
            product_id: item.product_id,
            price: prices.price,
            old_price: prices.old_price,
            price_with_discount: prices.price_with_discount,
            currency_code: prices.currency_code,
        }
    }
}

/// Ozon Seller API client, authenticated with the `Client-Id` / `Api-Key` pair
pub struct OzonClient {
    client: Client,
    base_url: String,
    client_id: String,
    api_key: String,
}

impl OzonClient {
    pub fn new(client_id: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, OzonError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OzonError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: API_BASE.to_string(),
            client_id: client_id.into(),
            api_key: api_key.into(),
        })
    }

    /// Point the client at another host (mock servers, sandboxes)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<T: Serialize + ?Sized, R: DeserializeOwned>(&self, path: &str, body: &T) -> Result<R, OzonError> {
        let response = self.client
            .post(self.url(path))
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let response = check_status(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| OzonError::Malformed(e.to_string()))
    }

    /// First page of the product catalog, all visibilities
    pub async fn list_products(&self, limit: usize) -> Result<Vec<ProductItem>, OzonError> {
        let request = ProductListRequest {
            filter: ProductFilter { visibility: "ALL" },
            last_id: "",
            limit,
        };
        let data: ProductListResponse = self.post("/v3/product/list", &request).await?;
        tracing::debug!("Ozon product list returned {} items", data.result.items.len());
        Ok(data.result.items)
    }

    /// Prices for the given product ids
    pub async fn prices_by_product_ids(&self, product_ids: &[i64]) -> Result<Vec<PriceRecord>, OzonError> {
        let request = PricesRequest { product_id: product_ids };
        let data: PricesResponse = self.post("/v4/product/info/prices", &request).await?;
        Ok(data.into_items().into_iter().map(PriceRecord::from).collect())
    }
}

async fn check_status(response: Response) -> Result<Response, OzonError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(OzonError::Auth(status.as_u16()));
    }
    let body = response.text().await.unwrap_or_default();
    Err(OzonError::Status {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY).collect(),
    })
}

#[async_trait]
impl PriceSource for OzonClient {
    async fn fetch_prices(&self, limit: usize) -> Result<Vec<PriceRecord>, OzonError> {
        let products = self.list_products(limit).await?;
        let ids: Vec<i64> = products.iter().take(limit).map(|p| p.product_id).collect();
        if ids.is_empty() {
            return Err(OzonError::Empty);
        }

        let mut records = self.prices_by_product_ids(&ids).await?;
        records.truncate(limit);
        Ok(records)
    }
}
