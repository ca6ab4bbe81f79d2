use serde::Deserialize;
use std::fmt;

/// A price value as Ozon returns it: usually a decimal string, sometimes a number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Text(s) => f.write_str(s),
            Amount::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One product's prices, as returned by the seller API
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub offer_id: String,
    pub product_id: i64,
    pub price: Option<Amount>,
    pub old_price: Option<Amount>,
    pub price_with_discount: Option<Amount>,
    pub currency_code: Option<String>,
}

impl PriceRecord {
    pub fn new(offer_id: impl Into<String>, product_id: i64) -> Self {
        Self {
            offer_id: offer_id.into(),
            product_id,
            price: None,
            old_price: None,
            price_with_discount: None,
            currency_code: None,
        }
    }

    pub fn with_price(mut self, price: impl Into<String>, currency: impl Into<String>) -> Self {
        self.price = Some(Amount::Text(price.into()));
        self.currency_code = Some(currency.into());
        self
    }

    /// Render as a single reply line
    pub fn to_line(&self) -> String {
        format!(
            "{}: {} {} (old: {}, disc: {})",
            self.offer_id,
            or_dash(&self.price),
            self.currency_code.as_deref().unwrap_or("-"),
            or_dash(&self.old_price),
            or_dash(&self.price_with_discount),
        )
    }
}

fn or_dash(amount: &Option<Amount>) -> String {
    amount.as_ref().map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for PriceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Join records into reply text, one line per record
pub fn format_price_lines(records: &[PriceRecord]) -> String {
    records.iter()
        .map(PriceRecord::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}
