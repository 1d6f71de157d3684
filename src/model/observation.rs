use chrono::{DateTime, Utc};

/// One timestamped price sample for a product at one competitor.
/// Observations are append-only; timestamps are strictly increasing per
/// (product, competitor) pair in generation order.
#[derive(Debug, Clone)]
pub struct PriceObservation {
    pub product_id: i64,
    pub competitor: String,
    pub price: f64,
    pub original_price: f64,
    pub discount_percent: f64,
    pub in_stock: bool,
    pub url: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

/// A single (timestamp, price) point of a price series, oldest first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub at: DateTime<Utc>,
    pub price: f64,
}

/// Discount relative to MSRP, as a percentage rounded to one decimal.
pub fn discount_percent(msrp: f64, price: f64) -> f64 {
    round1((msrp - price) / msrp * 100.0)
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
