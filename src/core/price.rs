//! Pricing abstractions and core types

use anyhow::Result;
use async_trait::async_trait;

/// Spot price of a single asset denominated in a single currency.
#[async_trait]
pub trait SpotPriceProvider: Send + Sync {
    /// Fetches the current price of `id` (a price-source asset id, e.g.
    /// "bitcoin") denominated in `vs_currency` (lowercase code, e.g. "hkd").
    async fn spot_price(&self, id: &str, vs_currency: &str) -> Result<f64>;
}

/// A popular-coin ticker entry: USD price plus 24h change.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerEntry {
    pub id: String,
    pub price_usd: f64,
    pub change_24h_pct: Option<f64>,
}

#[async_trait]
pub trait TickerProvider: Send + Sync {
    /// Fetches current USD prices and 24h changes for the given asset ids.
    async fn fetch_ticker(&self, ids: &[&str]) -> Result<Vec<TickerEntry>>;
}

/// One point of a historical price series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp_ms: i64,
    pub price: f64,
}

#[async_trait]
pub trait MarketChartProvider: Send + Sync {
    /// Fetches the 24h USD price series for the given asset id.
    async fn market_chart(&self, id: &str) -> Result<Vec<PricePoint>>;
}
