use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::config::ProviderConfig;
use crate::core::price::{
    MarketChartProvider, PricePoint, SpotPriceProvider, TickerEntry, TickerProvider,
};

/// CoinGecko HTTP client. The API key header name is configurable because
/// demo and pro account tiers expect different headers.
pub struct CoinGeckoProvider {
    base_url: String,
    api_key: Option<String>,
    api_key_header: String,
    client: Client,
}

impl CoinGeckoProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder().user_agent("coinvert/0.2").build()?;
        Ok(CoinGeckoProvider {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            api_key_header: config.api_key_header.clone(),
            client,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("Requesting {}", url);
        let mut request = self.client.get(url).header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header(self.api_key_header.as_str(), key.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for URL: {}", response.status(), url));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| anyhow!("Failed to parse response: {e}"))
    }

    /// Upstream connectivity check.
    pub async fn ping(&self) -> Result<()> {
        let url = format!("{}/ping", self.base_url);
        let _: serde_json::Value = self.get_json(&url).await?;
        Ok(())
    }
}

// simple/price returns {"bitcoin": {"usd": 65000.0, "usd_24h_change": -1.2}};
// change fields can be null.
type SimplePriceResponse = HashMap<String, HashMap<String, Option<f64>>>;

#[derive(Debug, serde::Deserialize)]
struct MarketChartResponse {
    prices: Vec<(f64, f64)>,
}

#[async_trait]
impl SpotPriceProvider for CoinGeckoProvider {
    #[instrument(name = "SpotPriceFetch", skip(self))]
    async fn spot_price(&self, id: &str, vs_currency: &str) -> Result<f64> {
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies={}&include_24hr_change=false&precision=full",
            self.base_url, id, vs_currency
        );
        let data: SimplePriceResponse = self.get_json(&url).await?;

        data.get(id)
            .and_then(|quotes| quotes.get(vs_currency))
            .and_then(|price| *price)
            .ok_or_else(|| anyhow!("No price for {} in {}", id, vs_currency))
    }
}

#[async_trait]
impl TickerProvider for CoinGeckoProvider {
    async fn fetch_ticker(&self, ids: &[&str]) -> Result<Vec<TickerEntry>> {
        let joined = ids.join(",");
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true&precision=full",
            self.base_url, joined
        );
        let data: SimplePriceResponse = self.get_json(&url).await?;

        // Preserve the requested order; skip ids the source does not know.
        let entries = ids
            .iter()
            .filter_map(|id| {
                let quotes = data.get(*id)?;
                let price_usd = quotes.get("usd").copied().flatten()?;
                Some(TickerEntry {
                    id: id.to_string(),
                    price_usd,
                    change_24h_pct: quotes.get("usd_24h_change").copied().flatten(),
                })
            })
            .collect::<Vec<_>>();

        if entries.is_empty() {
            return Err(anyhow!("No ticker data for ids: {joined}"));
        }
        Ok(entries)
    }
}

#[async_trait]
impl MarketChartProvider for CoinGeckoProvider {
    #[instrument(name = "MarketChartFetch", skip(self))]
    async fn market_chart(&self, id: &str) -> Result<Vec<PricePoint>> {
        let url = format!(
            "{}/coins/{}/market_chart?vs_currency=usd&days=1",
            self.base_url, id
        );
        let data: MarketChartResponse = self.get_json(&url).await?;

        if data.prices.is_empty() {
            return Err(anyhow!("Empty price series for {id}"));
        }
        Ok(data
            .prices
            .into_iter()
            .map(|(ts, price)| PricePoint {
                timestamp_ms: ts as i64,
                price,
            })
            .collect())
    }
}
