//! Conversion rate resolution between crypto and fiat currency codes

use futures::future::join;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

use crate::core::cache::Cache;
use crate::core::clock::{Clock, SystemClock};
use crate::core::currency::{CurrencyKind, classify};
use crate::core::price::SpotPriceProvider;

/// Intermediate currency for deriving a cross rate between two cryptos.
const COMMON_QUOTE: &str = "usd";

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    rate: f64,
    fetched_at: Instant,
}

/// Resolves a conversion rate for an ordered currency pair, consulting a
/// short-lived cache before the price source.
///
/// Lookup failures never escape as errors: `resolve` yields `None` to mean
/// "rate unavailable" and leaves the cache untouched.
pub struct RateResolver<P, C = SystemClock>
where
    P: SpotPriceProvider,
    C: Clock,
{
    provider: P,
    cache: Arc<Cache<String, CachedRate>>,
    clock: C,
    validity: Duration,
}

impl<P: SpotPriceProvider> RateResolver<P, SystemClock> {
    pub fn new(provider: P, validity: Duration) -> Self {
        Self::with_clock(provider, validity, SystemClock)
    }
}

impl<P, C> RateResolver<P, C>
where
    P: SpotPriceProvider,
    C: Clock,
{
    pub fn with_clock(provider: P, validity: Duration, clock: C) -> Self {
        Self {
            provider,
            cache: Arc::new(Cache::new()),
            clock,
            validity,
        }
    }

    /// Resolves the rate for converting one unit of `from` into `to`.
    ///
    /// The cache key is directional: resolving A→B does not populate B→A.
    #[instrument(name = "ResolveRate", skip(self))]
    pub async fn resolve(&self, from: &str, to: &str) -> Option<f64> {
        let cache_key = format!("{from}_{to}");
        if let Some(entry) = self.cache.get(&cache_key).await {
            if self.clock.now().duration_since(entry.fetched_at) < self.validity {
                return Some(entry.rate);
            }
            debug!(key = %cache_key, "Cached rate is stale, re-fetching");
        }

        // Identity pairs short-circuit and are not worth caching.
        if from == to {
            return Some(1.0);
        }

        let rate = match (classify(from), classify(to)) {
            (CurrencyKind::Crypto(id), to_kind) if !to_kind.is_crypto() => {
                self.spot(id, &to.to_lowercase()).await
            }
            (CurrencyKind::Crypto(from_id), CurrencyKind::Crypto(to_id)) => {
                self.cross_rate(from_id, to_id).await
            }
            (from_kind, CurrencyKind::Crypto(to_id)) if !from_kind.is_crypto() => {
                self.inverted(to_id, &from.to_lowercase()).await
            }
            // Fiat to fiat is approximated as 1:1; a real fiat rate source
            // is deliberately out of scope. Unknown codes take the same
            // pass-through path.
            (from_kind, to_kind) => {
                if from_kind == CurrencyKind::Unknown || to_kind == CurrencyKind::Unknown {
                    debug!(%from, %to, "Unknown-currency pass-through, rate 1");
                }
                Some(1.0)
            }
        };

        if let Some(rate) = rate {
            self.cache
                .put(
                    cache_key,
                    CachedRate {
                        rate,
                        fetched_at: self.clock.now(),
                    },
                )
                .await;
        }
        rate
    }

    /// Single spot lookup; any provider error degrades to `None`.
    async fn spot(&self, id: &str, vs_currency: &str) -> Option<f64> {
        match self.provider.spot_price(id, vs_currency).await {
            Ok(price) => Some(price),
            Err(e) => {
                debug!(%id, %vs_currency, error = %e, "Spot price lookup failed");
                None
            }
        }
    }

    /// Cross rate between two cryptos via the common quote currency.
    async fn cross_rate(&self, from_id: &str, to_id: &str) -> Option<f64> {
        let (from_quote, to_quote) = join(
            self.spot(from_id, COMMON_QUOTE),
            self.spot(to_id, COMMON_QUOTE),
        )
        .await;
        match (from_quote, to_quote) {
            (Some(f), Some(t)) if f > 0.0 && t > 0.0 => Some(f / t),
            _ => None,
        }
    }

    /// Fiat→crypto: price the crypto in the fiat, then invert.
    async fn inverted(&self, crypto_id: &str, fiat: &str) -> Option<f64> {
        match self.spot(crypto_id, fiat).await {
            Some(price) if price > 0.0 => Some(1.0 / price),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::test_support::FakeClock;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockPriceProvider {
        prices: HashMap<(String, String), f64>,
        call_count: AtomicUsize,
        fail: bool,
    }

    impl MockPriceProvider {
        fn new(prices: &[(&str, &str, f64)]) -> Self {
            Self {
                prices: prices
                    .iter()
                    .map(|(id, vs, p)| ((id.to_string(), vs.to_string()), *p))
                    .collect(),
                call_count: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                prices: HashMap::new(),
                call_count: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SpotPriceProvider for &MockPriceProvider {
        async fn spot_price(&self, id: &str, vs_currency: &str) -> Result<f64> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(anyhow!("simulated transport error"));
            }
            self.prices
                .get(&(id.to_string(), vs_currency.to_string()))
                .copied()
                .ok_or_else(|| anyhow!("No price for {id} in {vs_currency}"))
        }
    }

    fn resolver<'a>(
        provider: &'a MockPriceProvider,
    ) -> RateResolver<&'a MockPriceProvider, SystemClock> {
        RateResolver::new(provider, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_identity_pair_is_one_without_lookup() {
        let provider = MockPriceProvider::new(&[]);
        let resolver = resolver(&provider);

        assert_eq!(resolver.resolve("BTC", "BTC").await, Some(1.0));
        assert_eq!(resolver.resolve("HKD", "HKD").await, Some(1.0));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_crypto_to_fiat() {
        let provider = MockPriceProvider::new(&[("bitcoin", "hkd", 510000.0)]);
        let resolver = resolver(&provider);

        assert_eq!(resolver.resolve("BTC", "HKD").await, Some(510000.0));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_crypto_cross_rate_via_common_quote() {
        let provider =
            MockPriceProvider::new(&[("bitcoin", "usd", 65000.0), ("ethereum", "usd", 3250.0)]);
        let resolver = resolver(&provider);

        let rate = resolver.resolve("BTC", "ETH").await.unwrap();
        assert!((rate - 20.0).abs() < 1e-9);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_fiat_to_crypto_inverts_lookup() {
        let provider = MockPriceProvider::new(&[("bitcoin", "hkd", 500000.0)]);
        let resolver = resolver(&provider);

        let rate = resolver.resolve("HKD", "BTC").await.unwrap();
        assert!((rate - 1.0 / 500000.0).abs() < 1e-15);
    }

    #[tokio::test]
    async fn test_fiat_to_crypto_zero_price_is_unavailable() {
        let provider = MockPriceProvider::new(&[("bitcoin", "hkd", 0.0)]);
        let resolver = resolver(&provider);

        assert_eq!(resolver.resolve("HKD", "BTC").await, None);
    }

    #[tokio::test]
    async fn test_fiat_to_fiat_is_approximated_as_one() {
        let provider = MockPriceProvider::new(&[]);
        let resolver = resolver(&provider);

        assert_eq!(resolver.resolve("HKD", "USD").await, Some(1.0));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_pair_passes_through_as_one() {
        let provider = MockPriceProvider::new(&[]);
        let resolver = resolver(&provider);

        assert_eq!(resolver.resolve("XYZ", "ABC").await, Some(1.0));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_yields_none_not_error() {
        let provider = MockPriceProvider::failing();
        let resolver = resolver(&provider);

        assert_eq!(resolver.resolve("BTC", "HKD").await, None);
        assert_eq!(resolver.resolve("BTC", "ETH").await, None);
        assert_eq!(resolver.resolve("HKD", "BTC").await, None);
    }

    #[tokio::test]
    async fn test_cross_rate_fails_if_either_leg_missing() {
        // ETH price missing from the quote currency
        let provider = MockPriceProvider::new(&[("bitcoin", "usd", 65000.0)]);
        let resolver = resolver(&provider);

        assert_eq!(resolver.resolve("BTC", "ETH").await, None);
    }

    #[tokio::test]
    async fn test_cache_idempotence_within_validity_window() {
        let provider = MockPriceProvider::new(&[("bitcoin", "hkd", 510000.0)]);
        let resolver = resolver(&provider);

        let first = resolver.resolve("BTC", "HKD").await;
        let second = resolver.resolve("BTC", "HKD").await;
        assert_eq!(first, second);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_key_is_directional() {
        let provider = MockPriceProvider::new(&[("bitcoin", "hkd", 500000.0)]);
        let resolver = resolver(&provider);

        assert_eq!(resolver.resolve("BTC", "HKD").await, Some(500000.0));
        // The reverse direction must issue its own lookup.
        let inverse = resolver.resolve("HKD", "BTC").await.unwrap();
        assert!((inverse - 1.0 / 500000.0).abs() < 1e-15);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_cache_expiry_refetches() {
        let provider = MockPriceProvider::new(&[("bitcoin", "hkd", 510000.0)]);
        let clock = FakeClock::new();
        let resolver = RateResolver::with_clock(&provider, Duration::from_secs(60), &clock);

        assert!(resolver.resolve("BTC", "HKD").await.is_some());
        assert_eq!(provider.calls(), 1);

        clock.advance(Duration::from_secs(59));
        assert!(resolver.resolve("BTC", "HKD").await.is_some());
        assert_eq!(provider.calls(), 1);

        clock.advance(Duration::from_secs(2));
        assert!(resolver.resolve("BTC", "HKD").await.is_some());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_lookup_does_not_poison_cache() {
        let provider = MockPriceProvider::failing();
        let resolver = resolver(&provider);

        assert_eq!(resolver.resolve("BTC", "HKD").await, None);
        // A failure is not cached; the next call retries the lookup.
        assert_eq!(resolver.resolve("BTC", "HKD").await, None);
        assert_eq!(provider.calls(), 2);
    }
}
