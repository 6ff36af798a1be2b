//! Conversion orchestration on top of the rate resolver

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::clock::Clock;
use crate::core::price::SpotPriceProvider;
use crate::core::rate::RateResolver;

/// A completed conversion, as stored in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub amount: f64,
    pub from: String,
    pub result: f64,
    pub to: String,
    pub rate: f64,
    pub converted_at: DateTime<Utc>,
}

/// Outcome of a conversion request. Failures are values, not errors, so the
/// caller can render them without unwinding.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Converted(ConversionRecord),
    /// Requested amount was not a positive finite number. No lookup runs.
    InvalidAmount,
    /// The resolver could not produce a rate.
    RateUnavailable,
}

/// Validates the amount, resolves the rate and computes the result.
pub async fn convert<P, C>(
    resolver: &RateResolver<P, C>,
    amount: f64,
    from: &str,
    to: &str,
) -> ConversionOutcome
where
    P: SpotPriceProvider,
    C: Clock,
{
    if !amount.is_finite() || amount <= 0.0 {
        return ConversionOutcome::InvalidAmount;
    }

    match resolver.resolve(from, to).await {
        Some(rate) => ConversionOutcome::Converted(ConversionRecord {
            amount,
            from: from.to_string(),
            result: amount * rate,
            to: to.to_string(),
            rate,
            converted_at: Utc::now(),
        }),
        None => ConversionOutcome::RateUnavailable,
    }
}
