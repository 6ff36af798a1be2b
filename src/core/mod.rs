//! Core business logic abstractions

pub mod cache;
pub mod calc;
pub mod clock;
pub mod config;
pub mod convert;
pub mod currency;
pub mod history;
pub mod log;
pub mod price;
pub mod rate;

// Re-export main types for cleaner imports
pub use convert::{ConversionOutcome, ConversionRecord};
pub use currency::{CurrencyKind, classify};
pub use price::{MarketChartProvider, PricePoint, SpotPriceProvider, TickerEntry, TickerProvider};
pub use rate::RateResolver;
