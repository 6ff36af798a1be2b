//! Currency code classification and display metadata

/// How a currency code participates in rate resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyKind {
    /// Known crypto asset with a price-source id.
    Crypto(&'static str),
    /// Known fiat currency with display metadata.
    Fiat,
    /// Code absent from both tables. Handled by the unknown-currency
    /// pass-through policy: behaves like fiat, 1:1.
    Unknown,
}

impl CurrencyKind {
    pub fn is_crypto(&self) -> bool {
        matches!(self, CurrencyKind::Crypto(_))
    }
}

/// Display metadata for a fiat currency.
#[derive(Debug, Clone, Copy)]
pub struct FiatInfo {
    pub symbol: &'static str,
    pub name: &'static str,
}

/// Maps a crypto currency code to its CoinGecko id.
pub fn coingecko_id(code: &str) -> Option<&'static str> {
    let id = match code {
        "BTC" => "bitcoin",
        "ETH" => "ethereum",
        "DOGE" => "dogecoin",
        "PEPE" => "pepe",
        "USDT" => "tether",
        "BNB" => "binancecoin",
        "XRP" => "ripple",
        "ADA" => "cardano",
        "SOL" => "solana",
        _ => return None,
    };
    Some(id)
}

pub fn fiat_info(code: &str) -> Option<FiatInfo> {
    let info = match code {
        "HKD" => FiatInfo {
            symbol: "HK$",
            name: "Hong Kong Dollar",
        },
        "USD" => FiatInfo {
            symbol: "$",
            name: "US Dollar",
        },
        "CNY" => FiatInfo {
            symbol: "¥",
            name: "Chinese Yuan",
        },
        "JPY" => FiatInfo {
            symbol: "¥",
            name: "Japanese Yen",
        },
        "EUR" => FiatInfo {
            symbol: "€",
            name: "Euro",
        },
        "TWD" => FiatInfo {
            symbol: "NT$",
            name: "New Taiwan Dollar",
        },
        _ => return None,
    };
    Some(info)
}

pub fn classify(code: &str) -> CurrencyKind {
    if let Some(id) = coingecko_id(code) {
        CurrencyKind::Crypto(id)
    } else if fiat_info(code).is_some() {
        CurrencyKind::Fiat
    } else {
        CurrencyKind::Unknown
    }
}

/// Formats a value for display in the given currency. Fiat uses the
/// configured symbol with two decimals; crypto amounts keep more precision
/// since sub-unit prices are common.
pub fn format_amount(value: f64, code: &str) -> String {
    if let Some(info) = fiat_info(code) {
        return format!("{}{:.2}", info.symbol, value);
    }
    if value.abs() >= 1.0 {
        format!("{value:.6} {code}")
    } else {
        format!("{value:.8} {code}")
    }
}
