use anyhow::Result;
use chrono::{Local, TimeZone};

use super::ui;
use crate::core::currency::coingecko_id;
use crate::core::price::{MarketChartProvider, PricePoint};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 48;

/// Accepts either a currency code ("BTC") or a raw price-source id
/// ("bitcoin").
fn chart_id(coin: &str) -> String {
    coingecko_id(&coin.to_uppercase())
        .map(str::to_string)
        .unwrap_or_else(|| coin.to_lowercase())
}

/// Downsamples the series to a fixed-width sparkline.
fn sparkline(points: &[PricePoint]) -> String {
    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let width = SPARK_WIDTH.min(prices.len());
    (0..width)
        .map(|i| {
            let idx = i * prices.len() / width;
            let level = if span > 0.0 {
                (((prices[idx] - min) / span) * (SPARK_LEVELS.len() - 1) as f64).round() as usize
            } else {
                0
            };
            SPARK_LEVELS[level]
        })
        .collect()
}

pub async fn run(provider: &(dyn MarketChartProvider + Send + Sync), coin: &str) -> Result<()> {
    let id = chart_id(coin);

    let spinner = ui::new_spinner("Fetching price history...");
    let points = provider.market_chart(&id).await;
    spinner.finish_and_clear();

    let points = match points {
        Ok(points) => points,
        Err(e) => {
            tracing::debug!(error = %e, "Chart fetch failed");
            println!(
                "{}",
                ui::style_text(
                    &format!("Could not load price history for {id}"),
                    ui::StyleType::Error
                )
            );
            return Ok(());
        }
    };

    let open = points.first().map(|p| p.price).unwrap_or_default();
    let last = points.last().map(|p| p.price).unwrap_or_default();
    let high = points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
    let low = points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let since = points
        .first()
        .and_then(|p| Local.timestamp_millis_opt(p.timestamp_ms).single())
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default();

    println!(
        "{} (24h, USD)",
        ui::style_text(&id.to_uppercase(), ui::StyleType::Title)
    );
    println!("{}", sparkline(&points));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(&format!("Open ({since})")),
        ui::header_cell("High"),
        ui::header_cell("Low"),
        ui::header_cell("Last"),
    ]);
    table.add_row(vec![
        ui::value_cell(&format!("${open:.2}")),
        ui::value_cell(&format!("${high:.2}")),
        ui::value_cell(&format!("${low:.2}")),
        ui::value_cell(&format!("${last:.2}")),
    ]);
    println!("{table}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                timestamp_ms: 1_700_000_000_000 + (i as i64) * 3_600_000,
                price,
            })
            .collect()
    }

    #[test]
    fn test_chart_id_accepts_code_or_raw_id() {
        assert_eq!(chart_id("BTC"), "bitcoin");
        assert_eq!(chart_id("btc"), "bitcoin");
        assert_eq!(chart_id("bitcoin"), "bitcoin");
        assert_eq!(chart_id("Solana"), "solana");
    }

    #[test]
    fn test_sparkline_spans_levels() {
        let line = sparkline(&points(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(line.chars().count(), 4);
        assert_eq!(line.chars().next(), Some('▁'));
        assert_eq!(line.chars().last(), Some('█'));
    }

    #[test]
    fn test_sparkline_flat_series() {
        let line = sparkline(&points(&[5.0, 5.0, 5.0]));
        assert!(line.chars().all(|c| c == '▁'));
    }

    #[test]
    fn test_sparkline_downsamples_long_series() {
        let prices: Vec<f64> = (0..500).map(|i| i as f64).collect();
        let line = sparkline(&points(&prices));
        assert_eq!(line.chars().count(), SPARK_WIDTH);
    }
}
