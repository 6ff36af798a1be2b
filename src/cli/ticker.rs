use anyhow::Result;
use std::time::Duration;

use super::ui;
use crate::core::price::TickerProvider;

/// Popular coins shown by the ticker, in display order.
pub const TICKER_IDS: [&str; 6] = [
    "bitcoin",
    "ethereum",
    "solana",
    "dogecoin",
    "tether",
    "pepe",
];

pub async fn run(provider: &(dyn TickerProvider + Send + Sync)) -> Result<()> {
    let spinner = ui::new_spinner("Fetching prices...");
    let entries = provider.fetch_ticker(&TICKER_IDS).await;
    spinner.finish_and_clear();

    let entries = match entries {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(error = %e, "Ticker fetch failed");
            println!(
                "{}",
                ui::style_text("Could not load popular prices", ui::StyleType::Error)
            );
            return Ok(());
        }
    };

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Coin"),
        ui::header_cell("Price (USD)"),
        ui::header_cell("24h"),
    ]);

    for entry in entries {
        table.add_row(vec![
            comfy_table::Cell::new(entry.id.to_uppercase()),
            ui::value_cell(&format!("${:.2}", entry.price_usd)),
            ui::change_cell(entry.change_24h_pct),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Refreshes the ticker on a fixed interval until interrupted.
pub async fn watch(
    provider: &(dyn TickerProvider + Send + Sync),
    interval: Duration,
) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        run(provider).await?;
        println!();
    }
}
