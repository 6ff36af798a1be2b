use anyhow::Result;
use chrono::Local;
use std::time::Duration;

use super::ui;
use crate::core::clock::Clock;
use crate::core::convert::{ConversionOutcome, convert};
use crate::core::currency::format_amount;
use crate::core::history::ConversionHistory;
use crate::core::price::SpotPriceProvider;
use crate::core::rate::RateResolver;

/// Runs one conversion and renders the outcome. Successful conversions are
/// appended to the persisted history.
pub async fn run<P, C>(
    resolver: &RateResolver<P, C>,
    history: &ConversionHistory,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<()>
where
    P: SpotPriceProvider,
    C: Clock,
{
    let spinner = ui::new_spinner("Fetching rate...");
    let outcome = convert(resolver, amount, from, to).await;
    spinner.finish_and_clear();

    match outcome {
        ConversionOutcome::Converted(record) => {
            let result = format_amount(record.result, to);
            let rate = format_amount(record.rate, to);
            println!(
                "{} {} = {}",
                record.amount,
                record.from,
                ui::style_text(&result, ui::StyleType::ResultValue)
            );
            println!("1 {} = {}", record.from, rate);
            println!(
                "{}",
                ui::style_text(
                    &format!("Updated {}", Local::now().format("%H:%M:%S")),
                    ui::StyleType::Subtle
                )
            );
            history.record(record).await;
        }
        ConversionOutcome::InvalidAmount => {
            println!(
                "{}",
                ui::style_text("Please enter a valid positive amount", ui::StyleType::Error)
            );
        }
        ConversionOutcome::RateUnavailable => {
            println!(
                "{}",
                ui::style_text(
                    "Could not fetch the exchange rate, please retry later",
                    ui::StyleType::Error
                )
            );
        }
    }

    Ok(())
}

/// Re-runs the conversion on a fixed interval until interrupted. Ticks are
/// independent; a slow fetch is simply overtaken by the next completed one.
pub async fn watch<P, C>(
    resolver: &RateResolver<P, C>,
    history: &ConversionHistory,
    amount: f64,
    from: &str,
    to: &str,
    interval: Duration,
) -> Result<()>
where
    P: SpotPriceProvider,
    C: Clock,
{
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        run(resolver, history, amount, from, to).await?;
        println!();
    }
}
