use anyhow::Result;

use super::ui;
use crate::cli::convert;
use crate::core::calc::evaluate;
use crate::core::clock::Clock;
use crate::core::history::ConversionHistory;
use crate::core::price::SpotPriceProvider;
use crate::core::rate::RateResolver;

/// Evaluates an expression and prints the value. With `into`, a positive
/// result is fed straight into a conversion as the amount.
pub async fn run<P, C>(
    resolver: &RateResolver<P, C>,
    history: &ConversionHistory,
    expression: &str,
    into: Option<(&str, &str)>,
) -> Result<()>
where
    P: SpotPriceProvider,
    C: Clock,
{
    let value = match evaluate(expression) {
        Ok(value) => value,
        Err(e) => {
            println!("{}", ui::style_text(&format!("{e}"), ui::StyleType::Error));
            return Ok(());
        }
    };

    println!("{expression} = {value}");

    if let Some((from, to)) = into {
        if value > 0.0 {
            println!();
            convert::run(resolver, history, value, from, to).await?;
        } else {
            println!(
                "{}",
                ui::style_text(
                    "Result is not a positive amount, skipping conversion",
                    ui::StyleType::Error
                )
            );
        }
    }

    Ok(())
}
