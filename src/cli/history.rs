use anyhow::Result;
use chrono::Local;

use super::ui;
use crate::core::currency::format_amount;
use crate::core::history::ConversionHistory;

pub async fn run(history: &ConversionHistory) -> Result<()> {
    let records = history.load().await;
    if records.is_empty() {
        println!(
            "{}",
            ui::style_text("No conversions recorded yet", ui::StyleType::Subtle)
        );
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("When"),
        ui::header_cell("Amount"),
        ui::header_cell("Result"),
        ui::header_cell("Rate"),
    ]);

    for record in records {
        let when = record
            .converted_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        table.add_row(vec![
            comfy_table::Cell::new(when),
            ui::value_cell(&format!("{} {}", record.amount, record.from)),
            ui::value_cell(&format_amount(record.result, &record.to)),
            ui::value_cell(&format!("1 {} = {}", record.from, format_amount(record.rate, &record.to))),
        ]);
    }

    println!("{table}");
    Ok(())
}
