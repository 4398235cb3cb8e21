use super::ui;
use crate::core::format::format_rate;
use crate::core::{ConversionRequest, ConversionResult, RateTableProvider, convert};
use anyhow::Result;
use tracing::debug;

/// Renders a conversion the way the terminal shows it.
pub fn render(request: &ConversionRequest, result: &ConversionResult, date: &str) -> String {
    let headline = format!(
        "{} {} = {:.2} {}",
        request.amount, request.from, result.converted, request.to
    );
    format!(
        "{}\n\n{}\nExchange rate: 1 {} = {} {}\n{}",
        ui::style_text("Currency conversion result", ui::StyleType::Title),
        ui::style_text(&headline, ui::StyleType::TotalValue),
        request.from,
        format_rate(result.rate),
        request.to,
        ui::style_text(&format!("Date: {date}"), ui::StyleType::Subtle),
    )
}

pub async fn run(provider: &dyn RateTableProvider, request: &ConversionRequest) -> Result<()> {
    let snapshot = super::fetch_with_spinner(provider).await?;
    let table = snapshot.to_table()?;
    debug!(base = table.base(), currencies = table.currencies().count(), "Loaded rate table");

    let result = convert(request, &table)?;
    println!("\n{}\n", render(request, &result, &snapshot.date_label()));
    Ok(())
}
