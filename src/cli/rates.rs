use super::ui;
use crate::core::format::format_rate;
use crate::core::rates::{RateTable, normalize_code};
use crate::core::{RateSnapshot, RateTableProvider};
use anyhow::{Context, Result};
use comfy_table::Cell;

/// Symbols listed when none are requested.
pub const DEFAULT_SYMBOLS: &[&str] = &["USD", "GBP", "JPY"];

impl RateTable {
    /// Tabulates the rates for `symbols` against the base currency.
    pub fn display_as_table(&self, symbols: &[String]) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Per 1 {}", self.base())),
        ]);

        for symbol in symbols {
            let rate = self
                .rate(symbol)
                .map_or_else(|| ui::na_cell(true), |r| ui::amount_cell(format_rate(r)));
            table.add_row(vec![Cell::new(symbol), rate]);
        }

        table.to_string()
    }
}

fn requested_symbols(symbols: &[String]) -> Vec<String> {
    if symbols.is_empty() {
        DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
    } else {
        symbols.iter().map(|s| normalize_code(s)).collect()
    }
}

pub fn render(snapshot: &RateSnapshot, symbols: &[String]) -> Result<String> {
    let table = snapshot.to_table()?;
    Ok(format!(
        "Exchange rates against 1 {} ({})\n\n{}",
        ui::style_text(table.base(), ui::StyleType::TotalLabel),
        snapshot.date_label(),
        table.display_as_table(&requested_symbols(symbols))
    ))
}

pub async fn run(provider: &dyn RateTableProvider, symbols: &[String], json: bool) -> Result<()> {
    let snapshot = super::fetch_with_spinner(provider).await?;
    if json {
        let body =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize rate data")?;
        println!("{body}");
        return Ok(());
    }

    println!("{}", render(&snapshot, symbols)?);
    Ok(())
}
