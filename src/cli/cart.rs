use super::ui;
use crate::core::RateTableProvider;
use crate::core::storefront::{Cart, CartQuote, QuantityUpdate, StorefrontState};
use anyhow::Result;
use comfy_table::Cell;
use tracing::warn;

impl CartQuote {
    pub fn display_as_table(&self) -> String {
        let currency = &self.currency;
        let formatted = self.formatted();
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Product"),
            ui::header_cell("Qty"),
            ui::header_cell(&format!("Price ({currency})")),
            ui::header_cell(&format!("Total ({currency})")),
        ]);

        for (line, shown) in self.lines.iter().zip(&formatted.lines) {
            table.add_row(vec![
                Cell::new(&line.name),
                ui::amount_cell(line.quantity.to_string()),
                ui::amount_cell(shown.unit_price.clone()),
                ui::amount_cell(shown.line_total.clone()),
            ]);
        }

        let mut output = format!(
            "{}\n\n{}\n\n",
            ui::style_text("Shopping cart", ui::StyleType::Title),
            table
        );
        for (label, amount) in [
            ("Subtotal", &formatted.subtotal),
            ("Shipping", &formatted.shipping),
            ("Tax", &formatted.tax),
        ] {
            output.push_str(&format!("{label}: {amount}\n"));
        }
        output.push_str(&format!(
            "{}: {}",
            ui::style_text("Total", ui::StyleType::TotalLabel),
            ui::style_text(&formatted.total, ui::StyleType::TotalValue)
        ));

        if let Some(rate) = &formatted.exchange_rate {
            output.push_str(&format!("\n{rate}"));
        }
        if let Some(reason) = &self.fallback {
            output.push_str(&format!(
                "\n\n{}",
                ui::style_text(
                    &format!("Prices shown in {currency}: {reason}"),
                    ui::StyleType::Error
                )
            ));
        }
        output
    }
}

/// Prices the demo cart in `currency` after applying `quantities` (each
/// `ID=QTY`). A failed rate fetch still shows the cart, in catalogue prices.
pub async fn run(
    provider: &dyn RateTableProvider,
    currency: &str,
    quantities: &[String],
) -> Result<()> {
    let updates = quantities
        .iter()
        .map(|q| q.parse::<QuantityUpdate>())
        .collect::<Result<Vec<_>>>()?;
    let mut cart = Cart::from_catalogue();
    cart.apply(&updates)?;

    let rates = match super::fetch_with_spinner(provider).await {
        Ok(snapshot) => match snapshot.to_table() {
            Ok(table) => Some(table),
            Err(e) => {
                warn!(error = %e, "Rate table rejected");
                None
            }
        },
        Err(e) => {
            warn!(error = %e, "Could not fetch exchange rates");
            None
        }
    };

    let state = StorefrontState::new(currency).with_rates(rates);
    let quote = state.quote(&cart);
    println!("{}", quote.display_as_table());
    Ok(())
}
