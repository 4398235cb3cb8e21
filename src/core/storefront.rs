//! Demo storefront: a fixed catalogue priced in USD and a cart that can be
//! shown in any currency the current rate table supports.
use crate::core::engine::{ConversionRequest, convert};
use crate::core::error::ConversionError;
use crate::core::format::{format_money, format_rate};
use crate::core::rates::{RateTable, normalize_code};
use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use serde::Serialize;
use std::convert::Infallible;
use std::str::FromStr;
use tracing::{debug, warn};

/// Currency the catalogue prices are quoted in.
pub const CATALOGUE_CURRENCY: &str = "USD";
/// Flat shipping fee, in catalogue currency.
pub const SHIPPING_FEE: f64 = 10.0;
/// Sales tax applied to the subtotal.
pub const TAX_RATE: f64 = 0.08;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
}

impl Product {
    fn new(id: u32, name: &str, description: &str, image: &str, price: f64) -> Self {
        Product {
            id,
            name: name.to_string(),
            description: description.to_string(),
            image: image.to_string(),
            price,
        }
    }
}

pub fn catalogue() -> Vec<Product> {
    vec![
        Product::new(
            1,
            "Premium Wireless Headphones",
            "Noise-cancelling with 20hr battery life",
            "headphone-159569_640.png",
            199.99,
        ),
        Product::new(
            2,
            "Smart Fitness Watch",
            "Track your health with precision",
            "watch-42803_640.png",
            149.50,
        ),
        Product::new(
            3,
            "Ultralight Gaming Desktop",
            "Powerful computing on the go",
            "computer-158743_640.png",
            1299.00,
        ),
        Product::new(
            4,
            "Wireless Charging Pad",
            "Fast charging for all your devices",
            "charge-159707_640.png",
            49.99,
        ),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// A cart holding one of every catalogue product.
    pub fn from_catalogue() -> Self {
        Cart {
            items: catalogue()
                .into_iter()
                .map(|product| CartItem {
                    product,
                    quantity: 1,
                })
                .collect(),
        }
    }

    /// Updates the quantity of a product, clamping to at least one.
    /// Returns false if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: u32, quantity: u32) -> bool {
        match self.items.iter_mut().find(|i| i.product.id == product_id) {
            Some(item) => {
                item.quantity = quantity.max(1);
                true
            }
            None => false,
        }
    }

    /// Applies quantity changes in order. Fails on the first unknown product.
    pub fn apply(&mut self, updates: &[QuantityUpdate]) -> Result<()> {
        for update in updates {
            if !self.set_quantity(update.product_id, update.quantity) {
                bail!("Unknown product: {}", update.product_id);
            }
        }
        Ok(())
    }
}

/// A quantity change for one cart line, written `ID=QTY` or `ID:QTY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityUpdate {
    pub product_id: u32,
    pub quantity: u32,
}

impl FromStr for QuantityUpdate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = s
            .split_once(['=', ':'])
            .ok_or_else(|| anyhow!("Invalid quantity {s:?}, expected ID=QTY"))?;
        Ok(QuantityUpdate {
            product_id: id
                .trim()
                .parse()
                .with_context(|| format!("Invalid product id in {s:?}"))?,
            quantity: quantity
                .trim()
                .parse()
                .with_context(|| format!("Invalid quantity in {s:?}"))?,
        })
    }
}

/// Parses a comma-separated list such as `4:2,1:3`. Blank entries are skipped.
pub fn parse_quantities(list: &str) -> Result<Vec<QuantityUpdate>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::parse)
        .collect()
}

/// UI-owned state: the selected display currency and the most recently
/// fetched rate table, if any.
#[derive(Debug, Clone)]
pub struct StorefrontState {
    pub currency: String,
    pub rates: Option<RateTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub product_id: u32,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Rate from catalogue currency to the selected one, as quoted to the shopper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotedRate {
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub date: Option<NaiveDate>,
}

impl QuotedRate {
    pub fn label(&self) -> String {
        let mut label = format!(
            "Exchange rate: 1 {} = {} {}",
            self.from,
            format_rate(self.rate),
            self.to
        );
        if let Some(date) = self.date {
            label.push_str(&format!(" ({})", date.format("%Y-%m-%d")));
        }
        label
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedLine {
    pub product_id: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Display strings for a quote, so every front end shows the same amounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedQuote {
    pub lines: Vec<FormattedLine>,
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<String>,
}

/// A cart priced in a single currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    pub currency: String,
    pub lines: Vec<QuoteLine>,
    pub subtotal: f64,
    pub shipping: f64,
    pub tax: f64,
    pub total: f64,
    /// Absent when the quote fell back to catalogue prices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<QuotedRate>,
    /// Set when the selected currency could not be used and the quote fell
    /// back to catalogue prices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl CartQuote {
    pub fn formatted(&self) -> FormattedQuote {
        let money = |amount: f64| format_money(amount, &self.currency);
        FormattedQuote {
            lines: self
                .lines
                .iter()
                .map(|line| FormattedLine {
                    product_id: line.product_id,
                    unit_price: money(line.unit_price),
                    line_total: money(line.line_total),
                })
                .collect(),
            subtotal: money(self.subtotal),
            shipping: money(self.shipping),
            tax: money(self.tax),
            total: money(self.total),
            exchange_rate: self.exchange_rate.as_ref().map(QuotedRate::label),
        }
    }
}

impl StorefrontState {
    pub fn new(currency: &str) -> Self {
        StorefrontState {
            currency: normalize_code(currency),
            rates: None,
        }
    }

    pub fn with_rates(mut self, rates: Option<RateTable>) -> Self {
        self.rates = rates;
        self
    }

    pub fn select_currency(&mut self, currency: &str) {
        self.currency = normalize_code(currency);
    }

    /// Converts a catalogue price into the selected currency.
    pub fn price_in_selected(&self, amount: f64) -> Result<f64, ConversionError> {
        let rates = self.rates.as_ref().ok_or_else(|| {
            ConversionError::RateTableUnavailable("no exchange rates loaded".to_string())
        })?;
        let request = ConversionRequest::new(CATALOGUE_CURRENCY, &self.currency, amount);
        convert(&request, rates).map(|r| r.converted)
    }

    /// Effective rate from catalogue currency to the selected currency.
    pub fn exchange_rate(&self) -> Result<QuotedRate, ConversionError> {
        let rates = self.rates.as_ref().ok_or_else(|| {
            ConversionError::RateTableUnavailable("no exchange rates loaded".to_string())
        })?;
        let request = ConversionRequest::new(CATALOGUE_CURRENCY, &self.currency, 0.0);
        let result = convert(&request, rates)?;
        Ok(QuotedRate {
            from: request.from,
            to: request.to,
            rate: result.rate,
            date: rates.as_of(),
        })
    }

    /// Prices the cart in the selected currency, or in catalogue currency
    /// when conversion fails.
    pub fn quote(&self, cart: &Cart) -> CartQuote {
        let priced = self.exchange_rate().and_then(|rate| {
            let mut quote =
                build_quote(cart, &self.currency, |amount| self.price_in_selected(amount))?;
            quote.exchange_rate = Some(rate);
            Ok(quote)
        });
        match priced {
            Ok(quote) => {
                debug!(currency = %self.currency, total = quote.total, "Priced cart");
                quote
            }
            Err(e) => {
                warn!(currency = %self.currency, error = %e, "Falling back to catalogue prices");
                let Ok(mut quote) =
                    build_quote(cart, CATALOGUE_CURRENCY, |amount| Ok::<_, Infallible>(amount));
                quote.fallback = Some(e.to_string());
                quote
            }
        }
    }
}

fn build_quote<F, E>(cart: &Cart, currency: &str, price: F) -> Result<CartQuote, E>
where
    F: Fn(f64) -> Result<f64, E>,
{
    let mut lines = Vec::with_capacity(cart.items.len());
    let mut subtotal = 0.0;
    for item in &cart.items {
        let unit_price = price(item.product.price)?;
        let line_total = unit_price * f64::from(item.quantity);
        subtotal += line_total;
        lines.push(QuoteLine {
            product_id: item.product.id,
            name: item.product.name.clone(),
            quantity: item.quantity,
            unit_price,
            line_total,
        });
    }

    let shipping = price(SHIPPING_FEE)?;
    let tax = subtotal * TAX_RATE;
    Ok(CartQuote {
        currency: currency.to_string(),
        lines,
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
        exchange_rate: None,
        fallback: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> RateTable {
        RateTable::new("EUR", [("USD", 1.25), ("GBP", 0.85), ("JPY", 160.0)]).unwrap()
    }

    #[test]
    fn test_catalogue_cart_in_usd() {
        let state = StorefrontState::new("usd").with_rates(Some(rates()));
        let quote = state.quote(&Cart::from_catalogue());

        assert_eq!(quote.currency, "USD");
        assert!(quote.fallback.is_none());
        assert_eq!(quote.lines.len(), 4);
        assert_eq!(quote.lines[0].unit_price, 199.99);
        assert!((quote.subtotal - 1698.48).abs() < 1e-9);
        assert_eq!(quote.shipping, 10.0);
        assert!((quote.tax - 1698.48 * 0.08).abs() < 1e-9);
        assert!((quote.total - (1698.48 + 10.0 + 135.8784)).abs() < 1e-9);
    }

    #[test]
    fn test_cart_converted_to_selected_currency() {
        let mut state = StorefrontState::new("USD").with_rates(Some(rates()));
        state.select_currency("eur");
        let mut cart = Cart::from_catalogue();
        assert!(cart.set_quantity(4, 2));

        let quote = state.quote(&cart);
        assert_eq!(quote.currency, "EUR");
        assert!((quote.lines[3].unit_price - 49.99 / 1.25).abs() < 1e-9);
        assert_eq!(quote.lines[3].quantity, 2);
        assert!((quote.shipping - 8.0).abs() < 1e-9);
        let expected_subtotal = (199.99 + 149.50 + 1299.00 + 2.0 * 49.99) / 1.25;
        assert!((quote.subtotal - expected_subtotal).abs() < 1e-9);
    }

    #[test]
    fn test_quote_carries_exchange_rate() {
        let table = rates().with_date(NaiveDate::from_ymd_opt(2024, 3, 15));
        let state = StorefrontState::new("GBP").with_rates(Some(table));
        let quote = state.quote(&Cart::from_catalogue());

        let rate = quote.exchange_rate.clone().expect("converted quote has a rate");
        assert!((rate.rate - 0.85 / 1.25).abs() < 1e-12);
        assert_eq!(
            rate.label(),
            "Exchange rate: 1 USD = 0.680000 GBP (2024-03-15)"
        );
        assert_eq!(
            quote.formatted().exchange_rate.as_deref(),
            Some("Exchange rate: 1 USD = 0.680000 GBP (2024-03-15)")
        );
    }

    #[test]
    fn test_formatted_quote_uses_currency_rules() {
        let table = RateTable::new("EUR", [("USD", 1.25), ("CHF", 1.0)]).unwrap();
        let quote = StorefrontState::new("CHF")
            .with_rates(Some(table))
            .quote(&Cart::from_catalogue());

        let formatted = quote.formatted();
        assert_eq!(formatted.lines[0].unit_price, "Fr159.99");
        assert_eq!(formatted.shipping, "Fr8.00");
        assert_eq!(formatted.lines.len(), 4);
    }

    #[test]
    fn test_apply_quantity_updates() {
        let mut cart = Cart::from_catalogue();
        let updates = parse_quantities("4:2, 1=3,").unwrap();
        assert_eq!(
            updates,
            vec![
                QuantityUpdate { product_id: 4, quantity: 2 },
                QuantityUpdate { product_id: 1, quantity: 3 },
            ]
        );
        cart.apply(&updates).unwrap();
        assert_eq!(cart.items[3].quantity, 2);
        assert_eq!(cart.items[0].quantity, 3);

        let quote = StorefrontState::new("USD")
            .with_rates(Some(rates()))
            .quote(&cart);
        let expected = 3.0 * 199.99 + 149.50 + 1299.00 + 2.0 * 49.99;
        assert!((quote.subtotal - expected).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_quantity_updates() {
        assert!("4".parse::<QuantityUpdate>().is_err());
        assert!("x=2".parse::<QuantityUpdate>().is_err());
        assert!("4=-1".parse::<QuantityUpdate>().is_err());

        let mut cart = Cart::from_catalogue();
        let err = cart
            .apply(&[QuantityUpdate { product_id: 9, quantity: 2 }])
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown product: 9");
    }

    #[test]
    fn test_quantity_is_clamped_to_one() {
        let mut cart = Cart::from_catalogue();
        assert!(cart.set_quantity(1, 0));
        assert_eq!(cart.items[0].quantity, 1);
        assert!(!cart.set_quantity(99, 3));
    }

    #[test]
    fn test_falls_back_without_rates() {
        let state = StorefrontState::new("GBP");
        let quote = state.quote(&Cart::from_catalogue());
        assert_eq!(quote.currency, "USD");
        assert_eq!(quote.lines[2].unit_price, 1299.00);
        assert!(quote.exchange_rate.is_none());
        assert_eq!(
            quote.fallback.as_deref(),
            Some("Rate table unavailable: no exchange rates loaded")
        );
    }

    #[test]
    fn test_falls_back_for_unsupported_currency() {
        let state = StorefrontState::new("XYZ").with_rates(Some(rates()));
        let quote = state.quote(&Cart::from_catalogue());
        assert_eq!(quote.currency, "USD");
        assert!(quote.fallback.unwrap().contains("XYZ"));
    }

    #[test]
    fn test_price_in_selected_surfaces_typed_error() {
        let state = StorefrontState::new("XYZ").with_rates(Some(rates()));
        assert!(matches!(
            state.price_in_selected(10.0),
            Err(ConversionError::UnsupportedCurrency { .. })
        ));
    }
}
