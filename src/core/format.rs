//! Display rounding for converted amounts and quoted rates.

/// Currencies shown without minor units.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["JPY"];

pub fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "CAD" => Some("C$"),
        "AUD" => Some("A$"),
        "CNY" => Some("¥"),
        "CHF" => Some("Fr"),
        _ => None,
    }
}

pub fn minor_units(currency: &str) -> usize {
    if ZERO_DECIMAL_CURRENCIES.contains(&currency) {
        0
    } else {
        2
    }
}

/// Formats an amount with the currency symbol, e.g. `£169.99` or `¥21750`.
/// Currencies without a known symbol are prefixed with their code.
pub fn format_money(amount: f64, currency: &str) -> String {
    let decimals = minor_units(currency);
    let value = format!("{:.*}", decimals, round_to(amount, decimals));
    match currency_symbol(currency) {
        Some(symbol) => format!("{symbol}{value}"),
        None => format!("{currency} {value}"),
    }
}

/// Formats a pairwise rate with six decimals.
pub fn format_rate(rate: f64) -> String {
    format!("{rate:.6}")
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_with_symbols() {
        assert_eq!(format_money(199.99, "USD"), "$199.99");
        assert_eq!(format_money(12.5, "GBP"), "£12.50");
        assert_eq!(format_money(3.0, "CHF"), "Fr3.00");
        assert_eq!(format_money(10.0, "CAD"), "C$10.00");
    }

    #[test]
    fn test_format_money_zero_decimals_for_jpy() {
        assert_eq!(format_money(21749.6, "JPY"), "¥21750");
        assert_eq!(format_money(0.4, "JPY"), "¥0");
    }

    #[test]
    fn test_format_money_unknown_currency_uses_code() {
        assert_eq!(format_money(1.234, "SEK"), "SEK 1.23");
    }

    #[test]
    fn test_format_rate_six_decimals() {
        assert_eq!(format_rate(0.85 / 1.1), "0.772727");
        assert_eq!(format_rate(1.1), "1.100000");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(77.27272727, 2), 77.27);
        assert_eq!(round_to(2.5, 0), 3.0);
    }
}
