//! Offers returned by the backend and their price formatting.

use serde::{Deserialize, Serialize};

/// A priced service bundle available for an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub name: String,
    /// Price in integer cents.
    pub price: i64,
    pub description: String,
}

/// Sorts offers by price, most expensive first. Offers with equal prices keep
/// their original relative order.
pub fn sort_offers_desc(offers: &mut [Offer]) {
    offers.sort_by(|a, b| b.price.cmp(&a.price));
}

/// Currency presentation used when showing prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFormat {
    pub symbol: String,
    pub symbol_separator: char,
    pub grouping_separator: char,
    pub decimal_separator: char,
}

impl Default for PriceFormat {
    /// Euro amounts in Austrian German style, e.g. `€ 1.234,56`.
    fn default() -> Self {
        Self {
            symbol: "€".to_string(),
            symbol_separator: '\u{a0}',
            grouping_separator: '.',
            decimal_separator: ',',
        }
    }
}

impl PriceFormat {
    /// Formats an amount given in cents.
    pub fn format(&self, amount_in_cents: i64) -> String {
        let sign = if amount_in_cents < 0 { "-" } else { "" };
        let cents = amount_in_cents.unsigned_abs();
        let units = (cents / 100).to_string();
        let fraction = cents % 100;

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, digit) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push(self.grouping_separator);
            }
            grouped.push(digit);
        }

        format!(
            "{sign}{}{}{grouped}{}{fraction:02}",
            self.symbol, self.symbol_separator, self.decimal_separator
        )
    }
}

/// Formats a price in cents with the default currency format.
pub fn format_price(amount_in_cents: i64) -> String {
    PriceFormat::default().format(amount_in_cents)
}
