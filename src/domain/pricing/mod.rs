//! Pricing Engine - totals for a finalized session against the price table.
//!
//! All arithmetic happens in integer cents; dollar amounts from the store
//! file are converted once on lookup. Unknown items or sizes are skipped
//! rather than failing the order; each skip is logged as a data-quality
//! warning, never surfaced to the customer.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::catalog::{normalize, PriceEntry, PriceTable};
use crate::domain::order::OrderSession;

/// Subtotal, tax, and total for one order, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl OrderTotals {
    pub fn zero() -> Self {
        Self {
            subtotal_cents: 0,
            tax_cents: 0,
            total_cents: 0,
        }
    }
}

/// Formats cents as a dollar string ("12.99").
pub fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

/// Converts a dollar amount to cents with half-up rounding.
fn to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

/// Prices a session: subtotal from per-line unit prices, tax at the store
/// rate (0 when unset), half-up rounding at the cent.
pub fn price_order(prices: &PriceTable, tax_rate: f64, session: &OrderSession) -> OrderTotals {
    let mut subtotal_cents: i64 = 0;

    for item in &session.line_items {
        let key = normalize(&item.name);
        let unit_cents = match prices.entry(&key) {
            Some(PriceEntry::Flat(dollars)) => Some(to_cents(*dollars)),
            Some(PriceEntry::PerSize(by_size)) => match item.size {
                Some(size) => by_size.get(&size).map(|d| to_cents(*d)),
                None => None,
            },
            None => None,
        };

        match unit_cents {
            Some(cents) => subtotal_cents += cents * i64::from(item.qty),
            None => {
                warn!(
                    item = %item.name,
                    size = ?item.size,
                    "no price for line item, skipping"
                );
            }
        }
    }

    let tax_cents = (subtotal_cents as f64 * tax_rate).round() as i64;
    OrderTotals {
        subtotal_cents,
        tax_cents,
        total_cents: subtotal_cents + tax_cents,
    }
}
