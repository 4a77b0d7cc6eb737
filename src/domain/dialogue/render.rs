//! Confirmation Renderer - stateless order summary formatter.

use crate::domain::order::{ItemKind, LineItem, OrderSession, OrderType};

/// Builds the human-readable confirmation summary for a session.
///
/// Deterministic: 1-based line numbers, qty, size and spice for pizzas, the
/// option summary for wings, then the order-type line (and address line for
/// delivery), ending with the confirmation question. The state machine only
/// reaches this with a complete order, but an empty order renders as an
/// explicit "No items" rather than panicking.
pub fn render_confirmation(session: &OrderSession) -> String {
    let mut out = String::from("Here's your order: ");

    if session.line_items.is_empty() {
        out.push_str("No items.");
    } else {
        let lines: Vec<String> = session
            .line_items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, describe_line(item)))
            .collect();
        out.push_str(&lines.join("; "));
        out.push('.');
    }

    if let Some(order_type) = session.order_type {
        out.push_str(&format!(" Order type: {}.", order_type));
        if order_type == OrderType::Delivery {
            if let Some(address) = &session.address {
                out.push_str(&format!(" Address: {}.", address));
            }
        }
    }

    out.push_str(" Is that correct?");
    out
}

fn describe_line(item: &LineItem) -> String {
    let mut parts = vec![item.qty.to_string()];
    if let Some(size) = item.size {
        parts.push(size.label().to_string());
    }
    parts.push(item.name.clone());
    let mut text = parts.join(" ");

    let mut extras: Vec<String> = Vec::new();
    if let Some(spice) = item.spice {
        extras.push(spice.label().to_string());
    }
    if item.kind == ItemKind::Wings {
        for key in ["type", "flavor"] {
            if let Some(value) = item.options.get(key) {
                extras.push(value.clone());
            }
        }
    }
    if !extras.is_empty() {
        text.push_str(&format!(" ({})", extras.join(", ")));
    }
    text
}
