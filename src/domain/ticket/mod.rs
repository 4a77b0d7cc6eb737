//! Kitchen tickets - the finalized, priced order handed to fulfillment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::order::{LineItem, OrderSession, OrderType};
use crate::domain::pricing::{format_cents, OrderTotals};

/// Why a session could not be turned into a ticket.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TicketError {
    #[error("Session {0} is not completed")]
    NotCompleted(SessionId),

    #[error("Session {0} has no order type")]
    MissingOrderType(SessionId),

    #[error("Delivery session {0} has no address")]
    MissingAddress(SessionId),
}

/// A confirmed order ready for the ticket sink. The sink assigns the
/// sequential ticket number at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub session_id: SessionId,
    pub placed_at: Timestamp,
    pub order_type: OrderType,
    pub address: Option<String>,
    pub lines: Vec<LineItem>,
    pub totals: OrderTotals,
}

impl Ticket {
    /// Extracts a ticket from a completed session.
    pub fn from_session(session: &OrderSession, totals: OrderTotals) -> Result<Self, TicketError> {
        if !session.completed {
            return Err(TicketError::NotCompleted(session.id));
        }
        let order_type = session
            .order_type
            .ok_or(TicketError::MissingOrderType(session.id))?;
        if order_type == OrderType::Delivery && session.address.is_none() {
            return Err(TicketError::MissingAddress(session.id));
        }
        Ok(Self {
            session_id: session.id,
            placed_at: Timestamp::now(),
            order_type,
            address: session.address.clone(),
            lines: session.line_items.clone(),
            totals,
        })
    }
}

/// Renders the kitchen-ticket text for a numbered ticket.
pub fn format_ticket(number: u64, ticket: &Ticket) -> String {
    let mut out = format!("=== ORDER #{:06} ===\n", number);
    out.push_str(&format!("{}\n", ticket.placed_at));
    match (&ticket.order_type, &ticket.address) {
        (OrderType::Delivery, Some(address)) => {
            out.push_str(&format!("DELIVERY: {}\n", address));
        }
        (order_type, _) => out.push_str(&format!("{}\n", order_type.label().to_uppercase())),
    }
    for line in &ticket.lines {
        out.push_str(&format!("- {}\n", describe_line(line)));
    }
    out.push_str(&format!("Subtotal: ${}\n", format_cents(ticket.totals.subtotal_cents)));
    out.push_str(&format!("Tax: ${}\n", format_cents(ticket.totals.tax_cents)));
    out.push_str(&format!("TOTAL: ${}\n", format_cents(ticket.totals.total_cents)));
    out
}

fn describe_line(line: &LineItem) -> String {
    let mut details: Vec<String> = Vec::new();
    if let Some(size) = line.size {
        details.push(size.label().to_string());
    }
    if let Some(spice) = line.spice {
        details.push(spice.label().to_string());
    }
    for value in line.options.values() {
        details.push(value.clone());
    }
    if details.is_empty() {
        format!("{}x {}", line.qty, line.name)
    } else {
        format!("{}x {} ({})", line.qty, line.name, details.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{ItemKind, Size, SpiceLevel};

    fn completed_session() -> OrderSession {
        let mut s = OrderSession::new(SessionId::new());
        let mut pizza = LineItem::new(ItemKind::Pizza, "Pepperoni Pizza", 2);
        pizza.size = Some(Size::Large);
        pizza.spice = Some(SpiceLevel::Mild);
        s.merge_line(pizza);
        s.order_type = Some(OrderType::Pickup);
        s.mark_completed();
        s
    }

    fn totals() -> OrderTotals {
        OrderTotals {
            subtotal_cents: 3198,
            tax_cents: 256,
            total_cents: 3454,
        }
    }

    #[test]
    fn from_session_requires_completion() {
        let mut s = completed_session();
        s.completed = false;
        assert!(matches!(
            Ticket::from_session(&s, totals()),
            Err(TicketError::NotCompleted(_))
        ));
    }

    #[test]
    fn from_session_requires_address_for_delivery() {
        let mut s = completed_session();
        s.order_type = Some(OrderType::Delivery);
        s.address = None;
        assert!(matches!(
            Ticket::from_session(&s, totals()),
            Err(TicketError::MissingAddress(_))
        ));
    }

    #[test]
    fn from_session_copies_lines_and_totals() {
        let s = completed_session();
        let ticket = Ticket::from_session(&s, totals()).unwrap();
        assert_eq!(ticket.lines.len(), 1);
        assert_eq!(ticket.totals.total_cents, 3454);
        assert_eq!(ticket.order_type, OrderType::Pickup);
    }

    #[test]
    fn formatted_ticket_has_number_lines_and_totals() {
        let ticket = Ticket::from_session(&completed_session(), totals()).unwrap();
        let text = format_ticket(42, &ticket);

        assert!(text.starts_with("=== ORDER #000042 ==="));
        assert!(text.contains("PICKUP"));
        assert!(text.contains("- 2x Pepperoni Pizza (Large, mild)"));
        assert!(text.contains("Subtotal: $31.98"));
        assert!(text.contains("TOTAL: $34.54"));
    }

    #[test]
    fn delivery_ticket_shows_the_address() {
        let mut s = completed_session();
        s.order_type = Some(OrderType::Delivery);
        s.address = Some("123 Main St".to_string());
        let ticket = Ticket::from_session(&s, totals()).unwrap();
        let text = format_ticket(7, &ticket);
        assert!(text.contains("DELIVERY: 123 Main St"));
    }
}
