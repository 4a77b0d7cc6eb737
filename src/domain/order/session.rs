//! Order session - per-conversation state mutated by the dialogue engine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, Timestamp};

use super::line_item::LineItem;

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Pickup,
    Delivery,
}

impl OrderType {
    pub fn label(&self) -> &'static str {
        match self {
            OrderType::Pickup => "Pickup",
            OrderType::Delivery => "Delivery",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The single slot the engine is currently blocking on.
///
/// At most one is outstanding at any time; it is cleared the instant its
/// slot is filled. `item` indexes into `OrderSession::line_items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "slot", rename_all = "snake_case")]
pub enum AwaitingSlot {
    Size { item: usize },
    Spice { item: usize },
    ItemOption {
        item: usize,
        name: String,
        choices: Vec<String>,
    },
    OrderType,
    Address,
}

/// Per-conversation order-in-progress state.
///
/// Created empty at conversation start, mutated turn-by-turn exclusively by
/// the dialogue engine, and discarded or archived once `completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSession {
    pub id: SessionId,
    /// Insertion order = conversation order. Duplicates of identical
    /// (kind, name, size, options) are merged by summing qty.
    pub line_items: Vec<LineItem>,
    pub order_type: Option<OrderType>,
    /// Required iff `order_type == Delivery`.
    pub address: Option<String>,
    pub awaiting: Option<AwaitingSlot>,
    /// True once a full confirmation summary has been presented.
    pub confirming: bool,
    /// Terminal; the customer accepted the order.
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderSession {
    /// Creates an empty session at conversation start.
    pub fn new(id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            line_items: Vec::new(),
            order_type: None,
            address: None,
            awaiting: None,
            confirming: false,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    /// Merges one line into the order: identical merge keys sum quantities,
    /// everything else appends. A spice carried by the incoming line fills
    /// an unset spice on the existing line.
    pub fn merge_line(&mut self, incoming: LineItem) {
        let key = incoming.merge_key();
        if let Some(existing) = self.line_items.iter_mut().find(|l| l.merge_key() == key) {
            existing.qty += incoming.qty;
            if existing.spice.is_none() {
                existing.spice = incoming.spice;
            }
        } else {
            self.line_items.push(incoming);
        }
    }

    /// Replaces the whole item set (explicit "change/actually" edits).
    pub fn replace_lines(&mut self, lines: Vec<LineItem>) {
        self.line_items.clear();
        for line in lines {
            self.merge_line(line);
        }
    }

    pub fn clear_awaiting(&mut self) {
        self.awaiting = None;
    }

    /// Leaves collected items intact but steps back out of confirmation.
    pub fn reopen_for_edits(&mut self) {
        self.confirming = false;
        self.awaiting = None;
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.confirming = false;
        self.awaiting = None;
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{ItemKind, Size};

    fn session() -> OrderSession {
        OrderSession::new(SessionId::new())
    }

    fn pepperoni(qty: u32, size: Option<Size>) -> LineItem {
        let mut item = LineItem::new(ItemKind::Pizza, "Pepperoni Pizza", qty);
        item.size = size;
        item
    }

    #[test]
    fn new_session_is_empty_and_open() {
        let s = session();
        assert!(s.line_items.is_empty());
        assert!(s.order_type.is_none());
        assert!(s.awaiting.is_none());
        assert!(!s.confirming);
        assert!(!s.completed);
    }

    #[test]
    fn merge_line_sums_identical_lines() {
        let mut s = session();
        s.merge_line(pepperoni(2, Some(Size::Large)));
        s.merge_line(pepperoni(1, Some(Size::Large)));
        assert_eq!(s.line_items.len(), 1);
        assert_eq!(s.line_items[0].qty, 3);
    }

    #[test]
    fn merge_line_keeps_different_sizes_separate() {
        let mut s = session();
        s.merge_line(pepperoni(1, Some(Size::Large)));
        s.merge_line(pepperoni(1, Some(Size::Medium)));
        assert_eq!(s.line_items.len(), 2);
    }

    #[test]
    fn merge_line_fills_missing_spice() {
        use crate::domain::order::SpiceLevel;
        let mut s = session();
        s.merge_line(pepperoni(1, Some(Size::Large)));
        let mut incoming = pepperoni(1, Some(Size::Large));
        incoming.spice = Some(SpiceLevel::Hot);
        s.merge_line(incoming);
        assert_eq!(s.line_items.len(), 1);
        assert_eq!(s.line_items[0].spice, Some(SpiceLevel::Hot));
    }

    #[test]
    fn replace_lines_discards_previous_items() {
        let mut s = session();
        s.merge_line(pepperoni(2, Some(Size::Large)));
        s.replace_lines(vec![LineItem::new(ItemKind::Beverage, "Coke", 1)]);
        assert_eq!(s.line_items.len(), 1);
        assert_eq!(s.line_items[0].name, "Coke");
    }

    #[test]
    fn reopen_for_edits_keeps_items() {
        let mut s = session();
        s.merge_line(pepperoni(2, Some(Size::Large)));
        s.confirming = true;
        s.awaiting = Some(AwaitingSlot::OrderType);
        s.reopen_for_edits();
        assert!(!s.confirming);
        assert!(s.awaiting.is_none());
        assert_eq!(s.line_items.len(), 1);
    }

    #[test]
    fn mark_completed_is_terminal_housekeeping() {
        let mut s = session();
        s.confirming = true;
        s.mark_completed();
        assert!(s.completed);
        assert!(!s.confirming);
        assert!(s.awaiting.is_none());
    }
}
