//! Session State Machine - decides what to say next, turn by turn.
//!
//! Conceptual states: collecting items, slot-filling, awaiting order type,
//! awaiting address, confirming, completed. Menu and category questions are
//! an overlay: answerable from any state without touching order state or the
//! awaiting cursor.
//!
//! Loop prevention invariant: at most one outstanding question at a time,
//! and every turn either consumes it or produces exactly one new question.
//! A rejected slot answer repeats the same question verbatim.

use tracing::{debug, info};

use crate::domain::catalog::{normalize, CatalogIndex, StoreSettings};
use crate::domain::order::{AwaitingSlot, ItemKind, LineItem, OrderSession, OrderType};

use super::classifiers::{self, SpiceScan};
use super::interpreter::{interpret, Intent, Interpretation};
use super::render::render_confirmation;

const PROMPT_FIRST_ITEM: &str = "What would you like to order?";
const PROMPT_ORDER_TYPE: &str = "Will that be pickup or delivery?";
const PROMPT_ADDRESS: &str = "What address should we deliver to?";
const PROMPT_CHANGE: &str = "No problem. What would you like to change?";
const CLOSING: &str = "You're all set! Your order is in.";
const ALREADY_PLACED: &str = "This order is already placed. Thanks!";

/// Outcome of trying to fill the currently awaited slot from one utterance.
enum Resolution {
    /// Slot filled; carries the catalog name whose candidates must not be
    /// re-merged from the same utterance.
    Filled(Option<String>),
    /// Could not fill, but the utterance carries items; treat it as an edit.
    FellThrough,
    /// Could not fill and nothing else is actionable; reply and stop.
    Reprompt(String),
}

/// The order-taking dialogue engine.
///
/// Holds the catalog index and store settings; all conversation state lives
/// in the `OrderSession` passed into each turn.
#[derive(Debug, Clone)]
pub struct DialogueEngine {
    index: CatalogIndex,
    settings: StoreSettings,
}

impl DialogueEngine {
    pub fn new(index: CatalogIndex, settings: StoreSettings) -> Self {
        Self { index, settings }
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Interprets one utterance with the keyword interpreter and applies it.
    pub fn take_turn(&self, session: &mut OrderSession, text: &str) -> String {
        let interpretation = interpret(&self.index, &self.settings, text);
        self.apply(session, &interpretation, text)
    }

    /// Applies an already-produced interpretation to the session and returns
    /// the single reply for this turn.
    pub fn apply(
        &self,
        session: &mut OrderSession,
        interpretation: &Interpretation,
        text: &str,
    ) -> String {
        let normalized = normalize(text);
        debug!(
            session = %session.id,
            intent = ?interpretation.intent,
            candidates = interpretation.items.len(),
            "applying turn"
        );

        if session.completed {
            return ALREADY_PLACED.to_string();
        }

        // 1. Menu overlay: answered from any state, state untouched.
        match interpretation.intent {
            Some(Intent::MenuQuestion) => return self.menu_overview(),
            Some(Intent::CategoryQuestion(kind)) => return self.category_listing(kind),
            _ => {}
        }

        // 2. Confirmation protocol.
        if session.confirming {
            match interpretation.intent {
                Some(Intent::Affirm) => {
                    session.mark_completed();
                    info!(session = %session.id, items = session.line_items.len(), "order confirmed");
                    return CLOSING.to_string();
                }
                Some(Intent::Negate) if interpretation.items.is_empty() => {
                    session.reopen_for_edits();
                    session.touch();
                    return PROMPT_CHANGE.to_string();
                }
                // Anything else is re-interpreted as an edit.
                _ => session.confirming = false,
            }
        }

        // 3. Resolve the awaited slot, if any.
        let mut resolved_entry: Option<String> = None;
        if let Some(slot) = session.awaiting.clone() {
            match self.resolve_awaiting(session, &slot, &normalized, text, interpretation) {
                Resolution::Filled(name) => {
                    session.clear_awaiting();
                    resolved_entry = name;
                }
                Resolution::FellThrough => session.clear_awaiting(),
                Resolution::Reprompt(reply) => {
                    session.touch();
                    return reply;
                }
            }
        }

        // A volunteered pickup/delivery statement counts even when the
        // engine wasn't asking for it.
        if let Some(Intent::OrderTypeStatement(order_type)) = interpretation.intent {
            session.order_type = Some(order_type);
        }

        // 4. Merge newly matched items. A candidate for the entry whose slot
        // was just resolved is an echo, not a new order line.
        let mut incoming: Vec<LineItem> = interpretation.items.clone();
        if let Some(name) = &resolved_entry {
            incoming.retain(|item| &item.name != name);
        }
        if !incoming.is_empty() {
            if interpretation.change_cue {
                session.replace_lines(incoming);
            } else {
                for item in incoming {
                    session.merge_line(item);
                }
            }
        }

        // 5. Nothing ordered yet.
        if session.line_items.is_empty() {
            session.touch();
            return PROMPT_FIRST_ITEM.to_string();
        }

        // 6. First incomplete line item blocks, in insertion order.
        if let Some(slot) = self.next_item_slot(session) {
            let question = match (&slot, interpretation.spice_conflict) {
                (AwaitingSlot::Spice { item }, true) => {
                    self.spice_clarify_question(&session.line_items[*item].name)
                }
                _ => self.question_for_slot(&slot, session),
            };
            session.awaiting = Some(slot);
            session.touch();
            return question;
        }

        // 7. Order type.
        if session.order_type.is_none() {
            session.awaiting = Some(AwaitingSlot::OrderType);
            session.touch();
            return PROMPT_ORDER_TYPE.to_string();
        }

        // 8. Delivery address.
        if session.order_type == Some(OrderType::Delivery) && session.address.is_none() {
            session.awaiting = Some(AwaitingSlot::Address);
            session.touch();
            return PROMPT_ADDRESS.to_string();
        }

        // 9. Everything filled: present the summary.
        session.confirming = true;
        session.clear_awaiting();
        session.touch();
        render_confirmation(session)
    }

    fn resolve_awaiting(
        &self,
        session: &mut OrderSession,
        slot: &AwaitingSlot,
        normalized: &str,
        raw_text: &str,
        interpretation: &Interpretation,
    ) -> Resolution {
        let reject = |reply: String| {
            // Parsed items turn a failed slot answer into an edit turn; bare
            // unparsed input repeats the question verbatim.
            if interpretation.items.is_empty() {
                Resolution::Reprompt(reply)
            } else {
                Resolution::FellThrough
            }
        };

        match slot {
            AwaitingSlot::Size { item } => {
                let Some(line) = session.line_items.get_mut(*item) else {
                    return Resolution::FellThrough;
                };
                match classifiers::detect_size(normalized, &self.settings.supported_sizes) {
                    Some(size) => {
                        line.size = Some(size);
                        Resolution::Filled(Some(line.name.clone()))
                    }
                    None => reject(self.question_for_slot(slot, session)),
                }
            }
            AwaitingSlot::Spice { item } => {
                let Some(line) = session.line_items.get_mut(*item) else {
                    return Resolution::FellThrough;
                };
                match classifiers::detect_spice(normalized) {
                    SpiceScan::One(level) => {
                        line.spice = Some(level);
                        Resolution::Filled(Some(line.name.clone()))
                    }
                    SpiceScan::Conflicting => {
                        Resolution::Reprompt(self.spice_clarify_question(&line.name))
                    }
                    SpiceScan::None => reject(self.question_for_slot(slot, session)),
                }
            }
            AwaitingSlot::ItemOption { item, name, choices } => {
                let Some(line) = session.line_items.get_mut(*item) else {
                    return Resolution::FellThrough;
                };
                let hits: Vec<&String> = choices
                    .iter()
                    .filter(|v| super::normalize::contains_phrase(normalized, v))
                    .collect();
                if let [value] = hits.as_slice() {
                    line.options.insert(name.clone(), (*value).clone());
                    Resolution::Filled(Some(line.name.clone()))
                } else {
                    reject(self.question_for_slot(slot, session))
                }
            }
            AwaitingSlot::OrderType => match classifiers::detect_order_type(normalized) {
                Some(order_type) => {
                    session.order_type = Some(order_type);
                    Resolution::Filled(None)
                }
                None => reject(PROMPT_ORDER_TYPE.to_string()),
            },
            AwaitingSlot::Address => {
                if classifiers::is_plausible_address(normalized) {
                    session.address = Some(raw_text.trim().to_string());
                    Resolution::Filled(None)
                } else {
                    reject(PROMPT_ADDRESS.to_string())
                }
            }
        }
    }

    /// Finds the first line item with an unfilled slot, size before spice
    /// before declared options, items in insertion order.
    fn next_item_slot(&self, session: &OrderSession) -> Option<AwaitingSlot> {
        for (idx, item) in session.line_items.iter().enumerate() {
            if item.kind == ItemKind::Pizza && item.size.is_none() {
                return Some(AwaitingSlot::Size { item: idx });
            }
            let Some(entry) = self.index.entry_for(item.kind, &item.name) else {
                continue;
            };
            if entry.requires_spice && item.spice.is_none() {
                return Some(AwaitingSlot::Spice { item: idx });
            }
            if let Some(spec) = item.first_missing_option(entry) {
                return Some(AwaitingSlot::ItemOption {
                    item: idx,
                    name: spec.name.clone(),
                    choices: spec.values.clone(),
                });
            }
        }
        None
    }

    /// The question for a slot. Deterministic, so a rejected answer repeats
    /// the identical question.
    fn question_for_slot(&self, slot: &AwaitingSlot, session: &OrderSession) -> String {
        match slot {
            AwaitingSlot::Size { item } => {
                let name = item_name(session, *item);
                let sizes: Vec<&str> = self
                    .settings
                    .supported_sizes
                    .iter()
                    .map(|s| s.label())
                    .collect();
                format!("What size would you like for your {}: {}?", name, sizes.join(", "))
            }
            AwaitingSlot::Spice { item } => {
                format!(
                    "How spicy would you like your {}: mild, medium, or hot?",
                    item_name(session, *item)
                )
            }
            AwaitingSlot::ItemOption { item, name, choices } => {
                format!(
                    "Which {} would you like for your {}: {}?",
                    name,
                    item_name(session, *item),
                    choices.join(" or ")
                )
            }
            AwaitingSlot::OrderType => PROMPT_ORDER_TYPE.to_string(),
            AwaitingSlot::Address => PROMPT_ADDRESS.to_string(),
        }
    }

    fn spice_clarify_question(&self, name: &str) -> String {
        format!(
            "I caught more than one spice level. Just one, please: should the {} be mild, medium, or hot?",
            name
        )
    }

    fn menu_overview(&self) -> String {
        let mut sections = Vec::new();
        for kind in [
            ItemKind::Pizza,
            ItemKind::Wings,
            ItemKind::Pasta,
            ItemKind::Salad,
            ItemKind::Side,
            ItemKind::Beverage,
        ] {
            let names: Vec<&str> = self
                .index
                .entries_of_kind(kind)
                .map(|e| e.name.as_str())
                .collect();
            if !names.is_empty() {
                sections.push(format!(
                    "{}: {}",
                    capitalize(kind.plural_label()),
                    names.join(", ")
                ));
            }
        }
        if sections.is_empty() {
            "No menu available".to_string()
        } else {
            format!("Here's our menu. {}.", sections.join(". "))
        }
    }

    fn category_listing(&self, kind: ItemKind) -> String {
        let names: Vec<&str> = self
            .index
            .entries_of_kind(kind)
            .map(|e| e.name.as_str())
            .collect();
        if names.is_empty() {
            format!("No {} available", kind.plural_label())
        } else {
            format!("We have: {}.", names.join(", "))
        }
    }
}

fn item_name(session: &OrderSession, idx: usize) -> &str {
    session
        .line_items
        .get(idx)
        .map(|l| l.name.as_str())
        .unwrap_or("item")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
