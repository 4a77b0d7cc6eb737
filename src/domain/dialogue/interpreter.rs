//! Utterance Interpreter - one utterance in, intent plus candidate items out.
//!
//! Menu and category questions are checked before any item extraction so a
//! customer can browse mid-order without the browse being read as an order.
//! The interpreter never guesses: when nothing matches it reports an empty
//! result and leaves the fallback prompt to the engine.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{normalize, CatalogEntry, CatalogIndex, StoreSettings};
use crate::domain::order::{ItemKind, LineItem, OrderType, Size};

use super::classifiers::{self, SpiceScan};
use super::normalize::{contains_phrase, detect_quantity};

/// Conversational intent of one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Intent {
    MenuQuestion,
    CategoryQuestion(ItemKind),
    Affirm,
    Negate,
    Done,
    OrderTypeStatement(OrderType),
}

/// Result of interpreting one utterance.
#[derive(Debug, Clone, Default)]
pub struct Interpretation {
    pub intent: Option<Intent>,
    /// Candidate line items, qty-summed within this call.
    pub items: Vec<LineItem>,
    /// The utterance carried an explicit change/actually/instead cue.
    pub change_cue: bool,
    /// The utterance mentioned more than one spice level.
    pub spice_conflict: bool,
}

impl Interpretation {
    /// The empty result: no intent, no items. Used as the failure fallback
    /// by interpreter adapters; the engine turns it into a generic prompt.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.intent.is_none() && self.items.is_empty()
    }
}

/// Interprets one raw utterance against the catalog.
pub fn interpret(index: &CatalogIndex, settings: &StoreSettings, text: &str) -> Interpretation {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return Interpretation::empty();
    }

    // Browse questions win over everything else, including extraction.
    if classifiers::is_menu_question(&normalized) {
        return Interpretation {
            intent: Some(Intent::MenuQuestion),
            ..Interpretation::empty()
        };
    }
    if let Some(kind) = classifiers::category_question(&normalized) {
        return Interpretation {
            intent: Some(Intent::CategoryQuestion(kind)),
            ..Interpretation::empty()
        };
    }

    let change_cue = classifiers::has_change_cue(&normalized);

    // Done outranks negate: "no more" is a completion statement even though
    // it leads with "no".
    let intent = if classifiers::is_done(&normalized) {
        Some(Intent::Done)
    } else if classifiers::is_affirmative(&normalized) {
        Some(Intent::Affirm)
    } else if classifiers::is_negative(&normalized) {
        Some(Intent::Negate)
    } else {
        classifiers::detect_order_type(&normalized).map(Intent::OrderTypeStatement)
    };

    let qty = detect_quantity(&normalized);
    let size = classifiers::detect_size(&normalized, &settings.supported_sizes);
    let spice = classifiers::detect_spice(&normalized);

    let mut interpretation = Interpretation {
        intent,
        items: Vec::new(),
        change_cue,
        spice_conflict: spice == SpiceScan::Conflicting,
    };

    for entry in index.entries() {
        if !entry.matches(&normalized) {
            continue;
        }
        let candidate = build_candidate(entry, &normalized, qty, size, spice);
        merge_candidate(&mut interpretation.items, candidate);
    }

    interpretation
}

fn build_candidate(
    entry: &CatalogEntry,
    normalized: &str,
    qty: u32,
    size: Option<Size>,
    spice: SpiceScan,
) -> LineItem {
    let mut item = LineItem::new(entry.kind, entry.name.clone(), qty);

    if entry.kind == ItemKind::Pizza {
        item.size = size;
    }

    if entry.requires_spice {
        if let SpiceScan::One(level) = spice {
            // A bare "medium" that already named the pizza size is not also
            // a spice answer; taking it would amount to guessing.
            let medium_doing_double_duty = level == crate::domain::order::SpiceLevel::Medium
                && item.size == Some(Size::Medium);
            if !medium_doing_double_duty {
                item.spice = Some(level);
            }
        }
    }

    for spec in &entry.options {
        let hits: Vec<&String> = spec
            .values
            .iter()
            .filter(|v| contains_phrase(normalized, v))
            .collect();
        // Exactly one mentioned value selects the option; zero or several
        // leave it for slot-filling.
        if let [value] = hits.as_slice() {
            item.options.insert(spec.name.clone(), (*value).clone());
        }
    }

    item
}

/// Qty-sums duplicates within a single interpreter call.
fn merge_candidate(items: &mut Vec<LineItem>, candidate: LineItem) {
    let key = candidate.merge_key();
    if let Some(existing) = items.iter_mut().find(|i| i.merge_key() == key) {
        existing.qty += candidate.qty;
    } else {
        items.push(candidate);
    }
}
