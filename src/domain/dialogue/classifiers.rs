//! Named keyword classifiers, one per conversational concept.
//!
//! Each classifier is an independent function over normalized text so it can
//! be unit-tested on its own. Vocabulary lives in static tables; the engine
//! decides in which states a classifier's verdict is meaningful.

use once_cell::sync::Lazy;

use crate::domain::order::{ItemKind, OrderType, Size, SpiceLevel};

use super::normalize::{contains_phrase, contains_token};

static YES_WORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec!["yes", "yeah", "yep", "yup", "sure", "correct", "right", "ok", "okay", "confirm"]
});

static YES_PHRASES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec!["sounds good", "looks good", "thats right", "thats correct"]
});

static NO_WORDS: Lazy<Vec<&'static str>> = Lazy::new(|| vec!["no", "nope", "nah", "wrong", "incorrect"]);

static NO_PHRASES: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["not right", "thats wrong", "thats not right", "not quite"]);

static DONE_PHRASES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "no more",
        "thats all",
        "thats it",
        "thats everything",
        "nothing else",
        "that will be all",
        "thatll be all",
        "im done",
        "done",
        "im good",
        "all set",
    ]
});

static CHANGE_CUES: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["change", "actually", "instead", "swap"]);

static QUESTION_CUES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec!["what", "which", "do you have", "got any", "tell me", "show me", "any"]
});

static PICKUP_PHRASES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec!["pickup", "pick up", "pick it up", "carry out", "carryout", "take out", "takeout"]
});

static DELIVERY_PHRASES: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["delivery", "deliver", "delivered"]);

static STREET_WORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "st", "street", "ave", "avenue", "rd", "road", "blvd", "boulevard", "lane", "ln", "dr",
        "drive", "way", "court", "ct", "circle", "place", "pl", "terrace", "hwy", "highway",
    ]
});

/// Spice mentions found in one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiceScan {
    /// No spice vocabulary present.
    None,
    /// Exactly one spice level mentioned.
    One(SpiceLevel),
    /// More than one level mentioned; must be re-asked, never guessed.
    Conflicting,
}

/// General menu question ("what's on the menu").
pub fn is_menu_question(text: &str) -> bool {
    contains_token(text, "menu")
        || contains_phrase(text, "what do you have")
        || contains_phrase(text, "what do you sell")
        || contains_phrase(text, "what are my options")
}

/// Category browse question ("what pizzas do you have", bare "wings").
///
/// Requires an interrogative cue alongside the category word, or the
/// utterance being nothing but the category word, so that an order like
/// "two pepperoni pizzas" is not misread as browsing.
pub fn category_question(text: &str) -> Option<ItemKind> {
    let category = detect_category_word(text)?;
    let has_cue = QUESTION_CUES.iter().any(|cue| contains_phrase(text, cue));
    let bare = text == category.1 || text == category.2;
    if has_cue || bare {
        Some(category.0)
    } else {
        None
    }
}

fn detect_category_word(text: &str) -> Option<(ItemKind, &'static str, &'static str)> {
    let categories: [(ItemKind, &'static str, &'static str); 7] = [
        (ItemKind::Pizza, "pizza", "pizzas"),
        (ItemKind::Wings, "wing", "wings"),
        (ItemKind::Pasta, "pasta", "pastas"),
        (ItemKind::Salad, "salad", "salads"),
        (ItemKind::Side, "side", "sides"),
        (ItemKind::Beverage, "beverage", "beverages"),
        (ItemKind::Beverage, "drink", "drinks"),
    ];
    categories
        .into_iter()
        .find(|(_, singular, plural)| contains_token(text, singular) || contains_token(text, plural))
}

/// Whole-utterance affirmation ("yes", "yeah, that's right").
pub fn is_affirmative(text: &str) -> bool {
    let word_count = text.split_whitespace().count();
    let leads_with_yes = text
        .split_whitespace()
        .next()
        .map(|first| YES_WORDS.contains(&first))
        .unwrap_or(false);
    (leads_with_yes && word_count <= 4) || YES_PHRASES.iter().any(|p| contains_phrase(text, p))
}

/// Whole-utterance negation ("no", "no, change the size").
pub fn is_negative(text: &str) -> bool {
    let leads_with_no = text
        .split_whitespace()
        .next()
        .map(|first| NO_WORDS.contains(&first))
        .unwrap_or(false);
    leads_with_no || NO_PHRASES.iter().any(|p| contains_phrase(text, p))
}

/// "Nothing else" / "that's all" style completion statement.
pub fn is_done(text: &str) -> bool {
    DONE_PHRASES.iter().any(|p| contains_phrase(text, p))
}

/// Explicit edit cue ("change", "actually", "instead").
pub fn has_change_cue(text: &str) -> bool {
    CHANGE_CUES.iter().any(|cue| contains_token(text, cue))
}

/// Pickup/delivery statement. Returns None when absent or when both are
/// mentioned in one breath (the engine re-asks).
pub fn detect_order_type(text: &str) -> Option<OrderType> {
    let pickup = PICKUP_PHRASES.iter().any(|p| contains_phrase(text, p));
    let delivery = DELIVERY_PHRASES.iter().any(|p| contains_phrase(text, p));
    match (pickup, delivery) {
        (true, false) => Some(OrderType::Pickup),
        (false, true) => Some(OrderType::Delivery),
        _ => None,
    }
}

/// Size mention, priority large > medium > small to avoid partial overlaps.
/// Sizes the store does not sell are ignored.
pub fn detect_size(text: &str, supported: &[Size]) -> Option<Size> {
    for size in [Size::Large, Size::Medium, Size::Small] {
        let word = match size {
            Size::Large => "large",
            Size::Medium => "medium",
            Size::Small => "small",
        };
        if contains_token(text, word) {
            return supported.contains(&size).then_some(size);
        }
    }
    None
}

/// Scans for mild/medium/hot synonym groups.
///
/// Conflicting mentions surface as `Conflicting` rather than a guess; the
/// caller must re-prompt for a single explicit choice.
pub fn detect_spice(text: &str) -> SpiceScan {
    let negated_spicy = contains_phrase(text, "not spicy")
        || contains_phrase(text, "not too spicy")
        || contains_phrase(text, "no spice");

    let mild = contains_token(text, "mild") || negated_spicy;
    let medium = contains_token(text, "medium");
    let hot = contains_token(text, "hot") || (contains_token(text, "spicy") && !negated_spicy);

    match (mild, medium, hot) {
        (true, false, false) => SpiceScan::One(SpiceLevel::Mild),
        (false, true, false) => SpiceScan::One(SpiceLevel::Medium),
        (false, false, true) => SpiceScan::One(SpiceLevel::Hot),
        (false, false, false) => SpiceScan::None,
        _ => SpiceScan::Conflicting,
    }
}

/// Cheap plausibility check for a street address: a token containing a
/// digit plus a street-type word.
pub fn is_plausible_address(text: &str) -> bool {
    let has_number = text
        .split_whitespace()
        .any(|t| t.chars().any(|c| c.is_ascii_digit()));
    let has_street_word = STREET_WORDS.iter().any(|w| contains_token(text, w));
    has_number && has_street_word
}
