//! Token-level helpers over normalized utterance text.
//!
//! All functions expect text already passed through `catalog::normalize`
//! (lower-case, punctuation stripped, whitespace collapsed).

/// True if `word` occurs as a standalone token.
pub fn contains_token(text: &str, word: &str) -> bool {
    text.split_whitespace().any(|t| t == word)
}

/// True if `phrase` occurs on token boundaries.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    if !phrase.contains(' ') {
        return contains_token(text, phrase);
    }
    format!(" {} ", text).contains(&format!(" {} ", phrase))
}

/// Detects the quantity spoken in an utterance.
///
/// First standalone integer token in 1..=49 wins; otherwise a spelled-out
/// "one"/"two"/"three"; otherwise 1.
pub fn detect_quantity(text: &str) -> u32 {
    for token in text.split_whitespace() {
        if let Ok(n) = token.parse::<u32>() {
            if (1..=49).contains(&n) {
                return n;
            }
        }
    }
    for token in text.split_whitespace() {
        match token {
            "one" => return 1,
            "two" => return 2,
            "three" => return 3,
            _ => {}
        }
    }
    1
}
