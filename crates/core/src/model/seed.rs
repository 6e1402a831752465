//! Built-in demonstration cards.
//!
//! These coexist with backend-sourced cards in the working set and are
//! filtered identically, but they are never persisted, edited, or deleted.

use crate::model::{Card, Difficulty};

/// The demonstration card set shipped with the client.
#[must_use]
pub fn demo_cards() -> Vec<Card> {
    vec![Card::seed(
        "Artificial Intelligence",
        "Basic Concepts",
        Difficulty::Easy,
        "What does AI stand for?",
        "AI stands for Artificial Intelligence.",
    )]
}

/// Subject names contributed by the demonstration set, in order and
/// without duplicates. These appear in the catalog even when the backend
/// has no decks.
#[must_use]
pub fn demo_subject_names() -> Vec<String> {
    let mut names = Vec::new();
    for card in demo_cards() {
        let name = card.subject_name().to_owned();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_cards_are_seed_cards() {
        let cards = demo_cards();
        assert!(!cards.is_empty());
        assert!(cards.iter().all(Card::is_seed));
    }

    #[test]
    fn demo_subject_names_are_unique() {
        let names = demo_subject_names();
        assert_eq!(names, vec!["Artificial Intelligence".to_owned()]);
    }
}
