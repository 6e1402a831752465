use crate::model::{Card, Difficulty};

/// Returns the ordered subsequence of cards matching the difficulty.
///
/// Pure derivation: preserves the relative order of the input (seed cards
/// first, then backend cards in fetch order) and never mutates it. Applying
/// it again with the same difficulty yields the same result.
#[must_use]
pub fn filter_cards(cards: &[Card], difficulty: Difficulty) -> Vec<&Card> {
    cards
        .iter()
        .filter(|card| card.difficulty() == difficulty)
        .collect()
}
