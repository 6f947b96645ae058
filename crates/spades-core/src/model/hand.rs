use crate::model::card::Card;
use crate::model::suit::Suit;
use std::vec::Vec;

/// Cards held by one player, in the positional order play actions refer to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Builds a freshly dealt hand sorted by reversed card index.
    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    /// Removes and returns the card at `position`, shifting later cards left.
    pub fn take(&mut self, position: usize) -> Option<Card> {
        if position < self.cards.len() {
            Some(self.cards.remove(position))
        } else {
            None
        }
    }

    pub fn get(&self, position: usize) -> Option<Card> {
        self.cards.get(position).copied()
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|c| c.suit == suit)
    }

    pub fn only_trump(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|c| c.is_trump())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn indices(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.index()).collect()
    }

    fn sort(&mut self) {
        self.cards.sort_by_key(|c| c.reversed_index_key());
    }
}
