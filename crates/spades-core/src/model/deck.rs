use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::Rng;
use rand::seq::SliceRandom;

pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Suit-major order: every club, then diamonds, hearts and spades.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ORDERED {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.cards.shuffle(rng);
        deck
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::{DECK_SIZE, Deck};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn shuffled(seed: u64) -> Vec<crate::model::card::Card> {
        Deck::shuffled(&mut StdRng::seed_from_u64(seed)).into_cards()
    }

    #[test]
    fn standard_deck_has_52_unique_cards() {
        let cards = Deck::standard().into_cards();
        assert_eq!(cards.len(), DECK_SIZE);
        let unique: HashSet<_> = cards.iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn shuffle_is_deterministic_per_seed() {
        assert_eq!(shuffled(42), shuffled(42));
        assert_ne!(shuffled(1), shuffled(2));
    }

    #[test]
    fn shuffle_keeps_every_card() {
        let mut cards = shuffled(7);
        let mut standard = Deck::standard().into_cards();
        cards.sort_by_key(|c| c.index());
        standard.sort_by_key(|c| c.index());
        assert_eq!(cards, standard);
    }
}
