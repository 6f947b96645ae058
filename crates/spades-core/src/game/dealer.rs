use crate::game::hand_state::{PLAYERS, TRICKS_PER_HAND};
use crate::model::card::Card;
use crate::model::deck::Deck;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::array;

/// Shuffles and deals. All randomness in a game flows from this seed.
#[derive(Debug, Clone)]
pub struct Dealer {
    rng: StdRng,
}

impl Dealer {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Thirteen cards for each seat, dealt round-robin from a fresh shuffle.
    pub fn deal(&mut self) -> [Vec<Card>; PLAYERS] {
        let deck = Deck::shuffled(&mut self.rng);
        let mut holdings: [Vec<Card>; PLAYERS] =
            array::from_fn(|_| Vec::with_capacity(TRICKS_PER_HAND));
        for (index, card) in deck.into_cards().into_iter().enumerate() {
            holdings[index % PLAYERS].push(card);
        }
        holdings
    }

    pub fn pick_seat_index(&mut self) -> usize {
        self.rng.gen_range(0..PLAYERS)
    }
}

#[cfg(test)]
mod tests {
    use super::Dealer;
    use std::collections::HashSet;

    #[test]
    fn deals_thirteen_distinct_cards_to_each_seat() {
        let mut dealer = Dealer::with_seed(7);
        let holdings = dealer.deal();
        let mut seen = HashSet::new();
        for cards in &holdings {
            assert_eq!(cards.len(), 13);
            seen.extend(cards.iter().copied());
        }
        assert_eq!(seen.len(), 52);
    }

    #[test]
    fn same_seed_deals_same_cards() {
        let mut a = Dealer::with_seed(99);
        let mut b = Dealer::with_seed(99);
        assert_eq!(a.deal(), b.deal());
        assert_eq!(a.pick_seat_index(), b.pick_seat_index());
        assert_eq!(a.deal(), b.deal());
    }
}
