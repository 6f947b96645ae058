use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn is_trump(self) -> bool {
        self.suit.is_trump()
    }

    /// Canonical two-character index: rank symbol followed by suit symbol.
    pub fn index(self) -> String {
        self.to_string()
    }

    /// Key that orders cards by their index string read back to front,
    /// i.e. suit symbol first, then rank symbol, both compared as ASCII.
    pub const fn reversed_index_key(self) -> (char, char) {
        (self.suit.symbol(), self.rank.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card index {input:?}")]
pub struct CardParseError {
    pub input: String,
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CardParseError {
            input: s.to_string(),
        };
        let mut chars = s.chars();
        let (Some(rank), Some(suit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let rank = Rank::from_symbol(rank).ok_or_else(invalid)?;
        let suit = Suit::from_symbol(suit).ok_or_else(invalid)?;
        Ok(Card::new(rank, suit))
    }
}
