use core::fmt;
use serde::{Deserialize, Serialize};

pub const MAX_BID: u8 = 13;

/// A move submitted by the player on turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Action {
    /// Declare a number of tricks, 0..=13. A bid of 0 is nil.
    Bid(u8),
    /// Play the card at this position of the player's current hand ordering.
    PlayAt(usize),
}

impl Action {
    pub fn all_bids() -> impl Iterator<Item = Action> {
        (0..=MAX_BID).map(Action::Bid)
    }

    pub const fn is_bid(self) -> bool {
        matches!(self, Action::Bid(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Bid(amount) => write!(f, "bid {amount}"),
            Action::PlayAt(position) => write!(f, "play #{position}"),
        }
    }
}
