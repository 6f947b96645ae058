use crate::model::card::Card;
use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Seat {
    pub const LOOP: [Seat; 4] = [Seat::North, Seat::East, Seat::South, Seat::West];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn next(self) -> Seat {
        match self {
            Seat::North => Seat::East,
            Seat::East => Seat::South,
            Seat::South => Seat::West,
            Seat::West => Seat::North,
        }
    }

    /// Seats alternate partnerships: North/South against East/West.
    pub const fn partnership(self) -> PartnershipId {
        match self {
            Seat::North | Seat::South => PartnershipId::NorthSouth,
            Seat::East | Seat::West => PartnershipId::EastWest,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Seat::North => "North",
            Seat::East => "East",
            Seat::South => "South",
            Seat::West => "West",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PartnershipId {
    NorthSouth = 0,
    EastWest = 1,
}

impl PartnershipId {
    pub const BOTH: [PartnershipId; 2] = [PartnershipId::NorthSouth, PartnershipId::EastWest];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Seats in partnership order; the first seat is the lower-indexed one.
    pub const fn seats(self) -> [Seat; 2] {
        match self {
            PartnershipId::NorthSouth => [Seat::North, Seat::South],
            PartnershipId::EastWest => [Seat::East, Seat::West],
        }
    }
}

impl fmt::Display for PartnershipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartnershipId::NorthSouth => f.write_str("North/South"),
            PartnershipId::EastWest => f.write_str("East/West"),
        }
    }
}

/// One seat's per-hand and per-game record. Owned by its partnership.
#[derive(Debug, Clone)]
pub struct Player {
    seat: Seat,
    partnership: PartnershipId,
    hand: Hand,
    bid: Option<u8>,
    tricks_won: u8,
    won_game: bool,
}

impl Player {
    pub fn new(seat: Seat) -> Self {
        Self {
            seat,
            partnership: seat.partnership(),
            hand: Hand::new(),
            bid: None,
            tricks_won: 0,
            won_game: false,
        }
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn partnership(&self) -> PartnershipId {
        self.partnership
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn receive(&mut self, cards: Vec<Card>) {
        self.hand = Hand::with_cards(cards);
    }

    pub fn play_at(&mut self, position: usize) -> Option<Card> {
        self.hand.take(position)
    }

    /// `None` until the player has bid this hand.
    pub fn bid(&self) -> Option<u8> {
        self.bid
    }

    pub fn place_bid(&mut self, amount: u8) {
        self.bid = Some(amount);
    }

    pub fn is_nil(&self) -> bool {
        self.bid == Some(0)
    }

    pub fn tricks_won(&self) -> u8 {
        self.tricks_won
    }

    pub fn won_trick(&mut self) {
        self.tricks_won += 1;
    }

    pub fn won_game(&self) -> bool {
        self.won_game
    }

    pub fn mark_won_game(&mut self) {
        self.won_game = true;
    }

    pub fn reset_hand(&mut self) {
        self.bid = None;
        self.tricks_won = 0;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bid {
            Some(bid) => write!(f, "{} bid {bid}, won {}", self.seat, self.tricks_won),
            None => write!(f, "{} no bid, won {}", self.seat, self.tricks_won),
        }
    }
}
