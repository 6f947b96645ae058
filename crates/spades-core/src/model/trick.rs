use crate::game::judge;
use crate::model::card::Card;
use crate::model::player::Seat;
use crate::model::suit::Suit;
use thiserror::Error;

pub const PLAYS_PER_TRICK: usize = 4;

/// Cards played to one trick, in play order from the leader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trick {
    leader: Seat,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("trick already complete")]
    TrickComplete,
    #[error("expected {expected} to play next but got {actual}")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("{0} has already played this trick")]
    AlreadyPlayed(Seat),
}

impl Trick {
    pub fn new(leader: Seat) -> Self {
        Self {
            leader,
            plays: Vec::with_capacity(PLAYS_PER_TRICK),
        }
    }

    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == PLAYS_PER_TRICK
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|play| play.card.suit)
    }

    pub fn play(&mut self, seat: Seat, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        if self.plays.iter().any(|play| play.seat == seat) {
            return Err(TrickError::AlreadyPlayed(seat));
        }

        let expected = self.expected_seat();
        if expected != seat {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        self.plays.push(Play { seat, card });
        Ok(())
    }

    pub fn winner(&self) -> Option<Seat> {
        if !self.is_complete() {
            return None;
        }
        let lead = self.lead_suit()?;
        let cards: Vec<Card> = self.plays.iter().map(|play| play.card).collect();
        judge::judge_trick(&cards, lead).map(|position| self.plays[position].seat)
    }

    /// Seat/card-index pairs in play order.
    pub fn indices(&self) -> Vec<(Seat, String)> {
        self.plays
            .iter()
            .map(|play| (play.seat, play.card.index()))
            .collect()
    }

    pub fn expected_seat(&self) -> Seat {
        self.plays
            .last()
            .map(|play| play.seat.next())
            .unwrap_or(self.leader)
    }
}
