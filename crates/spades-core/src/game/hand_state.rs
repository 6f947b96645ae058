use crate::game::judge;
use crate::model::action::Action;
use crate::model::card::Card;
use crate::model::deck::DECK_SIZE;
use crate::model::partnership::PartnershipLedger;
use crate::model::player::{PartnershipId, Player, Seat};
use crate::model::trick::{PLAYS_PER_TRICK, Trick};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{Level, event};

pub const TRICKS_PER_HAND: usize = 13;
pub const PLAYERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandPhase {
    Bidding,
    TrickInProgress,
    HandComplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandError {
    #[error("{action} is not legal for {seat}; legal actions: {legal:?}")]
    IllegalAction {
        seat: Seat,
        action: Action,
        legal: Vec<Action>,
    },
    #[error("hand invariant violated: {0}")]
    InvariantViolation(String),
}

/// What happened when an action was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub seat: Seat,
    pub card: Option<Card>,
    pub next: Seat,
    pub trick_winner: Option<Seat>,
    /// Score deltas per partnership, present once the thirteenth trick closes.
    pub hand_scores: Option<[i32; 2]>,
}

/// One deal: four bids followed by thirteen tricks.
///
/// The hand owns the game's [`PartnershipLedger`] while it is live; tricks
/// won and final hand scores are written straight into it.
#[derive(Debug, Clone)]
pub struct HandState {
    ledger: PartnershipLedger,
    phase: HandPhase,
    current: Seat,
    bids_placed: usize,
    current_trick: Trick,
    trick_history: Vec<Trick>,
    spades_broken: bool,
}

impl HandState {
    /// Starts a hand from four 13-card holdings indexed by seat. Per-hand
    /// fields in the ledger are reset; scores and bags carry over.
    pub fn deal(
        mut ledger: PartnershipLedger,
        holdings: [Vec<Card>; PLAYERS],
        first: Seat,
    ) -> Result<Self, HandError> {
        let mut seen = HashSet::with_capacity(DECK_SIZE);
        for (seat, cards) in Seat::LOOP.iter().zip(&holdings) {
            if cards.len() != TRICKS_PER_HAND {
                return Err(HandError::InvariantViolation(format!(
                    "{seat} was dealt {} cards",
                    cards.len()
                )));
            }
            if let Some(card) = cards.iter().find(|card| !seen.insert(**card)) {
                return Err(HandError::InvariantViolation(format!(
                    "{card} dealt more than once"
                )));
            }
        }

        ledger.reset_hand();
        for (seat, cards) in Seat::LOOP.into_iter().zip(holdings) {
            ledger.player_mut(seat).receive(cards);
        }

        Ok(Self {
            ledger,
            phase: HandPhase::Bidding,
            current: first,
            bids_placed: 0,
            current_trick: Trick::new(first),
            trick_history: Vec::with_capacity(TRICKS_PER_HAND),
            spades_broken: false,
        })
    }

    pub fn phase(&self) -> HandPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == HandPhase::HandComplete
    }

    pub fn current_player(&self) -> Seat {
        self.current
    }

    pub fn ledger(&self) -> &PartnershipLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut PartnershipLedger {
        &mut self.ledger
    }

    pub fn player(&self, seat: Seat) -> &Player {
        self.ledger.player(seat)
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn trick_history(&self) -> &[Trick] {
        &self.trick_history
    }

    pub fn spades_broken(&self) -> bool {
        self.spades_broken
    }

    pub fn bids_placed(&self) -> usize {
        self.bids_placed
    }

    /// Cards still held plus cards played this hand. 52 for a live hand.
    pub fn cards_in_play(&self) -> usize {
        let held: usize = self.ledger.players().map(|p| p.hand().len()).sum();
        held + self.current_trick.len() + self.trick_history.len() * PLAYS_PER_TRICK
    }

    pub fn legal_actions(&self) -> Vec<Action> {
        match self.phase {
            HandPhase::Bidding => Action::all_bids().collect(),
            HandPhase::HandComplete => Vec::new(),
            HandPhase::TrickInProgress => self.legal_plays(),
        }
    }

    fn legal_plays(&self) -> Vec<Action> {
        let hand = self.ledger.player(self.current).hand();
        let positions = hand.iter().enumerate();

        let legal: Vec<usize> = match self.current_trick.lead_suit() {
            // A leader holding nothing but spades may lead one before they break.
            None if self.spades_broken || hand.only_trump() => positions.map(|(i, _)| i).collect(),
            None => positions
                .filter(|(_, card)| !card.is_trump())
                .map(|(i, _)| i)
                .collect(),
            Some(lead) if hand.has_suit(lead) => positions
                .filter(|(_, card)| card.suit == lead)
                .map(|(i, _)| i)
                .collect(),
            Some(_) => positions.map(|(i, _)| i).collect(),
        };

        legal.into_iter().map(Action::PlayAt).collect()
    }

    /// Applies `action` for the player on turn and returns the next actor.
    ///
    /// Illegal actions are rejected before anything is mutated.
    pub fn apply(&mut self, action: Action) -> Result<ApplyOutcome, HandError> {
        let legal = self.legal_actions();
        let seat = self.current;
        if !legal.contains(&action) {
            return Err(HandError::IllegalAction {
                seat,
                action,
                legal,
            });
        }

        match action {
            Action::Bid(amount) => {
                self.ledger.player_mut(seat).place_bid(amount);
                self.bids_placed += 1;
                if self.bids_placed == PLAYERS {
                    self.phase = HandPhase::TrickInProgress;
                }
                self.current = seat.next();
                Ok(ApplyOutcome {
                    seat,
                    card: None,
                    next: self.current,
                    trick_winner: None,
                    hand_scores: None,
                })
            }
            Action::PlayAt(position) => self.play(seat, position),
        }
    }

    fn play(&mut self, seat: Seat, position: usize) -> Result<ApplyOutcome, HandError> {
        let card = self
            .ledger
            .player_mut(seat)
            .play_at(position)
            .ok_or_else(|| {
                HandError::InvariantViolation(format!("{seat} has no card at {position}"))
            })?;
        self.current_trick
            .play(seat, card)
            .map_err(|err| HandError::InvariantViolation(err.to_string()))?;

        if card.is_trump() {
            self.spades_broken = true;
        }

        let mut outcome = ApplyOutcome {
            seat,
            card: Some(card),
            next: seat.next(),
            trick_winner: None,
            hand_scores: None,
        };

        if self.current_trick.is_complete() {
            let winner = self.complete_trick()?;
            outcome.trick_winner = Some(winner);
            outcome.next = winner;
        }
        self.current = outcome.next;

        if self.trick_history.len() == TRICKS_PER_HAND {
            outcome.hand_scores = Some(self.complete_hand()?);
        }

        Ok(outcome)
    }

    fn complete_trick(&mut self) -> Result<Seat, HandError> {
        let winner = self.current_trick.winner().ok_or_else(|| {
            HandError::InvariantViolation("complete trick without a winner".to_string())
        })?;
        self.ledger.player_mut(winner).won_trick();
        let finished = std::mem::replace(&mut self.current_trick, Trick::new(winner));

        event!(
            target: "spades_core::hand",
            Level::DEBUG,
            trick = self.trick_history.len() + 1,
            leader = %finished.leader(),
            winner = %winner,
            spades_broken = self.spades_broken,
        );

        self.trick_history.push(finished);
        Ok(winner)
    }

    fn complete_hand(&mut self) -> Result<[i32; 2], HandError> {
        if let Some(player) = self.ledger.players().find(|p| !p.hand().is_empty()) {
            return Err(HandError::InvariantViolation(format!(
                "hand complete while {} still holds {} cards",
                player.seat(),
                player.hand().len()
            )));
        }

        let mut deltas = [0; 2];
        for partnership in self.ledger.partnerships_mut() {
            let bid = partnership.hand_bid();
            let won = partnership.hand_tricks_won();
            let delta = judge::judge_hand(partnership);
            partnership.add_to_score(delta);
            deltas[partnership.id().index()] = delta;

            event!(
                target: "spades_core::hand",
                Level::INFO,
                partnership = %partnership.id(),
                bid,
                won,
                delta,
                score = partnership.score(),
                bags = partnership.running_bags(),
            );
        }

        self.phase = HandPhase::HandComplete;
        Ok(deltas)
    }

    pub fn score(&self, id: PartnershipId) -> i32 {
        self.ledger.partnership(id).score()
    }
}
