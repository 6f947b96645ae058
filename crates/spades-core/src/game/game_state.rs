use crate::game::dealer::Dealer;
use crate::game::hand_state::{HandError, HandState};
use crate::game::judge;
use crate::game::serialization::{PlayedCard, PlayerView};
use crate::model::action::Action;
use crate::model::card::Card;
use crate::model::partnership::{Partnership, PartnershipLedger};
use crate::model::player::{PartnershipId, Seat};
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error("game is already over")]
    GameOver,
}

/// Result of one [`SpadesGame::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub seat: Seat,
    pub card: Option<Card>,
    pub next: Seat,
    pub trick_winner: Option<Seat>,
    pub hand_scores: Option<[i32; 2]>,
    pub game_over: bool,
}

/// A full game: hands are dealt and played until one partnership passes
/// 500 points with the higher score.
#[derive(Debug, Clone)]
pub struct SpadesGame {
    seed: u64,
    dealer: Dealer,
    dealer_seat: Seat,
    hand: HandState,
    hands_played: u32,
    actions: Vec<Action>,
}

impl SpadesGame {
    pub fn with_seed(seed: u64) -> Result<Self, GameError> {
        let mut dealer = Dealer::with_seed(seed);
        let holdings = dealer.deal();
        let dealer_seat = Seat::LOOP[dealer.pick_seat_index()];
        let hand = HandState::deal(PartnershipLedger::new(), holdings, dealer_seat.next())?;

        event!(
            target: "spades_core::game",
            Level::DEBUG,
            seed,
            dealer = %dealer_seat,
            first = %hand.current_player(),
        );

        Ok(Self {
            seed,
            dealer,
            dealer_seat,
            hand,
            hands_played: 0,
            actions: Vec::new(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn dealer(&self) -> Seat {
        self.dealer_seat
    }

    pub fn hand(&self) -> &HandState {
        &self.hand
    }

    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }

    /// Every action accepted so far, in order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn current_player(&self) -> Seat {
        self.hand.current_player()
    }

    pub fn partnership(&self, id: PartnershipId) -> &Partnership {
        self.hand.ledger().partnership(id)
    }

    pub fn scores(&self) -> [i32; 2] {
        self.hand.ledger().scores()
    }

    pub fn winner(&self) -> Option<PartnershipId> {
        self.hand.ledger().winner()
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    pub fn legal_actions(&self) -> Vec<Action> {
        if self.is_over() {
            return Vec::new();
        }
        self.hand.legal_actions()
    }

    pub fn step(&mut self, action: Action) -> Result<StepOutcome, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }

        let applied = self.hand.apply(action)?;
        self.actions.push(action);

        let mut outcome = StepOutcome {
            seat: applied.seat,
            card: applied.card,
            next: applied.next,
            trick_winner: applied.trick_winner,
            hand_scores: applied.hand_scores,
            game_over: false,
        };

        if self.hand.is_over() {
            self.hands_played += 1;
            let [first, second] = self.hand.ledger_mut().partnerships_mut();
            if let Some(winner) = judge::judge_game(first, second) {
                event!(
                    target: "spades_core::game",
                    Level::INFO,
                    winner = %winner,
                    hands = self.hands_played,
                    scores = ?self.scores(),
                );
                outcome.game_over = true;
            } else {
                self.start_next_hand()?;
                outcome.next = self.hand.current_player();
            }
        }

        Ok(outcome)
    }

    /// Rotates the dealer and replaces the finished hand with a fresh deal.
    fn start_next_hand(&mut self) -> Result<(), GameError> {
        self.dealer_seat = self.dealer_seat.next();
        let holdings = self.dealer.deal();
        let ledger = std::mem::take(self.hand.ledger_mut());
        self.hand = HandState::deal(ledger, holdings, self.dealer_seat.next())?;
        Ok(())
    }

    /// What `seat` can see: its own cards, the tricks of the current hand and
    /// its partnership's score.
    pub fn state(&self, seat: Seat) -> PlayerView {
        let trick_history = self
            .hand
            .trick_history()
            .iter()
            .map(|trick| {
                trick
                    .indices()
                    .into_iter()
                    .map(|(seat, card)| PlayedCard { seat, card })
                    .collect()
            })
            .collect();

        PlayerView {
            seat,
            hand: self.hand.player(seat).hand().indices(),
            trick_history,
            partnership_score: self.partnership(seat.partnership()).score(),
            hand_is_over: self.hand.is_over(),
            game_is_over: self.is_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GameError, SpadesGame};
    use crate::model::action::Action;
    use crate::model::player::{PartnershipId, Seat};

    fn play_first_legal(game: &mut SpadesGame, steps: usize) {
        for _ in 0..steps {
            let action = game.legal_actions()[0];
            game.step(action).unwrap();
        }
    }

    #[test]
    fn first_actor_sits_after_the_dealer() {
        let game = SpadesGame::with_seed(100).unwrap();
        assert_eq!(game.current_player(), game.dealer().next());
        assert_eq!(game.hands_played(), 0);
        assert_eq!(game.scores(), [0, 0]);
        assert!(!game.is_over());
    }

    #[test]
    fn completing_a_hand_rotates_dealer_and_redeals() {
        let mut game = SpadesGame::with_seed(3).unwrap();
        let first_dealer = game.dealer();
        let first_cards = game.state(Seat::North).hand;

        // Four bids plus fifty-two plays.
        play_first_legal(&mut game, 4 + 52);

        assert_eq!(game.hands_played(), 1);
        assert_eq!(game.dealer(), first_dealer.next());
        assert_eq!(game.current_player(), game.dealer().next());
        assert_eq!(game.hand().bids_placed(), 0);
        assert_eq!(game.hand().cards_in_play(), 52);
        assert_ne!(game.state(Seat::North).hand, first_cards);
        assert!(game.hand().ledger().players().all(|p| p.bid().is_none()));
    }

    #[test]
    fn state_reports_own_hand_and_history() {
        let mut game = SpadesGame::with_seed(11).unwrap();
        play_first_legal(&mut game, 4 + 4);

        let seat = game.current_player();
        let view = game.state(seat);
        assert_eq!(view.seat, seat);
        assert_eq!(view.trick_history.len(), 1);
        assert_eq!(view.trick_history[0].len(), 4);
        assert!(!view.hand_is_over);
        assert!(!view.game_is_over);
        assert_eq!(view.hand, game.hand().player(seat).hand().indices());
    }

    #[test]
    fn illegal_step_is_rejected_and_not_recorded() {
        let mut game = SpadesGame::with_seed(5).unwrap();
        let err = game.step(Action::PlayAt(0)).unwrap_err();
        assert!(matches!(err, GameError::Hand(_)));
        assert!(game.actions().is_empty());
    }

    #[test]
    fn same_seed_and_actions_reproduce_the_game() {
        let mut a = SpadesGame::with_seed(21).unwrap();
        let mut b = SpadesGame::with_seed(21).unwrap();
        for _ in 0..120 {
            let action = *a.legal_actions().last().unwrap();
            let left = a.step(action).unwrap();
            let right = b.step(action).unwrap();
            assert_eq!(left, right);
        }
        assert_eq!(a.scores(), b.scores());
        assert_eq!(a.state(Seat::East), b.state(Seat::East));
    }

    #[test]
    fn passing_five_hundred_ends_the_game() {
        let mut game = SpadesGame::with_seed(8).unwrap();
        game.hand
            .ledger_mut()
            .partnership_mut(PartnershipId::NorthSouth)
            .add_to_score(1000);

        play_first_legal(&mut game, 4 + 51);
        assert!(!game.is_over());
        let action = game.legal_actions()[0];
        let outcome = game.step(action).unwrap();

        assert!(outcome.game_over);
        assert!(outcome.hand_scores.is_some());
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(PartnershipId::NorthSouth));
        assert_eq!(game.hands_played(), 1);
        assert!(game.hand().ledger().player(Seat::South).won_game());
        assert!(!game.hand().ledger().player(Seat::East).won_game());
        assert!(game.legal_actions().is_empty());
        assert!(matches!(game.step(Action::Bid(0)), Err(GameError::GameOver)));

        let view = game.state(Seat::North);
        assert!(view.game_is_over);
        assert!(view.hand_is_over);
        assert_eq!(view.trick_history.len(), 13);
    }
}
