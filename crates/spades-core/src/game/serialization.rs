use super::game_state::{GameError, SpadesGame};
use crate::model::action::Action;
use crate::model::partnership::Partnership;
use crate::model::player::{PartnershipId, Seat};
use serde::{Deserialize, Serialize};

/// One card of a trick, keyed by the seat that played it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayedCard {
    pub seat: Seat,
    pub card: String,
}

/// Everything one seat is allowed to see at its decision point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerView {
    pub seat: Seat,
    /// Held cards as index strings, in the order `PlayAt` refers to.
    pub hand: Vec<String>,
    /// Completed tricks of the current hand, each in play order.
    pub trick_history: Vec<Vec<PlayedCard>>,
    pub partnership_score: i32,
    pub hand_is_over: bool,
    pub game_is_over: bool,
}

impl PlayerView {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Seed plus the accepted action log; replaying it rebuilds the game exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSnapshot {
    pub seed: u64,
    pub hands_played: u32,
    pub dealer: Seat,
    pub scores: [i32; 2],
    pub running_bags: [u32; 2],
    pub game_bags: [u32; 2],
    #[serde(default)]
    pub winner: Option<PartnershipId>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl GameSnapshot {
    pub fn capture(game: &SpadesGame) -> Self {
        let bags = |f: fn(&Partnership) -> u32| PartnershipId::BOTH.map(|id| f(game.partnership(id)));
        GameSnapshot {
            seed: game.seed(),
            hands_played: game.hands_played(),
            dealer: game.dealer(),
            scores: game.scores(),
            running_bags: bags(Partnership::running_bags),
            game_bags: bags(Partnership::game_bags),
            winner: game.winner(),
            actions: game.actions().to_vec(),
        }
    }

    pub fn restore(&self) -> Result<SpadesGame, GameError> {
        let mut game = SpadesGame::with_seed(self.seed)?;
        for action in &self.actions {
            game.step(*action)?;
        }
        Ok(game)
    }

    pub fn to_json(game: &SpadesGame) -> serde_json::Result<String> {
        let snapshot = Self::capture(game);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
