use crate::model::player::{PartnershipId, Player, Seat};
use core::fmt;

/// Two partners and the scoring state that persists across hands.
#[derive(Debug, Clone)]
pub struct Partnership {
    id: PartnershipId,
    players: [Player; 2],
    score: i32,
    running_bags: u32,
    game_bags: u32,
    won_game: bool,
}

impl Partnership {
    pub fn new(id: PartnershipId) -> Self {
        let [first, second] = id.seats();
        Self {
            id,
            players: [Player::new(first), Player::new(second)],
            score: 0,
            running_bags: 0,
            game_bags: 0,
            won_game: false,
        }
    }

    pub fn id(&self) -> PartnershipId {
        self.id
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player; 2] {
        &mut self.players
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.iter().find(|p| p.seat() == seat)
    }

    pub fn player_mut(&mut self, seat: Seat) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.seat() == seat)
    }

    /// Combined bid of both partners; an unset bid counts as zero.
    pub fn hand_bid(&self) -> u32 {
        self.players
            .iter()
            .map(|p| u32::from(p.bid().unwrap_or(0)))
            .sum()
    }

    pub fn hand_tricks_won(&self) -> u32 {
        self.players.iter().map(|p| u32::from(p.tricks_won())).sum()
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn add_to_score(&mut self, delta: i32) {
        self.score += delta;
    }

    /// Bags carried toward the next 10-bag penalty.
    pub fn running_bags(&self) -> u32 {
        self.running_bags
    }

    /// Every bag taken this game, unaffected by penalties.
    pub fn game_bags(&self) -> u32 {
        self.game_bags
    }

    pub fn add_bags(&mut self, bags: u32) {
        self.running_bags += bags;
        self.game_bags += bags;
    }

    pub fn remove_running_bags(&mut self, bags: u32) {
        self.running_bags = self.running_bags.saturating_sub(bags);
    }

    pub fn won_game(&self) -> bool {
        self.won_game
    }

    pub fn mark_won_game(&mut self) {
        self.won_game = true;
        for player in &mut self.players {
            player.mark_won_game();
        }
    }

    pub fn reset_hand(&mut self) {
        for player in &mut self.players {
            player.reset_hand();
        }
    }
}

impl fmt::Display for Partnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} score {} bags {}: {}; {}",
            self.id, self.score, self.running_bags, self.players[0], self.players[1]
        )
    }
}

/// Both partnerships, addressable by seat. Lives for the whole game.
#[derive(Debug, Clone)]
pub struct PartnershipLedger {
    partnerships: [Partnership; 2],
}

impl PartnershipLedger {
    pub fn new() -> Self {
        Self {
            partnerships: PartnershipId::BOTH.map(Partnership::new),
        }
    }

    pub fn partnerships(&self) -> &[Partnership; 2] {
        &self.partnerships
    }

    pub fn partnerships_mut(&mut self) -> &mut [Partnership; 2] {
        &mut self.partnerships
    }

    pub fn partnership(&self, id: PartnershipId) -> &Partnership {
        &self.partnerships[id.index()]
    }

    pub fn partnership_mut(&mut self, id: PartnershipId) -> &mut Partnership {
        &mut self.partnerships[id.index()]
    }

    // Each partnership stores its lower seat first, so `seat / 2` is the slot.
    pub fn player(&self, seat: Seat) -> &Player {
        &self.partnership(seat.partnership()).players[seat.index() / 2]
    }

    pub fn player_mut(&mut self, seat: Seat) -> &mut Player {
        &mut self.partnership_mut(seat.partnership()).players[seat.index() / 2]
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.partnerships.iter().flat_map(|p| p.players.iter())
    }

    pub fn scores(&self) -> [i32; 2] {
        self.partnerships.each_ref().map(Partnership::score)
    }

    pub fn winner(&self) -> Option<PartnershipId> {
        self.partnerships
            .iter()
            .find(|p| p.won_game())
            .map(Partnership::id)
    }

    pub fn reset_hand(&mut self) {
        for partnership in &mut self.partnerships {
            partnership.reset_hand();
        }
    }
}

impl Default for PartnershipLedger {
    fn default() -> Self {
        Self::new()
    }
}
