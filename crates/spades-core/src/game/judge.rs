//! Trick resolution and scoring rules.
//!
//! These functions are pure apart from the partnership ledger they are handed:
//! `judge_hand` moves bags and `judge_game` sets the won-game flags.

use crate::model::card::Card;
use crate::model::partnership::Partnership;
use crate::model::player::{PartnershipId, Player};
use crate::model::suit::Suit;

/// Added to a spade's rank so any spade outranks any other card.
pub const TRUMP_BONUS: u8 = 13;
pub const NIL_BONUS: i32 = 100;
pub const BAG_LIMIT: u32 = 10;
pub const BAG_PENALTY: i32 = 100;
/// A partnership must score strictly more than this to win.
pub const WINNING_SCORE: i32 = 500;

pub fn card_strength(card: Card) -> u8 {
    if card.is_trump() {
        card.rank.value() + TRUMP_BONUS
    } else {
        card.rank.value()
    }
}

/// Returns the position of the winning card among `cards` (in play order).
///
/// Only spades and cards of the `lead` suit can win. `None` when no card is
/// eligible, which cannot happen for a trick whose first card set `lead`.
pub fn judge_trick(cards: &[Card], lead: Suit) -> Option<usize> {
    cards
        .iter()
        .enumerate()
        .filter(|(_, card)| card.is_trump() || card.suit == lead)
        .max_by_key(|(_, card)| card_strength(**card))
        .map(|(position, _)| position)
}

/// +100 when a nil bidder took no tricks, -100 otherwise.
pub fn judge_nil(player: &Player) -> i32 {
    if player.tricks_won() > 0 {
        -NIL_BONUS
    } else {
        NIL_BONUS
    }
}

/// Score delta for one completed hand. Updates the partnership's bag counters
/// but not its score.
pub fn judge_hand(partnership: &mut Partnership) -> i32 {
    let bid = partnership.hand_bid();
    let won = partnership.hand_tricks_won();

    let mut score: i32 = partnership
        .players()
        .iter()
        .filter(|p| p.is_nil())
        .map(judge_nil)
        .sum();

    if won >= bid {
        let bags = won - bid;
        score += (bid * 10 + bags) as i32;
        partnership.add_bags(bags);
    } else {
        score -= (bid * 10) as i32;
    }

    // Applied at most once per hand even if the counter is past 20.
    if partnership.running_bags() >= BAG_LIMIT {
        partnership.remove_running_bags(BAG_LIMIT);
        score -= BAG_PENALTY;
    }

    score
}

/// Marks the winner once either score exceeds [`WINNING_SCORE`].
///
/// The partnership with the strictly higher score wins; equal scores leave the
/// game undecided.
pub fn judge_game(first: &mut Partnership, second: &mut Partnership) -> Option<PartnershipId> {
    if first.score() <= WINNING_SCORE && second.score() <= WINNING_SCORE {
        return None;
    }

    let winner = match first.score().cmp(&second.score()) {
        core::cmp::Ordering::Greater => first,
        core::cmp::Ordering::Less => second,
        core::cmp::Ordering::Equal => return None,
    };
    winner.mark_won_game();
    Some(winner.id())
}
