use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use spades_core::game::{GameError, SpadesGame};
use spades_core::model::action::Action;
use spades_core::model::player::{PartnershipId, Seat};

const HAND_CAP: u32 = 40;

/// Plays `seed` with uniformly random legal actions until the game ends or
/// the hand cap is hit. Returns the per-hand score deltas observed.
fn play_random(seed: u64) -> (SpadesGame, Vec<[i32; 2]>) {
    let mut game = SpadesGame::with_seed(seed).expect("game deals");
    let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    let mut deltas = Vec::new();

    while !game.is_over() && game.hands_played() < HAND_CAP {
        let legal = game.legal_actions();
        let action = *legal.choose(&mut rng).expect("a legal action is always available");
        let outcome = game.step(action).expect("legal action applies");
        if let Some(scores) = outcome.hand_scores {
            deltas.push(scores);
        }
    }

    (game, deltas)
}

#[test]
fn scores_are_the_sum_of_hand_deltas() {
    for seed in 0..6 {
        let (game, deltas) = play_random(seed);
        assert_eq!(deltas.len() as u32, game.hands_played());
        let totals = deltas.iter().fold([0, 0], |acc, d| [acc[0] + d[0], acc[1] + d[1]]);
        assert_eq!(game.scores(), totals, "seed {seed}");
    }
}

#[test]
fn game_bags_cover_running_bags() {
    for seed in 10..16 {
        let (game, _) = play_random(seed);
        for id in PartnershipId::BOTH {
            let partnership = game.partnership(id);
            assert!(partnership.game_bags() >= partnership.running_bags());
        }
    }
}

#[test]
fn finished_games_latch_the_winner() {
    for seed in 0..12 {
        let (mut game, _) = play_random(seed);
        if !game.is_over() {
            continue;
        }
        let winner = game.winner().expect("winner recorded");
        let [ns, ew] = game.scores();
        assert!(ns.max(ew) > 500);
        let (won, lost) = match winner {
            PartnershipId::NorthSouth => (ns, ew),
            PartnershipId::EastWest => (ew, ns),
        };
        assert!(won > lost);
        for seat in winner.seats() {
            assert!(game.state(seat).game_is_over);
        }
        assert!(matches!(
            game.step(Action::Bid(1)),
            Err(GameError::GameOver)
        ));
    }
}

#[test]
fn each_seat_sees_only_its_own_cards() {
    let (game, _) = play_random(77);
    let mut seen = std::collections::HashSet::new();
    for seat in Seat::LOOP {
        let view = game.state(seat);
        assert_eq!(view.seat, seat);
        for card in view.hand {
            assert!(seen.insert(card), "card held by two seats");
        }
    }
}
