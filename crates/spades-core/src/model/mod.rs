pub mod action;
pub mod card;
pub mod deck;
pub mod hand;
pub mod partnership;
pub mod player;
pub mod rank;
pub mod suit;
pub mod trick;
