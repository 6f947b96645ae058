pub mod dealer;
pub mod game_state;
pub mod hand_state;
pub mod judge;
pub mod serialization;

pub use game_state::{GameError, SpadesGame, StepOutcome};
pub use hand_state::{ApplyOutcome, HandError, HandPhase, HandState};
