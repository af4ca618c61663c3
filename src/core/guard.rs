//! Guard predicates for the game's transitions.
//!
//! Each guard is a pure function of the current state. The machine checks
//! them before mutating anything; a failed guard turns the operation into a
//! silent no-op.

use super::machine::GameState;
use super::state::State;

/// The slider can move: round not locked and the live photo is shown.
pub fn can_update_guess(state: &GameState) -> bool {
    state.phase.accepts_input() && state.display.accepts_input()
}

/// A guess can be locked in: round not locked and a photo exists.
pub fn can_lock_in(state: &GameState) -> bool {
    !state.phase.has_guessed() && !state.photos.is_empty()
}

/// The live round can move to the next photo.
pub fn can_advance(state: &GameState) -> bool {
    !state.display.is_viewing_history() && !state.photos.is_empty()
}

/// There is an older completed round to show.
pub fn can_step_back(state: &GameState) -> bool {
    state.display.step_back(state.history.len()).is_some()
}
