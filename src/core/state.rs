//! Round phase and display mode.
//!
//! A game has two independent pieces of state: where the live round is
//! (`RoundPhase`) and what the player is looking at (`DisplayMode`). Both are
//! plain values; the machine owns the transitions between them.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Common inspection methods for the machine's state values.
///
/// All methods are pure.
pub trait State: Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> {
    /// Name for display and logging.
    fn name(&self) -> &str;

    /// Whether player input is accepted in this state.
    fn accepts_input(&self) -> bool {
        false
    }
}

/// Where the live round stands.
///
/// `Guessing → Revealed` on lock-in, `Revealed → Guessing` when the next
/// photo is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// The guess slider is live
    #[default]
    Guessing,
    /// The guess is locked and the answer is shown
    Revealed,
}

impl State for RoundPhase {
    fn name(&self) -> &str {
        match self {
            Self::Guessing => "Guessing",
            Self::Revealed => "Revealed",
        }
    }

    fn accepts_input(&self) -> bool {
        matches!(self, Self::Guessing)
    }
}

impl RoundPhase {
    pub fn has_guessed(self) -> bool {
        matches!(self, Self::Revealed)
    }
}

/// What the player is looking at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// The live round
    #[default]
    Live,
    /// A completed round, by index into the history
    Historical(usize),
}

impl State for DisplayMode {
    fn name(&self) -> &str {
        match self {
            Self::Live => "Live",
            Self::Historical(_) => "Historical",
        }
    }

    fn accepts_input(&self) -> bool {
        matches!(self, Self::Live)
    }
}

impl DisplayMode {
    pub fn is_viewing_history(self) -> bool {
        matches!(self, Self::Historical(_))
    }

    pub fn history_index(self) -> Option<usize> {
        match self {
            Self::Live => None,
            Self::Historical(index) => Some(index),
        }
    }

    /// One step further back through `history_len` completed rounds.
    ///
    /// Returns `None` when there is nothing further back to show.
    pub fn step_back(self, history_len: usize) -> Option<Self> {
        match self {
            _ if history_len == 0 => None,
            Self::Live => Some(Self::Historical(history_len - 1)),
            Self::Historical(0) => None,
            Self::Historical(index) => Some(Self::Historical(index - 1)),
        }
    }
}
