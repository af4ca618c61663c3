//! Core game types and logic.
//!
//! This module contains the pure part of the game:
//! - Photo records and the catalog document
//! - Round scoring
//! - The round/display state machine and its guards
//! - The completed-round history
//!
//! Nothing here performs I/O. The machine queues persistence intents and
//! game events for the shell in [`crate::effects`] to act on.

pub mod guard;
mod history;
mod machine;
mod outbox;
mod photo;
mod score;
mod state;

pub use history::{PhotoHistoryEntry, RoundHistory};
pub use machine::{GameState, GameStateMachine};
pub use outbox::{DurableCounters, GameEvent, Outbox, PersistenceIntent};
pub use photo::{Photo, PhotoSet};
pub use score::{calculate_score, year_difference, Multiplier, RoundReveal, ScoreResult};
pub use state::{DisplayMode, RoundPhase, State};
