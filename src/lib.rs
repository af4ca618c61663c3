//! When Was This: a photo year-guessing game engine
//!
//! The game is built on Stillwater's "pure core, imperative shell" philosophy.
//! The round state machine and scoring are pure functions with no side
//! effects. Persistence of durable counters is expressed as intents that the
//! shell applies through Effect-based store access.
//!
//! # Core Concepts
//!
//! - **Scoring**: points from the year difference, boosted by a streak
//!   multiplier
//! - **State machine**: `Guessing → Revealed → Guessing(next)` per photo, with
//!   history browsing on the side
//! - **Intents**: counter reads and writes queued by the machine and applied
//!   by a background executor
//! - **Sources**: the photo catalog, fetched remotely with a bundled fallback
//!
//! # Example
//!
//! ```rust
//! use when_was_this::core::{calculate_score, GameStateMachine, Multiplier, Photo};
//! use when_was_this::settings::{GameConfig, ScoringRules};
//!
//! let score = calculate_score(1969, 1969, 2, &ScoringRules::default());
//! assert_eq!(score.base_points, 5000);
//! assert_eq!(score.multiplier, Multiplier::Warm);
//! assert_eq!(score.total_points, 6000);
//!
//! let mut machine = GameStateMachine::new(GameConfig::default());
//! machine.initialize(vec![
//!     Photo::new("flyer", "wright-flyer.jpg", 1903, "First flight"),
//!     Photo::new("earthrise", "earthrise.jpg", 1968, "Earthrise"),
//! ]);
//!
//! machine.update_guess(1900);
//! machine.lock_in_guess();
//! machine.next_photo();
//! assert_eq!(machine.current_photo().unwrap().id, "earthrise");
//! assert_eq!(machine.state().photos_completed, 1);
//! ```

pub mod core;
pub mod effects;
pub mod settings;
pub mod source;

// Re-export commonly used types
pub use core::{
    calculate_score, DisplayMode, GameStateMachine, Multiplier, Photo, RoundPhase, ScoreResult,
};
pub use effects::{GameSession, SessionStatus};
pub use settings::GameConfig;
pub use source::{CatalogSource, PhotoSource};
