//! The game state machine.
//!
//! Per photo the machine moves `Guessing → Revealed → Guessing(next)`.
//! Independently the player can page back through completed rounds and
//! return to the live one. Operations that do not apply in the current state
//! are silent no-ops: they change nothing and queue nothing.
//!
//! The machine performs no I/O. Durable-counter reads and writes are queued
//! as [`PersistenceIntent`]s and state changes as [`GameEvent`]s; the caller
//! drains both after each operation.

use super::guard;
use super::history::{PhotoHistoryEntry, RoundHistory};
use super::outbox::{DurableCounters, GameEvent, Outbox, PersistenceIntent};
use super::photo::Photo;
use super::score::{calculate_score, RoundReveal, ScoreResult};
use super::state::{DisplayMode, RoundPhase};
use crate::settings::GameConfig;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Everything the machine tracks for one session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Play order, fixed once initialized
    pub photos: Vec<Photo>,
    pub current_photo_index: usize,
    pub current_guess: i32,
    pub phase: RoundPhase,
    pub session_score: u32,
    pub current_streak: u32,
    pub best_streak_this_session: u32,
    pub photos_completed: u32,
    pub history: RoundHistory,
    pub display: DisplayMode,
    /// Last known durable values; zero until the stored ones are loaded
    pub durable: DurableCounters,
    pub counters_loaded: bool,
    /// Streak held when the live round was locked in
    streak_before_lock: u32,
    /// Rounds completed while the durable counters were still loading
    rounds_before_load: u32,
    /// A `LoadCounters` intent has been queued
    load_requested: bool,
}

impl GameState {
    pub(crate) fn new(config: &GameConfig) -> Self {
        Self {
            photos: Vec::new(),
            current_photo_index: 0,
            current_guess: config.years.clamp(config.default_year),
            phase: RoundPhase::Guessing,
            session_score: 0,
            current_streak: 0,
            best_streak_this_session: 0,
            photos_completed: 0,
            history: RoundHistory::new(),
            display: DisplayMode::Live,
            durable: DurableCounters::default(),
            counters_loaded: false,
            streak_before_lock: 0,
            rounds_before_load: 0,
            load_requested: false,
        }
    }

    pub fn has_guessed(&self) -> bool {
        self.phase.has_guessed()
    }
}

/// Owns the game state and applies player actions to it.
///
/// # Example
///
/// ```rust
/// use when_was_this::core::{GameStateMachine, Photo, PersistenceIntent};
/// use when_was_this::settings::GameConfig;
///
/// let mut machine = GameStateMachine::new(GameConfig::default());
/// machine.initialize(vec![Photo::new("moon", "moon.jpg", 1969, "Apollo 11")]);
///
/// machine.update_guess(1970);
/// let score = machine.lock_in_guess().unwrap();
/// assert_eq!(score.total_points, 4900);
/// assert_eq!(machine.state().session_score, 4900);
///
/// let intents = machine.take_intents();
/// assert_eq!(intents[0], PersistenceIntent::LoadCounters);
/// assert!(intents.contains(&PersistenceIntent::SetTotalPhotos(1)));
/// ```
#[derive(Clone, Debug)]
pub struct GameStateMachine {
    config: GameConfig,
    state: GameState,
    outbox: Outbox,
}

impl GameStateMachine {
    /// Create a machine with no photos.
    ///
    /// Call [`initialize`](Self::initialize) once the photo set is known.
    pub fn new(config: GameConfig) -> Self {
        let state = GameState::new(&config);
        Self {
            config,
            state,
            outbox: Outbox::default(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.state.display
    }

    pub fn history(&self) -> &RoundHistory {
        &self.state.history
    }

    pub fn durable_counters(&self) -> DurableCounters {
        self.state.durable
    }

    /// Start a session over `photos`, already in play order.
    ///
    /// All session values reset. The durable counters mirror the store and
    /// carry over, along with any rounds still waiting on the counter load.
    /// The first call queues `LoadCounters`; the durable counters read 0
    /// until [`apply_loaded_counters`](Self::apply_loaded_counters) delivers
    /// the stored values.
    pub fn initialize(&mut self, photos: Vec<Photo>) {
        let photo_count = photos.len();
        let previous = std::mem::replace(&mut self.state, GameState::new(&self.config));
        let state = &mut self.state;
        state.photos = photos;
        state.durable = previous.durable;
        state.counters_loaded = previous.counters_loaded;
        state.rounds_before_load = previous.rounds_before_load;
        state.load_requested = previous.load_requested;

        if !state.load_requested {
            state.load_requested = true;
            self.outbox.intent(PersistenceIntent::LoadCounters);
        }
        self.outbox.event(GameEvent::Initialized { photo_count });
    }

    /// Merge counters read from the store into the session.
    ///
    /// Rounds completed before the load resolved have already written
    /// counters computed from zero, so records take the larger value, the
    /// photo total adds those rounds, and corrected values are queued for
    /// writing. Ignored if counters are already loaded.
    pub fn apply_loaded_counters(&mut self, loaded: DurableCounters) -> bool {
        if self.state.counters_loaded {
            return false;
        }

        let earned = self.state.durable;
        let pending_rounds = self.state.rounds_before_load;
        let merged = DurableCounters {
            high_score: loaded.high_score.max(earned.high_score),
            best_streak: loaded.best_streak.max(earned.best_streak),
            total_photos: loaded.total_photos.saturating_add(pending_rounds),
        };

        if pending_rounds > 0 {
            if merged.high_score != earned.high_score {
                self.outbox
                    .intent(PersistenceIntent::SetHighScore(merged.high_score));
            }
            if merged.best_streak != earned.best_streak {
                self.outbox
                    .intent(PersistenceIntent::SetBestStreak(merged.best_streak));
            }
            if merged.total_photos != earned.total_photos {
                self.outbox
                    .intent(PersistenceIntent::SetTotalPhotos(merged.total_photos));
            }
        }

        self.state.durable = merged;
        self.state.counters_loaded = true;
        self.state.rounds_before_load = 0;
        self.outbox
            .event(GameEvent::CountersLoaded { counters: merged });
        true
    }

    /// Move the guess slider. The year is clamped to the configured range.
    pub fn update_guess(&mut self, year: i32) -> bool {
        if !guard::can_update_guess(&self.state) {
            return false;
        }

        let year = self.config.years.clamp(year);
        if year != self.state.current_guess {
            self.state.current_guess = year;
            self.outbox.event(GameEvent::GuessUpdated { year });
        }
        true
    }

    /// Move the guess slider to a track position in `0.0..=1.0`.
    pub fn update_guess_at(&mut self, fraction: f64) -> bool {
        let year = self.config.years.year_at(fraction);
        self.update_guess(year)
    }

    /// Lock in the current guess and score the round.
    ///
    /// Returns `None` if the round is already locked or there are no photos.
    pub fn lock_in_guess(&mut self) -> Option<ScoreResult> {
        if !guard::can_lock_in(&self.state) {
            return None;
        }
        let photo = self.state.photos.get(self.state.current_photo_index)?.clone();

        let streak_before = self.state.current_streak;
        let score = calculate_score(
            self.state.current_guess,
            photo.year,
            streak_before,
            &self.config.rules,
        );

        let state = &mut self.state;
        state.phase = RoundPhase::Revealed;
        state.streak_before_lock = streak_before;
        state.session_score = state.session_score.saturating_add(score.total_points);
        state.current_streak = if score.streak_broken {
            0
        } else {
            streak_before.saturating_add(1)
        };
        state.best_streak_this_session = state.best_streak_this_session.max(state.current_streak);
        state.photos_completed = state.photos_completed.saturating_add(1);
        state.history.record(PhotoHistoryEntry {
            photo,
            user_guess: state.current_guess,
            points_earned: score.total_points,
            multiplier: score.multiplier,
            streak: state.current_streak,
            recorded_at: Utc::now(),
        });

        self.queue_record_updates();
        self.outbox.event(GameEvent::GuessLocked {
            score,
            streak: self.state.current_streak,
        });
        Some(score)
    }

    fn queue_record_updates(&mut self) {
        let state = &mut self.state;

        if state.session_score > state.durable.high_score {
            state.durable.high_score = state.session_score;
            self.outbox
                .intent(PersistenceIntent::SetHighScore(state.session_score));
        }

        if state.best_streak_this_session > state.durable.best_streak {
            state.durable.best_streak = state.best_streak_this_session;
            self.outbox
                .intent(PersistenceIntent::SetBestStreak(state.best_streak_this_session));
        }

        state.durable.total_photos = state.durable.total_photos.saturating_add(1);
        self.outbox
            .intent(PersistenceIntent::SetTotalPhotos(state.durable.total_photos));

        if !state.counters_loaded {
            state.rounds_before_load += 1;
        }
    }

    /// Show the next photo, wrapping to the first after the last.
    ///
    /// Ignored while viewing history.
    pub fn next_photo(&mut self) -> bool {
        if !guard::can_advance(&self.state) {
            return false;
        }

        let state = &mut self.state;
        state.current_photo_index = (state.current_photo_index + 1) % state.photos.len();
        state.current_guess = self.config.years.clamp(self.config.default_year);
        state.phase = RoundPhase::Guessing;
        self.outbox.event(GameEvent::PhotoAdvanced {
            index: self.state.current_photo_index,
        });
        true
    }

    /// Page one round further back through the history.
    pub fn view_previous_photo(&mut self) -> bool {
        let Some(mode) = self.state.display.step_back(self.state.history.len()) else {
            return false;
        };
        debug_assert!(guard::can_step_back(&self.state));

        self.state.display = mode;
        self.outbox.event(GameEvent::DisplayChanged { mode });
        true
    }

    /// Go back to the live round.
    pub fn return_to_current(&mut self) {
        if self.state.display != DisplayMode::Live {
            self.state.display = DisplayMode::Live;
            self.outbox.event(GameEvent::DisplayChanged {
                mode: DisplayMode::Live,
            });
        }
    }

    /// The live round's photo.
    pub fn current_photo(&self) -> Option<&Photo> {
        self.state.photos.get(self.state.current_photo_index)
    }

    /// The history entry being viewed, if not on the live round.
    pub fn display_photo(&self) -> Option<&PhotoHistoryEntry> {
        self.state
            .display
            .history_index()
            .and_then(|index| self.state.history.get(index))
    }

    /// Score of the live round once it is locked in.
    ///
    /// Recomputed from the locked guess and the streak held *before* the
    /// lock-in, so it matches what [`lock_in_guess`](Self::lock_in_guess)
    /// returned. Scoring with the updated streak instead would report the
    /// next round's multiplier.
    pub fn last_score(&self) -> Option<ScoreResult> {
        if !self.state.has_guessed() {
            return None;
        }
        let photo = self.current_photo()?;
        Some(calculate_score(
            self.state.current_guess,
            photo.year,
            self.state.streak_before_lock,
            &self.config.rules,
        ))
    }

    /// Reveal details for whatever is on screen: the viewed history entry,
    /// or the live round once locked in.
    pub fn reveal(&self) -> Option<RoundReveal> {
        let rules = &self.config.rules;
        if let Some(entry) = self.display_photo() {
            return Some(RoundReveal::new(
                entry.photo.year,
                entry.user_guess,
                entry.points_earned,
                entry.multiplier,
                entry.streak,
                rules,
            ));
        }
        if self.state.display.is_viewing_history() {
            return None;
        }

        let score = self.last_score()?;
        let photo = self.current_photo()?;
        Some(RoundReveal::new(
            photo.year,
            self.state.current_guess,
            score.total_points,
            score.multiplier,
            self.state.current_streak,
            rules,
        ))
    }

    /// Drain queued persistence intents.
    pub fn take_intents(&mut self) -> Vec<PersistenceIntent> {
        self.outbox.take_intents()
    }

    /// Drain queued game events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.outbox.take_events()
    }
}
