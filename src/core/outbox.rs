//! Outputs the machine queues instead of performing I/O.
//!
//! Persistence intents describe durable-counter reads and writes for the
//! shell to carry out. Game events describe what changed so observers can
//! redraw.

use super::score::ScoreResult;
use super::state::DisplayMode;
use serde::{Deserialize, Serialize};

/// Counters that survive restarts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurableCounters {
    pub high_score: u32,
    pub best_streak: u32,
    pub total_photos: u32,
}

/// A request to the counter store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersistenceIntent {
    /// Read all three counters and report them back
    LoadCounters,
    SetHighScore(u32),
    SetBestStreak(u32),
    SetTotalPhotos(u32),
}

/// Something observers may want to redraw for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    Initialized { photo_count: usize },
    GuessUpdated { year: i32 },
    GuessLocked { score: ScoreResult, streak: u32 },
    PhotoAdvanced { index: usize },
    DisplayChanged { mode: DisplayMode },
    CountersLoaded { counters: DurableCounters },
}

/// Pending intents and events, drained by the shell after each operation.
#[derive(Clone, Debug, Default)]
pub struct Outbox {
    intents: Vec<PersistenceIntent>,
    events: Vec<GameEvent>,
}

impl Outbox {
    pub(crate) fn intent(&mut self, intent: PersistenceIntent) {
        self.intents.push(intent);
    }

    pub(crate) fn event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn take_intents(&mut self) -> Vec<PersistenceIntent> {
        std::mem::take(&mut self.intents)
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty() && self.events.is_empty()
    }
}
