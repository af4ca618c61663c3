//! A running game session.
//!
//! `GameSession` is the single owner of the state machine. After every
//! operation it forwards queued persistence intents to the executor task
//! and broadcasts queued game events to subscribers.

use super::executor::spawn_executor;
use super::persistence::StoreEnv;
use super::store::CounterStore;
use crate::core::{
    DurableCounters, GameEvent, GameStateMachine, Photo, PersistenceIntent, RoundReveal,
    ScoreResult, State,
};
use crate::settings::GameConfig;
use crate::source::PhotoSource;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Capacity of the game event broadcast channel.
///
/// A subscriber that falls further behind skips ahead and sees
/// [`broadcast::error::RecvError::Lagged`].
pub const EVENT_CAPACITY: usize = 64;

/// Whether the session has photos to play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Ready,
    Failed(String),
}

/// A game session wired to a counter store.
pub struct GameSession {
    id: Uuid,
    machine: GameStateMachine,
    status: SessionStatus,
    intents: mpsc::UnboundedSender<PersistenceIntent>,
    loaded: mpsc::UnboundedReceiver<DurableCounters>,
    events: broadcast::Sender<GameEvent>,
    executor: JoinHandle<()>,
}

impl GameSession {
    /// Start a session with no photos and spawn its persistence executor.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new(config: GameConfig, store: Arc<dyn CounterStore>) -> Self {
        let (intents, intent_rx) = mpsc::unbounded_channel();
        let (loaded_tx, loaded) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let executor = spawn_executor(StoreEnv::new(store), intent_rx, loaded_tx);

        let id = Uuid::new_v4();
        tracing::info!(session = %id, "game session started");

        Self {
            id,
            machine: GameStateMachine::new(config),
            status: SessionStatus::Loading,
            intents,
            loaded,
            events,
            executor,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Read access to the machine and its state.
    pub fn machine(&self) -> &GameStateMachine {
        &self.machine
    }

    /// Receive every game event from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Load photos from `source` and start playing them.
    pub async fn load_photos(&mut self, source: &dyn PhotoSource) {
        self.status = SessionStatus::Loading;
        let photos = source.load_photos().await;
        self.initialize(photos);
    }

    /// Start a new round sequence over `photos`, already in play order.
    pub fn initialize(&mut self, photos: Vec<Photo>) {
        self.status = if photos.is_empty() {
            tracing::warn!(session = %self.id, "no photos available");
            SessionStatus::Failed("failed to load photos".to_string())
        } else {
            tracing::info!(session = %self.id, count = photos.len(), "photos ready");
            SessionStatus::Ready
        };
        self.pump();
        self.machine.initialize(photos);
        self.flush();
    }

    pub fn update_guess(&mut self, year: i32) -> bool {
        self.pump();
        let applied = self.machine.update_guess(year);
        self.flush();
        applied
    }

    pub fn update_guess_at(&mut self, fraction: f64) -> bool {
        self.pump();
        let applied = self.machine.update_guess_at(fraction);
        self.flush();
        applied
    }

    pub fn lock_in_guess(&mut self) -> Option<ScoreResult> {
        self.pump();
        let score = self.machine.lock_in_guess();
        if let Some(score) = &score {
            tracing::debug!(
                session = %self.id,
                points = score.total_points,
                streak = self.machine.state().current_streak,
                phase = self.machine.phase().name(),
                "guess locked"
            );
        }
        self.flush();
        score
    }

    pub fn next_photo(&mut self) -> bool {
        self.pump();
        let applied = self.machine.next_photo();
        self.flush();
        applied
    }

    pub fn view_previous_photo(&mut self) -> bool {
        self.pump();
        let applied = self.machine.view_previous_photo();
        self.flush();
        applied
    }

    pub fn return_to_current(&mut self) {
        self.pump();
        self.machine.return_to_current();
        self.flush();
    }

    pub fn current_photo(&self) -> Option<&Photo> {
        self.machine.current_photo()
    }

    pub fn reveal(&self) -> Option<RoundReveal> {
        self.machine.reveal()
    }

    /// Apply any counters the executor has finished loading.
    pub fn pump(&mut self) {
        while let Ok(counters) = self.loaded.try_recv() {
            self.machine.apply_loaded_counters(counters);
        }
        self.flush();
    }

    /// Wait until the stored counters are loaded and applied.
    pub async fn wait_for_counters(&mut self) -> DurableCounters {
        self.pump();
        while !self.machine.state().counters_loaded {
            match self.loaded.recv().await {
                Some(counters) => {
                    self.machine.apply_loaded_counters(counters);
                    self.flush();
                }
                None => break,
            }
        }
        self.machine.durable_counters()
    }

    fn flush(&mut self) {
        for intent in self.machine.take_intents() {
            if self.intents.send(intent).is_err() {
                tracing::warn!(session = %self.id, ?intent, "persistence executor gone, dropping intent");
            }
        }
        for event in self.machine.take_events() {
            // no subscribers is fine
            let _ = self.events.send(event);
        }
    }

    /// Stop the session after every queued intent has been applied.
    pub async fn shutdown(self) {
        let Self {
            id,
            intents,
            executor,
            ..
        } = self;
        drop(intents);
        if let Err(error) = executor.await {
            tracing::warn!(session = %id, %error, "persistence executor failed");
        }
        tracing::info!(session = %id, "game session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DisplayMode;
    use crate::effects::store::{CounterKey, MemoryStore};

    fn photos() -> Vec<Photo> {
        vec![
            Photo::new("flyer", "wright-flyer.jpg", 1903, "First powered flight"),
            Photo::new("skyscraper", "lunch-atop.jpg", 1932, "Lunch atop a Skyscraper"),
        ]
    }

    #[tokio::test]
    async fn empty_photo_set_marks_session_failed() {
        let mut session = GameSession::new(GameConfig::default(), Arc::new(MemoryStore::new()));
        assert_eq!(session.status(), &SessionStatus::Loading);

        session.initialize(Vec::new());
        assert_eq!(
            session.status(),
            &SessionStatus::Failed("failed to load photos".to_string())
        );
        assert!(session.lock_in_guess().is_none());
    }

    #[tokio::test]
    async fn counters_load_from_store() {
        let store = Arc::new(MemoryStore::new());
        store.write(CounterKey::HighScore, 12_000).unwrap();
        store.write(CounterKey::TotalPhotos, 30).unwrap();

        let mut session = GameSession::new(GameConfig::default(), store);
        session.initialize(photos());
        assert_eq!(session.status(), &SessionStatus::Ready);

        let counters = session.wait_for_counters().await;
        assert_eq!(counters.high_score, 12_000);
        assert_eq!(counters.best_streak, 0);
        assert_eq!(counters.total_photos, 30);
    }

    #[tokio::test]
    async fn rounds_are_persisted_on_shutdown() {
        let store = Arc::new(MemoryStore::new());
        let mut session = GameSession::new(GameConfig::default(), store.clone());
        session.initialize(photos());
        session.wait_for_counters().await;

        session.update_guess(1905);
        session.lock_in_guess().unwrap();
        session.next_photo();
        session.update_guess(1932);
        session.lock_in_guess().unwrap();
        session.shutdown().await;

        assert_eq!(store.read(CounterKey::HighScore).unwrap(), Some(9800));
        assert_eq!(store.read(CounterKey::BestStreak).unwrap(), Some(2));
        assert_eq!(store.read(CounterKey::TotalPhotos).unwrap(), Some(2));
    }

    #[tokio::test]
    async fn reinitializing_before_counters_load_keeps_records() {
        let store = Arc::new(MemoryStore::new());
        store.write(CounterKey::HighScore, 40_000).unwrap();
        store.write(CounterKey::TotalPhotos, 10).unwrap();

        let mut session = GameSession::new(GameConfig::default(), store.clone());
        session.initialize(photos());
        session.update_guess(1903);
        session.lock_in_guess().unwrap();
        session.initialize(photos());

        let counters = session.wait_for_counters().await;
        assert_eq!(counters.high_score, 40_000);
        assert_eq!(counters.best_streak, 1);
        assert_eq!(counters.total_photos, 11);
        session.shutdown().await;

        assert_eq!(store.read(CounterKey::HighScore).unwrap(), Some(40_000));
        assert_eq!(store.read(CounterKey::BestStreak).unwrap(), Some(1));
        assert_eq!(store.read(CounterKey::TotalPhotos).unwrap(), Some(11));
    }

    async fn next_game_event(events: &mut broadcast::Receiver<GameEvent>) -> GameEvent {
        loop {
            match events.recv().await.unwrap() {
                GameEvent::CountersLoaded { .. } => continue,
                event => return event,
            }
        }
    }

    #[tokio::test]
    async fn subscribers_see_events() {
        let mut session = GameSession::new(GameConfig::default(), Arc::new(MemoryStore::new()));
        let mut events = session.subscribe();

        session.initialize(photos());
        session.update_guess(1910);
        session.lock_in_guess().unwrap();
        session.next_photo();
        session.view_previous_photo();

        assert_eq!(
            next_game_event(&mut events).await,
            GameEvent::Initialized { photo_count: 2 }
        );
        assert_eq!(
            next_game_event(&mut events).await,
            GameEvent::GuessUpdated { year: 1910 }
        );
        assert!(matches!(
            next_game_event(&mut events).await,
            GameEvent::GuessLocked { streak: 1, .. }
        ));
        assert_eq!(
            next_game_event(&mut events).await,
            GameEvent::PhotoAdvanced { index: 1 }
        );
        assert_eq!(
            next_game_event(&mut events).await,
            GameEvent::DisplayChanged {
                mode: DisplayMode::Historical(0)
            }
        );
    }
}
