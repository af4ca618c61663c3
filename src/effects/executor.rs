//! Background task that applies persistence intents.
//!
//! Intents are processed one at a time in the order they were queued, so a
//! counter load always reads the store before any write queued after it.
//! Write failures are logged and dropped; nothing is retried.

use super::persistence::{intent_write, load_counters, StoreEnv};
use crate::core::{DurableCounters, PersistenceIntent};
use stillwater::effect::Effect;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Spawn the executor on the current tokio runtime.
///
/// Loaded counters are sent on `loaded`. The task ends once every sender
/// of `intents` is dropped and the queue is drained.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn spawn_executor(
    env: StoreEnv,
    intents: mpsc::UnboundedReceiver<PersistenceIntent>,
    loaded: mpsc::UnboundedSender<DurableCounters>,
) -> JoinHandle<()> {
    tokio::spawn(run_executor(env, intents, loaded))
}

async fn run_executor(
    env: StoreEnv,
    mut intents: mpsc::UnboundedReceiver<PersistenceIntent>,
    loaded: mpsc::UnboundedSender<DurableCounters>,
) {
    while let Some(intent) = intents.recv().await {
        apply_intent(&env, intent, &loaded).await;
    }
    tracing::debug!("persistence executor drained");
}

async fn apply_intent(
    env: &StoreEnv,
    intent: PersistenceIntent,
    loaded: &mpsc::UnboundedSender<DurableCounters>,
) {
    let Some(write) = intent_write(intent) else {
        let counters = load_counters(env).await;
        tracing::debug!(?counters, "loaded durable counters");
        if loaded.send(counters).is_err() {
            tracing::debug!("session closed before counters loaded");
        }
        return;
    };

    match write.run(env).await {
        Ok(()) => tracing::debug!(?intent, "saved counter"),
        Err(error) => tracing::warn!(?intent, %error, "failed to save counter"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::store::{CounterKey, CounterStore, MemoryStore, StoreError};
    use std::sync::Arc;

    struct ReadOnlyStore(MemoryStore);

    impl CounterStore for ReadOnlyStore {
        fn read(&self, key: CounterKey) -> Result<Option<u32>, StoreError> {
            self.0.read(key)
        }

        fn write(&self, _key: CounterKey, _value: u32) -> Result<(), StoreError> {
            Err(std::io::Error::other("read-only").into())
        }
    }

    #[tokio::test]
    async fn applies_intents_in_order() {
        let store = Arc::new(MemoryStore::new());
        store.write(CounterKey::TotalPhotos, 10).unwrap();

        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        let (loaded_tx, mut loaded_rx) = mpsc::unbounded_channel();
        let handle = spawn_executor(StoreEnv::new(store.clone()), intent_rx, loaded_tx);

        intent_tx.send(PersistenceIntent::LoadCounters).unwrap();
        intent_tx.send(PersistenceIntent::SetTotalPhotos(11)).unwrap();
        intent_tx.send(PersistenceIntent::SetHighScore(5000)).unwrap();
        drop(intent_tx);
        handle.await.unwrap();

        let loaded = loaded_rx.recv().await.unwrap();
        assert_eq!(loaded.total_photos, 10);
        assert_eq!(store.read(CounterKey::TotalPhotos).unwrap(), Some(11));
        assert_eq!(store.read(CounterKey::HighScore).unwrap(), Some(5000));
    }

    #[tokio::test]
    async fn failed_writes_do_not_stop_the_executor() {
        let inner = MemoryStore::new();
        inner.write(CounterKey::BestStreak, 3).unwrap();
        let store = Arc::new(ReadOnlyStore(inner));

        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        let (loaded_tx, mut loaded_rx) = mpsc::unbounded_channel();
        let handle = spawn_executor(StoreEnv::new(store), intent_rx, loaded_tx);

        intent_tx.send(PersistenceIntent::SetBestStreak(9)).unwrap();
        intent_tx.send(PersistenceIntent::LoadCounters).unwrap();
        drop(intent_tx);
        handle.await.unwrap();

        assert_eq!(loaded_rx.recv().await.unwrap().best_streak, 3);
    }
}
