//! Durable-counter reads and writes as effects.
//!
//! The effects run against a [`StoreEnv`], so tests swap the store without
//! touching the game logic. The typed accessors at the bottom never fail:
//! storage problems are logged and reads fall back to 0.

use super::store::{CounterKey, CounterStore, StoreError};
use crate::core::{DurableCounters, PersistenceIntent};
use std::sync::Arc;
use stillwater::effect::{BoxedEffect, Effect};
use stillwater::prelude::*;

/// Environment the persistence effects run in.
#[derive(Clone)]
pub struct StoreEnv {
    store: Arc<dyn CounterStore>,
}

impl StoreEnv {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn CounterStore {
        self.store.as_ref()
    }
}

/// Read one counter; a missing key reads as 0.
pub fn read_counter(
    key: CounterKey,
) -> impl Effect<Output = u32, Error = StoreError, Env = StoreEnv> {
    from_fn(move |env: &StoreEnv| -> Result<u32, StoreError> {
        Ok(env.store.read(key)?.unwrap_or(0))
    })
}

/// Overwrite one counter.
pub fn write_counter(
    key: CounterKey,
    value: u32,
) -> impl Effect<Output = (), Error = StoreError, Env = StoreEnv> {
    from_fn(move |env: &StoreEnv| -> Result<(), StoreError> { env.store.write(key, value) })
}

/// The write an intent stands for, or `None` for a load.
pub fn intent_write(intent: PersistenceIntent) -> Option<BoxedEffect<(), StoreError, StoreEnv>> {
    let (key, value) = match intent {
        PersistenceIntent::LoadCounters => return None,
        PersistenceIntent::SetHighScore(value) => (CounterKey::HighScore, value),
        PersistenceIntent::SetBestStreak(value) => (CounterKey::BestStreak, value),
        PersistenceIntent::SetTotalPhotos(value) => (CounterKey::TotalPhotos, value),
    };
    Some(write_counter(key, value).boxed())
}

async fn read_or_zero(key: CounterKey, env: &StoreEnv) -> u32 {
    match read_counter(key).run(env).await {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(key = key.as_str(), %error, "failed to read counter, using 0");
            0
        }
    }
}

async fn write_or_log(key: CounterKey, value: u32, env: &StoreEnv) {
    if let Err(error) = write_counter(key, value).run(env).await {
        tracing::warn!(key = key.as_str(), value, %error, "failed to save counter");
    }
}

pub async fn get_high_score(env: &StoreEnv) -> u32 {
    read_or_zero(CounterKey::HighScore, env).await
}

pub async fn set_high_score(env: &StoreEnv, score: u32) {
    write_or_log(CounterKey::HighScore, score, env).await
}

pub async fn get_best_streak(env: &StoreEnv) -> u32 {
    read_or_zero(CounterKey::BestStreak, env).await
}

pub async fn set_best_streak(env: &StoreEnv, streak: u32) {
    write_or_log(CounterKey::BestStreak, streak, env).await
}

pub async fn get_total_photos(env: &StoreEnv) -> u32 {
    read_or_zero(CounterKey::TotalPhotos, env).await
}

pub async fn set_total_photos(env: &StoreEnv, count: u32) {
    write_or_log(CounterKey::TotalPhotos, count, env).await
}

/// Read all three counters.
pub async fn load_counters(env: &StoreEnv) -> DurableCounters {
    let (high_score, best_streak, total_photos) = tokio::join!(
        get_high_score(env),
        get_best_streak(env),
        get_total_photos(env)
    );
    DurableCounters {
        high_score,
        best_streak,
        total_photos,
    }
}
