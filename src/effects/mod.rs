//! The imperative shell around the pure game core.
//!
//! # Key Concepts
//!
//! - **Store**: the durable counters behind the [`CounterStore`] trait
//! - **Persistence effects**: stillwater effects that read and write
//!   counters against a [`StoreEnv`]
//! - **Executor**: a background task applying the machine's persistence
//!   intents in order, logging and dropping failures
//! - **Session**: the single owner of the machine, forwarding intents and
//!   broadcasting game events
//!
//! Following Stillwater 0.11.0 conventions, effect constructors return
//! `impl Effect` and collections of effects hold `BoxedEffect`.

mod executor;
pub mod persistence;
mod session;
mod store;

pub use executor::spawn_executor;
pub use persistence::StoreEnv;
pub use session::{GameSession, SessionStatus, EVENT_CAPACITY};
pub use store::{CounterKey, CounterStore, JsonFileStore, MemoryStore, StoreError};
