//! Play Session
//!
//! This example plays a short scripted game against the bundled catalog.
//!
//! Key concepts:
//! - Layered configuration from an optional TOML file and the environment
//! - A session whose counter writes run on a background executor
//! - Subscribing to game events
//! - Paging back through history and returning to the live round
//!
//! Run with: cargo run --example play_session [config.toml]
//!
//! Counters are kept in `target/play_session/counters.json`, so the high
//! score carries over between runs. Set `RUST_LOG=debug` for executor logs.

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use when_was_this::core::GameEvent;
use when_was_this::effects::{GameSession, JsonFileStore, SessionStatus};
use when_was_this::settings::GameConfig;
use when_was_this::source::{CatalogSource, PhotoSource};

// Offsets from the true year for each scripted guess
const GUESS_OFFSETS: [i32; 5] = [2, -4, 0, 11, -30];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let mut config = GameConfig::load(config_path.as_deref())?;
    if config_path.is_none() {
        config.source.use_local_data = true;
    }

    let source = CatalogSource::new(&config);
    let store = Arc::new(JsonFileStore::new("target/play_session/counters.json"));
    let mut session = GameSession::new(config, store);

    let mut events = session.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let GameEvent::CountersLoaded { counters } = event {
                println!(
                    "  records: high score {}, best streak {}, {} photos played",
                    counters.high_score, counters.best_streak, counters.total_photos
                );
            }
        }
    });

    session.load_photos(&source).await;
    if let SessionStatus::Failed(reason) = session.status() {
        return Err(reason.clone().into());
    }
    session.wait_for_counters().await;

    for offset in GUESS_OFFSETS {
        let Some(photo) = session.current_photo().cloned() else {
            break;
        };
        println!("\n{} ({})", photo.description, source.image_uri_for(&photo.filename));

        session.update_guess(photo.year + offset);
        if let Some(score) = session.lock_in_guess() {
            let reveal = session.reveal().ok_or("round not revealed")?;
            println!(
                "  guessed {}, actually {}: {} points{}",
                reveal.user_guess,
                reveal.correct_year,
                score.total_points,
                reveal
                    .multiplier_badge()
                    .map(|badge| format!(" ({badge})"))
                    .unwrap_or_default()
            );
            println!("  streak {}", reveal.streak);
        }
        session.next_photo();
    }

    println!("\nLooking back:");
    while session.view_previous_photo() {
        if let Some(reveal) = session.reveal() {
            println!(
                "  {} guessed for {}: {} points",
                reveal.user_guess, reveal.correct_year, reveal.points_earned
            );
        }
    }
    session.return_to_current();

    let state = session.machine().state();
    println!(
        "\nSession score {} over {} photos, best streak {}",
        state.session_score, state.photos_completed, state.best_streak_this_session
    );
    if let Some(elapsed) = state.history.elapsed() {
        println!("Played for {} ms", elapsed.num_milliseconds());
    }

    session.shutdown().await;
    printer.await?;
    Ok(())
}
