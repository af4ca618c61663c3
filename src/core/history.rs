//! Completed-round history.
//!
//! Every locked-in round appends exactly one entry. Entries are never
//! modified or removed for the lifetime of a session.

use super::photo::Photo;
use super::score::Multiplier;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Record of a single completed round.
///
/// # Example
///
/// ```rust
/// use when_was_this::core::{Multiplier, Photo, PhotoHistoryEntry};
/// use chrono::Utc;
///
/// let entry = PhotoHistoryEntry {
///     photo: Photo::new("earthrise", "earthrise.jpg", 1968, "Earthrise"),
///     user_guess: 1970,
///     points_earned: 4800,
///     multiplier: Multiplier::Base,
///     streak: 1,
///     recorded_at: Utc::now(),
/// };
/// assert_eq!(entry.photo.year, 1968);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoHistoryEntry {
    pub photo: Photo,
    pub user_guess: i32,
    pub points_earned: u32,
    pub multiplier: Multiplier,
    /// Streak after the round resolved
    pub streak: u32,
    pub recorded_at: DateTime<Utc>,
}

/// Ordered log of completed rounds, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundHistory {
    entries: Vec<PhotoHistoryEntry>,
}

impl RoundHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a completed round.
    pub(crate) fn record(&mut self, entry: PhotoHistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PhotoHistoryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[PhotoHistoryEntry] {
        &self.entries
    }

    /// Sum of points over every recorded round.
    pub fn total_points(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.points_earned))
            .sum()
    }

    /// Play time from the first lock-in to the latest one.
    pub fn elapsed(&self) -> Option<Duration> {
        let first = self.entries.first()?;
        let last = self.entries.last()?;
        Some(last.recorded_at - first.recorded_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(year: i32, guess: i32, points: u32, at: DateTime<Utc>) -> PhotoHistoryEntry {
        PhotoHistoryEntry {
            photo: Photo::new(format!("p{year}"), format!("p{year}.jpg"), year, "test"),
            user_guess: guess,
            points_earned: points,
            multiplier: Multiplier::Base,
            streak: 1,
            recorded_at: at,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = RoundHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.total_points(), 0);
        assert!(history.elapsed().is_none());
    }

    #[test]
    fn record_appends_in_order() {
        let mut history = RoundHistory::new();
        let now = Utc::now();
        history.record(entry(1936, 1940, 4600, now));
        history.record(entry(1968, 1968, 5000, now));

        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0).unwrap().photo.year, 1936);
        assert_eq!(history.get(1).unwrap().photo.year, 1968);
        assert!(history.get(2).is_none());
        assert_eq!(history.total_points(), 9600);
    }

    #[test]
    fn elapsed_spans_first_to_last() {
        let mut history = RoundHistory::new();
        let start = Utc::now();
        history.record(entry(1936, 1936, 5000, start));
        history.record(entry(1945, 1945, 5000, start + Duration::seconds(42)));
        history.record(entry(1968, 1970, 4800, start + Duration::seconds(90)));

        assert_eq!(history.elapsed(), Some(Duration::seconds(90)));
    }

    #[test]
    fn single_round_has_no_elapsed_time() {
        let mut history = RoundHistory::new();
        history.record(entry(1936, 1936, 5000, Utc::now()));
        assert_eq!(history.elapsed(), Some(Duration::zero()));
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = RoundHistory::new();
        history.record(entry(1903, 1910, 4300, Utc::now()));

        let json = serde_json::to_string(&history).unwrap();
        assert!(json.contains("\"userGuess\":1910"));
        let deserialized: RoundHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(history, deserialized);
    }
}
