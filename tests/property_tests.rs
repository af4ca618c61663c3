//! Property-based tests for scoring and the game state machine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use when_was_this::core::{
    calculate_score, year_difference, DisplayMode, GameStateMachine, Multiplier, Photo,
};
use when_was_this::settings::{GameConfig, ScoringRules, YearRange};

prop_compose! {
    fn arbitrary_photos()(years in prop::collection::vec(1900..=2026i32, 1..8)) -> Vec<Photo> {
        years
            .into_iter()
            .enumerate()
            .map(|(i, year)| Photo::new(format!("photo-{i}"), format!("photo-{i}.jpg"), year, "test"))
            .collect()
    }
}

#[derive(Clone, Debug)]
enum Action {
    Guess(i32),
    LockIn,
    Next,
    Back,
    Return,
}

fn arbitrary_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (1850..=2100i32).prop_map(Action::Guess),
        Just(Action::LockIn),
        Just(Action::Next),
        Just(Action::Back),
        Just(Action::Return),
    ]
}

fn apply(machine: &mut GameStateMachine, action: &Action) {
    match action {
        Action::Guess(year) => {
            machine.update_guess(*year);
        }
        Action::LockIn => {
            machine.lock_in_guess();
        }
        Action::Next => {
            machine.next_photo();
        }
        Action::Back => {
            machine.view_previous_photo();
        }
        Action::Return => machine.return_to_current(),
    }
}

fn started(photos: Vec<Photo>) -> GameStateMachine {
    let mut machine = GameStateMachine::new(GameConfig::default());
    machine.initialize(photos);
    machine
}

proptest! {
    #[test]
    fn base_points_follow_year_difference(
        guess in -5000..5000i32,
        actual in 1900..=2026i32,
        streak in 0..20u32,
    ) {
        let rules = ScoringRules::default();
        let result = calculate_score(guess, actual, streak, &rules);
        let difference = year_difference(guess, actual);
        let expected = 5000u64.saturating_sub(difference * 100) as u32;
        prop_assert_eq!(result.base_points, expected);
        prop_assert_eq!(result.streak_broken, difference > 15);
    }

    #[test]
    fn broken_streak_never_multiplies(
        actual in 1900..=2026i32,
        offset in 16..200i32,
        streak in 0..50u32,
    ) {
        let result = calculate_score(actual + offset, actual, streak, &ScoringRules::default());
        prop_assert!(result.streak_broken);
        prop_assert_eq!(result.multiplier, Multiplier::Base);
        prop_assert_eq!(result.total_points, result.base_points);
    }

    #[test]
    fn total_is_bounded_by_base(
        guess in 1900..=2026i32,
        actual in 1900..=2026i32,
        streak in 0..50u32,
    ) {
        let result = calculate_score(guess, actual, streak, &ScoringRules::default());
        prop_assert!(result.total_points >= result.base_points);
        prop_assert!(result.total_points <= result.base_points * 2);
    }

    #[test]
    fn guess_stays_in_range(photos in arbitrary_photos(), year in any::<i32>()) {
        let mut machine = started(photos);
        machine.update_guess(year);
        prop_assert!(YearRange::default().contains(machine.state().current_guess));
    }

    #[test]
    fn completed_rounds_add_up(
        photos in arbitrary_photos(),
        guesses in prop::collection::vec(1900..=2026i32, 1..20),
    ) {
        let mut machine = started(photos);
        let mut expected_score = 0u32;

        for guess in &guesses {
            machine.update_guess(*guess);
            let score = machine.lock_in_guess().unwrap();
            expected_score += score.total_points;
            machine.next_photo();
        }

        let state = machine.state();
        prop_assert_eq!(state.history.len(), guesses.len());
        prop_assert_eq!(state.photos_completed as usize, guesses.len());
        prop_assert_eq!(state.session_score, expected_score);
        prop_assert_eq!(state.history.total_points(), u64::from(expected_score));
        prop_assert!(state.best_streak_this_session >= state.current_streak);
    }

    #[test]
    fn second_lock_in_is_noop(photos in arbitrary_photos(), guess in 1900..=2026i32) {
        let mut machine = started(photos);
        machine.update_guess(guess);
        machine.lock_in_guess().unwrap();
        let before = machine.state().clone();

        prop_assert!(machine.lock_in_guess().is_none());
        prop_assert_eq!(machine.state(), &before);
    }

    #[test]
    fn next_photo_cycles(photos in arbitrary_photos(), steps in 0..30usize) {
        let count = photos.len();
        let mut machine = started(photos);
        for _ in 0..steps {
            machine.next_photo();
        }
        prop_assert_eq!(machine.state().current_photo_index, steps % count);
        prop_assert!(!machine.state().has_guessed());
    }

    #[test]
    fn browsing_history_leaves_live_round_alone(
        photos in arbitrary_photos(),
        rounds in 1..6usize,
        back in 1..8usize,
    ) {
        let mut machine = started(photos);
        for _ in 0..rounds {
            machine.lock_in_guess();
            machine.next_photo();
        }
        let before = machine.state().clone();

        for _ in 0..back {
            machine.view_previous_photo();
        }
        prop_assert!(machine.display_mode().is_viewing_history());
        prop_assert!(!machine.update_guess(1999));
        prop_assert!(!machine.next_photo());

        machine.return_to_current();
        prop_assert_eq!(machine.state(), &before);
    }

    #[test]
    fn display_index_is_always_valid(
        photos in arbitrary_photos(),
        actions in prop::collection::vec(arbitrary_action(), 0..60),
    ) {
        let mut machine = started(photos);
        for action in &actions {
            apply(&mut machine, action);

            let state = machine.state();
            prop_assert!(state.current_photo_index < state.photos.len());
            prop_assert_eq!(state.history.len(), state.photos_completed as usize);
            if let DisplayMode::Historical(index) = state.display {
                prop_assert!(index < state.history.len());
                prop_assert!(machine.display_photo().is_some());
            }
        }
    }
}
