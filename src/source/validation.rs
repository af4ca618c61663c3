//! Catalog checks using Validation.
//!
//! Every problem in a catalog is reported in one pass rather than stopping
//! at the first bad photo.

use crate::core::Photo;
use crate::settings::YearRange;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A problem with one catalog entry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogViolation {
    #[error("photo at position {position} has an empty id")]
    EmptyId { position: usize },

    #[error("photo {id} has an empty filename")]
    EmptyFilename { id: String },

    #[error("photo id {id} appears more than once")]
    DuplicateId { id: String },

    #[error("photo {id} is from {year}, outside {min}..={max}")]
    YearOutOfRange {
        id: String,
        year: i32,
        min: i32,
        max: i32,
    },
}

/// Result of checking photos: success, or every violation found.
pub type CatalogCheck = Validation<(), NonEmptyVec<CatalogViolation>>;

fn check(ok: bool, violation: impl FnOnce() -> CatalogViolation) -> CatalogCheck {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Check one photo on its own.
pub fn validate_photo(position: usize, photo: &Photo, years: &YearRange) -> CatalogCheck {
    let checks = vec![
        check(!photo.id.trim().is_empty(), || CatalogViolation::EmptyId {
            position,
        }),
        check(!photo.filename.trim().is_empty(), || {
            CatalogViolation::EmptyFilename {
                id: photo.id.clone(),
            }
        }),
        check(years.contains(photo.year), || {
            CatalogViolation::YearOutOfRange {
                id: photo.id.clone(),
                year: photo.year,
                min: years.min,
                max: years.max,
            }
        }),
    ];

    Validation::all_vec(checks).map(|_| ())
}

/// Check a whole catalog, including id uniqueness.
pub fn validate_catalog(photos: &[Photo], years: &YearRange) -> CatalogCheck {
    let mut seen = HashSet::new();
    let mut checks = Vec::with_capacity(photos.len() * 2);

    for (position, photo) in photos.iter().enumerate() {
        checks.push(validate_photo(position, photo, years));
        checks.push(check(seen.insert(photo.id.as_str()), || {
            CatalogViolation::DuplicateId {
                id: photo.id.clone(),
            }
        }));
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Keep the photos that pass every check.
///
/// The first photo with a given id wins; later duplicates are dropped.
/// Returns the kept photos and the violations of the dropped ones.
pub fn retain_valid(photos: Vec<Photo>, years: &YearRange) -> (Vec<Photo>, Vec<CatalogViolation>) {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(photos.len());
    let mut violations = Vec::new();

    for (position, photo) in photos.into_iter().enumerate() {
        if let Validation::Failure(errors) = validate_photo(position, &photo, years) {
            violations.extend(errors.iter().cloned());
            continue;
        }
        if !seen.insert(photo.id.clone()) {
            violations.push(CatalogViolation::DuplicateId { id: photo.id });
            continue;
        }
        kept.push(photo);
    }

    (kept, violations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years() -> YearRange {
        YearRange::default()
    }

    #[test]
    fn valid_catalog_passes() {
        let photos = vec![
            Photo::new("a", "a.jpg", 1936, "a"),
            Photo::new("b", "b.jpg", 1968, "b"),
        ];
        assert!(validate_catalog(&photos, &years()).is_success());
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let photos = vec![
            Photo::new("", " ", 1850, "nothing right"),
            Photo::new("dup", "dup.jpg", 1950, "first"),
            Photo::new("dup", "dup2.jpg", 1951, "second"),
        ];

        match validate_catalog(&photos, &years()) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 4);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, CatalogViolation::EmptyId { position: 0 })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, CatalogViolation::EmptyFilename { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, CatalogViolation::YearOutOfRange { year: 1850, .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, CatalogViolation::DuplicateId { id } if id == "dup")));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn retain_valid_drops_bad_and_duplicate_entries() {
        let photos = vec![
            Photo::new("a", "a.jpg", 1936, "kept"),
            Photo::new("b", "b.jpg", 2150, "future"),
            Photo::new("a", "a-again.jpg", 1940, "duplicate"),
            Photo::new("c", "c.jpg", 1989, "kept"),
        ];

        let (kept, violations) = retain_valid(photos, &years());
        let ids: Vec<_> = kept.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(kept[0].filename, "a.jpg");
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn empty_catalog_is_valid() {
        assert!(validate_catalog(&[], &years()).is_success());
        let (kept, violations) = retain_valid(Vec::new(), &years());
        assert!(kept.is_empty());
        assert!(violations.is_empty());
    }
}
