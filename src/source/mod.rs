//! Where photos come from.
//!
//! The catalog is a `{ "photos": [...] }` document fetched over HTTP, with a
//! copy bundled into the crate for offline play and for when the fetch
//! fails. Loaded photos are validated and shuffled into play order.

pub mod validation;

use crate::core::{Photo, PhotoSet};
use crate::settings::{GameConfig, SourceConfig, YearRange};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

pub use validation::{retain_valid, validate_catalog, validate_photo, CatalogViolation};

/// The catalog shipped with the crate.
pub const BUNDLED_CATALOG: &str = include_str!("../../data/photos.json");

/// Placeholder image service used when playing the bundled catalog.
const PLACEHOLDER_IMAGE_URL: &str = "https://picsum.photos/800/600?random=";

/// Errors fetching the remote catalog.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to fetch photo catalog: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("photo catalog request returned HTTP {0}")]
    Status(u16),

    #[error("photo catalog is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("photo catalog has no usable photos")]
    Empty,
}

/// Supplies photos in play order and resolves their images.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Load the photo set. Never fails; an empty list means nothing could
    /// be loaded.
    async fn load_photos(&self) -> Vec<Photo>;

    /// URI of the displayable image for a catalog filename.
    fn image_uri_for(&self, filename: &str) -> String;
}

/// Shuffle photos into a fresh random play order.
pub fn shuffled(photos: Vec<Photo>) -> Vec<Photo> {
    shuffled_with(photos, &mut rand::rng())
}

pub fn shuffled_with<R: Rng + ?Sized>(mut photos: Vec<Photo>, rng: &mut R) -> Vec<Photo> {
    photos.shuffle(rng);
    photos
}

/// Remote catalog with the bundled catalog as fallback.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    config: SourceConfig,
    years: YearRange,
    fallback: PhotoSet,
    client: reqwest::Client,
}

impl CatalogSource {
    pub fn new(config: &GameConfig) -> Self {
        let fallback = PhotoSet::from_json(BUNDLED_CATALOG).unwrap_or_else(|error| {
            tracing::error!(%error, "bundled photo catalog is malformed");
            PhotoSet::default()
        });

        Self {
            config: config.source.clone(),
            years: config.years,
            fallback,
            client: reqwest::Client::new(),
        }
    }

    /// Replace the bundled fallback catalog.
    pub fn with_fallback(mut self, fallback: PhotoSet) -> Self {
        self.fallback = fallback;
        self
    }

    /// Fetch and validate the remote catalog.
    pub async fn fetch_remote(&self) -> Result<Vec<Photo>, SourceError> {
        let response = self
            .client
            .get(&self.config.photos_json_url)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        self.parse_catalog(&body)
    }

    /// Parse a catalog document and keep its usable photos.
    pub fn parse_catalog(&self, body: &str) -> Result<Vec<Photo>, SourceError> {
        let photos = self.usable(PhotoSet::from_json(body)?.photos);
        if photos.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(photos)
    }

    fn usable(&self, photos: Vec<Photo>) -> Vec<Photo> {
        let (kept, violations) = retain_valid(photos, &self.years);
        for violation in &violations {
            tracing::warn!(%violation, "skipping catalog entry");
        }
        kept
    }

    fn fallback_photos(&self) -> Vec<Photo> {
        self.usable(self.fallback.photos.clone())
    }
}

#[async_trait]
impl PhotoSource for CatalogSource {
    async fn load_photos(&self) -> Vec<Photo> {
        let photos = if self.config.use_local_data {
            self.fallback_photos()
        } else {
            match self.fetch_remote().await {
                Ok(photos) => photos,
                Err(error) => {
                    tracing::warn!(%error, "failed to load photos, using bundled catalog");
                    self.fallback_photos()
                }
            }
        };

        tracing::info!(count = photos.len(), "photo catalog loaded");
        shuffled(photos)
    }

    fn image_uri_for(&self, filename: &str) -> String {
        if self.config.use_local_data {
            format!("{PLACEHOLDER_IMAGE_URL}{filename}")
        } else {
            format!("{}{}", self.config.images_base_url, filename)
        }
    }
}
