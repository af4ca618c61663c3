//! Game configuration.
//!
//! Every field has a default matching the shipped game, so an empty or
//! missing configuration file yields a playable setup. Values can be layered
//! from a TOML file and `WHEN_WAS_THIS__*` environment variables, e.g.
//! `WHEN_WAS_THIS__RULES__STREAK_THRESHOLD=10`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "WHEN_WAS_THIS";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration sources could not be read or deserialized
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// The configuration was read but its values are inconsistent
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Point values and the accuracy threshold used to score a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Largest year difference that keeps a streak alive
    pub streak_threshold: u32,
    /// Points for an exact guess
    pub exact_year_bonus: u32,
    /// Points lost per year of difference
    pub penalty_per_year: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            streak_threshold: 15,
            exact_year_bonus: 5000,
            penalty_per_year: 100,
        }
    }
}

/// Inclusive range of years the guess slider covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            min: 1900,
            max: 2026,
        }
    }
}

impl YearRange {
    /// Clamp a year into the range.
    pub fn clamp(&self, year: i32) -> i32 {
        year.max(self.min).min(self.max)
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    /// Map a slider position in `0.0..=1.0` to a year.
    ///
    /// Positions outside the track are clamped to its ends; the result is
    /// rounded to the nearest year.
    pub fn year_at(&self, fraction: f64) -> i32 {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let span = f64::from(self.max) - f64::from(self.min);
        let year = (f64::from(self.min) + fraction * span).round();
        self.clamp(year as i32)
    }
}

/// Where the photo catalog and images come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL of the `{ "photos": [...] }` document
    pub photos_json_url: String,
    /// Prefix joined with a photo filename to build its image URI
    pub images_base_url: String,
    /// Skip the network and play the bundled catalog
    pub use_local_data: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            photos_json_url:
                "https://raw.githubusercontent.com/neatway/When-Was-This-/main/data/photos.json"
                    .to_string(),
            images_base_url:
                "https://raw.githubusercontent.com/neatway/When-Was-This-/main/images/"
                    .to_string(),
            use_local_data: false,
        }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rules: ScoringRules,
    pub years: YearRange,
    /// Slider position at the start of every round
    pub default_year: i32,
    pub source: SourceConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rules: ScoringRules::default(),
            years: YearRange::default(),
            default_year: 1960,
            source: SourceConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load configuration from an optional TOML file, then apply environment
    /// overrides.
    ///
    /// A missing file is not an error; defaults fill whatever is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source cannot be parsed, or
    /// [`ConfigError::Invalid`] if the resulting values are inconsistent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }
        let config: Self = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string, without environment overrides.
    ///
    /// # Errors
    ///
    /// Same as [`GameConfig::load`].
    pub fn parse_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = ::config::Config::builder()
            .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.years.min > self.years.max {
            return Err(ConfigError::Invalid(format!(
                "year range is empty: min {} > max {}",
                self.years.min, self.years.max
            )));
        }
        if !self.years.contains(self.default_year) {
            return Err(ConfigError::Invalid(format!(
                "default year {} is outside {}..={}",
                self.default_year, self.years.min, self.years.max
            )));
        }
        Ok(())
    }
}
