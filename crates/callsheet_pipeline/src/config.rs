//! Pipeline configuration.
//!
//! Configuration ships with bundled defaults (`include_str!` of
//! `callsheet.toml`) and supports an optional override file whose values
//! take precedence, merged with the `config` crate.

use callsheet_error::{CallsheetResult, ConfigError};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Bundled default configuration.
const BUNDLED_CONFIG: &str = include_str!("../callsheet.toml");

/// Runtime configuration for one pipeline.
///
/// # Examples
///
/// ```
/// use callsheet_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.request_timeout_secs, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Base URL of the analysis collaborator service
    pub collaborator_url: String,
    /// Per-task deadline in seconds; on expiry the stage falls back
    pub request_timeout_secs: u64,
    /// Initial backoff for job polling, in milliseconds
    pub poll_initial_backoff_ms: u64,
    /// Maximum polling attempts per job
    pub poll_max_attempts: usize,
    /// Elements below this confidence raise a quality conflict
    pub confidence_threshold: f64,
    /// Overall confidence below this requires human review
    pub human_review_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            collaborator_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
            poll_initial_backoff_ms: 250,
            poll_max_attempts: 8,
            confidence_threshold: 0.5,
            human_review_threshold: 0.7,
        }
    }
}

impl PipelineConfig {
    /// Load the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled configuration fails validation.
    pub fn load() -> CallsheetResult<Self> {
        Self::load_with_override(None::<&Path>)
    }

    /// Load configuration, merging an optional override file over the
    /// bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the override file cannot be read or the merged
    /// configuration fails validation.
    pub fn load_with_override<P: AsRef<Path>>(path: Option<P>) -> CallsheetResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(BUNDLED_CONFIG, FileFormat::Toml));
        if let Some(path) = &path {
            builder = builder.add_source(File::from(path.as_ref()));
        }

        let merged = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to load configuration: {e}")))?;
        let config: Self = merged
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Invalid configuration: {e}")))?;
        config.validate()?;

        debug!(
            collaborator_url = %config.collaborator_url,
            timeout_secs = config.request_timeout_secs,
            "Loaded pipeline configuration"
        );
        Ok(config)
    }

    /// Validate value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if a threshold is outside [0, 1] or a timeout is
    /// zero.
    pub fn validate(&self) -> CallsheetResult<()> {
        for (name, value) in [
            ("confidence_threshold", self.confidence_threshold),
            ("human_review_threshold", self.human_review_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(
                    ConfigError::new(format!("{name} must be in [0, 1], got {value}")).into(),
                );
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::new("request_timeout_secs must be positive").into());
        }
        if self.poll_max_attempts == 0 {
            return Err(ConfigError::new("poll_max_attempts must be positive").into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_match_the_default_impl() {
        let loaded = PipelineConfig::load().unwrap();
        assert_eq!(loaded, PipelineConfig::default());
    }

    #[test]
    fn out_of_range_threshold_fails_validation() {
        let config = PipelineConfig {
            confidence_threshold: 1.5,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let config = PipelineConfig {
            request_timeout_secs: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
