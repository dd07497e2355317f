//! Resolver and evaluator configuration.
//!
//! ```rust
//! use refparse::ResolverConfig;
//!
//! let config = ResolverConfig::builder()
//!     .with_confidence_threshold(0.5)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.confidence_threshold, 0.5);
//! ```

use crate::classify::YearOverride;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Operating point used by the reference pipeline.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.75;

/// Separator placed between the fragments of a resolved block.
pub const DEFAULT_JOINER: &str = ", ";

/// Default normalized Levenshtein cutoff for lenient accuracy.
pub const DEFAULT_LEVENSHTEIN_THRESHOLD: f64 = 0.3;

/// Settings for the resolution pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Fragments at or below this confidence are excluded. Must be in `[0, 1)`.
    pub confidence_threshold: f64,
    /// Year detection applied before classification.
    pub year_override: YearOverride,
    /// Separator for joining block members.
    pub joiner: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            year_override: YearOverride::default(),
            joiner: DEFAULT_JOINER.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Start a builder from the defaults.
    #[must_use]
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }

    /// Parse and validate a JSON configuration. Missing keys take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the threshold is outside `[0, 1)` or the year
    /// window is empty.
    pub fn validate(&self) -> Result<()> {
        let t = self.confidence_threshold;
        if t.is_nan() || !(0.0..1.0).contains(&t) {
            return Err(Error::config(format!(
                "confidence_threshold must be in [0, 1), got {t}"
            )));
        }
        let years = &self.year_override;
        if years.enabled && years.min_year >= years.max_year_exclusive {
            return Err(Error::config(format!(
                "empty year window [{}, {})",
                years.min_year, years.max_year_exclusive
            )));
        }
        Ok(())
    }
}

/// Builder for [`ResolverConfig`].
#[derive(Debug, Clone, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    /// Set the confidence threshold.
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.config.confidence_threshold = threshold;
        self
    }

    /// Replace the year override rule.
    pub fn with_year_override(mut self, year_override: YearOverride) -> Self {
        self.config.year_override = year_override;
        self
    }

    /// Set the block joiner.
    pub fn with_joiner(mut self, joiner: impl Into<String>) -> Self {
        self.config.joiner = joiner.into();
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<ResolverConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Settings for [`crate::eval::ParseEvaluator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Cells whose normalized edit distance is below this count as lenient matches.
    pub levenshtein_threshold: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            levenshtein_threshold: DEFAULT_LEVENSHTEIN_THRESHOLD,
        }
    }
}

impl EvalConfig {
    /// Check invariants.
    pub fn validate(&self) -> Result<()> {
        let t = self.levenshtein_threshold;
        if t.is_nan() || !(0.0..=1.0).contains(&t) {
            return Err(Error::config(format!(
                "levenshtein_threshold must be in [0, 1], got {t}"
            )));
        }
        Ok(())
    }
}
