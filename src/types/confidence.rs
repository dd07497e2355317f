//! Witness type for classifier confidence values bounded to [0.0, 1.0].
//!
//! # Where confidence comes from
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  CLASSIFIER: "max class probability"                                 │
//! │    "Diseases of the heart" → Title: 0.95                             │
//! │    "Smith J"               → Authors: 0.90                           │
//! │                                                                      │
//! │  YEAR OVERRIDE: "the text is a year"                                 │
//! │    "1999" → PubYear: 1.0 (classifier never consulted)                │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both sources share one scale inside a reference: the resolver compares
//! confidences of same-label fragments to choose between competing blocks,
//! so the values must be comparable and bounded. `Confidence` is parsed
//! once at the boundary and trusted afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A confidence score guaranteed to be in the range [0.0, 1.0].
///
/// # Construction
///
/// - [`Confidence::new`]: Returns `None` if out of range (strict parsing)
/// - [`Confidence::saturating`]: Clamps to [0, 1] (lenient, never fails)
/// - [`Confidence::try_from`]: Returns `Err` if out of range
///
/// # Example
///
/// ```rust
/// use refparse::types::Confidence;
///
/// assert!(Confidence::new(0.5).is_some());
/// assert!(Confidence::new(1.5).is_none());
///
/// let conf = Confidence::saturating(1.5);
/// assert_eq!(conf.get(), 1.0);
/// ```
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// The minimum valid confidence value.
    pub const MIN: Self = Self(0.0);

    /// The maximum valid confidence value.
    pub const MAX: Self = Self(1.0);

    /// A "perfect" confidence of 1.0, assigned by deterministic rules.
    pub const CERTAIN: Self = Self(1.0);

    /// Create a confidence score, returning `None` if out of range or NaN.
    #[must_use]
    #[inline]
    pub fn new(value: f64) -> Option<Self> {
        if (0.0..=1.0).contains(&value) && !value.is_nan() {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create a confidence score, clamping to [0.0, 1.0].
    ///
    /// NaN is treated as 0.0.
    #[must_use]
    #[inline]
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Get the inner value (guaranteed to be in [0.0, 1.0]).
    #[must_use]
    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Strictly greater than `threshold`.
    ///
    /// A confidence exactly equal to the threshold does not pass.
    #[must_use]
    #[inline]
    pub fn exceeds(self, threshold: f64) -> bool {
        self.0 > threshold
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Debug for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Confidence({:.4})", self.0)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Error when trying to create a Confidence from an invalid value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceError {
    /// The invalid value that was provided.
    pub value: f64,
}

impl fmt::Display for ConfidenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "confidence value {} is outside valid range [0.0, 1.0]",
            self.value
        )
    }
}

impl std::error::Error for ConfidenceError {}

impl TryFrom<f64> for Confidence {
    type Error = ConfidenceError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ConfidenceError { value })
    }
}

impl From<Confidence> for f64 {
    #[inline]
    fn from(conf: Confidence) -> Self {
        conf.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid() {
        assert!(Confidence::new(0.0).is_some());
        assert!(Confidence::new(0.5).is_some());
        assert!(Confidence::new(1.0).is_some());
    }

    #[test]
    fn new_invalid() {
        assert!(Confidence::new(-0.1).is_none());
        assert!(Confidence::new(1.1).is_none());
        assert!(Confidence::new(f64::NAN).is_none());
        assert!(Confidence::new(f64::INFINITY).is_none());
    }

    #[test]
    fn saturating_clamps() {
        assert_eq!(Confidence::saturating(-1.0).get(), 0.0);
        assert_eq!(Confidence::saturating(2.0).get(), 1.0);
        assert_eq!(Confidence::saturating(f64::NAN).get(), 0.0);
    }

    #[test]
    fn exceeds_is_strict() {
        let conf = Confidence::new(0.75).unwrap();
        assert!(!conf.exceeds(0.75));
        assert!(conf.exceeds(0.7499));
        assert!(Confidence::new(0.7501).unwrap().exceeds(0.75));
    }

    #[test]
    fn serde_rejects_out_of_range() {
        let conf: Confidence = serde_json::from_str("0.85").unwrap();
        assert!((conf.get() - 0.85).abs() < 1e-10);
        assert_eq!(serde_json::to_string(&conf).unwrap(), "0.85");
        assert!(serde_json::from_str::<Confidence>("1.5").is_err());
    }

    #[test]
    fn display_format() {
        let conf = Confidence::new(0.856).unwrap();
        assert_eq!(format!("{}", conf), "85.6%");
    }
}
