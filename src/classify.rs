//! Fragment labelling: the year override and the external classifier seam.
//!
//! The trained classifier is a black box mapping text to a label and a
//! confidence. Its training data covers a narrow range of publication
//! years, so numeric years are labelled by [`YearOverride`] before the
//! classifier is ever asked.
//!
//! ```rust
//! use refparse::classify::{classify_fragments, MockClassifier, YearOverride};
//! use refparse::{category, RawFragment};
//!
//! let classifier = MockClassifier::new(category::TITLE, 0.9);
//! let raws = vec![
//!     RawFragment::new("d", "1", "uri", "Diseases of the heart"),
//!     RawFragment::new("d", "1", "uri", "1999"),
//! ];
//! let labelled = classify_fragments(&classifier, raws, &YearOverride::default());
//! assert_eq!(labelled[0].category, "Title");
//! assert_eq!(labelled[1].category, "PubYear");
//! assert_eq!(labelled[1].confidence.get(), 1.0);
//! ```

use crate::fragment::{category, Fragment, RawFragment};
use crate::types::Confidence;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label and confidence for one fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Category label.
    pub label: String,
    /// Probability of the predicted label.
    pub confidence: Confidence,
}

impl Classification {
    /// Create a classification.
    pub fn new(label: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Capability interface for the external fragment classifier.
pub trait FragmentClassifier {
    /// Label one fragment text.
    fn classify(&self, text: &str) -> Result<Classification>;
}

impl<F> FragmentClassifier for F
where
    F: Fn(&str) -> Result<Classification>,
{
    fn classify(&self, text: &str) -> Result<Classification> {
        self(text)
    }
}

/// Table-driven classifier for tests.
///
/// Exact-text lookups first, then the default answer.
#[derive(Debug, Clone)]
pub struct MockClassifier {
    answers: HashMap<String, Classification>,
    default: Option<Classification>,
}

impl MockClassifier {
    /// Answer every unknown text with `label` at `confidence` (saturated to [0, 1]).
    #[must_use]
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            answers: HashMap::new(),
            default: Some(Classification::new(label, Confidence::saturating(confidence))),
        }
    }

    /// A classifier that fails on every unknown text.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            answers: HashMap::new(),
            default: None,
        }
    }

    /// Answer `text` with `label` at `confidence`.
    #[must_use]
    pub fn with_answer(
        mut self,
        text: impl Into<String>,
        label: impl Into<String>,
        confidence: f64,
    ) -> Self {
        self.answers.insert(
            text.into(),
            Classification::new(label, Confidence::saturating(confidence)),
        );
        self
    }
}

impl FragmentClassifier for MockClassifier {
    fn classify(&self, text: &str) -> Result<Classification> {
        self.answers
            .get(text)
            .or(self.default.as_ref())
            .cloned()
            .ok_or_else(|| Error::classification(format!("no answer for {text:?}")))
    }
}

/// Force-labels numeric publication years as [`category::PUB_YEAR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearOverride {
    /// Smallest accepted year.
    pub min_year: u32,
    /// First year past the window.
    pub max_year_exclusive: u32,
    /// Turn the override off entirely.
    pub enabled: bool,
}

impl Default for YearOverride {
    fn default() -> Self {
        Self {
            min_year: 1800,
            max_year_exclusive: 2020,
            enabled: true,
        }
    }
}

impl YearOverride {
    /// Whether `text` reads as a publication year.
    ///
    /// Matches either an all-digit string whose value is in the window, or a
    /// six-character string such as `(1999)` whose characters 1..=4 are
    /// digits in the window.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        if !self.enabled {
            return false;
        }
        if is_all_digits(text) {
            return self.in_window(text);
        }
        let chars: Vec<char> = text.chars().collect();
        if chars.len() == 6 {
            let inner: String = chars[1..5].iter().collect();
            return is_all_digits(&inner) && self.in_window(&inner);
        }
        false
    }

    /// The classification the override assigns.
    #[must_use]
    pub fn classification() -> Classification {
        Classification::new(category::PUB_YEAR, Confidence::CERTAIN)
    }

    fn in_window(&self, digits: &str) -> bool {
        digits
            .parse::<u64>()
            .map(|year| {
                (u64::from(self.min_year)..u64::from(self.max_year_exclusive)).contains(&year)
            })
            .unwrap_or(false)
    }
}

fn is_all_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Label one raw fragment, consulting the classifier only when the year
/// override does not fire.
pub fn classify_fragment<C: FragmentClassifier + ?Sized>(
    classifier: &C,
    raw: RawFragment,
    years: &YearOverride,
) -> Result<Fragment> {
    if raw.text.is_empty() {
        return Err(Error::malformed_fragment(format!(
            "empty text in reference {}/{}",
            raw.document_id, raw.reference_id
        )));
    }
    let classification = if years.matches(&raw.text) {
        YearOverride::classification()
    } else {
        classifier.classify(&raw.text)?
    };
    if category::is_reserved(&classification.label) {
        return Err(Error::malformed_fragment(format!(
            "reserved category {:?} in reference {}/{}",
            classification.label, raw.document_id, raw.reference_id
        )));
    }
    Ok(raw.labelled(classification.label, classification.confidence))
}

/// Label a sequence of raw fragments, preserving order.
///
/// Fragments that cannot be labelled are logged and dropped; the rest of
/// their reference is still returned.
pub fn classify_fragments<C, I>(classifier: &C, raws: I, years: &YearOverride) -> Vec<Fragment>
where
    C: FragmentClassifier + ?Sized,
    I: IntoIterator<Item = RawFragment>,
{
    raws.into_iter()
        .filter_map(|raw| {
            let key = format!("{}/{}", raw.document_id, raw.reference_id);
            match classify_fragment(classifier, raw, years) {
                Ok(fragment) => Some(fragment),
                Err(e) => {
                    log::warn!("Rejected fragment in reference {}: {}", key, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_years_in_window() {
        let years = YearOverride::default();
        assert!(years.matches("1800"));
        assert!(years.matches("1999"));
        assert!(years.matches("2019"));
        assert!(!years.matches("2020"));
        assert!(!years.matches("1799"));
        assert!(!years.matches("42"));
        assert!(!years.matches(""));
    }

    #[test]
    fn six_char_wrapped_years() {
        let years = YearOverride::default();
        assert!(years.matches("(1999)"));
        assert!(years.matches("[2005]"));
        assert!(years.matches(" 1999."));
        assert!(!years.matches("(2021)"));
        assert!(!years.matches("(199a)"));
        assert!(!years.matches("(1999"));
    }

    #[test]
    fn digits_with_leading_zeros() {
        assert!(YearOverride::default().matches("01999"));
        assert!(!YearOverride::default().matches("99999999999999999999999"));
    }

    #[test]
    fn disabled_never_matches() {
        let years = YearOverride {
            enabled: false,
            ..YearOverride::default()
        };
        assert!(!years.matches("1999"));
    }

    #[test]
    fn override_skips_classifier() {
        let classifier = |_: &str| -> Result<Classification> {
            panic!("classifier must not be called for years")
        };
        let raw = RawFragment::new("d", "r", "u", "1999");
        let fragment = classify_fragment(&classifier, raw, &YearOverride::default()).unwrap();
        assert_eq!(fragment.category, category::PUB_YEAR);
        assert_eq!(fragment.confidence, Confidence::CERTAIN);
    }

    #[test]
    fn failures_are_dropped_in_order() {
        let classifier = MockClassifier::failing()
            .with_answer("Smith J", category::AUTHORS, 0.9)
            .with_answer("Heart", category::TITLE, 0.8);
        let raws = vec![
            RawFragment::new("d", "r", "u", "Smith J"),
            RawFragment::new("d", "r", "u", "unknown"),
            RawFragment::new("d", "r", "u", ""),
            RawFragment::new("d", "r", "u", "Heart"),
        ];
        let out = classify_fragments(&classifier, raws, &YearOverride::default());
        let texts: Vec<_> = out.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["Smith J", "Heart"]);
    }

    #[test]
    fn reserved_label_rejected() {
        let classifier = MockClassifier::new("reference_id", 0.9);
        let raw = RawFragment::new("d", "r", "u", "Smith J");
        let err = classify_fragment(&classifier, raw, &YearOverride::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedFragment(_)));

        let raws = vec![RawFragment::new("d", "r", "u", "Smith J")];
        assert!(classify_fragments(&classifier, raws, &YearOverride::default()).is_empty());
    }
}
