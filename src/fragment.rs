//! Classified reference fragments and their wire form.

use crate::types::Confidence;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Category labels of the evaluation vocabulary.
///
/// Labels are an open set; these are the ones gold data is annotated with.
pub mod category {
    /// Title of the cited work.
    pub const TITLE: &str = "Title";
    /// Author list.
    pub const AUTHORS: &str = "Authors";
    /// Journal or container title.
    pub const JOURNAL: &str = "Journal";
    /// Publication year.
    pub const PUB_YEAR: &str = "PubYear";
    /// Volume number.
    pub const VOLUME: &str = "Volume";
    /// Issue number.
    pub const ISSUE: &str = "Issue";
    /// Page range.
    pub const PAGINATION: &str = "Pagination";

    /// All evaluation labels, Title first.
    pub const EVALUATION_VOCABULARY: [&str; 7] =
        [TITLE, AUTHORS, JOURNAL, PUB_YEAR, VOLUME, ISSUE, PAGINATION];

    /// Labels that collide with the identity keys of a serialized reference.
    pub const RESERVED: [&str; 3] = ["document_id", "reference_id", "document_uri"];

    /// Whether `label` would collide with a reference's identity keys.
    #[must_use]
    pub fn is_reserved(label: &str) -> bool {
        RESERVED.contains(&label)
    }
}

/// A reference component that has not been classified yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFragment {
    /// Document the reference was found in.
    pub document_id: String,
    /// Reference within the document.
    pub reference_id: String,
    /// Source URI of the document.
    pub document_uri: String,
    /// Component text.
    pub text: String,
}

impl RawFragment {
    /// Create a raw fragment.
    pub fn new(
        document_id: impl Into<String>,
        reference_id: impl Into<String>,
        document_uri: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            reference_id: reference_id.into(),
            document_uri: document_uri.into(),
            text: text.into(),
        }
    }

    /// Attach a label and confidence.
    #[must_use]
    pub fn labelled(self, category: impl Into<String>, confidence: Confidence) -> Fragment {
        Fragment {
            text: self.text,
            document_id: self.document_id,
            reference_id: self.reference_id,
            document_uri: self.document_uri,
            category: category.into(),
            confidence,
        }
    }
}

/// One classified piece of reference text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Fragment text.
    pub text: String,
    /// Document the reference was found in.
    pub document_id: String,
    /// Reference within the document.
    pub reference_id: String,
    /// Source URI of the document.
    pub document_uri: String,
    /// Category label assigned by the classifier (or the year override).
    pub category: String,
    /// Classifier confidence.
    pub confidence: Confidence,
}

impl Fragment {
    /// `(document_id, reference_id)` grouping key.
    #[must_use]
    pub fn reference_key(&self) -> (&str, &str) {
        (&self.document_id, &self.reference_id)
    }
}

/// Fragment as it arrives from upstream, before validation.
///
/// Every attribute is optional so that a single broken record can be
/// rejected without failing the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentRecord {
    /// Document the reference was found in.
    #[serde(default)]
    pub document_id: Option<String>,
    /// Reference within the document.
    #[serde(default)]
    pub reference_id: Option<String>,
    /// Source URI of the document.
    #[serde(default)]
    pub document_uri: Option<String>,
    /// Fragment text.
    #[serde(default)]
    pub text: Option<String>,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Unchecked confidence.
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl FragmentRecord {
    /// Check every attribute and produce a [`Fragment`].
    ///
    /// # Errors
    ///
    /// [`Error::MalformedFragment`] if an attribute is missing, the text or
    /// label is empty or reserved, or the confidence is outside [0, 1].
    pub fn validate(self) -> Result<Fragment> {
        fn required(value: Option<String>, name: &str) -> Result<String> {
            value.ok_or_else(|| Error::malformed_fragment(format!("missing {name}")))
        }

        let document_id = required(self.document_id, "document_id")?;
        let reference_id = required(self.reference_id, "reference_id")?;
        let document_uri = required(self.document_uri, "document_uri")?;
        let text = required(self.text, "text")?;
        let category = required(self.category, "category")?;
        let raw_confidence = self
            .confidence
            .ok_or_else(|| Error::malformed_fragment("missing confidence"))?;

        if text.is_empty() {
            return Err(Error::malformed_fragment(format!(
                "empty text in reference {document_id}/{reference_id}"
            )));
        }
        if category.is_empty() {
            return Err(Error::malformed_fragment(format!(
                "empty category in reference {document_id}/{reference_id}"
            )));
        }
        if category::is_reserved(&category) {
            return Err(Error::malformed_fragment(format!(
                "reserved category {category:?} in reference {document_id}/{reference_id}"
            )));
        }
        let confidence = Confidence::try_from(raw_confidence)
            .map_err(|e| Error::malformed_fragment(e.to_string()))?;

        Ok(Fragment {
            text,
            document_id,
            reference_id,
            document_uri,
            category,
            confidence,
        })
    }
}

impl From<Fragment> for FragmentRecord {
    fn from(fragment: Fragment) -> Self {
        Self {
            document_id: Some(fragment.document_id),
            reference_id: Some(fragment.reference_id),
            document_uri: Some(fragment.document_uri),
            text: Some(fragment.text),
            category: Some(fragment.category),
            confidence: Some(fragment.confidence.get()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FragmentRecord {
        FragmentRecord {
            document_id: Some("doc-1".into()),
            reference_id: Some("3".into()),
            document_uri: Some("https://example.org/a.pdf".into()),
            text: Some("Smith J".into()),
            category: Some(category::AUTHORS.into()),
            confidence: Some(0.9),
        }
    }

    #[test]
    fn valid_record_passes() {
        let fragment = record().validate().unwrap();
        assert_eq!(fragment.text, "Smith J");
        assert_eq!(fragment.reference_key(), ("doc-1", "3"));
        assert!((fragment.confidence.get() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn missing_attribute_rejected() {
        let mut r = record();
        r.document_uri = None;
        let err = r.validate().unwrap_err();
        assert!(matches!(err, Error::MalformedFragment(ref m) if m.contains("document_uri")));
    }

    #[test]
    fn out_of_range_confidence_rejected() {
        for bad in [-0.01, 1.01, f64::NAN] {
            let mut r = record();
            r.confidence = Some(bad);
            assert!(r.validate().is_err(), "confidence {bad} should be rejected");
        }
    }

    #[test]
    fn empty_text_rejected() {
        let mut r = record();
        r.text = Some(String::new());
        assert!(r.validate().is_err());
    }

    #[test]
    fn reserved_category_rejected() {
        for label in category::RESERVED {
            let mut r = record();
            r.category = Some(label.into());
            let err = r.validate().unwrap_err();
            assert!(matches!(err, Error::MalformedFragment(ref m) if m.contains(label)));
        }
    }

    #[test]
    fn record_deserializes_with_missing_fields() {
        let r: FragmentRecord = serde_json::from_str(r#"{"text": "2005"}"#).unwrap();
        assert_eq!(r.text.as_deref(), Some("2005"));
        assert!(r.confidence.is_none());
    }
}
