//! Structured citation records.

use crate::resolve::ResolvedFields;
use serde::{Deserialize, Serialize};

/// One resolved citation.
///
/// Serializes flat, with the resolved fields as top-level keys beside the
/// identity attributes:
///
/// ```rust
/// use refparse::{assemble, category};
/// use std::collections::BTreeMap;
///
/// let mut fields = BTreeMap::new();
/// fields.insert(category::TITLE.to_string(), "Diseases of the heart".to_string());
/// let reference = assemble("7", "doc-1", "https://example.org/a.pdf", fields).unwrap();
/// let json = serde_json::to_string(&reference).unwrap();
/// assert_eq!(
///     json,
///     r#"{"document_id":"doc-1","reference_id":"7","document_uri":"https://example.org/a.pdf","Title":"Diseases of the heart"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReference {
    /// Document the reference was found in.
    pub document_id: String,
    /// Reference within the document.
    pub reference_id: String,
    /// Source URI of the document.
    pub document_uri: String,
    /// Resolved text per category label.
    #[serde(flatten)]
    pub fields: ResolvedFields,
}

impl StructuredReference {
    /// Resolved text for `label`, if that label survived filtering.
    #[must_use]
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }

    /// Sort key used for deterministic corpus output.
    #[must_use]
    pub fn sort_key(&self) -> (&str, &str) {
        (&self.document_id, &self.reference_id)
    }
}

/// Build the record for one reference.
///
/// Returns `None` when nothing was resolved, i.e. no fragment of the
/// reference survived filtering.
#[must_use]
pub fn assemble(
    reference_id: impl Into<String>,
    document_id: impl Into<String>,
    document_uri: impl Into<String>,
    fields: ResolvedFields,
) -> Option<StructuredReference> {
    if fields.is_empty() {
        return None;
    }
    Some(StructuredReference {
        document_id: document_id.into(),
        reference_id: reference_id.into(),
        document_uri: document_uri.into(),
        fields,
    })
}
