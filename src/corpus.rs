//! Driving resolution across every reference of every document.
//!
//! Fragments are grouped by `(document_id, reference_id)` with fragment
//! order inside each group preserved. Groups are kept in a sorted map, so
//! the emitted records are always ordered by document then reference,
//! whatever order the documents arrived in.
//!
//! ```rust
//! use refparse::{CorpusIterator, ResolverConfig, RawFragment, types::Confidence};
//!
//! let conf = |v| Confidence::new(v).unwrap();
//! let fragments = vec![
//!     RawFragment::new("doc-b", "1", "uri-b", "Heart").labelled("Title", conf(0.9)),
//!     RawFragment::new("doc-a", "1", "uri-a", "Lungs").labelled("Title", conf(0.9)),
//!     RawFragment::new("doc-a", "2", "uri-a", "noise").labelled("Title", conf(0.1)),
//! ];
//! let references = CorpusIterator::new(ResolverConfig::default())?.run(fragments);
//! let keys: Vec<_> = references.iter().map(|r| r.sort_key()).collect();
//! assert_eq!(keys, vec![("doc-a", "1"), ("doc-b", "1")]);
//! # Ok::<(), refparse::Error>(())
//! ```

use crate::classify::{classify_fragments, FragmentClassifier};
use crate::config::ResolverConfig;
use crate::fragment::{Fragment, FragmentRecord, RawFragment};
use crate::reference::{assemble, StructuredReference};
use crate::resolve::{resolve_reference, BlockResolver};
use crate::Result;
use std::collections::BTreeMap;

type ReferenceKey = (String, String);

/// Resolves a corpus of classified fragments into structured references.
#[derive(Debug, Clone)]
pub struct CorpusIterator {
    config: ResolverConfig,
    resolver: BlockResolver,
}

impl Default for CorpusIterator {
    fn default() -> Self {
        let config = ResolverConfig::default();
        let resolver = BlockResolver::new(config.joiner.clone());
        Self { config, resolver }
    }
}

impl CorpusIterator {
    /// Create an iterator, validating `config` first.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Config`] if the configuration is invalid, e.g. a NaN
    /// or out-of-range threshold.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        let resolver = BlockResolver::new(config.joiner.clone());
        Ok(Self { config, resolver })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve classified fragments, one record per non-empty reference,
    /// sorted by `(document_id, reference_id)`.
    pub fn run<I>(&self, fragments: I) -> Vec<StructuredReference>
    where
        I: IntoIterator<Item = Fragment>,
    {
        let groups = group_by_reference(fragments);
        let total = groups.len();
        let references = self.resolve_groups(groups);
        log::info!(
            "Resolved {} of {} references (threshold {})",
            references.len(),
            total,
            self.config.confidence_threshold
        );
        references
    }

    /// Validate upstream records, dropping malformed ones, then [`run`](Self::run).
    pub fn run_records<I>(&self, records: I) -> Vec<StructuredReference>
    where
        I: IntoIterator<Item = FragmentRecord>,
    {
        let fragments = records.into_iter().filter_map(|record| match record.validate() {
            Ok(fragment) => Some(fragment),
            Err(e) => {
                log::warn!("Skipping fragment: {}", e);
                None
            }
        });
        self.run(fragments)
    }

    /// Label raw components with `classifier` (year override first), then
    /// [`run`](Self::run).
    pub fn run_unclassified<C, I>(&self, classifier: &C, raws: I) -> Vec<StructuredReference>
    where
        C: FragmentClassifier + ?Sized,
        I: IntoIterator<Item = RawFragment>,
    {
        let fragments = classify_fragments(classifier, raws, &self.config.year_override);
        self.run(fragments)
    }

    /// Resolve a single reference's fragments.
    ///
    /// All fragments are assumed to share one reference; identity is taken
    /// from the first.
    pub fn resolve_one(&self, fragments: Vec<Fragment>) -> Option<StructuredReference> {
        let first = fragments.first()?;
        let (document_id, reference_id, document_uri) = (
            first.document_id.clone(),
            first.reference_id.clone(),
            first.document_uri.clone(),
        );
        let fields = resolve_reference(fragments, self.config.confidence_threshold, &self.resolver);
        let reference = assemble(reference_id, document_id, document_uri, fields);
        if reference.is_none() {
            log::debug!("No fragment above threshold; reference skipped");
        }
        reference
    }

    #[cfg(not(feature = "parallel"))]
    fn resolve_groups(
        &self,
        groups: BTreeMap<ReferenceKey, Vec<Fragment>>,
    ) -> Vec<StructuredReference> {
        groups
            .into_values()
            .filter_map(|fragments| self.resolve_one(fragments))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn resolve_groups(
        &self,
        groups: BTreeMap<ReferenceKey, Vec<Fragment>>,
    ) -> Vec<StructuredReference> {
        use rayon::prelude::*;

        let groups: Vec<Vec<Fragment>> = groups.into_values().collect();
        let mut references: Vec<StructuredReference> = groups
            .into_par_iter()
            .filter_map(|fragments| self.resolve_one(fragments))
            .collect();
        references.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        references
    }
}

/// Group fragments by reference, keeping arrival order within each group.
fn group_by_reference<I>(fragments: I) -> BTreeMap<ReferenceKey, Vec<Fragment>>
where
    I: IntoIterator<Item = Fragment>,
{
    let mut groups: BTreeMap<ReferenceKey, Vec<Fragment>> = BTreeMap::new();
    for fragment in fragments {
        let key = (fragment.document_id.clone(), fragment.reference_id.clone());
        groups.entry(key).or_default().push(fragment);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;

    fn frag(doc: &str, reference: &str, text: &str, label: &str, conf: f64) -> Fragment {
        RawFragment::new(doc, reference, format!("https://{doc}"), text)
            .labelled(label, Confidence::new(conf).unwrap())
    }

    #[test]
    fn interleaved_references_keep_their_order() {
        let fragments = vec![
            frag("d", "1", "A", "Title", 0.9),
            frag("d", "2", "X", "Title", 0.9),
            frag("d", "1", "B", "Title", 0.9),
        ];
        let refs = CorpusIterator::default().run(fragments);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].field("Title"), Some("A, B"));
        assert_eq!(refs[1].field("Title"), Some("X"));
    }

    #[test]
    fn identity_copied_from_fragments() {
        let refs = CorpusIterator::default().run(vec![frag("doc", "9", "T", "Title", 0.8)]);
        assert_eq!(refs[0].document_id, "doc");
        assert_eq!(refs[0].reference_id, "9");
        assert_eq!(refs[0].document_uri, "https://doc");
    }

    #[test]
    fn empty_corpus() {
        assert!(CorpusIterator::default().run(Vec::new()).is_empty());
    }

    #[test]
    fn malformed_records_skipped_not_fatal() {
        let good: FragmentRecord = frag("d", "1", "Heart", "Title", 0.9).into();
        let mut bad = good.clone();
        bad.confidence = Some(3.0);
        let mut missing = good.clone();
        missing.text = None;
        let refs = CorpusIterator::default().run_records(vec![bad, good, missing]);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].field("Title"), Some("Heart"));
    }

    #[test]
    fn invalid_config_rejected() {
        for threshold in [f64::NAN, 1.0, -0.5] {
            let config = ResolverConfig {
                confidence_threshold: threshold,
                ..ResolverConfig::default()
            };
            let err = CorpusIterator::new(config).unwrap_err();
            assert!(matches!(err, crate::Error::Config(_)), "threshold {threshold}");
        }
    }

    #[test]
    fn valid_config_accepted() {
        let config = ResolverConfig {
            confidence_threshold: 0.5,
            ..ResolverConfig::default()
        };
        let refs = CorpusIterator::new(config)
            .unwrap()
            .run(vec![frag("d", "1", "Heart", "Title", 0.6)]);
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn resolve_one_empty_is_none() {
        assert!(CorpusIterator::default().resolve_one(Vec::new()).is_none());
    }
}
