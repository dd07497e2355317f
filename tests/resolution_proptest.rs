//! Property tests for segmentation and resolution.

use proptest::prelude::*;
use refparse::resolve::{filter_by_confidence, segment, BlockResolver};
use refparse::types::Confidence;
use refparse::{CorpusIterator, Fragment, RawFragment, ResolverConfig};

const LABELS: [&str; 4] = ["Title", "Authors", "PubYear", "Journal"];

fn fragments_strategy() -> impl Strategy<Value = Vec<Fragment>> {
    prop::collection::vec((0usize..LABELS.len(), 0.0f64..=1.0), 0..40).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (label, conf))| {
                RawFragment::new("d", "r", "u", format!("t{i}"))
                    .labelled(LABELS[label], Confidence::new(conf).unwrap())
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Blocks partition the sequence exactly, in order.
    #[test]
    fn segmentation_partitions(fragments in fragments_strategy()) {
        let blocks = segment(&fragments);
        let flattened: Vec<&Fragment> = blocks.iter().flat_map(|b| b.members.iter()).collect();
        prop_assert_eq!(flattened.len(), fragments.len());
        for (a, b) in flattened.iter().zip(&fragments) {
            prop_assert_eq!(*a, b);
        }

        let mut expected_start = 0;
        for block in &blocks {
            prop_assert_eq!(block.start, expected_start);
            prop_assert!(!block.members.is_empty());
            prop_assert!(block.members.iter().all(|f| f.category == block.label()));
            expected_start = block.end();
        }
        for pair in blocks.windows(2) {
            prop_assert_ne!(pair[0].label(), pair[1].label());
        }
    }

    /// Resolution picks the block holding the first maximum of each label.
    #[test]
    fn winner_holds_first_maximum(fragments in fragments_strategy()) {
        let blocks = segment(&fragments);
        let winners = BlockResolver::default().winners(&blocks);
        for (label, idx) in winners {
            let mut first_max: Option<(usize, f64)> = None;
            for (pos, f) in fragments.iter().enumerate() {
                if f.category == label && first_max.map_or(true, |(_, c)| f.confidence.get() > c) {
                    first_max = Some((pos, f.confidence.get()));
                }
            }
            let (pos, _) = first_max.unwrap();
            let block = blocks[idx];
            prop_assert!(block.start <= pos && pos < block.end());
        }
    }

    /// Every resolved label was observed; every observed label is resolved.
    #[test]
    fn resolved_labels_match_observed(fragments in fragments_strategy()) {
        let fields = BlockResolver::default().resolve(&segment(&fragments));
        let mut observed: Vec<&str> = fragments.iter().map(|f| f.category.as_str()).collect();
        observed.sort_unstable();
        observed.dedup();
        let resolved: Vec<&str> = fields.keys().map(String::as_str).collect();
        prop_assert_eq!(resolved, observed);
    }

    /// Nothing at or below the threshold survives filtering.
    #[test]
    fn filter_is_strict(fragments in fragments_strategy(), threshold in 0.0f64..1.0) {
        let total = fragments.len();
        let expected = fragments.iter().filter(|f| f.confidence.get() > threshold).count();
        let kept = filter_by_confidence(fragments, threshold);
        prop_assert_eq!(kept.len(), expected);
        prop_assert!(kept.len() <= total);
        prop_assert!(kept.iter().all(|f| f.confidence.get() > threshold));
    }

    /// Corpus output is identical across runs.
    #[test]
    fn corpus_run_deterministic(fragments in fragments_strategy()) {
        let corpus = CorpusIterator::new(ResolverConfig::default()).unwrap();
        prop_assert_eq!(corpus.run(fragments.clone()), corpus.run(fragments));
    }
}
