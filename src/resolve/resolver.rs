//! Choosing one block per label.
//!
//! When a label shows up in several separate blocks, the block holding the
//! single most confident fragment of that label wins and the other blocks
//! are discarded. Ties go to the fragment that occurs first.
//!
//! ```text
//! Title(0.6)  Authors(0.8)  Title(0.95)
//! └ block 0 ┘               └ block 2 ┘   → Title = block 2
//! ```

use super::segment::Block;
use crate::config::DEFAULT_JOINER;
use std::collections::BTreeMap;

/// Resolved field text keyed by label. Labels never observed are absent.
pub type ResolvedFields = BTreeMap<String, String>;

/// Selects and joins the winning block for every label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockResolver {
    joiner: String,
}

impl Default for BlockResolver {
    fn default() -> Self {
        Self::new(DEFAULT_JOINER)
    }
}

impl BlockResolver {
    /// Resolver joining block members with `joiner`.
    #[must_use]
    pub fn new(joiner: impl Into<String>) -> Self {
        Self {
            joiner: joiner.into(),
        }
    }

    /// Index into `blocks` of the winning block for each label.
    ///
    /// Blocks are scanned in sequence order and only a strictly higher
    /// confidence replaces the current best, which makes the earliest
    /// maximum win.
    #[must_use]
    pub fn winners(&self, blocks: &[Block<'_>]) -> BTreeMap<String, usize> {
        let mut best: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
        for (idx, block) in blocks.iter().enumerate() {
            let peak = block.max_confidence().get();
            best.entry(block.label())
                .and_modify(|current| {
                    if peak > current.1 {
                        *current = (idx, peak);
                    }
                })
                .or_insert((idx, peak));
        }
        best.into_iter()
            .map(|(label, (idx, _))| (label.to_string(), idx))
            .collect()
    }

    /// Resolve blocks into one text per label.
    #[must_use]
    pub fn resolve(&self, blocks: &[Block<'_>]) -> ResolvedFields {
        let winners = self.winners(blocks);
        if log::log_enabled!(log::Level::Debug) {
            for (idx, block) in blocks.iter().enumerate() {
                if winners.get(block.label()) != Some(&idx) {
                    log::debug!(
                        "Discarding {} block at position {} ({} fragments, peak {})",
                        block.label(),
                        block.start,
                        block.members.len(),
                        block.max_confidence()
                    );
                }
            }
        }
        winners
            .into_iter()
            .map(|(label, idx)| {
                let text = blocks[idx].joined_text(&self.joiner);
                (label, text)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{Fragment, RawFragment};
    use crate::resolve::segment::segment;
    use crate::types::Confidence;

    fn frag(text: &str, label: &str, conf: f64) -> Fragment {
        RawFragment::new("d", "r", "u", text).labelled(label, Confidence::new(conf).unwrap())
    }

    #[test]
    fn single_block_joined() {
        let fragments = vec![frag("Smith J", "Authors", 0.9), frag("Doe A", "Authors", 0.8)];
        let fields = BlockResolver::default().resolve(&segment(&fragments));
        assert_eq!(fields["Authors"], "Smith J, Doe A");
    }

    #[test]
    fn single_fragment_unchanged() {
        let fragments = vec![frag("Heart disease", "Title", 0.9)];
        let fields = BlockResolver::default().resolve(&segment(&fragments));
        assert_eq!(fields["Title"], "Heart disease");
    }

    #[test]
    fn highest_peak_block_wins() {
        let fragments = vec![
            frag("A", "Title", 0.6),
            frag("B", "Authors", 0.8),
            frag("C", "Title", 0.95),
        ];
        let fields = BlockResolver::default().resolve(&segment(&fragments));
        assert_eq!(fields["Title"], "C");
        assert_eq!(fields["Authors"], "B");
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn exact_tie_first_block_wins() {
        let fragments = vec![
            frag("Smith J", "Author", 0.9),
            frag("Heart", "Title", 0.8),
            frag("Jones K", "Author", 0.9),
        ];
        let blocks = segment(&fragments);
        assert_eq!(BlockResolver::default().winners(&blocks)["Author"], 0);
        assert_eq!(BlockResolver::default().resolve(&blocks)["Author"], "Smith J");
    }

    #[test]
    fn losing_block_is_not_merged() {
        let fragments = vec![
            frag("x", "Journal", 0.7),
            frag("y", "Journal", 0.7),
            frag("2001", "PubYear", 1.0),
            frag("z", "Journal", 0.71),
        ];
        let fields = BlockResolver::default().resolve(&segment(&fragments));
        assert_eq!(fields["Journal"], "z");
    }

    #[test]
    fn custom_joiner() {
        let fragments = vec![frag("a", "Title", 0.9), frag("b", "Title", 0.9)];
        let fields = BlockResolver::new(" ").resolve(&segment(&fragments));
        assert_eq!(fields["Title"], "a b");
    }

    #[test]
    fn no_blocks_no_fields() {
        assert!(BlockResolver::default().resolve(&[]).is_empty());
    }
}
