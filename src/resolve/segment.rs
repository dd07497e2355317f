//! Splitting a reference's fragment sequence into same-label blocks.
//!
//! ```text
//! Authors  Authors  PubYear  Title  Title  Authors
//! └──── 0 ───────┘  └─ 1 ─┘  └─── 2 ────┘  └─ 3 ─┘
//! ```
//!
//! A block boundary falls exactly where the label changes between
//! neighbours, so blocks partition the sequence. Blocks borrow contiguous
//! slices of the input; nothing is copied.

use crate::fragment::Fragment;
use crate::types::Confidence;

/// Maximal contiguous run of same-label fragments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'a> {
    /// Position of the first member in the segmented sequence.
    pub start: usize,
    /// Members, in sequence order.
    pub members: &'a [Fragment],
}

impl<'a> Block<'a> {
    /// Shared label of every member.
    #[must_use]
    pub fn label(&self) -> &'a str {
        // Blocks are never empty.
        &self.members[0].category
    }

    /// Highest member confidence.
    #[must_use]
    pub fn max_confidence(&self) -> Confidence {
        self.members[self.max_confidence_member_index()].confidence
    }

    /// Index within `members` of the highest-confidence member, first on ties.
    #[must_use]
    pub fn max_confidence_member_index(&self) -> usize {
        let mut best = 0;
        for (i, member) in self.members.iter().enumerate().skip(1) {
            if member.confidence > self.members[best].confidence {
                best = i;
            }
        }
        best
    }

    /// Position one past the last member in the segmented sequence.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.members.len()
    }

    /// Member texts joined with `joiner`.
    #[must_use]
    pub fn joined_text(&self, joiner: &str) -> String {
        self.members
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(joiner)
    }
}

/// Partition `fragments` into blocks in a single left-to-right pass.
///
/// An empty sequence yields no blocks.
#[must_use]
pub fn segment(fragments: &[Fragment]) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut start = 0;
    for i in 1..=fragments.len() {
        let boundary = i == fragments.len() || fragments[i].category != fragments[i - 1].category;
        if boundary {
            blocks.push(Block {
                start,
                members: &fragments[start..i],
            });
            start = i;
        }
    }
    blocks
}
