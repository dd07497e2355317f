//! Per-reference resolution: filter, segment, choose a block per label.
//!
//! ```text
//! fragments ──► filter_by_confidence ──► segment ──► BlockResolver ──► ResolvedFields
//! ```

mod filter;
mod resolver;
mod segment;

pub use filter::filter_by_confidence;
pub use resolver::{BlockResolver, ResolvedFields};
pub use segment::{segment, Block};

use crate::fragment::Fragment;

/// Run filtering, segmentation and resolution for one reference.
///
/// `fragments` must be one reference's fragments in original text order.
#[must_use]
pub fn resolve_reference<I>(
    fragments: I,
    threshold: f64,
    resolver: &BlockResolver,
) -> ResolvedFields
where
    I: IntoIterator<Item = Fragment>,
{
    let kept = filter_by_confidence(fragments, threshold);
    let blocks = segment(&kept);
    resolver.resolve(&blocks)
}
