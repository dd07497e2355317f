//! Confidence filtering ahead of segmentation.

use crate::fragment::Fragment;

/// Keep fragments whose confidence is strictly above `threshold`, in order.
///
/// ```rust
/// use refparse::resolve::filter_by_confidence;
/// use refparse::{types::Confidence, RawFragment};
///
/// let at = RawFragment::new("d", "r", "u", "a")
///     .labelled("Title", Confidence::new(0.75).unwrap());
/// let above = RawFragment::new("d", "r", "u", "b")
///     .labelled("Title", Confidence::new(0.76).unwrap());
/// let kept = filter_by_confidence(vec![at, above], 0.75);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].text, "b");
/// ```
#[must_use]
pub fn filter_by_confidence<I>(fragments: I, threshold: f64) -> Vec<Fragment>
where
    I: IntoIterator<Item = Fragment>,
{
    fragments
        .into_iter()
        .filter(|f| f.confidence.exceeds(threshold))
        .collect()
}
