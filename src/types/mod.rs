//! Witness types that encode invariants in the type system.
//!
//! Instead of repeatedly validating that a confidence score is in [0, 1],
//! parse it once into a [`Confidence`]. Every stage downstream of
//! fragment validation relies on the bound without re-checking it.

mod confidence;

pub use confidence::{Confidence, ConfidenceError};
