//! # refparse
//!
//! Reference field resolution for citation parsing.
//!
//! Upstream, each reference found in a policy document is split into text
//! fragments and every fragment is labelled by a classifier (Title,
//! Authors, Journal, PubYear, Volume, Issue, Pagination, ...) with a
//! confidence. This crate turns those labelled fragments into one
//! structured citation per reference.
//!
//! ```text
//! classifier output ─► YearOverride ─► confidence filter ─► segment into blocks
//!                                                                │
//!      StructuredReference ◄─ assemble ◄─ one block per label ◄──┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use refparse::{category, CorpusIterator, MockClassifier, RawFragment, ResolverConfig};
//!
//! let classifier = MockClassifier::failing()
//!     .with_answer("Smith J", category::AUTHORS, 0.9)
//!     .with_answer("2005", category::VOLUME, 0.99)
//!     .with_answer("Diseases of the heart", category::TITLE, 0.95)
//!     .with_answer("Diseases of the", category::TITLE, 0.4);
//!
//! let raws = ["Smith J", "2005", "Diseases of the heart", "Diseases of the"]
//!     .into_iter()
//!     .map(|text| RawFragment::new("doc-1", "1", "https://example.org/a.pdf", text));
//!
//! let corpus = CorpusIterator::new(ResolverConfig::default())?;
//! let references = corpus.run_unclassified(&classifier, raws);
//!
//! let reference = &references[0];
//! assert_eq!(reference.field("Authors"), Some("Smith J"));
//! assert_eq!(reference.field("PubYear"), Some("2005"));
//! assert_eq!(reference.field("Title"), Some("Diseases of the heart"));
//! # Ok::<(), refparse::Error>(())
//! ```
//!
//! ## Resolution rules
//!
//! - Fragments at or below the confidence threshold are dropped.
//! - Neighbouring fragments with the same label form a block.
//! - If a label has several blocks, the block with the most confident
//!   fragment wins (earliest on ties); the others are discarded.
//! - A block's fragments are joined with `", "`.
//! - A reference with nothing left after filtering emits no record.
//!
//! ## Feature Flags
//!
//! - `parallel`: resolve references on a rayon thread pool. Output order
//!   is the same as the serial path.

#![warn(missing_docs)]

pub mod classify;
pub mod config;
mod corpus;
mod error;
pub mod eval;
mod fragment;
pub mod jsonl;
mod reference;
pub mod resolve;
pub mod similarity;
pub mod types;

pub use classify::{Classification, FragmentClassifier, MockClassifier, YearOverride};
pub use config::{EvalConfig, ResolverConfig, ResolverConfigBuilder};
pub use corpus::CorpusIterator;
pub use error::{Error, Result};
pub use fragment::{category, Fragment, FragmentRecord, RawFragment};
pub use reference::{assemble, StructuredReference};
pub use resolve::{BlockResolver, ResolvedFields};
