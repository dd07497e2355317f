//! Evaluation of resolved references against hand-labelled gold data.
//!
//! Two views of correctness:
//!
//! | Evaluator | Input | Measures |
//! |-----------|-------|----------|
//! | [`SimilarityEvaluator`] | predicted and gold collections keyed by document URI | TF-IDF cosine per field after matching on Title |
//! | [`ParseEvaluator`] | gold and predicted fields aligned by reference | strict / Levenshtein-lenient accuracy per field |
//!
//! Neither evaluator is on the resolution path.

mod parse;
mod similarity;

pub use parse::{CategoryMetrics, ParseEvaluator, ParseMetrics};
pub use similarity::{RecordSimilarity, SimilarityEvaluator, SimilarityReport};
