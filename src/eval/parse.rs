//! Strict and lenient accuracy of resolved fields against aligned gold fields.
//!
//! Each gold reference is paired with the fields predicted for the same
//! reference text. Columns are the labels that appear in any prediction;
//! missing cells on either side are treated as blank.
//!
//! ```text
//!                 Title         Authors     PubYear
//! gold            "Heart"       "Smith J"   "2005"      (gold "2005-03" → "2005")
//! predicted       "Heart"       "Smith"     ""
//! strict          ✓             ✗           ✗
//! lev distance    0.0           0.29        0.0 (blank side)
//! ```

use crate::config::EvalConfig;
use crate::fragment::category;
use crate::resolve::ResolvedFields;
use crate::similarity::normalized_levenshtein;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Metrics for one category column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryMetrics {
    /// Gold cells that are not blank.
    pub non_blank: usize,
    /// Fraction of exact matches.
    pub strict_accuracy: f64,
    /// Fraction of cells with normalized distance below the threshold.
    pub lenient_accuracy: f64,
    /// Mean normalized Levenshtein distance.
    pub mean_levenshtein: f64,
}

/// Outcome of [`ParseEvaluator::evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseMetrics {
    /// Number of evaluated references.
    pub sample_size: usize,
    /// Non-blank gold cells over all columns.
    pub non_blank: usize,
    /// Exact matches over all cells.
    pub strict_accuracy: f64,
    /// Lenient matches over all cells.
    pub lenient_accuracy: f64,
    /// Mean of the per-category mean distances.
    pub mean_levenshtein: f64,
    /// Threshold used for lenient matching.
    pub levenshtein_threshold: f64,
    /// Per-category breakdown.
    pub by_category: BTreeMap<String, CategoryMetrics>,
}

/// Compares predicted fields to gold fields reference by reference.
#[derive(Debug, Clone, Default)]
pub struct ParseEvaluator {
    config: EvalConfig,
}

impl ParseEvaluator {
    /// Evaluator with the given settings.
    pub fn new(config: EvalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Score `predicted[i]` against `gold[i]`.
    ///
    /// # Errors
    ///
    /// [`Error::Evaluation`] if the slices differ in length, are empty, or no
    /// prediction has any field.
    pub fn evaluate(
        &self,
        gold: &[ResolvedFields],
        predicted: &[ResolvedFields],
    ) -> Result<ParseMetrics> {
        if gold.len() != predicted.len() {
            return Err(Error::evaluation(format!(
                "{} gold references but {} predictions",
                gold.len(),
                predicted.len()
            )));
        }
        if gold.is_empty() {
            return Err(Error::evaluation("no references to evaluate"));
        }
        let categories: BTreeSet<&str> = predicted
            .iter()
            .flat_map(|fields| fields.keys().map(String::as_str))
            .collect();
        if categories.is_empty() {
            return Err(Error::evaluation("predictions contain no fields"));
        }

        let threshold = self.config.levenshtein_threshold;
        let n = gold.len() as f64;
        let mut by_category = BTreeMap::new();
        let (mut strict_total, mut lenient_total, mut non_blank_total) = (0usize, 0usize, 0usize);

        for &cat in &categories {
            let (mut strict, mut lenient, mut non_blank, mut distance) = (0, 0, 0, 0.0);
            for (g, p) in gold.iter().zip(predicted) {
                let actual = gold_cell(g, cat);
                let guess = p.get(cat).map(String::as_str).unwrap_or("");
                if !actual.is_empty() {
                    non_blank += 1;
                }
                if actual == guess {
                    strict += 1;
                }
                let d = normalized_levenshtein(&actual, guess);
                if d < threshold {
                    lenient += 1;
                }
                distance += d;
            }
            strict_total += strict;
            lenient_total += lenient;
            non_blank_total += non_blank;
            by_category.insert(
                cat.to_string(),
                CategoryMetrics {
                    non_blank,
                    strict_accuracy: strict as f64 / n,
                    lenient_accuracy: lenient as f64 / n,
                    mean_levenshtein: distance / n,
                },
            );
        }

        let cells = n * categories.len() as f64;
        let mean_levenshtein = by_category
            .values()
            .map(|m: &CategoryMetrics| m.mean_levenshtein)
            .sum::<f64>()
            / categories.len() as f64;

        Ok(ParseMetrics {
            sample_size: gold.len(),
            non_blank: non_blank_total,
            strict_accuracy: strict_total as f64 / cells,
            lenient_accuracy: lenient_total as f64 / cells,
            mean_levenshtein,
            levenshtein_threshold: threshold,
            by_category,
        })
    }
}

/// Gold cell text; publication years are cut to their first four characters.
fn gold_cell(fields: &ResolvedFields, cat: &str) -> String {
    let value = fields.get(cat).map(String::as_str).unwrap_or("");
    if cat == category::PUB_YEAR {
        value.chars().take(4).collect()
    } else {
        value.to_string()
    }
}
