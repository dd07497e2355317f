//! Field-level similarity between resolved references and a gold set.
//!
//! For each predicted reference that has a Title:
//!
//! 1. Candidate gold references are those from the same `document_uri`.
//! 2. A TF-IDF model is fit on the predicted reference's populated fields.
//! 3. The candidate whose Title is most cosine-similar to the predicted
//!    Title is taken as the match (first candidate on ties).
//! 4. Every populated field is scored against the same field of that match.
//!
//! Per-field means across all scored references are the headline metric.
//!
//! Because the match is chosen on Title alone, a wrong match (for example
//! two gold references sharing a title) makes every other field score
//! against the wrong record. [`RecordSimilarity::matched`] records which
//! gold reference was used so such cases can be inspected.

use crate::fragment::category;
use crate::reference::StructuredReference;
use crate::similarity::{cosine_similarity, TfidfVectorizer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Scores for one predicted reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSimilarity {
    /// Predicted reference's document.
    pub document_id: String,
    /// Predicted reference's id.
    pub reference_id: String,
    /// Index into the gold slice of the matched reference.
    pub matched: usize,
    /// Cosine similarity per populated field.
    pub scores: BTreeMap<String, f64>,
}

/// Aggregate outcome of [`SimilarityEvaluator::evaluate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    /// One entry per scored reference, in input order.
    pub records: Vec<RecordSimilarity>,
    /// Mean score per field over the references that populated it.
    pub mean_by_field: BTreeMap<String, f64>,
    /// Predicted references skipped (no Title, or no gold for the document).
    pub skipped: usize,
}

impl SimilarityReport {
    /// Number of scored references.
    #[must_use]
    pub fn evaluated(&self) -> usize {
        self.records.len()
    }
}

/// Scores predicted references against gold references from the same document.
#[derive(Debug, Clone)]
pub struct SimilarityEvaluator {
    fields: Vec<String>,
}

impl Default for SimilarityEvaluator {
    fn default() -> Self {
        Self {
            fields: category::EVALUATION_VOCABULARY
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SimilarityEvaluator {
    /// Evaluator over the standard vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate `predicted` against `actual`.
    #[must_use]
    pub fn evaluate(
        &self,
        predicted: &[StructuredReference],
        actual: &[StructuredReference],
    ) -> SimilarityReport {
        let mut by_uri: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, gold) in actual.iter().enumerate() {
            by_uri.entry(gold.document_uri.as_str()).or_default().push(idx);
        }

        let mut report = SimilarityReport::default();
        for reference in predicted {
            let candidates = by_uri
                .get(reference.document_uri.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            match self.score_one(reference, candidates, actual) {
                Some(record) => report.records.push(record),
                None => report.skipped += 1,
            }
        }

        report.mean_by_field = mean_by_field(&report.records);
        log::info!(
            "Scored {} references against {} gold references ({} skipped)",
            report.evaluated(),
            actual.len(),
            report.skipped
        );
        report
    }

    fn score_one(
        &self,
        reference: &StructuredReference,
        candidates: &[usize],
        actual: &[StructuredReference],
    ) -> Option<RecordSimilarity> {
        if candidates.is_empty() {
            return None;
        }
        let title = reference
            .field(category::TITLE)
            .filter(|t| !t.is_empty())?;

        let populated: Vec<(&str, &str)> = self
            .fields
            .iter()
            .filter_map(|f| reference.field(f).map(|text| (f.as_str(), text)))
            .collect();
        let texts: Vec<&str> = populated.iter().map(|(_, text)| *text).collect();
        let vectorizer = TfidfVectorizer::fit(&texts);

        let title_vec = vectorizer.transform(title);
        let mut matched = candidates[0];
        let mut best = f64::NEG_INFINITY;
        for &idx in candidates {
            let gold_title = actual[idx].field(category::TITLE).unwrap_or("");
            let sim = cosine_similarity(&vectorizer.transform(gold_title), &title_vec);
            if sim > best {
                best = sim;
                matched = idx;
            }
        }

        let gold = &actual[matched];
        let scores = populated
            .iter()
            .map(|(field, text)| {
                let gold_text = gold.field(field).unwrap_or("");
                let sim = cosine_similarity(
                    &vectorizer.transform(text),
                    &vectorizer.transform(gold_text),
                );
                (field.to_string(), sim)
            })
            .collect();

        Some(RecordSimilarity {
            document_id: reference.document_id.clone(),
            reference_id: reference.reference_id.clone(),
            matched,
            scores,
        })
    }
}

fn mean_by_field(records: &[RecordSimilarity]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for record in records {
        for (field, score) in &record.scores {
            let entry = sums.entry(field.clone()).or_insert((0.0, 0));
            entry.0 += score;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(field, (sum, n))| (field, sum / n as f64))
        .collect()
}
