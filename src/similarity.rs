//! Text similarity primitives used to score resolved references against gold data.
//!
//! - [`TfidfVectorizer`]: bag-of-words TF-IDF with smoothed idf and
//!   L2-normalized rows
//! - [`cosine_similarity`]: cosine over sparse vectors
//! - [`normalized_levenshtein`]: edit distance scaled by the longer string

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

/// Tokens of two or more word characters.
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

/// Sparse term-weight vector keyed by vocabulary index.
pub type SparseVector = BTreeMap<usize, f64>;

/// Lowercase and split into word tokens.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// TF-IDF model fit on a small set of documents.
///
/// # Weighting
///
/// ```text
/// idf(t)   = ln((1 + n) / (1 + df(t))) + 1
/// w(t, d)  = count(t, d) * idf(t), then the row is scaled to unit length
/// ```
///
/// Terms absent from the fitted vocabulary are ignored by [`transform`](Self::transform).
///
/// ```rust
/// use refparse::similarity::{cosine_similarity, TfidfVectorizer};
///
/// let v = TfidfVectorizer::fit(&["diseases of the heart", "smith"]);
/// let a = v.transform("Diseases of the Heart");
/// let b = v.transform("heart diseases of the");
/// assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and idf weights from `documents`.
    #[must_use]
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: HashSet<String> = tokenize(doc.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_default() += 1;
            }
        }

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (idx, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }
        Self { vocabulary, idf }
    }

    /// Number of distinct terms learned.
    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Weight vector for `text`. Empty when no token is in the vocabulary.
    #[must_use]
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut vector = SparseVector::new();
        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                *vector.entry(idx).or_default() += self.idf[idx];
            }
        }
        let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in vector.values_mut() {
                *w /= norm;
            }
        }
        vector
    }
}

/// Cosine similarity of two sparse vectors; 0 when either is empty.
#[must_use]
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(idx, w)| large.get(idx).map(|v| w * v))
        .sum();
    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Levenshtein distance divided by the longer length, in characters.
///
/// Defined as 0.0 when either string is empty, so a blank on one side is
/// never penalized.
#[must_use]
pub fn normalized_levenshtein(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let longest = a.chars().count().max(b.chars().count());
    strsim::levenshtein(a, b) as f64 / longest as f64
}
