//! Pre-fit TF-IDF vectorizer.
//!
//! The vectorizer is fit offline and shipped as a JSON artifact holding
//! the vocabulary (`term -> column`), the per-column inverse document
//! frequencies and the weighting options used at fit time:
//!
//! ```json
//! {
//!   "vocabulary": { "amazing": 0, "bad": 1, "product": 2 },
//!   "idf": [1.69, 1.69, 1.0],
//!   "ngram_range": [1, 1],
//!   "sublinear_tf": false,
//!   "norm": "l2"
//! }
//! ```
//!
//! Only `vocabulary` is required. Without `idf` the vectorizer produces
//! plain (optionally normalized) term frequencies.

use crate::analyzer::tokenizer::{Tokenizer, DEFAULT_MIN_TOKEN_CHARS};
use crate::error::ArtifactError;
use crate::model::features::FeatureVector;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Capability of turning cleaned text into feature vectors.
pub trait Vectorizer {
    /// Dimensionality of every produced vector.
    fn n_features(&self) -> usize;

    /// Transforms a batch of cleaned documents, one vector per document,
    /// in input order.
    fn transform(&self, documents: &[&str]) -> Vec<FeatureVector>;
}

/// Per-document vector normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Unit Euclidean length.
    L2,
    /// Unit sum of absolute values.
    L1,
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_min_token_chars() -> usize {
    DEFAULT_MIN_TOKEN_CHARS
}

/// Term-frequency / inverse-document-frequency vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: FxHashMap<String, u32>,
    #[serde(default)]
    idf: Option<Vec<f64>>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
    #[serde(default = "default_min_token_chars")]
    min_token_chars: usize,
}

impl TfidfVectorizer {
    /// Creates a unigram, L2-normalized vectorizer.
    pub fn new<I>(vocabulary: I, idf: Option<Vec<f64>>) -> Self
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        Self {
            vocabulary: vocabulary.into_iter().collect(),
            idf,
            ngram_range: default_ngram_range(),
            sublinear_tf: false,
            norm: default_norm(),
            min_token_chars: DEFAULT_MIN_TOKEN_CHARS,
        }
    }

    /// Sets the word n-gram range (inclusive).
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n, max_n);
        self
    }

    /// Uses `1 + ln(tf)` instead of raw counts.
    pub fn with_sublinear_tf(mut self, sublinear: bool) -> Self {
        self.sublinear_tf = sublinear;
        self
    }

    /// Sets the output normalization, `None` to disable.
    pub fn with_norm(mut self, norm: Option<Norm>) -> Self {
        self.norm = norm;
        self
    }

    /// Sets the minimum token length in characters.
    pub fn with_min_token_chars(mut self, min_chars: usize) -> Self {
        self.min_token_chars = min_chars;
        self
    }

    /// Term to column mapping.
    pub fn vocabulary(&self) -> &FxHashMap<String, u32> {
        &self.vocabulary
    }

    /// Inverse document frequencies by column, if fit with IDF weighting.
    pub fn idf(&self) -> Option<&[f64]> {
        self.idf.as_deref()
    }

    /// Inclusive word n-gram range.
    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    /// Checks the internal consistency of a loaded vectorizer.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let n = self.vocabulary.len();
        if n == 0 {
            return Err(ArtifactError::invalid("vectorizer", "vocabulary is empty"));
        }

        let mut seen = vec![false; n];
        for (term, &idx) in &self.vocabulary {
            let slot = seen.get_mut(idx as usize).ok_or_else(|| {
                ArtifactError::invalid(
                    "vectorizer",
                    format!("term {term:?} maps to column {idx}, vocabulary has {n} columns"),
                )
            })?;
            if *slot {
                return Err(ArtifactError::invalid(
                    "vectorizer",
                    format!("column {idx} is assigned to more than one term"),
                ));
            }
            *slot = true;
        }

        if let Some(idf) = &self.idf {
            if idf.len() != n {
                return Err(ArtifactError::invalid(
                    "vectorizer",
                    format!("idf has {} weights for {n} terms", idf.len()),
                ));
            }
            if let Some(pos) = idf.iter().position(|w| !w.is_finite()) {
                return Err(ArtifactError::invalid(
                    "vectorizer",
                    format!("idf weight at column {pos} is not finite"),
                ));
            }
        }

        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::invalid(
                "vectorizer",
                format!("invalid ngram_range ({min_n}, {max_n})"),
            ));
        }

        if self.min_token_chars == 0 {
            return Err(ArtifactError::invalid(
                "vectorizer",
                "min_token_chars must be at least 1",
            ));
        }

        Ok(())
    }

    /// Transforms a single cleaned document.
    pub fn transform_one(&self, document: &str) -> FeatureVector {
        let dim = self.vocabulary.len();
        let tokens = Tokenizer::new(self.min_token_chars).tokens(document);

        let mut counts: FxHashMap<u32, f64> = FxHashMap::default();
        let (min_n, max_n) = self.ngram_range;
        let mut gram = String::new();

        for n in min_n.max(1)..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                let term: &str = if n == 1 {
                    window[0]
                } else {
                    gram.clear();
                    for (i, token) in window.iter().enumerate() {
                        if i > 0 {
                            gram.push(' ');
                        }
                        gram.push_str(token);
                    }
                    &gram
                };
                if let Some(&idx) = self.vocabulary.get(term) {
                    *counts.entry(idx).or_insert(0.0) += 1.0;
                }
            }
        }

        let weighted = counts.into_iter().map(|(idx, count)| {
            let tf = if self.sublinear_tf {
                1.0 + count.ln()
            } else {
                count
            };
            let idf = self
                .idf
                .as_ref()
                .and_then(|w| w.get(idx as usize).copied())
                .unwrap_or(1.0);
            (idx, tf * idf)
        });

        let mut vector = FeatureVector::from_entries(dim, weighted);
        match self.norm {
            Some(Norm::L2) => {
                let norm = vector.l2_norm();
                vector.scale_down(norm);
            }
            Some(Norm::L1) => {
                let norm = vector.l1_norm();
                vector.scale_down(norm);
            }
            None => {}
        }
        vector
    }
}

impl Vectorizer for TfidfVectorizer {
    #[inline]
    fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    fn transform(&self, documents: &[&str]) -> Vec<FeatureVector> {
        documents.iter().map(|doc| self.transform_one(doc)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(terms: &[&str]) -> Vec<(String, u32)> {
        terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i as u32))
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn raw_counts_without_idf_or_norm() {
        let v = TfidfVectorizer::new(vocab(&["bad", "good", "product"]), None).with_norm(None);
        let out = v.transform_one("good good product");
        assert_eq!(out.dim(), 3);
        assert_eq!(out.entries(), &[(1, 2.0), (2, 1.0)]);
    }

    #[test]
    fn idf_weights_then_l2_normalizes() {
        let v = TfidfVectorizer::new(vocab(&["bad", "good", "product"]), Some(vec![2.0, 3.0, 1.0]));
        let out = v.transform_one("good product");
        let norm = (9.0f64 + 1.0).sqrt();
        assert!(approx(out.get(1), 3.0 / norm));
        assert!(approx(out.get(2), 1.0 / norm));
        assert!(approx(out.l2_norm(), 1.0));
    }

    #[test]
    fn l1_norm_sums_to_one() {
        let v = TfidfVectorizer::new(vocab(&["aa", "bb"]), None).with_norm(Some(Norm::L1));
        let out = v.transform_one("aa bb bb bb");
        assert!(approx(out.get(0), 0.25));
        assert!(approx(out.get(1), 0.75));
    }

    #[test]
    fn sublinear_tf() {
        let v = TfidfVectorizer::new(vocab(&["wow"]), None)
            .with_norm(None)
            .with_sublinear_tf(true);
        let out = v.transform_one("wow wow wow");
        assert!(approx(out.get(0), 1.0 + 3.0f64.ln()));
    }

    #[test]
    fn unknown_terms_and_empty_documents_give_zero_vectors() {
        let v = TfidfVectorizer::new(vocab(&["good"]), None);
        let unknown = v.transform_one("terrible experience");
        assert_eq!(unknown.nnz(), 0);
        assert_eq!(unknown.dim(), 1);
        assert_eq!(v.transform_one("").nnz(), 0);
    }

    #[test]
    fn single_char_tokens_ignored() {
        let v = TfidfVectorizer::new(vocab(&["a", "ok"]), None).with_norm(None);
        let out = v.transform_one("a ok");
        assert_eq!(out.entries(), &[(1, 1.0)]);
    }

    #[test]
    fn bigrams_are_space_joined() {
        let v = TfidfVectorizer::new(vocab(&["not", "good", "not good"]), None)
            .with_norm(None)
            .with_ngram_range(1, 2);
        let out = v.transform_one("not good");
        assert_eq!(out.entries(), &[(0, 1.0), (1, 1.0), (2, 1.0)]);
    }

    #[test]
    fn batch_preserves_order() {
        let v = TfidfVectorizer::new(vocab(&["bad", "good"]), None);
        let out = v.transform(&["good", "bad", "meh"]);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].entries(), &[(1, 1.0)]);
        assert_eq!(out[1].entries(), &[(0, 1.0)]);
        assert_eq!(out[2].nnz(), 0);
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{ "vocabulary": { "good": 0, "bad": 1 }, "idf": [1.0, 2.0] }"#;
        let v: TfidfVectorizer = serde_json::from_str(json).unwrap();
        assert_eq!(v.n_features(), 2);
        assert_eq!(v.ngram_range(), (1, 1));
        assert_eq!(v.norm, Some(Norm::L2));
        assert!(v.validate().is_ok());
    }

    #[test]
    fn null_norm_disables_normalization() {
        let json = r#"{ "vocabulary": { "good": 0 }, "norm": null }"#;
        let v: TfidfVectorizer = serde_json::from_str(json).unwrap();
        assert_eq!(v.transform_one("good good").get(0), 2.0);
    }

    #[test]
    fn unvalidated_column_gap_does_not_panic() {
        let v = TfidfVectorizer::new(vec![("aa".to_string(), 0), ("bb".to_string(), 2)], None)
            .with_norm(None);
        let out = v.transform_one("aa bb");
        assert_eq!(out.dim(), 2);
        assert_eq!(out.entries(), &[(0, 1.0)]);
    }

    #[test]
    fn validate_rejects_bad_columns() {
        let gap = TfidfVectorizer::new(vec![("a".to_string(), 0), ("b".to_string(), 2)], None);
        assert!(gap.validate().is_err());

        let dup = TfidfVectorizer::new(vec![("a".to_string(), 0), ("b".to_string(), 0)], None);
        assert!(dup.validate().is_err());
    }

    #[test]
    fn validate_rejects_idf_length_and_nan() {
        let short = TfidfVectorizer::new(vocab(&["a", "b"]), Some(vec![1.0]));
        assert!(short.validate().is_err());

        let nan = TfidfVectorizer::new(vocab(&["a"]), Some(vec![f64::NAN]));
        assert!(nan.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_ngram_range() {
        let v = TfidfVectorizer::new(vocab(&["a"]), None).with_ngram_range(2, 1);
        assert!(v.validate().is_err());
        let v = TfidfVectorizer::new(vocab(&["a"]), None).with_ngram_range(0, 1);
        assert!(v.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_vocabulary() {
        let v = TfidfVectorizer::new(Vec::<(String, u32)>::new(), None);
        assert!(v.validate().is_err());
    }
}
