//! TF-IDF vectorizer
//!
//! Fits a vocabulary and inverse document frequencies on a corpus and turns
//! documents into L2-normalized sparse vectors:
//!
//! - tokens are lowercase runs of two or more word characters
//! - `tf` is the raw term count within a document
//! - `idf(t) = ln((1 + n) / (1 + df(t))) + 1` (smoothed, never zero)
//!
//! Vocabulary terms are sorted, so dimension indices only depend on the
//! corpus content and not on hash iteration order.

use crate::sparse::SparseVector;
use ahash::{AHashMap, AHashSet};

/// Minimum token length in characters
const MIN_TOKEN_CHARS: usize = 2;

/// Term-frequency / inverse-document-frequency vectorizer
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    // term -> dimension
    vocabulary: AHashMap<String, usize>,
    // dimension -> term, sorted
    terms: Vec<String>,
    idf: Vec<f32>,
    fitted: bool,
}

/// Row-per-document TF-IDF matrix
#[derive(Debug, Clone, Default)]
pub struct TfidfMatrix {
    rows: Vec<SparseVector>,
    dim: usize,
}

impl TfidfMatrix {
    #[inline]
    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// Number of documents
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of feature dimensions (vocabulary size)
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl TfidfVectorizer {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Split text into lowercase word tokens.
    ///
    /// Word characters are alphanumerics and `_`; everything else separates
    /// tokens. Tokens shorter than two characters are dropped, so `"Sci-Fi"`
    /// yields `["sci", "fi"]` and `"a"` yields nothing.
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|s| s.chars().count() >= MIN_TOKEN_CHARS)
            .map(str::to_string)
            .collect()
    }

    /// Learn vocabulary and idf weights from a corpus, replacing any
    /// previous fit.
    ///
    /// A corpus without a single token (including an empty corpus) gives an
    /// empty vocabulary; every document then transforms to the zero vector.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) {
        let mut doc_freq: AHashMap<String, u32> = AHashMap::new();
        for doc in documents {
            let unique: AHashSet<String> = Self::tokenize(doc.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<String> = doc_freq.keys().cloned().collect();
        terms.sort_unstable();

        let n = documents.len() as f64;
        self.idf = terms
            .iter()
            .map(|term| {
                let df = doc_freq[term] as f64;
                (((1.0 + n) / (1.0 + df)).ln() + 1.0) as f32
            })
            .collect();
        self.vocabulary = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        self.terms = terms;
        self.fitted = true;
    }

    /// Vectorize one document against the fitted vocabulary.
    /// Unknown terms are ignored.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: AHashMap<usize, u32> = AHashMap::new();
        for token in Self::tokenize(document) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }

        let mut vector = SparseVector::from_pairs(
            counts
                .into_iter()
                .map(|(index, tf)| (index, tf as f32 * self.idf[index]))
                .collect(),
        );
        vector.normalize();
        vector
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> TfidfMatrix {
        self.fit(documents);
        TfidfMatrix {
            rows: documents.iter().map(|d| self.transform(d.as_ref())).collect(),
            dim: self.terms.len(),
        }
    }

    /// Vocabulary terms in dimension order
    #[inline]
    pub fn vocabulary(&self) -> &[String] {
        &self.terms
    }

    #[inline]
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Idf weight per dimension
    #[inline]
    pub fn idf(&self) -> &[f32] {
        &self.idf
    }

    #[inline]
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }
}
