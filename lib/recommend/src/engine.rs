//! Recommendation engine
//!
//! Ranks catalog books by how similar their category text is to a set of
//! seed books. Every call fits a fresh [`TfidfVectorizer`] on the catalog it
//! is given; nothing is cached between calls.

use crate::sparse::cosine_similarity;
use crate::vectorizer::TfidfVectorizer;
use ahash::AHashMap;
use libris_core::{Book, BookId};
use std::cmp::Ordering;

/// Number of books returned when no limit is configured
pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommenderConfig {
    /// Maximum number of recommended books
    pub limit: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self { limit: DEFAULT_LIMIT }
    }
}

/// A recommended book with its mean similarity to the seeds
#[derive(Debug, Clone, Copy)]
pub struct Recommendation<'a> {
    pub book: &'a Book,
    /// Mean cosine similarity in `[0, 1]`
    pub score: f32,
}

/// Content-based recommender over book categories
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    config: RecommenderConfig,
}

impl Recommender {
    pub fn new(config: RecommenderConfig) -> Self {
        Self { config }
    }

    /// Books most similar to `seeds`, best first.
    ///
    /// `seeds` are ids of books in `catalog`. Seed books are never returned
    /// and at most `limit` books are. Ids that are not in the catalog are
    /// ignored, and when none of the seeds is found the result is empty.
    pub fn recommend<'a>(&self, seeds: &[BookId], catalog: &'a [Book]) -> Vec<&'a Book> {
        self.recommend_scored(seeds, catalog)
            .into_iter()
            .map(|r| r.book)
            .collect()
    }

    /// Same ranking as [`Recommender::recommend`], keeping the scores
    pub fn recommend_scored<'a>(&self, seeds: &[BookId], catalog: &'a [Book]) -> Vec<Recommendation<'a>> {
        let Some(scored) = Scoring::run(seeds, catalog) else {
            return Vec::new();
        };

        let mut ranked: Vec<(usize, f32)> = scored.scores.into_iter().enumerate().collect();
        // stable: equal scores keep catalog order
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        ranked
            .into_iter()
            .filter(|(index, _)| !scored.is_seed[*index])
            .take(self.config.limit)
            .map(|(index, score)| Recommendation {
                book: &catalog[index],
                score,
            })
            .collect()
    }

    /// Mean similarity of every catalog book to the seeds, in catalog order.
    /// Empty when there are no usable seeds or no books.
    pub fn scores(&self, seeds: &[BookId], catalog: &[Book]) -> Vec<f32> {
        Scoring::run(seeds, catalog)
            .map(|s| s.scores)
            .unwrap_or_default()
    }
}

struct Scoring {
    scores: Vec<f32>,
    // catalog index -> is one of the seeds
    is_seed: Vec<bool>,
}

impl Scoring {
    fn run(seeds: &[BookId], catalog: &[Book]) -> Option<Self> {
        if seeds.is_empty() || catalog.is_empty() {
            return None;
        }

        // first occurrence wins if the caller passes a catalog with repeated ids
        let mut index_of: AHashMap<BookId, usize> = AHashMap::with_capacity(catalog.len());
        for (index, book) in catalog.iter().enumerate() {
            index_of.entry(book.id).or_insert(index);
        }

        let mut seed_indices: Vec<usize> = seeds
            .iter()
            .filter_map(|id| index_of.get(id).copied())
            .collect();
        seed_indices.sort_unstable();
        seed_indices.dedup();
        if seed_indices.is_empty() {
            return None;
        }

        let documents: Vec<&str> = catalog.iter().map(Book::category_text).collect();
        let matrix = TfidfVectorizer::new().fit_transform(&documents);

        let mut scores = vec![0.0f32; catalog.len()];
        for &seed in &seed_indices {
            let seed_row = &matrix.rows()[seed];
            if seed_row.is_zero() {
                continue;
            }
            for (score, row) in scores.iter_mut().zip(matrix.rows()) {
                *score += cosine_similarity(seed_row, row);
            }
        }
        let n = seed_indices.len() as f32;
        for score in &mut scores {
            *score = (*score / n).clamp(0.0, 1.0);
        }

        let seed_ids: Vec<BookId> = seed_indices.iter().map(|&i| catalog[i].id).collect();
        let is_seed = catalog.iter().map(|b| seed_ids.contains(&b.id)).collect();

        Some(Self { scores, is_seed })
    }
}
