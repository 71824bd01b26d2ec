//! Sparse vectors and cosine similarity
//!
//! TF-IDF rows have one dimension per vocabulary term but only a handful of
//! non-zero entries, so they are stored as sorted `(index, value)` pairs.

use std::cmp::Ordering;

/// A sparse vector with entries sorted by ascending index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary `(index, value)` pairs. Zero values are dropped
    /// and repeated indices are summed.
    #[must_use]
    pub fn from_pairs(mut pairs: Vec<(usize, f32)>) -> Self {
        pairs.sort_by_key(|&(index, _)| index);
        let mut entries: Vec<(usize, f32)> = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            match entries.last_mut() {
                Some(last) if last.0 == index => last.1 += value,
                _ => entries.push((index, value)),
            }
        }
        entries.retain(|&(_, value)| value != 0.0);
        Self { entries }
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    /// Number of non-zero entries
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> f32 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Dot product by merging the two sorted entry lists
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_val) = self.entries[i];
            let (b_idx, b_val) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += a_val * b_val;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|&(_, v)| v * v).sum::<f32>().sqrt()
    }

    /// Scale to unit length. A zero vector stays zero.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for (_, v) in &mut self.entries {
                *v *= inv_norm;
            }
        }
    }
}

/// Cosine similarity between two sparse vectors.
///
/// Zero vectors have similarity 0 with everything. The result is clamped to
/// `[-1, 1]` to absorb rounding.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
