//! Sparse feature vectors.

use smallvec::SmallVec;

/// Inline capacity for vector entries. Short reviews fit without a heap
/// allocation.
const INLINE_ENTRIES: usize = 16;

/// A sparse, fixed-dimensionality feature vector.
///
/// Entries are `(index, value)` pairs sorted by index with no duplicates
/// and no explicit zeros. `dim` is the vectorizer's vocabulary size.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: SmallVec<[(u32, f64); INLINE_ENTRIES]>,
}

impl FeatureVector {
    /// An all-zero vector of the given dimensionality.
    #[inline]
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: SmallVec::new(),
        }
    }

    /// Builds a vector from unordered entries.
    ///
    /// Entries are sorted, duplicate indices are summed and zeros dropped.
    /// Entries with an index at or above `dim` are discarded.
    pub fn from_entries<I>(dim: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut raw: SmallVec<[(u32, f64); INLINE_ENTRIES]> = entries
            .into_iter()
            .filter(|&(idx, _)| (idx as usize) < dim)
            .collect();
        raw.sort_unstable_by_key(|&(idx, _)| idx);

        let mut merged: SmallVec<[(u32, f64); INLINE_ENTRIES]> = SmallVec::with_capacity(raw.len());
        for (idx, value) in raw {
            match merged.last_mut() {
                Some(last) if last.0 == idx => last.1 += value,
                _ => merged.push((idx, value)),
            }
        }
        merged.retain(|&mut (_, v)| v != 0.0);

        Self {
            dim,
            entries: merged,
        }
    }

    /// Builds a vector from a dense slice.
    pub fn from_dense(values: &[f64]) -> Self {
        let entries = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i as u32, *v))
            .collect();
        Self {
            dim: values.len(),
            entries,
        }
    }

    /// Dimensionality fixed at vectorizer-fit time.
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of non-zero entries.
    #[inline(always)]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Non-zero entries sorted by index.
    #[inline(always)]
    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    /// Value at `index`, zero when absent.
    pub fn get(&self, index: u32) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Dot product with a dense row of the same dimensionality.
    #[inline]
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(idx, value)| value * dense.get(idx as usize).copied().unwrap_or(0.0))
            .sum()
    }

    /// Euclidean norm.
    pub fn l2_norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }

    /// Sum of absolute values.
    pub fn l1_norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v.abs()).sum()
    }

    /// Divides every entry by `divisor` when it is non-zero.
    pub(crate) fn scale_down(&mut self, divisor: f64) {
        if divisor > 0.0 {
            for (_, v) in self.entries.iter_mut() {
                *v /= divisor;
            }
        }
    }

    /// Expands into a dense vector.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(idx, value) in &self.entries {
            dense[idx as usize] = value;
        }
        dense
    }
}
