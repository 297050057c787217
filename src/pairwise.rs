use rayon::prelude::*;

use crate::error::{Result, SeqDistError};

/// A configured distance kernel over two character sequences.
///
/// Implementations are pure: the configuration is fixed at construction and
/// a call has no side effects, so a kernel can be shared across worker
/// threads by reference.
pub trait Metric {
    /// Distance between a single pair of sequences.
    fn distance(&self, a: &str, b: &str) -> Result<f64>;

    /// Distances over all unordered pairs of `sequences`, in the canonical
    /// order given by [`condensed_index`].
    ///
    /// The default implementation delegates to [`pairwise`]; kernels with
    /// batch-level preconditions or per-sequence caching override it.
    fn pairwise<S>(&self, sequences: &[S]) -> Result<Vec<f64>>
    where
        S: AsRef<str> + Sync,
        Self: Sized + Sync,
    {
        pairwise(sequences, self)
    }
}

/// Number of unordered pairs among `n` sequences.
pub fn num_pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Position of the pair `(i, j)`, `i < j < n`, in the condensed distance
/// vector (the flattened upper triangle, row-major).
pub fn condensed_index(n: usize, i: usize, j: usize) -> usize {
    debug_assert!(i < j && j < n);
    i * (n - 1) - i * (i + 1) / 2 + (j - 1 - i)
}

pub(crate) fn pair_indices(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(num_pairs(n));
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Evaluate `metric` on every unordered pair of `sequences` in parallel.
///
/// Pairs are independent, so they are distributed over the rayon thread
/// pool; the indexed collect keeps the output in canonical pair order
/// regardless of scheduling, and the first kernel error aborts the whole
/// batch. Zero or one sequences produce an empty vector.
pub fn pairwise<S, M>(sequences: &[S], metric: &M) -> Result<Vec<f64>>
where
    S: AsRef<str> + Sync,
    M: Metric + Sync,
{
    if sequences.len() <= 1 {
        return Ok(Vec::new());
    }
    pair_indices(sequences.len())
        .into_par_iter()
        .map(|(i, j)| metric.distance(sequences[i].as_ref(), sequences[j].as_ref()))
        .collect()
}

/// Expand a condensed distance vector into a symmetric `n x n` matrix with
/// a zero diagonal.
pub fn to_square(condensed: &[f64], n: usize) -> Result<Vec<Vec<f64>>> {
    if condensed.len() != num_pairs(n) {
        return Err(SeqDistError::ShapeMismatch(format!(
            "expected {} condensed distances for {} sequences, got {}",
            num_pairs(n),
            n,
            condensed.len()
        )));
    }
    let mut square = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let value = condensed[condensed_index(n, i, j)];
            square[i][j] = value;
            square[j][i] = value;
        }
    }
    Ok(square)
}

/// Collapse a symmetric square distance matrix back into its condensed
/// upper-triangular vector.
pub fn to_flat(square: &[Vec<f64>]) -> Result<Vec<f64>> {
    let n = square.len();
    if square.iter().any(|row| row.len() != n) {
        return Err(SeqDistError::ShapeMismatch(
            "distance matrix must be square".into(),
        ));
    }
    let mut condensed = Vec::with_capacity(num_pairs(n));
    for i in 0..n {
        for j in (i + 1)..n {
            condensed.push(square[i][j]);
        }
    }
    Ok(condensed)
}
