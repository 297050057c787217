//! Affine-gap local alignment and the normalised CDR distance built on it.

use rayon::prelude::*;

use crate::error::Result;
use crate::pairwise::{self, Metric};
use crate::substitution::{SubstitutionMatrix, BLOSUM45};

/// Alignment-score distance over CDR sequences.
///
/// Scores each pair with an affine-gap local alignment (Gotoh recurrences,
/// match layer clamped at zero) against a substitution matrix, then
/// normalises by the geometric mean of the self-alignment scores:
/// `1 - S(a, b) / sqrt(S(a, a) * S(b, b))`, clamped into `[0, 1]`.
///
/// Defaults to BLOSUM45 with a gap opening penalty of 10 and a gap
/// extension penalty of 1.
#[derive(Debug, Clone)]
pub struct CdrDist<'m> {
    matrix: &'m SubstitutionMatrix,
    gap_opening_penalty: f64,
    gap_extension_penalty: f64,
}

impl<'m> CdrDist<'m> {
    pub fn new(
        matrix: &'m SubstitutionMatrix,
        gap_opening_penalty: f64,
        gap_extension_penalty: f64,
    ) -> Self {
        Self {
            matrix,
            gap_opening_penalty,
            gap_extension_penalty,
        }
    }

    /// Best local alignment score between two encoded sequences. A gap of
    /// length `k` costs `opening + (k - 1) * extension`.
    fn alignment_score(&self, a: &[usize], b: &[usize]) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        let open = self.gap_opening_penalty;
        let extend = self.gap_extension_penalty;
        let cols = b.len() + 1;

        let mut h_prev = vec![0.0f64; cols];
        let mut h_curr = vec![0.0f64; cols];
        // Vertical gap layer, carried across rows per column.
        let mut f = vec![f64::NEG_INFINITY; cols];
        let mut best = 0.0f64;
        for &ai in a {
            let mut e = f64::NEG_INFINITY;
            for j in 1..cols {
                e = (h_curr[j - 1] - open).max(e - extend);
                f[j] = (h_prev[j] - open).max(f[j] - extend);
                let diagonal = h_prev[j - 1] + self.matrix.score_at(ai, b[j - 1]);
                let h = diagonal.max(e).max(f[j]).max(0.0);
                h_curr[j] = h;
                if h > best {
                    best = h;
                }
            }
            std::mem::swap(&mut h_prev, &mut h_curr);
        }
        best
    }

    fn normalized(&self, a: &[usize], b: &[usize], self_a: f64, self_b: f64) -> f64 {
        if a == b {
            return 0.0;
        }
        let denominator = (self_a * self_b).sqrt();
        if denominator <= 0.0 {
            return 1.0;
        }
        (1.0 - self.alignment_score(a, b) / denominator).clamp(0.0, 1.0)
    }
}

impl Default for CdrDist<'static> {
    fn default() -> Self {
        Self::new(&BLOSUM45, 10.0, 1.0)
    }
}

impl Metric for CdrDist<'_> {
    fn distance(&self, a: &str, b: &str) -> Result<f64> {
        let a = self.matrix.encode(a)?;
        let b = self.matrix.encode(b)?;
        let self_a = self.alignment_score(&a, &a);
        let self_b = self.alignment_score(&b, &b);
        Ok(self.normalized(&a, &b, self_a, self_b))
    }

    /// Batch form with per-sequence caching: every sequence is encoded and
    /// self-aligned once, so unknown tokens surface before any pair is
    /// scheduled and no pair repeats a self-alignment.
    fn pairwise<S>(&self, sequences: &[S]) -> Result<Vec<f64>>
    where
        S: AsRef<str> + Sync,
        Self: Sized + Sync,
    {
        if sequences.len() <= 1 {
            return Ok(Vec::new());
        }
        let encoded = sequences
            .iter()
            .map(|s| self.matrix.encode(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let self_scores: Vec<f64> = encoded
            .par_iter()
            .map(|e| self.alignment_score(e, e))
            .collect();
        pairwise::pair_indices(sequences.len())
            .into_par_iter()
            .map(|(i, j)| Ok(self.normalized(&encoded[i], &encoded[j], self_scores[i], self_scores[j])))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeqDistError;
    use crate::substitution::BLOSUM62;

    fn round4(value: f64) -> f64 {
        (value * 1e4).round() / 1e4
    }

    #[test]
    fn test_cdr_dist_batch() {
        let metric = CdrDist::default();
        let distances = metric.pairwise(&["AASQ", "PASQ"]).unwrap();
        assert_eq!(round4(distances[0]), 0.3153);

        let distances = metric.pairwise(&["GTA", "HLA", "KKR"]).unwrap();
        let rounded: Vec<f64> = distances.into_iter().map(round4).collect();
        assert_eq!(rounded, vec![0.7288, 1.0, 1.0]);

        let distances = metric.pairwise(&["SEQVENCES", "SEQVENCES"]).unwrap();
        assert_eq!(distances, vec![0.0]);
    }

    #[test]
    fn test_cdr_dist_pair() {
        let metric = CdrDist::default();
        assert_eq!(
            round4(metric.distance("CASSLKPNTEAFF", "CASSAHIANYGYTF").unwrap()),
            0.7122
        );
    }

    #[test]
    fn test_cdr_dist_identity_and_symmetry() {
        let metric = CdrDist::default();
        assert_eq!(metric.distance("CASSF", "CASSF").unwrap(), 0.0);
        assert_eq!(
            metric.distance("AASQ", "PASQ").unwrap(),
            metric.distance("PASQ", "AASQ").unwrap()
        );
    }

    #[test]
    fn test_gap_penalties_shape_the_distance() {
        let strict = CdrDist::default();
        let lenient = CdrDist::new(&BLOSUM45, 2.0, 1.0);
        assert_eq!(round4(strict.distance("CASSF", "CSF").unwrap()), 0.5381);
        assert_eq!(round4(lenient.distance("CASSF", "CSF").unwrap()), 0.2538);
    }

    #[test]
    fn test_custom_matrix() {
        let metric = CdrDist::new(&BLOSUM62, 10.0, 1.0);
        let distance = metric.distance("AASQ", "PASQ").unwrap();
        assert!(distance > 0.0 && distance < 1.0);
    }

    #[test]
    fn test_unknown_token_aborts_batch() {
        let metric = CdrDist::default();
        let err = metric.pairwise(&["AASQ", "PA-Q"]).unwrap_err();
        assert!(matches!(err, SeqDistError::UnknownToken('-')));
        assert!(metric.distance("AASQ", "paSQ").is_err());
    }

    #[test]
    fn test_batch_matches_single_pair_path() {
        let sequences = ["CASSLKPNTEAFF", "CASSAHIANYGYTF", "CASRGATETQYF"];
        let metric = CdrDist::default();
        let batch = metric.pairwise(&sequences).unwrap();
        assert_eq!(
            batch[0],
            metric.distance(sequences[0], sequences[1]).unwrap()
        );
        assert_eq!(
            batch[2],
            metric.distance(sequences[1], sequences[2]).unwrap()
        );
    }
}
