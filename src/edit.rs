//! Edit-style distances: Levenshtein, Hamming, longest-common-subsequence
//! distance, and optimal string alignment.

use crate::error::Result;
use crate::pairwise::Metric;
use crate::validate;

/// Levenshtein edit distance with a configurable substitution surcharge.
///
/// Insertions and deletions cost 1; a substitution costs `1 + extra_cost`.
#[derive(Debug, Clone, Copy)]
pub struct Levenshtein {
    extra_cost: f64,
}

impl Levenshtein {
    pub fn new(extra_cost: f64) -> Self {
        Self { extra_cost }
    }
}

impl Default for Levenshtein {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Metric for Levenshtein {
    fn distance(&self, a: &str, b: &str) -> Result<f64> {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        if a.is_empty() {
            return Ok(b.len() as f64);
        }
        if b.is_empty() {
            return Ok(a.len() as f64);
        }

        let substitution = 1.0 + self.extra_cost;
        let mut prev: Vec<f64> = (0..=b.len()).map(|j| j as f64).collect();
        let mut curr = vec![0.0; b.len() + 1];
        for (i, &ca) in a.iter().enumerate() {
            curr[0] = (i + 1) as f64;
            for (j, &cb) in b.iter().enumerate() {
                let cost = if ca == cb { 0.0 } else { substitution };
                curr[j + 1] = (prev[j + 1] + 1.0)
                    .min(curr[j] + 1.0)
                    .min(prev[j] + cost);
            }
            std::mem::swap(&mut prev, &mut curr);
        }
        Ok(prev[b.len()])
    }
}

/// Hamming distance over equal-length sequences, weighted per mismatch.
#[derive(Debug, Clone, Copy)]
pub struct Hamming {
    mismatch_score: f64,
}

impl Hamming {
    pub fn new(mismatch_score: f64) -> Self {
        Self { mismatch_score }
    }
}

impl Default for Hamming {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Metric for Hamming {
    fn distance(&self, a: &str, b: &str) -> Result<f64> {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        validate::ensure_equal_length(&a, &b)?;
        let mismatches = a.iter().zip(&b).filter(|(x, y)| x != y).count();
        Ok(self.mismatch_score * mismatches as f64)
    }

    fn pairwise<S>(&self, sequences: &[S]) -> Result<Vec<f64>>
    where
        S: AsRef<str> + Sync,
        Self: Sized + Sync,
    {
        validate::ensure_uniform_length(sequences)?;
        crate::pairwise::pairwise(sequences, self)
    }
}

/// Distance counting the insertions and deletions needed to turn one
/// sequence into the other: `|a| + |b| - 2L`, where `L` is the length of
/// their longest common subsequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestCommonSubstring;

impl Metric for LongestCommonSubstring {
    fn distance(&self, a: &str, b: &str) -> Result<f64> {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let mut prev = vec![0usize; b.len() + 1];
        let mut curr = vec![0usize; b.len() + 1];
        for &ca in &a {
            for (j, &cb) in b.iter().enumerate() {
                curr[j + 1] = if ca == cb {
                    prev[j] + 1
                } else {
                    prev[j + 1].max(curr[j])
                };
            }
            std::mem::swap(&mut prev, &mut curr);
        }
        let common = prev[b.len()];
        Ok((a.len() + b.len() - 2 * common) as f64)
    }
}

/// Optimal string alignment: Levenshtein plus adjacent transpositions, with
/// each substring edited at most once. Unit costs.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimalStringAlignment;

impl Metric for OptimalStringAlignment {
    fn distance(&self, a: &str, b: &str) -> Result<f64> {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        if a.is_empty() {
            return Ok(b.len() as f64);
        }
        if b.is_empty() {
            return Ok(a.len() as f64);
        }

        // The transposition case reaches two rows back, so three rows rotate.
        let cols = b.len() + 1;
        let mut prev2 = vec![0usize; cols];
        let mut prev: Vec<usize> = (0..cols).collect();
        let mut curr = vec![0usize; cols];
        for i in 1..=a.len() {
            curr[0] = i;
            for j in 1..=b.len() {
                let cost = usize::from(a[i - 1] != b[j - 1]);
                let mut best = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
                if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                    best = best.min(prev2[j - 2] + 1);
                }
                curr[j] = best;
            }
            std::mem::swap(&mut prev2, &mut prev);
            std::mem::swap(&mut prev, &mut curr);
        }
        Ok(prev[b.len()] as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairwise::pairwise;

    #[test]
    fn test_levenshtein_batch() {
        let metric = Levenshtein::default();
        assert_eq!(pairwise(&["AASQ", "PASQ"], &metric).unwrap(), vec![1.0]);
        assert_eq!(
            pairwise(&["GTA", "HLA", "KKR"], &metric).unwrap(),
            vec![2.0, 3.0, 3.0]
        );
        assert_eq!(
            pairwise(&["SEQVENCES", "SEQVENCES"], &metric).unwrap(),
            vec![0.0]
        );
    }

    #[test]
    fn test_levenshtein_pair() {
        let metric = Levenshtein::default();
        assert_eq!(
            metric.distance("CASSLKPNTEAFF", "CASSAHIANYGYTF").unwrap(),
            8.0
        );
        assert_eq!(metric.distance("", "ABC").unwrap(), 3.0);
        assert_eq!(metric.distance("ABC", "").unwrap(), 3.0);
    }

    #[test]
    fn test_levenshtein_extra_cost() {
        assert_eq!(Levenshtein::new(1.0).distance("AASQ", "PASQ").unwrap(), 2.0);
        assert_eq!(Levenshtein::new(0.5).distance("GTA", "HLA").unwrap(), 3.0);
    }

    #[test]
    fn test_hamming() {
        let metric = Hamming::default();
        assert_eq!(pairwise(&["AASQ", "PASQ"], &metric).unwrap(), vec![1.0]);
        assert_eq!(metric.distance("AASQ", "AASQ").unwrap(), 0.0);
        assert_eq!(Hamming::new(2.0).distance("AASQ", "PASQ").unwrap(), 2.0);
    }

    #[test]
    fn test_hamming_shape_mismatch() {
        let metric = Hamming::default();
        assert!(metric.distance("AASQ", "PAS").is_err());
        assert!(metric.pairwise(&["GAT", "AAFFD"]).is_err());
    }

    #[test]
    fn test_longest_common_substring() {
        let metric = LongestCommonSubstring;
        assert_eq!(pairwise(&["AASQ", "PASQ"], &metric).unwrap(), vec![2.0]);
        assert_eq!(
            metric.distance("CASSLKPNTEAFF", "CASSAHIANYGYTF").unwrap(),
            13.0
        );
        assert_eq!(metric.distance("GTA", "HLA").unwrap(), 4.0);
        assert_eq!(metric.distance("GTA", "KKR").unwrap(), 6.0);
        assert_eq!(metric.distance("SEQVENCES", "SEQVENCES").unwrap(), 0.0);
    }

    #[test]
    fn test_optimal_string_alignment() {
        let metric = OptimalStringAlignment;
        assert_eq!(pairwise(&["AASQ", "PASQ"], &metric).unwrap(), vec![1.0]);
        assert_eq!(metric.distance("CA", "AC").unwrap(), 1.0);
        assert_eq!(
            metric.distance("CASSLKPNTEAFF", "CASSAHIANYGYTF").unwrap(),
            8.0
        );
        assert_eq!(metric.distance("AASQ", "AASQ").unwrap(), 0.0);
        assert_eq!(metric.distance("", "AC").unwrap(), 2.0);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [("AASQ", "PASQ"), ("GTA", "KKR"), ("CA", "AC")];
        for (a, b) in pairs {
            assert_eq!(
                Levenshtein::default().distance(a, b).unwrap(),
                Levenshtein::default().distance(b, a).unwrap()
            );
            assert_eq!(
                LongestCommonSubstring.distance(a, b).unwrap(),
                LongestCommonSubstring.distance(b, a).unwrap()
            );
            assert_eq!(
                OptimalStringAlignment.distance(a, b).unwrap(),
                OptimalStringAlignment.distance(b, a).unwrap()
            );
        }
    }
}
