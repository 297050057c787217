//! Jaro and Jaro-Winkler distances with configurable term weights.

use crate::error::Result;
use crate::pairwise::Metric;
use crate::validate;

/// Canonical Jaro weighting: all three terms count equally.
pub const DEFAULT_JARO_WEIGHTS: [f64; 3] = [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];

/// Jaro similarity for pre-split sequences, with the three terms weighted
/// in order: matches over `|a|`, matches over `|b|`, and the transposition
/// term.
fn jaro_similarity(a: &[char], b: &[char], weights: &[f64; 3]) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    for (i, &ca) in a.iter().enumerate() {
        let lo = i.saturating_sub(window);
        let hi = (i + window).min(b.len() - 1);
        for j in lo..=hi {
            if !b_matched[j] && ca == b[j] {
                a_matched[i] = true;
                b_matched[j] = true;
                break;
            }
        }
    }

    let matches = a_matched.iter().filter(|&&matched| matched).count();
    if matches == 0 {
        return 0.0;
    }

    // Transpositions: matched characters taken in order from both sides,
    // counting disagreeing positions, halved.
    let disagreements = a
        .iter()
        .zip(&a_matched)
        .filter(|(_, &matched)| matched)
        .map(|(&c, _)| c)
        .zip(
            b.iter()
                .zip(&b_matched)
                .filter(|(_, &matched)| matched)
                .map(|(&c, _)| c),
        )
        .filter(|(x, y)| x != y)
        .count();
    let transpositions = disagreements as f64 / 2.0;

    let m = matches as f64;
    weights[0] * m / a.len() as f64
        + weights[1] * m / b.len() as f64
        + weights[2] * (m - transpositions) / m
}

fn common_prefix_length(a: &[char], b: &[char], cap: usize) -> usize {
    a.iter()
        .zip(b)
        .take(cap)
        .take_while(|(x, y)| x == y)
        .count()
}

/// Jaro distance.
#[derive(Debug, Clone, Copy)]
pub struct Jaro {
    weights: [f64; 3],
}

impl Jaro {
    /// Custom term weights; they must be non-negative and sum to 1.0.
    pub fn new(weights: [f64; 3]) -> Result<Self> {
        validate::check_jaro_weights(&weights)?;
        Ok(Self { weights })
    }
}

impl Default for Jaro {
    fn default() -> Self {
        Self {
            weights: DEFAULT_JARO_WEIGHTS,
        }
    }
}

impl Metric for Jaro {
    fn distance(&self, a: &str, b: &str) -> Result<f64> {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        Ok(1.0 - jaro_similarity(&a, &b, &self.weights))
    }
}

/// Jaro-Winkler distance: Jaro with a boost for a shared prefix.
///
/// The boost is `l * p * (1 - s)` where `l` is the common prefix length
/// capped at `max_l` and `p` is the scaling factor, constrained to
/// `[0.0, 0.25]` so the similarity stays within `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct JaroWinkler {
    p: f64,
    max_l: usize,
    weights: [f64; 3],
}

impl JaroWinkler {
    /// Prefix scaling `p` with the default prefix cap of 4 and canonical
    /// Jaro weights.
    pub fn new(p: f64) -> Result<Self> {
        Self::with_weights(p, 4, DEFAULT_JARO_WEIGHTS)
    }

    pub fn with_weights(p: f64, max_l: usize, weights: [f64; 3]) -> Result<Self> {
        validate::check_winkler_scaling(p)?;
        validate::check_jaro_weights(&weights)?;
        Ok(Self { p, max_l, weights })
    }
}

impl Metric for JaroWinkler {
    fn distance(&self, a: &str, b: &str) -> Result<f64> {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let similarity = jaro_similarity(&a, &b, &self.weights);
        let prefix = common_prefix_length(&a, &b, self.max_l) as f64;
        let boosted = similarity + prefix * self.p * (1.0 - similarity);
        Ok(1.0 - boosted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeqDistError;
    use crate::pairwise::pairwise;

    fn round4(value: f64) -> f64 {
        (value * 1e4).round() / 1e4
    }

    #[test]
    fn test_jaro_batch() {
        let metric = Jaro::default();
        let distances = pairwise(&["AASQ", "PASQ"], &metric).unwrap();
        assert_eq!(round4(distances[0]), 0.1667);
    }

    #[test]
    fn test_jaro_pairs() {
        let metric = Jaro::default();
        assert_eq!(metric.distance("AASQ", "AASQ").unwrap(), 0.0);
        assert_eq!(
            round4(metric.distance("CASSLKPNTEAFF", "CASSAHIANYGYTF").unwrap()),
            0.3336
        );
        assert_eq!(round4(metric.distance("GTA", "HLA").unwrap()), 0.4444);
        assert_eq!(metric.distance("GTA", "KKR").unwrap(), 1.0);
    }

    #[test]
    fn test_jaro_custom_weights() {
        let metric = Jaro::new([0.5, 0.25, 0.25]).unwrap();
        assert_eq!(round4(metric.distance("AASQ", "PASQ").unwrap()), 0.1875);
        assert_eq!(metric.distance("AASQ", "AASQ").unwrap(), 0.0);
    }

    #[test]
    fn test_jaro_weight_validation() {
        assert!(matches!(
            Jaro::new([0.5, 0.5, 0.5]).unwrap_err(),
            SeqDistError::InvalidConfig(_)
        ));
        assert!(matches!(
            Jaro::new([-0.1, 0.6, 0.5]).unwrap_err(),
            SeqDistError::InvalidConfig(_)
        ));
    }

    #[test]
    fn test_jaro_winkler_pair() {
        let metric = JaroWinkler::new(0.10).unwrap();
        assert_eq!(
            round4(metric.distance("CASSLKPNTEAFF", "CASSAHIANYGYTF").unwrap()),
            0.2001
        );
        assert_eq!(metric.distance("CASSF", "CASSF").unwrap(), 0.0);
    }

    #[test]
    fn test_jaro_winkler_without_common_prefix_is_jaro() {
        let winkler = JaroWinkler::new(0.10).unwrap();
        let jaro = Jaro::default();
        assert_eq!(
            winkler.distance("AASQ", "PASQ").unwrap(),
            jaro.distance("AASQ", "PASQ").unwrap()
        );
    }

    #[test]
    fn test_jaro_winkler_zero_scaling_is_jaro() {
        let winkler = JaroWinkler::new(0.0).unwrap();
        let jaro = Jaro::default();
        assert_eq!(
            winkler.distance("CASSLKPNTEAFF", "CASSAHIANYGYTF").unwrap(),
            jaro.distance("CASSLKPNTEAFF", "CASSAHIANYGYTF").unwrap()
        );
    }

    #[test]
    fn test_jaro_winkler_prefix_cap() {
        let capped = JaroWinkler::with_weights(0.10, 2, DEFAULT_JARO_WEIGHTS).unwrap();
        assert_eq!(round4(capped.distance("CASSF", "CASSY").unwrap()), 0.1067);
        let full = JaroWinkler::new(0.10).unwrap();
        assert_eq!(round4(full.distance("CASSF", "CASSY").unwrap()), 0.08);
    }

    #[test]
    fn test_jaro_winkler_param_validation() {
        assert!(matches!(
            JaroWinkler::new(0.30).unwrap_err(),
            SeqDistError::InvalidConfig(_)
        ));
        assert!(matches!(
            JaroWinkler::new(-0.05).unwrap_err(),
            SeqDistError::InvalidConfig(_)
        ));
    }
}
