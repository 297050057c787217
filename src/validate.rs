//! Precondition guards shared by the kernels. Checks run at entry points,
//! before any pair is scheduled.

use crate::error::{Result, SeqDistError};

const JARO_WEIGHT_TOLERANCE: f64 = 1e-9;

/// Batch form of the equal-length precondition: every sequence must share
/// one common length.
pub(crate) fn ensure_uniform_length<S: AsRef<str>>(sequences: &[S]) -> Result<()> {
    let mut lengths = sequences.iter().map(|s| s.as_ref().chars().count());
    let first = match lengths.next() {
        Some(len) => len,
        None => return Ok(()),
    };
    if lengths.any(|len| len != first) {
        return Err(SeqDistError::ShapeMismatch(
            "sequences must be of equal length".into(),
        ));
    }
    Ok(())
}

pub(crate) fn ensure_equal_length(a: &[char], b: &[char]) -> Result<()> {
    if a.len() != b.len() {
        return Err(SeqDistError::ShapeMismatch(format!(
            "sequences must be of equal length, got {} and {}",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

/// Jaro weights must be three non-negative reals summing to 1.0 (within a
/// small tolerance, so the canonical thirds pass exactly).
pub(crate) fn check_jaro_weights(weights: &[f64; 3]) -> Result<()> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(SeqDistError::InvalidConfig(
            "jaro weights must be non-negative reals".into(),
        ));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > JARO_WEIGHT_TOLERANCE {
        return Err(SeqDistError::InvalidConfig(format!(
            "jaro weights must sum to 1.0, got {sum}"
        )));
    }
    Ok(())
}

pub(crate) fn check_winkler_scaling(p: f64) -> Result<()> {
    if !p.is_finite() || !(0.0..=0.25).contains(&p) {
        return Err(SeqDistError::InvalidConfig(format!(
            "prefix scaling factor `p` must be in [0.0, 0.25], got {p}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_length() {
        assert!(ensure_uniform_length(&["AASQ", "PASQ"]).is_ok());
        assert!(ensure_uniform_length::<&str>(&[]).is_ok());
        assert!(ensure_uniform_length(&["GAT", "AAFFD"]).is_err());
    }

    #[test]
    fn test_jaro_weights() {
        assert!(check_jaro_weights(&[1.0 / 3.0; 3]).is_ok());
        assert!(check_jaro_weights(&[0.5, 0.25, 0.25]).is_ok());
        assert!(check_jaro_weights(&[0.5, 0.5, 0.5]).is_err());
        assert!(check_jaro_weights(&[-0.5, 1.0, 0.5]).is_err());
        assert!(check_jaro_weights(&[f64::NAN, 0.5, 0.5]).is_err());
    }

    #[test]
    fn test_winkler_scaling() {
        assert!(check_winkler_scaling(0.0).is_ok());
        assert!(check_winkler_scaling(0.25).is_ok());
        assert!(check_winkler_scaling(0.26).is_err());
        assert!(check_winkler_scaling(-0.01).is_err());
    }
}
