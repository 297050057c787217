use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SeqDistError};

const REQUIRED_KEYS: [&str; 2] = ["index", "substitution_matrix"];

#[derive(Debug, Deserialize)]
struct RawMatrix {
    index: HashMap<String, usize>,
    substitution_matrix: Vec<Vec<f64>>,
}

/// Scores supplied for a token appended with [`SubstitutionMatrix::add_token`].
#[derive(Debug, Clone)]
pub enum TokenScores {
    /// Broadcast one score into the whole new row and column.
    Uniform(f64),
    /// Explicit scores against every existing token, with the self-score as
    /// the final element (length `n + 1`).
    Row(Vec<f64>),
}

/// Symmetric scoring table over a single-character token alphabet.
///
/// Holds a token index and an `n x n` score matrix, as used by the BLOSUM
/// family. Instances are immutable once constructed; [`Self::add_token`]
/// produces an extended copy. Lookups are constant time and the matrix can
/// be shared across worker threads by reference.
#[derive(Debug, Clone)]
pub struct SubstitutionMatrix {
    index: HashMap<char, usize>,
    matrix: Vec<Vec<f64>>,
}

impl SubstitutionMatrix {
    /// Build a matrix from an explicit token index and score table.
    pub fn new(index: HashMap<char, usize>, matrix: Vec<Vec<f64>>) -> Result<Self> {
        let n = index.len();
        if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
            return Err(SeqDistError::InvalidConfig(format!(
                "substitution matrix must be {n}x{n} to match the token index"
            )));
        }
        if matrix.iter().flatten().any(|score| !score.is_finite()) {
            return Err(SeqDistError::InvalidConfig(
                "substitution scores must be finite".into(),
            ));
        }
        let mut seen = vec![false; n];
        for &position in index.values() {
            if position >= n || seen[position] {
                return Err(SeqDistError::InvalidConfig(
                    "token index positions must be a permutation of 0..n".into(),
                ));
            }
            seen[position] = true;
        }
        Ok(Self { index, matrix })
    }

    /// Parse a matrix from its JSON representation.
    ///
    /// The document must carry the keys `index` (single-character token to
    /// matrix position) and `substitution_matrix` (`n x n` numbers); any
    /// additional keys are ignored.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let object = value.as_object().ok_or_else(|| {
            SeqDistError::InvalidConfig("substitution matrix data must be a JSON object".into())
        })?;
        for key in REQUIRED_KEYS {
            if !object.contains_key(key) {
                return Err(SeqDistError::MissingKey(key.to_string()));
            }
        }

        let raw: RawMatrix = serde_json::from_value(value)?;
        let mut index = HashMap::with_capacity(raw.index.len());
        for (token, position) in raw.index {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    index.insert(c, position);
                }
                _ => {
                    return Err(SeqDistError::InvalidConfig(format!(
                        "index tokens must be single characters, got {token:?}"
                    )))
                }
            }
        }
        Self::new(index, raw.substitution_matrix)
    }

    /// Load a matrix from a JSON file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Number of tokens in the index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether `token` is part of the alphabet.
    pub fn contains(&self, token: char) -> bool {
        self.index.contains_key(&token)
    }

    /// Score for substituting `a` with `b`.
    pub fn score(&self, a: char, b: char) -> Result<f64> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        Ok(self.matrix[i][j])
    }

    pub(crate) fn position(&self, token: char) -> Result<usize> {
        self.index
            .get(&token)
            .copied()
            .ok_or(SeqDistError::UnknownToken(token))
    }

    /// Map a sequence onto matrix positions, one per character.
    pub(crate) fn encode(&self, sequence: &str) -> Result<Vec<usize>> {
        sequence.chars().map(|c| self.position(c)).collect()
    }

    /// Score lookup for pre-encoded positions.
    pub(crate) fn score_at(&self, i: usize, j: usize) -> f64 {
        self.matrix[i][j]
    }

    /// Return a copy of the matrix extended with `token`.
    ///
    /// With [`TokenScores::Uniform`] the score is broadcast into the new row
    /// and column; with [`TokenScores::Row`] the first `n` values are
    /// appended symmetrically and the last is the self-score.
    pub fn add_token(&self, token: char, scores: TokenScores) -> Result<Self> {
        let mut extended = self.clone();
        extended.add_token_in_place(token, scores)?;
        Ok(extended)
    }

    /// In-place variant of [`Self::add_token`].
    pub fn add_token_in_place(&mut self, token: char, scores: TokenScores) -> Result<()> {
        if self.index.contains_key(&token) {
            return Err(SeqDistError::TokenExists(token));
        }
        let n = self.matrix.len();
        let new_row = match scores {
            TokenScores::Uniform(value) => {
                if !value.is_finite() {
                    return Err(SeqDistError::InvalidConfig(
                        "substitution scores must be finite".into(),
                    ));
                }
                for row in &mut self.matrix {
                    row.push(value);
                }
                vec![value; n + 1]
            }
            TokenScores::Row(values) => {
                if values.len() != n + 1 {
                    return Err(SeqDistError::DimensionMismatch {
                        expected: n + 1,
                        got: values.len(),
                    });
                }
                if values.iter().any(|value| !value.is_finite()) {
                    return Err(SeqDistError::InvalidConfig(
                        "substitution scores must be finite".into(),
                    ));
                }
                for (row, &value) in self.matrix.iter_mut().zip(&values) {
                    row.push(value);
                }
                values
            }
        };
        self.matrix.push(new_row);
        self.index.insert(token, n);
        Ok(())
    }
}

lazy_static::lazy_static! {
    /// BLOSUM45 scores over the 20 standard amino acids.
    pub static ref BLOSUM45: SubstitutionMatrix =
        SubstitutionMatrix::from_json(include_str!("../data/blosum-45.json"))
            .expect("embedded BLOSUM45 data is valid");

    /// BLOSUM62 scores over the 20 standard amino acids.
    pub static ref BLOSUM62: SubstitutionMatrix =
        SubstitutionMatrix::from_json(include_str!("../data/blosum-62.json"))
            .expect("embedded BLOSUM62 data is valid");

    /// BLOSUM90 scores over the 20 standard amino acids.
    pub static ref BLOSUM90: SubstitutionMatrix =
        SubstitutionMatrix::from_json(include_str!("../data/blosum-90.json"))
            .expect("embedded BLOSUM90 data is valid");
}
