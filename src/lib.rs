//! Pairwise distances between immunoglobulin and T-cell receptor CDR
//! sequences.
//!
//! Eight kernels are provided: [`CdrDist`] (affine-gap alignment scoring
//! against a BLOSUM matrix), [`Levenshtein`], [`Hamming`], [`Jaro`],
//! [`JaroWinkler`], [`LongestCommonSubstring`], [`OptimalStringAlignment`],
//! and [`TcrDistComponent`], plus the [`TcrDist`] composite that sums
//! weighted component distances across CDR regions. Every kernel computes
//! either a single pair or, through the rayon-parallel [`pairwise`] driver,
//! the condensed vector of all `n * (n - 1) / 2` pair distances in a fixed
//! order.
//!
//! ```
//! use seqdist::{pairwise, to_square, Levenshtein, Metric};
//!
//! let sequences = ["CASSLKPNTEAFF", "CASSAHIANYGYTF", "CASRGATETQYF"];
//! let metric = Levenshtein::default();
//!
//! let condensed = pairwise(&sequences, &metric)?;
//! assert_eq!(condensed.len(), 3);
//! assert_eq!(condensed[0], metric.distance(sequences[0], sequences[1])?);
//!
//! let square = to_square(&condensed, sequences.len())?;
//! assert_eq!(square[0][1], condensed[0]);
//! # Ok::<(), seqdist::SeqDistError>(())
//! ```

pub mod alignment;
pub mod edit;
pub mod error;
pub mod jaro;
pub mod pairwise;
pub mod substitution;
pub mod tcrdist;
mod validate;

pub use alignment::CdrDist;
pub use edit::{Hamming, Levenshtein, LongestCommonSubstring, OptimalStringAlignment};
pub use error::{Result, SeqDistError};
pub use jaro::{Jaro, JaroWinkler, DEFAULT_JARO_WEIGHTS};
pub use pairwise::{condensed_index, num_pairs, pairwise, to_flat, to_square, Metric};
pub use substitution::{SubstitutionMatrix, TokenScores, BLOSUM45, BLOSUM62, BLOSUM90};
pub use tcrdist::{Record, TcrDist, TcrDistComponent};
