use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeqDistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("token {0:?} is not in the substitution matrix index")]
    UnknownToken(char),

    #[error("missing input field(s): {0}")]
    MissingField(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("required key {0:?} missing from substitution matrix data")]
    MissingKey(String),

    #[error("token {0:?} is already in the substitution matrix index")]
    TokenExists(char),

    #[error("expected {expected} scores for the new token, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, SeqDistError>;
