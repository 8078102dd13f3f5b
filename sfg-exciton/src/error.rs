use amide::error::AmideError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SfgError {
    #[error("{0}")]
    Core(#[from] AmideError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a rotation-tensor database (bad magic)")]
    BadMagic,

    #[error("unrecognized rotation database dimensions {dims:?}")]
    UnrecognizedShape { dims: [u64; 4] },

    #[error("rotation database truncated: expected {expected} doubles, file holds {found}")]
    Truncated { expected: u64, found: u64 },

    #[error("eigensolver failed: {0}")]
    Eigensolver(String),
}
