use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmideError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed PDB record at line {line}: {reason}")]
    Pdb { line: usize, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("requested {requested} amide sites but the structure provides {available}")]
    NotEnoughSites { available: usize, requested: usize },
}
