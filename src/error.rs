use thiserror::Error;

/// Errors surfaced by the scorer's callers, the aggregator and the local auth/storage layer.
#[derive(Debug, Error)]
pub enum TyperankError {
    /// Typed input is longer than the target text. Callers recover by ignoring the keystroke.
    #[error("input of {typed} characters exceeds target of {target} characters")]
    InvalidInput { typed: usize, target: usize },

    #[error("not authenticated: {0}")]
    Unauthenticated(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("invalid username: {0:?}")]
    InvalidUsername(String),

    #[error("username already taken: {0}")]
    UsernameTaken(String),

    #[error("text source unavailable: {0}")]
    TextSource(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TyperankError>;
