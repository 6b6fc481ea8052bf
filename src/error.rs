use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpendError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("No expense at position {0}")]
    UnknownPosition(usize),

    #[error("No expense with id {0}")]
    UnknownId(i64),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

/// Rejected form input. Raised before anything touches the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill all required fields ({0} is empty)")]
    MissingField(&'static str),

    #[error("Amount should be numeric, got '{0}'")]
    NonNumericAmount(String),
}

pub type Result<T> = std::result::Result<T, SpendError>;
