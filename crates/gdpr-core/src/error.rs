use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Traversal aborted after visiting {0} entities")]
    NodeLimit(usize),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
