use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("file staging failed: {0}")]
    Staging(#[from] std::io::Error),
    #[error("inference failed: {0}")]
    Inference(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
