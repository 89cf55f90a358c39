use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("strategy {strategy} failed: {message}")]
    Strategy {
        strategy: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
