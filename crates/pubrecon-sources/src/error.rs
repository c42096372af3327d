use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    Api(String, String),

    #[error("rate limit from {0}, retry after {1}s")]
    RateLimit(String, u64),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("authentication with {0} failed: {1}")]
    Auth(String, String),

    #[error("missing credentials: {0}")]
    MissingCredentials(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;
