use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid ORCID iD: {0}")]
    InvalidOrcid(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
