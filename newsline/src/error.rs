use thiserror::Error;

pub use crate::timestamp::TimestampParseError;

/// Failures that end a run before any timeline is assembled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("News data could not be loaded: {0}")]
    DocumentUnavailable(String),

    #[error("JSON data is not a valid list of themes: {0}")]
    InvalidStructure(String),

    #[error("JSON data is an empty list")]
    Empty,
}

pub type Result<T> = std::result::Result<T, FeedError>;
