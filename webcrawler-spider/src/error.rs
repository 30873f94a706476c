use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpiderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    StatusError { url: String, status: u16 },

    #[error("{url} is not an HTML document ({content_type})")]
    NotHtml { url: String, content_type: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Concurrency must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Other error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SpiderError>;
