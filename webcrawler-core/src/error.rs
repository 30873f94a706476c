use thiserror::Error;
use webcrawler_spider::SpiderError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Crawl failed: {0}")]
    Crawl(#[from] SpiderError),

    #[error("Could not serialize site map: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
