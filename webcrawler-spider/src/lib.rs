pub mod crawler;
pub mod error;
pub mod fetcher;
pub mod normalize;
pub mod parser;
pub mod registry;
pub mod result;
pub mod sitemap;

pub use crawler::{Crawler, ProgressCallback, crawl};
pub use error::SpiderError;
pub use fetcher::{FetchedPage, Fetcher, FetcherConfig, HttpFetcher};
pub use parser::parse_page;
pub use registry::VisitedRegistry;
pub use result::PageDetails;
pub use sitemap::{SiteMap, SiteMapAssembler};
