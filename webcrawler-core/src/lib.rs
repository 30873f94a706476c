pub mod crawl;
pub mod error;
pub mod report;

pub use crawl::{CrawlOptions, execute_crawl, page_label};
pub use error::CoreError;
pub use report::{OutputStyle, SiteMapSummary, render_site_map, summarize, write_site_map};
