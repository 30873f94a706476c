use crate::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tracing::info;
use url::Url;
use webcrawler_spider::{Crawler, FetcherConfig, HttpFetcher, ProgressCallback, SiteMap};

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub url: Url,
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub show_progress: bool,
    /// Raised by the caller to stop the crawl early; the partial map is returned.
    pub shutdown: Option<Arc<AtomicBool>>,
}

impl CrawlOptions {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            concurrency: 10,
            timeout_secs: 30,
            show_progress: false,
            shutdown: None,
        }
    }

    fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig::default()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_pool_size(self.concurrency)
    }
}

/// Short label for a page key in progress output: its path and query,
/// or the key itself when it is not a URL.
pub fn page_label(key: &str) -> String {
    match Url::parse(key) {
        Ok(url) => match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        },
        Err(_) => key.to_string(),
    }
}

/// Crawl `options.url` over HTTP and return its site map
pub async fn execute_crawl(options: CrawlOptions) -> Result<SiteMap> {
    let fetcher = HttpFetcher::with_config(&options.fetcher_config())?;

    // Single spinner for overall progress (hidden when stderr is not a terminal)
    let progress_bar = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let mut crawler = Crawler::with_fetcher(Arc::new(fetcher));

    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let progress_callback: ProgressCallback = Arc::new(move |count: usize, url: &str| {
            pb_clone.set_message(format!("Crawling... {} pages mapped, last {}", count, page_label(url)));
        });
        crawler = crawler.with_progress_callback(progress_callback);
    }

    if let Some(shutdown) = options.shutdown.clone() {
        crawler = crawler.with_shutdown_flag(shutdown);
    }

    info!(
        "Crawling {} with concurrency {} and a {}s request timeout",
        options.url, options.concurrency, options.timeout_secs
    );
    let result = crawler.crawl(&options.url, options.concurrency).await;

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    Ok(result?)
}
