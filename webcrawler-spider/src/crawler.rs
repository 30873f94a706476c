use crate::error::{Result, SpiderError};
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::normalize::{is_same_host, normalize};
use crate::parser::extract_links;
use crate::registry::VisitedRegistry;
use crate::sitemap::{SiteMap, SiteMapAssembler};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

/// Called after each page is mapped with the running page count and the page URL.
pub type ProgressCallback = Arc<dyn Fn(usize, &str) + Send + Sync>;

/// Per-crawl shared state. Created fresh by every [`Crawler::crawl`] call.
#[derive(Default)]
struct CrawlState {
    visited: VisitedRegistry,
    site_map: SiteMapAssembler,
    pages_mapped: AtomicUsize,
    pages_failed: AtomicUsize,
}

pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    progress_callback: Option<ProgressCallback>,
    shutdown: Arc<AtomicBool>,
}

impl Crawler {
    /// Crawler backed by an [`HttpFetcher`] with default settings.
    pub fn new() -> Result<Self> {
        Ok(Self::with_fetcher(Arc::new(HttpFetcher::new()?)))
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            progress_callback: None,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Shares a cancellation flag with the caller. Once it is set no queued
    /// page is started; pages already in flight finish and are kept.
    pub fn with_shutdown_flag(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Maps every page reachable from `seed` through same-host links, with at
    /// most `concurrency` pages being fetched and parsed at once.
    ///
    /// Pages that fail to fetch are left out of the result and not retried.
    pub async fn crawl(&self, seed: &Url, concurrency: usize) -> Result<SiteMap> {
        if concurrency == 0 {
            return Err(SpiderError::InvalidConcurrency(concurrency));
        }

        let seed_key = normalize(seed);
        let mut seed = seed.clone();
        seed.set_fragment(None);
        info!("Starting crawl of {} with {} workers", seed_key, concurrency);

        let state = Arc::new(CrawlState::default());
        state.visited.try_claim(&seed_key).await;

        // Claimed pages waiting for a free slot. A page stays in `in_flight`
        // until its newly claimed links have been handed back, so both being
        // empty means the crawl is done.
        let mut frontier = VecDeque::from([seed]);
        let mut in_flight: JoinSet<Vec<Url>> = JoinSet::new();

        loop {
            while in_flight.len() < concurrency && !self.is_shutting_down() {
                let Some(url) = frontier.pop_front() else {
                    break;
                };
                let fetcher = self.fetcher.clone();
                let state = state.clone();
                let progress_cb = self.progress_callback.clone();
                in_flight.spawn(async move {
                    Self::map_page(fetcher.as_ref(), &state, url, progress_cb.as_ref()).await
                });
            }

            match in_flight.join_next().await {
                Some(Ok(claimed)) => {
                    debug!(
                        "Queued {} new pages ({} pending, {} in flight)",
                        claimed.len(),
                        frontier.len() + claimed.len(),
                        in_flight.len()
                    );
                    frontier.extend(claimed);
                }
                Some(Err(e)) => warn!("Crawl task failed: {}", e),
                None => break,
            }
        }

        if !frontier.is_empty() {
            info!("Crawl cancelled with {} pages never fetched", frontier.len());
        }

        let state = Arc::try_unwrap(state)
            .map_err(|_| SpiderError::Other("crawl state still shared after completion".into()))?;
        let visited = state.visited.len().await;
        let failed = state.pages_failed.load(Ordering::Relaxed);
        let site_map = state.site_map.into_site_map();

        info!(
            "Crawl complete. Mapped {} pages, {} failed, {} claimed",
            site_map.len(),
            failed,
            visited
        );
        Ok(site_map)
    }

    /// Fetches, parses and records one page, then claims its internal links.
    /// Returns the links this page won the claim for, as they were written.
    ///
    /// The page is keyed by the normalized form of `url` but fetched as
    /// given, and its links resolve against the URL the response came from.
    async fn map_page(
        fetcher: &dyn Fetcher,
        state: &CrawlState,
        url: Url,
        progress_callback: Option<&ProgressCallback>,
    ) -> Vec<Url> {
        let key = normalize(&url);

        let page = match fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Crawl error for {}: {}", key, e);
                state.pages_failed.fetch_add(1, Ordering::Relaxed);
                return Vec::new();
            }
        };

        let (details, targets) = extract_links(&page.url, &page.body);
        state.site_map.put(key.clone(), details).await;

        let mapped = state.pages_mapped.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(callback) = progress_callback {
            callback(mapped, &key);
        }

        let mut claimed = Vec::new();
        for target in targets {
            // A redirect may land on another host; its links stay off the crawl.
            if !is_same_host(&target, &url) {
                continue;
            }
            if state.visited.try_claim(&normalize(&target)).await {
                claimed.push(target);
            }
        }
        claimed
    }
}

/// Crawls `seed` over HTTP with default fetcher settings.
pub async fn crawl(seed: &Url, concurrency: usize) -> Result<SiteMap> {
    Crawler::new()?.crawl(seed, concurrency).await
}
