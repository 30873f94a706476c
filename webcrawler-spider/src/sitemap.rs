use crate::result::PageDetails;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::warn;

/// Crawled page URL to the details found on that page.
///
/// Keys are sorted, so two crawls of the same site serialize identically
/// regardless of the order pages completed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteMap {
    pages: BTreeMap<String, PageDetails>,
}

impl SiteMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&PageDetails> {
        self.pages.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageDetails)> {
        self.pages.iter().map(|(url, details)| (url.as_str(), details))
    }

    pub fn into_inner(self) -> BTreeMap<String, PageDetails> {
        self.pages
    }
}

impl FromIterator<(String, PageDetails)> for SiteMap {
    fn from_iter<I: IntoIterator<Item = (String, PageDetails)>>(iter: I) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}

/// Collects page details from concurrent crawl tasks.
#[derive(Debug, Default)]
pub struct SiteMapAssembler {
    pages: Mutex<BTreeMap<String, PageDetails>>,
}

impl SiteMapAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the details of `url`. A second put for the same URL is ignored.
    pub async fn put(&self, url: String, details: PageDetails) {
        let mut pages = self.pages.lock().await;
        if pages.contains_key(&url) {
            warn!("Ignoring duplicate page details for {}", url);
            return;
        }
        pages.insert(url, details);
    }

    /// Freezes the assembled map. Taking `self` by value means every writer
    /// has already released its handle.
    pub fn into_site_map(self) -> SiteMap {
        SiteMap {
            pages: self.pages.into_inner(),
        }
    }
}
