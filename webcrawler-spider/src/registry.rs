use std::collections::HashSet;
use tokio::sync::Mutex;

/// URLs already claimed for fetching during one crawl.
///
/// Keys are expected in [`normalize`](crate::normalize::normalize)d form.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    claimed: Mutex<HashSet<String>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for this caller. Returns true only for the first claim.
    pub async fn try_claim(&self, url: &str) -> bool {
        let mut claimed = self.claimed.lock().await;
        if claimed.contains(url) {
            return false;
        }
        claimed.insert(url.to_string())
    }

    pub async fn len(&self) -> usize {
        self.claimed.lock().await.len()
    }
}
