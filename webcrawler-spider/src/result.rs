use serde::{Deserialize, Serialize};

/// Links and assets found on one crawled page, each list in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageDetails {
    pub assets: Vec<String>,
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
}

impl PageDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link_count(&self) -> usize {
        self.internal_links.len() + self.external_links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty() && self.internal_links.is_empty() && self.external_links.is_empty()
    }
}
