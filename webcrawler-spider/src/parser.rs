//! Link extraction from fetched HTML documents.
//!
//! Parsing is fail-soft: `scraper` builds a best-effort tree from malformed
//! markup, and references that cannot be resolved are skipped rather than
//! failing the page.

use crate::normalize::{is_same_host, normalize};
use crate::result::PageDetails;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static REFERENCE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href], link[href], script[src], img[src]")
        .expect("static selector is valid")
});

static BASE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("base[href]").expect("static selector is valid"));

/// Extracts the assets and hyperlinks of `html`, fetched from `page`.
///
/// References resolve against the first `<base href>` when the document
/// declares one, otherwise against `page`. `<link href>`, `<script src>` and
/// `<img src>` are assets whatever their host. `<a href>` targets are internal
/// when they share `page`'s host and external otherwise. Each list keeps
/// document order, duplicates included.
pub fn parse_page(page: &Url, html: &str) -> PageDetails {
    extract_links(page, html).0
}

/// Like [`parse_page`], also returning the resolved internal link targets
/// with their fragment dropped but their path left as written, so they can
/// be fetched exactly as linked.
pub(crate) fn extract_links(page: &Url, html: &str) -> (PageDetails, Vec<Url>) {
    let document = Html::parse_document(html);
    let base = document_base(&document, page);
    let mut details = PageDetails::new();
    let mut targets = Vec::new();

    for element in document.select(&REFERENCE_SELECTOR) {
        let tag = element.value().name();
        let attr = match tag {
            "a" | "link" => "href",
            _ => "src",
        };
        let Some(raw) = element.value().attr(attr) else {
            continue;
        };
        let Some(mut resolved) = resolve_reference(&base, raw) else {
            debug!("Skipping reference {:?} on {}", raw, page);
            continue;
        };

        let normalized = normalize(&resolved);
        if tag != "a" {
            details.assets.push(normalized);
        } else if is_same_host(&resolved, page) {
            details.internal_links.push(normalized);
            resolved.set_fragment(None);
            targets.push(resolved);
        } else {
            details.external_links.push(normalized);
        }
    }

    (details, targets)
}

fn document_base(document: &Html, page: &Url) -> Url {
    document
        .select(&BASE_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page.join(href.trim()).ok())
        .filter(|base| matches!(base.scheme(), "http" | "https"))
        .unwrap_or_else(|| page.clone())
}

/// Resolves `href` against `base`, keeping only http(s) targets.
pub fn resolve_reference(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = base.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" if resolved.host_str().is_some() => Some(resolved),
        _ => None,
    }
}
