//! Canonical URL form shared by the visited registry and the site map.

use url::Url;

/// Renders `url` in the canonical form used as a crawl identity key.
///
/// The fragment is dropped, trailing slashes are removed from non-root paths,
/// and a bare root (`/` with no query) renders without its slash, so
/// `https://example.com`, `https://example.com/` and `https://example.com/#top`
/// all produce `https://example.com`.
pub fn normalize(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(if trimmed.is_empty() { "/" } else { &trimmed });
    }

    let has_query = url.query().is_some();
    let mut normalized: String = url.into();
    if !has_query && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Parses and normalizes a raw URL string.
pub fn normalize_str(raw: &str) -> Option<String> {
    Url::parse(raw).ok().map(|url| normalize(&url))
}

/// True when both URLs name the same host on the same effective port.
pub fn is_same_host(url: &Url, base: &Url) -> bool {
    match (url.host_str(), base.host_str()) {
        (Some(host), Some(base_host)) => {
            host == base_host && url.port_or_known_default() == base.port_or_known_default()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> String {
        normalize(&Url::parse(raw).unwrap())
    }

    #[test]
    fn test_root_with_and_without_slash_match() {
        assert_eq!(norm("https://example.com"), "https://example.com");
        assert_eq!(norm("https://example.com/"), "https://example.com");
    }

    #[test]
    fn test_fragment_dropped() {
        assert_eq!(norm("https://example.com/#top"), "https://example.com");
        assert_eq!(norm("https://example.com/page#a"), "https://example.com/page");
    }

    #[test]
    fn test_trailing_slash_stripped() {
        assert_eq!(norm("https://example.com/about/"), "https://example.com/about");
        assert_eq!(norm("https://example.com/docs//"), "https://example.com/docs");
        assert_eq!(norm("https://example.com//"), "https://example.com");
    }

    #[test]
    fn test_query_preserved() {
        assert_eq!(norm("https://example.com/?page=2"), "https://example.com/?page=2");
        assert_eq!(
            norm("https://example.com/search?next=/"),
            "https://example.com/search?next=/"
        );
    }

    #[test]
    fn test_host_lowercased() {
        assert_eq!(norm("HTTPS://Example.COM/About"), "https://example.com/About");
    }

    #[test]
    fn test_port_kept() {
        assert_eq!(norm("http://127.0.0.1:8080/"), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_normalize_str_invalid() {
        assert_eq!(normalize_str("not a url"), None);
        assert_eq!(
            normalize_str("https://example.com/blog/"),
            Some("https://example.com/blog".to_string())
        );
    }

    #[test]
    fn test_same_host() {
        let base = Url::parse("https://example.com/").unwrap();
        assert!(is_same_host(&Url::parse("https://example.com/a").unwrap(), &base));
        assert!(is_same_host(&Url::parse("https://example.com:443/a").unwrap(), &base));
        assert!(!is_same_host(&Url::parse("https://google.com").unwrap(), &base));
        assert!(!is_same_host(&Url::parse("https://blog.example.com").unwrap(), &base));
        assert!(!is_same_host(&Url::parse("https://example.com:8443/").unwrap(), &base));
    }
}
