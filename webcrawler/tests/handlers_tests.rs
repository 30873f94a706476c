use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tempfile::tempdir;
use url::Url;
use webcrawler::commands::command_argument_builder;
use webcrawler::handlers::*;
use webcrawler_core::OutputStyle;
use webcrawler_spider::{PageDetails, SiteMap};

fn settings_from(args: &[&str]) -> Result<CrawlSettings, String> {
    let matches = command_argument_builder()
        .try_get_matches_from(args)
        .expect("arguments should parse");
    CrawlSettings::from_matches(&matches)
}

// ============================================================================
// Seed URL validation
// ============================================================================

#[test]
fn test_parse_seed_url_https() {
    let url = parse_seed_url("https://example.com").unwrap();
    assert_eq!(url.host_str(), Some("example.com"));
}

#[test]
fn test_parse_seed_url_trims_whitespace() {
    let url = parse_seed_url("  http://example.com/blog  ").unwrap();
    assert_eq!(url.path(), "/blog");
}

#[test]
fn test_parse_seed_url_relative_rejected() {
    let err = parse_seed_url("/about").unwrap_err();
    assert!(err.contains("Could not validate url '/about'"));
}

#[test]
fn test_parse_seed_url_without_scheme_rejected() {
    assert!(parse_seed_url("example.com").is_err());
}

#[test]
fn test_parse_seed_url_unsupported_scheme() {
    let err = parse_seed_url("ftp://example.com/files").unwrap_err();
    assert!(err.contains("Unsupported scheme 'ftp'"));
}

#[test]
fn test_parse_seed_url_garbage() {
    assert!(parse_seed_url("not a valid url!!!").is_err());
}

// ============================================================================
// Argument handling
// ============================================================================

#[test]
fn test_settings_defaults() {
    let settings = settings_from(&["webcrawler", "https://example.com"]).unwrap();

    assert_eq!(settings.url, Url::parse("https://example.com").unwrap());
    assert_eq!(settings.concurrency, 10);
    assert_eq!(settings.timeout_secs, 30);
    assert_eq!(settings.style, OutputStyle::Indented);
    assert!(!settings.debug);
    assert!(!settings.quiet);
    assert!(settings.output.is_none());
}

#[test]
fn test_settings_all_flags() {
    let settings = settings_from(&[
        "webcrawler",
        "--concurrency",
        "3",
        "--debug",
        "--no-indent",
        "--timeout",
        "5",
        "--output",
        "/tmp/sitemap.json",
        "--quiet",
        "https://example.com",
    ])
    .unwrap();

    assert_eq!(settings.concurrency, 3);
    assert!(settings.debug);
    assert_eq!(settings.style, OutputStyle::Compact);
    assert_eq!(settings.timeout_secs, 5);
    assert_eq!(settings.output, Some(PathBuf::from("/tmp/sitemap.json")));
    assert!(settings.quiet);
}

#[test]
fn test_settings_invalid_url() {
    let err = settings_from(&["webcrawler", "not-a-url"]).unwrap_err();
    assert!(err.starts_with("Could not validate url 'not-a-url'"));
}

#[test]
fn test_zero_concurrency_rejected_by_parser() {
    let result =
        command_argument_builder().try_get_matches_from(["webcrawler", "-c", "0", "https://example.com"]);
    assert!(result.is_err());
}

#[test]
fn test_missing_url_rejected_by_parser() {
    let result = command_argument_builder().try_get_matches_from(["webcrawler"]);
    assert!(result.is_err());
}

#[test]
fn test_resolve_output_path_plain() {
    assert_eq!(
        resolve_output_path("out/sitemap.json"),
        PathBuf::from("out/sitemap.json")
    );
}

#[test]
fn test_resolve_output_path_tilde() {
    let resolved = resolve_output_path("~/sitemap.json");
    assert!(!resolved.starts_with("~"));
    assert!(resolved.ends_with("sitemap.json"));
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_emit_site_map_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("sitemap.json");
    let site_map: SiteMap = [("https://example.com".to_string(), PageDetails::new())]
        .into_iter()
        .collect();

    emit_site_map(&site_map, OutputStyle::Compact, Some(&path))?;

    let written = fs::read_to_string(&path)?;
    assert_eq!(
        written,
        "{\"https://example.com\":{\"Assets\":[],\"InternalLinks\":[],\"ExternalLinks\":[]}}\n"
    );
    Ok(())
}

#[test]
fn test_emit_site_map_unwritable_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("sitemap.json");

    let err = emit_site_map(&SiteMap::new(), OutputStyle::Indented, Some(&path)).unwrap_err();
    assert!(format!("{}", err).starts_with("Could not write site map to"));
}

#[tokio::test]
async fn test_run_crawl_unreachable_site_writes_empty_map() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sitemap.json");
    let settings = CrawlSettings {
        url: Url::parse("http://127.0.0.1:1/").unwrap(),
        concurrency: 2,
        debug: false,
        style: OutputStyle::Compact,
        timeout_secs: 2,
        output: Some(path.clone()),
        quiet: true,
    };

    let summary = run_crawl(&settings).await.unwrap();

    assert_eq!(summary.pages, 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
}

// ============================================================================
// Interrupt handling
// ============================================================================

#[tokio::test]
async fn test_first_interrupt_raises_shutdown() {
    let shutdown = Arc::new(AtomicBool::new(false));
    let mut signals = 0;
    let watcher = watch_interrupts(
        || {
            signals += 1;
            let first = signals == 1;
            async move {
                if first {
                    Ok(())
                } else {
                    std::future::pending::<io::Result<()>>().await
                }
            }
        },
        shutdown.clone(),
    );

    let finished = tokio::time::timeout(Duration::from_millis(50), watcher).await;

    assert!(finished.is_err(), "watcher should wait for a second signal");
    assert!(shutdown.load(Ordering::Relaxed));
}

#[tokio::test]
async fn test_second_interrupt_requests_exit() {
    let shutdown = Arc::new(AtomicBool::new(false));
    let force_quit = watch_interrupts(|| async { Ok(()) }, shutdown.clone()).await;

    assert!(force_quit);
    assert!(shutdown.load(Ordering::Relaxed));
}

#[tokio::test]
async fn test_unavailable_signal_leaves_crawl_running() {
    let shutdown = Arc::new(AtomicBool::new(false));
    let force_quit = watch_interrupts(
        || async { Err(io::Error::other("no signal handler")) },
        shutdown.clone(),
    )
    .await;

    assert!(!force_quit);
    assert!(!shutdown.load(Ordering::Relaxed));
}
