use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::level_filters::LevelFilter;
use tracing::warn;
use url::Url;
use webcrawler_core::report::{
    OutputStyle, SiteMapSummary, generate_summary_line, render_site_map, summarize,
};
use webcrawler_core::{CrawlOptions, execute_crawl};
use webcrawler_spider::SiteMap;

/// Settings for one `webcrawler` invocation, taken from the command line
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub url: Url,
    pub concurrency: usize,
    pub debug: bool,
    pub style: OutputStyle,
    pub timeout_secs: u64,
    pub output: Option<PathBuf>,
    pub quiet: bool,
}

impl CrawlSettings {
    /// Build settings from parsed arguments. Fails only on an unusable URL.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, String> {
        let raw_url = matches
            .get_one::<String>("URL")
            .ok_or_else(|| "A URL to crawl is required".to_string())?;
        let url = parse_seed_url(raw_url)?;

        Ok(Self {
            url,
            concurrency: *matches.get_one::<usize>("concurrency").unwrap_or(&10),
            debug: matches.get_flag("debug"),
            style: OutputStyle::from_indent_flag(matches.get_flag("no-indent")),
            timeout_secs: *matches.get_one::<u64>("timeout").unwrap_or(&30),
            output: matches
                .get_one::<String>("output")
                .map(|path| resolve_output_path(path)),
            quiet: matches.get_flag("quiet"),
        })
    }
}

/// Validate the seed URL: it must be absolute, http(s), and name a host
pub fn parse_seed_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim())
        .map_err(|e| format!("Could not validate url '{}'. {}.", raw, e))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!(
            "Could not validate url '{}'. Unsupported scheme '{}'.",
            raw,
            url.scheme()
        ));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(format!("Could not validate url '{}'. Missing host.", raw));
    }

    Ok(url)
}

/// Expand a leading `~` in an output path
pub fn resolve_output_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Install the stderr log subscriber; logging is off unless `debug` is set
pub fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// Write the rendered site map to `output`, or to stdout when none is given
pub fn emit_site_map(site_map: &SiteMap, style: OutputStyle, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => webcrawler_core::write_site_map(site_map, style, path)
            .with_context(|| format!("Could not write site map to {}", path.display())),
        None => {
            let rendered =
                render_site_map(site_map, style).context("Could not marshal site map into JSON")?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", rendered)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Raises `shutdown` on the first signal from `next_signal`. Returns true
/// once a second signal arrives, meaning the caller should quit at once.
pub async fn watch_interrupts<S, F>(mut next_signal: S, shutdown: Arc<AtomicBool>) -> bool
where
    S: FnMut() -> F,
    F: Future<Output = io::Result<()>>,
{
    if next_signal().await.is_err() {
        return false;
    }
    warn!("Interrupted, finishing pages already in flight");
    eprintln!(
        "{} finishing pages already in flight, press Ctrl-C again to quit",
        "Interrupted:".yellow().bold()
    );
    shutdown.store(true, Ordering::Relaxed);

    next_signal().await.is_ok()
}

/// Crawl, emit the site map and return its summary
pub async fn run_crawl(settings: &CrawlSettings) -> Result<SiteMapSummary> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let interrupt_flag = shutdown.clone();
    tokio::spawn(async move {
        if watch_interrupts(tokio::signal::ctrl_c, interrupt_flag).await {
            std::process::exit(130);
        }
    });

    let mut options = CrawlOptions::new(settings.url.clone());
    options.concurrency = settings.concurrency;
    options.timeout_secs = settings.timeout_secs;
    options.show_progress = !settings.quiet;
    options.shutdown = Some(shutdown);

    let site_map = execute_crawl(options).await.context("Crawl failed")?;
    emit_site_map(&site_map, settings.style, settings.output.as_deref())?;

    Ok(summarize(&site_map))
}

fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

pub async fn handle_crawl(matches: &ArgMatches, usage: &str) {
    let settings = match CrawlSettings::from_matches(matches) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", usage);
            print_error(&e);
            std::process::exit(1);
        }
    };

    init_logging(settings.debug);

    match run_crawl(&settings).await {
        Ok(summary) => {
            if !settings.quiet {
                eprintln!("{} {}", "✓".green().bold(), generate_summary_line(&summary));
            }
        }
        Err(e) => {
            print_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}
