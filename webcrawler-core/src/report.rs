// Site map rendering and summaries

use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use webcrawler_spider::SiteMap;

/// JSON layout of a rendered site map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    /// No whitespace between tokens.
    Compact,
    /// One space of indentation per nesting level.
    #[default]
    Indented,
}

impl OutputStyle {
    pub fn from_indent_flag(no_indent: bool) -> Self {
        if no_indent {
            OutputStyle::Compact
        } else {
            OutputStyle::Indented
        }
    }
}

/// Counts across a finished site map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SiteMapSummary {
    pub pages: usize,
    pub assets: usize,
    pub internal_links: usize,
    pub external_links: usize,
}

pub fn render_site_map(site_map: &SiteMap, style: OutputStyle) -> Result<String> {
    let rendered = match style {
        OutputStyle::Compact => serde_json::to_string(site_map)?,
        OutputStyle::Indented => {
            let mut buf = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
            site_map.serialize(&mut serializer)?;
            // serde_json only emits valid UTF-8
            String::from_utf8_lossy(&buf).into_owned()
        }
    };
    Ok(rendered)
}

/// Writes the rendered site map to `path`, followed by a newline.
pub fn write_site_map(site_map: &SiteMap, style: OutputStyle, path: &Path) -> Result<()> {
    let rendered = render_site_map(site_map, style)?;
    let mut file = File::create(path)?;
    file.write_all(rendered.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

pub fn summarize(site_map: &SiteMap) -> SiteMapSummary {
    site_map
        .iter()
        .fold(SiteMapSummary::default(), |mut summary, (_, details)| {
            summary.pages += 1;
            summary.assets += details.assets.len();
            summary.internal_links += details.internal_links.len();
            summary.external_links += details.external_links.len();
            summary
        })
}

pub fn generate_summary_line(summary: &SiteMapSummary) -> String {
    format!(
        "{} pages mapped ({} assets, {} internal links, {} external links)",
        summary.pages, summary.assets, summary.internal_links, summary.external_links
    )
}
