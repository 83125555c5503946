//! Extraction request options.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::render::RenderOptions;

/// Option keys understood by [`ExtractOptions::from_map`].
pub const OPTION_PAGES: &str = "pages";
/// Output format option key.
pub const OPTION_OUTPUT_FORMAT: &str = "output_format";
/// Image payload option key.
pub const OPTION_INCLUDE_IMAGES: &str = "include_images";
/// Parallel processing option key.
pub const OPTION_PARALLEL: &str = "parallel";

/// Page selection for extraction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Several ranges, sorted by start (inclusive, 1-indexed)
    Ranges(Vec<RangeInclusive<u32>>),
}

static PAGE_PART_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn page_part_regex() -> Option<&'static Regex> {
    PAGE_PART_REGEX
        .get_or_init(|| Regex::new(r"^(\d+)(?:\s*-\s*(\d+))?$").ok())
        .as_ref()
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Ranges(ranges) => ranges.iter().any(|r| r.contains(&page)),
        }
    }

    /// Parse a page specification (e.g., "1-10", "1,3,5-10").
    ///
    /// An empty specification or "all" selects every page. Page 0, reversed
    /// ranges, and empty list items are rejected. Ranges are kept as bounds
    /// and only expanded by [`PageSelection::resolve`].
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        let mut parts = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            let caps = page_part_regex()
                .and_then(|re| re.captures(part))
                .ok_or_else(|| Error::InvalidPageRange(format!("cannot parse '{}' in '{}'", part, s)))?;

            let start = parse_page(&caps[1], s)?;
            let end = match caps.get(2) {
                Some(m) => parse_page(m.as_str(), s)?,
                None => start,
            };

            if start > end {
                return Err(Error::InvalidPageRange(format!(
                    "range {}-{} is reversed",
                    start, end
                )));
            }
            parts.push(start..=end);
        }

        if let [range] = parts.as_slice() {
            return Ok(PageSelection::Range(range.clone()));
        }

        parts.sort_by_key(|r| (*r.start(), *r.end()));
        parts.dedup();
        Ok(PageSelection::Ranges(parts))
    }

    /// Resolve against a document's page count into sorted, unique page numbers.
    ///
    /// Any page outside `1..=total` fails with [`Error::PageOutOfRange`]
    /// before anything is expanded.
    pub fn resolve(&self, total: u32) -> Result<Vec<u32>> {
        match self {
            PageSelection::All => {}
            PageSelection::Range(range) => check_range(range, total)?,
            PageSelection::Ranges(ranges) => {
                for range in ranges {
                    check_range(range, total)?;
                }
            }
        }
        Ok((1..=total).filter(|&page| self.includes(page)).collect())
    }
}

fn check_range(range: &RangeInclusive<u32>, total: u32) -> Result<()> {
    check_bounds(*range.start(), total)?;
    check_bounds(*range.end(), total)
}

fn parse_page(digits: &str, spec: &str) -> Result<u32> {
    let page: u32 = digits
        .parse()
        .map_err(|_| Error::InvalidPageRange(format!("page number '{}' in '{}' is too large", digits, spec)))?;
    if page == 0 {
        return Err(Error::InvalidPageRange(
            "page numbers start at 1".to_string(),
        ));
    }
    Ok(page)
}

fn check_bounds(page: u32, total: u32) -> Result<()> {
    if page == 0 || page > total {
        return Err(Error::PageOutOfRange(page, total));
    }
    Ok(())
}

/// Result shape requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Structured result model
    #[default]
    Structured,
    /// Rendered semantic markup
    Markup,
}

impl OutputFormat {
    /// Parse a format name (`json`/`structured` or `html`/`markup`).
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "structured" => Ok(OutputFormat::Structured),
            "html" | "markup" => Ok(OutputFormat::Markup),
            other => Err(Error::InvalidOption(format!(
                "unknown output format '{}'",
                other
            ))),
        }
    }
}

/// Per-request extraction options.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Pages to process
    pub pages: PageSelection,

    /// Result shape
    pub output_format: OutputFormat,

    /// Attach image payloads to image records
    pub include_images: bool,

    /// Analyze pages in parallel
    pub parallel: bool,

    /// Markup rendering options
    pub render: RenderOptions,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set the output format.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Request rendered markup.
    pub fn markup(mut self) -> Self {
        self.output_format = OutputFormat::Markup;
        self
    }

    /// Enable or disable image payloads.
    pub fn with_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }

    /// Enable or disable parallel page analysis.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set markup rendering options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Build from a string options map, as received from a transport layer.
    ///
    /// Unknown keys are ignored.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self> {
        let mut options = Self::default();

        if let Some(pages) = map.get(OPTION_PAGES) {
            options.pages = PageSelection::parse(pages)?;
        }
        if let Some(format) = map.get(OPTION_OUTPUT_FORMAT) {
            options.output_format = OutputFormat::parse(format)?;
        }
        if let Some(value) = map.get(OPTION_INCLUDE_IMAGES) {
            options.include_images = parse_flag(OPTION_INCLUDE_IMAGES, value)?;
        }
        if let Some(value) = map.get(OPTION_PARALLEL) {
            options.parallel = parse_flag(OPTION_PARALLEL, value)?;
        }

        Ok(options)
    }
}

/// Parse a boolean option value.
pub fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::InvalidOption(format!(
            "{} expects a boolean, got '{}'",
            key, other
        ))),
    }
}
