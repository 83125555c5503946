//! # pdfstruct
//!
//! Structured content extraction from the text layer of PDF documents.
//!
//! The byte-level PDF parser is an external collaborator: it hands over, per
//! page, positioned text fragments, ruling line segments, and images. This
//! library turns that into paragraphs tagged with a reading role, ruled
//! tables with header cells, image records, and a single reading-order index
//! across all of them. It can render the result as semantic HTML and report
//! which pages carry usable text at all.
//!
//! ## Quick Start
//!
//! ```
//! use pdfstruct::model::{BoundingBox, Font, PageContent};
//! use pdfstruct::{extract, Extraction, ExtractOptions, ExtractionConfig, MemoryDocument};
//!
//! fn main() -> pdfstruct::Result<()> {
//!     let mut page = PageContent::letter();
//!     page.add_text(
//!         "Annual Report 2024",
//!         BoundingBox::new(72.0, 72.0, 320.0, 96.0),
//!         Font::new("Helvetica-Bold", 24.0).bold(true),
//!     );
//!     let doc = MemoryDocument::new(vec![page]);
//!
//!     let options = ExtractOptions::default();
//!     if let Extraction::Structured(result) = extract(&doc, &options, &ExtractionConfig::default())? {
//!         assert_eq!(result.paragraphs[0].role.as_str(), "title");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Paragraph assembly**: baseline line clustering, gap and font based paragraph breaks
//! - **Role classification**: title, section heading, and body from font size and weight
//! - **Ruled tables**: grid reconstruction from line segments, header row detection
//! - **Reading order**: one deterministic content-block index with dense ids
//! - **Text-layer detection**: per-page verdict for routing scanned pages to OCR
//! - **Parallel processing**: optional Rayon page analysis with identical output

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod service;

// Re-export commonly used types
pub use config::ExtractionConfig;
pub use error::{Error, ErrorKind, Failure, Result};
pub use model::{
    BlockType, BoundingBox, CellKind, ContentBlock, ExtractionResult, Font, ImageRecord,
    PageContent, PageTextStatus, Paragraph, Role, Table, TableCell, TextFragment,
    TextLayerResult,
};
pub use parser::{
    DocumentLoader, ExtractOptions, JsonDocumentLoader, LayoutConfig, MemoryDocument,
    OutputFormat, PageContentProvider, PageSelection, TableDetectorConfig,
};
pub use render::{ExtractionStats, JsonFormat, RenderOptions};
pub use service::{HealthStatus, Operation, ProcessOutput, Service};

use std::path::Path;

use parser::ExtractionPipeline;

/// Names of the built-in operations, sorted.
pub const BUILTIN_OPERATIONS: [&str; 2] = ["detect_text_layer", "extract"];

/// Output of [`extract`]: the structured model or rendered markup.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Structured result model
    Structured(ExtractionResult),
    /// Rendered HTML
    Markup(String),
}

impl Extraction {
    /// Get the structured result, if this is one.
    pub fn as_structured(&self) -> Option<&ExtractionResult> {
        match self {
            Extraction::Structured(result) => Some(result),
            Extraction::Markup(_) => None,
        }
    }

    /// Get the markup, if this is markup.
    pub fn as_markup(&self) -> Option<&str> {
        match self {
            Extraction::Markup(html) => Some(html),
            Extraction::Structured(_) => None,
        }
    }
}

/// Extract structured content from an opened document.
///
/// # Arguments
///
/// * `provider` - Page content of the opened document
/// * `options` - Page selection, output format, image payloads
/// * `config` - Classification thresholds and clustering tolerances
///
/// # Errors
///
/// Fails with [`Error::InvalidPageRange`]/[`Error::PageOutOfRange`] before
/// any page is processed, or with [`Error::InternalExtraction`] if any page
/// fails. Partial results are never returned.
pub fn extract(
    provider: &dyn PageContentProvider,
    options: &ExtractOptions,
    config: &ExtractionConfig,
) -> Result<Extraction> {
    let result = ExtractionPipeline::new(config, options).extract(provider)?;
    match options.output_format {
        OutputFormat::Structured => Ok(Extraction::Structured(result)),
        OutputFormat::Markup => Ok(Extraction::Markup(render::to_html(&result, &options.render)?)),
    }
}

/// Report, per page, whether extractable text is present.
pub fn detect_text_layer(
    provider: &dyn PageContentProvider,
    config: &ExtractionConfig,
) -> Result<TextLayerResult> {
    let options = ExtractOptions::default();
    ExtractionPipeline::new(config, &options).detect_text_layer(provider)
}

/// Check if an operation name is one of the built-in operations.
pub fn supports_operation(name: &str) -> bool {
    BUILTIN_OPERATIONS
        .iter()
        .any(|op| op.eq_ignore_ascii_case(name))
}

/// Health report for the built-in operation set.
pub fn health_check() -> HealthStatus {
    HealthStatus {
        healthy: true,
        version: service::VERSION.to_string(),
        supported_operations: BUILTIN_OPERATIONS.iter().map(|s| s.to_string()).collect(),
    }
}

/// Builder-style API for extraction.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::{Extractor, PageSelection};
///
/// let result = Extractor::new()
///     .with_pages(PageSelection::parse("1,3-5").unwrap())
///     .with_title_threshold(20.0)
///     .open_file("document.json")
///     .unwrap();
///
/// println!("{}", result.to_html().unwrap());
/// ```
pub struct Extractor {
    options: ExtractOptions,
    config: ExtractionConfig,
}

impl Extractor {
    /// Create a new extractor with default settings.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
            config: ExtractionConfig::default(),
        }
    }

    /// Use an explicit configuration.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Attach image payloads.
    pub fn with_images(mut self, include: bool) -> Self {
        self.options = self.options.with_images(include);
        self
    }

    /// Analyze pages in parallel.
    pub fn parallel(mut self) -> Self {
        self.options = self.options.with_parallel(true);
        self
    }

    /// Set markup rendering options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.options = self.options.with_render_options(render);
        self
    }

    /// Set the title threshold.
    pub fn with_title_threshold(mut self, size: f32) -> Self {
        self.config = self.config.with_title_threshold(size);
        self
    }

    /// Set the heading threshold.
    pub fn with_heading_threshold(mut self, size: f32) -> Self {
        self.config = self.config.with_heading_threshold(size);
        self
    }

    /// Run extraction over an opened document.
    pub fn extract(self, provider: &dyn PageContentProvider) -> Result<ExtractorResult> {
        let result = ExtractionPipeline::new(&self.config, &self.options).extract(provider)?;
        Ok(ExtractorResult {
            result,
            render_options: self.options.render,
        })
    }

    /// Load a JSON page dump and run extraction over it.
    pub fn open_file<P: AsRef<Path>>(self, path: P) -> Result<ExtractorResult> {
        let document = MemoryDocument::load_file(path)?;
        self.extract(&document)
    }

    /// Open raw bytes with a loader and run extraction.
    ///
    /// The size limit is enforced before the loader sees the bytes.
    pub fn open_bytes(self, loader: &dyn DocumentLoader, data: &[u8]) -> Result<ExtractorResult> {
        let limit = self.config.max_file_size_bytes();
        if data.len() > limit {
            return Err(Error::OversizeInput {
                size: data.len(),
                limit,
            });
        }
        let provider = loader.load(data)?;
        self.extract(provider.as_ref())
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of an [`Extractor`] run.
pub struct ExtractorResult {
    /// The structured result
    pub result: ExtractionResult,
    render_options: RenderOptions,
}

impl ExtractorResult {
    /// Render as HTML with the configured options.
    pub fn to_html(&self) -> Result<String> {
        render::to_html(&self.result, &self.render_options)
    }

    /// Serialize as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.result, format)
    }

    /// Plain text in reading order.
    pub fn plain_text(&self) -> String {
        self.result.plain_text()
    }

    /// Statistics for the result.
    pub fn stats(&self) -> ExtractionStats {
        ExtractionStats::from_result(&self.result)
    }

    /// Get the structured result.
    pub fn result(&self) -> &ExtractionResult {
        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> MemoryDocument {
        let mut page = PageContent::letter();
        page.add_text(
            "Introduction",
            BoundingBox::new(72.0, 72.0, 200.0, 88.0),
            Font::new("Helvetica-Bold", 16.0).bold(true),
        );
        page.add_text(
            "Plain body text.",
            BoundingBox::new(72.0, 110.0, 200.0, 122.0),
            Font::new("Helvetica", 12.0),
        );
        MemoryDocument::new(vec![page])
    }

    #[test]
    fn test_extractor_builder() {
        let extractor = Extractor::new()
            .with_images(true)
            .parallel()
            .with_title_threshold(30.0);

        assert!(extractor.options.include_images);
        assert!(extractor.options.parallel);
        assert_eq!(extractor.config.title_font_size_threshold, 30.0);
    }

    #[test]
    fn test_extract_structured_and_markup() {
        let config = ExtractionConfig::default();
        let structured = extract(&document(), &ExtractOptions::default(), &config).unwrap();
        let result = structured.as_structured().unwrap();
        assert_eq!(result.paragraphs.len(), 2);
        assert_eq!(result.paragraphs[0].role, Role::SectionHeading);

        let markup = extract(&document(), &ExtractOptions::default().markup(), &config).unwrap();
        let html = markup.as_markup().unwrap();
        assert!(html.contains("<h2>Introduction</h2>"));
        assert!(html.contains("<p>Plain body text.</p>"));
    }

    #[test]
    fn test_extractor_result_helpers() {
        let result = Extractor::new().extract(&document()).unwrap();
        assert_eq!(result.plain_text(), "Introduction\nPlain body text.");
        assert_eq!(result.stats().heading_count, 1);
    }

    #[test]
    fn test_open_bytes_enforces_size_limit() {
        let loader = JsonDocumentLoader::new();
        let config = ExtractionConfig::default().with_max_file_size_mb(1);
        let data = vec![b' '; 1024 * 1024 + 1];
        let err = Extractor::new()
            .with_config(config)
            .open_bytes(&loader, &data)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::OversizeInput);
    }

    #[test]
    fn test_supports_operation() {
        assert!(supports_operation("extract"));
        assert!(supports_operation("detect_text_layer"));
        assert!(!supports_operation("convert"));
        assert_eq!(health_check().supported_operations, BUILTIN_OPERATIONS.to_vec());
    }
}
