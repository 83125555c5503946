//! The `extract` operation.

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::parser::{ExtractOptions, ExtractionPipeline, OutputFormat, PageContentProvider};
use crate::render::{to_html, to_json, JsonFormat};

use super::{Operation, OperationOptions, ProcessOutput};

/// Structured extraction, returned as JSON or rendered HTML.
///
/// Options: `pages`, `output_format` (`json`/`html`), `include_images`, `parallel`.
#[derive(Debug, Clone, Default)]
pub struct ExtractOperation {
    _private: (),
}

impl ExtractOperation {
    /// Create the operation.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Operation for ExtractOperation {
    fn name(&self) -> &str {
        "extract"
    }

    fn process(
        &self,
        provider: &dyn PageContentProvider,
        options: &OperationOptions,
        config: &ExtractionConfig,
    ) -> Result<ProcessOutput> {
        let options = ExtractOptions::from_map(options)?;
        let result = ExtractionPipeline::new(config, &options).extract(provider)?;

        let output = match options.output_format {
            OutputFormat::Structured => ProcessOutput::json(to_json(&result, JsonFormat::Compact)?),
            OutputFormat::Markup => ProcessOutput::html(to_html(&result, &options.render)?),
        };

        Ok(output
            .with_metadata("pages_processed", result.pages)
            .with_metadata("total_paragraphs", result.paragraphs.len())
            .with_metadata("total_tables", result.tables.len())
            .with_metadata("total_images", result.images.len()))
    }
}
