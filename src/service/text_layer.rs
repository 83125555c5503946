//! The `detect_text_layer` operation.

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::parser::{ExtractOptions, ExtractionPipeline, PageContentProvider};
use crate::render::{to_json, JsonFormat};

use super::{Operation, OperationOptions, ProcessOutput};

/// Option key overriding the configured character threshold.
pub const OPTION_CHAR_THRESHOLD: &str = "char_threshold";

/// Per-page text-layer detection over the whole document.
#[derive(Debug, Clone, Default)]
pub struct TextLayerOperation {
    _private: (),
}

impl TextLayerOperation {
    /// Create the operation.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Operation for TextLayerOperation {
    fn name(&self) -> &str {
        "detect_text_layer"
    }

    fn process(
        &self,
        provider: &dyn PageContentProvider,
        options: &OperationOptions,
        config: &ExtractionConfig,
    ) -> Result<ProcessOutput> {
        let threshold = match options.get(OPTION_CHAR_THRESHOLD) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                Error::InvalidOption(format!(
                    "{} expects a non-negative integer, got '{}'",
                    OPTION_CHAR_THRESHOLD, raw
                ))
            })?,
            None => config.text_layer_char_threshold,
        };

        let config = config.clone().with_text_layer_threshold(threshold);
        let extract_options = ExtractOptions::default();
        let result = ExtractionPipeline::new(&config, &extract_options).detect_text_layer(provider)?;

        Ok(ProcessOutput::json(to_json(&result, JsonFormat::Compact)?)
            .with_metadata("total_pages", result.total_pages)
            .with_metadata("pages_with_text", result.pages_with_text())
            .with_metadata("threshold", threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, Font, PageContent, TextLayerResult};
    use crate::parser::MemoryDocument;

    fn document() -> MemoryDocument {
        let mut page = PageContent::letter();
        page.add_text(
            "Some text",
            BoundingBox::new(72.0, 72.0, 150.0, 84.0),
            Font::new("Helvetica", 12.0),
        );
        MemoryDocument::new(vec![page, PageContent::letter()])
    }

    #[test]
    fn test_detect() {
        let output = TextLayerOperation::new()
            .process(&document(), &OperationOptions::new(), &ExtractionConfig::default())
            .unwrap();
        let result: TextLayerResult = serde_json::from_str(&output.content).unwrap();
        assert_eq!(result.total_pages, 2);
        assert!(result.pages[0].has_text_layer);
        assert_eq!(result.pages[0].char_count, 9);
        assert!(!result.pages[1].has_text_layer);
        assert_eq!(output.metadata["pages_with_text"], "1");
        assert_eq!(output.metadata["threshold"], "1");
    }

    #[test]
    fn test_threshold_override() {
        let mut options = OperationOptions::new();
        options.insert(OPTION_CHAR_THRESHOLD.to_string(), "50".to_string());
        let output = TextLayerOperation::new()
            .process(&document(), &options, &ExtractionConfig::default())
            .unwrap();
        assert_eq!(output.metadata["pages_with_text"], "0");

        options.insert(OPTION_CHAR_THRESHOLD.to_string(), "many".to_string());
        assert!(matches!(
            TextLayerOperation::new().process(&document(), &options, &ExtractionConfig::default()),
            Err(Error::InvalidOption(_))
        ));
    }
}
