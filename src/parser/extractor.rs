//! Extraction orchestration.
//!
//! Pages are fetched from the provider in ascending order and analyzed
//! independently (optionally in parallel). Classification, id issuance, and
//! sequencing then run sequentially over the analyzed pages, so the result
//! is identical whichever way the pages were analyzed.

use rayon::prelude::*;

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::model::{
    BoundingBox, ExtractionResult, Font, ImageRecord, PageContent, Paragraph, Role, Table,
    TextLayerResult,
};

use super::classify::RoleClassifier;
use super::images::{CollectedImage, ImageCollector};
use super::layout::ParagraphAssembler;
use super::options::ExtractOptions;
use super::provider::PageContentProvider;
use super::sequencer::ContentSequencer;
use super::table_detector::TableDetector;
use super::text_layer::TextLayerAnalyzer;

/// A paragraph before classification.
#[derive(Debug, Clone)]
struct DraftParagraph {
    content: String,
    bounding_box: BoundingBox,
    font: Font,
}

/// Everything found on one page, before ids are issued.
#[derive(Debug, Clone)]
struct PageAnalysis {
    page: u32,
    paragraphs: Vec<DraftParagraph>,
    tables: Vec<Table>,
    images: Vec<CollectedImage>,
}

/// Drives the pipeline over a page subset.
#[derive(Debug, Clone)]
pub struct ExtractionPipeline<'a> {
    config: &'a ExtractionConfig,
    options: &'a ExtractOptions,
    assembler: ParagraphAssembler,
    classifier: RoleClassifier,
    detector: TableDetector,
    images: ImageCollector,
}

impl<'a> ExtractionPipeline<'a> {
    /// Create a pipeline for one request.
    pub fn new(config: &'a ExtractionConfig, options: &'a ExtractOptions) -> Self {
        Self {
            config,
            options,
            assembler: ParagraphAssembler::new(config.layout.clone()),
            classifier: RoleClassifier::from_config(config),
            detector: TableDetector::with_config(config.table.clone()),
            images: ImageCollector::new(options.include_images),
        }
    }

    /// Run extraction and return the structured result.
    ///
    /// The page selection is resolved before any page is touched.
    pub fn extract(&self, provider: &dyn PageContentProvider) -> Result<ExtractionResult> {
        self.config.validate()?;

        let total = provider.page_count();
        let pages = self.options.pages.resolve(total)?;
        log::debug!(
            "ExtractionPipeline: processing {} of {} pages",
            pages.len(),
            total
        );

        let contents = pages
            .iter()
            .map(|&n| provider.page(n).map(|content| (n, content)))
            .collect::<Result<Vec<_>>>()?;

        let analyses: Vec<PageAnalysis> = if self.options.parallel {
            contents
                .into_par_iter()
                .map(|(n, content)| self.analyze_page(n, content))
                .collect::<Result<Vec<_>>>()?
        } else {
            contents
                .into_iter()
                .map(|(n, content)| self.analyze_page(n, content))
                .collect::<Result<Vec<_>>>()?
        };

        let mut sequencer = ContentSequencer::new();
        for analysis in analyses {
            self.sequence_page(&mut sequencer, analysis);
        }

        let processed = u32::try_from(pages.len()).unwrap_or(u32::MAX);
        sequencer.finish(processed)
    }

    /// Report text-layer status for every page of the document.
    pub fn detect_text_layer(&self, provider: &dyn PageContentProvider) -> Result<TextLayerResult> {
        let analyzer = TextLayerAnalyzer::new(self.config.text_layer_char_threshold);
        let total = provider.page_count();

        let mut pages = Vec::with_capacity(total as usize);
        for n in 1..=total {
            let content = provider.page(n)?;
            pages.push(analyzer.analyze(n, &content.fragments));
        }

        Ok(TextLayerResult {
            total_pages: total,
            pages,
        })
    }

    fn analyze_page(&self, page: u32, content: PageContent) -> Result<PageAnalysis> {
        check_page_content(page, &content)?;

        let PageContent {
            fragments,
            segments,
            images,
            ..
        } = content;

        // Tables first: they consume the fragments inside their cells
        let (detected, remaining) = self.detector.detect(&segments, fragments);
        let tables = detected
            .iter()
            .map(|t| self.detector.to_table_model(t, String::new(), page))
            .collect();

        let paragraphs = self
            .assembler
            .assemble(remaining)
            .into_iter()
            .filter(|block| !block.is_empty())
            .map(|block| DraftParagraph {
                content: self.assembler.content(&block),
                bounding_box: block.bounding_box,
                font: block.representative_font(),
            })
            .collect();

        Ok(PageAnalysis {
            page,
            paragraphs,
            tables,
            images: self.images.collect(images),
        })
    }

    fn sequence_page(&self, sequencer: &mut ContentSequencer, analysis: PageAnalysis) {
        let page = analysis.page;

        for draft in analysis.paragraphs {
            let role: Role = self.classifier.classify(&draft.font);
            sequencer.push_paragraph(Paragraph {
                id: String::new(),
                content: draft.content,
                role,
                page_number: page,
                bounding_box: draft.bounding_box,
                font: draft.font,
            });
        }

        for table in analysis.tables {
            sequencer.push_table(table);
        }

        for image in analysis.images {
            let data = image.descriptor.data;
            sequencer.push_image(ImageRecord {
                id: String::new(),
                page_number: page,
                bounding_box: image.descriptor.bounding_box,
                mime_type: image.mime_type,
                payload: (self.options.include_images && !data.is_empty()).then_some(data),
            });
        }
    }
}

/// Reject geometry the clustering steps cannot order.
fn check_page_content(page: u32, content: &PageContent) -> Result<()> {
    for fragment in &content.fragments {
        let b = &fragment.bounding_box;
        let finite = [b.x_min, b.y_min, b.x_max, b.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::internal(
                page,
                format!("fragment {:?} has non-finite coordinates", fragment.text),
            ));
        }
        if !(fragment.font.size.is_finite() && fragment.font.size > 0.0) {
            return Err(Error::internal(
                page,
                format!(
                    "fragment {:?} has invalid font size {}",
                    fragment.text, fragment.font.size
                ),
            ));
        }
    }

    for segment in &content.segments {
        let finite = [segment.x0, segment.y0, segment.x1, segment.y1]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::internal(page, "line segment has non-finite coordinates"));
        }
    }

    Ok(())
}
