//! Extraction pipeline: from provider page content to the structured model.

mod classify;
mod extractor;
mod images;
mod layout;
mod options;
mod provider;
mod sequencer;
mod table_detector;
mod text_layer;

pub use classify::RoleClassifier;
pub use extractor::ExtractionPipeline;
pub use images::{CollectedImage, ImageCollector};
pub use layout::{group_into_lines, LayoutConfig, ParagraphAssembler, TextBlock, TextLine};
pub use options::{
    parse_flag, ExtractOptions, OutputFormat, PageSelection, OPTION_INCLUDE_IMAGES,
    OPTION_OUTPUT_FORMAT, OPTION_PAGES, OPTION_PARALLEL,
};
pub use provider::{DocumentLoader, JsonDocumentLoader, MemoryDocument, PageContentProvider};
pub use sequencer::{verify_references, ContentSequencer};
pub use table_detector::{DetectedTable, TableDetector, TableDetectorConfig};
pub use text_layer::TextLayerAnalyzer;
