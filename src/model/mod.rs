//! Document model types.
//!
//! This module defines both sides of the pipeline: the raw page content
//! handed over by a provider (fragments, segments, image descriptors) and
//! the structured result (paragraphs, tables, images, content blocks).

mod document;
mod geometry;
mod image;
mod page;
mod paragraph;
pub(crate) mod payload;
mod table;

pub use document::{
    BlockRef, BlockType, ContentBlock, ExtractionResult, PageTextStatus, TextLayerResult,
};
pub use geometry::BoundingBox;
pub use image::{detect_mime_type, is_mime_type, ImageRecord, OCTET_STREAM};
pub use page::{ImageDescriptor, LineSegment, PageContent};
pub use paragraph::{Color, Font, Paragraph, Role, TextFragment};
pub use table::{CellKind, Table, TableCell};
