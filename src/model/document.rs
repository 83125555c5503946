//! Document-level result types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{ImageRecord, Paragraph, Role, Table};

/// Kind of entity a content block points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// A paragraph
    Paragraph,
    /// A table
    Table,
    /// An image
    Image,
}

impl BlockType {
    /// Final tiebreak rank: paragraphs before tables before images.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            BlockType::Paragraph => 0,
            BlockType::Table => 1,
            BlockType::Image => 2,
        }
    }
}

/// A pointer into one of the result collections, in global reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Kind of the referenced entity
    #[serde(rename = "type")]
    pub block_type: BlockType,

    /// Page number (1-indexed)
    pub page: u32,

    /// Top edge of the entity's bounding box
    pub y_position: f32,

    /// Id of the referenced entity
    pub content_id: String,
}

/// Structured extraction result for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Number of pages processed
    pub pages: u32,

    /// Paragraphs in reading order
    pub paragraphs: Vec<Paragraph>,

    /// Tables in page order
    pub tables: Vec<Table>,

    /// Global reading order across paragraphs, tables, and images
    pub content_blocks: Vec<ContentBlock>,

    /// Images in page order
    #[serde(default)]
    pub images: Vec<ImageRecord>,
}

/// Borrowed view of the entity a content block resolves to.
#[derive(Debug, Clone, Copy)]
pub enum BlockRef<'a> {
    /// A paragraph
    Paragraph(&'a Paragraph),
    /// A table
    Table(&'a Table),
    /// An image
    Image(&'a ImageRecord),
}

impl ExtractionResult {
    /// Check if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty() && self.tables.is_empty() && self.images.is_empty()
    }

    /// Paragraphs with the given role.
    pub fn paragraphs_with_role(&self, role: Role) -> impl Iterator<Item = &Paragraph> {
        self.paragraphs.iter().filter(move |p| p.role == role)
    }

    /// Resolve every content block to its entity, in block order.
    ///
    /// Blocks whose id does not resolve yield `None`.
    pub fn resolve_blocks(&self) -> Vec<Option<BlockRef<'_>>> {
        let paragraphs: HashMap<&str, &Paragraph> =
            self.paragraphs.iter().map(|p| (p.id.as_str(), p)).collect();
        let tables: HashMap<&str, &Table> =
            self.tables.iter().map(|t| (t.id.as_str(), t)).collect();
        let images: HashMap<&str, &ImageRecord> =
            self.images.iter().map(|i| (i.id.as_str(), i)).collect();

        self.content_blocks
            .iter()
            .map(|block| {
                let id = block.content_id.as_str();
                match block.block_type {
                    BlockType::Paragraph => paragraphs.get(id).copied().map(BlockRef::Paragraph),
                    BlockType::Table => tables.get(id).copied().map(BlockRef::Table),
                    BlockType::Image => images.get(id).copied().map(BlockRef::Image),
                }
            })
            .collect()
    }

    /// Get plain text content in reading order.
    pub fn plain_text(&self) -> String {
        self.resolve_blocks()
            .into_iter()
            .flatten()
            .filter_map(|block| match block {
                BlockRef::Paragraph(p) => Some(p.content.clone()),
                BlockRef::Table(t) => Some(t.plain_text()),
                BlockRef::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Text-layer status of a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTextStatus {
    /// Page number (1-indexed)
    pub page: u32,

    /// Whether extractable text is present
    pub has_text_layer: bool,

    /// Number of visible characters on the page
    pub char_count: usize,
}

/// Text-layer analysis for a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLayerResult {
    /// Number of pages in the document
    pub total_pages: u32,

    /// Per-page status in page order
    pub pages: Vec<PageTextStatus>,
}

impl TextLayerResult {
    /// Number of pages with a usable text layer.
    pub fn pages_with_text(&self) -> usize {
        self.pages.iter().filter(|p| p.has_text_layer).count()
    }

    /// Page numbers that need OCR (no usable text layer).
    pub fn pages_without_text(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|p| !p.has_text_layer)
            .map(|p| p.page)
            .collect()
    }
}
