//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

use crate::model::{BlockRef, ExtractionResult, Role};

/// Result of rendering, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered markup
    pub content: String,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: ExtractionStats) -> Self {
        Self { content, stats }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics about an extraction result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Total number of pages processed
    pub page_count: u32,

    /// Number of paragraphs extracted
    pub paragraph_count: u32,

    /// Number of tables extracted
    pub table_count: u32,

    /// Number of images found
    pub image_count: u32,

    /// Number of title paragraphs
    pub title_count: u32,

    /// Number of section heading paragraphs
    pub heading_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute statistics for a result, counting text in reading order.
    pub fn from_result(result: &ExtractionResult) -> Self {
        let mut stats = Self {
            page_count: result.pages,
            ..Self::default()
        };

        for block in result.resolve_blocks().into_iter().flatten() {
            match block {
                BlockRef::Paragraph(p) => {
                    stats.paragraph_count += 1;
                    stats.count_text(&p.content);
                }
                BlockRef::Table(t) => {
                    stats.table_count += 1;
                    for cell in &t.cells {
                        stats.count_text(&cell.content);
                    }
                }
                BlockRef::Image(_) => stats.image_count += 1,
            }
        }

        stats.title_count = result.paragraphs_with_role(Role::Title).count() as u32;
        stats.heading_count = result.paragraphs_with_role(Role::SectionHeading).count() as u32;

        stats
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        // Word count: whitespace-separated tokens
        self.word_count += text.split_whitespace().count() as u32;

        // Character count: non-whitespace characters
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.page_count += other.page_count;
        self.paragraph_count += other.paragraph_count;
        self.table_count += other.table_count;
        self.image_count += other.image_count;
        self.title_count += other.title_count;
        self.heading_count += other.heading_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
