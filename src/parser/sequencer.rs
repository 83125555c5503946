//! Content block sequencing and id issuance.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::{
    BlockType, BoundingBox, ContentBlock, ExtractionResult, ImageRecord, Paragraph, Table,
};

#[derive(Debug, Clone)]
struct Entry {
    block_type: BlockType,
    page: u32,
    bounding_box: BoundingBox,
    content_id: String,
    seq: usize,
}

/// Merges paragraphs, tables, and images into one ordered index.
///
/// Ids (`para-N`, `table-N`, `image-N`) are issued here, densely and from
/// zero, in push order. Blocks are ordered by page, then top edge, then
/// left edge, then kind (paragraph, table, image), then push order.
#[derive(Debug, Default)]
pub struct ContentSequencer {
    paragraphs: Vec<Paragraph>,
    tables: Vec<Table>,
    images: Vec<ImageRecord>,
    entries: Vec<Entry>,
}

impl ContentSequencer {
    /// Create an empty sequencer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a paragraph, replacing its id with the next paragraph id.
    pub fn push_paragraph(&mut self, mut paragraph: Paragraph) -> String {
        paragraph.id = format!("para-{}", self.paragraphs.len());
        self.record(
            BlockType::Paragraph,
            paragraph.page_number,
            paragraph.bounding_box,
            &paragraph.id,
        );
        let id = paragraph.id.clone();
        self.paragraphs.push(paragraph);
        id
    }

    /// Add a table, replacing its id with the next table id.
    pub fn push_table(&mut self, mut table: Table) -> String {
        table.id = format!("table-{}", self.tables.len());
        self.record(BlockType::Table, table.page_number, table.bounding_box, &table.id);
        let id = table.id.clone();
        self.tables.push(table);
        id
    }

    /// Add an image, replacing its id with the next image id.
    pub fn push_image(&mut self, mut image: ImageRecord) -> String {
        image.id = format!("image-{}", self.images.len());
        self.record(BlockType::Image, image.page_number, image.bounding_box, &image.id);
        let id = image.id.clone();
        self.images.push(image);
        id
    }

    /// Number of entities pushed so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was pushed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn record(&mut self, block_type: BlockType, page: u32, bounding_box: BoundingBox, id: &str) {
        self.entries.push(Entry {
            block_type,
            page,
            bounding_box,
            content_id: id.to_string(),
            seq: self.entries.len(),
        });
    }

    /// Order the blocks and assemble the result.
    ///
    /// Fails if any block does not resolve to exactly one entity.
    pub fn finish(mut self, pages: u32) -> Result<ExtractionResult> {
        self.entries.sort_by(compare_entries);

        let content_blocks: Vec<ContentBlock> = self
            .entries
            .iter()
            .map(|e| ContentBlock {
                block_type: e.block_type,
                page: e.page,
                y_position: e.bounding_box.y_min,
                content_id: e.content_id.clone(),
            })
            .collect();

        let result = ExtractionResult {
            pages,
            paragraphs: self.paragraphs,
            tables: self.tables,
            content_blocks,
            images: self.images,
        };
        verify_references(&result)?;

        log::debug!(
            "ContentSequencer: {} blocks ({} paragraphs, {} tables, {} images)",
            result.content_blocks.len(),
            result.paragraphs.len(),
            result.tables.len(),
            result.images.len()
        );
        Ok(result)
    }
}

fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    a.page
        .cmp(&b.page)
        .then_with(|| a.bounding_box.y_min.total_cmp(&b.bounding_box.y_min))
        .then_with(|| a.bounding_box.x_min.total_cmp(&b.bounding_box.x_min))
        .then_with(|| a.block_type.rank().cmp(&b.block_type.rank()))
        .then_with(|| a.seq.cmp(&b.seq))
}

/// Check that every content block resolves to exactly one entity.
pub fn verify_references(result: &ExtractionResult) -> Result<()> {
    let mut counts: HashMap<(BlockType, &str), usize> = HashMap::new();
    for p in &result.paragraphs {
        *counts.entry((BlockType::Paragraph, p.id.as_str())).or_default() += 1;
    }
    for t in &result.tables {
        *counts.entry((BlockType::Table, t.id.as_str())).or_default() += 1;
    }
    for i in &result.images {
        *counts.entry((BlockType::Image, i.id.as_str())).or_default() += 1;
    }

    for block in &result.content_blocks {
        let found = counts
            .get(&(block.block_type, block.content_id.as_str()))
            .copied()
            .unwrap_or(0);
        if found != 1 {
            return Err(Error::internal(
                block.page,
                format!(
                    "content block '{}' resolves to {} entities",
                    block.content_id, found
                ),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Font, Role};

    fn paragraph(page: u32, y: f32, x: f32) -> Paragraph {
        Paragraph {
            id: String::new(),
            content: format!("p{} y{}", page, y),
            role: Role::Body,
            page_number: page,
            bounding_box: BoundingBox::new(x, y, x + 100.0, y + 12.0),
            font: Font::default(),
        }
    }

    fn table(page: u32, y: f32, x: f32) -> Table {
        Table {
            id: String::new(),
            page_number: page,
            rows: 1,
            columns: 1,
            cells: vec![],
            bounding_box: BoundingBox::new(x, y, x + 100.0, y + 40.0),
        }
    }

    fn image(page: u32, y: f32, x: f32) -> ImageRecord {
        ImageRecord {
            id: String::new(),
            page_number: page,
            bounding_box: BoundingBox::new(x, y, x + 50.0, y + 50.0),
            mime_type: "image/png".to_string(),
            payload: None,
        }
    }

    #[test]
    fn test_dense_ids() {
        let mut seq = ContentSequencer::new();
        assert_eq!(seq.push_paragraph(paragraph(1, 10.0, 0.0)), "para-0");
        assert_eq!(seq.push_table(table(1, 50.0, 0.0)), "table-0");
        assert_eq!(seq.push_paragraph(paragraph(2, 10.0, 0.0)), "para-1");
        assert_eq!(seq.push_image(image(2, 90.0, 0.0)), "image-0");
        assert_eq!(seq.len(), 4);
    }

    #[test]
    fn test_ordering() {
        let mut seq = ContentSequencer::new();
        seq.push_paragraph(paragraph(2, 10.0, 0.0));
        seq.push_paragraph(paragraph(1, 300.0, 0.0));
        seq.push_table(table(1, 100.0, 0.0));
        seq.push_image(image(1, 100.0, 0.0));
        seq.push_paragraph(paragraph(1, 100.0, 0.0));
        seq.push_paragraph(paragraph(1, 100.0, -5.0));

        let result = seq.finish(2).unwrap();
        let order: Vec<&str> = result
            .content_blocks
            .iter()
            .map(|b| b.content_id.as_str())
            .collect();
        assert_eq!(
            order,
            vec!["para-3", "para-2", "table-0", "image-0", "para-1", "para-0"]
        );
    }

    #[test]
    fn test_verify_references_detects_dangling() {
        let mut result = ContentSequencer::new().finish(1).unwrap();
        result.content_blocks.push(ContentBlock {
            block_type: BlockType::Table,
            page: 1,
            y_position: 0.0,
            content_id: "table-7".to_string(),
        });
        let err = verify_references(&result).unwrap_err();
        assert!(matches!(err, Error::InternalExtraction { page: 1, .. }));
    }
}
