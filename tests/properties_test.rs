//! Property-based tests for pipeline invariants.

use pdfstruct::model::{ImageRecord, Table};
use pdfstruct::parser::{ContentSequencer, LayoutConfig, ParagraphAssembler, RoleClassifier};
use pdfstruct::render::escape_html;
use pdfstruct::{BlockType, BoundingBox, Font, PageSelection, Paragraph, Role, TextFragment};
use proptest::prelude::*;

fn role_rank(role: Role) -> u8 {
    match role {
        Role::Body => 0,
        Role::SectionHeading => 1,
        Role::Title => 2,
    }
}

// ============================================================================
// Role classification
// ============================================================================

/// Property: a larger font never gets a lesser role
#[test]
fn proptest_classifier_monotonic_in_size() {
    let classifier = RoleClassifier::default();
    proptest!(|(a in 1.0f32..60.0, b in 1.0f32..60.0, bold in any::<bool>())| {
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        let small_role = classifier.classify(&Font::new("F", small).bold(bold));
        let large_role = classifier.classify(&Font::new("F", large).bold(bold));
        prop_assert!(role_rank(small_role) <= role_rank(large_role));
    });
}

/// Property: title exactly at or above the title threshold
#[test]
fn proptest_classifier_title_threshold() {
    let classifier = RoleClassifier::default();
    proptest!(|(size in 1.0f32..60.0, bold in any::<bool>())| {
        let role = classifier.classify(&Font::new("F", size).bold(bold));
        prop_assert_eq!(role == Role::Title, size >= 18.0);
    });
}

// ============================================================================
// Sequencing
// ============================================================================

fn bbox(x: f32, y: f32) -> BoundingBox {
    BoundingBox::new(x, y, x + 50.0, y + 10.0)
}

fn push(sequencer: &mut ContentSequencer, kind: u8, page: u32, x: f32, y: f32) {
    match kind {
        0 => {
            sequencer.push_paragraph(Paragraph {
                id: String::new(),
                content: "text".to_string(),
                role: Role::Body,
                page_number: page,
                bounding_box: bbox(x, y),
                font: Font::default(),
            });
        }
        1 => {
            sequencer.push_table(Table {
                id: String::new(),
                page_number: page,
                rows: 0,
                columns: 0,
                cells: Vec::new(),
                bounding_box: bbox(x, y),
            });
        }
        _ => {
            sequencer.push_image(ImageRecord {
                id: String::new(),
                page_number: page,
                bounding_box: bbox(x, y),
                mime_type: "image/png".to_string(),
                payload: None,
            });
        }
    }
}

/// Property: blocks are ordered by page then top edge, and all resolve
#[test]
fn proptest_sequencer_order_and_resolution() {
    let strategy = prop::collection::vec((0u8..3, 1u32..5, 0.0f32..500.0, 0.0f32..700.0), 0..40);
    proptest!(|(entries in strategy)| {
        let mut sequencer = ContentSequencer::new();
        for &(kind, page, x, y) in &entries {
            push(&mut sequencer, kind, page, x, y);
        }
        let result = sequencer.finish(5).unwrap();

        prop_assert_eq!(result.content_blocks.len(), entries.len());
        for pair in result.content_blocks.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.page < b.page || (a.page == b.page && a.y_position <= b.y_position));
        }
        prop_assert!(result.resolve_blocks().iter().all(Option::is_some));

        for (i, p) in result.paragraphs.iter().enumerate() {
            prop_assert_eq!(&p.id, &format!("para-{}", i));
        }
        let tables = result
            .content_blocks
            .iter()
            .filter(|b| b.block_type == BlockType::Table)
            .count();
        prop_assert_eq!(tables, result.tables.len());
    });
}

// ============================================================================
// Paragraph assembly
// ============================================================================

/// Property: assembly keeps every visible character and is repeatable
#[test]
fn proptest_assembler_preserves_text() {
    let strategy = prop::collection::vec(("[a-zA-Z0-9]{1,12}", 0usize..4, 0u8..30), 1..30);
    proptest!(|(words in strategy)| {
        let fragments: Vec<TextFragment> = words
            .iter()
            .map(|(word, column, line)| {
                let x = 72.0 + *column as f32 * 120.0;
                let y = 72.0 + *line as f32 * 14.0;
                TextFragment::new(
                    word.clone(),
                    BoundingBox::new(x, y, x + 100.0, y + 12.0),
                    Font::new("Helvetica", 12.0),
                )
            })
            .collect();

        let assembler = ParagraphAssembler::new(LayoutConfig::default());
        let blocks = assembler.assemble(fragments.clone());
        let again = assembler.assemble(fragments);

        let text: Vec<String> = blocks.iter().map(|b| assembler.content(b)).collect();
        let repeat: Vec<String> = again.iter().map(|b| assembler.content(b)).collect();
        prop_assert_eq!(&text, &repeat);

        let expected: usize = words.iter().map(|(w, _, _)| w.len()).sum();
        let actual: usize = text
            .iter()
            .map(|t| t.chars().filter(|c| !c.is_whitespace()).count())
            .sum();
        prop_assert_eq!(actual, expected);
    });
}

// ============================================================================
// Page selection and escaping
// ============================================================================

/// Property: an in-bounds range resolves to exactly its pages
#[test]
fn proptest_page_range_resolution() {
    proptest!(|(start in 1u32..50, len in 0u32..20, extra in 0u32..10)| {
        let end = start + len;
        let total = end + extra;
        let selection = PageSelection::parse(&format!("{}-{}", start, end)).unwrap();
        let pages = selection.resolve(total).unwrap();
        prop_assert_eq!(pages, (start..=end).collect::<Vec<_>>());

        prop_assert!(PageSelection::parse(&(total + 1).to_string())
            .unwrap()
            .resolve(total)
            .is_err());
    });
}

/// Property: escaped text never contains markup metacharacters
#[test]
fn proptest_escape_html() {
    proptest!(|(text in "\\PC{0,200}")| {
        let escaped = escape_html(&text);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert!(!escaped.contains('"'));
        prop_assert!(!escaped.contains('\''));
    });
}
