//! Paragraph assembly from positioned text fragments.
//!
//! Fragments are clustered into lines by baseline, then consecutive lines
//! into blocks by vertical gap and font compatibility. The tolerances in
//! [`LayoutConfig`] are heuristic approximations of visual layout, not
//! guaranteed typographic semantics.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

use crate::model::{BoundingBox, Font, TextFragment};

/// Tunable clustering constants.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Fragments whose baselines differ by less than this fraction of the
    /// larger font size share a line
    pub line_tolerance: f32,

    /// Lines separated by a gap below this fraction of the previous line's
    /// font size share a paragraph
    pub paragraph_gap_factor: f32,

    /// Maximum ratio between two lines' font sizes for them to share a paragraph
    pub font_size_ratio: f32,

    /// Start a new paragraph when weight or slant changes
    pub split_on_style_change: bool,

    /// Apply Unicode NFC normalization to paragraph content
    pub normalize_unicode: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 0.5,
            paragraph_gap_factor: 0.75,
            font_size_ratio: 1.15,
            split_on_style_change: true,
            normalize_unicode: true,
        }
    }
}

/// A text line composed of fragments on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Fragments in this line, sorted by X position
    pub fragments: Vec<TextFragment>,
    /// Union of the fragment boxes
    pub bounding_box: BoundingBox,
    /// Largest font size in the line
    pub font_size: f32,
}

impl TextLine {
    /// Create a line from fragments, sorting them left to right.
    pub fn from_fragments(mut fragments: Vec<TextFragment>) -> Self {
        fragments.sort_by(|a, b| a.bounding_box.x_min.total_cmp(&b.bounding_box.x_min));

        let bounding_box =
            BoundingBox::union_all(fragments.iter().map(|f| &f.bounding_box)).unwrap_or_default();
        let font_size = fragments
            .iter()
            .map(|f| f.font.size)
            .fold(0.0_f32, f32::max);

        Self {
            fragments,
            bounding_box,
            font_size,
        }
    }

    /// Get the combined text of all fragments with appropriate spacing.
    ///
    /// Inserts a space where fragments are visibly apart, except between
    /// CJK characters.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, fragment) in self.fragments.iter().enumerate() {
            if i > 0 {
                let prev = &self.fragments[i - 1];
                let gap = fragment.bounding_box.x_min - prev.bounding_box.x_max;
                let space_threshold = fragment.font.size.max(prev.font.size) * 0.1;

                let prev_last = prev.text.chars().last();
                let curr_first = fragment.text.chars().next();
                let both_cjk = prev_last.is_some_and(is_spaceless_script_char)
                    && curr_first.is_some_and(is_spaceless_script_char);
                let has_space = prev_last.is_some_and(char::is_whitespace)
                    || curr_first.is_some_and(char::is_whitespace);

                if gap > space_threshold && !both_cjk && !has_space {
                    result.push(' ');
                }
            }
            result.push_str(&fragment.text);
        }

        result
    }

    /// The font carrying the most characters in this line.
    pub fn dominant_font(&self) -> Option<&Font> {
        dominant_font(self.fragments.iter())
    }

    /// Number of visible characters.
    pub fn char_count(&self) -> usize {
        self.fragments.iter().map(TextFragment::visible_char_count).sum()
    }
}

/// A block of consecutive lines: one paragraph before classification.
#[derive(Debug, Clone)]
pub struct TextBlock {
    /// Lines in top-to-bottom order
    pub lines: Vec<TextLine>,
    /// Union of the line boxes
    pub bounding_box: BoundingBox,
}

impl TextBlock {
    /// Create a block from lines.
    pub fn new(lines: Vec<TextLine>) -> Self {
        let bounding_box =
            BoundingBox::union_all(lines.iter().map(|l| &l.bounding_box)).unwrap_or_default();
        Self {
            lines,
            bounding_box,
        }
    }

    /// Line texts joined by single spaces.
    pub fn text(&self) -> String {
        let joined = self
            .lines
            .iter()
            .map(TextLine::text)
            .collect::<Vec<_>>()
            .join(" ");
        joined.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Representative font: the font carrying the most characters.
    ///
    /// Ties go to the font seen first in reading order.
    pub fn representative_font(&self) -> Font {
        dominant_font(self.lines.iter().flat_map(|l| l.fragments.iter()))
            .cloned()
            .unwrap_or_default()
    }

    /// Check if the block has no visible text.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.char_count() == 0)
    }
}

/// Clusters fragments into lines and lines into paragraphs.
#[derive(Debug, Clone, Default)]
pub struct ParagraphAssembler {
    config: LayoutConfig,
}

impl ParagraphAssembler {
    /// Create an assembler with the given tolerances.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Assemble fragments into paragraph blocks in reading order.
    pub fn assemble(&self, fragments: Vec<TextFragment>) -> Vec<TextBlock> {
        let lines = group_into_lines(fragments, self.config.line_tolerance);
        log::debug!("ParagraphAssembler: grouped into {} lines", lines.len());

        let blocks = self.group_lines_into_blocks(lines);
        log::debug!("ParagraphAssembler: grouped into {} blocks", blocks.len());
        blocks
    }

    /// Paragraph content for a block, normalized if configured.
    pub fn content(&self, block: &TextBlock) -> String {
        let text = block.text();
        if self.config.normalize_unicode {
            text.nfc().collect()
        } else {
            text
        }
    }

    fn group_lines_into_blocks(&self, lines: Vec<TextLine>) -> Vec<TextBlock> {
        let mut blocks = Vec::new();
        let mut current: Vec<TextLine> = Vec::new();

        for line in lines {
            if let Some(prev) = current.last() {
                if self.should_break_block(prev, &line) {
                    blocks.push(TextBlock::new(std::mem::take(&mut current)));
                }
            }
            current.push(line);
        }

        if !current.is_empty() {
            blocks.push(TextBlock::new(current));
        }

        blocks
    }

    /// Determine if `curr` starts a new paragraph after `prev`.
    fn should_break_block(&self, prev: &TextLine, curr: &TextLine) -> bool {
        let gap = curr.bounding_box.y_min - prev.bounding_box.y_max;
        if gap >= prev.font_size * self.config.paragraph_gap_factor {
            return true;
        }

        let (small, large) = if prev.font_size <= curr.font_size {
            (prev.font_size, curr.font_size)
        } else {
            (curr.font_size, prev.font_size)
        };
        if small <= 0.0 || large / small > self.config.font_size_ratio {
            return true;
        }

        if self.config.split_on_style_change {
            if let (Some(a), Some(b)) = (prev.dominant_font(), curr.dominant_font()) {
                if !a.same_style(b) {
                    return true;
                }
            }
        }

        false
    }
}

/// Group fragments into lines by baseline.
///
/// Blank fragments are dropped. Fragments are sorted by baseline then X; a
/// fragment joins the current line when its baseline is within `tolerance`
/// times the larger font size of the line's first baseline.
pub fn group_into_lines(fragments: Vec<TextFragment>, tolerance: f32) -> Vec<TextLine> {
    let mut fragments: Vec<TextFragment> = fragments.into_iter().filter(|f| !f.is_blank()).collect();
    fragments.sort_by(|a, b| {
        match a.baseline().total_cmp(&b.baseline()) {
            Ordering::Equal => a.bounding_box.x_min.total_cmp(&b.bounding_box.x_min),
            other => other,
        }
    });

    let mut lines = Vec::new();
    let mut current: Vec<TextFragment> = Vec::new();
    let mut line_baseline = 0.0_f32;
    let mut line_size = 0.0_f32;

    for fragment in fragments {
        if !current.is_empty() {
            let limit = tolerance * line_size.max(fragment.font.size);
            if (fragment.baseline() - line_baseline).abs() < limit {
                line_size = line_size.max(fragment.font.size);
                current.push(fragment);
                continue;
            }
            lines.push(TextLine::from_fragments(std::mem::take(&mut current)));
        }
        line_baseline = fragment.baseline();
        line_size = fragment.font.size;
        current.push(fragment);
    }

    if !current.is_empty() {
        lines.push(TextLine::from_fragments(current));
    }

    lines
}

/// The font carrying the most visible characters, first seen wins ties.
fn dominant_font<'a>(fragments: impl Iterator<Item = &'a TextFragment>) -> Option<&'a Font> {
    let mut tally: Vec<(&Font, usize)> = Vec::new();
    for fragment in fragments {
        let chars = fragment.visible_char_count();
        match tally.iter_mut().find(|(font, _)| *font == &fragment.font) {
            Some(entry) => entry.1 += chars,
            None => tally.push((&fragment.font, chars)),
        }
    }

    let mut best: Option<(&Font, usize)> = None;
    for (font, chars) in tally {
        if best.map_or(true, |(_, n)| chars > n) {
            best = Some((font, chars));
        }
    }
    best.map(|(font, _)| font)
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f32, top: f32, size: f32) -> TextFragment {
        let width = text.chars().count() as f32 * size * 0.5;
        TextFragment::new(
            text,
            BoundingBox::new(x, top, x + width, top + size),
            Font::new("Helvetica", size),
        )
    }

    fn bold(mut f: TextFragment) -> TextFragment {
        f.font.bold = true;
        f
    }

    #[test]
    fn test_group_into_lines() {
        let fragments = vec![
            frag("world", 50.0, 100.5, 12.0),
            frag("Hello", 10.0, 100.0, 12.0),
            frag("Next", 10.0, 116.0, 12.0),
        ];
        let lines = group_into_lines(fragments, 0.5);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Hello world");
        assert_eq!(lines[1].text(), "Next");
    }

    #[test]
    fn test_blank_fragments_dropped() {
        let lines = group_into_lines(vec![frag("  ", 0.0, 0.0, 12.0)], 0.5);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_no_space_between_cjk() {
        let line = TextLine::from_fragments(vec![
            frag("中文", 10.0, 0.0, 12.0),
            frag("字符", 30.0, 0.0, 12.0),
        ]);
        assert_eq!(line.text(), "中文字符");
    }

    #[test]
    fn test_adjacent_fragments_not_spaced() {
        let mut a = frag("Hel", 10.0, 0.0, 12.0);
        a.bounding_box.x_max = 28.0;
        let b = frag("lo", 28.0, 0.0, 12.0);
        assert_eq!(TextLine::from_fragments(vec![a, b]).text(), "Hello");
    }

    #[test]
    fn test_paragraph_gap_splits() {
        let assembler = ParagraphAssembler::default();
        let blocks = assembler.assemble(vec![
            frag("First line", 10.0, 100.0, 12.0),
            frag("continues here", 10.0, 114.0, 12.0),
            frag("New paragraph", 10.0, 150.0, 12.0),
        ]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(assembler.content(&blocks[0]), "First line continues here");
        assert_eq!(assembler.content(&blocks[1]), "New paragraph");
    }

    #[test]
    fn test_font_size_change_splits() {
        let assembler = ParagraphAssembler::default();
        let blocks = assembler.assemble(vec![
            frag("Big heading", 10.0, 100.0, 16.0),
            frag("Body text", 10.0, 118.0, 12.0),
        ]);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_style_change_splits() {
        let assembler = ParagraphAssembler::default();
        let blocks = assembler.assemble(vec![
            bold(frag("Bold lead", 10.0, 100.0, 12.0)),
            frag("Regular text", 10.0, 114.0, 12.0),
        ]);
        assert_eq!(blocks.len(), 2);

        let assembler = ParagraphAssembler::new(LayoutConfig {
            split_on_style_change: false,
            ..Default::default()
        });
        let blocks = assembler.assemble(vec![
            bold(frag("Bold lead", 10.0, 100.0, 12.0)),
            frag("Regular text", 10.0, 114.0, 12.0),
        ]);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_representative_font() {
        let block = TextBlock::new(vec![TextLine::from_fragments(vec![
            bold(frag("Hi", 10.0, 0.0, 12.0)),
            frag("everyone here", 30.0, 0.0, 12.0),
        ])]);
        assert!(!block.representative_font().bold);
    }

    #[test]
    fn test_nfc_normalization() {
        let assembler = ParagraphAssembler::default();
        let blocks = assembler.assemble(vec![frag("Cafe\u{0301}", 10.0, 0.0, 12.0)]);
        assert_eq!(assembler.content(&blocks[0]), "Caf\u{00E9}");
    }

    #[test]
    fn test_deterministic() {
        let input = vec![
            frag("b", 50.0, 10.0, 12.0),
            frag("a", 10.0, 10.0, 12.0),
            frag("c", 10.0, 40.0, 12.0),
        ];
        let assembler = ParagraphAssembler::default();
        let first: Vec<String> = assembler
            .assemble(input.clone())
            .iter()
            .map(|b| assembler.content(b))
            .collect();
        let second: Vec<String> = assembler
            .assemble(input)
            .iter()
            .map(|b| assembler.content(b))
            .collect();
        assert_eq!(first, second);
    }
}
