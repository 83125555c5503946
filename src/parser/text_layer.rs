//! Text-layer presence analysis.

use crate::model::{PageTextStatus, TextFragment};

/// Decides per page whether extractable text exists.
///
/// Runs on raw fragments only, so the verdict holds even for pages where
/// paragraph assembly fails.
#[derive(Debug, Clone, Copy)]
pub struct TextLayerAnalyzer {
    min_chars: usize,
}

impl Default for TextLayerAnalyzer {
    fn default() -> Self {
        Self { min_chars: 1 }
    }
}

impl TextLayerAnalyzer {
    /// Create an analyzer with the given minimum character count.
    ///
    /// A threshold of 0 behaves like 1: an empty page never has a text layer.
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Analyze one page.
    pub fn analyze(&self, page: u32, fragments: &[TextFragment]) -> PageTextStatus {
        let char_count: usize = fragments.iter().map(TextFragment::visible_char_count).sum();
        PageTextStatus {
            page,
            has_text_layer: char_count > 0 && char_count >= self.min_chars,
            char_count,
        }
    }
}
