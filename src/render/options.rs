//! Rendering options.

/// Options for rendering markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Wrap output in a full `<html>` document; otherwise emit one `<article>`
    pub standalone: bool,

    /// Put each block element on its own line
    pub newline_between_blocks: bool,

    /// Add `id` attributes to paragraph elements
    pub paragraph_ids: bool,

    /// Render images that carry no payload as empty `<img>` placeholders
    pub image_placeholders: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a bare `<article>` fragment.
    pub fn fragment(mut self) -> Self {
        self.standalone = false;
        self
    }

    /// Enable or disable a newline after every block element.
    pub fn with_newlines(mut self, newlines: bool) -> Self {
        self.newline_between_blocks = newlines;
        self
    }

    /// Enable or disable paragraph `id` attributes.
    pub fn with_paragraph_ids(mut self, ids: bool) -> Self {
        self.paragraph_ids = ids;
        self
    }

    /// Enable or disable placeholders for images without payload.
    pub fn with_image_placeholders(mut self, placeholders: bool) -> Self {
        self.image_placeholders = placeholders;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            standalone: true,
            newline_between_blocks: false,
            paragraph_ids: false,
            image_placeholders: true,
        }
    }
}
