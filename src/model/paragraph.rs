//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// An RGB text color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Create a color from its channels.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex representation, e.g. `#FF0000`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Font characteristics of a run of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Font name (e.g., "Helvetica-Bold")
    pub name: String,

    /// Font size in points
    pub size: f32,

    /// Bold weight
    #[serde(default)]
    pub bold: bool,

    /// Italic style
    #[serde(default)]
    pub italic: bool,

    /// Text color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Font {
    /// Create a regular font.
    pub fn new(name: impl Into<String>, size: f32) -> Self {
        Self {
            name: name.into(),
            size,
            bold: false,
            italic: false,
            color: None,
        }
    }

    /// Create a font, inferring bold/italic from the font name.
    pub fn from_name(name: impl Into<String>, size: f32) -> Self {
        let name = name.into();
        let lower = name.to_lowercase();
        let bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let italic = lower.contains("italic") || lower.contains("oblique");
        Self {
            name,
            size,
            bold,
            italic,
            color: None,
        }
    }

    /// Set bold weight and return self.
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic style and return self.
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set color and return self.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Whether two fonts share a style (weight and slant).
    pub fn same_style(&self, other: &Font) -> bool {
        self.bold == other.bold && self.italic == other.italic
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("", 12.0)
    }
}

/// Smallest positioned unit of text handed over by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// The text content
    pub text: String,

    /// Position on the page
    pub bounding_box: BoundingBox,

    /// Font used for this fragment
    pub font: Font,
}

impl TextFragment {
    /// Create a new fragment.
    pub fn new(text: impl Into<String>, bounding_box: BoundingBox, font: Font) -> Self {
        Self {
            text: text.into(),
            bounding_box,
            font,
        }
    }

    /// Baseline approximation: the bottom edge of the box.
    pub fn baseline(&self) -> f32 {
        self.bounding_box.y_max
    }

    /// Character count after trimming whitespace and control characters.
    pub fn visible_char_count(&self) -> usize {
        self.text
            .trim_matches(|c: char| c.is_whitespace() || c.is_control())
            .chars()
            .count()
    }

    /// Whether the fragment carries no visible characters.
    pub fn is_blank(&self) -> bool {
        self.visible_char_count() == 0
    }
}

/// Semantic role of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Document title
    Title,
    /// Section heading
    SectionHeading,
    /// Regular body text
    Body,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Title => "title",
            Role::SectionHeading => "sectionHeading",
            Role::Body => "body",
        }
    }

    /// Check if this is a title or heading.
    pub fn is_heading(&self) -> bool {
        !matches!(self, Role::Body)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A paragraph of text with its reading role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Identifier (`para-<n>`), dense across a result
    pub id: String,

    /// Joined text of the paragraph's lines
    pub content: String,

    /// Semantic role
    pub role: Role,

    /// Page number (1-indexed)
    pub page_number: u32,

    /// Union of the paragraph's line boxes
    pub bounding_box: BoundingBox,

    /// Representative font
    pub font: Font,
}

impl Paragraph {
    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Check if this is a title or heading.
    pub fn is_heading(&self) -> bool {
        self.role.is_heading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_from_name() {
        let font = Font::from_name("Helvetica-BoldOblique", 12.0);
        assert!(font.bold);
        assert!(font.italic);

        let font = Font::from_name("Times-Roman", 10.0);
        assert!(!font.bold);
        assert!(!font.italic);
    }

    #[test]
    fn test_visible_char_count() {
        let bbox = BoundingBox::default();
        let frag = TextFragment::new("  hello\t", bbox, Font::default());
        assert_eq!(frag.visible_char_count(), 5);

        let blank = TextFragment::new(" \u{0000}\n ", bbox, Font::default());
        assert!(blank.is_blank());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&Role::SectionHeading).unwrap(),
            "\"sectionHeading\""
        );
        assert_eq!(serde_json::to_string(&Role::Title).unwrap(), "\"title\"");
        assert_eq!(Role::Body.to_string(), "body");
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::rgb(255, 0, 16).to_hex(), "#FF0010");
    }
}
