//! Page-level content handed over by a page content provider.

use serde::{Deserialize, Serialize};

use super::{payload, BoundingBox, Font, TextFragment};

/// Raw content of a single page: text fragments, ruling lines, and images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page width in points (1 point = 1/72 inch)
    #[serde(default)]
    pub width: f32,

    /// Page height in points
    #[serde(default)]
    pub height: f32,

    /// Positioned text fragments
    #[serde(default)]
    pub fragments: Vec<TextFragment>,

    /// Straight line segments (table ruling)
    #[serde(default)]
    pub segments: Vec<LineSegment>,

    /// Placed images
    #[serde(default)]
    pub images: Vec<ImageDescriptor>,
}

impl PageContent {
    /// Create an empty page with the given dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Create an empty page with standard Letter size (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0) // 8.5 * 72, 11 * 72
    }

    /// Create an empty page with standard A4 size (210 x 297 mm).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// Add a text fragment.
    pub fn add_fragment(&mut self, fragment: TextFragment) {
        self.fragments.push(fragment);
    }

    /// Add a text fragment from its parts.
    pub fn add_text(&mut self, text: impl Into<String>, bounding_box: BoundingBox, font: Font) {
        self.fragments
            .push(TextFragment::new(text, bounding_box, font));
    }

    /// Add a line segment.
    pub fn add_segment(&mut self, segment: LineSegment) {
        self.segments.push(segment);
    }

    /// Add the four edges of a rectangle as line segments.
    pub fn add_rect(&mut self, rect: BoundingBox) {
        self.segments.extend(LineSegment::rect_edges(&rect));
    }

    /// Add an image.
    pub fn add_image(&mut self, image: ImageDescriptor) {
        self.images.push(image);
    }

    /// Check if the page has no content at all.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty() && self.segments.is_empty() && self.images.is_empty()
    }
}

/// A straight line segment drawn on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    /// Start X
    pub x0: f32,
    /// Start Y
    pub y0: f32,
    /// End X
    pub x1: f32,
    /// End Y
    pub y1: f32,
}

impl LineSegment {
    /// Create a new segment.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Horizontal segment at `y` from `x0` to `x1`.
    pub fn horizontal(y: f32, x0: f32, x1: f32) -> Self {
        Self::new(x0, y, x1, y)
    }

    /// Vertical segment at `x` from `y0` to `y1`.
    pub fn vertical(x: f32, y0: f32, y1: f32) -> Self {
        Self::new(x, y0, x, y1)
    }

    /// The four edges of a rectangle (top, bottom, left, right).
    pub fn rect_edges(rect: &BoundingBox) -> [LineSegment; 4] {
        [
            Self::horizontal(rect.y_min, rect.x_min, rect.x_max),
            Self::horizontal(rect.y_max, rect.x_min, rect.x_max),
            Self::vertical(rect.x_min, rect.y_min, rect.y_max),
            Self::vertical(rect.x_max, rect.y_min, rect.y_max),
        ]
    }

    /// Horizontal extent.
    pub fn dx(&self) -> f32 {
        (self.x1 - self.x0).abs()
    }

    /// Vertical extent.
    pub fn dy(&self) -> f32 {
        (self.y1 - self.y0).abs()
    }

    /// Length of the dominant axis.
    pub fn length(&self) -> f32 {
        self.dx().max(self.dy())
    }

    /// Whether the dominant axis is horizontal.
    pub fn is_horizontal(&self) -> bool {
        self.dx() > self.dy()
    }
}

/// An image placed on the page, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Placement on the page
    pub bounding_box: BoundingBox,

    /// Raw image bytes, passed through unchanged
    #[serde(default, with = "payload")]
    pub data: Vec<u8>,

    /// MIME type if known to the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl ImageDescriptor {
    /// Create a new image descriptor.
    pub fn new(bounding_box: BoundingBox, data: Vec<u8>) -> Self {
        Self {
            bounding_box,
            data,
            mime_type: None,
        }
    }

    /// Set MIME type and return self.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}
