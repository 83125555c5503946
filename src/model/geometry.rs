//! Geometric primitives in page space.
//!
//! Page space has its origin at the top-left corner with y increasing
//! downwards, so `y_min` is the top edge of a box.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x_min: f32,
    /// Top edge
    pub y_min: f32,
    /// Right edge
    pub x_max: f32,
    /// Bottom edge
    pub y_max: f32,
}

impl BoundingBox {
    /// Create a bounding box, normalizing swapped corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x_min: x0.min(x1),
            y_min: y0.min(y1),
            x_max: x0.max(x1),
            y_max: y0.max(y1),
        }
    }

    /// Create a bounding box from position and dimensions.
    pub fn from_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Center point as `(x, y)`.
    pub fn center(&self) -> (f32, f32) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Union of an iterator of boxes, or `None` when empty.
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a BoundingBox>) -> Option<BoundingBox> {
        boxes.into_iter().fold(None, |acc, b| match acc {
            None => Some(*b),
            Some(u) => Some(u.union(b)),
        })
    }

    /// Whether the point lies inside the box (edges inclusive).
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Whether the two boxes share a region of positive area.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        let overlap_x = self.x_max.min(other.x_max) - self.x_min.max(other.x_min);
        let overlap_y = self.y_max.min(other.y_max) - self.y_min.max(other.y_min);
        overlap_x > 0.0 && overlap_y > 0.0
    }
}
