//! Font-driven role classification.

use crate::config::ExtractionConfig;
use crate::model::{Font, Role};

/// Assigns a semantic role from a paragraph's representative font.
///
/// Stateless: the same font always yields the same role, whatever the
/// document or page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleClassifier {
    title_threshold: f32,
    heading_threshold: f32,
    bold_margin: f32,
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl RoleClassifier {
    /// Create a classifier with explicit thresholds and a bold promotion margin.
    pub fn new(title_threshold: f32, heading_threshold: f32, bold_margin: f32) -> Self {
        Self {
            title_threshold,
            heading_threshold,
            bold_margin,
        }
    }

    /// Create a classifier from the extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(
            config.title_font_size_threshold,
            config.heading_font_size_threshold,
            config.bold_promotion_margin,
        )
    }

    /// Classify a font.
    ///
    /// Lower bounds are inclusive. A bold font strictly within the margin
    /// below the heading threshold is promoted to a section heading; the
    /// title tier is never reached by promotion.
    pub fn classify(&self, font: &Font) -> Role {
        let size = font.size;
        if size >= self.title_threshold {
            Role::Title
        } else if size >= self.heading_threshold {
            Role::SectionHeading
        } else if font.bold && size > self.heading_threshold - self.bold_margin {
            Role::SectionHeading
        } else {
            Role::Body
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(size: f32, bold: bool) -> Font {
        Font::new("Helvetica", size).bold(bold)
    }

    #[test]
    fn test_thresholds_inclusive() {
        let classifier = RoleClassifier::default();
        assert_eq!(classifier.classify(&font(18.0, false)), Role::Title);
        assert_eq!(classifier.classify(&font(17.99, false)), Role::SectionHeading);
        assert_eq!(classifier.classify(&font(14.0, false)), Role::SectionHeading);
        assert_eq!(classifier.classify(&font(13.99, false)), Role::Body);
        assert_eq!(classifier.classify(&font(9.0, true)), Role::Body);
    }

    #[test]
    fn test_bold_promotion() {
        let classifier = RoleClassifier::default();
        assert_eq!(classifier.classify(&font(13.5, true)), Role::SectionHeading);
        // Boundary of the margin is exclusive
        assert_eq!(classifier.classify(&font(13.0, true)), Role::Body);
        // Bold never reaches the title tier
        assert_eq!(classifier.classify(&font(17.5, true)), Role::SectionHeading);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = ExtractionConfig::new()
            .with_title_threshold(30.0)
            .with_heading_threshold(20.0);
        let classifier = RoleClassifier::from_config(&config);
        assert_eq!(classifier.classify(&font(24.0, false)), Role::SectionHeading);
        assert_eq!(classifier.classify(&font(18.0, false)), Role::Body);
    }
}
