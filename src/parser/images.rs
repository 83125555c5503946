//! Image record packaging.

use crate::model::{detect_mime_type, is_mime_type, ImageDescriptor, OCTET_STREAM};

/// An image ready for id issuance by the sequencer.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedImage {
    /// Source descriptor, payload dropped unless requested
    pub descriptor: ImageDescriptor,
    /// Resolved MIME type
    pub mime_type: String,
}

/// Packages image descriptors into image records.
///
/// Payload bytes pass through unchanged; nothing is re-encoded or resized.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCollector {
    include_payload: bool,
}

impl ImageCollector {
    /// Create a collector. Payloads are kept only when `include_payload` is set.
    pub fn new(include_payload: bool) -> Self {
        Self { include_payload }
    }

    /// Collect the images of one page.
    pub fn collect(&self, images: Vec<ImageDescriptor>) -> Vec<CollectedImage> {
        images
            .into_iter()
            .map(|mut descriptor| {
                let mime_type = descriptor
                    .mime_type
                    .clone()
                    .map(|m| m.trim().to_string())
                    .filter(|m| is_mime_type(m))
                    .or_else(|| detect_mime_type(&descriptor.data).map(str::to_string))
                    .unwrap_or_else(|| OCTET_STREAM.to_string());

                if !self.include_payload {
                    descriptor.data = Vec::new();
                }

                CollectedImage {
                    descriptor,
                    mime_type,
                }
            })
            .collect()
    }
}
