//! Image types.

use serde::{Deserialize, Serialize};

use super::{payload, BoundingBox};

/// Fallback MIME type for payloads without a recognized signature.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// An image placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Identifier (`image-<n>`), dense across a result
    pub id: String,

    /// Page number (1-indexed)
    pub page_number: u32,

    /// Placement on the page
    pub bounding_box: BoundingBox,

    /// MIME type (e.g., "image/jpeg")
    pub mime_type: String,

    /// Raw image bytes, present only when image payloads were requested
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "payload::option"
    )]
    pub payload: Option<Vec<u8>>,
}

impl ImageRecord {
    /// Check if the record carries payload bytes.
    pub fn has_payload(&self) -> bool {
        self.payload.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Inline `data:` URI for the payload, if present.
    pub fn data_uri(&self) -> Option<String> {
        self.payload
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("data:{};base64,{}", self.mime_type, payload::encode(p)))
    }

    /// Get the file extension based on MIME type.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/tiff" => "tiff",
            "image/bmp" => "bmp",
            "image/webp" => "webp",
            "image/jp2" | "image/jpeg2000" => "jp2",
            _ => "raw",
        }
    }

    /// Get a suggested filename based on the record id.
    pub fn suggested_filename(&self) -> String {
        format!("{}.{}", self.id, self.extension())
    }
}

/// Check that a string is a bare `type/subtype` MIME type, without parameters.
pub fn is_mime_type(s: &str) -> bool {
    fn is_token(part: &str) -> bool {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c))
    }

    match s.split_once('/') {
        Some((kind, subtype)) => is_token(kind) && is_token(subtype),
        None => false,
    }
}

/// Detect MIME type from data magic bytes.
pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
    if data.len() < 8 {
        return None;
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }

    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }

    // TIFF: little-endian or big-endian byte order mark
    if data.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A]) {
        return Some("image/tiff");
    }

    if data.starts_with(b"BM") {
        return Some("image/bmp");
    }

    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    // JPEG 2000 signature box
    if data.starts_with(&[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20]) {
        return Some("image/jp2");
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(payload: Option<Vec<u8>>) -> ImageRecord {
        ImageRecord {
            id: "image-3".to_string(),
            page_number: 2,
            bounding_box: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            mime_type: "image/png".to_string(),
            payload,
        }
    }

    #[test]
    fn test_detect_mime_type() {
        let jpeg_data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(detect_mime_type(&jpeg_data), Some("image/jpeg"));

        let png_data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(detect_mime_type(&png_data), Some("image/png"));

        assert_eq!(detect_mime_type(&[0, 0, 0, 0]), None);
    }

    #[test]
    fn test_is_mime_type() {
        assert!(is_mime_type("image/png"));
        assert!(is_mime_type("image/svg+xml"));
        assert!(!is_mime_type("image"));
        assert!(!is_mime_type("image/"));
        assert!(!is_mime_type("text/html; charset=utf-8"));
        assert!(!is_mime_type("image/png\" onerror=\"x"));
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(
            record(Some(b"abc".to_vec())).data_uri().as_deref(),
            Some("data:image/png;base64,YWJj")
        );
        assert!(record(None).data_uri().is_none());
        assert_eq!(record(None).suggested_filename(), "image-3.png");
    }

    #[test]
    fn test_payload_serialization() {
        let json = serde_json::to_string(&record(Some(b"abc".to_vec()))).unwrap();
        assert!(json.contains("\"payload\":\"YWJj\""));

        let json = serde_json::to_string(&record(None)).unwrap();
        assert!(!json.contains("payload"));

        let back: ImageRecord =
            serde_json::from_str(&serde_json::to_string(&record(Some(vec![1, 2, 3]))).unwrap())
                .unwrap();
        assert_eq!(back.payload, Some(vec![1, 2, 3]));
    }
}
