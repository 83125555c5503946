//! Page content provider abstraction.
//!
//! The byte-level document parser lives outside this crate. It is modelled
//! as a [`DocumentLoader`] that opens raw bytes into a
//! [`PageContentProvider`], which hands back fragments, ruling lines, and
//! images page by page. The boxed provider is the document handle: dropping
//! it releases the underlying parse session.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::PageContent;

/// Per-page access to an opened document.
pub trait PageContentProvider {
    /// Total number of pages in the document.
    fn page_count(&self) -> u32;

    /// Content of a page (1-indexed).
    fn page(&self, number: u32) -> Result<PageContent>;
}

/// Opens raw document bytes into a provider.
pub trait DocumentLoader: Send + Sync {
    /// Loader name, used in logs and health reports.
    fn name(&self) -> &str;

    /// Open a document. Unreadable input fails with [`Error::InvalidDocument`].
    fn load(&self, data: &[u8]) -> Result<Box<dyn PageContentProvider>>;
}

/// A fully materialized document held in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDocument {
    /// Pages in order
    #[serde(default)]
    pub pages: Vec<PageContent>,
}

impl MemoryDocument {
    /// Create a document from pages.
    pub fn new(pages: Vec<PageContent>) -> Self {
        Self { pages }
    }

    /// Append a page.
    pub fn push_page(&mut self, page: PageContent) {
        self.pages.push(page);
    }

    /// Parse a JSON page dump.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(|e| Error::InvalidDocument(e.to_string()))
    }

    /// Load a JSON page dump from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_json(&data)
    }

    /// Load a JSON page dump from a reader.
    pub fn load_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_json(&data)
    }

    /// Serialize back into a JSON page dump.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl PageContentProvider for MemoryDocument {
    fn page_count(&self) -> u32 {
        u32::try_from(self.pages.len()).unwrap_or(u32::MAX)
    }

    fn page(&self, number: u32) -> Result<PageContent> {
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .ok_or_else(|| Error::PageOutOfRange(number, self.page_count()))
    }
}

/// Loader for JSON page dumps ([`MemoryDocument`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentLoader;

impl JsonDocumentLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for JsonDocumentLoader {
    fn name(&self) -> &str {
        "json"
    }

    fn load(&self, data: &[u8]) -> Result<Box<dyn PageContentProvider>> {
        if data.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(Error::InvalidDocument("empty input".to_string()));
        }
        let document = MemoryDocument::from_json(data)?;
        log::debug!("json loader: opened document with {} pages", document.pages.len());
        Ok(Box::new(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_memory_document_pages() {
        let doc = MemoryDocument::new(vec![PageContent::letter(), PageContent::a4()]);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page(2).unwrap().width, 595.0);
        assert!(matches!(doc.page(0), Err(Error::PageOutOfRange(0, 2))));
        assert!(matches!(doc.page(3), Err(Error::PageOutOfRange(3, 2))));
    }

    #[test]
    fn test_json_loader() {
        let loader = JsonDocumentLoader::new();
        let provider = loader
            .load(br#"{"pages": [{"width": 612, "height": 792}]}"#)
            .unwrap();
        assert_eq!(provider.page_count(), 1);
    }

    #[test]
    fn test_json_loader_rejects_invalid() {
        let loader = JsonDocumentLoader::new();
        assert!(matches!(loader.load(b"%PDF-1.7"), Err(Error::InvalidDocument(_))));
        assert!(matches!(loader.load(b"   "), Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_load_file() {
        let doc = MemoryDocument::new(vec![PageContent::letter()]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(doc.to_json().unwrap().as_bytes()).unwrap();

        let loaded = MemoryDocument::load_file(file.path()).unwrap();
        assert_eq!(loaded, doc);
    }
}
