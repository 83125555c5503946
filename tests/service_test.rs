//! Integration tests for the operation service.

use std::collections::HashMap;
use std::sync::Arc;

use pdfstruct::error::Result;
use pdfstruct::service::{OperationOptions, OPTION_CHAR_THRESHOLD};
use pdfstruct::{
    BoundingBox, ErrorKind, ExtractionConfig, ExtractionResult, Font, JsonDocumentLoader,
    MemoryDocument, Operation, PageContent, PageContentProvider, ProcessOutput, Service,
    TextLayerResult,
};

/// Mock operation for testing.
struct PageCountOperation;

impl Operation for PageCountOperation {
    fn name(&self) -> &str {
        "page_count"
    }

    fn process(
        &self,
        provider: &dyn PageContentProvider,
        _options: &OperationOptions,
        _config: &ExtractionConfig,
    ) -> Result<ProcessOutput> {
        Ok(ProcessOutput::json(provider.page_count().to_string()))
    }
}

fn service() -> Service {
    Service::new(ExtractionConfig::default(), Arc::new(JsonDocumentLoader::new()))
}

fn document_bytes() -> Vec<u8> {
    let mut page = PageContent::letter();
    page.add_text(
        "Scope",
        BoundingBox::new(72.0, 72.0, 120.0, 88.0),
        Font::new("Arial", 16.0),
    );
    page.add_text(
        "Details follow below.",
        BoundingBox::new(72.0, 120.0, 200.0, 132.0),
        Font::new("Arial", 12.0),
    );
    MemoryDocument::new(vec![page, PageContent::letter()])
        .to_json()
        .unwrap()
        .into_bytes()
}

fn options(pairs: &[(&str, &str)]) -> OperationOptions {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<_, _>>()
}

#[test]
fn test_extract_operation() {
    let output = service()
        .process("extract", &document_bytes(), &OperationOptions::new())
        .unwrap();

    assert_eq!(output.format, "json");
    assert_eq!(output.mime_type, "application/json");
    assert_eq!(output.metadata["pages_processed"], "2");
    assert_eq!(output.metadata["total_paragraphs"], "2");
    assert_eq!(output.metadata["total_tables"], "0");

    let result: ExtractionResult = serde_json::from_str(&output.content).unwrap();
    assert_eq!(result.paragraphs[0].content, "Scope");
    assert_eq!(result.content_blocks.len(), 2);
}

#[test]
fn test_extract_operation_markup() {
    let output = service()
        .process(
            "Extract",
            &document_bytes(),
            &options(&[("output_format", "html"), ("pages", "1")]),
        )
        .unwrap();

    assert_eq!(output.format, "html");
    assert!(output.content.contains("<h2>Scope</h2>"));
    assert!(output.content.contains("<p>Details follow below.</p>"));
    assert_eq!(output.metadata["pages_processed"], "1");
}

#[test]
fn test_detect_text_layer_operation() {
    let output = service()
        .process("detect_text_layer", &document_bytes(), &OperationOptions::new())
        .unwrap();

    let report: TextLayerResult = serde_json::from_str(&output.content).unwrap();
    assert_eq!(report.total_pages, 2);
    assert_eq!(report.pages_without_text(), vec![2]);

    let strict = service()
        .process(
            "detect_text_layer",
            &document_bytes(),
            &options(&[(OPTION_CHAR_THRESHOLD, "1000")]),
        )
        .unwrap();
    assert_eq!(strict.metadata["pages_with_text"], "0");
}

#[test]
fn test_unsupported_operation() {
    let err = service()
        .process("ocr", &document_bytes(), &OperationOptions::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
}

#[test]
fn test_unsupported_operation_checked_before_size() {
    let config = ExtractionConfig::default().with_max_file_size_mb(1);
    let service = Service::new(config, Arc::new(JsonDocumentLoader::new()));
    let data = vec![b' '; 2 * 1024 * 1024];

    let err = service.process("ocr", &data, &OperationOptions::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);

    let err = service.process("extract", &data, &OperationOptions::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OversizeInput);
}

#[test]
fn test_invalid_document() {
    for data in [&b""[..], b"   ", b"%PDF-1.7 not json", b"{\"pages\": 7}"] {
        let err = service()
            .process("extract", data, &OperationOptions::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDocument);
    }
}

#[test]
fn test_invalid_options() {
    let err = service()
        .process("extract", &document_bytes(), &options(&[("pages", "5")]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPageRange);

    let err = service()
        .process("extract", &document_bytes(), &options(&[("pages", "1-4000000000,2")]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPageRange);

    let err = service()
        .process("extract", &document_bytes(), &options(&[("output_format", "pdf")]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);

    let failure = err.to_failure();
    assert_eq!(failure.kind, ErrorKind::InvalidRequest);
    assert!(failure.message.contains("pdf"));
}

#[test]
fn test_register_custom_operation() {
    let mut service = service();
    service.register(Arc::new(PageCountOperation));

    assert!(service.supports_operation("PAGE_COUNT"));
    let output = service
        .process("page_count", &document_bytes(), &OperationOptions::new())
        .unwrap();
    assert_eq!(output.content, "2");

    assert_eq!(
        service.health_check().supported_operations,
        vec!["detect_text_layer", "extract", "page_count"]
    );
}

#[test]
fn test_health_check() {
    let health = service().health_check();
    assert!(health.healthy);
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health, pdfstruct::health_check());
}
