//! Operation service: named operations over raw document bytes.
//!
//! A [`Service`] owns the process-wide configuration, a document loader,
//! and a registry of [`Operation`]s. Transport layers (RPC, HTTP, CLI) hand
//! it an operation name, document bytes, and a string options map.
//!
//! # Example
//!
//! ```
//! use pdfstruct::service::Service;
//! use pdfstruct::{ExtractionConfig, JsonDocumentLoader};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! fn main() -> pdfstruct::Result<()> {
//!     let service = Service::new(ExtractionConfig::default(), Arc::new(JsonDocumentLoader::new()));
//!     assert!(service.supports_operation("extract"));
//!
//!     let output = service.process("detect_text_layer", br#"{"pages": []}"#, &HashMap::new())?;
//!     assert_eq!(output.format, "json");
//!     Ok(())
//! }
//! ```

mod extract;
mod text_layer;

pub use extract::ExtractOperation;
pub use text_layer::{TextLayerOperation, OPTION_CHAR_THRESHOLD};

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::parser::{DocumentLoader, PageContentProvider};

/// String options map as received from a transport layer.
pub type OperationOptions = HashMap<String, String>;

/// Crate version reported by health checks.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output of a processed operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessOutput {
    /// Serialized output
    pub content: String,

    /// Output format name ("json" or "html")
    pub format: String,

    /// MIME type of the output
    pub mime_type: String,

    /// Additional information about the processing
    pub metadata: BTreeMap<String, String>,

    /// Wall-clock processing time
    pub processing_time_ms: u64,
}

impl ProcessOutput {
    /// Create a JSON output.
    pub fn json(content: String) -> Self {
        Self::new(content, "json", "application/json")
    }

    /// Create an HTML output.
    pub fn html(content: String) -> Self {
        Self::new(content, "html", "text/html")
    }

    fn new(content: String, format: &str, mime_type: &str) -> Self {
        Self {
            content,
            format: format.to_string(),
            mime_type: mime_type.to_string(),
            metadata: BTreeMap::new(),
            processing_time_ms: 0,
        }
    }

    /// Add a metadata entry.
    pub fn with_metadata(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Health report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Whether the service can accept requests
    pub healthy: bool,

    /// Service version
    pub version: String,

    /// Registered operation names, sorted
    pub supported_operations: Vec<String>,
}

/// Trait for named operations.
///
/// Implement this trait to add a new operation to a [`Service`].
pub trait Operation: Send + Sync {
    /// Operation name used for dispatch (e.g., "extract").
    fn name(&self) -> &str;

    /// Run the operation over an opened document.
    fn process(
        &self,
        provider: &dyn PageContentProvider,
        options: &OperationOptions,
        config: &ExtractionConfig,
    ) -> Result<ProcessOutput>;
}

/// Dispatches named operations over raw document bytes.
pub struct Service {
    config: ExtractionConfig,
    loader: Arc<dyn DocumentLoader>,
    operations: BTreeMap<String, Arc<dyn Operation>>,
}

impl Service {
    /// Create a service with the built-in operations registered.
    pub fn new(config: ExtractionConfig, loader: Arc<dyn DocumentLoader>) -> Self {
        let mut service = Self::empty(config, loader);
        service.register(Arc::new(ExtractOperation::new()));
        service.register(Arc::new(TextLayerOperation::new()));
        service
    }

    /// Create a service with no operations.
    pub fn empty(config: ExtractionConfig, loader: Arc<dyn DocumentLoader>) -> Self {
        log::info!("service v{} initialized with loader '{}'", VERSION, loader.name());
        Self {
            config,
            loader,
            operations: BTreeMap::new(),
        }
    }

    /// Register an operation, replacing any operation with the same name.
    pub fn register(&mut self, operation: Arc<dyn Operation>) {
        self.operations
            .insert(operation.name().to_lowercase(), operation);
    }

    /// Get the configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Check if an operation is registered.
    pub fn supports_operation(&self, name: &str) -> bool {
        self.operations.contains_key(&name.to_lowercase())
    }

    /// Get all registered operation names, sorted.
    pub fn supported_operations(&self) -> Vec<String> {
        self.operations.keys().cloned().collect()
    }

    /// Report service health.
    pub fn health_check(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            version: VERSION.to_string(),
            supported_operations: self.supported_operations(),
        }
    }

    /// Process document bytes with the named operation.
    ///
    /// Checks run in order: operation lookup, input size, document load.
    /// The document handle is released before this returns, on every path.
    pub fn process(
        &self,
        operation: &str,
        data: &[u8],
        options: &OperationOptions,
    ) -> Result<ProcessOutput> {
        log::info!("processing: operation={}, size={} bytes", operation, data.len());
        let start = Instant::now();

        let result = self.dispatch(operation, data, options);
        let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(mut output) => {
                output.processing_time_ms = elapsed;
                log::info!(
                    "completed in {}ms: output_size={} bytes, format={}",
                    elapsed,
                    output.content_len(),
                    output.format
                );
                Ok(output)
            }
            Err(e) => {
                log::error!("processing failed after {}ms [{}]: {}", elapsed, e.kind(), e);
                Err(e)
            }
        }
    }

    fn dispatch(
        &self,
        operation: &str,
        data: &[u8],
        options: &OperationOptions,
    ) -> Result<ProcessOutput> {
        let op = self
            .operations
            .get(&operation.to_lowercase())
            .ok_or_else(|| Error::UnsupportedOperation(operation.to_string()))?;

        let limit = self.config.max_file_size_bytes();
        if data.len() > limit {
            return Err(Error::OversizeInput {
                size: data.len(),
                limit,
            });
        }

        let provider = self.loader.load(data)?;
        op.process(provider.as_ref(), options, &self.config)
    }
}
